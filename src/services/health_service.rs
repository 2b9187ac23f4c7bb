use tracing::warn;

use crate::{
    dto::health::{HealthResponse, StoreHealth},
    state::SharedState,
};

/// Ping every store and report degraded mode when one of them fails.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let roster = match state.roster().health_check().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "roster store health check failed");
            false
        }
    };
    let history = match state.history().health_check().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "history store health check failed");
            false
        }
    };

    StoreHealth { roster, history }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dto::health::HealthStatus, state::AppState};

    #[tokio::test]
    async fn in_memory_stores_are_healthy() {
        let state = AppState::in_memory(AppConfig::default());
        let health = health_status(&state).await;
        assert_eq!(health.status, HealthStatus::Ok);
        assert!(health.stores.roster && health.stores.history);
    }

    #[test]
    fn one_failing_store_degrades() {
        let health = HealthResponse::from(StoreHealth {
            roster: true,
            history: false,
        });
        assert_eq!(health.status, HealthStatus::Degraded);
    }
}
