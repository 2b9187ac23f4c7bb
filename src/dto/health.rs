use serde::Serialize;
use utoipa::ToSchema;

/// Overall verdict reported by `/healthcheck`.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    /// At least one store failed its check; the API still answers.
    Degraded,
}

/// Reachability of each backing store.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreHealth {
    pub roster: bool,
    pub history: bool,
}

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub stores: StoreHealth,
}

impl From<StoreHealth> for HealthResponse {
    fn from(stores: StoreHealth) -> Self {
        let status = if stores.roster && stores.history {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        };
        Self { status, stores }
    }
}
