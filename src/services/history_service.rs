use std::cmp::Reverse;

use tracing::info;
use uuid::Uuid;

use crate::{
    dto::history::{ClearHistoryResponse, HistoryEntryView},
    error::ServiceError,
    state::{SharedState, history::HistoryEntry},
};

/// Archive the current session in the history log.
pub async fn record(state: &SharedState) -> Result<HistoryEntryView, ServiceError> {
    let session = state.load_session().await?;
    if session.team_a.is_empty() || session.team_b.is_empty() {
        return Err(ServiceError::InvalidState(
            "both teams need players before the session can be recorded".into(),
        ));
    }

    let entry = HistoryEntry::snapshot(&session);
    state.history().append(entry.clone().into()).await?;
    info!(
        entry = %entry.id,
        date = %entry.date,
        rounds = entry.rounds.as_ref().map_or(0, Vec::len),
        "session recorded in history"
    );

    Ok(entry.into())
}

/// Every recorded session, newest first.
pub async fn list(state: &SharedState) -> Result<Vec<HistoryEntryView>, ServiceError> {
    let mut entries = state
        .history()
        .list()
        .await?
        .into_iter()
        .map(HistoryEntry::from)
        .collect::<Vec<_>>();
    // Stable sort keeps insertion order reversed for entries sharing a timestamp.
    entries.reverse();
    entries.sort_by_key(|entry| Reverse(entry.created_at));

    Ok(entries.into_iter().map(Into::into).collect())
}

pub async fn delete(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    if !state.history().delete(id).await? {
        return Err(ServiceError::NotFound(format!(
            "history entry `{id}` not found"
        )));
    }
    info!(entry = %id, "history entry deleted");
    Ok(())
}

/// Drop the whole history log.
pub async fn clear(state: &SharedState) -> Result<ClearHistoryResponse, ServiceError> {
    let removed = state.history().clear().await?;
    info!(removed, "history cleared");
    Ok(ClearHistoryResponse { removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        state::{
            AppState,
            roster::{Player, Role},
        },
    };

    #[tokio::test]
    async fn recording_needs_both_teams() {
        let state = AppState::in_memory(AppConfig::default());
        assert!(matches!(
            record(&state).await,
            Err(ServiceError::InvalidState(_))
        ));

        state
            .with_session_mut(|session| {
                session.team_a.push(Player::new("Ana", Role::Forehand, 6));
                Ok(())
            })
            .await
            .unwrap();
        assert!(matches!(
            record(&state).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn history_lists_newest_first_and_deletes() {
        let state = AppState::in_memory(AppConfig::default());
        state
            .with_session_mut(|session| {
                session.team_a.push(Player::new("Ana", Role::Forehand, 6));
                session.team_b.push(Player::new("Bea", Role::Backhand, 4));
                Ok(())
            })
            .await
            .unwrap();

        let first = record(&state).await.unwrap();
        let second = record(&state).await.unwrap();
        assert!(first.rounds.is_none());
        assert!(first.summary.is_none());

        let listed = list(&state).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        delete(&state, first.id).await.unwrap();
        assert!(matches!(
            delete(&state, first.id).await,
            Err(ServiceError::NotFound(_))
        ));

        let cleared = clear(&state).await.unwrap();
        assert_eq!(cleared.removed, 1);
        assert!(list(&state).await.unwrap().is_empty());
    }
}
