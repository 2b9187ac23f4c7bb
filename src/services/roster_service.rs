use tracing::info;
use uuid::Uuid;

use crate::{
    dto::roster::{PlayerInput, PlayerSummary},
    error::ServiceError,
    state::{SharedState, roster::Player},
};

/// List every roster player, sorted by name.
pub async fn list_players(state: &SharedState) -> Result<Vec<PlayerSummary>, ServiceError> {
    let mut players = state
        .roster()
        .list_players()
        .await?
        .into_iter()
        .map(Player::from)
        .collect::<Vec<_>>();
    players.sort_by_key(|player| player.name.to_lowercase());

    Ok(players.into_iter().map(Into::into).collect())
}

/// Add a new player to the roster.
pub async fn create_player(
    state: &SharedState,
    input: PlayerInput,
) -> Result<PlayerSummary, ServiceError> {
    let player = Player::new(input.name.trim(), input.role, input.rating);
    state.roster().upsert_player(player.clone().into()).await?;
    info!(player = %player.id, name = %player.name, role = ?player.role, "player added to roster");

    Ok(player.into())
}

/// Replace the name, role and rating of an existing player.
pub async fn update_player(
    state: &SharedState,
    id: Uuid,
    input: PlayerInput,
) -> Result<PlayerSummary, ServiceError> {
    let roster = state.roster();
    if roster.find_player(id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("player `{id}` not found")));
    }

    let player = Player {
        id,
        name: input.name.trim().to_string(),
        role: input.role,
        rating: input.rating,
    };
    roster.upsert_player(player.clone().into()).await?;
    info!(player = %id, "player updated");

    Ok(player.into())
}

/// Remove a player from the roster.
///
/// The current session keeps its own copy of the player until it is rebuilt.
pub async fn delete_player(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    if !state.roster().delete_player(id).await? {
        return Err(ServiceError::NotFound(format!("player `{id}` not found")));
    }
    info!(player = %id, "player removed from roster");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        state::{AppState, roster::Role},
    };

    fn input(name: &str, role: Role, rating: u8) -> PlayerInput {
        PlayerInput {
            name: name.into(),
            role,
            rating,
        }
    }

    #[tokio::test]
    async fn roster_lifecycle() {
        let state = AppState::in_memory(AppConfig::default());

        let zoe = create_player(&state, input(" Zoe ", Role::Forehand, 6))
            .await
            .unwrap();
        assert_eq!(zoe.name, "Zoe");
        create_player(&state, input("ana", Role::Backhand, 4))
            .await
            .unwrap();

        let names = list_players(&state)
            .await
            .unwrap()
            .into_iter()
            .map(|player| player.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["ana", "Zoe"]);

        let updated = update_player(&state, zoe.id, input("Zoe", Role::Backhand, 8))
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Backhand);
        assert_eq!(updated.rating, 8);

        delete_player(&state, zoe.id).await.unwrap();
        assert!(matches!(
            delete_player(&state, zoe.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            update_player(&state, zoe.id, input("Zoe", Role::Forehand, 5)).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
