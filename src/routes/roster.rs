use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::roster::{PlayerInput, PlayerSummary},
    error::AppError,
    services::roster_service,
    state::SharedState,
};

/// Roster management: the players a session can be drawn from.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route("/players/{id}", put(update_player).delete(delete_player))
}

/// List every roster player, sorted by name.
#[utoipa::path(
    get,
    path = "/players",
    tag = "roster",
    responses((status = 200, description = "Roster players", body = [PlayerSummary]))
)]
pub async fn list_players(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    let players = roster_service::list_players(&state).await?;
    Ok(Json(players))
}

#[utoipa::path(
    post,
    path = "/players",
    tag = "roster",
    request_body = PlayerInput,
    responses(
        (status = 201, description = "Player created", body = PlayerSummary),
        (status = 400, description = "Blank name or rating outside 1..=10")
    )
)]
pub async fn create_player(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<PlayerInput>>,
) -> Result<(StatusCode, Json<PlayerSummary>), AppError> {
    let player = roster_service::create_player(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Player identifier")),
    request_body = PlayerInput,
    responses(
        (status = 200, description = "Player updated", body = PlayerSummary),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn update_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<PlayerInput>>,
) -> Result<Json<PlayerSummary>, AppError> {
    let player = roster_service::update_player(&state, id, payload).await?;
    Ok(Json(player))
}

#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Player identifier")),
    responses(
        (status = 204, description = "Player removed"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    roster_service::delete_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
