use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::session::{
        AssignTeamsRequest, GenerateRoundsRequest, ResultsView, ScoreRequest, SelectPoolRequest,
        SessionView, TeamMemberRequest,
    },
    error::AppError,
    services::session_service,
    state::{SharedState, roster::TeamSide},
};

/// Organizer endpoints driving the current session from pool to results.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/session", get(get_session).delete(reset_session))
        .route("/session/pool", put(select_pool))
        .route("/session/teams", put(assign_teams))
        .route("/session/teams/balance", post(balance_teams))
        .route("/session/teams/{side}/members", post(add_team_member))
        .route(
            "/session/teams/{side}/members/{player_id}",
            delete(remove_team_member),
        )
        .route("/session/rounds", post(generate_rounds).delete(clear_rounds))
        .route("/session/scores/{round}/{court}", put(record_score))
        .route("/session/results", get(results))
}

#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses((status = 200, description = "Current session", body = SessionView))
)]
pub async fn get_session(State(state): State<SharedState>) -> Result<Json<SessionView>, AppError> {
    let session = session_service::get_session(&state).await?;
    Ok(Json(session))
}

/// Discard the current session and start from an empty pool.
#[utoipa::path(
    delete,
    path = "/session",
    tag = "session",
    responses((status = 204, description = "Session reset"))
)]
pub async fn reset_session(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    session_service::reset_session(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Choose which roster players take part; existing teams and rounds are dropped.
#[utoipa::path(
    put,
    path = "/session/pool",
    tag = "session",
    request_body = SelectPoolRequest,
    responses(
        (status = 200, description = "Pool selected", body = SessionView),
        (status = 400, description = "Player listed twice"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn select_pool(
    State(state): State<SharedState>,
    Json(payload): Json<SelectPoolRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = session_service::select_pool(&state, payload).await?;
    Ok(Json(session))
}

/// Split the pool into two teams of equal size with role quotas and close rating sums.
#[utoipa::path(
    post,
    path = "/session/teams/balance",
    tag = "session",
    responses(
        (status = 200, description = "Teams balanced", body = SessionView),
        (status = 400, description = "Pool is empty, not a multiple of 4 or has unequal roles")
    )
)]
pub async fn balance_teams(
    State(state): State<SharedState>,
) -> Result<Json<SessionView>, AppError> {
    let session = session_service::balance_teams(&state).await?;
    Ok(Json(session))
}

#[utoipa::path(
    put,
    path = "/session/teams",
    tag = "session",
    request_body = AssignTeamsRequest,
    responses(
        (status = 200, description = "Teams assigned", body = SessionView),
        (status = 400, description = "Player outside the pool or listed twice")
    )
)]
pub async fn assign_teams(
    State(state): State<SharedState>,
    Json(payload): Json<AssignTeamsRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = session_service::assign_teams(&state, payload).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/session/teams/{side}/members",
    tag = "session",
    params(("side" = TeamSide, Path, description = "Team to join (`a` or `b`)")),
    request_body = TeamMemberRequest,
    responses(
        (status = 200, description = "Player placed on the team", body = SessionView),
        (status = 400, description = "Player is not in the pool")
    )
)]
pub async fn add_team_member(
    State(state): State<SharedState>,
    Path(side): Path<TeamSide>,
    Json(payload): Json<TeamMemberRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = session_service::add_to_team(&state, side, payload.player_id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    delete,
    path = "/session/teams/{side}/members/{player_id}",
    tag = "session",
    params(
        ("side" = TeamSide, Path, description = "Team to leave (`a` or `b`)"),
        ("player_id" = Uuid, Path, description = "Player identifier")
    ),
    responses(
        (status = 200, description = "Player removed from the team", body = SessionView),
        (status = 404, description = "Player is not on that team")
    )
)]
pub async fn remove_team_member(
    State(state): State<SharedState>,
    Path((side, player_id)): Path<(TeamSide, Uuid)>,
) -> Result<Json<SessionView>, AppError> {
    let session = session_service::remove_from_team(&state, side, player_id).await?;
    Ok(Json(session))
}

/// Build the rotation schedule for the current teams.
#[utoipa::path(
    post,
    path = "/session/rounds",
    tag = "session",
    request_body = GenerateRoundsRequest,
    responses(
        (status = 200, description = "Rounds generated", body = SessionView),
        (status = 400, description = "Round count outside 1..=20"),
        (status = 409, description = "Teams incomplete or no fresh partnership left for a round")
    )
)]
pub async fn generate_rounds(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<GenerateRoundsRequest>>,
) -> Result<Json<SessionView>, AppError> {
    let session = session_service::generate_rounds(&state, payload).await?;
    Ok(Json(session))
}

#[utoipa::path(
    delete,
    path = "/session/rounds",
    tag = "session",
    responses((status = 200, description = "Rounds and scores cleared", body = SessionView))
)]
pub async fn clear_rounds(State(state): State<SharedState>) -> Result<Json<SessionView>, AppError> {
    let session = session_service::clear_rounds(&state).await?;
    Ok(Json(session))
}

/// Type the score of one match; an empty score clears it.
#[utoipa::path(
    put,
    path = "/session/scores/{round}/{court}",
    tag = "session",
    params(
        ("round" = usize, Path, description = "1-based round number"),
        ("court" = usize, Path, description = "1-based court number")
    ),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Score stored, updated results", body = ResultsView),
        (status = 404, description = "No such round or court")
    )
)]
pub async fn record_score(
    State(state): State<SharedState>,
    Path((round, court)): Path<(usize, usize)>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ResultsView>, AppError> {
    let results = session_service::record_score(&state, round, court, payload).await?;
    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/session/results",
    tag = "session",
    responses((status = 200, description = "Weighted points per round and overall", body = ResultsView))
)]
pub async fn results(State(state): State<SharedState>) -> Result<Json<ResultsView>, AppError> {
    let results = session_service::results(&state).await?;
    Ok(Json(results))
}
