use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::history::{ClearHistoryResponse, HistoryEntryView},
    error::AppError,
    services::history_service,
    state::SharedState,
};

/// Archive of played sessions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/history",
            get(list_history).post(record_session).delete(clear_history),
        )
        .route("/history/{id}", delete(delete_entry))
}

#[utoipa::path(
    get,
    path = "/history",
    tag = "history",
    responses((status = 200, description = "Recorded sessions, newest first", body = [HistoryEntryView]))
)]
pub async fn list_history(
    State(state): State<SharedState>,
) -> Result<Json<Vec<HistoryEntryView>>, AppError> {
    let entries = history_service::list(&state).await?;
    Ok(Json(entries))
}

/// Snapshot the current session into the history log.
#[utoipa::path(
    post,
    path = "/history",
    tag = "history",
    responses(
        (status = 201, description = "Session recorded", body = HistoryEntryView),
        (status = 409, description = "A team is still empty")
    )
)]
pub async fn record_session(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<HistoryEntryView>), AppError> {
    let entry = history_service::record(&state).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    delete,
    path = "/history",
    tag = "history",
    responses((status = 200, description = "History cleared", body = ClearHistoryResponse))
)]
pub async fn clear_history(
    State(state): State<SharedState>,
) -> Result<Json<ClearHistoryResponse>, AppError> {
    let cleared = history_service::clear(&state).await?;
    Ok(Json(cleared))
}

#[utoipa::path(
    delete,
    path = "/history/{id}",
    tag = "history",
    params(("id" = Uuid, Path, description = "History entry identifier")),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "Unknown entry")
    )
)]
pub async fn delete_entry(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    history_service::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
