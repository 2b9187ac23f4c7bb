use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the paddle rotation backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::roster::list_players,
        crate::routes::roster::create_player,
        crate::routes::roster::update_player,
        crate::routes::roster::delete_player,
        crate::routes::session::get_session,
        crate::routes::session::reset_session,
        crate::routes::session::select_pool,
        crate::routes::session::balance_teams,
        crate::routes::session::assign_teams,
        crate::routes::session::add_team_member,
        crate::routes::session::remove_team_member,
        crate::routes::session::generate_rounds,
        crate::routes::session::clear_rounds,
        crate::routes::session::record_score,
        crate::routes::session::results,
        crate::routes::history::list_history,
        crate::routes::history::record_session,
        crate::routes::history::clear_history,
        crate::routes::history::delete_entry,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::health::StoreHealth,
            crate::dto::roster::PlayerInput,
            crate::dto::roster::PlayerSummary,
            crate::dto::session::SelectPoolRequest,
            crate::dto::session::AssignTeamsRequest,
            crate::dto::session::TeamMemberRequest,
            crate::dto::session::GenerateRoundsRequest,
            crate::dto::session::ScoreRequest,
            crate::dto::session::SessionView,
            crate::dto::session::SessionPhase,
            crate::dto::session::TeamView,
            crate::dto::session::RoundView,
            crate::dto::session::MatchView,
            crate::dto::session::PairingView,
            crate::dto::session::ResultsView,
            crate::dto::session::RoundPointsView,
            crate::dto::session::OutcomeView,
            crate::dto::history::HistoryEntryView,
            crate::dto::history::SummaryView,
            crate::dto::history::ClearHistoryResponse,
            crate::state::roster::Role,
            crate::state::roster::TeamSide,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "roster", description = "Player roster management"),
        (name = "session", description = "Pool selection, team balancing, rotation and scoring"),
        (name = "history", description = "Archive of recorded sessions"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/players/{id}",
            "/session/teams/{side}/members/{player_id}",
            "/session/scores/{round}/{court}",
            "/history/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
