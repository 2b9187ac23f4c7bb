/// Pool validation and two-team balancing heuristic.
pub mod balancer;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Session history recording and browsing.
pub mod history_service;
/// Roster management operations.
pub mod roster_service;
/// Rotating doubles schedule generation.
pub mod rotation;
/// Score parsing and weighted points aggregation.
pub mod scoring;
/// Organizer session workflow: pool, teams, rounds and scores.
pub mod session_service;
