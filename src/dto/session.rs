//! DTO definitions for the organizer session: pool, teams, rounds and results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{format_system_time, roster::PlayerSummary},
    services::scoring::{self, SessionOutcome, SessionTally},
    state::{
        roster::{Pairing, Round, Team, TeamSide},
        session::{MatchKey, Session},
    },
};

/// Players chosen to take part in the session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectPoolRequest {
    pub player_ids: Vec<Uuid>,
}

/// Manual assignment of both teams at once.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignTeamsRequest {
    pub team_a: Vec<Uuid>,
    pub team_b: Vec<Uuid>,
}

/// Player to add to a team.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TeamMemberRequest {
    pub player_id: Uuid,
}

fn default_avoid_repeats() -> bool {
    true
}

/// Parameters for generating the rotation schedule.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GenerateRoundsRequest {
    /// Number of rounds, between 1 and 20.
    #[validate(range(min = 1, max = 20))]
    pub round_count: usize,
    /// Forbid any partnership from appearing twice. Defaults to `true`.
    #[serde(default = "default_avoid_repeats")]
    pub avoid_repeats: bool,
}

/// Raw score typed for a court, Team A first (e.g. `"63"`).
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreRequest {
    pub score: String,
}

/// Coarse progress of the session, derived from its content.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Pool being selected, no teams yet.
    Selecting,
    /// Teams exist, no schedule yet.
    TeamsReady,
    /// Rounds generated, scores can be typed.
    Scheduled,
}

impl From<&Session> for SessionPhase {
    fn from(session: &Session) -> Self {
        if !session.rounds.is_empty() {
            SessionPhase::Scheduled
        } else if !session.team_a.is_empty() || !session.team_b.is_empty() {
            SessionPhase::TeamsReady
        } else {
            SessionPhase::Selecting
        }
    }
}

/// Session winner label.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeView {
    TeamA,
    TeamB,
    Draw,
}

impl From<SessionOutcome> for OutcomeView {
    fn from(value: SessionOutcome) -> Self {
        match value {
            SessionOutcome::TeamA => OutcomeView::TeamA,
            SessionOutcome::TeamB => OutcomeView::TeamB,
            SessionOutcome::Draw => OutcomeView::Draw,
        }
    }
}

/// Team members with their combined rating.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamView {
    pub players: Vec<PlayerSummary>,
    pub rating_sum: u32,
}

impl From<Team> for TeamView {
    fn from(team: Team) -> Self {
        let rating_sum = team.rating_sum();
        Self {
            players: team.players.into_iter().map(Into::into).collect(),
            rating_sum,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PairingView {
    pub forehand: PlayerSummary,
    pub backhand: PlayerSummary,
    pub rating_sum: u32,
}

impl From<Pairing> for PairingView {
    fn from(pairing: Pairing) -> Self {
        let rating_sum = pairing.rating_sum();
        Self {
            forehand: pairing.forehand.into(),
            backhand: pairing.backhand.into(),
            rating_sum,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchView {
    /// 1-based court number.
    pub court: usize,
    pub team_a: PairingView,
    pub team_b: PairingView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<TeamSide>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoundView {
    /// 1-based round number.
    pub round: usize,
    /// Points a match win is worth in this round.
    pub weight: u32,
    pub matches: Vec<MatchView>,
}

/// Build round views with the scores typed so far attached to their matches.
pub fn round_views(rounds: Vec<Round>, scores: &BTreeMap<MatchKey, String>) -> Vec<RoundView> {
    rounds
        .into_iter()
        .enumerate()
        .map(|(index, round)| RoundView {
            round: index + 1,
            weight: scoring::round_weight(index),
            matches: round
                .matches
                .into_iter()
                .map(|game| {
                    let score = scores.get(&MatchKey::new(index, game.court)).cloned();
                    let winner = score
                        .as_deref()
                        .and_then(scoring::parse_score)
                        .and_then(|parsed| parsed.winner());
                    MatchView {
                        court: game.court + 1,
                        team_a: game.team_a.into(),
                        team_b: game.team_b.into(),
                        score,
                        winner,
                    }
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoundPointsView {
    /// 1-based round number.
    pub round: usize,
    pub weight: u32,
    pub points_a: u32,
    pub points_b: u32,
}

/// Running points per round and overall.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsView {
    pub rounds: Vec<RoundPointsView>,
    pub total_a: u32,
    pub total_b: u32,
    pub outcome: OutcomeView,
}

impl From<SessionTally> for ResultsView {
    fn from(tally: SessionTally) -> Self {
        let outcome = tally.outcome().into();
        Self {
            rounds: tally
                .rounds
                .into_iter()
                .map(|round| RoundPointsView {
                    round: round.round + 1,
                    weight: round.weight,
                    points_a: round.points_a,
                    points_b: round.points_b,
                })
                .collect(),
            total_a: tally.total_a,
            total_b: tally.total_b,
            outcome,
        }
    }
}

/// Full view of the current session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub pool: Vec<PlayerSummary>,
    pub team_a: TeamView,
    pub team_b: TeamView,
    pub avoid_repeats: bool,
    pub rounds: Vec<RoundView>,
    pub results: ResultsView,
    pub updated_at: String,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        let phase = SessionPhase::from(&session);
        let results = scoring::tally(&session.rounds, &session.scores).into();
        Self {
            phase,
            pool: session.pool.into_iter().map(Into::into).collect(),
            team_a: session.team_a.into(),
            team_b: session.team_b.into(),
            avoid_repeats: session.avoid_repeats,
            rounds: round_views(session.rounds, &session.scores),
            results,
            updated_at: format_system_time(session.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::roster::{Match, Player, Role};

    fn pairing(prefix: &str) -> Pairing {
        Pairing {
            forehand: Player::new(format!("{prefix}F"), Role::Forehand, 6),
            backhand: Player::new(format!("{prefix}B"), Role::Backhand, 4),
        }
    }

    #[test]
    fn phase_follows_session_content() {
        let mut session = Session::default();
        assert_eq!(SessionPhase::from(&session), SessionPhase::Selecting);

        session.team_a.push(Player::new("Ana", Role::Forehand, 5));
        assert_eq!(SessionPhase::from(&session), SessionPhase::TeamsReady);

        session.rounds.push(Round {
            matches: Vec::new(),
        });
        assert_eq!(SessionPhase::from(&session), SessionPhase::Scheduled);
    }

    #[test]
    fn round_views_number_from_one_and_attach_scores() {
        let rounds = vec![
            Round {
                matches: vec![Match {
                    court: 0,
                    team_a: pairing("A"),
                    team_b: pairing("B"),
                }],
            },
            Round {
                matches: vec![Match {
                    court: 0,
                    team_a: pairing("A"),
                    team_b: pairing("B"),
                }],
            },
        ];
        let scores = BTreeMap::from([(MatchKey::new(1, 0), "36".to_string())]);

        let views = round_views(rounds, &scores);

        assert_eq!(views[0].round, 1);
        assert_eq!(views[0].matches[0].court, 1);
        assert_eq!(views[0].matches[0].score, None);
        assert_eq!(views[1].weight, 2);
        assert_eq!(views[1].matches[0].score.as_deref(), Some("36"));
        assert_eq!(views[1].matches[0].winner, Some(TeamSide::B));
        assert_eq!(views[1].matches[0].team_a.rating_sum, 10);
    }

    #[test]
    fn generate_request_defaults_to_avoiding_repeats() {
        let request: GenerateRoundsRequest =
            serde_json::from_str(r#"{ "round_count": 3 }"#).unwrap();
        assert!(request.avoid_repeats);
        assert!(request.validate().is_ok());

        let request: GenerateRoundsRequest =
            serde_json::from_str(r#"{ "round_count": 0, "avoid_repeats": false }"#).unwrap();
        assert!(request.validate().is_err());
    }
}
