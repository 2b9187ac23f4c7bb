use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{
        format_system_time,
        roster::PlayerSummary,
        session::{OutcomeView, RoundView, round_views},
    },
    state::history::{HistoryEntry, SessionSummary},
};

/// Final points stored with a history entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryView {
    pub points_a: u32,
    pub points_b: u32,
    pub outcome: OutcomeView,
}

impl From<SessionSummary> for SummaryView {
    fn from(summary: SessionSummary) -> Self {
        Self {
            points_a: summary.points_a,
            points_b: summary.points_b,
            outcome: summary.outcome.into(),
        }
    }
}

/// Recorded session as returned by the history endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntryView {
    pub id: Uuid,
    pub date: String,
    pub created_at: String,
    pub team_a: Vec<PlayerSummary>,
    pub team_b: Vec<PlayerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<Vec<RoundView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryView>,
}

impl From<HistoryEntry> for HistoryEntryView {
    fn from(entry: HistoryEntry) -> Self {
        let scores = entry.scores;
        Self {
            id: entry.id,
            date: entry.date,
            created_at: format_system_time(entry.created_at),
            team_a: entry.team_a.players.into_iter().map(Into::into).collect(),
            team_b: entry.team_b.players.into_iter().map(Into::into).collect(),
            rounds: entry.rounds.map(|rounds| round_views(rounds, &scores)),
            summary: entry.summary.map(Into::into),
        }
    }
}

/// Number of entries removed by a bulk delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    pub removed: usize,
}
