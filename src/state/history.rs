use std::{collections::BTreeMap, time::SystemTime};

use time::{OffsetDateTime, macros::format_description};
use uuid::Uuid;

use crate::{
    dao::models::{HistoryEntryEntity, OutcomeEntity, SummaryEntity},
    services::scoring::{self, SessionOutcome},
    state::{
        roster::{Round, Team},
        session::{MatchKey, Session, scores_from_entities, scores_to_entities},
    },
};

/// Points frozen into a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub points_a: u32,
    pub points_b: u32,
    pub outcome: SessionOutcome,
}

/// Immutable record of a played session.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Primary key of the entry.
    pub id: Uuid,
    /// Calendar date of the session (`YYYY-MM-DD`).
    pub date: String,
    pub team_a: Team,
    pub team_b: Team,
    /// Schedule, absent when recorded before rounds were generated.
    pub rounds: Option<Vec<Round>>,
    pub scores: BTreeMap<MatchKey, String>,
    /// Points tally, present together with the rounds.
    pub summary: Option<SessionSummary>,
    pub created_at: SystemTime,
}

impl HistoryEntry {
    /// Snapshot the session as it stands now.
    pub fn snapshot(session: &Session) -> Self {
        let created_at = SystemTime::now();
        let (rounds, summary) = if session.rounds.is_empty() {
            (None, None)
        } else {
            let tally = scoring::tally(&session.rounds, &session.scores);
            let summary = SessionSummary {
                points_a: tally.total_a,
                points_b: tally.total_b,
                outcome: tally.outcome(),
            };
            (Some(session.rounds.clone()), Some(summary))
        };

        Self {
            id: Uuid::new_v4(),
            date: calendar_date(created_at),
            team_a: session.team_a.clone(),
            team_b: session.team_b.clone(),
            rounds,
            scores: session.scores.clone(),
            summary,
            created_at,
        }
    }
}

fn calendar_date(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "unknown-date".into())
}

impl From<SessionOutcome> for OutcomeEntity {
    fn from(value: SessionOutcome) -> Self {
        match value {
            SessionOutcome::TeamA => OutcomeEntity::TeamA,
            SessionOutcome::TeamB => OutcomeEntity::TeamB,
            SessionOutcome::Draw => OutcomeEntity::Draw,
        }
    }
}

impl From<OutcomeEntity> for SessionOutcome {
    fn from(value: OutcomeEntity) -> Self {
        match value {
            OutcomeEntity::TeamA => SessionOutcome::TeamA,
            OutcomeEntity::TeamB => SessionOutcome::TeamB,
            OutcomeEntity::Draw => SessionOutcome::Draw,
        }
    }
}

impl From<SummaryEntity> for SessionSummary {
    fn from(value: SummaryEntity) -> Self {
        Self {
            points_a: value.points_a,
            points_b: value.points_b,
            outcome: value.outcome.into(),
        }
    }
}

impl From<SessionSummary> for SummaryEntity {
    fn from(value: SessionSummary) -> Self {
        Self {
            points_a: value.points_a,
            points_b: value.points_b,
            outcome: value.outcome.into(),
        }
    }
}

impl From<HistoryEntryEntity> for HistoryEntry {
    fn from(value: HistoryEntryEntity) -> Self {
        Self {
            id: value.id,
            date: value.date,
            team_a: Team::new(value.team_a.into_iter().map(Into::into).collect()),
            team_b: Team::new(value.team_b.into_iter().map(Into::into).collect()),
            rounds: value
                .rounds
                .map(|rounds| rounds.into_iter().map(Into::into).collect()),
            scores: scores_from_entities(value.scores),
            summary: value.summary.map(Into::into),
            created_at: value.created_at,
        }
    }
}

impl From<HistoryEntry> for HistoryEntryEntity {
    fn from(value: HistoryEntry) -> Self {
        Self {
            id: value.id,
            date: value.date,
            team_a: value.team_a.players.into_iter().map(Into::into).collect(),
            team_b: value.team_b.players.into_iter().map(Into::into).collect(),
            rounds: value
                .rounds
                .map(|rounds| rounds.into_iter().map(Into::into).collect()),
            scores: scores_to_entities(value.scores),
            summary: value.summary.map(Into::into),
            created_at: value.created_at,
        }
    }
}
