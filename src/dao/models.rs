use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Court side persisted alongside a player record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoleEntity {
    Forehand,
    Backhand,
}

/// Minimal player projection stored in the roster and in session snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Preferred court side.
    pub role: RoleEntity,
    /// Skill rating in `1..=10`.
    pub rating: u8,
}

/// Partnership of two players of the same team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairingEntity {
    pub forehand: PlayerEntity,
    pub backhand: PlayerEntity,
}

/// Single court of a round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Zero-based court index.
    pub court: usize,
    pub team_a: PairingEntity,
    pub team_b: PairingEntity,
}

/// Scheduled round made of one match per court.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundEntity {
    pub matches: Vec<MatchEntity>,
}

/// Raw score typed for one court of one round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntity {
    /// Zero-based round index.
    pub round: usize,
    /// Zero-based court index.
    pub court: usize,
    /// Up to two digits in `0..=7`, Team A first.
    pub raw: String,
}

/// Session fields read and written in full by the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionEntity {
    /// Players selected for the session.
    pub pool: Vec<PlayerEntity>,
    pub team_a: Vec<PlayerEntity>,
    pub team_b: Vec<PlayerEntity>,
    /// Generated rounds, empty until generation succeeded.
    #[serde(default)]
    pub rounds: Vec<RoundEntity>,
    /// Whether the stored rounds were generated without repeated partnerships.
    #[serde(default)]
    pub avoid_repeats: bool,
    #[serde(default)]
    pub scores: Vec<ScoreEntity>,
    /// Last time the session was written.
    pub updated_at: SystemTime,
}

/// Outcome label stored with a history summary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeEntity {
    TeamA,
    TeamB,
    Draw,
}

/// Points summary frozen into a history entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryEntity {
    pub points_a: u32,
    pub points_b: u32,
    pub outcome: OutcomeEntity,
}

/// Immutable snapshot appended to the history log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntryEntity {
    /// Primary key of the entry.
    pub id: Uuid,
    /// Calendar date of the session (`YYYY-MM-DD`).
    pub date: String,
    pub team_a: Vec<PlayerEntity>,
    pub team_b: Vec<PlayerEntity>,
    /// Rounds played, absent when the snapshot was taken before generation.
    #[serde(default)]
    pub rounds: Option<Vec<RoundEntity>>,
    #[serde(default)]
    pub scores: Vec<ScoreEntity>,
    #[serde(default)]
    pub summary: Option<SummaryEntity>,
    /// Creation timestamp of the entry.
    pub created_at: SystemTime,
}
