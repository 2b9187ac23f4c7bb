use std::{collections::BTreeMap, time::SystemTime};

use crate::{
    dao::models::{MatchEntity, PairingEntity, RoundEntity, ScoreEntity, SessionEntity},
    state::roster::{Match, Pairing, Player, Round, Team, TeamSide},
};

/// Position of a match inside the schedule: zero-based round and court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub round: usize,
    pub court: usize,
}

impl MatchKey {
    pub fn new(round: usize, court: usize) -> Self {
        Self { round, court }
    }
}

/// Current organizer session: pool, teams, schedule and typed scores.
#[derive(Debug, Clone)]
pub struct Session {
    /// Players selected to play today.
    pub pool: Vec<Player>,
    pub team_a: Team,
    pub team_b: Team,
    /// Generated schedule, empty until generation succeeded.
    pub rounds: Vec<Round>,
    /// Flag the current rounds were generated with.
    pub avoid_repeats: bool,
    /// Raw scores keyed by match position.
    pub scores: BTreeMap<MatchKey, String>,
    /// Last time the session was written.
    pub updated_at: SystemTime,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            pool: Vec::new(),
            team_a: Team::default(),
            team_b: Team::default(),
            rounds: Vec::new(),
            avoid_repeats: true,
            scores: BTreeMap::new(),
            updated_at: SystemTime::now(),
        }
    }
}

impl Session {
    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::A => &mut self.team_a,
            TeamSide::B => &mut self.team_b,
        }
    }

    /// Drop the generated schedule together with the scores typed against it.
    pub fn clear_schedule(&mut self) {
        self.rounds.clear();
        self.scores.clear();
    }

    /// Drop teams and schedule, keeping the pool.
    pub fn clear_teams(&mut self) {
        self.team_a = Team::default();
        self.team_b = Team::default();
        self.clear_schedule();
    }

    /// Return the match at the given position, if it was scheduled.
    pub fn find_match(&self, key: MatchKey) -> Option<&Match> {
        self.rounds
            .get(key.round)
            .and_then(|round| round.matches.get(key.court))
    }

    pub fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }
}

impl From<PairingEntity> for Pairing {
    fn from(value: PairingEntity) -> Self {
        Self {
            forehand: value.forehand.into(),
            backhand: value.backhand.into(),
        }
    }
}

impl From<Pairing> for PairingEntity {
    fn from(value: Pairing) -> Self {
        Self {
            forehand: value.forehand.into(),
            backhand: value.backhand.into(),
        }
    }
}

impl From<MatchEntity> for Match {
    fn from(value: MatchEntity) -> Self {
        Self {
            court: value.court,
            team_a: value.team_a.into(),
            team_b: value.team_b.into(),
        }
    }
}

impl From<Match> for MatchEntity {
    fn from(value: Match) -> Self {
        Self {
            court: value.court,
            team_a: value.team_a.into(),
            team_b: value.team_b.into(),
        }
    }
}

impl From<RoundEntity> for Round {
    fn from(value: RoundEntity) -> Self {
        Self {
            matches: value.matches.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Round> for RoundEntity {
    fn from(value: Round) -> Self {
        Self {
            matches: value.matches.into_iter().map(Into::into).collect(),
        }
    }
}

/// Convert stored score rows back into the keyed map.
pub fn scores_from_entities(scores: Vec<ScoreEntity>) -> BTreeMap<MatchKey, String> {
    scores
        .into_iter()
        .map(|score| (MatchKey::new(score.round, score.court), score.raw))
        .collect()
}

/// Flatten the keyed score map into storable rows, ordered by position.
pub fn scores_to_entities(scores: BTreeMap<MatchKey, String>) -> Vec<ScoreEntity> {
    scores
        .into_iter()
        .map(|(key, raw)| ScoreEntity {
            round: key.round,
            court: key.court,
            raw,
        })
        .collect()
}

impl From<SessionEntity> for Session {
    fn from(value: SessionEntity) -> Self {
        Self {
            pool: value.pool.into_iter().map(Into::into).collect(),
            team_a: Team::new(value.team_a.into_iter().map(Into::into).collect()),
            team_b: Team::new(value.team_b.into_iter().map(Into::into).collect()),
            rounds: value.rounds.into_iter().map(Into::into).collect(),
            avoid_repeats: value.avoid_repeats,
            scores: scores_from_entities(value.scores),
            updated_at: value.updated_at,
        }
    }
}

impl From<Session> for SessionEntity {
    fn from(value: Session) -> Self {
        Self {
            pool: value.pool.into_iter().map(Into::into).collect(),
            team_a: value.team_a.players.into_iter().map(Into::into).collect(),
            team_b: value.team_b.players.into_iter().map(Into::into).collect(),
            rounds: value.rounds.into_iter().map(Into::into).collect(),
            avoid_repeats: value.avoid_repeats,
            scores: scores_to_entities(value.scores),
            updated_at: value.updated_at,
        }
    }
}
