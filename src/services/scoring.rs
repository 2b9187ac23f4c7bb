//! Score parsing and weighted point aggregation for a session.
//!
//! A court's score is typed as two digits, Team A first, each between 0 and 7 games. The team
//! with more games wins the match and earns the round weight, which grows with the round's
//! 1-based position so later rounds count more.

use std::collections::BTreeMap;

use crate::state::{
    roster::{Round, TeamSide},
    session::MatchKey,
};

/// Highest game count accepted for one side of a match.
pub const MAX_GAMES: u8 = 7;
/// Number of digits making up a complete score.
const SCORE_DIGITS: usize = 2;

/// Parsed games won by each team on one court.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub team_a: u8,
    pub team_b: u8,
}

impl Score {
    /// Winning side, or `None` while both sides show the same count.
    pub fn winner(&self) -> Option<TeamSide> {
        match self.team_a.cmp(&self.team_b) {
            std::cmp::Ordering::Greater => Some(TeamSide::A),
            std::cmp::Ordering::Less => Some(TeamSide::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Keep only digits in `0..=7`, at most two of them.
pub fn sanitize_score(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.to_digit(10).is_some_and(|d| d <= u32::from(MAX_GAMES)))
        .take(SCORE_DIGITS)
        .collect()
}

/// Parse a raw score once both digits are present.
pub fn parse_score(raw: &str) -> Option<Score> {
    let digits = sanitize_score(raw)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u8)
        .collect::<Vec<_>>();

    match digits.as_slice() {
        [team_a, team_b] => Some(Score {
            team_a: *team_a,
            team_b: *team_b,
        }),
        _ => None,
    }
}

/// Points awarded for a match won in the round at `round_index` (zero-based).
pub fn round_weight(round_index: usize) -> u32 {
    round_index as u32 + 1
}

/// Points collected by each team within one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTally {
    /// Zero-based round index.
    pub round: usize,
    pub weight: u32,
    pub points_a: u32,
    pub points_b: u32,
}

/// Overall result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    TeamA,
    TeamB,
    Draw,
}

/// Per-round and total points for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTally {
    pub rounds: Vec<RoundTally>,
    pub total_a: u32,
    pub total_b: u32,
}

impl SessionTally {
    pub fn outcome(&self) -> SessionOutcome {
        match self.total_a.cmp(&self.total_b) {
            std::cmp::Ordering::Greater => SessionOutcome::TeamA,
            std::cmp::Ordering::Less => SessionOutcome::TeamB,
            std::cmp::Ordering::Equal => SessionOutcome::Draw,
        }
    }
}

/// Aggregate the scores typed for the scheduled matches.
///
/// Scores recorded for positions that are not part of `rounds` are ignored, as are scores that
/// are incomplete or level.
pub fn tally(rounds: &[Round], scores: &BTreeMap<MatchKey, String>) -> SessionTally {
    let rounds = rounds
        .iter()
        .enumerate()
        .map(|(index, round)| {
            let weight = round_weight(index);
            let (points_a, points_b) = round.matches.iter().fold((0, 0), |(a, b), game| {
                let winner = scores
                    .get(&MatchKey::new(index, game.court))
                    .and_then(|raw| parse_score(raw))
                    .and_then(|score| score.winner());
                match winner {
                    Some(TeamSide::A) => (a + weight, b),
                    Some(TeamSide::B) => (a, b + weight),
                    None => (a, b),
                }
            });
            RoundTally {
                round: index,
                weight,
                points_a,
                points_b,
            }
        })
        .collect::<Vec<_>>();

    let total_a = rounds.iter().map(|round| round.points_a).sum();
    let total_b = rounds.iter().map(|round| round.points_b).sum();

    SessionTally {
        rounds,
        total_a,
        total_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::roster::{Match, Pairing, Player, Role};

    fn pairing() -> Pairing {
        Pairing {
            forehand: Player::new("F", Role::Forehand, 5),
            backhand: Player::new("B", Role::Backhand, 5),
        }
    }

    fn schedule(rounds: usize, courts: usize) -> Vec<Round> {
        (0..rounds)
            .map(|_| Round {
                matches: (0..courts)
                    .map(|court| Match {
                        court,
                        team_a: pairing(),
                        team_b: pairing(),
                    })
                    .collect(),
            })
            .collect()
    }

    #[test]
    fn sanitize_drops_out_of_range_digits() {
        assert_eq!(sanitize_score("63"), "63");
        assert_eq!(sanitize_score("9 6-8x3"), "63");
        assert_eq!(sanitize_score("7777"), "77");
        assert_eq!(sanitize_score("89"), "");
    }

    #[test]
    fn parse_requires_two_digits() {
        assert_eq!(parse_score("6"), None);
        assert_eq!(
            parse_score("6-3"),
            Some(Score {
                team_a: 6,
                team_b: 3
            })
        );
    }

    #[test]
    fn winner_follows_the_higher_digit() {
        assert_eq!(parse_score("63").and_then(|s| s.winner()), Some(TeamSide::A));
        assert_eq!(parse_score("36").and_then(|s| s.winner()), Some(TeamSide::B));
        assert_eq!(parse_score("44").and_then(|s| s.winner()), None);
    }

    #[test]
    fn later_rounds_weigh_more() {
        let rounds = schedule(3, 2);
        let scores = BTreeMap::from([
            (MatchKey::new(0, 0), "63".to_string()),
            (MatchKey::new(0, 1), "36".to_string()),
            (MatchKey::new(1, 0), "44".to_string()),
            (MatchKey::new(1, 1), "61".to_string()),
            (MatchKey::new(2, 0), "26".to_string()),
            (MatchKey::new(2, 1), "5".to_string()),
        ]);

        let tally = tally(&rounds, &scores);

        assert_eq!(
            tally.rounds,
            vec![
                RoundTally {
                    round: 0,
                    weight: 1,
                    points_a: 1,
                    points_b: 1
                },
                RoundTally {
                    round: 1,
                    weight: 2,
                    points_a: 2,
                    points_b: 0
                },
                RoundTally {
                    round: 2,
                    weight: 3,
                    points_a: 0,
                    points_b: 3
                },
            ]
        );
        assert_eq!((tally.total_a, tally.total_b), (3, 4));
        assert_eq!(tally.outcome(), SessionOutcome::TeamB);
    }

    #[test]
    fn equal_totals_are_a_draw() {
        let rounds = schedule(1, 2);
        let scores = BTreeMap::from([
            (MatchKey::new(0, 0), "60".to_string()),
            (MatchKey::new(0, 1), "06".to_string()),
            (MatchKey::new(4, 0), "60".to_string()),
        ]);

        let tally = tally(&rounds, &scores);

        assert_eq!((tally.total_a, tally.total_b), (1, 1));
        assert_eq!(tally.outcome(), SessionOutcome::Draw);
    }
}
