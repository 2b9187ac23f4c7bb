//! Rotating doubles schedule for two fixed teams.
//!
//! Every round, each team is split into forehand/backhand partnerships by a randomised greedy
//! search. When repeats are avoided, partnerships used in earlier rounds are off limits, and a
//! search that cannot complete within its attempt budget aborts the whole schedule.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::state::roster::{Match, PairKey, Pairing, Player, Role, Round, Team, TeamSide};

/// Default number of reshuffles tried before a round is declared impossible.
pub const DEFAULT_MAX_ATTEMPTS: usize = 4000;

/// Reasons two teams cannot be scheduled as they stand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamsError {
    #[error("teams hold {total} players in total; a multiple of 4 is required")]
    InvalidTotal { total: usize },
    #[error("{side} has {actual} players, expected {expected}")]
    WrongSize {
        side: TeamSide,
        expected: usize,
        actual: usize,
    },
    #[error("{side} has {actual} {role:?} players, expected {expected}")]
    WrongRoleCount {
        side: TeamSide,
        role: Role,
        expected: usize,
        actual: usize,
    },
}

/// Failure of the partnership search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    #[error(
        "could not build round {round} for {team} without repeating a partnership; \
         disable repeat avoidance or request fewer rounds"
    )]
    Exhausted { round: usize, team: TeamSide },
}

/// Tuning for the partnership search.
#[derive(Debug, Clone, Copy)]
pub struct RotationSettings {
    /// Reshuffles tried per team and round before giving up.
    pub max_attempts: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Check that both teams match the quotas implied by their combined size.
pub fn validate_teams(team_a: &Team, team_b: &Team) -> Result<(), TeamsError> {
    let total = team_a.len() + team_b.len();
    if total == 0 || total % 4 != 0 {
        return Err(TeamsError::InvalidTotal { total });
    }

    let team_size = total / 2;
    let role_quota = total / 4;
    for (side, team) in [(TeamSide::A, team_a), (TeamSide::B, team_b)] {
        if team.len() != team_size {
            return Err(TeamsError::WrongSize {
                side,
                expected: team_size,
                actual: team.len(),
            });
        }
        for role in [Role::Forehand, Role::Backhand] {
            let actual = team.count(role);
            if actual != role_quota {
                return Err(TeamsError::WrongRoleCount {
                    side,
                    role,
                    expected: role_quota,
                    actual,
                });
            }
        }
    }

    Ok(())
}

/// Search for a full set of partnerships that avoids every key in `used`.
///
/// Each attempt shuffles both lists and walks the forehands, giving each the first free
/// backhand it has not partnered before. Returns `None` once `max_attempts` attempts failed.
pub fn build_pairs<R: Rng + ?Sized>(
    forehands: &[Player],
    backhands: &[Player],
    used: &HashSet<PairKey>,
    max_attempts: usize,
    rng: &mut R,
) -> Option<Vec<Pairing>> {
    let mut forehands = forehands.to_vec();
    let mut backhands = backhands.to_vec();

    'attempts: for attempt in 1..=max_attempts {
        forehands.shuffle(rng);
        backhands.shuffle(rng);

        let mut taken = vec![false; backhands.len()];
        let mut pairings = Vec::with_capacity(forehands.len());
        for forehand in &forehands {
            let candidate = backhands.iter().enumerate().position(|(index, backhand)| {
                !taken[index] && !used.contains(&PairKey::new(forehand.id, backhand.id))
            });
            let Some(index) = candidate else {
                continue 'attempts;
            };
            taken[index] = true;
            pairings.push(Pairing {
                forehand: forehand.clone(),
                backhand: backhands[index].clone(),
            });
        }

        debug!(attempt, "partnerships found");
        return Some(pairings);
    }

    None
}

/// Generate `round_count` rounds for two validated teams.
///
/// No partial schedule is returned: the first round that cannot be built aborts generation.
pub fn generate<R: Rng + ?Sized>(
    team_a: &Team,
    team_b: &Team,
    round_count: usize,
    avoid_repeats: bool,
    settings: &RotationSettings,
    rng: &mut R,
) -> Result<Vec<Round>, PairingError> {
    let sides = [
        (TeamSide::A, team_a.members(Role::Forehand), team_a.members(Role::Backhand)),
        (TeamSide::B, team_b.members(Role::Forehand), team_b.members(Role::Backhand)),
    ];
    let no_history = HashSet::new();
    let mut used = [HashSet::new(), HashSet::new()];
    let mut rounds = Vec::with_capacity(round_count);

    for round in 1..=round_count {
        let mut per_side: [Vec<Pairing>; 2] = [Vec::new(), Vec::new()];

        for (slot, (side, forehands, backhands)) in sides.iter().enumerate() {
            let constraints = if avoid_repeats { &used[slot] } else { &no_history };
            let Some(mut pairings) =
                build_pairs(forehands, backhands, constraints, settings.max_attempts, rng)
            else {
                warn!(
                    round,
                    team = %side,
                    max_attempts = settings.max_attempts,
                    "partnership search exhausted"
                );
                return Err(PairingError::Exhausted { round, team: *side });
            };

            if avoid_repeats {
                used[slot].extend(pairings.iter().map(Pairing::key));
            }
            pairings.shuffle(rng);
            per_side[slot] = pairings;
        }

        let [side_a, side_b] = per_side;
        let matches = side_a
            .into_iter()
            .zip(side_b)
            .enumerate()
            .map(|(court, (team_a, team_b))| Match {
                court,
                team_a,
                team_b,
            })
            .collect();
        rounds.push(Round { matches });
    }

    info!(rounds = rounds.len(), avoid_repeats, "schedule generated");
    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn team(prefix: &str, per_role: usize) -> Team {
        let forehands =
            (0..per_role).map(|i| Player::new(format!("{prefix}F{i}"), Role::Forehand, 5));
        let backhands =
            (0..per_role).map(|i| Player::new(format!("{prefix}B{i}"), Role::Backhand, 5));
        Team::new(forehands.chain(backhands).collect())
    }

    fn assert_no_repeats(rounds: &[Round]) {
        let mut seen_a = HashSet::new();
        let mut seen_b = HashSet::new();
        for round in rounds {
            for game in &round.matches {
                assert!(seen_a.insert(game.team_a.key()), "team A partnership repeated");
                assert!(seen_b.insert(game.team_b.key()), "team B partnership repeated");
            }
        }
    }

    fn assert_round_shape(rounds: &[Round], team_size: usize) {
        for round in rounds {
            assert_eq!(round.matches.len(), team_size / 2);
            let mut ids_a = HashSet::new();
            let mut ids_b = HashSet::new();
            for (court, game) in round.matches.iter().enumerate() {
                assert_eq!(game.court, court);
                assert_eq!(game.team_a.forehand.role, Role::Forehand);
                assert_eq!(game.team_a.backhand.role, Role::Backhand);
                assert!(ids_a.insert(game.team_a.forehand.id));
                assert!(ids_a.insert(game.team_a.backhand.id));
                assert!(ids_b.insert(game.team_b.forehand.id));
                assert!(ids_b.insert(game.team_b.backhand.id));
            }
        }
    }

    #[test]
    fn validate_teams_checks_quotas() {
        let a = team("A", 2);
        let b = team("B", 2);
        assert_eq!(validate_teams(&a, &b), Ok(()));
        assert_eq!(
            validate_teams(&Team::default(), &Team::default()),
            Err(TeamsError::InvalidTotal { total: 0 })
        );

        let mut short = team("B", 2);
        let moved = short.players.pop().unwrap();
        let mut long = team("A", 2);
        long.push(moved);
        assert_eq!(
            validate_teams(&long, &short),
            Err(TeamsError::WrongSize {
                side: TeamSide::A,
                expected: 4,
                actual: 5
            })
        );

        let mut lopsided = team("A", 2);
        lopsided.players[0].role = Role::Backhand;
        assert_eq!(
            validate_teams(&lopsided, &b),
            Err(TeamsError::WrongRoleCount {
                side: TeamSide::A,
                role: Role::Forehand,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn build_pairs_respects_used_set() {
        let squad = team("A", 2);
        let forehands = squad.members(Role::Forehand);
        let backhands = squad.members(Role::Backhand);
        let mut rng = StdRng::seed_from_u64(5);

        let used = HashSet::from([PairKey::new(forehands[0].id, backhands[0].id)]);
        let pairs = build_pairs(&forehands, &backhands, &used, 100, &mut rng).unwrap();
        let keys = pairs.iter().map(Pairing::key).collect::<HashSet<_>>();
        assert!(keys.contains(&PairKey::new(forehands[0].id, backhands[1].id)));
        assert!(keys.contains(&PairKey::new(forehands[1].id, backhands[0].id)));

        let blocked = HashSet::from([
            PairKey::new(forehands[0].id, backhands[0].id),
            PairKey::new(forehands[0].id, backhands[1].id),
        ]);
        assert!(build_pairs(&forehands, &backhands, &blocked, 100, &mut rng).is_none());
    }

    #[test]
    fn single_round_for_four_player_teams() {
        let mut rng = StdRng::seed_from_u64(9);
        let rounds = generate(
            &team("A", 2),
            &team("B", 2),
            1,
            true,
            &RotationSettings::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(rounds.len(), 1);
        assert_round_shape(&rounds, 4);
    }

    #[test]
    fn third_round_exhausts_four_player_teams() {
        let mut rng = StdRng::seed_from_u64(9);
        let result = generate(
            &team("A", 2),
            &team("B", 2),
            3,
            true,
            &RotationSettings::default(),
            &mut rng,
        );

        assert_eq!(
            result,
            Err(PairingError::Exhausted {
                round: 3,
                team: TeamSide::A
            })
        );
    }

    #[test]
    fn repeats_allowed_when_not_avoided() {
        let mut rng = StdRng::seed_from_u64(9);
        let rounds = generate(
            &team("A", 2),
            &team("B", 2),
            6,
            false,
            &RotationSettings::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(rounds.len(), 6);
        assert_round_shape(&rounds, 4);
    }

    #[test]
    fn larger_teams_never_repeat_partners() {
        let team_a = team("A", 4);
        let team_b = team("B", 4);
        let settings = RotationSettings::default();

        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let rounds = generate(&team_a, &team_b, 4, true, &settings, &mut rng).unwrap();
            assert_eq!(rounds.len(), 4);
            assert_round_shape(&rounds, 8);
            assert_no_repeats(&rounds);
        }
    }

    #[test]
    fn repeated_calls_each_hold_the_invariant() {
        let team_a = team("A", 3);
        let team_b = team("B", 3);
        let settings = RotationSettings::default();
        let mut rng = StdRng::seed_from_u64(21);

        let first = generate(&team_a, &team_b, 2, true, &settings, &mut rng).unwrap();
        let second = generate(&team_a, &team_b, 2, true, &settings, &mut rng).unwrap();
        assert_no_repeats(&first);
        assert_no_repeats(&second);
    }
}
