//! Split a session pool into two teams with equal role counts and close rating sums.
//!
//! The strongest four players of each role are split first using the two "anchor" splits that
//! pair the best player with either the third or the fourth best. Everyone else is shuffled and
//! placed greedily on the side that keeps the rating sums closest, with a small random jitter so
//! repeated calls on the same pool do not always produce the same teams.

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;
use tracing::{debug, warn};

use crate::state::roster::{Player, Role, Team};

/// Players per role that get split with the anchor strategy.
const TOP_GROUP_SIZE: usize = 4;
/// Candidate halves for the top group, as indices into the rating-sorted group.
const TOP_SPLITS: [([usize; 2], [usize; 2]); 2] = [([0, 2], [1, 3]), ([0, 3], [1, 2])];
/// Rating spread at or under which the forehand split gets randomised.
const FLAT_SPREAD: u8 = 1;
/// Amplitude of the noise added when scoring greedy placements.
const JITTER: f64 = 0.1;
/// Default probability of ignoring the best forehand split when ratings are flat.
pub const DEFAULT_BIAS_OVERRIDE_PROBABILITY: f64 = 0.35;

/// Reasons a pool cannot be split into two teams.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("the pool is empty")]
    Empty,
    #[error("pool size must be a multiple of 4 (got {size})")]
    NotMultipleOfFour { size: usize },
    #[error("pool needs as many forehands as backhands (got {forehands} forehands, {backhands} backhands)")]
    UnevenRoles { forehands: usize, backhands: usize },
}

/// Team sizing derived from a valid pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolShape {
    /// Players per team.
    pub team_size: usize,
    /// Players of each role per team.
    pub role_quota: usize,
}

impl PoolShape {
    fn from_total(total: usize) -> Self {
        Self {
            team_size: total / 2,
            role_quota: total / 4,
        }
    }
}

/// Check that the pool splits evenly into two teams of mixed roles.
pub fn validate_pool(pool: &[Player]) -> Result<PoolShape, PoolError> {
    if pool.is_empty() {
        return Err(PoolError::Empty);
    }
    if pool.len() % 4 != 0 {
        return Err(PoolError::NotMultipleOfFour { size: pool.len() });
    }

    let forehands = pool
        .iter()
        .filter(|player| player.role == Role::Forehand)
        .count();
    let backhands = pool.len() - forehands;
    if forehands != backhands {
        return Err(PoolError::UnevenRoles {
            forehands,
            backhands,
        });
    }

    Ok(PoolShape::from_total(pool.len()))
}

/// Tuning knobs for the balancing heuristic.
#[derive(Debug, Clone, Copy)]
pub struct BalanceSettings {
    /// Probability of a uniform pick between the two forehand splits when ratings are flat.
    pub bias_override_probability: f64,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            bias_override_probability: DEFAULT_BIAS_OVERRIDE_PROBABILITY,
        }
    }
}

/// Both teams produced by a balancing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedTeams {
    pub team_a: Team,
    pub team_b: Team,
}

impl BalancedTeams {
    /// Absolute difference between the teams' rating sums.
    pub fn rating_gap(&self) -> u32 {
        self.team_a.rating_sum().abs_diff(self.team_b.rating_sum())
    }
}

/// Partition a validated pool into two balanced teams.
///
/// The pool must satisfy [`validate_pool`]; on other input the role quotas still hold for every
/// placed player but some players may be left out.
pub fn balance<R: Rng + ?Sized>(
    pool: &[Player],
    settings: &BalanceSettings,
    rng: &mut R,
) -> BalancedTeams {
    let shape = PoolShape::from_total(pool.len());
    let mut team_a = Team::default();
    let mut team_b = Team::default();

    let backhands = sorted_by_rating(pool, Role::Backhand);
    let forehands = sorted_by_rating(pool, Role::Forehand);
    let (top_backhands, rest_backhands) = split_top(&backhands);
    let (top_forehands, rest_forehands) = split_top(&forehands);

    if top_backhands.len() < TOP_GROUP_SIZE {
        distribute_alternately(top_backhands, &mut team_a, &mut team_b);
    } else {
        let scores = TOP_SPLITS.map(|(first, second)| {
            group_sum(top_backhands, &first).abs_diff(group_sum(top_backhands, &second))
        });
        let choice = pick_split(scores, scores[0] == scores[1], rng);
        assign_split(top_backhands, choice, &mut team_a, &mut team_b);
    }

    if top_forehands.len() < TOP_GROUP_SIZE {
        distribute_alternately(top_forehands, &mut team_a, &mut team_b);
    } else {
        let (sum_a, sum_b) = (team_a.rating_sum(), team_b.rating_sum());
        let scores = TOP_SPLITS.map(|(first, second)| {
            (sum_a + group_sum(top_forehands, &first))
                .abs_diff(sum_b + group_sum(top_forehands, &second))
        });

        let spread = top_forehands[0].rating - top_forehands[TOP_GROUP_SIZE - 1].rating;
        let random_bias = spread <= FLAT_SPREAD;
        let mut choice = pick_split(scores, random_bias && scores[0] == scores[1], rng);
        if random_bias && rng.random_bool(settings.bias_override_probability) {
            choice = rng.random_range(0..TOP_SPLITS.len());
            debug!(choice, "flat forehand ratings; split picked at random");
        }
        assign_split(top_forehands, choice, &mut team_a, &mut team_b);
    }

    let mut rest = rest_backhands
        .iter()
        .chain(rest_forehands.iter())
        .cloned()
        .collect::<Vec<_>>();
    rest.shuffle(rng);

    for player in rest {
        let fits_a = has_room(&team_a, player.role, shape);
        let fits_b = has_room(&team_b, player.role, shape);

        match (fits_a, fits_b) {
            (true, true) => {
                let (sum_a, sum_b) = (
                    f64::from(team_a.rating_sum()),
                    f64::from(team_b.rating_sum()),
                );
                let rating = f64::from(player.rating);
                let score_a = (sum_a + rating - sum_b).abs() + rng.random_range(-JITTER..=JITTER);
                let score_b = (sum_a - sum_b - rating).abs() + rng.random_range(-JITTER..=JITTER);
                if score_a <= score_b {
                    team_a.push(player);
                } else {
                    team_b.push(player);
                }
            }
            (true, false) => team_a.push(player),
            (false, true) => team_b.push(player),
            (false, false) => {
                warn!(
                    player = %player.id,
                    name = %player.name,
                    "no team has room left; player skipped"
                );
            }
        }
    }

    BalancedTeams { team_a, team_b }
}

fn sorted_by_rating(pool: &[Player], role: Role) -> Vec<Player> {
    let mut players = pool
        .iter()
        .filter(|player| player.role == role)
        .cloned()
        .collect::<Vec<_>>();
    players.sort_by(|a, b| b.rating.cmp(&a.rating));
    players
}

fn split_top(players: &[Player]) -> (&[Player], &[Player]) {
    players.split_at(players.len().min(TOP_GROUP_SIZE))
}

fn group_sum(group: &[Player], indices: &[usize; 2]) -> u32 {
    indices
        .iter()
        .map(|&index| u32::from(group[index].rating))
        .sum()
}

/// Index of the split with the smaller score; ties go to a coin flip when `random_tie` is set.
fn pick_split<R: Rng + ?Sized>(scores: [u32; 2], random_tie: bool, rng: &mut R) -> usize {
    if random_tie {
        rng.random_range(0..TOP_SPLITS.len())
    } else if scores[1] < scores[0] {
        1
    } else {
        0
    }
}

fn assign_split(group: &[Player], choice: usize, team_a: &mut Team, team_b: &mut Team) {
    let (first, second) = TOP_SPLITS[choice];
    for index in first {
        team_a.push(group[index].clone());
    }
    for index in second {
        team_b.push(group[index].clone());
    }
}

fn distribute_alternately(group: &[Player], team_a: &mut Team, team_b: &mut Team) {
    for (index, player) in group.iter().enumerate() {
        if index % 2 == 0 {
            team_a.push(player.clone());
        } else {
            team_b.push(player.clone());
        }
    }
}

fn has_room(team: &Team, role: Role, shape: PoolShape) -> bool {
    team.len() < shape.team_size && team.count(role) < shape.role_quota
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn pool(forehands: &[u8], backhands: &[u8]) -> Vec<Player> {
        forehands
            .iter()
            .enumerate()
            .map(|(i, &rating)| Player::new(format!("F{i}"), Role::Forehand, rating))
            .chain(
                backhands
                    .iter()
                    .enumerate()
                    .map(|(i, &rating)| Player::new(format!("B{i}"), Role::Backhand, rating)),
            )
            .collect()
    }

    fn assert_quotas(teams: &BalancedTeams, total: usize) {
        for team in [&teams.team_a, &teams.team_b] {
            assert_eq!(team.len(), total / 2);
            assert_eq!(team.count(Role::Forehand), total / 4);
            assert_eq!(team.count(Role::Backhand), total / 4);
        }
    }

    #[test]
    fn validate_pool_rejects_bad_sizes() {
        assert_eq!(validate_pool(&[]), Err(PoolError::Empty));
        assert_eq!(
            validate_pool(&pool(&[5, 5, 5], &[5, 5, 5])),
            Err(PoolError::NotMultipleOfFour { size: 6 })
        );
        assert_eq!(
            validate_pool(&pool(&[5, 5, 5], &[5])),
            Err(PoolError::UnevenRoles {
                forehands: 3,
                backhands: 1
            })
        );
        assert_eq!(
            validate_pool(&pool(&[5, 5], &[5, 5])),
            Ok(PoolShape {
                team_size: 2,
                role_quota: 1
            })
        );
    }

    #[test]
    fn eight_player_pool_splits_two_and_two() {
        let players = pool(&[9, 7, 5, 3], &[8, 6, 4, 2]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let teams = balance(&players, &BalanceSettings::default(), &mut rng);
            assert_quotas(&teams, 8);
        }
    }

    #[test]
    fn anchor_splits_keep_gap_small() {
        // Backhands split 8+2 / 6+4 and forehands 9+3 / 7+5.
        let players = pool(&[9, 7, 5, 3], &[8, 6, 4, 2]);
        let mut rng = StdRng::seed_from_u64(11);

        let teams = balance(&players, &BalanceSettings::default(), &mut rng);
        assert_eq!(teams.rating_gap(), 0);
        assert_eq!(teams.team_a.rating_sum(), 22);
    }

    #[test]
    fn every_pool_size_respects_quotas() {
        let mut rng = StdRng::seed_from_u64(3);
        for per_role in [2usize, 4, 6, 8, 10] {
            let forehands = (0..per_role)
                .map(|_| rng.random_range(1..=10))
                .collect::<Vec<u8>>();
            let backhands = (0..per_role)
                .map(|_| rng.random_range(1..=10))
                .collect::<Vec<u8>>();
            let players = pool(&forehands, &backhands);
            validate_pool(&players).unwrap();

            let teams = balance(&players, &BalanceSettings::default(), &mut rng);
            assert_quotas(&teams, players.len());

            let mut ids = teams
                .team_a
                .players
                .iter()
                .chain(teams.team_b.players.iter())
                .map(|player| player.id)
                .collect::<Vec<_>>();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), players.len());
        }
    }

    #[test]
    fn flat_ratings_still_vary_between_runs() {
        let players = pool(&[5, 5, 5, 5, 4, 6], &[5, 5, 5, 5, 6, 4]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let teams = balance(&players, &BalanceSettings::default(), &mut rng);
            assert_quotas(&teams, 12);
            let mut names = teams
                .team_a
                .players
                .iter()
                .map(|player| player.name.clone())
                .collect::<Vec<_>>();
            names.sort();
            seen.insert(names);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn four_player_pool_alternates() {
        let players = pool(&[6, 3], &[7, 2]);
        let mut rng = StdRng::seed_from_u64(1);

        let teams = balance(&players, &BalanceSettings::default(), &mut rng);
        assert_quotas(&teams, 4);
        assert_eq!(teams.team_a.rating_sum(), 13);
        assert_eq!(teams.team_b.rating_sum(), 5);
    }
}
