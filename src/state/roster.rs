use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{PlayerEntity, RoleEntity};

/// Lowest rating a player can carry.
pub const MIN_RATING: u8 = 1;
/// Highest rating a player can carry.
pub const MAX_RATING: u8 = 10;

/// Court side a player specialises in. Every doubles pairing mixes one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Right-side player, the one walked first when building pairings.
    Forehand,
    /// Left-side player, split first when balancing teams.
    Backhand,
}

/// Roster member as used by the balancing and pairing runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Preferred court side.
    pub role: Role,
    /// Skill rating in `1..=10`.
    pub rating: u8,
}

impl Player {
    /// Build a player with a freshly allocated identifier.
    pub fn new(name: impl Into<String>, role: Role, rating: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role,
            rating,
        }
    }
}

/// Which of the two session teams an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    /// First team.
    A,
    /// Second team.
    B,
}

impl TeamSide {
    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::A => f.write_str("team A"),
            TeamSide::B => f.write_str("team B"),
        }
    }
}

/// Ordered collection of players playing on the same side for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Sum of the members' ratings.
    pub fn rating_sum(&self) -> u32 {
        self.players.iter().map(|player| u32::from(player.rating)).sum()
    }

    /// Number of members playing the given role.
    pub fn count(&self, role: Role) -> usize {
        self.players
            .iter()
            .filter(|player| player.role == role)
            .count()
    }

    /// Members playing the given role, in team order.
    pub fn members(&self, role: Role) -> Vec<Player> {
        self.players
            .iter()
            .filter(|player| player.role == role)
            .cloned()
            .collect()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.players.iter().any(|player| player.id == id)
    }

    pub fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Remove a member by id, returning it when it was present.
    pub fn remove(&mut self, id: Uuid) -> Option<Player> {
        let index = self.players.iter().position(|player| player.id == id)?;
        Some(self.players.remove(index))
    }
}

/// Unordered identity of a partnership, used to detect repeats across rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(Uuid, Uuid);

impl PairKey {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Doubles partnership of one forehand and one backhand from the same team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub forehand: Player,
    pub backhand: Player,
}

impl Pairing {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.forehand.id, self.backhand.id)
    }

    pub fn rating_sum(&self) -> u32 {
        u32::from(self.forehand.rating) + u32::from(self.backhand.rating)
    }
}

/// One court's contest within a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Zero-based court index.
    pub court: usize,
    pub team_a: Pairing,
    pub team_b: Pairing,
}

/// One scheduling slot with one match per court.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub matches: Vec<Match>,
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            role: value.role.into(),
            rating: value.rating,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            role: value.role.into(),
            rating: value.rating,
        }
    }
}

impl From<RoleEntity> for Role {
    fn from(value: RoleEntity) -> Self {
        match value {
            RoleEntity::Forehand => Role::Forehand,
            RoleEntity::Backhand => Role::Backhand,
        }
    }
}

impl From<Role> for RoleEntity {
    fn from(value: Role) -> Self {
        match value {
            Role::Forehand => RoleEntity::Forehand,
            Role::Backhand => RoleEntity::Backhand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_unordered() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
    }

    #[test]
    fn team_remove_returns_member() {
        let player = Player::new("Ana", Role::Forehand, 7);
        let id = player.id;
        let mut team = Team::new(vec![player, Player::new("Bea", Role::Backhand, 5)]);

        assert_eq!(team.rating_sum(), 12);
        assert_eq!(team.remove(id).map(|p| p.name), Some("Ana".to_string()));
        assert!(!team.contains(id));
        assert_eq!(team.count(Role::Backhand), 1);
        assert!(team.remove(id).is_none());
    }
}
