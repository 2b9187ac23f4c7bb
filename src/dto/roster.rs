//! DTO definitions for roster management.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::{validate_player_name, validate_rating},
    state::roster::{Player, Role},
};

/// Player definition submitted when creating or editing a roster entry.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerInput {
    pub name: String,
    pub role: Role,
    /// Skill rating between 1 and 10.
    pub rating: u8,
}

impl Validate for PlayerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_player_name(&self.name) {
            errors.add("name", e);
        }
        if let Err(e) = validate_rating(self.rating) {
            errors.add("rating", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Public projection of a player.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub rating: u8,
}

impl From<Player> for PlayerSummary {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            role: player.role,
            rating: player.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_reports_every_invalid_field() {
        let input = PlayerInput {
            name: " ".into(),
            role: Role::Backhand,
            rating: 12,
        };

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("rating"));
    }

    #[test]
    fn role_uses_snake_case() {
        let input: PlayerInput =
            serde_json::from_str(r#"{ "name": "Ana", "role": "forehand", "rating": 7 }"#).unwrap();
        assert_eq!(input.role, Role::Forehand);
        assert!(input.validate().is_ok());
    }
}
