//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::state::roster::{MAX_RATING, MIN_RATING};

/// Longest display name accepted for a player.
pub const MAX_NAME_LENGTH: usize = 64;

/// Validates that a player name is not blank and fits the display limit.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Ana")   // Ok
/// validate_player_name("   ")   // Err - blank
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must not be blank".into());
        return Err(err);
    }

    let length = name.chars().count();
    if length > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {MAX_NAME_LENGTH} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a rating lies in the accepted `1..=10` scale.
pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        let mut err = ValidationError::new("rating_range");
        err.message = Some(
            format!("Rating must be between {MIN_RATING} and {MAX_RATING} (got {rating})").into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name() {
        assert!(validate_player_name("Ana").is_ok());
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("  \t").is_err());
        assert!(validate_player_name(&"x".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_player_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(10).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(11).is_err());
    }
}
