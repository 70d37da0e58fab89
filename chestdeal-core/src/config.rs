use crate::error::{CoreError, Result};
use crate::types::PlayerColor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Players needed before a game can start
    pub min_players: usize,
    /// Log keeps `log_depth * players - 1` entries
    pub log_depth: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 3,
            log_depth: 4,
        }
    }
}

impl GameConfig {
    pub fn log_capacity(&self, players: usize) -> usize {
        (self.log_depth * players).saturating_sub(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_players < 3 {
            return Err(CoreError::config(
                "At least 3 players are needed for the exchange pattern",
            ));
        }

        if self.min_players > PlayerColor::ALL.len() {
            return Err(CoreError::config(format!(
                "Minimum players cannot exceed the {} available colors",
                PlayerColor::ALL.len()
            )));
        }

        if self.log_depth == 0 {
            return Err(CoreError::config("Log depth must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_capacity(3), 11);
        assert_eq!(config.log_capacity(4), 15);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = GameConfig {
            min_players: 2,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            min_players: 5,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            log_depth: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
