use chestdeal_core::GameConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
    pub game: GameConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            verbose: false,
            game: GameConfig::default(),
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chestdeal")
}

impl CliConfig {
    /// Read `config.json` from the data dir, falling back to defaults when absent
    pub async fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let path = data_dir.join(CONFIG_FILE);

        let mut config = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str::<CliConfig>(&content)?
        } else {
            CliConfig::default()
        };

        config.data_dir = data_dir.to_path_buf();
        config.game.validate()?;
        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("chestdeal.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_defaults_without_file() {
        let temp_dir = tempdir().unwrap();
        let config = CliConfig::load(temp_dir.path()).await.unwrap();

        assert_eq!(config.data_dir, temp_dir.path());
        assert_eq!(config.game, GameConfig::default());
        assert!(!config.verbose);
        assert_eq!(config.database_path(), temp_dir.path().join("chestdeal.db"));
    }

    #[tokio::test]
    async fn test_partial_file_and_validation() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);

        std::fs::write(&path, r#"{ "verbose": true, "game": { "min_players": 4, "log_depth": 2 } }"#)
            .unwrap();
        let config = CliConfig::load(temp_dir.path()).await.unwrap();
        assert!(config.verbose);
        assert_eq!(config.game.min_players, 4);
        assert_eq!(config.game.log_capacity(4), 7);

        std::fs::write(&path, r#"{ "game": { "min_players": 9, "log_depth": 4 } }"#).unwrap();
        assert!(CliConfig::load(temp_dir.path()).await.is_err());
    }
}
