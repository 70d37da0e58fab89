//! Deal with the Devil - round engine
//!
//! Players pass chests around a table in four phases: give per the first
//! round of proposals, return to owners, give per the second round, return
//! again. Every scan of a chest moves the game forward by one step and tells
//! the operator where that chest goes.

pub mod engine;
pub mod error;
pub mod log;
pub mod proposal;
pub mod roster;
pub mod table;

pub use engine::{RoundEngine, RoundSnapshot};
pub use error::{GameError, Result};
pub use log::TransactionLog;
pub use proposal::{generate_proposals, shuffle_players, ProposalPool, ProposalRounds};
pub use roster::{check_roster, RosterChange, RosterManager};
pub use table::{GameStage, GameTable, TableSnapshot};

use chestdeal_core::{CodeReader, GameConfig, RosterStore};
use std::sync::Arc;

/// Open a table for the roster held by `store`
pub async fn open_table(
    store: Arc<dyn RosterStore>,
    reader: Arc<dyn CodeReader>,
    config: GameConfig,
) -> Result<GameTable> {
    config.validate()?;
    let roster = RosterManager::load(store, &config).await?;
    Ok(GameTable::new(roster, reader, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chestdeal_core::{PlayerColor, ScriptedReader, SessionStore, SqliteRosterStore, Storage};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_roster_survives_reload_of_session() {
        let temp_dir = tempdir().unwrap();
        let storage = Arc::new(
            Storage::new(&temp_dir.path().join("chestdeal.db"))
                .await
                .unwrap(),
        );
        let session = SessionStore::new(&storage).create_session().await.unwrap();
        let reader = Arc::new(ScriptedReader::new());

        let registered = {
            let store = Arc::new(
                SqliteRosterStore::open(storage.clone(), &session.id)
                    .await
                    .unwrap(),
            );
            let table = open_table(store, reader.clone(), GameConfig::default())
                .await
                .unwrap();
            for color in [PlayerColor::Green, PlayerColor::Red, PlayerColor::Yellow] {
                table.toggle(color).await.unwrap();
            }
            table.players().await
        };

        let store = Arc::new(
            SqliteRosterStore::open(storage.clone(), &session.id)
                .await
                .unwrap(),
        );
        let table = open_table(store, reader.clone(), GameConfig::default())
            .await
            .unwrap();
        assert_eq!(table.players().await, registered);
        assert!(table.can_start().await);

        let other = SessionStore::new(&storage).create_session().await.unwrap();
        let store = Arc::new(SqliteRosterStore::open(storage, &other.id).await.unwrap());
        let table = open_table(store, reader, GameConfig::default())
            .await
            .unwrap();
        assert!(table.players().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            min_players: 1,
            ..GameConfig::default()
        };
        let result = open_table(
            Arc::new(chestdeal_core::MemoryRosterStore::new()),
            Arc::new(ScriptedReader::new()),
            config,
        )
        .await;
        assert!(matches!(result, Err(GameError::Core(_))));
    }

    #[tokio::test]
    async fn test_snapshot_serializes() {
        let reader = Arc::new(ScriptedReader::new());
        let table = open_table(
            Arc::new(chestdeal_core::MemoryRosterStore::new()),
            reader.clone(),
            GameConfig::default(),
        )
        .await
        .unwrap();
        for color in [PlayerColor::Red, PlayerColor::Blue, PlayerColor::Green] {
            table.toggle(color).await.unwrap();
        }
        table.start().await.unwrap();
        reader.push_code(table.players().await[1].code.clone());
        table.scan().await.unwrap();

        let json = serde_json::to_value(table.snapshot().await).unwrap();
        assert_eq!(json["stage"], "Playing");
        assert_eq!(json["round"]["phase"], "MakeFirstProposals");
        assert_eq!(json["round"]["move_count"], 1);
        assert_eq!(json["round"]["log"][0]["from"]["color"], "BLUE");
    }
}
