//! chestdeal core - shared building blocks for the Deal with the Devil chest game
//!
//! Holds the data model (players, proposals, phases, log entries), the
//! scanner capability and the session-scoped roster storage that the game
//! crate and the operator CLI build on.

pub mod config;
pub mod error;
pub mod reader;
pub mod storage;
pub mod types;

pub use config::GameConfig;
pub use error::{CoreError, Result};
pub use reader::{CodeReader, ScriptedReader};
pub use storage::{MemoryRosterStore, RosterStore, SessionStore, SqliteRosterStore, Storage};
pub use types::{
    ChestAction, ChestTransaction, Instruction, Phase, Player, PlayerColor, Proposal,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_session_roster_creation() {
        let temp_dir = tempdir().unwrap();
        let storage = Arc::new(
            Storage::new(&temp_dir.path().join("chestdeal.db"))
                .await
                .unwrap(),
        );

        let session = SessionStore::new(&storage).create_session().await.unwrap();
        let store = SqliteRosterStore::open(storage.clone(), &session.id)
            .await
            .unwrap();
        assert_eq!(store.session_id(), session.id);
        assert!(store.load().await.unwrap().is_empty());
    }
}
