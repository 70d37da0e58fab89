pub mod roster_store;
pub mod session_store;

pub use roster_store::SqliteRosterStore;
pub use session_store::{SessionData, SessionStore};

use crate::error::Result;
use crate::types::Player;
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

/// Where the current session's roster lives between reloads.
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Player>>;
    async fn save(&self, players: &[Player]) -> Result<()>;
}

/// Process-local roster store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryRosterStore {
    players: parking_lot::RwLock<Vec<Player>>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players: parking_lot::RwLock::new(players),
        }
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    async fn load(&self) -> Result<Vec<Player>> {
        Ok(self.players.read().clone())
    }

    async fn save(&self, players: &[Player]) -> Result<()> {
        *self.players.write() = players.to_vec();
        Ok(())
    }
}

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS roster_players (
                session_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                color TEXT NOT NULL,
                code TEXT NOT NULL,
                FOREIGN KEY (session_id) REFERENCES sessions(id),
                PRIMARY KEY (session_id, color)
            )",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::PlayerColor;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_unusable_data_dir_is_io_error() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let result = Storage::new(&blocker.join("nested").join("chestdeal.db")).await;
        assert!(matches!(result, Err(CoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryRosterStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let players = vec![
            Player::new(PlayerColor::Red),
            Player::new(PlayerColor::Green),
        ];
        store.save(&players).await.unwrap();
        assert_eq!(store.load().await.unwrap(), players);

        store.save(&[]).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
