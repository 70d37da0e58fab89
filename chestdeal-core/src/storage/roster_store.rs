use crate::error::Result;
use crate::storage::{RosterStore, SessionStore, Storage};
use crate::types::{Player, PlayerColor};
use async_trait::async_trait;
use rusqlite::params;
use std::sync::Arc;

/// Roster rows for a single session. Other sessions never see them.
pub struct SqliteRosterStore {
    storage: Arc<Storage>,
    session_id: String,
}

impl SqliteRosterStore {
    /// Bind to an existing session; fails with `SessionNotFound` otherwise
    pub async fn open(storage: Arc<Storage>, session_id: &str) -> Result<Self> {
        let session = SessionStore::new(&storage).load_session(session_id).await?;

        Ok(Self {
            storage,
            session_id: session.id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[async_trait]
impl RosterStore for SqliteRosterStore {
    async fn load(&self) -> Result<Vec<Player>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT color, code FROM roster_players
             WHERE session_id = ?1 ORDER BY position ASC",
        )?;

        let rows = stmt.query_map(params![self.session_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut players = Vec::new();
        for row in rows {
            let (color, code) = row?;
            let color: PlayerColor = color.parse()?;
            players.push(Player { code, color });
        }

        Ok(players)
    }

    async fn save(&self, players: &[Player]) -> Result<()> {
        let mut conn = self.storage.get_connection().await;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM roster_players WHERE session_id = ?1",
            params![self.session_id],
        )?;

        for (position, player) in players.iter().enumerate() {
            tx.execute(
                "INSERT INTO roster_players (session_id, position, color, code)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    self.session_id,
                    position as i64,
                    player.color.as_str(),
                    player.code,
                ],
            )?;
        }

        tx.commit()?;

        tracing::debug!(
            "Saved {} players for session {}",
            players.len(),
            self.session_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tempfile::tempdir;

    async fn storage_in(dir: &std::path::Path) -> Arc<Storage> {
        Arc::new(Storage::new(&dir.join("chestdeal.db")).await.unwrap())
    }

    #[tokio::test]
    async fn test_roster_is_scoped_to_session() {
        let temp_dir = tempdir().unwrap();
        let storage = storage_in(temp_dir.path()).await;
        let sessions = SessionStore::new(&storage);
        let first = sessions.create_session().await.unwrap();
        let second = sessions.create_session().await.unwrap();

        let store_a = SqliteRosterStore::open(storage.clone(), &first.id)
            .await
            .unwrap();
        let store_b = SqliteRosterStore::open(storage.clone(), &second.id)
            .await
            .unwrap();

        let players = vec![
            Player::new(PlayerColor::Yellow),
            Player::new(PlayerColor::Red),
            Player::new(PlayerColor::Blue),
        ];
        store_a.save(&players).await.unwrap();

        assert_eq!(store_a.load().await.unwrap(), players);
        assert!(store_b.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_roster_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let session_id = {
            let storage = storage_in(temp_dir.path()).await;
            let session = SessionStore::new(&storage).create_session().await.unwrap();
            let store = SqliteRosterStore::open(storage, &session.id).await.unwrap();
            store
                .save(&[Player::with_code(PlayerColor::Green, "token-g")])
                .await
                .unwrap();
            session.id
        };

        let storage = storage_in(temp_dir.path()).await;
        let store = SqliteRosterStore::open(storage, &session_id).await.unwrap();
        let players = store.load().await.unwrap();
        assert_eq!(players, vec![Player::with_code(PlayerColor::Green, "token-g")]);

        store.save(&[]).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_unknown_session() {
        let temp_dir = tempdir().unwrap();
        let storage = storage_in(temp_dir.path()).await;

        let result = SqliteRosterStore::open(storage, "missing").await;
        assert!(matches!(result, Err(CoreError::SessionNotFound { .. })));
    }
}
