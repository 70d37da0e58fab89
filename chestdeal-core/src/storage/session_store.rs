use crate::error::{CoreError, Result};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

pub struct SessionStore<'a> {
    storage: &'a Storage,
}

impl<'a> SessionStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn create_session(&self) -> Result<SessionData> {
        let session = SessionData {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };

        let conn = self.storage.get_connection().await;
        conn.execute(
            "INSERT INTO sessions (id, created_at) VALUES (?1, ?2)",
            params![session.id, session.created_at.timestamp()],
        )?;

        tracing::info!("Created session {}", session.id);
        Ok(session)
    }

    pub async fn load_session(&self, session_id: &str) -> Result<SessionData> {
        let conn = self.storage.get_connection().await;

        let session = conn
            .query_row(
                "SELECT id, created_at FROM sessions WHERE id = ?1",
                params![session_id],
                |row| {
                    Ok(SessionData {
                        id: row.get(0)?,
                        created_at: DateTime::from_timestamp(row.get(1)?, 0)
                            .unwrap_or_else(Utc::now),
                    })
                },
            )
            .optional()?;

        session.ok_or_else(|| CoreError::SessionNotFound {
            id: session_id.to_string(),
        })
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionData>> {
        let conn = self.storage.get_connection().await;

        let mut stmt =
            conn.prepare("SELECT id, created_at FROM sessions ORDER BY created_at DESC, rowid DESC")?;

        let session_iter = stmt.query_map([], |row| {
            Ok(SessionData {
                id: row.get(0)?,
                created_at: DateTime::from_timestamp(row.get(1)?, 0)
                    .unwrap_or_else(Utc::now),
            })
        })?;

        let mut sessions = Vec::new();
        for session in session_iter {
            sessions.push(session?);
        }

        Ok(sessions)
    }

    /// Most recently created session, if any
    pub async fn latest_session(&self) -> Result<Option<SessionData>> {
        Ok(self.list_sessions().await?.into_iter().next())
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let conn = self.storage.get_connection().await;

        // Delete in order due to foreign key constraints
        conn.execute(
            "DELETE FROM roster_players WHERE session_id = ?1",
            params![session_id],
        )?;
        let deleted = conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])?;

        if deleted == 0 {
            return Err(CoreError::SessionNotFound {
                id: session_id.to_string(),
            });
        }

        tracing::info!("Deleted session {}", session_id);
        Ok(())
    }
}
