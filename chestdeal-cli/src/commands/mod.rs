pub mod play;
pub mod proposals;
pub mod roster;
pub mod session;

pub use play::run_play;
pub use proposals::show_proposals;
pub use roster::{handle_roster_command, RosterCommands};
pub use session::{handle_session_command, SessionCommands};

use crate::config::CliConfig;
use chestdeal_core::storage::SessionData;
use chestdeal_core::{ChestTransaction, Player, SessionStore, SqliteRosterStore, Storage};
use comfy_table::{presets::UTF8_FULL, Table};
use std::sync::Arc;

/// Everything a command needs: config, the database and which session to use
pub struct Context {
    pub config: CliConfig,
    pub storage: Arc<Storage>,
    pub session: Option<String>,
}

impl Context {
    pub async fn new(config: CliConfig, session: Option<String>) -> anyhow::Result<Self> {
        let storage = Arc::new(Storage::new(&config.database_path()).await?);
        Ok(Self {
            config,
            storage,
            session,
        })
    }

    /// The session named on the command line, else the latest one, else a fresh one
    pub async fn current_session(&self) -> anyhow::Result<SessionData> {
        let sessions = SessionStore::new(&self.storage);

        if let Some(id) = &self.session {
            return Ok(sessions.load_session(id).await?);
        }

        match sessions.latest_session().await? {
            Some(session) => Ok(session),
            None => {
                let session = sessions.create_session().await?;
                println!("Started new session {}", session.id);
                Ok(session)
            }
        }
    }

    pub async fn roster_store(&self) -> anyhow::Result<Arc<SqliteRosterStore>> {
        let session = self.current_session().await?;
        let store = SqliteRosterStore::open(self.storage.clone(), &session.id).await?;
        Ok(Arc::new(store))
    }
}

pub fn players_table(players: &[Player]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Seat", "Color", "Code"]);

    for (seat, player) in players.iter().enumerate() {
        table.add_row(vec![
            (seat + 1).to_string(),
            player.color.to_string(),
            player.code.clone(),
        ]);
    }

    table
}

pub fn log_table<'a>(entries: impl IntoIterator<Item = &'a ChestTransaction>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Time", "Phase", "History"]);

    for entry in entries {
        table.add_row(vec![
            entry
                .recorded_at
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string(),
            entry.phase.to_string(),
            entry.describe(),
        ]);
    }

    table
}
