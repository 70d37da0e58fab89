use super::{players_table, Context};
use chestdeal_core::{RosterStore, SessionStore, SqliteRosterStore};
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a fresh session with an empty roster
    New,
    /// List all sessions
    List,
    /// Show a session and its roster
    Show {
        /// Session ID (defaults to the current session)
        id: Option<String>,
    },
    /// Delete a session and its roster
    Delete {
        /// Session ID
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_session_command(cmd: SessionCommands, ctx: &Context) -> anyhow::Result<()> {
    let sessions = SessionStore::new(&ctx.storage);

    match cmd {
        SessionCommands::New => {
            let session = sessions.create_session().await?;
            println!("Started new session {}", session.id);
            println!("Register players with: chestdeal roster toggle <color>");
        }

        SessionCommands::List => {
            let all = sessions.list_sessions().await?;

            if all.is_empty() {
                println!("No sessions found.");
                println!("Start one with: chestdeal session new");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Session", "Created", "Players"]);

            for (index, session) in all.iter().enumerate() {
                let store = SqliteRosterStore::open(ctx.storage.clone(), &session.id).await?;
                let players = store.load().await?;
                let label = if index == 0 {
                    format!("{} (latest)", session.id)
                } else {
                    session.id.clone()
                };
                table.add_row(vec![
                    label,
                    session
                        .created_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                    players.len().to_string(),
                ]);
            }

            println!("{table}");
        }

        SessionCommands::Show { id } => {
            let session = match id {
                Some(id) => sessions.load_session(&id).await?,
                None => ctx.current_session().await?,
            };
            let store = SqliteRosterStore::open(ctx.storage.clone(), &session.id).await?;
            let players = store.load().await?;

            println!("Session: {}", session.id);
            println!(
                "Created: {}",
                session.created_at.with_timezone(&chrono::Local)
            );
            if players.is_empty() {
                println!("No players registered yet.");
            } else {
                println!("{}", players_table(&players));
            }
        }

        SessionCommands::Delete { id, force } => {
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete session {} and its roster?", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            sessions.delete_session(&id).await?;
            println!("Session {} deleted.", id);
        }
    }

    Ok(())
}
