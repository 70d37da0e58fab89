use super::{players_table, Context};
use chestdeal_core::PlayerColor;
use chestdeal_game::{RosterChange, RosterManager};
use clap::Subcommand;
use dialoguer::Confirm;

#[derive(Subcommand)]
pub enum RosterCommands {
    /// Register a color, or remove it if already registered
    Toggle {
        /// RED, BLUE, GREEN or YELLOW
        color: PlayerColor,
    },
    /// Remove every player from the roster
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show registered players and their chest codes
    List,
}

pub async fn handle_roster_command(cmd: RosterCommands, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.roster_store().await?;
    let mut roster = RosterManager::load(store, &ctx.config.game).await?;

    match cmd {
        RosterCommands::Toggle { color } => match roster.toggle(color).await? {
            RosterChange::Added(player) => {
                println!("Registered player {}", player.color);
                println!("Chest code: {}", player.code);
                print_readiness(&roster);
            }
            RosterChange::Removed(player) => {
                println!("Removed player {}", player.color);
                print_readiness(&roster);
            }
        },

        RosterCommands::Clear { force } => {
            if roster.is_empty() {
                println!("Roster is already empty.");
                return Ok(());
            }
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove all {} players?", roster.len()))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            roster.clear().await?;
            println!("Roster cleared.");
        }

        RosterCommands::List => {
            if roster.is_empty() {
                println!("No players registered.");
                println!("Add one with: chestdeal roster toggle <color>");
                return Ok(());
            }
            println!("{}", players_table(roster.players()));
            print_readiness(&roster);
        }
    }

    Ok(())
}

fn print_readiness(roster: &RosterManager) {
    if roster.can_start() {
        println!("Ready to play with {} players.", roster.len());
    } else {
        println!(
            "Need at least {} players to start ({} registered).",
            roster.min_players(),
            roster.len()
        );
    }
}
