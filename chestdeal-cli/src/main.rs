mod commands;
mod config;
mod reader;

use chestdeal_core::CoreError;
use chestdeal_game::GameError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chestdeal")]
#[command(about = "Deal with the Devil - chest trading game operator")]
#[command(version)]
struct Cli {
    /// Data directory for sessions and config
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Session to use (defaults to the most recent one)
    #[arg(short, long, global = true)]
    session: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session management commands
    #[command(subcommand)]
    Session(commands::SessionCommands),

    /// Player registration commands
    #[command(subcommand)]
    Roster(commands::RosterCommands),

    /// Run the game at the table
    Play {
        /// Scan chests automatically in seat order instead of reading input
        #[arg(long)]
        simulate: bool,
        /// Seed for proposal generation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Preview proposals for the current roster without starting a game
    Proposals {
        /// Seed for proposal generation
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Get data directory
    let data_dir = cli.data_dir.unwrap_or_else(config::default_data_dir);

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    let config = config::CliConfig::load(&data_dir).await?;

    // Initialize logging
    let log_level = if cli.verbose || config.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "chestdeal={},chestdeal_core={},chestdeal_game={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = commands::Context::new(config, cli.session).await?;

    // Execute command
    let result = match cli.command {
        Commands::Session(cmd) => commands::handle_session_command(cmd, &ctx).await,
        Commands::Roster(cmd) => commands::handle_roster_command(cmd, &ctx).await,
        Commands::Play { simulate, seed } => commands::run_play(&ctx, simulate, seed).await,
        Commands::Proposals { seed } => commands::show_proposals(&ctx, seed).await,
    };

    if let Err(e) = result {
        if let Some(CoreError::SessionNotFound { id }) = e.downcast_ref::<CoreError>() {
            eprintln!("Error: Session '{}' not found", id);
            eprintln!("Use 'chestdeal session list' to see available sessions");
        } else if let Some(GameError::Core(CoreError::SessionNotFound { id })) =
            e.downcast_ref::<GameError>()
        {
            eprintln!("Error: Session '{}' not found", id);
            eprintln!("Use 'chestdeal session list' to see available sessions");
        } else if let Some(GameError::InsufficientPlayers { have, need }) =
            e.downcast_ref::<GameError>()
        {
            eprintln!("Error: Not enough players");
            eprintln!("Need: {}, Registered: {}", need, have);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
