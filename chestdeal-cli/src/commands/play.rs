use super::{log_table, players_table, Context};
use crate::reader::{PromptReader, SimulatedReader};
use chestdeal_core::{CodeReader, PlayerColor};
use chestdeal_game::{open_table, GameError, GameStage, GameTable, RosterChange};
use dialoguer::Select;
use std::sync::Arc;
use tracing::{debug, warn};

enum SetupAction {
    Toggle(PlayerColor),
    Start,
    Clear,
    Quit,
}

enum PlayAction {
    Scan,
    Reset,
    NewGame,
    Quit,
}

/// Interactive game loop for the operator at the table
pub async fn run_play(ctx: &Context, simulate: bool, seed: Option<u64>) -> anyhow::Result<()> {
    let store = ctx.roster_store().await?;

    let simulated = simulate.then(|| Arc::new(SimulatedReader::new()));
    let reader: Arc<dyn CodeReader> = match &simulated {
        Some(reader) => reader.clone(),
        None => Arc::new(PromptReader),
    };

    let mut table = open_table(store, reader, ctx.config.game.clone()).await?;
    if let Some(seed) = seed {
        table = table.with_seed(seed);
    }

    println!("Deal with the Devil");
    if simulate {
        println!("Simulated scanner: chests are scanned in seat order.");
    }

    loop {
        let keep_going = match table.stage().await {
            GameStage::Setup => setup_step(&table, simulated.as_deref()).await?,
            GameStage::Playing => play_step(&table).await?,
        };
        if !keep_going {
            break;
        }
    }

    println!("Goodbye.");
    Ok(())
}

async fn setup_step(table: &GameTable, simulated: Option<&SimulatedReader>) -> anyhow::Result<bool> {
    let players = table.players().await;
    println!();
    if players.is_empty() {
        println!("No players registered.");
    } else {
        println!("{}", players_table(&players));
    }

    let mut actions = Vec::new();
    let mut labels = Vec::new();
    for color in PlayerColor::ALL {
        let registered = players.iter().any(|p| p.color == color);
        labels.push(if registered {
            format!("Remove {}", color)
        } else {
            format!("Add {}", color)
        });
        actions.push(SetupAction::Toggle(color));
    }
    if table.can_start().await {
        labels.push("Start game".to_string());
        actions.push(SetupAction::Start);
    }
    labels.push("Clear players".to_string());
    actions.push(SetupAction::Clear);
    labels.push("Quit".to_string());
    actions.push(SetupAction::Quit);

    let choice = select("Setup", &labels)?;

    match &actions[choice] {
        SetupAction::Toggle(color) => match table.toggle(*color).await {
            Ok(RosterChange::Added(player)) => {
                println!("Registered {} with chest code {}", player.color, player.code);
            }
            Ok(RosterChange::Removed(player)) => println!("Removed {}", player.color),
            Err(e) => report(&e),
        },
        SetupAction::Start => match table.start().await {
            Ok(()) => {
                if let Some(reader) = simulated {
                    reader.load_players(&table.players().await);
                }
                println!("Game started.");
                print_round(table).await;
            }
            Err(e) => report(&e),
        },
        SetupAction::Clear => match table.clear_roster().await {
            Ok(()) => println!("Roster cleared."),
            Err(e) => report(&e),
        },
        SetupAction::Quit => return Ok(false),
    }

    Ok(true)
}

async fn play_step(table: &GameTable) -> anyhow::Result<bool> {
    let labels = ["Scan chest", "Reset round", "New game", "Quit"];
    let actions = [
        PlayAction::Scan,
        PlayAction::Reset,
        PlayAction::NewGame,
        PlayAction::Quit,
    ];

    let choice = select("Play", &labels)?;

    match actions[choice] {
        PlayAction::Scan => match table.scan().await {
            Ok(instruction) => {
                println!();
                println!(">>> {}", instruction.text());
                print_round(table).await;
            }
            Err(e) => {
                report(&e);
                if e.is_rescan() {
                    println!("Nothing changed. Scan again when ready.");
                }
            }
        },
        PlayAction::Reset => match table.reset().await {
            Ok(()) => {
                println!("Round reset.");
                print_round(table).await;
            }
            Err(e) => report(&e),
        },
        PlayAction::NewGame => match table.new_game().await {
            Ok(()) => println!("Back to setup with an empty roster."),
            Err(e) => report(&e),
        },
        PlayAction::Quit => return Ok(false),
    }

    Ok(true)
}

async fn print_round(table: &GameTable) {
    let snapshot = table.snapshot().await;
    let Some(round) = snapshot.round else {
        return;
    };

    debug!(
        "phase {} move {} of {}",
        round.phase_index,
        round.move_count,
        snapshot.players.len()
    );

    println!();
    println!(
        "Phase {}/4: {} ({} of {} chests)",
        round.phase_index + 1,
        round.phase,
        round.move_count,
        snapshot.players.len()
    );
    println!("{}", round.instructions);

    if !round.log.is_empty() {
        println!("{}", log_table(&round.log));
    }
}

fn select<T: ToString>(prompt: &str, items: &[T]) -> anyhow::Result<usize> {
    let choice = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;
    Ok(choice)
}

fn report(error: &GameError) {
    match error {
        GameError::UnknownPlayerCode(code) => {
            eprintln!("Unknown chest {}. Scan a registered chest.", code);
        }
        GameError::ExhaustedProposal { phase, .. } => {
            eprintln!("That chest was already handled during {}. Scan another.", phase);
        }
        GameError::ReaderFailure(reason) => {
            eprintln!("Scan failed: {}. Try again.", reason);
        }
        GameError::ScannerBusy => eprintln!("A scan is already in progress."),
        GameError::InsufficientPlayers { have, need } => {
            eprintln!("Need at least {} players, have {}.", need, have);
        }
        other => {
            warn!("table operation failed: {}", other);
            eprintln!("Error: {}", other);
        }
    }
}
