use super::Context;
use chestdeal_core::Proposal;
use chestdeal_game::{generate_proposals, RosterManager};
use comfy_table::{presets::UTF8_FULL, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Dry run of proposal generation for the current roster
pub async fn show_proposals(ctx: &Context, seed: Option<u64>) -> anyhow::Result<()> {
    let store = ctx.roster_store().await?;
    let roster = RosterManager::load(store, &ctx.config.game).await?;

    if roster.is_empty() {
        println!("No players registered.");
        return Ok(());
    }
    if !roster.can_start() {
        println!(
            "Warning: {} players registered, a game needs at least {}.",
            roster.len(),
            roster.min_players()
        );
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let rounds = generate_proposals(roster.players(), &mut rng);

    println!("First proposals:");
    println!("{}", proposal_table(rounds.first.iter()));
    println!("Second proposals:");
    println!("{}", proposal_table(rounds.second.iter()));

    Ok(())
}

fn proposal_table<'a>(proposals: impl Iterator<Item = &'a Proposal>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["From", "To"]);

    for proposal in proposals {
        table.add_row(vec![proposal.from.color.to_string(), proposal.to.color.to_string()]);
    }

    table
}
