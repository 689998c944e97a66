//! Game sheet inspection (`bingo show`).

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use bingocard::GameSheet;
use clap::Args;

/// Arguments for `bingo show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Game sheet written by `bingo generate`.
    pub sheet: PathBuf,
    /// Only print the card with this id.
    #[arg(long)]
    pub card: Option<usize>,
    /// List which cards were set up to win.
    #[arg(long)]
    pub winners: bool,
}

/// Execute `bingo show`.
pub fn handle(args: ShowArgs) -> Result<()> {
    let sheet = GameSheet::load(&args.sheet)?;
    let batch = sheet.batch()?;

    println!("Game: {}", args.sheet.display());
    println!("Created: {}", sheet.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Seed: {}", sheet.seed);
    println!("Patterns: {}", sheet.patterns);
    println!("Cards: {} (requested {})", batch.len(), batch.requested());
    println!("Fingerprint: {}", sheet.fingerprint);

    let cards: Vec<_> = match args.card {
        Some(id) => {
            let card = batch
                .get(id)
                .ok_or_else(|| anyhow!("card {} not found in {}", id, args.sheet.display()))?;
            vec![card]
        }
        None => batch.iter().collect(),
    };
    for card in cards {
        println!();
        if args.winners && sheet.winners.contains(card.id) {
            println!("[winner]");
        }
        println!("{}", card);
    }

    if args.winners {
        println!();
        for winner in sheet.winners.winners() {
            let label = batch
                .get(winner.card_id)
                .map(|card| card.label())
                .unwrap_or_else(|| format!("Card {}", winner.card_id));
            println!("{} wins on {}", label, winner.line);
        }
    }

    println!();
    println!("Draws ({}): [{}]", sheet.draws.len(), sheet.draws);
    println!("Calls: {}", sheet.draws.calls().join(" "));
    Ok(())
}
