//! Card generation command (`bingo generate`).

use std::path::PathBuf;

use anyhow::Result;
use bingocard::core::rng;
use bingocard::{
    Caption, Game, GameRequest, GameSheet, GeneratorOptions, RenderOptions, Settings,
    write_document,
};
use chrono::{Local, Utc};
use clap::Args;

use crate::cli::common::{PageStyleArg, PatternArg, pattern_set};
use crate::cli::utils::{create_run_dir, parse_names, parse_positive, run_dir_name};

/// Arguments for `bingo generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of players (one card each).
    #[arg(long, value_parser = parse_positive)]
    pub players: usize,
    /// Number of guaranteed winners.
    #[arg(long)]
    pub winners: usize,
    /// Number of numbers to call.
    #[arg(long)]
    pub draws: usize,
    /// Comma-separated player names, applied to cards in order.
    #[arg(long)]
    pub names: Option<String>,
    /// Parent directory for the run output.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Seed for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Dots per inch used when rasterising pages.
    #[arg(long)]
    pub dpi: Option<u32>,
    /// Lines that may be forced for a winner.
    #[arg(
        long = "pattern",
        value_enum,
        value_delimiter = ',',
        default_values_t = [PatternArg::Rows]
    )]
    pub patterns: Vec<PatternArg>,
    /// Page colour scheme.
    #[arg(long, default_value_t = PageStyleArg::Plain, value_enum)]
    pub style: PageStyleArg,
    /// Retry allowance per card while looking for unique grids.
    #[arg(long, value_parser = parse_positive)]
    pub attempts_per_card: Option<usize>,
    /// Only write the game sheet, skip page images.
    #[arg(long)]
    pub no_pages: bool,
    /// List which cards were set up to win.
    #[arg(long)]
    pub show_winners: bool,
}

/// Execute `bingo generate`.
pub fn handle(args: GenerateArgs) -> Result<()> {
    let settings = Settings::load()?;
    let names = args.names.as_deref().map(parse_names).unwrap_or_default();
    let generator = GeneratorOptions {
        attempts_per_card: args.attempts_per_card.unwrap_or(settings.attempts_per_card),
    };
    let request = GameRequest::new(args.players, args.winners, args.draws)
        .with_names(names)
        .with_patterns(pattern_set(&args.patterns))
        .with_generator(generator);
    request.validate()?;

    println!(
        "Generating {} bingo cards with {} guaranteed winners in {} draws...",
        args.players, args.winners, args.draws
    );
    let (mut rng, seed) = rng::seeded(args.seed.or(settings.seed));
    let game = Game::generate(&request, seed, &mut rng)?;

    let now = Local::now();
    let output = args.output.unwrap_or(settings.output);
    let run_dir = create_run_dir(
        &output,
        &run_dir_name(args.players, args.winners, args.draws, now.naive_local()),
    )?;

    if !args.no_pages {
        let caption = Caption {
            generated_at: now.naive_local(),
            rounds: args.draws,
            winners: args.winners,
            total_cards: game.batch.len(),
        };
        let options = RenderOptions {
            dpi: args.dpi.unwrap_or(settings.dpi),
            style: args.style.into(),
        };
        let pages = write_document(&run_dir, game.batch.cards(), &caption, &options)?;
        println!("Wrote {} page(s) to {}", pages.len(), run_dir.display());
    }

    let sheet_path = run_dir.join("game.json");
    GameSheet::new(&game, now.with_timezone(&Utc)).save(&sheet_path)?;
    println!("Game sheet: {}", sheet_path.display());

    println!(
        "Successfully generated {} unique bingo cards with {} guaranteed winners!",
        game.batch.len(),
        game.winners.len()
    );
    if args.show_winners {
        for winner in game.winners.winners() {
            if let Some(card) = game.batch.get(winner.card_id) {
                println!("  {} wins on {}", card.label(), winner.line);
            }
        }
    }
    println!("Seed: {} (pass --seed {} to reproduce)", seed, seed);
    println!("Numbers to draw (in order): [{}]", game.draws);
    Ok(())
}
