//! Command-line interface wiring for the `bingo` binary.
//!
//! This module owns the clap definitions and delegates execution to the
//! submodule for each command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod generate;
pub mod show;
pub mod utils;

/// Parsed CLI entrypoint for the `bingo` binary.
#[derive(Parser, Debug)]
#[command(
    name = "bingo",
    version,
    about = "Generate printable bingo cards with guaranteed winners"
)]
pub struct Cli {
    /// Log debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate cards, plan the draws and write the printable pages.
    Generate(generate::GenerateArgs),
    /// Print the cards and draws recorded in a game sheet.
    Show(show::ShowArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate::handle(args),
        Command::Show(args) => show::handle(args),
    }
}
