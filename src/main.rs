use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    bingocard::logging::init(cli.verbose);
    cli::run(cli)
}
