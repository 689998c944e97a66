//! Convenience helpers shared across command handlers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

/// Clap-friendly parser for counts that must be at least 1.
pub fn parse_positive(input: &str) -> Result<usize, String> {
    let value: usize = input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", input))?;
    if value == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(value)
}

/// Split a comma-separated name list, trimming each entry.
///
/// Positions are preserved, so `"Ada,,Grace"` leaves card 2 unnamed.
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.split(',').map(|name| name.trim().to_string()).collect()
}

/// Directory name for one generation run.
pub fn run_dir_name(players: usize, winners: usize, draws: usize, at: NaiveDateTime) -> String {
    format!(
        "bingo_{}players_{}winners_{}draws_{}",
        players,
        winners,
        draws,
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Create a fresh run directory `name` under `parent`.
///
/// If `name` is taken, `_2`, `_3`, ... are appended until an unused name is found.
pub fn create_run_dir(parent: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    let mut attempt = 1;
    loop {
        let candidate = match attempt {
            1 => parent.join(name),
            n => parent.join(format!("{name}_{n}")),
        };
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to create output directory {}", candidate.display())
                });
            }
        }
    }
}
