use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::batch::CardBatch;
use crate::core::card::Card;
use crate::core::planner::{DrawSequence, PatternSet, WinnerPlan};
use crate::game::Game;

const SHEET_VERSION: u8 = 1;

/// Read-only record of a generated game, written next to the rendered pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSheet {
    pub version: u8,
    pub created_at: DateTime<Utc>,
    pub seed: u64,
    #[serde(default)]
    pub patterns: PatternSet,
    pub requested_players: usize,
    pub fingerprint: String,
    pub cards: Vec<Card>,
    pub winners: WinnerPlan,
    pub draws: DrawSequence,
}

impl GameSheet {
    pub fn new(game: &Game, created_at: DateTime<Utc>) -> Self {
        Self {
            version: SHEET_VERSION,
            created_at,
            seed: game.seed,
            patterns: game.patterns,
            requested_players: game.batch.requested(),
            fingerprint: game.batch.fingerprint(),
            cards: game.batch.cards().to_vec(),
            winners: game.winners.clone(),
            draws: game.draws.clone(),
        }
    }

    /// Rebuild the card batch, checking uniqueness and the stored fingerprint.
    pub fn batch(&self) -> Result<CardBatch> {
        let batch = CardBatch::from_cards(self.cards.clone(), self.requested_players)
            .ok_or_else(|| anyhow!("sheet contains duplicate cards"))?;
        let actual = batch.fingerprint();
        if actual != self.fingerprint {
            return Err(anyhow!(
                "card fingerprint mismatch: recorded {}, computed {}",
                self.fingerprint,
                actual
            ));
        }
        Ok(batch)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("failed to open game sheet {}", path.display()))?;
        let sheet: GameSheet = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse game sheet {}", path.display()))?;
        if sheet.version != SHEET_VERSION {
            return Err(anyhow!(
                "unsupported game sheet version {} in {}",
                sheet.version,
                path.display()
            ));
        }
        Ok(sheet)
    }

    /// Write the sheet to a new file. An existing file at `path` is an error.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .with_context(|| format!("failed to write game sheet {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).context("failed to serialize game sheet")?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
