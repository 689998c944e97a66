use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use rand::seq::{SliceRandom, index};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::batch::CardBatch;
use crate::core::card::{Card, Column, GRID_SIZE, Line, MAX_NUMBER};

/// Invalid planner input. Checked before any randomness is consumed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("number of winners ({winners}) cannot exceed number of players ({players})")]
    TooManyWinners { winners: usize, players: usize },
    #[error("number of draws must be at least 1")]
    NoDraws,
    #[error("number of draws ({draws}) cannot exceed the {max} available numbers")]
    DrawsExceedDomain { draws: usize, max: usize },
    #[error("no winning patterns enabled")]
    NoPatterns,
}

/// Which kinds of line may be forced for a winner.
///
/// Rows only is the baseline; columns and diagonals are an opt-in widening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSet {
    pub rows: bool,
    pub columns: bool,
    pub diagonals: bool,
}

impl PatternSet {
    pub const ROWS: PatternSet = PatternSet {
        rows: true,
        columns: false,
        diagonals: false,
    };

    pub const ALL: PatternSet = PatternSet {
        rows: true,
        columns: true,
        diagonals: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.rows || self.columns || self.diagonals)
    }

    /// Candidate lines in a fixed order: rows, then columns, then diagonals.
    pub fn lines(&self) -> Vec<Line> {
        let mut lines = Vec::with_capacity(2 * GRID_SIZE + 2);
        if self.rows {
            lines.extend((0..GRID_SIZE).map(Line::Row));
        }
        if self.columns {
            lines.extend((0..GRID_SIZE).map(Line::Column));
        }
        if self.diagonals {
            lines.push(Line::Diagonal);
            lines.push(Line::AntiDiagonal);
        }
        lines
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::ROWS
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.rows {
            parts.push("rows");
        }
        if self.columns {
            parts.push("columns");
        }
        if self.diagonals {
            parts.push("diagonals");
        }
        if parts.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Parameters for one planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanRequest {
    pub winners: usize,
    pub draws: usize,
    pub patterns: PatternSet,
}

impl PlanRequest {
    /// Row-only request.
    pub fn new(winners: usize, draws: usize) -> Self {
        Self {
            winners,
            draws,
            patterns: PatternSet::ROWS,
        }
    }

    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.patterns = patterns;
        self
    }

    /// Check the request against a batch of `players` cards.
    pub fn validate(&self, players: usize) -> Result<(), PlanError> {
        if self.winners > players {
            return Err(PlanError::TooManyWinners {
                winners: self.winners,
                players,
            });
        }
        if self.draws < 1 {
            return Err(PlanError::NoDraws);
        }
        if self.draws > MAX_NUMBER as usize {
            return Err(PlanError::DrawsExceedDomain {
                draws: self.draws,
                max: MAX_NUMBER as usize,
            });
        }
        if self.patterns.is_empty() {
            return Err(PlanError::NoPatterns);
        }
        Ok(())
    }
}

/// A selected winner and the line whose numbers were forced into the draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub card_id: usize,
    pub line: Line,
}

/// Cards chosen to win, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinnerPlan {
    winners: Vec<Winner>,
}

impl WinnerPlan {
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    pub fn contains(&self, card_id: usize) -> bool {
        self.winners.iter().any(|w| w.card_id == card_id)
    }

    /// Resolve the winning cards against the batch they were drawn from.
    pub fn cards<'a>(&'a self, batch: &'a CardBatch) -> impl Iterator<Item = &'a Card> + 'a {
        self.winners.iter().filter_map(|w| batch.get(w.card_id))
    }
}

/// Numbers to call, in calling order. Distinct and within `1..=75`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawSequence(Vec<u8>);

impl DrawSequence {
    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.contains(&number)
    }

    /// Calling order as announced, letter first (`B-7`, `N-40`, ...).
    pub fn calls(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|&n| match Column::for_number(n) {
                Some(column) => format!("{column}-{n}"),
                None => n.to_string(),
            })
            .collect()
    }

    /// Whether every non-free square of `line` on `card` gets called.
    pub fn covers(&self, card: &Card, line: Line) -> bool {
        card.line_numbers(line).iter().all(|n| self.contains(*n))
    }
}

impl fmt::Display for DrawSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", joined.join(", "))
    }
}

/// Pick `winner_count` winners and a row-forcing draw sequence of `draw_count` numbers.
pub fn plan_draws<R: Rng + ?Sized>(
    batch: &CardBatch,
    winner_count: usize,
    draw_count: usize,
    rng: &mut R,
) -> Result<(WinnerPlan, DrawSequence), PlanError> {
    plan_draws_with(batch, &PlanRequest::new(winner_count, draw_count), rng)
}

/// Plan draws for an explicit [`PlanRequest`].
///
/// For each winner one enabled line is chosen at random and its numbers are
/// queued. The queue is topped up with random uncalled numbers, shuffled, and
/// cut to exactly `request.draws`. If the forced numbers alone outnumber the
/// draws, the cut can drop some of them and the win is no longer certain.
pub fn plan_draws_with<R: Rng + ?Sized>(
    batch: &CardBatch,
    request: &PlanRequest,
    rng: &mut R,
) -> Result<(WinnerPlan, DrawSequence), PlanError> {
    request.validate(batch.len())?;

    let candidates = request.patterns.lines();
    let picks = index::sample(rng, batch.len(), request.winners);

    let mut winners = Vec::with_capacity(request.winners);
    let mut drawn: Vec<u8> = Vec::with_capacity(request.draws.max(request.winners * GRID_SIZE));
    let mut present: HashSet<u8> = HashSet::with_capacity(drawn.capacity());

    for idx in picks.iter() {
        let card = &batch[idx];
        let line = candidates[rng.random_range(0..candidates.len())];
        for number in card.line_numbers(line) {
            if present.insert(number) {
                drawn.push(number);
            }
        }
        winners.push(Winner {
            card_id: card.id,
            line,
        });
    }
    let forced = drawn.len();

    while drawn.len() < request.draws {
        let number = rng.random_range(1..=MAX_NUMBER);
        if present.insert(number) {
            drawn.push(number);
        }
    }

    drawn.shuffle(rng);
    let truncated = drawn.len() > request.draws;
    drawn.truncate(request.draws);

    debug!(
        winners = winners.len(),
        forced,
        draws = drawn.len(),
        truncated,
        "draw sequence planned"
    );

    Ok((WinnerPlan { winners }, DrawSequence(drawn)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::generate_unique_cards;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn batch(players: usize, seed: u64) -> CardBatch {
        generate_unique_cards(players, None, &mut ChaCha20Rng::seed_from_u64(seed))
    }

    fn assert_valid_draws(draws: &DrawSequence, expected_len: usize) {
        assert_eq!(draws.len(), expected_len);
        let unique: HashSet<u8> = draws.numbers().iter().copied().collect();
        assert_eq!(unique.len(), expected_len, "duplicate draws in {draws}");
        assert!(draws.numbers().iter().all(|n| (1..=MAX_NUMBER).contains(n)));
    }

    #[test]
    fn rejects_more_winners_than_players() {
        let cards = batch(3, 1);
        let err = plan_draws(&cards, 4, 10, &mut ChaCha20Rng::seed_from_u64(1)).unwrap_err();
        assert_eq!(
            err,
            PlanError::TooManyWinners {
                winners: 4,
                players: 3
            }
        );
    }

    #[test]
    fn rejects_zero_draws() {
        let cards = batch(3, 1);
        let err = plan_draws(&cards, 1, 0, &mut ChaCha20Rng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, PlanError::NoDraws);
    }

    #[test]
    fn rejects_more_draws_than_numbers() {
        let cards = batch(3, 1);
        let err = plan_draws(&cards, 1, 76, &mut ChaCha20Rng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, PlanError::DrawsExceedDomain { draws: 76, max: 75 });
    }

    #[test]
    fn rejects_empty_pattern_set() {
        let cards = batch(3, 1);
        let none = PatternSet {
            rows: false,
            columns: false,
            diagonals: false,
        };
        let request = PlanRequest::new(1, 10).with_patterns(none);
        let err = plan_draws_with(&cards, &request, &mut ChaCha20Rng::seed_from_u64(1));
        assert_eq!(err.unwrap_err(), PlanError::NoPatterns);
    }

    #[test]
    fn single_winner_row_is_fully_drawn() {
        let cards = batch(4, 21);
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let (plan, draws) = plan_draws(&cards, 1, 10, &mut rng).unwrap();
        assert_valid_draws(&draws, 10);
        assert_eq!(plan.len(), 1);
        let winner = plan.winners()[0];
        assert!(matches!(winner.line, Line::Row(r) if r < GRID_SIZE));
        let card = cards.get(winner.card_id).unwrap();
        assert!(draws.covers(card, winner.line));
    }

    #[test]
    fn same_seed_same_plan() {
        let cards = batch(6, 5);
        let a = plan_draws(&cards, 2, 20, &mut ChaCha20Rng::seed_from_u64(77)).unwrap();
        let b = plan_draws(&cards, 2, 20, &mut ChaCha20Rng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_card_wins_when_winners_equal_players() {
        let cards = batch(5, 3);
        let (plan, draws) = plan_draws(&cards, 5, 40, &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
        let mut ids: Vec<usize> = plan.winners().iter().map(|w| w.card_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_valid_draws(&draws, 40);
        assert_eq!(plan.cards(&cards).count(), 5);
    }

    #[test]
    fn truncates_when_forced_numbers_exceed_draws() {
        let cards = batch(10, 9);
        let (plan, draws) = plan_draws(&cards, 10, 3, &mut ChaCha20Rng::seed_from_u64(9)).unwrap();
        assert_eq!(plan.len(), 10);
        assert_valid_draws(&draws, 3);
    }

    #[test]
    fn zero_winners_is_pure_padding() {
        let cards = batch(2, 4);
        let (plan, draws) = plan_draws(&cards, 0, 75, &mut ChaCha20Rng::seed_from_u64(4)).unwrap();
        assert!(plan.is_empty());
        assert_valid_draws(&draws, 75);
    }

    #[test]
    fn widened_patterns_still_cover_chosen_line() {
        let cards = batch(8, 13);
        let request = PlanRequest::new(3, 30).with_patterns(PatternSet::ALL);
        let (plan, draws) =
            plan_draws_with(&cards, &request, &mut ChaCha20Rng::seed_from_u64(13)).unwrap();
        assert_valid_draws(&draws, 30);
        for winner in plan.winners() {
            let card = cards.get(winner.card_id).unwrap();
            assert!(draws.covers(card, winner.line), "{} not covered", winner.line);
        }
    }

    #[test]
    fn pattern_set_lines_and_display() {
        assert_eq!(PatternSet::ROWS.lines().len(), 5);
        assert_eq!(PatternSet::ALL.lines().len(), 12);
        assert_eq!(PatternSet::ALL.to_string(), "rows, columns, diagonals");
        assert_eq!(PatternSet::default(), PatternSet::ROWS);
    }

    #[test]
    fn calls_are_prefixed_with_their_letter() {
        let draws = DrawSequence(vec![7, 16, 45, 60, 75]);
        assert_eq!(draws.calls(), vec!["B-7", "I-16", "N-45", "G-60", "O-75"]);
    }

    #[test]
    fn winner_plan_contains_only_its_cards() {
        let cards = batch(6, 13);
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let (plan, _) = plan_draws(&cards, 2, 20, &mut rng).unwrap();
        let winners: Vec<usize> = plan.winners().iter().map(|w| w.card_id).collect();
        for card in &cards {
            assert_eq!(plan.contains(card.id), winners.contains(&card.id));
        }
        assert!(!plan.contains(0));
    }
}
