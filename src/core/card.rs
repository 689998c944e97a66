use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// Cards are always 5x5.
pub const GRID_SIZE: usize = 5;
/// Highest number that can ever be called.
pub const MAX_NUMBER: u8 = 75;
const NUMBERS_PER_COLUMN: u8 = 15;
const CENTER: usize = GRID_SIZE / 2;

/// One of the five lettered columns of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    B,
    I,
    N,
    G,
    O,
}

impl Column {
    pub const ALL: [Column; GRID_SIZE] = [Column::B, Column::I, Column::N, Column::G, Column::O];

    pub fn letter(self) -> char {
        match self {
            Column::B => 'B',
            Column::I => 'I',
            Column::N => 'N',
            Column::G => 'G',
            Column::O => 'O',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Inclusive range of numbers that may appear under this letter.
    pub fn range(self) -> RangeInclusive<u8> {
        let start = self.index() as u8 * NUMBERS_PER_COLUMN + 1;
        start..=start + NUMBERS_PER_COLUMN - 1
    }

    /// Column a called number belongs to, if it is in the playable domain.
    pub fn for_number(number: u8) -> Option<Column> {
        if number == 0 || number > MAX_NUMBER {
            return None;
        }
        Some(Column::ALL[((number - 1) / NUMBERS_PER_COLUMN) as usize])
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A single square of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Number(u8),
    Free,
}

impl Cell {
    pub fn number(self) -> Option<u8> {
        match self {
            Cell::Number(n) => Some(n),
            Cell::Free => None,
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, Cell::Free)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Free => write!(f, "FREE"),
        }
    }
}

/// Row-major card contents.
pub type Grid = [[Cell; GRID_SIZE]; GRID_SIZE];

/// Flattened grid used as the identity of a card.
///
/// Cells are laid out row by row; the free square is encoded as `0`, which
/// can never collide with a playable number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey(pub [u8; GRID_SIZE * GRID_SIZE]);

impl GridKey {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut key = [0u8; GRID_SIZE * GRID_SIZE];
        for (row_idx, row) in grid.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                key[row_idx * GRID_SIZE + col_idx] = cell.number().unwrap_or(0);
            }
        }
        Self(key)
    }
}

/// A straight line of five squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Line {
    /// Grid coordinates `(row, col)` covered by this line.
    pub fn positions(self) -> [(usize, usize); GRID_SIZE] {
        let mut out = [(0, 0); GRID_SIZE];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = match self {
                Line::Row(r) => (r, i),
                Line::Column(c) => (i, c),
                Line::Diagonal => (i, i),
                Line::AntiDiagonal => (i, GRID_SIZE - 1 - i),
            };
        }
        out
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Row(r) => write!(f, "row {}", r + 1),
            Line::Column(c) => write!(f, "column {}", Column::ALL[*c]),
            Line::Diagonal => write!(f, "diagonal"),
            Line::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}

/// A generated bingo card.
///
/// Equality only looks at the grid; two cards with different ids or names but
/// the same numbers are the same card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    grid: Grid,
}

impl Card {
    /// Build a card from an existing grid.
    pub fn new(id: usize, name: Option<String>, grid: Grid) -> Self {
        Self { id, name, grid }
    }

    /// Draw a fresh random card.
    pub fn random<R: Rng + ?Sized>(id: usize, name: Option<String>, rng: &mut R) -> Self {
        Self::new(id, name, random_grid(rng))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.grid[row][col]
    }

    pub fn key(&self) -> GridKey {
        GridKey::from_grid(&self.grid)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, column: Column) -> [Cell; GRID_SIZE] {
        let col = column.index();
        std::array::from_fn(|row| self.grid[row][col])
    }

    /// Non-free numbers on a line, in grid order.
    pub fn line_numbers(&self, line: Line) -> Vec<u8> {
        line.positions()
            .iter()
            .filter_map(|&(row, col)| self.grid[row][col].number())
            .collect()
    }

    /// Every number printed on the card.
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.grid.iter().flatten().filter_map(|cell| cell.number())
    }

    /// Header line used by the text and image renderers.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("Card {}: {}", self.id, name),
            None => format!("Card {}", self.id),
        }
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
    }
}

impl Eq for Card {}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label())?;
        for column in Column::ALL {
            write!(f, "{:>5}", column.letter())?;
        }
        writeln!(f)?;
        for (row_idx, row) in self.grid.iter().enumerate() {
            for cell in row {
                write!(f, "{:>5}", cell.to_string())?;
            }
            if row_idx + 1 < GRID_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Sample five distinct numbers per column and transpose into rows.
fn random_grid<R: Rng + ?Sized>(rng: &mut R) -> Grid {
    let mut columns = [[Cell::Free; GRID_SIZE]; GRID_SIZE];
    for column in Column::ALL {
        let base = *column.range().start();
        let picks = index::sample(rng, NUMBERS_PER_COLUMN as usize, GRID_SIZE);
        let cells = &mut columns[column.index()];
        for (slot, offset) in cells.iter_mut().zip(picks.iter()) {
            *slot = Cell::Number(base + offset as u8);
        }
        if column == Column::N {
            cells[CENTER] = Cell::Free;
        }
    }
    std::array::from_fn(|row| std::array::from_fn(|col| columns[col][row]))
}
