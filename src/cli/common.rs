//! Shared clap helper types for CLI commands.

use bingocard::{PageStyle, PatternSet};
use clap::ValueEnum;

/// Line kinds that may be forced for a winner.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternArg {
    Rows,
    Columns,
    Diagonals,
}

/// Fold the selected line kinds into a [`PatternSet`].
pub fn pattern_set(args: &[PatternArg]) -> PatternSet {
    let mut set = PatternSet {
        rows: false,
        columns: false,
        diagonals: false,
    };
    for arg in args {
        match arg {
            PatternArg::Rows => set.rows = true,
            PatternArg::Columns => set.columns = true,
            PatternArg::Diagonals => set.diagonals = true,
        }
    }
    set
}

/// Colour schemes for the printed pages.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStyleArg {
    Plain,
    Color,
}

impl From<PageStyleArg> for PageStyle {
    fn from(value: PageStyleArg) -> PageStyle {
        match value {
            PageStyleArg::Plain => PageStyle::Plain,
            PageStyleArg::Color => PageStyle::Color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_args_fold_into_set() {
        assert_eq!(pattern_set(&[PatternArg::Rows]), PatternSet::ROWS);
        assert_eq!(
            pattern_set(&[PatternArg::Diagonals, PatternArg::Rows, PatternArg::Columns]),
            PatternSet::ALL
        );
        assert!(pattern_set(&[]).is_empty());
    }
}
