//! Bingo card generation with a guaranteed set of winners.

pub mod config;
pub mod core;
pub mod game;
pub mod logging;
pub mod render;
pub mod sheet;

pub use config::{ConfigError, Settings};
pub use crate::core::{
    Card, CardBatch, Cell, Column, DrawSequence, GeneratorOptions, Line, PatternSet, PlanError,
    PlanRequest, Shortfall, Winner, WinnerPlan, generate_unique_cards, generate_unique_cards_with,
    plan_draws, plan_draws_with,
};
pub use game::{Game, GameRequest};
pub use render::{Caption, PageStyle, RenderOptions, render_pages, write_document};
pub use sheet::GameSheet;
