//! Card generation and draw planning.

pub mod batch;
pub mod card;
pub mod planner;
pub mod rng;

pub use batch::{
    CardBatch, DEFAULT_ATTEMPTS_PER_CARD, GeneratorOptions, Shortfall, generate_unique_cards,
    generate_unique_cards_with,
};
pub use card::{Card, Cell, Column, GRID_SIZE, Grid, GridKey, Line, MAX_NUMBER};
pub use planner::{
    DrawSequence, PatternSet, PlanError, PlanRequest, Winner, WinnerPlan, plan_draws,
    plan_draws_with,
};
pub use rng::GameRng;
