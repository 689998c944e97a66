use rand::Rng;

use crate::core::batch::{CardBatch, GeneratorOptions, generate_unique_cards_with};
use crate::core::planner::{
    DrawSequence, PatternSet, PlanError, PlanRequest, WinnerPlan, plan_draws_with,
};

/// Everything needed to produce one set of cards and its calling order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRequest {
    pub players: usize,
    pub winners: usize,
    pub draws: usize,
    pub names: Vec<String>,
    pub patterns: PatternSet,
    pub generator: GeneratorOptions,
}

impl GameRequest {
    pub fn new(players: usize, winners: usize, draws: usize) -> Self {
        Self {
            players,
            winners,
            draws,
            names: Vec::new(),
            patterns: PatternSet::ROWS,
            generator: GeneratorOptions::default(),
        }
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorOptions) -> Self {
        self.generator = generator;
        self
    }

    fn plan_request(&self) -> PlanRequest {
        PlanRequest::new(self.winners, self.draws).with_patterns(self.patterns)
    }

    /// Reject impossible requests against the requested player count.
    pub fn validate(&self) -> Result<(), PlanError> {
        self.plan_request().validate(self.players)
    }
}

/// A generated game: the cards, who is set up to win, and the calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub seed: u64,
    pub patterns: PatternSet,
    pub batch: CardBatch,
    pub winners: WinnerPlan,
    pub draws: DrawSequence,
}

impl Game {
    /// Validate, generate the cards, then plan the draws.
    ///
    /// Configuration errors surface before any card is generated. A uniqueness
    /// shortfall only fails here if it leaves fewer cards than winners.
    pub fn generate<R: Rng + ?Sized>(
        request: &GameRequest,
        seed: u64,
        rng: &mut R,
    ) -> Result<Self, PlanError> {
        request.validate()?;
        let names = (!request.names.is_empty()).then_some(request.names.as_slice());
        let batch = generate_unique_cards_with(request.players, names, &request.generator, rng);
        let (winners, draws) = plan_draws_with(&batch, &request.plan_request(), rng)?;
        Ok(Self {
            seed,
            patterns: request.patterns,
            batch,
            winners,
            draws,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng;

    #[test]
    fn invalid_request_fails_before_generation() {
        let request = GameRequest::new(2, 3, 10);
        let (mut rng, seed) = rng::seeded(Some(1));
        let err = Game::generate(&request, seed, &mut rng).unwrap_err();
        assert_eq!(
            err,
            PlanError::TooManyWinners {
                winners: 3,
                players: 2
            }
        );
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let request = GameRequest::new(6, 2, 25).with_names(vec!["Ada".into(), "Linus".into()]);
        let (mut a_rng, seed) = rng::seeded(Some(2024));
        let (mut b_rng, _) = rng::seeded(Some(2024));
        let a = Game::generate(&request, seed, &mut a_rng).unwrap();
        let b = Game::generate(&request, seed, &mut b_rng).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.batch.len(), 6);
        assert_eq!(a.batch[0].name.as_deref(), Some("Ada"));
        assert_eq!(a.winners.len(), 2);
        assert_eq!(a.draws.len(), 25);
    }

    #[test]
    fn shortfall_below_winner_count_is_an_error() {
        let generator = GeneratorOptions {
            attempts_per_card: 0,
        };
        let request = GameRequest::new(3, 1, 10).with_generator(generator);
        let (mut rng, seed) = rng::seeded(Some(5));
        let err = Game::generate(&request, seed, &mut rng).unwrap_err();
        assert_eq!(
            err,
            PlanError::TooManyWinners {
                winners: 1,
                players: 0
            }
        );
    }
}
