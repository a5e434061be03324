use rand::rngs::StdRng;
use rand::seq::SliceRandom as _;
use rand::{Rng, SeedableRng as _};
use serde::{Deserialize, Serialize};

use crate::game::GameType;

/// Winning numbers produced by the draw authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnNumbers {
    /// Sorted ascending.
    pub numbers: Vec<i32>,
    pub bonus_number: Option<i32>,
}

/// Random winning-number source for official drawings.
pub struct DrawGenerator<R: Rng> {
    rng: R,
}

impl DrawGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible draws, mostly for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DrawGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw a full set for `game`: distinct main numbers and, when the game has one,
    /// a bonus distinct from all of them.
    pub fn draw(&mut self, game: GameType) -> DrawnNumbers {
        let rules = game.rules();
        let wanted = rules.pick_count + usize::from(rules.draws_bonus());
        let pool: Vec<i32> = rules.range().collect();

        let mut picked: Vec<i32> = pool
            .choose_multiple(&mut self.rng, wanted)
            .copied()
            .collect();
        let bonus_number = if rules.draws_bonus() {
            picked.pop()
        } else {
            None
        };
        picked.sort_unstable();

        DrawnNumbers {
            numbers: picked,
            bonus_number,
        }
    }

    pub fn draw_many(&mut self, game: GameType, count: usize) -> Vec<DrawnNumbers> {
        (0..count).map(|_| self.draw(game)).collect()
    }
}
