//! Dice sources.

use diceroller_types::game::{dice_count, GameError, DIE_FACES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Anything that can throw a six-sided die.
pub trait DiceSource {
    /// One face in `1..=6`.
    fn roll_die(&mut self) -> u8;

    /// Throws `count` dice, in order.
    ///
    /// Fails with [`GameError::InvalidDiceCount`] unless `count` is 1 or 2.
    fn roll(&mut self, count: i64) -> Result<Vec<u8>, GameError> {
        let count = dice_count(count)?;
        Ok((0..count).map(|_| self.roll_die()).collect())
    }
}

impl<D: DiceSource + ?Sized> DiceSource for Box<D> {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }
}

/// Production dice backed by [`StdRng`].
#[derive(Clone, Debug)]
pub struct GameRng {
    rng: StdRng,
}

impl GameRng {
    /// Seeds from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Repeatable sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl DiceSource for GameRng {
    fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=DIE_FACES)
    }
}
