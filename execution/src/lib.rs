//! Diceroller execution layer.
//!
//! This crate contains the dice source, the round transition engine and the store that owns
//! the session's [`GameState`](diceroller_types::GameState).
//!
//! ## Invariants
//! - A rejected command never mutates the state.
//! - `total_rolls` moves by exactly one per accepted roll, however many dice were thrown.
//! - Once the round limit is reached, round-based modes only report the final winner.
//!
//! The engine does no I/O. Persisting a session is the server's concern.
//!
//! ```rust
//! use diceroller_execution::{GameRng, GameStore};
//! use diceroller_types::RollCommand;
//!
//! let mut store = GameStore::new();
//! let mut dice = GameRng::seeded(7);
//! let outcome = store.roll(RollCommand::solo(2), &mut dice).unwrap();
//! assert_eq!(store.get().total_rolls, 1);
//! assert!(outcome.event.player.is_some());
//! ```

pub mod dice;
pub mod engine;
pub mod store;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use dice::{DiceSource, GameRng};
pub use engine::apply_roll;
pub use store::GameStore;
