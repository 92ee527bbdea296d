//! Common types for the dice roller.
//!
//! The game state, roll commands, events and errors shared by the execution layer and the
//! HTTP server live here so both sides serialize the exact same shapes.

pub mod api;
pub use api::{ErrorResponse, RollRequest, RollResponse, SaveResponse};
pub mod game;
pub use game::{
    GameError, GameState, HistoryEntry, Mode, Player, RollCommand, RollEvent, RollOutcome,
    RollStats, Roller, Throw, Winner,
};
