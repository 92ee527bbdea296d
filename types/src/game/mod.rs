//! Game domain types.
//!
//! Defines the session state record, the typed roll command, and the events and stats a roll
//! produces.

mod command;
mod constants;
mod error;
mod event;
mod state;

pub use command::*;
pub use constants::*;
pub use error::*;
pub use event::*;
pub use state::*;
