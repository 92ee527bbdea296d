/// Rounds played in vs_computer and two_player before the game is over.
pub const MAX_ROUNDS: u32 = 5;

/// Faces on a die.
pub const DIE_FACES: u8 = 6;

/// Dice counts a single roll may request.
pub const MIN_DICE: u8 = 1;
pub const MAX_DICE: u8 = 2;

/// Message stored on a fresh state.
pub const WELCOME_MESSAGE: &str = "Welcome to Dice Roller!";

/// Placeholder for `highest_player` before anyone has rolled.
pub const NO_HIGHEST_PLAYER: &str = "None";
