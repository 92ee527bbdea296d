use diceroller_types::game::{GameError, GameState, RollCommand, RollOutcome};
use tracing::info;

use crate::dice::DiceSource;
use crate::engine::apply_roll;

/// Owns the session's [`GameState`].
#[derive(Clone, Debug, Default)]
pub struct GameStore {
    state: GameState,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> GameState {
        self.state.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Drops every counter and the history, returning the fresh state.
    pub fn reset(&mut self) -> GameState {
        info!(
            total_rolls = self.state.total_rolls,
            rounds = self.state.rounds,
            "resetting game state"
        );
        self.state = GameState::default();
        self.get()
    }

    /// Swaps in a state loaded from elsewhere (for example a snapshot).
    pub fn replace(&mut self, state: GameState) {
        self.state = state;
    }

    pub fn roll<D: DiceSource + ?Sized>(
        &mut self,
        command: RollCommand,
        dice: &mut D,
    ) -> Result<RollOutcome, GameError> {
        apply_roll(&mut self.state, command, dice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedDice;
    use diceroller_types::game::Player;

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = GameStore::new();
        let mut dice = ScriptedDice::new([6, 6, 1, 2, 3]);
        store.roll(RollCommand::solo(2), &mut dice).unwrap();
        store.roll(RollCommand::vs_computer(1), &mut dice).unwrap();
        store
            .roll(RollCommand::two_player(1, Player::One), &mut dice)
            .unwrap();
        assert_eq!(store.get().total_rolls, 3);

        let fresh = store.reset();
        assert_eq!(fresh, GameState::default());
        assert_eq!(store.get(), GameState::default());
    }

    #[test]
    fn test_get_is_a_snapshot() {
        let mut store = GameStore::new();
        let before = store.get();
        store
            .roll(RollCommand::solo(1), &mut ScriptedDice::new([4]))
            .unwrap();
        assert_eq!(before.total_rolls, 0);
        assert_eq!(store.state().total_rolls, 1);
    }

    #[test]
    fn test_replace() {
        let mut store = GameStore::new();
        let loaded = GameState {
            rounds: 3,
            player1_score: 2,
            ..GameState::default()
        };
        store.replace(loaded.clone());
        assert_eq!(store.get(), loaded);
        assert_eq!(GameStore::from_state(loaded.clone()).get(), loaded);
    }
}
