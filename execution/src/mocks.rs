use crate::dice::DiceSource;
use std::collections::VecDeque;

/// Dice that replay a fixed sequence of faces.
///
/// Panics if asked for more faces than were scripted, so a test that rolls more than it
/// expected fails loudly.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// Appends more faces to the script.
    pub fn extend(&mut self, faces: impl IntoIterator<Item = u8>) {
        self.faces.extend(faces);
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        self.faces.pop_front().expect("scripted dice exhausted")
    }
}

/// Faces for `rounds` vs_computer rounds with one die each, where the player throws
/// `player` and the computer throws `computer` every time.
pub fn versus_rounds(rounds: usize, player: u8, computer: u8) -> ScriptedDice {
    ScriptedDice::new((0..rounds).flat_map(|_| [player, computer]))
}
