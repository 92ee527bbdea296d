use serde::{Deserialize, Serialize};
use std::fmt;

use super::{GameState, Player};

/// Faces rolled in one throw and their total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throw {
    pub dice: Vec<u8>,
    pub sum: u32,
}

impl Throw {
    pub fn new(dice: Vec<u8>) -> Self {
        let sum = dice.iter().map(|&d| u32::from(d)).sum();
        Self { dice, sum }
    }
}

impl fmt::Display for Throw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} = {}", self.dice, self.sum)
    }
}

/// Whoever threw the dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Roller {
    Solo,
    You,
    Computer,
    #[serde(rename = "Player 1")]
    Player1,
    #[serde(rename = "Player 2")]
    Player2,
}

impl Roller {
    pub fn label(&self) -> &'static str {
        match self {
            Roller::Solo => "Solo",
            Roller::You => "You",
            Roller::Computer => "Computer",
            Roller::Player1 => "Player 1",
            Roller::Player2 => "Player 2",
        }
    }
}

impl From<Player> for Roller {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Roller::Player1,
            Player::Two => Roller::Player2,
        }
    }
}

/// Winner of a vs_computer round, or of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "you")]
    You,
    #[serde(rename = "computer")]
    Computer,
    #[serde(rename = "Player 1")]
    Player1,
    #[serde(rename = "Player 2")]
    Player2,
    #[serde(rename = "tie")]
    Tie,
}

impl Winner {
    pub fn label(&self) -> &'static str {
        match self {
            Winner::You => "you",
            Winner::Computer => "computer",
            Winner::Player1 => "Player 1",
            Winner::Player2 => "Player 2",
            Winner::Tie => "tie",
        }
    }
}

/// What happened on a roll request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollEvent {
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Throw>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent: Option<Throw>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Player>,
}

impl RollEvent {
    /// The event returned once the round limit has been reached.
    pub fn game_over(winner: Winner) -> Self {
        Self {
            desc: format!("GAME OVER - Final Winner: {}", winner.label().to_uppercase()),
            player: None,
            opponent: None,
            winner: Some(winner),
            player_id: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.player.is_none() && self.winner.is_some()
    }
}

/// Aggregate counters returned with every event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RollStats {
    Solo {
        total_rolls: u32,
        highest_sum: u32,
    },
    Match {
        total_rolls: u32,
        highest_sum: u32,
        player1_score: u32,
        player2_score: u32,
        rounds: u32,
    },
    /// Full session, sent alongside the terminal event.
    Final(GameState),
}

/// Response to a roll request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    pub event: RollEvent,
    pub stats: RollStats,
}
