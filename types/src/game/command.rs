use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{GameError, MAX_DICE, MIN_DICE};
use crate::api::RollRequest;

/// Game mode a roll is played in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Solo,
    VsComputer,
    TwoPlayer,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Solo => "solo",
            Mode::VsComputer => "vs_computer",
            Mode::TwoPlayer => "two_player",
        }
    }
}

impl FromStr for Mode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solo" => Ok(Mode::Solo),
            "vs_computer" => Ok(Mode::VsComputer),
            "two_player" => Ok(Mode::TwoPlayer),
            other => Err(GameError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seat in two_player mode. Serialized as the number 1 or 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn number(&self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl TryFrom<i64> for Player {
    type Error = GameError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(GameError::UnknownPlayer(other)),
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Player::try_from(i64::from(value))
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.number()
    }
}

/// Checks a requested dice count and narrows it to `u8`.
pub fn dice_count(requested: i64) -> Result<u8, GameError> {
    match u8::try_from(requested) {
        Ok(count) if (MIN_DICE..=MAX_DICE).contains(&count) => Ok(count),
        _ => Err(GameError::InvalidDiceCount(requested)),
    }
}

/// A validated roll request.
///
/// Construction through [`TryFrom<RollRequest>`] rejects unknown modes, out-of-range dice
/// counts and unknown or missing players before the session is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollCommand {
    pub mode: Mode,
    pub dice_count: u8,
    pub player: Option<Player>,
}

impl RollCommand {
    pub fn solo(dice_count: u8) -> Self {
        Self {
            mode: Mode::Solo,
            dice_count,
            player: None,
        }
    }

    pub fn vs_computer(dice_count: u8) -> Self {
        Self {
            mode: Mode::VsComputer,
            dice_count,
            player: None,
        }
    }

    pub fn two_player(dice_count: u8, player: Player) -> Self {
        Self {
            mode: Mode::TwoPlayer,
            dice_count,
            player: Some(player),
        }
    }
}

impl TryFrom<RollRequest> for RollCommand {
    type Error = GameError;

    fn try_from(request: RollRequest) -> Result<Self, Self::Error> {
        let mode = request.mode.as_deref().unwrap_or("solo").parse::<Mode>()?;
        let dice_count = dice_count(request.number_of_dice.unwrap_or(1))?;
        // Only two_player cares which seat is rolling.
        let player = match mode {
            Mode::TwoPlayer => {
                let raw = request.player.ok_or(GameError::MissingPlayer)?;
                Some(Player::try_from(raw)?)
            }
            Mode::Solo | Mode::VsComputer => None,
        };
        Ok(Self {
            mode,
            dice_count,
            player,
        })
    }
}
