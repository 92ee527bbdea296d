use serde::{Deserialize, Deserializer, Serialize};

use super::{Mode, Roller, Throw, Winner, MAX_ROUNDS, NO_HIGHEST_PLAYER, WELCOME_MESSAGE};

/// The session record.
///
/// One type serves both the in-memory session and the persisted snapshot. Every field has a
/// default, so snapshots written by older builds load with missing keys backfilled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub mode: Mode,
    pub dice_count: u8,
    pub total_rolls: u32,
    /// Largest single-roll total seen by any roller. Older snapshots call it `highest_score`.
    #[serde(alias = "highest_score")]
    pub highest_sum: u32,
    pub highest_player: String,
    pub player1_score: u32,
    pub player2_score: u32,
    pub rounds: u32,
    pub game_over: bool,
    pub message: String,
    #[serde(deserialize_with = "deserialize_history")]
    pub history: Vec<HistoryEntry>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            mode: Mode::Solo,
            dice_count: 1,
            total_rolls: 0,
            highest_sum: 0,
            highest_player: NO_HIGHEST_PLAYER.to_string(),
            player1_score: 0,
            player2_score: 0,
            rounds: 0,
            game_over: false,
            message: WELCOME_MESSAGE.to_string(),
            history: Vec::new(),
        }
    }
}

impl GameState {
    /// True once the round-based modes have played all their rounds.
    pub fn rounds_exhausted(&self) -> bool {
        self.rounds >= MAX_ROUNDS
    }
}

/// One accepted roll request, as kept in [`GameState::history`].
///
/// `dice`/`sum` belong to `roller`. A vs_computer round also carries the computer's throw and
/// the round winner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub mode: Mode,
    pub roller: Roller,
    #[serde(flatten)]
    pub throw: Throw,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent: Option<Throw>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    pub desc: String,
}

// A history that is not a list reads as empty, and entries in another shape are skipped, so
// the counters of an older snapshot always survive.
fn deserialize_history<'de, D>(deserializer: D) -> Result<Vec<HistoryEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
