//! Round transition engine.
//!
//! [`apply_roll`] advances a [`GameState`] by one roll request:
//!
//! - `solo` throws once and only tracks totals, never rounds.
//! - `vs_computer` throws for the player and the computer; the strictly higher total takes the
//!   round and scores one point.
//! - `two_player` throws for the named seat and adds the whole sum to that seat's score.
//!
//! Round-based modes stop at [`MAX_ROUNDS`](diceroller_types::game::MAX_ROUNDS). After that every request returns the final
//! winner and leaves the state untouched.

use std::cmp::Ordering;

use diceroller_types::game::{
    dice_count, GameError, GameState, HistoryEntry, Mode, Player, RollCommand, RollEvent,
    RollOutcome, RollStats, Roller, Throw, Winner,
};
use tracing::debug;

use crate::dice::DiceSource;

/// Applies one roll request to `state`.
///
/// Errors are returned before any die is thrown, so a rejected command leaves `state` exactly
/// as it was.
pub fn apply_roll<D: DiceSource + ?Sized>(
    state: &mut GameState,
    command: RollCommand,
    dice: &mut D,
) -> Result<RollOutcome, GameError> {
    dice_count(i64::from(command.dice_count))?;
    let outcome = match command.mode {
        Mode::Solo => solo(state, command.dice_count, dice)?,
        Mode::VsComputer => vs_computer(state, command.dice_count, dice)?,
        Mode::TwoPlayer => {
            let player = command.player.ok_or(GameError::MissingPlayer)?;
            two_player(state, command.dice_count, player, dice)?
        }
    };
    debug!(
        mode = %command.mode,
        total_rolls = state.total_rolls,
        rounds = state.rounds,
        highest_sum = state.highest_sum,
        terminal = outcome.event.is_terminal(),
        "roll applied"
    );
    Ok(outcome)
}

fn solo<D: DiceSource + ?Sized>(
    state: &mut GameState,
    count: u8,
    dice: &mut D,
) -> Result<RollOutcome, GameError> {
    let throw = Throw::new(dice.roll(i64::from(count))?);
    let desc = format!("Solo rolled {throw}");

    begin_roll(state, Mode::Solo, count);
    observe(state, Roller::Solo, &throw);
    record(
        state,
        HistoryEntry {
            mode: Mode::Solo,
            roller: Roller::Solo,
            throw: throw.clone(),
            opponent: None,
            winner: None,
            desc: desc.clone(),
        },
    );

    Ok(RollOutcome {
        event: RollEvent {
            desc,
            player: Some(throw),
            opponent: None,
            winner: None,
            player_id: None,
        },
        stats: RollStats::Solo {
            total_rolls: state.total_rolls,
            highest_sum: state.highest_sum,
        },
    })
}

fn vs_computer<D: DiceSource + ?Sized>(
    state: &mut GameState,
    count: u8,
    dice: &mut D,
) -> Result<RollOutcome, GameError> {
    if state.rounds_exhausted() {
        return Ok(game_over(state, Mode::VsComputer));
    }

    let player = Throw::new(dice.roll(i64::from(count))?);
    let computer = Throw::new(dice.roll(i64::from(count))?);

    begin_roll(state, Mode::VsComputer, count);
    state.rounds += 1;
    observe(state, Roller::You, &player);
    observe(state, Roller::Computer, &computer);

    let winner = match player.sum.cmp(&computer.sum) {
        Ordering::Greater => {
            state.player1_score = state.player1_score.saturating_add(1);
            Winner::You
        }
        Ordering::Less => {
            state.player2_score = state.player2_score.saturating_add(1);
            Winner::Computer
        }
        Ordering::Equal => Winner::Tie,
    };
    let desc = format!("You rolled {player} | Computer rolled {computer}");
    record(
        state,
        HistoryEntry {
            mode: Mode::VsComputer,
            roller: Roller::You,
            throw: player.clone(),
            opponent: Some(computer.clone()),
            winner: Some(winner),
            desc: desc.clone(),
        },
    );

    Ok(RollOutcome {
        event: RollEvent {
            desc,
            player: Some(player),
            opponent: Some(computer),
            winner: Some(winner),
            player_id: None,
        },
        stats: match_stats(state),
    })
}

fn two_player<D: DiceSource + ?Sized>(
    state: &mut GameState,
    count: u8,
    player: Player,
    dice: &mut D,
) -> Result<RollOutcome, GameError> {
    if state.rounds_exhausted() {
        return Ok(game_over(state, Mode::TwoPlayer));
    }

    let throw = Throw::new(dice.roll(i64::from(count))?);
    let roller = Roller::from(player);

    begin_roll(state, Mode::TwoPlayer, count);
    state.rounds += 1;
    observe(state, roller, &throw);
    // Two-player scores accumulate the dice total, not a point per round.
    match player {
        Player::One => state.player1_score = state.player1_score.saturating_add(throw.sum),
        Player::Two => state.player2_score = state.player2_score.saturating_add(throw.sum),
    }

    let desc = format!("P{} rolled {throw}", player.number());
    record(
        state,
        HistoryEntry {
            mode: Mode::TwoPlayer,
            roller,
            throw: throw.clone(),
            opponent: None,
            winner: None,
            desc: desc.clone(),
        },
    );

    Ok(RollOutcome {
        event: RollEvent {
            desc,
            player: Some(throw),
            opponent: None,
            winner: None,
            player_id: Some(player),
        },
        stats: match_stats(state),
    })
}

fn begin_roll(state: &mut GameState, mode: Mode, count: u8) {
    state.mode = mode;
    state.dice_count = count;
    // Counters come from snapshots too, so they saturate instead of overflowing.
    state.total_rolls = state.total_rolls.saturating_add(1);
}

fn observe(state: &mut GameState, roller: Roller, throw: &Throw) {
    if throw.sum > state.highest_sum {
        state.highest_sum = throw.sum;
        state.highest_player = roller.label().to_string();
    }
}

fn record(state: &mut GameState, entry: HistoryEntry) {
    state.message = entry.desc.clone();
    state.game_over = state.rounds_exhausted();
    state.history.push(entry);
}

fn match_stats(state: &GameState) -> RollStats {
    RollStats::Match {
        total_rolls: state.total_rolls,
        highest_sum: state.highest_sum,
        player1_score: state.player1_score,
        player2_score: state.player2_score,
        rounds: state.rounds,
    }
}

fn game_over(state: &GameState, mode: Mode) -> RollOutcome {
    let winner = match (state.player1_score.cmp(&state.player2_score), mode) {
        (Ordering::Equal, _) => Winner::Tie,
        (Ordering::Greater, Mode::TwoPlayer) => Winner::Player1,
        (Ordering::Less, Mode::TwoPlayer) => Winner::Player2,
        (Ordering::Greater, _) => Winner::You,
        (Ordering::Less, _) => Winner::Computer,
    };
    RollOutcome {
        event: RollEvent::game_over(winner),
        stats: RollStats::Final(state.clone()),
    }
}
