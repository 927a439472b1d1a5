//! Fired ability executors - swap, sniper, builder
//!
//! Each fired ability transitions the interaction into a distinct input
//! mode; the next square clicks arrive here as `AbilityTarget` actions
//! until the ability fully resolves (or is cancelled by re-clicking its
//! source square, which the resolver short-circuits).

use rand::Rng;
use tracing::debug;

use crate::core::{EngineError, EngineResult, PieceKind, Side, Square, UpgradeKind};

use super::mode::InteractionMode;
use super::resolver::{complete_turn, flip_turn, sync_side};
use super::state::GameState;
use super::walls::BUILDER_PLACEMENTS;

/// Maximum Chebyshev distance a sniper shot can cover
pub const SNIPER_RANGE: u8 = 3;

/// Arm the fired ability carried by the acting side's piece
pub(super) fn fire(state: &mut GameState, square: Square) -> EngineResult<()> {
    if !state.mode.is_idle() {
        return Err(EngineError::invalid_target("an ability is already pending"));
    }

    let mover = state.turn;
    let mut board = state.board();

    match board.piece_at(square) {
        Some((c, _)) if c == mover => {}
        Some(_) => {
            return Err(EngineError::invalid_target(format!(
                "{square} does not hold a {mover} piece"
            )))
        }
        None => return Err(EngineError::invalid_target(format!("no piece on {square}"))),
    }

    let Some(modifier) = state.modifiers.get(square) else {
        return Err(EngineError::invalid_target(format!(
            "no ability bound to {square}"
        )));
    };
    if !modifier.kind.is_fired() {
        return Err(EngineError::invalid_target(format!(
            "{} is not a fired ability",
            modifier.kind.label()
        )));
    }

    match modifier.kind {
        UpgradeKind::Swap => {
            // Firing swap consumes the turn up front, before any target
            // is chosen
            state.mode = InteractionMode::AwaitingSwap {
                source: square,
                by: mover,
            };
            flip_turn(state, &mut board, mover);
            state.fen = board.to_fen();
            debug!("[ENGINE] {mover} armed swap from {square}");
        }
        UpgradeKind::Sniper => {
            state.mode = InteractionMode::AwaitingSniperTarget { source: square };
            debug!("[ENGINE] {mover} armed sniper from {square}");
        }
        UpgradeKind::Builder => {
            state.mode = InteractionMode::PlacingWalls {
                source: square,
                placed: Vec::new(),
            };
            debug!("[ENGINE] {mover} armed builder from {square}");
        }
        _ => unreachable!("is_fired() covers exactly these kinds"),
    }

    Ok(())
}

/// Route a target click to the pending executor
pub(super) fn handle_target(
    state: &mut GameState,
    square: Square,
    rng: &mut impl Rng,
) -> EngineResult<()> {
    match state.mode.clone() {
        InteractionMode::Idle => Err(EngineError::invalid_target("no ability is pending")),
        InteractionMode::AwaitingSwap { source, by } => {
            execute_swap(state, source, by, square, rng)
        }
        InteractionMode::AwaitingSniperTarget { source } => {
            execute_sniper(state, source, square, rng)
        }
        InteractionMode::PlacingWalls { source, placed } => {
            place_wall(state, source, placed, square, rng)
        }
    }
}

/// Swap the pieces on two friendly squares along with their modifiers
fn execute_swap(
    state: &mut GameState,
    source: Square,
    by: Side,
    target: Square,
    rng: &mut impl Rng,
) -> EngineResult<()> {
    let mut board = state.board();

    let Some((source_side, source_kind)) = board.piece_at(source) else {
        return Err(EngineError::invalid_target(format!(
            "no piece left on {source}"
        )));
    };
    let (target_side, target_kind) = match board.piece_at(target) {
        Some((c, k)) if c == by => (c, k),
        _ => {
            return Err(EngineError::invalid_target(format!(
                "swap needs a friendly piece on {target}"
            )))
        }
    };

    board.remove_piece(source);
    board.remove_piece(target);
    board.put_piece(source, target_side, target_kind);
    board.put_piece(target, source_side, source_kind);

    // The swap ability itself is spent; every other modifier rides along
    // with its piece
    if state.modifiers.get(source).map(|m| m.kind) == Some(UpgradeKind::Swap) {
        state.modifiers.remove(source);
    }
    state.modifiers.swap(source, target);

    state.mode = InteractionMode::Idle;
    // The turn already passed when the swap armed
    sync_side(&mut board, state.turn);
    complete_turn(
        state,
        &board,
        format!("{by} swapped {source} and {target}"),
        rng,
        true,
    );
    Ok(())
}

/// Remove an enemy piece within range without moving
fn execute_sniper(
    state: &mut GameState,
    source: Square,
    target: Square,
    rng: &mut impl Rng,
) -> EngineResult<()> {
    let mover = state.turn;
    let mut board = state.board();

    let (victim_side, victim_kind) = match board.piece_at(target) {
        Some((c, _)) if c == mover => {
            return Err(EngineError::invalid_target(
                "cannot snipe your own piece",
            ))
        }
        Some((c, k)) => (c, k),
        None => {
            return Err(EngineError::invalid_target(format!(
                "no piece to snipe on {target}"
            )))
        }
    };
    if source.chebyshev(target) > SNIPER_RANGE {
        return Err(EngineError::invalid_target(format!(
            "{target} is out of sniper range"
        )));
    }

    board.remove_piece(target);
    let victim_mod = state.modifiers.remove(target);
    // The sniper shot is spent
    state.modifiers.remove(source);

    let mut martyred = false;
    if victim_mod.map(|m| m.kind) == Some(UpgradeKind::Martyrdom) {
        // The martyr takes the shooter down with it
        board.remove_piece(source);
        martyred = true;
    }

    if victim_kind == PieceKind::King {
        state.winner = Some(mover);
    }

    state.mode = InteractionMode::Idle;
    flip_turn(state, &mut board, mover);

    let mut text = format!(
        "{mover} sniped the {} {} on {target}",
        victim_side.to_string().to_lowercase(),
        victim_kind.name()
    );
    if martyred {
        text.push_str(" (martyred)");
    }
    if victim_kind == PieceKind::King {
        text.push_str(" and wins");
    }
    complete_turn(state, &board, text, rng, true);
    Ok(())
}

/// Accumulate a wall placement; the third one closes out the turn
fn place_wall(
    state: &mut GameState,
    source: Square,
    mut placed: Vec<Square>,
    target: Square,
    rng: &mut impl Rng,
) -> EngineResult<()> {
    let mover = state.turn;
    let mut board = state.board();

    // A failed placement does not consume a placement attempt
    if board.piece_at(target).is_some() {
        return Err(EngineError::invalid_target(format!(
            "{target} is occupied"
        )));
    }
    if state.walls.blocks(target) || placed.contains(&target) {
        return Err(EngineError::invalid_target(format!(
            "{target} already has a wall"
        )));
    }

    placed.push(target);
    if placed.len() < BUILDER_PLACEMENTS {
        debug!(
            "[ENGINE] {mover} placed wall {}/{} on {target}",
            placed.len(),
            BUILDER_PLACEMENTS
        );
        state.mode = InteractionMode::PlacingWalls { source, placed };
        return Ok(());
    }

    // Third placement: older walls age first, then the new batch lands
    // at full lifetime and the turn finally advances
    state.modifiers.remove(source);
    state.mode = InteractionMode::Idle;
    state.walls.tick();
    for sq in &placed {
        state.walls.place(*sq);
    }
    flip_turn(state, &mut board, mover);

    let squares = placed
        .iter()
        .map(|sq| sq.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    complete_turn(
        state,
        &board,
        format!("{mover} built walls on {squares}"),
        rng,
        false,
    );
    Ok(())
}
