//! Action resolver - the engine's composition root
//!
//! Routes a player action to the matching executor and wraps every
//! resolution in turn and clock bookkeeping. The resolver is a pure
//! function over value types: it clones the incoming state, works on the
//! clone, and either returns it as the new canonical state or returns an
//! error with the original left untouched. No partial mutation is ever
//! observable.
//!
//! # Resolution pipeline
//!
//! 1. Reject anything once a winner is set.
//! 2. A click on the pending ability's own square cancels the mode free
//!    of charge.
//! 3. Charge wall-clock elapsed time to the acting side (`OutOfTime`
//!    rejects the action outright).
//! 4. Dispatch to the move pipeline or the ability executors.
//! 5. Stamp the clock and bump the concurrency token.

use rand::Rng;
use tracing::{debug, info};

use crate::board::BoardAdapter;
use crate::core::{EngineError, EngineResult, PieceKind, Side, Square, UpgradeKind};

use super::abilities;
use super::ghost;
use super::history::HistoryEntry;
use super::mode::InteractionMode;
use super::modifiers::{Modifier, TransferRule};
use super::spawner;
use super::state::{Action, GameState};

/// Resolve one player action against one game state
pub fn resolve(
    state: &GameState,
    action: &Action,
    now_ms: i64,
    rng: &mut impl Rng,
) -> EngineResult<GameState> {
    if state.winner.is_some() {
        return Err(EngineError::GameOver);
    }

    let mut next = state.clone();

    // Re-clicking the pending ability's own square discards the mode
    // without altering committed state, clock included.
    if let Action::AbilityTarget { square } = action {
        if next.mode.source() == Some(*square) {
            debug!("[ENGINE] {} cancelled the pending ability", next.acting_side());
            next.mode = InteractionMode::Idle;
            return Ok(next);
        }
    }

    let actor = next.acting_side();
    next.clock.charge(actor, now_ms)?;

    match action {
        Action::Move { from, to } => handle_move(&mut next, *from, *to, rng)?,
        Action::FireAbility { square } => abilities::fire(&mut next, *square)?,
        Action::AbilityTarget { square } => abilities::handle_target(&mut next, *square, rng)?,
        Action::Resign => handle_resign(&mut next, actor),
    }

    next.clock.stamp(now_ms);
    next.version += 1;
    Ok(next)
}

/// The ordinary move pipeline, modifier effects and pickups included
fn handle_move(
    state: &mut GameState,
    from: Square,
    to: Square,
    rng: &mut impl Rng,
) -> EngineResult<()> {
    if !state.mode.is_idle() {
        return Err(EngineError::invalid_target(
            "an ability is pending; target it or cancel first",
        ));
    }

    let mover = state.turn;
    let mut board = state.board();

    let Some((color, kind)) = board.piece_at(from) else {
        return Err(EngineError::invalid_move(format!("no piece on {from}")));
    };
    if color != mover {
        return Err(EngineError::invalid_move(format!(
            "{from} does not hold a {mover} piece"
        )));
    }

    let carried = state.modifiers.get(from);
    let ghost_move = carried.map(|m| m.kind == UpgradeKind::Ghost).unwrap_or(false);

    let capture: Option<(Square, PieceKind)>;
    let mut checkmate = false;
    let mut king_captured = false;

    if ghost_move {
        if !ghost::ghost_reachable(&board, from, to) {
            return Err(EngineError::invalid_move(format!(
                "{from}-{to} is unreachable even for a ghost"
            )));
        }
        match board.piece_at(to) {
            Some((c, _)) if c == mover => {
                return Err(EngineError::invalid_move(format!(
                    "{to} holds your own piece"
                )));
            }
            Some((_, PieceKind::King)) => king_captured = true,
            _ => {}
        }
        capture = board.piece_at(to).map(|(_, k)| (to, k));
        board.remove_piece(to);
        board.remove_piece(from);
        board.put_piece(to, mover, promoted_kind(kind, to, mover));
    } else {
        if state.walls.blocks(to) {
            return Err(EngineError::invalid_move(format!("{to} is walled off")));
        }
        let outcome = board.try_standard_move(from, to)?;
        capture = outcome.capture;
        checkmate = outcome.checkmate;
        board = BoardAdapter::from_fen(&outcome.fen)?;
    }

    // Capture-resolution hook: martyrdom takes the capturer down too.
    // The victim's modifier leaves the registry in any case.
    let mut attacker_destroyed = false;
    if let Some((victim_sq, _)) = capture {
        if let Some(victim_mod) = state.modifiers.remove(victim_sq) {
            if victim_mod.kind == UpgradeKind::Martyrdom {
                info!("[ENGINE] martyrdom on {victim_sq} destroys the capturing piece");
                board.remove_piece(to);
                attacker_destroyed = true;
            }
        }
    }

    let mut turn_flips = true;
    let mut notes: Vec<String> = Vec::new();

    if attacker_destroyed {
        notes.push("martyred".to_string());
    }
    if ghost_move && !attacker_destroyed {
        notes.push("ghost".to_string());
    }

    // Carried modifier: transfer, drop with effect, or fire on landing.
    // A piece destroyed on arrival forfeits whatever it carried.
    if let Some(m) = carried {
        state.modifiers.remove(from);
        if !attacker_destroyed {
            match m.kind.transfer_rule() {
                TransferRule::Carry => {
                    state.modifiers.insert(to, m);
                }
                TransferRule::Drop => match m.kind {
                    UpgradeKind::DoubleMove => {
                        turn_flips = false;
                        notes.push("moves again".to_string());
                    }
                    UpgradeKind::Necromancer => {
                        if capture.is_some() {
                            raise_pawn(&mut board, from, mover, &mut notes);
                        }
                    }
                    // Ghost already shaped the move itself
                    _ => {}
                },
                TransferRule::FireOnLanding => {
                    apply_time_effect(state, mover, m.kind, &mut notes);
                }
            }
        }
    }

    // Landing on a pickup consumes it. It becomes the modifier at the
    // destination (overwriting anything transferred), fires instantly for
    // the clock kinds, or opens the swap state.
    let mut entered_swap = false;
    if !attacker_destroyed {
        if let Some(idx) = state.upgrades.iter().position(|u| u.occupies(to)) {
            let picked = state.upgrades.remove(idx);
            match picked.kind {
                UpgradeKind::Swap => {
                    entered_swap = true;
                    notes.push("swap armed".to_string());
                }
                UpgradeKind::TimeAdd | UpgradeKind::TimeSub => {
                    apply_time_effect(state, mover, picked.kind, &mut notes);
                }
                kind => {
                    state.modifiers.insert(
                        to,
                        Modifier {
                            kind,
                            active_turn: mover,
                        },
                    );
                    notes.push(format!("picked up {}", kind.label()));
                }
            }
        }
    }

    if king_captured {
        state.winner = Some(mover);
        notes.push("wins by king capture".to_string());
    } else if checkmate {
        state.winner = Some(mover);
        notes.push("checkmate".to_string());
    }

    if entered_swap {
        state.mode = InteractionMode::AwaitingSwap {
            source: to,
            by: mover,
        };
    }

    if turn_flips {
        flip_turn(state, &mut board, mover);
    } else {
        keep_turn(state, &mut board, mover);
    }

    let text = move_text(mover, from, to, capture.is_some(), &notes);
    complete_turn(state, &board, text, rng, true);
    Ok(())
}

fn handle_resign(state: &mut GameState, actor: Side) {
    info!("[ENGINE] {actor} resigns");
    state.winner = Some(actor.opponent());
    state.mode = InteractionMode::Idle;
    let entry = snapshot(state, format!("{actor} resigns"));
    state.history.append(entry);
}

/// Pass the turn to the opponent and pay the mover's increment
pub(super) fn flip_turn(state: &mut GameState, board: &mut BoardAdapter, mover: Side) {
    state.turn = mover.opponent();
    sync_side(board, state.turn);
    state.clock.apply_increment(mover);
}

/// Keep the turn with the mover (double move) and resync the position
pub(super) fn keep_turn(state: &mut GameState, board: &mut BoardAdapter, mover: Side) {
    state.turn = mover;
    sync_side(board, state.turn);
}

/// Rewrite the position's turn token only when it disagrees
///
/// A plain standard move already flipped inside the rules engine; leaving
/// it alone preserves the en passant square for the reply.
pub(super) fn sync_side(board: &mut BoardAdapter, side: Side) {
    if board.side_to_move() != side {
        board.set_side_to_move(side);
    }
}

/// Shared end-of-turn bookkeeping
///
/// Publishes the position string, then - unless an ability mode is still
/// pending, which defers everything below to its resolution - decays
/// walls, runs the spawner passes and appends the history entry.
pub(super) fn complete_turn(
    state: &mut GameState,
    board: &BoardAdapter,
    text: String,
    rng: &mut impl Rng,
    decay_walls: bool,
) {
    state.fen = board.to_fen();

    if !state.mode.is_idle() {
        return;
    }

    if decay_walls {
        state.walls.tick();
    }
    if state.winner.is_none() {
        spawner::run_end_of_turn(board, &mut state.upgrades, rng);
    }

    info!("[ENGINE] {text}");
    let entry = snapshot(state, text);
    state.history.append(entry);
}

fn snapshot(state: &GameState, text: String) -> HistoryEntry {
    HistoryEntry {
        position: state.fen.clone(),
        upgrades: state.upgrades.clone(),
        modifiers: state.modifiers.clone(),
        walls: state.walls.clone(),
        text,
    }
}

fn raise_pawn(board: &mut BoardAdapter, at: Square, mover: Side, notes: &mut Vec<String>) {
    // A pawn cannot stand on a back rank; the raise fizzles there
    if at.rank.index() == 0 || at.rank.index() == 7 {
        debug!("[ENGINE] necromancer fizzles on back rank {at}");
        return;
    }
    board.put_piece(at, mover, PieceKind::Pawn);
    notes.push(format!("pawn raised on {at}"));
}

fn apply_time_effect(state: &mut GameState, mover: Side, kind: UpgradeKind, notes: &mut Vec<String>) {
    match kind {
        UpgradeKind::TimeAdd => {
            state.clock.add_bonus(mover);
            notes.push("+30s".to_string());
        }
        UpgradeKind::TimeSub => {
            state.clock.drain(mover.opponent());
            notes.push("opponent -15s".to_string());
        }
        _ => {}
    }
}

fn promoted_kind(kind: PieceKind, to: Square, mover: Side) -> PieceKind {
    let last_rank = match mover {
        Side::White => 7,
        Side::Black => 0,
    };
    if kind == PieceKind::Pawn && to.rank.index() == last_rank {
        PieceKind::Queen
    } else {
        kind
    }
}

fn move_text(mover: Side, from: Square, to: Square, captured: bool, notes: &[String]) -> String {
    let sep = if captured { 'x' } else { '-' };
    let mut text = format!("{mover}: {from}{sep}{to}");
    if !notes.is_empty() {
        text.push_str(&format!(" ({})", notes.join(", ")));
    }
    text
}
