//! Ghost-move geometry
//!
//! A ghost move is validated as if every non-king piece other than the
//! source and destination were absent: only kings block sliding paths, and
//! walls are ignored entirely. Pure functions with no side effects - easy
//! to test.
//!
//! King safety is deliberately not re-checked here; with all ordinary
//! blockers gone the orthodox check rules stop being meaningful for this
//! one move.

use crate::board::BoardAdapter;
use crate::core::{PieceKind, Side, Square};

/// Whether the piece on `from` can ghost its way to `to`
///
/// Destination occupancy rules (friendly block, king capture win) are the
/// resolver's business; this answers movement geometry only, with pawns
/// as the exception because their capture geometry differs from their
/// push geometry.
pub fn ghost_reachable(board: &BoardAdapter, from: Square, to: Square) -> bool {
    if from == to {
        return false;
    }
    let Some((color, kind)) = board.piece_at(from) else {
        return false;
    };

    match kind {
        PieceKind::Pawn => is_valid_pawn_move(board, from, to, color),
        PieceKind::Knight => is_valid_knight_move(from, to),
        PieceKind::Bishop => is_valid_bishop_move(board, from, to),
        PieceKind::Rook => is_valid_rook_move(board, from, to),
        PieceKind::Queen => {
            is_valid_rook_move(board, from, to) || is_valid_bishop_move(board, from, to)
        }
        PieceKind::King => from.chebyshev(to) == 1,
    }
}

fn is_valid_pawn_move(board: &BoardAdapter, from: Square, to: Square, color: Side) -> bool {
    let direction: i8 = match color {
        Side::White => 1,
        Side::Black => -1,
    };
    let start_rank: u8 = match color {
        Side::White => 1,
        Side::Black => 6,
    };

    let dx = to.file.index() as i8 - from.file.index() as i8;
    let dy = to.rank.index() as i8 - from.rank.index() as i8;

    // Forward pushes need an empty destination
    if dx == 0 && dy == direction {
        return board.is_empty(to);
    }

    // Double push from the starting rank; only a king can block the
    // intermediate square on a ghost move
    if dx == 0 && dy == 2 * direction && from.rank.index() == start_rank {
        let mid = Square::new(
            from.file.index(),
            (from.rank.index() as i8 + direction) as u8,
        )
        .expect("intermediate square on board");
        return !is_king_square(board, mid) && board.is_empty(to);
    }

    // Diagonal steps are captures and need a real piece to take
    if dx.abs() == 1 && dy == direction {
        return board.piece_at(to).is_some();
    }

    false
}

fn is_valid_knight_move(from: Square, to: Square) -> bool {
    let dx = from.file.index().abs_diff(to.file.index());
    let dy = from.rank.index().abs_diff(to.rank.index());
    (dx == 2 && dy == 1) || (dx == 1 && dy == 2)
}

fn is_valid_bishop_move(board: &BoardAdapter, from: Square, to: Square) -> bool {
    let dx = from.file.index().abs_diff(to.file.index());
    let dy = from.rank.index().abs_diff(to.rank.index());
    if dx != dy {
        return false;
    }
    is_path_king_clear(board, from, to)
}

fn is_valid_rook_move(board: &BoardAdapter, from: Square, to: Square) -> bool {
    if from.file != to.file && from.rank != to.rank {
        return false;
    }
    is_path_king_clear(board, from, to)
}

/// Path check where only kings count as blockers
fn is_path_king_clear(board: &BoardAdapter, from: Square, to: Square) -> bool {
    let dx = (to.file.index() as i8 - from.file.index() as i8).signum();
    let dy = (to.rank.index() as i8 - from.rank.index() as i8).signum();

    let mut x = from.file.index() as i8 + dx;
    let mut y = from.rank.index() as i8 + dy;

    while (x, y) != (to.file.index() as i8, to.rank.index() as i8) {
        let sq = Square::new(x as u8, y as u8).expect("path stays on board");
        if is_king_square(board, sq) {
            return false;
        }
        x += dx;
        y += dy;
    }

    true
}

fn is_king_square(board: &BoardAdapter, sq: Square) -> bool {
    matches!(board.piece_at(sq), Some((_, PieceKind::King)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_rook_ghosts_through_pawns() {
        let board = BoardAdapter::start();
        // a1 rook through a2 pawn up the file
        assert!(ghost_reachable(&board, sq("a1"), sq("a6")));
        // but not sideways through its own first rank onto a knight's
        // square via an L - geometry still applies
        assert!(!ghost_reachable(&board, sq("a1"), sq("b3")));
    }

    #[test]
    fn test_bishop_ghosts_diagonally() {
        let board = BoardAdapter::start();
        assert!(ghost_reachable(&board, sq("c1"), sq("h6")));
        assert!(!ghost_reachable(&board, sq("c1"), sq("c4")));
    }

    #[test]
    fn test_kings_still_block_the_path() {
        // White rook on e4, black king on e6: e4-e8 is blocked, e4-e5 fine
        let board = BoardAdapter::from_fen("8/8/4k3/8/4R3/8/8/4K3 w - - 0 1").unwrap();
        assert!(!ghost_reachable(&board, sq("e4"), sq("e8")));
        assert!(ghost_reachable(&board, sq("e4"), sq("e5")));
    }

    #[test]
    fn test_pawn_ghost_geometry() {
        let board = BoardAdapter::start();
        // Forward pushes from the start rank
        assert!(ghost_reachable(&board, sq("e2"), sq("e3")));
        assert!(ghost_reachable(&board, sq("e2"), sq("e4")));
        // Diagonal without a piece to take is not a move
        assert!(!ghost_reachable(&board, sq("e2"), sq("d3")));
        // Backwards never
        assert!(!ghost_reachable(&board, sq("e2"), sq("e1")));
    }

    #[test]
    fn test_pawn_forward_needs_empty_destination() {
        // Black pawn directly ahead on e3
        let board =
            BoardAdapter::from_fen("rnbqkbnr/pppp1ppp/8/8/8/4p3/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        assert!(!ghost_reachable(&board, sq("e2"), sq("e3")));
        // But the diagonal capture geometry works
        assert!(ghost_reachable(&board, sq("d2"), sq("e3")));
    }
}
