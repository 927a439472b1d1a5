//! Chess-rules adapter - single source of truth for orthodox legality
//!
//! Wraps shakmaty behind a small surface: parse and emit position strings,
//! attempt a standard move (promotion always resolves to queen), and apply
//! the raw board edits the ability executors need (put, remove, side-to-move
//! rewrite). Raw edits work on the setup level so positions the variant can
//! produce (a snapped king, swapped back-rank pieces) never panic the
//! orthodox validator.
//!
//! # Contract
//!
//! `try_standard_move` has no side effects beyond the position it is given:
//! it returns a fresh position string plus capture and checkmate flags, or
//! fails with `InvalidMove` leaving the adapter untouched.

use shakmaty::fen::Fen;
use shakmaty::{
    CastlingMode, CastlingSide, Chess, Color, EnPassantMode, FromSetup, Move, Piece, Position,
    PositionError, Role, Setup,
};

use crate::core::{EngineError, EngineResult, PieceKind, Side, Square};

/// Standard chess starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Outcome of a successful standard move
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// Position string after the move, side-to-move already flipped
    pub fen: String,
    /// Square and kind of the captured piece, if any (en passant reports
    /// the pawn's actual square, not the move destination)
    pub capture: Option<(Square, PieceKind)>,
    /// Whether the move delivered checkmate
    pub checkmate: bool,
}

/// Wrapper around the external rules engine's position
///
/// Holds the position at setup level so board surgery stays possible even
/// when the resulting position is not reachable in orthodox chess.
#[derive(Debug, Clone)]
pub struct BoardAdapter {
    setup: Setup,
}

impl BoardAdapter {
    /// Parse a position string
    ///
    /// Fails on syntactically malformed input; callers holding a last known
    /// good position are expected to fall back to it rather than crash.
    pub fn from_fen(fen: &str) -> EngineResult<Self> {
        let parsed: Fen = fen
            .parse()
            .map_err(|_| EngineError::invalid_move(format!("unparseable position: {fen:?}")))?;
        Ok(BoardAdapter {
            setup: parsed.into_setup(),
        })
    }

    /// Starting position adapter
    pub fn start() -> Self {
        BoardAdapter::from_fen(START_FEN).expect("start position parses")
    }

    /// Emit the canonical position string
    pub fn to_fen(&self) -> String {
        Fen::from_setup(self.setup.clone()).to_string()
    }

    pub fn side_to_move(&self) -> Side {
        from_engine_color(self.setup.turn)
    }

    /// Rewrite the turn token inside the position
    ///
    /// Abilities that revert or pre-flip the turn (double move, swap fire)
    /// must keep the position string consistent with the engine's turn
    /// token. Clears any en passant square, which is only meaningful for
    /// the side the rules engine expected to move.
    pub fn set_side_to_move(&mut self, side: Side) {
        self.setup.turn = to_engine_color(side);
        self.setup.ep_square = None;
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Side, PieceKind)> {
        self.setup
            .board
            .piece_at(to_engine_square(sq))
            .map(|p| (from_engine_color(p.color), from_engine_role(p.role)))
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Place a piece, replacing whatever occupied the square
    pub fn put_piece(&mut self, sq: Square, side: Side, kind: PieceKind) {
        self.setup.board.set_piece_at(
            to_engine_square(sq),
            Piece {
                color: to_engine_color(side),
                role: to_engine_role(kind),
            },
        );
    }

    /// Remove and report the piece on a square
    pub fn remove_piece(&mut self, sq: Square) -> Option<(Side, PieceKind)> {
        self.setup
            .board
            .remove_piece_at(to_engine_square(sq))
            .map(|p| (from_engine_color(p.color), from_engine_role(p.role)))
    }

    /// All occupied squares with their piece
    pub fn occupied(&self) -> Vec<(Square, Side, PieceKind)> {
        let mut pieces = Vec::with_capacity(32);
        for sq in self.setup.board.occupied() {
            if let Some(p) = self.setup.board.piece_at(sq) {
                pieces.push((
                    from_engine_square(sq),
                    from_engine_color(p.color),
                    from_engine_role(p.role),
                ));
            }
        }
        pieces
    }

    /// Sum of standard piece values for one side
    pub fn material_score(&self, side: Side) -> u32 {
        self.occupied()
            .into_iter()
            .filter(|(_, s, _)| *s == side)
            .map(|(_, _, kind)| kind.value())
            .sum()
    }

    /// Attempt a standard legal move; promotion always resolves to queen
    pub fn try_standard_move(&self, from: Square, to: Square) -> EngineResult<MoveOutcome> {
        let pos = self.position()?;
        let from_sq = to_engine_square(from);
        let to_sq = to_engine_square(to);

        let mut chosen: Option<Move> = None;
        for m in pos.legal_moves() {
            if !move_matches(&m, from_sq, to_sq) {
                continue;
            }
            // Under-promotions share from/to with the queen promotion;
            // keep scanning until the queen (or plain) candidate shows up.
            match m.promotion() {
                None | Some(Role::Queen) => {
                    chosen = Some(m);
                    break;
                }
                _ => {}
            }
        }

        let m = chosen.ok_or_else(|| {
            EngineError::invalid_move(format!("{from}-{to} is not a legal move"))
        })?;

        let capture = m.capture().map(|role| {
            let victim_sq = if m.is_en_passant() {
                Square::new(to.file.index(), from.rank.index()).expect("en passant rank in range")
            } else {
                to
            };
            (victim_sq, from_engine_role(role))
        });

        let next = pos
            .play(&m)
            .map_err(|_| EngineError::invalid_move("rejected by rules engine"))?;
        let checkmate = next.is_checkmate();
        let fen = Fen::from_setup(next.into_setup(EnPassantMode::Legal)).to_string();

        Ok(MoveOutcome {
            fen,
            capture,
            checkmate,
        })
    }

    /// Validate the setup into a playable position
    ///
    /// Ability surgery can leave artifacts the orthodox validator objects
    /// to (stale castling rights after a swap, impossible checks); those
    /// are ignored rather than surfaced, since the variant legitimately
    /// produces them.
    fn position(&self) -> EngineResult<Chess> {
        Chess::from_setup(self.setup.clone(), CastlingMode::Standard)
            .or_else(PositionError::ignore_invalid_castling_rights)
            .or_else(PositionError::ignore_invalid_ep_square)
            .or_else(PositionError::ignore_impossible_check)
            .map_err(|_| EngineError::invalid_move("position is not playable"))
    }
}

fn move_matches(m: &Move, from: shakmaty::Square, to: shakmaty::Square) -> bool {
    match *m {
        // The rules engine encodes castling as king-takes-rook; players
        // click the king's two-square destination.
        Move::Castle { king, rook } => {
            let side = if rook > king {
                CastlingSide::KingSide
            } else {
                CastlingSide::QueenSide
            };
            king == from && shakmaty::Square::from_coords(side.king_to_file(), king.rank()) == to
        }
        _ => m.from() == Some(from) && m.to() == to,
    }
}

fn to_engine_square(sq: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        shakmaty::File::new(sq.file.index() as u32),
        shakmaty::Rank::new(sq.rank.index() as u32),
    )
}

fn from_engine_square(sq: shakmaty::Square) -> Square {
    Square::new(u32::from(sq.file()) as u8, u32::from(sq.rank()) as u8)
        .expect("engine squares are on the board")
}

fn to_engine_color(side: Side) -> Color {
    match side {
        Side::White => Color::White,
        Side::Black => Color::Black,
    }
}

fn from_engine_color(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn to_engine_role(kind: PieceKind) -> Role {
    match kind {
        PieceKind::Pawn => Role::Pawn,
        PieceKind::Knight => Role::Knight,
        PieceKind::Bishop => Role::Bishop,
        PieceKind::Rook => Role::Rook,
        PieceKind::Queen => Role::Queen,
        PieceKind::King => Role::King,
    }
}

fn from_engine_role(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_start_position_roundtrip() {
        let board = BoardAdapter::start();
        assert_eq!(board.to_fen(), START_FEN);
        assert_eq!(board.side_to_move(), Side::White);
    }

    #[test]
    fn test_simple_pawn_push() {
        let board = BoardAdapter::start();
        let outcome = board.try_standard_move(sq("e2"), sq("e4")).unwrap();
        assert!(outcome.capture.is_none());
        assert!(!outcome.checkmate);

        let after = BoardAdapter::from_fen(&outcome.fen).unwrap();
        assert_eq!(after.side_to_move(), Side::Black);
        assert_eq!(
            after.piece_at(sq("e4")),
            Some((Side::White, PieceKind::Pawn))
        );
        assert!(after.is_empty(sq("e2")));
    }

    #[test]
    fn test_illegal_move_rejected() {
        let board = BoardAdapter::start();
        let err = board.try_standard_move(sq("e2"), sq("e5")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidMove { .. }));
        // No side effects on the adapter it was asked against
        assert_eq!(board.to_fen(), START_FEN);
    }

    #[test]
    fn test_capture_reports_victim() {
        // Scandinavian: 1. e4 d5 2. exd5
        let board = BoardAdapter::start();
        let board =
            BoardAdapter::from_fen(&board.try_standard_move(sq("e2"), sq("e4")).unwrap().fen)
                .unwrap();
        let board =
            BoardAdapter::from_fen(&board.try_standard_move(sq("d7"), sq("d5")).unwrap().fen)
                .unwrap();
        let outcome = board.try_standard_move(sq("e4"), sq("d5")).unwrap();
        assert_eq!(outcome.capture, Some((sq("d5"), PieceKind::Pawn)));
    }

    #[test]
    fn test_checkmate_detection() {
        // Fool's mate final move: 2... Qh4#
        let board = BoardAdapter::from_fen(
            "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2",
        )
        .unwrap();
        let outcome = board.try_standard_move(sq("d8"), sq("h4")).unwrap();
        assert!(outcome.checkmate, "Qh4 should be mate");
    }

    #[test]
    fn test_promotion_resolves_to_queen() {
        let board = BoardAdapter::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let outcome = board.try_standard_move(sq("a7"), sq("a8")).unwrap();
        let after = BoardAdapter::from_fen(&outcome.fen).unwrap();
        assert_eq!(
            after.piece_at(sq("a8")),
            Some((Side::White, PieceKind::Queen))
        );
    }

    #[test]
    fn test_castling_by_king_destination() {
        let board =
            BoardAdapter::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let outcome = board.try_standard_move(sq("e1"), sq("g1")).unwrap();
        let after = BoardAdapter::from_fen(&outcome.fen).unwrap();
        assert_eq!(
            after.piece_at(sq("g1")),
            Some((Side::White, PieceKind::King))
        );
        assert_eq!(
            after.piece_at(sq("f1")),
            Some((Side::White, PieceKind::Rook))
        );
    }

    #[test]
    fn test_put_remove_and_turn_rewrite() {
        let mut board = BoardAdapter::start();
        assert_eq!(
            board.remove_piece(sq("d1")),
            Some((Side::White, PieceKind::Queen))
        );
        board.put_piece(sq("d5"), Side::White, PieceKind::Queen);
        board.set_side_to_move(Side::Black);

        let reparsed = BoardAdapter::from_fen(&board.to_fen()).unwrap();
        assert_eq!(reparsed.side_to_move(), Side::Black);
        assert_eq!(
            reparsed.piece_at(sq("d5")),
            Some((Side::White, PieceKind::Queen))
        );
        assert!(reparsed.is_empty(sq("d1")));
    }

    #[test]
    fn test_material_score() {
        let board = BoardAdapter::start();
        // 8 pawns + 2 rooks + 2 knights + 2 bishops + queen = 39
        assert_eq!(board.material_score(Side::White), 39);
        assert_eq!(board.material_score(Side::Black), 39);

        let board = BoardAdapter::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        assert_eq!(board.material_score(Side::White), 9);
        assert_eq!(board.material_score(Side::Black), 0);
    }

    #[test]
    fn test_malformed_fen_rejected() {
        assert!(BoardAdapter::from_fen("not a position").is_err());
    }
}
