//! Type definitions and utilities for the variant game logic
//!
//! Provides newtype patterns and trait implementations for board
//! coordinates, sides, piece values and the upgrade/modifier vocabulary.
//!
//! # Coordinate Systems
//!
//! Two coordinate systems are in play and must never be mixed silently:
//!
//! - **Algebraic**: file a-h, rank 1-8, the key type used throughout the
//!   engine (`Square`).
//! - **Grid**: `(x, y)` board-array indexing used by upgrade entities,
//!   where `y = 0` is rank 8 (black's back rank). Conversions apply
//!   `rank = 8 - y`; use [`Square::from_grid`] and [`Square::grid`] rather
//!   than open-coding the flip.

use serde::{Deserialize, Serialize};

/// Side to move, serialized as `"w"` / `"b"` to match the stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// One-letter token used in position strings and documents
    pub fn token(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// Board coordinate representing a file (column) on the chessboard
///
/// Values range from 0 (file 'a') to 7 (file 'h').
/// This newtype prevents mixing up x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File(pub u8);

impl File {
    /// Create a file from a character ('a'..='h')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Convert file to character ('a'..='h')
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Get the file index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board coordinate representing a rank (row) on the chessboard
///
/// Values range from 0 (rank 1) to 7 (rank 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u8);

impl Rank {
    /// Create a rank from a number (1-8)
    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=8).contains(&n) {
            Some(Rank(n - 1))
        } else {
            None
        }
    }

    /// Convert rank to number (1-8)
    pub fn to_number(self) -> u8 {
        self.0 + 1
    }

    /// Get the rank index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board square position (file, rank)
///
/// The key type used by the modifier registry, the wall system and the
/// ability executors. Serialized as algebraic notation (`"e4"`), matching
/// the keys of the stored document's modifier and wall maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    pub file: File,
    pub rank: Rank,
}

impl Square {
    /// Create a square from file and rank indices (0-7 each)
    ///
    /// Returns `None` when either index is off the 8x8 board; callers must
    /// validate before any lookup.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square {
                file: File(file),
                rank: Rank(rank),
            })
        } else {
            None
        }
    }

    /// Create a square from algebraic notation (e.g., "e4")
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        let rank_char = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let rank_num = rank_char.to_digit(10)? as u8;

        Some(Square {
            file: File::from_char(file_char)?,
            rank: Rank::from_number(rank_num)?,
        })
    }

    /// Convert square to algebraic notation (e.g., "e4")
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file.to_char(), self.rank.to_number())
    }

    /// Create a square from grid coordinates where `y = 0` is rank 8
    pub fn from_grid(x: u8, y: u8) -> Option<Self> {
        if x < 8 && y < 8 {
            Square::new(x, 7 - y)
        } else {
            None
        }
    }

    /// Convert to grid coordinates `(x, y)` where `y = 0` is rank 8
    pub fn grid(self) -> (u8, u8) {
        (self.file.index(), 7 - self.rank.index())
    }

    /// Manhattan distance to another square
    pub fn manhattan(self, other: Square) -> u8 {
        self.file.index().abs_diff(other.file.index())
            + self.rank.index().abs_diff(other.rank.index())
    }

    /// Chebyshev (king-move) distance to another square
    pub fn chebyshev(self, other: Square) -> u8 {
        self.file
            .index()
            .abs_diff(other.file.index())
            .max(self.rank.index().abs_diff(other.rank.index()))
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank.to_number())
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_algebraic()
    }
}

impl TryFrom<String> for Square {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Square::from_algebraic(&s).ok_or_else(|| format!("invalid square: {s:?}"))
    }
}

/// Piece kinds as the adapter reports them, with standard material values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Standard material value (q=9, r=5, b=3, n=3, p=1, k=0)
    ///
    /// Used both for the spawner's comeback weighting and for the
    /// relocation pass's threat map.
    pub fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

/// The full set of mystery pickup abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    Swap,
    Sniper,
    Builder,
    Ghost,
    DoubleMove,
    Necromancer,
    Martyrdom,
    HiddenMove,
    TimeAdd,
    TimeSub,
}

impl UpgradeKind {
    /// Every kind, in the order the spawner draws from
    pub const ALL: [UpgradeKind; 10] = [
        UpgradeKind::Swap,
        UpgradeKind::Sniper,
        UpgradeKind::Builder,
        UpgradeKind::Ghost,
        UpgradeKind::DoubleMove,
        UpgradeKind::Necromancer,
        UpgradeKind::Martyrdom,
        UpgradeKind::HiddenMove,
        UpgradeKind::TimeAdd,
        UpgradeKind::TimeSub,
    ];

    /// Abilities armed by an explicit "fire" click rather than by moving
    pub fn is_fired(self) -> bool {
        matches!(
            self,
            UpgradeKind::Swap | UpgradeKind::Sniper | UpgradeKind::Builder
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::Swap => "swap",
            UpgradeKind::Sniper => "sniper",
            UpgradeKind::Builder => "builder",
            UpgradeKind::Ghost => "ghost",
            UpgradeKind::DoubleMove => "double move",
            UpgradeKind::Necromancer => "necromancer",
            UpgradeKind::Martyrdom => "martyrdom",
            UpgradeKind::HiddenMove => "hidden move",
            UpgradeKind::TimeAdd => "time boost",
            UpgradeKind::TimeSub => "time drain",
        }
    }
}

/// A mystery pickup occupying a board square
///
/// Lives on grid coordinates (`y = 0` is rank 8). At most one upgrade
/// occupies a given square at a time; the spawner enforces this. An
/// upgrade is destroyed when a piece lands on its square (consumed into a
/// modifier) or survives in place when relocation finds no destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    /// Opaque unique id
    pub id: String,
    pub x: u8,
    pub y: u8,
    #[serde(rename = "type")]
    pub kind: UpgradeKind,
}

impl Upgrade {
    /// The algebraic square this upgrade sits on
    ///
    /// Out-of-range grid coordinates from an untrusted document are
    /// clamped to the board edge rather than panicking.
    pub fn square(&self) -> Square {
        Square::from_grid(self.x.min(7), self.y.min(7)).expect("clamped coords are on the board")
    }

    pub fn occupies(&self, sq: Square) -> bool {
        self.square() == sq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_to_char() {
        assert_eq!(File(0).to_char(), 'a');
        assert_eq!(File(4).to_char(), 'e');
        assert_eq!(File(7).to_char(), 'h');
    }

    #[test]
    fn test_rank_from_number() {
        assert_eq!(Rank::from_number(1), Some(Rank(0)));
        assert_eq!(Rank::from_number(8), Some(Rank(7)));
        assert_eq!(Rank::from_number(0), None);
        assert_eq!(Rank::from_number(9), None);
    }

    #[test]
    fn test_square_algebraic() {
        let square = Square::from_algebraic("e4").unwrap();
        assert_eq!(square.file.index(), 4);
        assert_eq!(square.rank.index(), 3);
        assert_eq!(square.to_algebraic(), "e4");

        assert!(Square::from_algebraic("i4").is_none());
        assert!(Square::from_algebraic("e9").is_none());
        assert!(Square::from_algebraic("e44").is_none());
    }

    #[test]
    fn test_square_grid_flip() {
        //! Grid y=0 is rank 8: a8 is (0,0), a1 is (0,7), e4 is (4,4)
        assert_eq!(Square::from_algebraic("a8").unwrap().grid(), (0, 0));
        assert_eq!(Square::from_algebraic("a1").unwrap().grid(), (0, 7));
        assert_eq!(Square::from_algebraic("e4").unwrap().grid(), (4, 4));

        let sq = Square::from_grid(4, 4).unwrap();
        assert_eq!(sq.to_algebraic(), "e4");
    }

    #[test]
    fn test_square_grid_roundtrip() {
        for x in 0..8 {
            for y in 0..8 {
                let sq = Square::from_grid(x, y).unwrap();
                assert_eq!(sq.grid(), (x, y), "roundtrip failed for ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_distances() {
        let d4 = Square::from_algebraic("d4").unwrap();
        let g7 = Square::from_algebraic("g7").unwrap();
        assert_eq!(d4.chebyshev(g7), 3);
        assert_eq!(d4.manhattan(g7), 6);
    }

    #[test]
    fn test_side_serde_tokens() {
        assert_eq!(serde_json::to_string(&Side::White).unwrap(), "\"w\"");
        assert_eq!(
            serde_json::from_str::<Side>("\"b\"").unwrap(),
            Side::Black
        );
    }

    #[test]
    fn test_upgrade_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&UpgradeKind::DoubleMove).unwrap(),
            "\"double_move\""
        );
        assert_eq!(
            serde_json::from_str::<UpgradeKind>("\"time_sub\"").unwrap(),
            UpgradeKind::TimeSub
        );
    }

    #[test]
    fn test_upgrade_document_shape() {
        //! The stored document spells the kind field "type"
        let upgrade = Upgrade {
            id: "u-1".to_string(),
            x: 4,
            y: 4,
            kind: UpgradeKind::Ghost,
        };
        let json = serde_json::to_value(&upgrade).unwrap();
        assert_eq!(json["type"], "ghost");
        assert_eq!(upgrade.square().to_algebraic(), "e4");
    }
}
