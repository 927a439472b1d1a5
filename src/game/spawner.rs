//! Upgrade spawner - relocation and material-aware placement
//!
//! After every turn that does not leave an ability pending, the spawner
//! ensures exactly two upgrade entities exist on empty, upgrade-free
//! squares. Two passes run in order:
//!
//! 1. **Relocation ("cowardly") pass** - each existing upgrade slinks away
//!    from the most valuable pieces on the board, one orthogonal step at a
//!    time.
//! 2. **Spawn pass** - missing upgrades are placed with 10x weight on the
//!    badly losing side's half of the board, a deliberate comeback
//!    mechanic: the losing side is far more likely to receive the next
//!    mystery pickup.
//!
//! All randomness flows through the caller's `Rng` so replays and tests
//! stay deterministic under a fixed seed.

use rand::Rng;
use tracing::debug;
use uuid::Builder;

use crate::board::BoardAdapter;
use crate::core::{EngineError, EngineResult, Side, Square, Upgrade, UpgradeKind};

/// Upgrades the spawner tops the board up to
pub const TARGET_UPGRADES: usize = 2;

/// Material deficit at which a side counts as losing badly
const LOSING_BADLY_MARGIN: i32 = 3;

/// Representation multiplier for the losing side's half of the board
const LOSING_HALF_WEIGHT: usize = 10;

/// Candidate offsets in grid coordinates, in tie-break order:
/// stay > +x > -x > +y > -y
const RELOCATION_OFFSETS: [(i8, i8); 5] = [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)];

/// Run both spawner passes for a completed turn
pub fn run_end_of_turn(board: &BoardAdapter, upgrades: &mut Vec<Upgrade>, rng: &mut impl Rng) {
    relocate_all(board, upgrades);
    spawn_missing(board, upgrades, rng);
}

/// Relocation pass: move each upgrade to the neighboring free square that
/// maximizes its summed Manhattan distance to every maximum-value piece
///
/// Candidates are the upgrade's own square plus its four orthogonal
/// neighbors, restricted to squares with no piece and no other upgrade.
/// Ties break by enumeration order, so a state already at a local maximum
/// is left untouched.
pub fn relocate_all(board: &BoardAdapter, upgrades: &mut [Upgrade]) {
    let hot_squares = max_value_squares(board);

    for i in 0..upgrades.len() {
        let (x, y) = (upgrades[i].x, upgrades[i].y);
        let mut best: Option<(u8, u8)> = None;
        let mut best_score = -1i32;

        for (dx, dy) in RELOCATION_OFFSETS {
            let nx = x as i8 + dx;
            let ny = y as i8 + dy;
            if !(0..8).contains(&nx) || !(0..8).contains(&ny) {
                continue;
            }
            let (nx, ny) = (nx as u8, ny as u8);
            let sq = Square::from_grid(nx, ny).expect("offset stays on board");

            if board.piece_at(sq).is_some() {
                continue;
            }
            let taken = upgrades
                .iter()
                .enumerate()
                .any(|(j, u)| j != i && u.occupies(sq));
            if taken {
                continue;
            }

            let score: i32 = hot_squares
                .iter()
                .map(|hot| sq.manhattan(*hot) as i32)
                .sum();
            if score > best_score {
                best_score = score;
                best = Some((nx, ny));
            }
        }

        if let Some((nx, ny)) = best {
            upgrades[i].x = nx;
            upgrades[i].y = ny;
        }
    }
}

/// Spawn pass: top the board up to [`TARGET_UPGRADES`] entities
pub fn spawn_missing(board: &BoardAdapter, upgrades: &mut Vec<Upgrade>, rng: &mut impl Rng) {
    while upgrades.len() < TARGET_UPGRADES {
        match spawn_one(board, upgrades, rng) {
            Ok(upgrade) => {
                debug!(
                    "[SPAWNER] placed {} on {}",
                    upgrade.kind.label(),
                    upgrade.square()
                );
                upgrades.push(upgrade);
            }
            Err(EngineError::NoSpawnSpace) => {
                // Non-fatal: the board simply carries fewer pickups
                debug!("[SPAWNER] no free square left, {} on board", upgrades.len());
                break;
            }
            Err(_) => unreachable!("spawn_one only fails with NoSpawnSpace"),
        }
    }
}

/// Place a single upgrade on a weighted-random free square
///
/// When one side trails by [`LOSING_BADLY_MARGIN`] or more points of
/// material, free squares on that side's half of the board get
/// [`LOSING_HALF_WEIGHT`]x representation in the draw; otherwise the draw
/// is uniform. The ability kind is drawn uniformly from the full set.
pub fn spawn_one(
    board: &BoardAdapter,
    existing: &[Upgrade],
    rng: &mut impl Rng,
) -> EngineResult<Upgrade> {
    let diff = board.material_score(Side::White) as i32 - board.material_score(Side::Black) as i32;
    let white_losing_badly = diff <= -LOSING_BADLY_MARGIN;
    let black_losing_badly = diff >= LOSING_BADLY_MARGIN;

    let mut pool: Vec<(u8, u8)> = Vec::new();
    for y in 0..8u8 {
        for x in 0..8u8 {
            let sq = Square::from_grid(x, y).expect("grid loop stays on board");
            if board.piece_at(sq).is_some() || existing.iter().any(|u| u.occupies(sq)) {
                continue;
            }
            // Grid rows 4..7 are white's half, 0..3 black's
            let weight = if (white_losing_badly && y >= 4) || (black_losing_badly && y <= 3) {
                LOSING_HALF_WEIGHT
            } else {
                1
            };
            for _ in 0..weight {
                pool.push((x, y));
            }
        }
    }

    if pool.is_empty() {
        return Err(EngineError::NoSpawnSpace);
    }

    let (x, y) = pool[rng.random_range(0..pool.len())];
    let kind = UpgradeKind::ALL[rng.random_range(0..UpgradeKind::ALL.len())];
    let id = Builder::from_random_bytes(rng.random()).into_uuid().to_string();

    Ok(Upgrade { id, x, y, kind })
}

/// Occupied squares holding the maximum piece value on the board
fn max_value_squares(board: &BoardAdapter) -> Vec<Square> {
    let pieces = board.occupied();
    let max_value = pieces.iter().map(|(_, _, k)| k.value()).max().unwrap_or(0);
    pieces
        .into_iter()
        .filter(|(_, _, k)| k.value() == max_value)
        .map(|(sq, _, _)| sq)
        .collect()
}
