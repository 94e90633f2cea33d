//! Level configuration and procedural board generation.
//!
//! Pieces are seeded from the centre of the grid outwards. Each accepted
//! placement puts the tail on the inner cell and the head on the outer one,
//! so every piece starts out pointing away from the centre.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::geometry::{all_cells, doubled_center_distance_sq, in_bounds, step, Direction};
use crate::grid::{sort_row_major, validate, Occupancy};
use crate::pieces::{Piece, PieceId, PieceKind, BOMB_DURATION_SECS, PALETTE_MAX};

/// Range the random count of empty cells is drawn from.
pub const EMPTY_SLOTS: RangeInclusive<i32> = 2..=10;

/// Message shown the first time level 1 starts.
pub const FIRST_LEVEL_MESSAGE: &str = "Tap a block to send it sliding. Clear the board to win!";

/// Message shown when bombs first appear.
pub const BOMB_UNLOCK_MESSAGE: &str = "Bombs unlocked! Clear them before their timers run out.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level numbers start at 1, got {0}")]
    InvalidLevel(u32),
}

/// Difficulty settings derived from the level number alone.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    pub grid_size: i32,
    pub variant_count: u8,
    pub bomb_probability: f64,
    pub unlock_message: Option<&'static str>,
}

impl LevelConfig {
    /// Computes the difficulty step function for `level`.
    pub fn for_level(level: u32) -> Result<Self, LevelError> {
        if level == 0 {
            return Err(LevelError::InvalidLevel(level));
        }

        let grid_size = match level {
            0..=4 => 8,
            5..=9 => 9,
            10..=19 => 10,
            _ => 11,
        };
        let palette_growth = u8::try_from((level - 1) / 3).unwrap_or(u8::MAX);
        let variant_count = PALETTE_MAX.min(2u8.saturating_add(palette_growth));
        let bomb_probability = match level {
            0..=4 => 0.0,
            5..=14 => 0.05,
            15..=29 => 0.10,
            _ => 0.15,
        };
        let unlock_message = match level {
            1 => Some(FIRST_LEVEL_MESSAGE),
            5 => Some(BOMB_UNLOCK_MESSAGE),
            _ => None,
        };

        Ok(Self {
            grid_size,
            variant_count,
            bomb_probability,
            unlock_message,
        })
    }
}

/// A freshly generated level.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub level: u32,
    pub grid_size: i32,
    /// Sorted row-major by head.
    pub pieces: Vec<Piece>,
    pub unlock_message: Option<&'static str>,
}

/// Generates the board for `level`.
pub fn generate_level(level: u32, rng: &mut impl Rng) -> Result<LevelData, LevelError> {
    let config = LevelConfig::for_level(level)?;
    let grid_size = config.grid_size;

    let empty_slots = rng.random_range(EMPTY_SLOTS);
    let target = ((grid_size * grid_size - empty_slots) / 2) as usize;

    let pieces = place_pieces(&config, target, rng);
    debug_assert!(validate(&pieces, grid_size).is_ok());

    log::debug!(
        "generated level {level}: {}x{grid_size} grid, {}/{target} pieces, {} bombs",
        grid_size,
        pieces.len(),
        pieces.iter().filter(|piece| piece.is_bomb()).count()
    );

    Ok(LevelData {
        level,
        grid_size,
        pieces,
        unlock_message: config.unlock_message,
    })
}

/// Places up to `target` pieces, walking cells from the centre outwards.
///
/// Same-distance cells are visited in random order: the cell list is shuffled
/// before the stable distance sort.
fn place_pieces(config: &LevelConfig, target: usize, rng: &mut impl Rng) -> Vec<Piece> {
    let grid_size = config.grid_size;

    let mut cells = all_cells(grid_size);
    cells.shuffle(rng);
    cells.sort_by_key(|&cell| doubled_center_distance_sq(cell, grid_size));

    let mut occupied = Occupancy::new();
    let mut pieces = Vec::with_capacity(target);
    let mut directions = Direction::ALL;

    for cell in cells {
        if pieces.len() >= target {
            break;
        }
        if occupied.contains(cell) {
            continue;
        }

        directions.shuffle(rng);
        let accepted = directions.iter().find_map(|&direction| {
            let outer = step(cell, direction, -1);
            (in_bounds(outer, grid_size) && !occupied.contains(outer))
                .then_some((outer, direction))
        });

        // no free neighbour: the cell may still become a later piece's tail
        let Some((head, tested)) = accepted else {
            continue;
        };

        let kind = if rng.random_bool(config.bomb_probability) {
            PieceKind::Bomb {
                timer: BOMB_DURATION_SECS,
            }
        } else {
            PieceKind::Normal
        };
        let variant = rng.random_range(0..config.variant_count);
        let piece = Piece::new(
            PieceId(pieces.len() as u32),
            head,
            tested.opposite(),
            kind,
            variant,
        );
        debug_assert_eq!(piece.tail(), cell);

        occupied.insert_piece(&piece);
        pieces.push(piece);
    }

    sort_row_major(&mut pieces);
    pieces
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_level_zero_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_level(0, &mut rng).map(|data| data.level),
            Err(LevelError::InvalidLevel(0))
        );
    }

    #[test]
    fn test_grid_size_steps() {
        let sizes: Vec<i32> = [1, 4, 5, 9, 10, 19, 20, 100]
            .iter()
            .map(|&level| LevelConfig::for_level(level).unwrap().grid_size)
            .collect();
        assert_eq!(sizes, vec![8, 8, 9, 9, 10, 10, 11, 11]);
    }

    #[test]
    fn test_bomb_probability_steps() {
        let probabilities: Vec<f64> = [1, 4, 5, 14, 15, 29, 30, 500]
            .iter()
            .map(|&level| LevelConfig::for_level(level).unwrap().bomb_probability)
            .collect();
        assert_eq!(probabilities, vec![0.0, 0.0, 0.05, 0.05, 0.10, 0.10, 0.15, 0.15]);
    }

    #[test]
    fn test_palette_grows_and_caps() {
        let counts: Vec<u8> = [1, 3, 4, 7, 10, 13, 1000]
            .iter()
            .map(|&level| LevelConfig::for_level(level).unwrap().variant_count)
            .collect();
        assert_eq!(counts, vec![2, 2, 3, 4, 5, PALETTE_MAX, PALETTE_MAX]);
    }

    #[test]
    fn test_unlock_messages() {
        assert_eq!(
            LevelConfig::for_level(1).unwrap().unlock_message,
            Some(FIRST_LEVEL_MESSAGE)
        );
        assert_eq!(
            LevelConfig::for_level(5).unwrap().unlock_message,
            Some(BOMB_UNLOCK_MESSAGE)
        );
        for level in [2, 4, 6, 20] {
            assert_eq!(LevelConfig::for_level(level).unwrap().unlock_message, None);
        }
    }

    #[test]
    fn test_first_level() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let data = generate_level(1, &mut rng).unwrap();
            assert_eq!(data.grid_size, 8);
            assert_eq!(data.unlock_message, Some(FIRST_LEVEL_MESSAGE));
            assert!(
                data.pieces.iter().all(|piece| !piece.is_bomb()),
                "level 1 must not contain bombs (seed {seed})"
            );
        }
    }

    #[test]
    fn test_generated_boards_are_valid() {
        for seed in 0..40 {
            for level in [1, 5, 12, 25, 40] {
                let mut rng = StdRng::seed_from_u64(seed);
                let data = generate_level(level, &mut rng).unwrap();
                assert_eq!(
                    validate(&data.pieces, data.grid_size),
                    Ok(()),
                    "level {level} seed {seed} broke an invariant"
                );
            }
        }
    }

    #[test]
    fn test_density_bound() {
        let mut dense = 0;
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let data = generate_level(3, &mut rng).unwrap();
            let empty = data.grid_size * data.grid_size - 2 * data.pieces.len() as i32;
            assert!(empty >= *EMPTY_SLOTS.start(), "overfilled board (seed {seed})");
            if EMPTY_SLOTS.contains(&empty) {
                dense += 1;
            }
        }
        // falling short of the target is allowed but rare
        assert!(dense >= 30, "only {dense}/40 boards reached their target");
    }

    #[test]
    fn test_density_bound_on_odd_grids() {
        // n² is odd, so rounding the piece count down can leave one extra cell
        for level in [5, 20] {
            for seed in 0..40 {
                let mut rng = StdRng::seed_from_u64(seed);
                let data = generate_level(level, &mut rng).unwrap();
                assert_eq!(data.grid_size % 2, 1);
                let empty = data.grid_size * data.grid_size - 2 * data.pieces.len() as i32;
                assert!(
                    empty >= *EMPTY_SLOTS.start() && empty <= *EMPTY_SLOTS.end() + 1,
                    "level {level} seed {seed} left {empty} empty cells"
                );
            }
        }
    }

    #[test]
    fn test_pieces_are_row_major_with_unique_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = generate_level(8, &mut rng).unwrap();
        let keys: Vec<(i32, i32)> = data
            .pieces
            .iter()
            .map(|p| (p.head.1, p.head.0))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        let mut ids: Vec<PieceId> = data.pieces.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), data.pieces.len());
    }

    #[test]
    fn test_variants_stay_in_palette() {
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let data = generate_level(4, &mut rng).unwrap();
            let allowed = LevelConfig::for_level(4).unwrap().variant_count;
            assert!(data.pieces.iter().all(|piece| piece.variant < allowed));
        }
    }

    #[test]
    fn test_bombs_start_with_full_timer() {
        let mut found = false;
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let data = generate_level(40, &mut rng).unwrap();
            for piece in data.pieces.iter().filter(|piece| piece.is_bomb()) {
                found = true;
                assert_eq!(piece.timer(), Some(BOMB_DURATION_SECS));
            }
        }
        assert!(found, "a 15% bomb rate over 20 boards should yield bombs");
    }

    #[test]
    fn test_generation_is_reproducible() {
        let first = generate_level(6, &mut StdRng::seed_from_u64(99)).unwrap();
        let second = generate_level(6, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(first.pieces, second.pieces);
    }

    #[test]
    fn test_pieces_point_away_from_centre() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = generate_level(2, &mut rng).unwrap();
        for piece in &data.pieces {
            assert!(
                doubled_center_distance_sq(piece.head, data.grid_size)
                    >= doubled_center_distance_sq(piece.tail(), data.grid_size),
                "piece {} points inwards",
                piece.id
            );
        }
    }
}
