//! Board-wide re-randomisation and the bulk flip.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{all_cells, in_bounds, step, Cell, Direction};
use crate::grid::{sort_row_major, validate, Occupancy};
use crate::pieces::Piece;

/// Re-homes every active piece at a random free head and direction.
///
/// Exited pieces are carried over untouched. A piece that cannot be placed
/// anywhere is dropped from the result; this only happens on extremely dense
/// boards and is logged.
pub fn shuffle(pieces: &[Piece], grid_size: i32, rng: &mut impl Rng) -> Vec<Piece> {
    let (exited, active): (Vec<Piece>, Vec<Piece>) =
        pieces.iter().partition(|piece| piece.exited);

    let mut cells = all_cells(grid_size);
    cells.shuffle(rng);

    let mut occupied = Occupancy::new();
    let mut result = exited;
    result.reserve(active.len());

    for piece in active {
        match find_placement(&cells, &occupied, grid_size, rng) {
            Some((head, direction)) => {
                let rehomed = piece.rehomed(head, direction);
                occupied.insert_piece(&rehomed);
                result.push(rehomed);
            }
            None => {
                log::warn!("shuffle found no room for piece {}; dropping it", piece.id);
            }
        }
    }

    sort_row_major(&mut result);
    debug_assert!(validate(&result, grid_size).is_ok());
    log::debug!(
        "shuffled {} active pieces on a {grid_size}x{grid_size} grid",
        result.iter().filter(|piece| piece.is_active()).count()
    );
    result
}

/// First free head in `cells` order with a free in-bounds tail behind it.
fn find_placement(
    cells: &[Cell],
    occupied: &Occupancy,
    grid_size: i32,
    rng: &mut impl Rng,
) -> Option<(Cell, Direction)> {
    let mut directions = Direction::ALL;
    for &head in cells.iter().filter(|&&cell| !occupied.contains(cell)) {
        directions.shuffle(rng);
        let found = directions.iter().copied().find(|&direction| {
            let tail = step(head, direction, -1);
            in_bounds(tail, grid_size) && !occupied.contains(tail)
        });
        if let Some(direction) = found {
            return Some((head, direction));
        }
    }
    None
}

/// Reverses every active piece by swapping its head and tail in place.
///
/// Both cells already belong to the piece, so no collision check is needed.
pub fn flip_all(pieces: &[Piece]) -> Vec<Piece> {
    pieces
        .iter()
        .map(|&piece| if piece.exited { piece } else { piece.flipped() })
        .collect()
}
