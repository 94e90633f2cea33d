//! Move resolution by raycasting along a piece's direction.

use crate::geometry::{in_bounds, step, Cell};
use crate::grid::{validate, Occupancy};
use crate::pieces::{self, Piece, PieceId};

/// Numerator and denominator of the overshoot applied to an exiting head, as
/// a multiple of the grid size. Purely so a renderer can animate the piece
/// fully off screen.
const EXIT_OVERSHOOT: (i32, i32) = (5, 2);

/// Where a raycast ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ray {
    /// The ray left the grid after `steps` cells without hitting anything.
    Exit { steps: i32 },
    /// The ray hit an occupied cell after `free` unobstructed cells.
    Blocked { free: i32 },
}

/// Outcome of asking a piece to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The piece cannot move; nothing changes.
    Stay,
    /// The piece slides to a new head and stays on the board.
    Slide { head: Cell },
    /// The piece leaves the board. `head` is projected far past the edge.
    Exit { head: Cell },
}

impl Resolution {
    pub fn is_noop(&self) -> bool {
        matches!(self, Resolution::Stay)
    }
}

/// Walks from `piece.head` one cell at a time, up to `grid_size` steps.
///
/// The piece's own cells are never ahead of its head, so `occupied` may or
/// may not include them.
pub fn raycast(piece: &Piece, occupied: &Occupancy, grid_size: i32) -> Ray {
    for steps in 1..=grid_size {
        let candidate = step(piece.head, piece.direction, steps);
        if !in_bounds(candidate, grid_size) {
            return Ray::Exit { steps };
        }
        if occupied.contains(candidate) {
            return Ray::Blocked { free: steps - 1 };
        }
    }
    // a head inside the grid always leaves it within grid_size steps
    Ray::Exit {
        steps: grid_size + 1,
    }
}

/// Resolves a move for `id` against the other active pieces.
///
/// Unknown or already exited pieces resolve to `Stay`. The result depends
/// only on the inputs.
pub fn resolve_move(id: PieceId, pieces: &[Piece], grid_size: i32) -> Resolution {
    let Some(piece) = pieces::find(pieces, id).filter(|piece| piece.is_active()) else {
        return Resolution::Stay;
    };

    let others = Occupancy::from_pieces_except(pieces, id);
    match raycast(piece, &others, grid_size) {
        Ray::Exit { steps } => {
            let overshoot = grid_size * EXIT_OVERSHOOT.0 / EXIT_OVERSHOOT.1;
            Resolution::Exit {
                head: step(piece.head, piece.direction, steps + overshoot),
            }
        }
        Ray::Blocked { free: 0 } => Resolution::Stay,
        Ray::Blocked { free } => Resolution::Slide {
            head: step(piece.head, piece.direction, free),
        },
    }
}

/// Resolves and applies a move for `id`, replacing the piece in place.
pub fn apply_move(id: PieceId, pieces: &mut [Piece], grid_size: i32) -> Resolution {
    let resolution = resolve_move(id, pieces, grid_size);
    let updated = match (resolution, pieces::find(pieces, id)) {
        (Resolution::Slide { head }, Some(piece)) => piece.moved_to(head, false),
        (Resolution::Exit { head }, Some(piece)) => piece.moved_to(head, true),
        _ => return resolution,
    };
    pieces::replace(pieces, updated);

    debug_assert!(validate(pieces, grid_size).is_ok());
    resolution
}
