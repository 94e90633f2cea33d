//! Sparse occupancy and board-level checks.
//!
//! Only a fraction of cells are ever covered, so the grid is an occupancy set
//! of coordinates rather than a dense array.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::geometry::{in_bounds, Cell};
use crate::pieces::{Piece, PieceId, PieceKind};

/// Cells covered by active pieces.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    cells: FxHashSet<Cell>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupancy of every non-exited piece.
    pub fn from_pieces(pieces: &[Piece]) -> Self {
        Self::collect(pieces, None)
    }

    /// Occupancy of every non-exited piece except `excluded`.
    pub fn from_pieces_except(pieces: &[Piece], excluded: PieceId) -> Self {
        Self::collect(pieces, Some(excluded))
    }

    fn collect(pieces: &[Piece], excluded: Option<PieceId>) -> Self {
        let cells = pieces
            .iter()
            .filter(|piece| piece.is_active() && Some(piece.id) != excluded)
            .flat_map(|piece| piece.cells())
            .collect();
        Self { cells }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Marks both cells of `piece` as occupied.
    pub fn insert_piece(&mut self, piece: &Piece) {
        self.cells.extend(piece.cells());
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A broken board invariant. Always a logic defect, never a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("pieces {first} and {second} both cover cell {cell:?}")]
    Overlap {
        cell: Cell,
        first: PieceId,
        second: PieceId,
    },
    #[error("piece {piece} covers out-of-bounds cell {cell:?}")]
    OutOfBounds { piece: PieceId, cell: Cell },
}

/// Checks that every active piece lies in bounds and no two share a cell.
pub fn validate(pieces: &[Piece], grid_size: i32) -> Result<(), InvariantViolation> {
    let mut owners: FxHashMap<Cell, PieceId> = FxHashMap::default();

    for piece in pieces.iter().filter(|piece| piece.is_active()) {
        for cell in piece.cells() {
            if !in_bounds(cell, grid_size) {
                return Err(InvariantViolation::OutOfBounds {
                    piece: piece.id,
                    cell,
                });
            }
            if let Some(&first) = owners.get(&cell) {
                return Err(InvariantViolation::Overlap {
                    cell,
                    first,
                    second: piece.id,
                });
            }
            owners.insert(cell, piece.id);
        }
    }

    Ok(())
}

/// Sorts pieces row-major by head: ascending `y`, then `x`. Stable.
pub fn sort_row_major(pieces: &mut [Piece]) {
    pieces.sort_by_key(|piece| (piece.head.1, piece.head.0));
}

/// Formats a board as text, one row per line from `y = 0` downwards.
///
/// A head shows its direction arrow, a tail shows `o` (or `*` for a bomb)
/// and an empty cell shows `.`. Exited pieces are not drawn.
pub fn format_board(pieces: &[Piece], grid_size: i32) -> String {
    let mut glyphs: FxHashMap<Cell, char> = FxHashMap::default();
    for piece in pieces.iter().filter(|piece| piece.is_active()) {
        glyphs.insert(piece.head, piece.direction.arrow());
        let tail_glyph = match piece.kind {
            PieceKind::Normal => 'o',
            PieceKind::Bomb { .. } => '*',
        };
        glyphs.insert(piece.tail(), tail_glyph);
    }

    let mut output = String::with_capacity(((grid_size + 1) * grid_size) as usize);
    for y in 0..grid_size {
        for x in 0..grid_size {
            output.push(glyphs.get(&(x, y)).copied().unwrap_or('.'));
        }
        output.push('\n');
    }
    output
}
