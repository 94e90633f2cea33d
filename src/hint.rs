//! Idle-assistance: find a piece that can leave the board right now.

use crate::grid::Occupancy;
use crate::pieces::{Piece, PieceId};
use crate::resolver::{raycast, Ray};

/// Returns the first active piece, in slice order, whose ray reaches the
/// boundary unobstructed. Pieces that would only slide do not count.
pub fn find_hint(pieces: &[Piece], grid_size: i32) -> Option<PieceId> {
    let occupied = Occupancy::from_pieces(pieces);
    pieces
        .iter()
        .filter(|piece| piece.is_active())
        .find(|piece| matches!(raycast(piece, &occupied, grid_size), Ray::Exit { .. }))
        .map(|piece| piece.id)
}
