//! Two-cell piece definitions.
//!
//! A piece stores only its head cell and direction; the tail is always
//! derived as `head - delta(direction)` so the two can never disagree.

use std::fmt;

use crate::geometry::{step, Cell, Direction};

/// Number of cosmetic variants in the full palette.
pub const PALETTE_MAX: u8 = 6;

/// Countdown given to a freshly created bomb, in seconds.
pub const BOMB_DURATION_SECS: u32 = 30;

/// Opaque identifier, unique within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Normal,
    /// Carries the seconds remaining before detonation.
    Bomb { timer: u32 },
}

/// A two-cell block.
///
/// All transforms return a new value; callers replace the old piece in their
/// collection explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub head: Cell,
    pub direction: Direction,
    pub kind: PieceKind,
    /// Index into the first `variant_count` palette entries.
    pub variant: u8,
    pub exited: bool,
    pub moving: bool,
}

impl Piece {
    pub fn new(
        id: PieceId,
        head: Cell,
        direction: Direction,
        kind: PieceKind,
        variant: u8,
    ) -> Self {
        Self {
            id,
            head,
            direction,
            kind,
            variant,
            exited: false,
            moving: false,
        }
    }

    /// The rear cell, one step behind the head.
    #[inline]
    pub fn tail(&self) -> Cell {
        step(self.head, self.direction, -1)
    }

    /// Head and tail, in that order.
    #[inline]
    pub fn cells(&self) -> [Cell; 2] {
        [self.head, self.tail()]
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.exited
    }

    #[inline]
    pub fn is_bomb(&self) -> bool {
        matches!(self.kind, PieceKind::Bomb { .. })
    }

    /// Remaining bomb time, or `None` for normal pieces.
    pub fn timer(&self) -> Option<u32> {
        match self.kind {
            PieceKind::Bomb { timer } => Some(timer),
            PieceKind::Normal => None,
        }
    }

    /// The piece after a resolved move. Once exited, a piece stays exited.
    pub fn moved_to(self, head: Cell, exited: bool) -> Self {
        Self {
            head,
            exited: self.exited || exited,
            ..self
        }
    }

    /// Head and tail swapped: the piece now travels the opposite way over the
    /// same two cells.
    pub fn flipped(self) -> Self {
        Self {
            head: self.tail(),
            direction: self.direction.opposite(),
            ..self
        }
    }

    /// The piece re-homed at a new head and direction, all else carried over.
    pub fn rehomed(self, head: Cell, direction: Direction) -> Self {
        Self {
            head,
            direction,
            ..self
        }
    }

    /// One second off a bomb's countdown, saturating at zero.
    pub fn ticked(self) -> Self {
        match self.kind {
            PieceKind::Bomb { timer } => Self {
                kind: PieceKind::Bomb {
                    timer: timer.saturating_sub(1),
                },
                ..self
            },
            PieceKind::Normal => self,
        }
    }
}

/// Finds a piece by id.
pub fn find(pieces: &[Piece], id: PieceId) -> Option<&Piece> {
    pieces.iter().find(|piece| piece.id == id)
}

/// Replaces the piece sharing `updated.id`. Returns false if no such piece exists.
pub fn replace(pieces: &mut [Piece], updated: Piece) -> bool {
    match pieces.iter_mut().find(|piece| piece.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(head: Cell, direction: Direction) -> Piece {
        Piece::new(PieceId(1), head, direction, PieceKind::Normal, 0)
    }

    #[test]
    fn test_tail_is_behind_head() {
        assert_eq!(piece((3, 3), Direction::Right).tail(), (2, 3));
        assert_eq!(piece((3, 3), Direction::Down).tail(), (3, 2));
        assert_eq!(piece((3, 3), Direction::Up).tail(), (3, 4));
        assert_eq!(piece((3, 3), Direction::Left).tail(), (4, 3));
    }

    #[test]
    fn test_flip_swaps_cells() {
        for direction in Direction::ALL {
            let original = piece((4, 4), direction);
            let flipped = original.flipped();
            assert_eq!(flipped.head, original.tail());
            assert_eq!(flipped.tail(), original.head);
            assert_eq!(flipped.direction, direction.opposite());
            assert_eq!(flipped.flipped(), original);
        }
    }

    #[test]
    fn test_moved_to_never_unexits() {
        let exited = piece((1, 1), Direction::Up).moved_to((1, -20), true);
        assert!(exited.exited);
        assert!(exited.moved_to((1, 1), false).exited);
    }

    #[test]
    fn test_ticked_only_affects_bombs() {
        let normal = piece((0, 1), Direction::Down);
        assert_eq!(normal.ticked(), normal);

        let bomb = Piece::new(
            PieceId(2),
            (0, 1),
            Direction::Down,
            PieceKind::Bomb { timer: 1 },
            0,
        );
        assert_eq!(bomb.ticked().timer(), Some(0));
        assert_eq!(bomb.ticked().ticked().timer(), Some(0));
    }

    #[test]
    fn test_replace_by_id() {
        let mut pieces = vec![piece((0, 1), Direction::Down)];
        let moved = pieces[0].moved_to((0, 5), false);
        assert!(replace(&mut pieces, moved));
        assert_eq!(pieces[0].head, (0, 5));

        let stranger = Piece::new(PieceId(9), (0, 0), Direction::Up, PieceKind::Normal, 0);
        assert!(!replace(&mut pieces, stranger));
    }
}
