//! Per-second bomb countdown.

use crate::pieces::{Piece, PieceId};

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Every active bomb still has time left (or there are none).
    Running,
    /// These active bombs reached zero. Ending the level is up to the caller.
    Detonated(Vec<PieceId>),
}

/// Decrements the timer of every active bomb by one second.
///
/// Exited bombs are defused and keep their timer.
pub fn tick_bombs(pieces: &[Piece]) -> (Vec<Piece>, Tick) {
    let ticked: Vec<Piece> = pieces
        .iter()
        .map(|&piece| if piece.exited { piece } else { piece.ticked() })
        .collect();

    let detonated: Vec<PieceId> = ticked
        .iter()
        .filter(|piece| piece.is_active() && piece.timer() == Some(0))
        .map(|piece| piece.id)
        .collect();

    let tick = if detonated.is_empty() {
        Tick::Running
    } else {
        Tick::Detonated(detonated)
    };
    (ticked, tick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::pieces::PieceKind;

    fn bomb(id: u32, timer: u32) -> Piece {
        Piece::new(
            PieceId(id),
            (id as i32, 1),
            Direction::Down,
            PieceKind::Bomb { timer },
            0,
        )
    }

    #[test]
    fn test_tick_counts_down() {
        let pieces = vec![bomb(1, 3), bomb(2, 10)];
        let (ticked, tick) = tick_bombs(&pieces);
        assert_eq!(tick, Tick::Running);
        assert_eq!(ticked[0].timer(), Some(2));
        assert_eq!(ticked[1].timer(), Some(9));
    }

    #[test]
    fn test_tick_reports_detonation() {
        let pieces = vec![bomb(1, 1), bomb(2, 4), bomb(3, 1)];
        let (_, tick) = tick_bombs(&pieces);
        assert_eq!(tick, Tick::Detonated(vec![PieceId(1), PieceId(3)]));
    }

    #[test]
    fn test_exited_bombs_are_defused() {
        let mut gone = bomb(1, 1);
        gone.exited = true;
        let (ticked, tick) = tick_bombs(&[gone]);
        assert_eq!(tick, Tick::Running);
        assert_eq!(ticked[0], gone);
    }

    #[test]
    fn test_normal_pieces_are_unaffected() {
        let normal = Piece::new(PieceId(4), (3, 3), Direction::Up, PieceKind::Normal, 1);
        let (ticked, tick) = tick_bombs(&[normal]);
        assert_eq!(tick, Tick::Running);
        assert_eq!(ticked, vec![normal]);
    }
}
