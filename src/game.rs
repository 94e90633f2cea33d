//! A single level in play.
//!
//! `Game` threads the driver state (pause, in-flight moves, bomb clock)
//! through the core operations and serialises triggers so at most one
//! operation acts on the board at a time.

use rand::Rng;

use crate::bomb::{tick_bombs, Tick};
use crate::geometry::Cell;
use crate::hint::find_hint;
use crate::level::{generate_level, LevelData, LevelError};
use crate::pieces::{self, Piece, PieceId};
use crate::resolver::{resolve_move, Resolution};
use crate::shuffle::{flip_all, shuffle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Every piece has left the board.
    Cleared,
    /// A bomb ran out of time while still on the board.
    Failed { bomb: PieceId },
}

#[derive(Debug, Clone)]
pub struct Game {
    pub level: u32,
    pub grid_size: i32,
    pub pieces: Vec<Piece>,
    pub unlock_message: Option<&'static str>,
    pub status: GameStatus,
    pub paused: bool,
    /// Moves that actually changed the board.
    pub interactions: u32,
}

impl Game {
    /// Generates and starts `level`.
    pub fn start(level: u32, rng: &mut impl Rng) -> Result<Self, LevelError> {
        generate_level(level, rng).map(Self::from_level)
    }

    pub fn from_level(data: LevelData) -> Self {
        let LevelData {
            level,
            grid_size,
            pieces,
            unlock_message,
        } = data;
        let mut game = Self {
            level,
            grid_size,
            pieces,
            unlock_message,
            status: GameStatus::Playing,
            paused: false,
            interactions: 0,
        };
        game.update_status();
        game
    }

    fn accepting_input(&self) -> bool {
        self.status == GameStatus::Playing && !self.paused
    }

    /// True while some piece's move has not been settled yet.
    pub fn is_animating(&self) -> bool {
        self.pieces.iter().any(|piece| piece.moving)
    }

    pub fn active_count(&self) -> usize {
        self.pieces.iter().filter(|piece| piece.is_active()).count()
    }

    /// The active piece covering `cell`, if any.
    pub fn piece_at(&self, cell: Cell) -> Option<PieceId> {
        self.pieces
            .iter()
            .find(|piece| piece.is_active() && piece.cells().contains(&cell))
            .map(|piece| piece.id)
    }

    /// Sends a piece sliding.
    ///
    /// Refused while paused, while a previous move is unsettled, or once the
    /// level is over. A `Stay` result changes nothing and is not counted.
    pub fn dispatch(&mut self, id: PieceId) -> Resolution {
        if !self.accepting_input() || self.is_animating() {
            return Resolution::Stay;
        }

        let resolution = resolve_move(id, &self.pieces, self.grid_size);
        let Some(&piece) = pieces::find(&self.pieces, id) else {
            return resolution;
        };
        let updated = match resolution {
            Resolution::Stay => return resolution,
            Resolution::Slide { head } => piece.moved_to(head, false),
            Resolution::Exit { head } => piece.moved_to(head, true),
        };
        pieces::replace(
            &mut self.pieces,
            Piece {
                moving: true,
                ..updated
            },
        );
        self.interactions += 1;
        resolution
    }

    /// Marks every in-flight move as finished and re-evaluates the status.
    pub fn settle(&mut self) {
        for piece in &mut self.pieces {
            piece.moving = false;
        }
        self.update_status();
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) -> bool {
        if !self.accepting_input() || self.is_animating() {
            return false;
        }
        self.pieces = shuffle(&self.pieces, self.grid_size, rng);
        self.update_status();
        true
    }

    pub fn flip(&mut self) -> bool {
        if !self.accepting_input() || self.is_animating() {
            return false;
        }
        self.pieces = flip_all(&self.pieces);
        true
    }

    /// True while some bomb is still on the board and counting down.
    pub fn has_active_bombs(&self) -> bool {
        self.pieces.iter().any(|piece| piece.is_active() && piece.is_bomb())
    }

    /// One second of bomb countdown. Does nothing while paused or when no
    /// bomb is left on the board.
    pub fn tick(&mut self) -> &GameStatus {
        if !self.accepting_input() || !self.has_active_bombs() {
            return &self.status;
        }
        let (ticked, tick) = tick_bombs(&self.pieces);
        self.pieces = ticked;
        if let Tick::Detonated(bombs) = tick {
            log::info!("level {}: bomb {} detonated", self.level, bombs[0]);
            self.status = GameStatus::Failed { bomb: bombs[0] };
        }
        &self.status
    }

    pub fn hint(&self) -> Option<PieceId> {
        if self.status != GameStatus::Playing {
            return None;
        }
        find_hint(&self.pieces, self.grid_size)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    fn update_status(&mut self) {
        if self.status == GameStatus::Playing && self.active_count() == 0 && !self.is_animating() {
            log::info!(
                "level {} cleared after {} moves",
                self.level,
                self.interactions
            );
            self.status = GameStatus::Cleared;
        }
    }
}
