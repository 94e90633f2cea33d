//! Sliding Block Puzzle Library
//!
//! Two-cell pieces sit on a square grid and slide along their own axis until
//! they leave the grid or run into another piece. Provides level generation,
//! move resolution, shuffling, flipping, hints and the bomb countdown.

pub mod bomb;
pub mod game;
pub mod geometry;
pub mod grid;
pub mod hint;
pub mod level;
pub mod persistence;
pub mod pieces;
pub mod resolver;
pub mod shuffle;

pub use game::{Game, GameStatus};
pub use geometry::{Cell, Direction};
pub use level::{generate_level, LevelConfig, LevelData, LevelError};
pub use pieces::{Piece, PieceId, PieceKind};
pub use resolver::{resolve_move, Resolution};
