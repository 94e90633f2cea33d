//! Grid coordinates and the four axis directions.
//!
//! Coordinates use screen orientation: `x` grows to the right and `y` grows
//! downwards, so `Direction::Down` carries a piece across the `y = grid_size`
//! boundary.

/// A grid cell as `(x, y)`.
pub type Cell = (i32, i32);

/// One of the four axis-aligned directions a piece can travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step `(dx, dy)` for this direction.
    #[inline]
    pub const fn delta(self) -> Cell {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Arrow glyph used by the text renderer.
    pub const fn arrow(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Right => '>',
        }
    }
}

/// Moves `cell` by `steps` units along `direction`.
#[inline]
pub const fn step(cell: Cell, direction: Direction, steps: i32) -> Cell {
    let (dx, dy) = direction.delta();
    (cell.0 + dx * steps, cell.1 + dy * steps)
}

/// Returns true if `cell` lies within `[0, grid_size)` on both axes.
#[inline]
pub const fn in_bounds(cell: Cell, grid_size: i32) -> bool {
    cell.0 >= 0 && cell.0 < grid_size && cell.1 >= 0 && cell.1 < grid_size
}

/// Every cell of a `grid_size x grid_size` grid in row-major order.
pub fn all_cells(grid_size: i32) -> Vec<Cell> {
    (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| (x, y)))
        .collect()
}

/// Squared distance from `cell` to the grid centre, in doubled coordinates.
///
/// Doubling keeps the centre on an integer point for both odd and even grid
/// sizes: the doubled centre is `grid_size - 1` on each axis. Ordering by this
/// value is the same as ordering by Euclidean distance.
#[inline]
pub const fn doubled_center_distance_sq(cell: Cell, grid_size: i32) -> i32 {
    let cx = 2 * cell.0 - (grid_size - 1);
    let cy = 2 * cell.1 - (grid_size - 1);
    cx * cx + cy * cy
}

/// Row-major sort key: ascending `y`, then `x`.
#[inline]
pub const fn row_major_key(cell: Cell) -> (i32, i32) {
    (cell.1, cell.0)
}
