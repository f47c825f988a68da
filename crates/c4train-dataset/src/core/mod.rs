pub use self::position::*;

pub(crate) mod position;

/// Board height in cells.
pub const ROWS: usize = 6;
/// Board width in cells; also the size of every per-column action vector.
pub const COLS: usize = 7;
/// Occupancy planes per cell, one per player.
pub const PLANES: usize = 2;
