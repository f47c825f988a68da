use std::fmt::{self, Write as _};

use ndarray::{Array2, Array3};

use super::{COLS, PLANES, ROWS};

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty,
    /// Stone of the player who moved first.
    First,
    /// Stone of the player who moved second.
    Second,
}

impl Cell {
    /// Occupancy plane index for this stone, `None` for an empty cell.
    #[must_use]
    pub fn plane(self) -> Option<usize> {
        match self {
            Cell::Empty => None,
            Cell::First => Some(0),
            Cell::Second => Some(1),
        }
    }

    /// Raw cell-state encoding used by the `boards` field: 0, 1, -1.
    #[must_use]
    pub fn code(self) -> f32 {
        match self {
            Cell::Empty => 0.0,
            Cell::First => 1.0,
            Cell::Second => -1.0,
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::First => 'X',
            Cell::Second => 'O',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("column {column} is out of range (board has {COLS} columns)")]
pub struct ColumnOutOfRangeError {
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("column {column} is full")]
pub struct ColumnFullError {
    pub column: usize,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum PlayError {
    #[display("{_0}")]
    ColumnOutOfRange(ColumnOutOfRangeError),
    #[display("{_0}")]
    ColumnFull(ColumnFullError),
}

/// A Connect-4 position.
///
/// Row 0 is the top row, so stones dropped into an empty column land in row
/// `ROWS - 1`. Players alternate, starting with [`Cell::First`].
///
/// # Example
///
/// ```
/// use c4train_dataset::{Cell, Position};
///
/// let position = Position::from_moves([3, 3, 0])?;
/// assert_eq!(position.cell(5, 3), Cell::First);
/// assert_eq!(position.cell(4, 3), Cell::Second);
/// assert_eq!(position.cell(5, 0), Cell::First);
/// assert_eq!(position.stone_count(), 3);
/// assert_eq!(position.mirrored().cell(5, 6), Cell::First);
/// # Ok::<(), c4train_dataset::PlayError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Position {
    cells: [[Cell; COLS]; ROWS],
    heights: [usize; COLS],
}

impl Position {
    pub const EMPTY: Self = Self {
        cells: [[Cell::Empty; COLS]; ROWS],
        heights: [0; COLS],
    };

    /// Replays `moves` (column indices) from the empty board.
    pub fn from_moves<I>(moves: I) -> Result<Self, PlayError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut position = Self::EMPTY;
        for column in moves {
            position.play(column)?;
        }
        Ok(position)
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    #[must_use]
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Number of stones on the board (ply depth).
    #[must_use]
    pub fn stone_count(&self) -> usize {
        self.heights.iter().sum()
    }

    /// Player whose stone the next move places.
    #[must_use]
    pub fn side_to_move(&self) -> Cell {
        if self.stone_count() % 2 == 0 {
            Cell::First
        } else {
            Cell::Second
        }
    }

    #[must_use]
    pub fn is_playable(&self, column: usize) -> bool {
        column < COLS && self.heights[column] < ROWS
    }

    pub fn playable_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..COLS).filter(|&column| self.is_playable(column))
    }

    /// Drops a stone for the side to move into `column`.
    pub fn play(&mut self, column: usize) -> Result<(), PlayError> {
        if column >= COLS {
            return Err(ColumnOutOfRangeError { column }.into());
        }
        let height = self.heights[column];
        if height == ROWS {
            return Err(ColumnFullError { column }.into());
        }
        self.cells[ROWS - 1 - height][column] = self.side_to_move();
        self.heights[column] += 1;
        Ok(())
    }

    /// Left-right reflection of this position.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let mut cells = self.cells;
        for row in &mut cells {
            row.reverse();
        }
        let mut heights = self.heights;
        heights.reverse();
        Self { cells, heights }
    }

    /// Occupancy planes, shape `(ROWS, COLS, PLANES)`.
    ///
    /// Plane 0 marks stones of [`Cell::First`], plane 1 stones of [`Cell::Second`].
    #[must_use]
    pub fn occupancy(&self) -> Array3<f32> {
        let mut planes = Array3::zeros((ROWS, COLS, PLANES));
        for (row, cells) in self.cells.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                if let Some(plane) = cell.plane() {
                    planes[[row, column, plane]] = 1.0;
                }
            }
        }
        planes
    }

    /// Raw cell-state grid, shape `(ROWS, COLS)`, encoded with [`Cell::code`].
    #[must_use]
    pub fn cell_codes(&self) -> Array2<f32> {
        Array2::from_shape_fn((ROWS, COLS), |(row, column)| {
            self.cells[row][column].code()
        })
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('\n')?;
        for row in &self.cells {
            for cell in row {
                f.write_char(cell.symbol())?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
