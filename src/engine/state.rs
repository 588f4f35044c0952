use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ops;

/// Side length of the square board.
pub const SIZE: usize = 4;

/// Cell value: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;
pub type Score = u64;
pub type Row = [Tile; SIZE];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid tile {value} at row {row}, col {col}")]
    InvalidTile { row: usize, col: usize, value: Tile },
    #[error("unknown move {0:?}")]
    UnknownMove(String),
}

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(s)
    }
}

/// Accepts arrow names plus the usual `wasd` and vi `hjkl` keys.
impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => Ok(Move::Up),
            "down" | "s" | "j" => Ok(Move::Down),
            "left" | "a" | "h" => Ok(Move::Left),
            "right" | "d" | "l" => Ok(Move::Right),
            _ => Err(EngineError::UnknownMove(s.to_string())),
        }
    }
}

/// A 4x4 2048 board holding tile values in row-major order.
///
/// Boards are small `Copy` values: every operation returns a new board
/// and leaves the receiver untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(pub(crate) [Row; SIZE]);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Build a board from rows, rejecting values that are neither 0 nor a power of two >= 2.
    ///
    /// ```
    /// use play_2048::engine::Board;
    /// let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(b.count_empty(), 14);
    /// assert!(Board::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn from_rows(rows: [Row; SIZE]) -> Result<Self, EngineError> {
        for (row, cells) in rows.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if value != 0 && (value < 2 || !value.is_power_of_two()) {
                    return Err(EngineError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(Board(rows))
    }

    #[inline]
    pub fn rows(&self) -> [Row; SIZE] {
        self.0
    }

    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> Tile {
        self.0[row][col]
    }

    /// Return the board resulting from sliding/merging tiles in `dir`, plus the
    /// sum of all merged tile values. No random insert.
    ///
    /// ```
    /// use play_2048::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let (moved, gained) = b.shift(Move::Left);
    /// assert_eq!(moved.rows()[0], [4, 4, 0, 0]);
    /// assert_eq!(gained, 8);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> (Self, Score) {
        ops::shift(self, dir)
    }

    /// Place a 2 or a 4 (equal odds) into a uniformly chosen empty cell.
    ///
    /// A full board is returned unchanged.
    ///
    /// ```
    /// use play_2048::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        ops::insert_random_tile(self, rng)
    }

    /// True while at least one move would change the board.
    #[inline]
    pub fn can_move(self) -> bool {
        ops::can_move(self)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> usize {
        ops::count_empty(self)
    }

    /// Return the highest tile value present on the board (0 when empty).
    #[inline]
    pub fn highest_tile(self) -> Tile {
        ops::get_highest_tile_val(self)
    }

    /// Iterate over tile values in row-major order.
    #[inline]
    pub fn tiles(self) -> impl Iterator<Item = Tile> {
        self.0.into_iter().flatten()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(SIZE * 8);
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f, "{separator}")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| ops::format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<[Row; SIZE]> for Board {
    type Error = EngineError;
    fn try_from(rows: [Row; SIZE]) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for [Row; SIZE] {
    fn from(b: Board) -> Self {
        b.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves() {
        assert_eq!("w".parse::<Move>(), Ok(Move::Up));
        assert_eq!("DOWN".parse::<Move>(), Ok(Move::Down));
        assert_eq!(" h ".parse::<Move>(), Ok(Move::Left));
        assert_eq!("right".parse::<Move>(), Ok(Move::Right));
        assert_eq!(" Sideways ".parse::<Move>(), Err(EngineError::UnknownMove(" Sideways ".to_string())));
    }

    #[test]
    fn rejects_invalid_tiles() {
        let err = Board::from_rows([[0; 4], [0, 0, 6, 0], [0; 4], [0; 4]]).unwrap_err();
        assert_eq!(err, EngineError::InvalidTile { row: 1, col: 2, value: 6 });
        assert!(Board::from_rows([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    }

    #[test]
    fn display_has_one_line_per_row() {
        let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2048]]).unwrap();
        let text = b.to_string();
        assert_eq!(text.lines().count(), SIZE * 2 - 1);
        assert!(text.contains("2048"));
    }
}
