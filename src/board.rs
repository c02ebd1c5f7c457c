use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use itertools::Itertools;
use thiserror::Error;

/// Largest supported dimension. Tiles are stored as `u16`, so `n*n` must not exceed 65536.
pub const MAX_DIMENSION: usize = 256;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board has no rows")]
    Empty,

    #[error("Board dimension {0} is too small, it must be at least 2")]
    TooSmall(usize),

    #[error("Board dimension {0} is too large, it must be at most {max}", max = MAX_DIMENSION)]
    TooLarge(usize),

    #[error("Row {row} has {len} tiles, expected {dimension}")]
    NotSquare {
        row: usize,
        len: usize,
        dimension: usize,
    },

    #[error("Tile {value} is out of range for a {dimension}x{dimension} board")]
    TileOutOfRange { value: u32, dimension: usize },

    #[error("Tile {0} appears more than once")]
    DuplicateTile(u32),

    #[error("Board text is missing the dimension")]
    MissingDimension,

    #[error("Invalid number {0:?}")]
    InvalidNumber(String),

    #[error("Expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },
}

/// Direction in which the blank moves during a slide.
/// [Slide::Up] means the tile above the blank slides down into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slide {
    Up,
    Down,
    Left,
    Right,
}

impl Slide {
    /// All slides, in the order [Board::neighbors] yields them.
    pub const ALL: [Slide; 4] = [Slide::Up, Slide::Down, Slide::Left, Slide::Right];

    pub fn opposite(&self) -> Self {
        match self {
            Slide::Up => Slide::Down,
            Slide::Down => Slide::Up,
            Slide::Left => Slide::Right,
            Slide::Right => Slide::Left,
        }
    }
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Slide::Up => "Up",
            Slide::Down => "Down",
            Slide::Left => "Left",
            Slide::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A [Board] is one configuration of an `n`x`n` sliding-tile puzzle.
/// Tiles have the values `1..n*n`, the blank is `0`.
///
/// Boards are immutable. Both heuristic scores are computed once on construction,
/// and deriving a neighbor or the twin always builds a fresh board.
#[derive(Clone)]
pub struct Board {
    dimension: usize,

    // Row-major, always a permutation of 0..dimension*dimension
    tiles: Box<[u16]>,
    blank: usize,

    hamming: usize,
    manhattan: usize,

    // Memoized result of [Board::twin]. Not part of the value, ignored by Eq and Hash.
    twin: OnceLock<Box<Board>>,
}

impl Board {
    /// Creates a board from an `n`x`n` grid where `grid[row][col]` is the tile at `(row, col)`.
    ///
    /// The grid must hold every value in `0..n*n` exactly once.
    pub fn new<R: AsRef<[u32]>>(grid: &[R]) -> Result<Self, BoardError> {
        let dimension = grid.len();
        check_dimension(dimension)?;

        let num_tiles = dimension * dimension;
        let mut seen = vec![false; num_tiles];
        let mut tiles = Vec::with_capacity(num_tiles);
        let mut blank = 0;
        let mut hamming = 0;
        let mut manhattan = 0;
        for (row, values) in grid.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dimension {
                return Err(BoardError::NotSquare {
                    row,
                    len: values.len(),
                    dimension,
                });
            }
            for &value in values {
                let index = value as usize;
                if index >= num_tiles {
                    return Err(BoardError::TileOutOfRange { value, dimension });
                }
                if std::mem::replace(&mut seen[index], true) {
                    return Err(BoardError::DuplicateTile(value));
                }
                let tile = value as u16;
                if tile == 0 {
                    blank = tiles.len();
                }
                let distance = goal_distance(dimension, tiles.len(), tile);
                if distance > 0 {
                    hamming += 1;
                    manhattan += distance;
                }
                tiles.push(tile);
            }
        }

        // n*n distinct values below n*n, so the blank was seen exactly once
        Ok(Self {
            dimension,
            tiles: tiles.into_boxed_slice(),
            blank,
            hamming,
            manhattan,
            twin: OnceLock::new(),
        })
    }

    /// The solved board of the given dimension: tiles in ascending order, blank last.
    pub fn goal(dimension: usize) -> Result<Self, BoardError> {
        check_dimension(dimension)?;
        let num_tiles = dimension * dimension;
        let tiles = (1..num_tiles)
            .chain(std::iter::once(0))
            .map(|tile| tile as u16)
            .collect();
        Ok(Self::from_tiles(dimension, tiles, num_tiles - 1))
    }

    // Scores derived boards. Callers guarantee that `tiles` is a valid permutation with the
    // blank at `blank`.
    fn from_tiles(dimension: usize, tiles: Box<[u16]>, blank: usize) -> Self {
        debug_assert_eq!(tiles.len(), dimension * dimension);
        debug_assert_eq!(tiles[blank], 0);

        let mut hamming = 0;
        let mut manhattan = 0;
        for (index, &tile) in tiles.iter().enumerate() {
            let distance = goal_distance(dimension, index, tile);
            if distance > 0 {
                hamming += 1;
                manhattan += distance;
            }
        }

        Self {
            dimension,
            tiles,
            blank,
            hamming,
            manhattan,
            twin: OnceLock::new(),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of tiles not in their goal position, blank excluded.
    #[inline]
    pub fn hamming(&self) -> usize {
        self.hamming
    }

    /// Sum of the row and column distances of every tile from its goal position.
    #[inline]
    pub fn manhattan(&self) -> usize {
        self.manhattan
    }

    #[inline]
    pub fn is_goal(&self) -> bool {
        self.hamming == 0
    }

    /// Tile at `(row, col)`, `0` for the blank. Panics if the position is outside the board.
    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> u32 {
        assert!(row < self.dimension && col < self.dimension);
        u32::from(self.tiles[row * self.dimension + col])
    }

    /// Position of the blank as `(row, col)`.
    #[inline]
    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.dimension, self.blank % self.dimension)
    }

    /// All tiles in row-major order.
    #[inline]
    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    /// The board after moving the blank in the given direction.
    /// `None` if the blank is already at that edge.
    pub fn slide(&self, slide: Slide) -> Option<Board> {
        let target = self.slide_target(slide)?;
        Some(self.swapped(self.blank, target, target))
    }

    /// All boards reachable with a single slide, in the order of [Slide::ALL].
    /// Yields 2 boards if the blank is in a corner, 3 on an edge and 4 otherwise.
    pub fn neighbors(&self) -> impl Iterator<Item = Board> + '_ {
        Slide::ALL
            .into_iter()
            .filter_map(move |slide| self.slide(slide))
    }

    /// A board that differs from this one by swapping two adjacent non-blank tiles.
    ///
    /// Exactly one of a board and its twin is solvable. The swapped tiles are the first two
    /// tiles of the first row that doesn't contain the blank. The result is computed on the
    /// first call and the same board is returned afterwards.
    pub fn twin(&self) -> &Board {
        self.twin.get_or_init(|| {
            let row = if self.blank < self.dimension { 1 } else { 0 };
            let first = row * self.dimension;
            Box::new(self.swapped(first, first + 1, self.blank))
        })
    }

    fn slide_target(&self, slide: Slide) -> Option<usize> {
        let (row, col) = self.blank();
        let n = self.dimension;
        match slide {
            Slide::Up => (row > 0).then(|| self.blank - n),
            Slide::Down => (row + 1 < n).then(|| self.blank + n),
            Slide::Left => (col > 0).then(|| self.blank - 1),
            Slide::Right => (col + 1 < n).then(|| self.blank + 1),
        }
    }

    fn swapped(&self, a: usize, b: usize, blank: usize) -> Board {
        let mut tiles = self.tiles.clone();
        tiles.swap(a, b);
        Board::from_tiles(self.dimension, tiles, blank)
    }
}

// Grid distance from the tile at `index` to its goal position, 0 for the blank.
fn goal_distance(dimension: usize, index: usize, tile: u16) -> usize {
    if tile == 0 {
        return 0;
    }
    let goal = usize::from(tile) - 1;
    (index / dimension).abs_diff(goal / dimension) + (index % dimension).abs_diff(goal % dimension)
}

fn check_dimension(dimension: usize) -> Result<(), BoardError> {
    match dimension {
        0 => Err(BoardError::Empty),
        1 => Err(BoardError::TooSmall(dimension)),
        d if d > MAX_DIMENSION => Err(BoardError::TooLarge(dimension)),
        _ => Ok(()),
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension && self.tiles == other.tiles
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension.hash(state);
        self.tiles.hash(state);
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("dimension", &self.dimension)
            .field("tiles", &self.tiles)
            .field("hamming", &self.hamming)
            .field("manhattan", &self.manhattan)
            .finish_non_exhaustive()
    }
}

/// Prints the dimension on the first line, followed by one line per row.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = if self.dimension > 3 { 2 } else { 1 };
        writeln!(f, "{}", self.dimension)?;
        for row in self.tiles.chunks(self.dimension) {
            writeln!(
                f,
                "{}",
                row.iter().map(|tile| format!(" {tile:>width$}")).join("")
            )?;
        }
        Ok(())
    }
}

/// Parses the puzzle file format: the dimension `n`, then `n*n` tiles in row-major order,
/// all separated by whitespace.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut numbers = s.split_whitespace().map(|token| {
            token
                .parse::<u32>()
                .map_err(|_| BoardError::InvalidNumber(token.to_string()))
        });
        let dimension = numbers.next().ok_or(BoardError::MissingDimension)?? as usize;
        check_dimension(dimension)?;

        let values = numbers.collect::<Result<Vec<u32>, _>>()?;
        let expected = dimension * dimension;
        if values.len() != expected {
            return Err(BoardError::WrongTileCount {
                expected,
                found: values.len(),
            });
        }

        let rows: Vec<&[u32]> = values.chunks(dimension).collect();
        Board::new(&rows)
    }
}
