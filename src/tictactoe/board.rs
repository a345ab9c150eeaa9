//! Board state representation and basic operations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// Pawn color of one of the two players.
///
/// The physical pawns are cubes printed with a dog or a cat; the dog plays
/// the role of player A and the cat of player B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Dog,
    Cat,
}

impl PlayerColor {
    /// Get the opposing color
    pub fn opponent(self) -> PlayerColor {
        match self {
            PlayerColor::Dog => PlayerColor::Cat,
            PlayerColor::Cat => PlayerColor::Dog,
        }
    }

    /// Convert color to cell
    pub fn to_cell(self) -> Cell {
        match self {
            PlayerColor::Dog => Cell::Dog,
            PlayerColor::Cat => Cell::Cat,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::Dog => "dog",
            PlayerColor::Cat => "cat",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerColor {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" | "d" | "x" => Ok(PlayerColor::Dog),
            "cat" | "c" | "o" => Ok(PlayerColor::Cat),
            _ => Err(crate::Error::InvalidColor {
                input: s.to_string(),
            }),
        }
    }
}

/// A cell on the play zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Dog,
    Cat,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Dog => 'X',
            Cell::Cat => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' => Some(Cell::Empty),
            'X' | 'x' | 'D' | 'd' => Some(Cell::Dog),
            'O' | 'o' | 'C' | 'c' => Some(Cell::Cat),
            _ => None,
        }
    }

    /// The color occupying this cell, if any
    pub fn color(self) -> Option<PlayerColor> {
        match self {
            Cell::Dog => Some(PlayerColor::Dog),
            Cell::Cat => Some(PlayerColor::Cat),
            Cell::Empty => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<PlayerColor> for Cell {
    fn from(color: PlayerColor) -> Self {
        color.to_cell()
    }
}

/// Position of a cell on the 3x3 grid.
///
/// Rows and columns are always in `0..3`; the only way to build an index from
/// untrusted numbers is [`CellIndex::new`], which validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct CellIndex {
    row: usize,
    col: usize,
}

impl CellIndex {
    pub const CENTER: CellIndex = CellIndex::from_parts(1, 1);

    /// Create a validated cell index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCell`] if `row` or `col` is not in `0..3`.
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < 3 && col < 3 {
            Ok(Self { row, col })
        } else {
            Err(crate::Error::InvalidCell { row, col })
        }
    }

    /// Build an index from constants already known to be in range.
    pub(crate) const fn from_parts(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// All nine cells in row-major order
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..3).flat_map(|row| (0..3).map(move |col| CellIndex { row, col }))
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl TryFrom<(usize, usize)> for CellIndex {
    type Error = crate::Error;

    fn try_from((row, col): (usize, usize)) -> Result<Self, Self::Error> {
        CellIndex::new(row, col)
    }
}

impl From<CellIndex> for (usize, usize) {
    fn from(index: CellIndex) -> Self {
        (index.row, index.col)
    }
}

/// Outcome of a board evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Win(PlayerColor),
    Draw,
    Ongoing,
}

/// The 3x3 play zone, row-major.
///
/// `Board` is `Copy`: strategies probe hypothetical moves on copies and only
/// the caller that owns the authoritative board ever assigns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; 3]; 3],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self::from_rows([[Cell::Empty; 3]; 3])
    }

    pub fn from_rows(cells: [[Cell; 3]; 3]) -> Self {
        Board { cells }
    }

    /// Create a board from a string representation.
    ///
    /// Nine cell characters are read in row-major order; whitespace and `/`
    /// separators are ignored. `X`/`D` is a dog pawn, `O`/`C` a cat pawn and
    /// `.` an empty cell.
    ///
    /// # Errors
    ///
    /// Returns error unless exactly 9 cells are given, or if a character is not a
    /// valid cell representation.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();
        if chars.len() != 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut board = Board::new();
        for (i, (&c, index)) in chars.iter().zip(CellIndex::all()).enumerate() {
            let cell = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
            board.set(index, cell);
        }
        Ok(board)
    }

    pub fn get(&self, index: CellIndex) -> Cell {
        self.cells[index.row][index.col]
    }

    /// Assign a cell. The board never rejects an assignment; move legality is
    /// enforced by the reconciler and the strategies.
    pub fn set(&mut self, index: CellIndex, cell: Cell) {
        self.cells[index.row][index.col] = cell;
    }

    pub fn rows(&self) -> &[[Cell; 3]; 3] {
        &self.cells
    }

    /// Check if a cell is empty
    pub fn is_empty(&self, index: CellIndex) -> bool {
        self.get(index).is_empty()
    }

    /// Get all empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<CellIndex> {
        CellIndex::all().filter(|&idx| self.is_empty(idx)).collect()
    }

    pub fn is_full(&self) -> bool {
        CellIndex::all().all(|idx| !self.is_empty(idx))
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        CellIndex::all().filter(|&idx| !self.is_empty(idx)).count()
    }

    /// Cell-wise comparison against a candidate grid
    pub fn is_equal(&self, grid: &[[Cell; 3]; 3]) -> bool {
        &self.cells == grid
    }

    /// Evaluate the board.
    ///
    /// Rows are checked first, then columns, then the two diagonals; the first
    /// uniform non-empty line decides the winner. Without a line the board is
    /// a draw once full and ongoing otherwise.
    pub fn winner(&self) -> GameResult {
        if let Some(color) = LineAnalyzer::first_winning_line(self).and_then(|line| {
            let [first, ..] = line;
            self.get(first).color()
        }) {
            return GameResult::Win(color);
        }

        if self.is_full() {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        }
    }

    /// True once the game is over, including a draw
    pub fn has_winner(&self) -> bool {
        self.winner() != GameResult::Ongoing
    }

    /// First empty cell (row-major) where `color` would win immediately.
    ///
    /// Each candidate is probed on a copy; `self` is never modified.
    pub fn immediate_win_for(&self, color: PlayerColor) -> Option<CellIndex> {
        self.empty_cells().into_iter().find(|&idx| {
            let mut probe = *self;
            probe.set(idx, color.to_cell());
            probe.winner() == GameResult::Win(color)
        })
    }

    /// Cells where `self` and `other` differ, in row-major order
    pub fn differences(&self, other: &Board) -> Vec<CellIndex> {
        CellIndex::all()
            .filter(|&idx| self.get(idx) != other.get(idx))
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            if r < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
