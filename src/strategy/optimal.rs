//! Rule-based optimal play.
//!
//! Rules are tried in order: fork defenses for the known second-move traps,
//! then win, block, center, corners and finally sides. The randomized variant
//! plays one move in five uniformly at random, which makes it beatable.

use rand::Rng;
use tracing::debug;

use super::random;
use crate::tictactoe::{Board, Cell, CellIndex, Colors};

/// Positions that lead to a human fork unless answered with `reply`.
///
/// Rows are separated by `/`; `H` is a human pawn, `C` a computer pawn and
/// `.` an empty cell. A pattern only matches the whole board exactly.
struct ForkDefense {
    patterns: &'static [&'static str],
    reply: CellIndex,
}

const FORK_DEFENSES: [ForkDefense; 9] = [
    ForkDefense {
        patterns: &["H../.C./..H", "..H/.C./H.."],
        reply: CellIndex::from_parts(0, 1),
    },
    ForkDefense {
        patterns: &[".H./HC./..."],
        reply: CellIndex::from_parts(0, 0),
    },
    ForkDefense {
        patterns: &[".H./.CH/..."],
        reply: CellIndex::from_parts(0, 2),
    },
    ForkDefense {
        patterns: &[".../.CH/.H."],
        reply: CellIndex::from_parts(2, 2),
    },
    ForkDefense {
        patterns: &[".../HC./.H."],
        reply: CellIndex::from_parts(2, 0),
    },
    ForkDefense {
        patterns: &[".H./.C./..H", "H../.CH/..."],
        reply: CellIndex::from_parts(0, 2),
    },
    ForkDefense {
        patterns: &[".H./.C./H..", "..H/HC./..."],
        reply: CellIndex::from_parts(0, 0),
    },
    ForkDefense {
        patterns: &["H../.C./.H.", ".../HC./..H"],
        reply: CellIndex::from_parts(2, 0),
    },
    ForkDefense {
        patterns: &["..H/.C./.H.", ".../.CH/H.."],
        reply: CellIndex::from_parts(2, 2),
    },
];

const CORNERS: [CellIndex; 4] = [
    CellIndex::from_parts(0, 2),
    CellIndex::from_parts(0, 0),
    CellIndex::from_parts(2, 0),
    CellIndex::from_parts(2, 2),
];

const SIDES: [CellIndex; 4] = [
    CellIndex::from_parts(0, 1),
    CellIndex::from_parts(1, 0),
    CellIndex::from_parts(1, 2),
    CellIndex::from_parts(2, 1),
];

/// Odds of a random move in the randomized variant: one in `RANDOM_ONE_IN`
const RANDOM_ONE_IN: u32 = 5;

pub fn choose<R: Rng + ?Sized>(
    board: &Board,
    colors: Colors,
    randomized: bool,
    rng: &mut R,
) -> Option<CellIndex> {
    if board.is_full() {
        return None;
    }

    if randomized && rng.random_range(1..=RANDOM_ONE_IN) == 1 {
        debug!("playing a random move");
        return random::choose(board, rng);
    }

    if let Some(reply) = fork_defense(board, colors) {
        debug!(cell = %reply, "fork defense");
        return Some(reply);
    }

    board
        .immediate_win_for(colors.computer)
        .or_else(|| board.immediate_win_for(colors.human))
        .or_else(|| board.is_empty(CellIndex::CENTER).then_some(CellIndex::CENTER))
        .or_else(|| CORNERS.into_iter().find(|&cell| board.is_empty(cell)))
        .or_else(|| SIDES.into_iter().find(|&cell| board.is_empty(cell)))
}

fn fork_defense(board: &Board, colors: Colors) -> Option<CellIndex> {
    FORK_DEFENSES
        .iter()
        .find(|defense| {
            defense
                .patterns
                .iter()
                .any(|pattern| matches_pattern(board, pattern, colors))
        })
        .map(|defense| defense.reply)
        .filter(|&reply| board.is_empty(reply))
}

fn matches_pattern(board: &Board, pattern: &str, colors: Colors) -> bool {
    let mut grid = [[Cell::Empty; 3]; 3];
    for (row, line) in pattern.split('/').enumerate().take(3) {
        for (col, ch) in line.chars().enumerate().take(3) {
            grid[row][col] = match ch {
                'H' => colors.human.to_cell(),
                'C' => colors.computer.to_cell(),
                _ => Cell::Empty,
            };
        }
    }
    board.is_equal(&grid)
}
