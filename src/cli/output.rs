//! Output formatting for CLI

use crate::tictactoe::{Board, CellIndex};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(40));
    println!("{title}");
    println!("{}", "=".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Render a board with row and column labels, marking `highlight` with
/// brackets
pub fn render_board(board: &Board, highlight: Option<CellIndex>) -> String {
    let mut out = String::from("     0  1  2\n");
    for (row, cells) in board.rows().iter().enumerate() {
        out.push_str(&format!("  {row} "));
        for (col, cell) in cells.iter().enumerate() {
            let marked = highlight.is_some_and(|h| h.row() == row && h.col() == col);
            if marked {
                out.push_str(&format!("[{}]", cell.to_char()));
            } else {
                out.push_str(&format!(" {} ", cell.to_char()));
            }
        }
        out.push('\n');
    }
    out
}
