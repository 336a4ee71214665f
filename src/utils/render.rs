//! Terminal-oriented text board renderer.
//!
//! Produces a rank-by-rank grid of FEN letters with `-` for empty squares,
//! used by the interactive loop and by test diagnostics.

use crate::board::board::{square_at, Board};
use crate::board::piece::piece_to_char;

/// Render the board to a text grid, rank 8 at the top.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8).rev() {
        out.push(char::from(b'1' + rank as u8));
        out.push(' ');
        for file in 0..8 {
            let piece = board.squares[square_at(rank, file) as usize];
            out.push(piece_to_char(piece).unwrap_or('-'));
            if file < 7 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h");

    out
}
