//! Static evaluation.
//!
//! Sums the positional piece values over all occupied squares (always from
//! White's perspective) and flips the sign so the result is from the side to
//! move's point of view, as negamax requires.

use crate::board::board::Board;
use crate::board::piece::{positional_value, Color, EMPTY};

pub fn evaluate(board: &Board) -> i32 {
    let mut value = 0;
    for (square, &piece) in board.squares.iter().enumerate() {
        if piece != EMPTY {
            value += positional_value(piece, square);
        }
    }
    match board.turn {
        Color::White => value,
        Color::Black => -value,
    }
}
