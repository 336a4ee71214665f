//! Crate root module declarations for the Damson Chess engine.
//!
//! This file exposes all top-level subsystems (board representation, move
//! generation, search, and utility helpers) so the binary, tests, and
//! external tooling can import stable module paths.

pub mod board {
    pub mod board;
    pub mod chess_move;
    pub mod piece;
}

pub mod movegen {
    pub mod attacks;
    pub mod generator;
    pub mod make_move;
    pub mod perft;
}

pub mod search {
    pub mod evaluate;
    pub mod negamax;
    pub mod parallel;
    pub mod pick_move;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen;
    pub mod render;
}

pub mod cli {
    pub mod repl;
}
