//! Time-bounded iterative deepening driver.
//!
//! Re-runs a full-window negamax at increasing depth while the wall-clock
//! budget lasts; only the decision to *start* another depth is time-gated,
//! a depth that has begun always runs to completion. If a depth reports the
//! "no legal continuation" sentinel at the root, a uniformly random legal
//! move is returned instead.

use std::time::{Duration, Instant};

use rand::prelude::IndexedRandom;

use crate::board::board::Board;
use crate::board::chess_move::Move;
use crate::movegen::generator::legal_moves;
use crate::search::negamax::{negamax, ILLEGAL_SCORE, SCORE_BOUND};

/// Wall-clock budget for move selection.
pub const SEARCH_TIME_BUDGET: Duration = Duration::from_secs(1);

/// What the deepening driver found.
#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    pub best_move: Move,
    pub value: i32,
    pub depth: u32,
    pub elapsed: Duration,
}

/// Pick a move for the side to move, or `None` when no legal move exists.
pub fn best_move(board: &mut Board) -> Option<SearchOutcome> {
    best_move_with_budget(board, SEARCH_TIME_BUDGET)
}

/// Deepening driver with an explicit budget so tests can pin the depth to a
/// single deterministic iteration.
pub fn best_move_with_budget(board: &mut Board, budget: Duration) -> Option<SearchOutcome> {
    let legal = legal_moves(board);
    if legal.is_empty() {
        return None;
    }

    let started = Instant::now();
    let mut depth = 1;
    loop {
        let value = negamax(board, depth, depth, -SCORE_BOUND, SCORE_BOUND);

        if value == ILLEGAL_SCORE {
            // Every line loses the king; any legal move is as good as
            // another.
            let mut rng = rand::rng();
            let fallback = legal
                .as_slice()
                .choose(&mut rng)
                .copied()
                .unwrap_or(legal[0]);
            return Some(SearchOutcome {
                best_move: fallback,
                value,
                depth,
                elapsed: started.elapsed(),
            });
        }

        let elapsed = started.elapsed();
        if elapsed >= budget {
            return Some(SearchOutcome {
                best_move: board.best_move,
                value,
                depth,
                elapsed,
            });
        }
        depth += 1;
    }
}
