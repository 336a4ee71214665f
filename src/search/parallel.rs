//! Parallel root splitting for the search.
//!
//! The legal root moves are computed once and handed out to a worker pool in
//! small dynamic chunks. Each worker clones the board, applies one root move,
//! and recurses single-threaded; results meet in a lock-protected best cell.
//! When several root moves share the best score, whichever worker reaches
//! the cell first wins, so the chosen move (but never the score) may differ
//! between runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::board::board::Board;
use crate::board::chess_move::Move;
use crate::movegen::generator::legal_moves;
use crate::movegen::make_move::make;
use crate::search::negamax::{negamax, ILLEGAL_SCORE};

/// Two root moves per work grab; search subtrees are uneven but less
/// extreme than perft's.
const PARALLEL_CHUNK: usize = 2;

/// Root-parallel negamax. Writes the winning move into `board.best_move`
/// and returns its score; `ILLEGAL_SCORE` means no legal move exists.
pub fn negamax_parallel(board: &mut Board, depth: u32, alpha: i32, beta: i32) -> i32 {
    // The root ply is this function; workers search at least the reply ply.
    let depth = depth.max(1);
    let root_moves = legal_moves(board);
    let snapshot: &Board = board;
    let next = AtomicUsize::new(0);
    let best = Mutex::new((ILLEGAL_SCORE, None::<Move>));

    thread::scope(|scope| {
        for _ in 0..worker_count() {
            scope.spawn(|| loop {
                let start = next.fetch_add(PARALLEL_CHUNK, Ordering::Relaxed);
                if start >= root_moves.len() {
                    break;
                }
                let end = (start + PARALLEL_CHUNK).min(root_moves.len());

                for &mv in &root_moves[start..end] {
                    let mut local = snapshot.clone();
                    let mut mv = mv;
                    make(&mut local, &mut mv);
                    let value =
                        -negamax(&mut local, depth - 1, depth - 1, -beta, -alpha);

                    if let Ok(mut guard) = best.lock() {
                        if value > guard.0 {
                            *guard = (value, Some(mv));
                        }
                    }
                }
            });
        }
    });

    let (value, winner) = best
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(mut mv) = winner {
        mv.value = value;
        board.best_move = mv;
    }
    value
}

fn worker_count() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::negamax_parallel;
    use crate::board::board::{Board, START_FEN};
    use crate::search::negamax::{negamax, ILLEGAL_SCORE, SCORE_BOUND};

    const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";

    fn fen(text: &str) -> Board {
        Board::from_fen(text).expect("test FEN should parse")
    }

    #[test]
    fn parallel_score_matches_single_threaded_search() {
        // The winning move may differ between equal-scoring candidates, so
        // only the score is asserted.
        for fixture in [START_FEN, KIWIPETE_FEN] {
            for depth in [1, 2, 3] {
                let mut sequential = fen(fixture);
                let expected = negamax(&mut sequential, depth, depth, -SCORE_BOUND, SCORE_BOUND);

                let mut parallel = fen(fixture);
                let got = negamax_parallel(&mut parallel, depth, -SCORE_BOUND, SCORE_BOUND);
                assert_eq!(got, expected, "depth {depth} on {fixture}");
            }
        }
    }

    #[test]
    fn parallel_search_records_a_best_move() {
        let mut board = fen(START_FEN);
        let value = negamax_parallel(&mut board, 2, -SCORE_BOUND, SCORE_BOUND);
        assert!(value > ILLEGAL_SCORE);
        assert_ne!(board.best_move.from, board.best_move.to);
        assert_eq!(board.best_move.value, value);
    }

    #[test]
    fn stalemated_positions_report_the_sentinel() {
        // Black has no legal moves and is not in check.
        let mut board = fen("k7/8/KQ6/8/8/8/8/8 b - - 0 1");
        let value = negamax_parallel(&mut board, 2, -SCORE_BOUND, SCORE_BOUND);
        assert_eq!(value, ILLEGAL_SCORE);
    }
}
