//! Exhaustive move-generation verification (perft).
//!
//! Counts leaf positions at a fixed depth over the pseudolegal tree,
//! rejecting subtrees that leave a king capturable, so the totals match the
//! published reference counts for legal move generation. The parallel
//! variant splits the root move list across a worker pool with fine-grained
//! dynamic chunking, because subtree sizes vary wildly.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::board::board::Board;
use crate::board::chess_move::Move;
use crate::movegen::attacks::is_attacked;
use crate::movegen::generator::{all_pseudolegal, legal_moves};
use crate::movegen::make_move::{make, undo};

/// One root move per work grab; subtree costs are too uneven for larger
/// chunks to pay off.
const PARALLEL_CHUNK: usize = 1;

/// Count leaf positions reachable in exactly `depth` plies.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        // Reject leaves where the side that just moved left its king
        // capturable.
        let mover = board.turn.opposite();
        if is_attacked(board, board.king_square(mover), board.turn) {
            return 0;
        }
        return 1;
    }

    let moves = all_pseudolegal(board);

    // If any pseudolegal move lands on the enemy king, the previous ply was
    // illegal; prune the whole branch.
    let enemy_king = board.king_square(board.turn.opposite());
    if moves.iter().any(|mv| mv.to == enemy_king) {
        return 0;
    }

    let mut nodes = 0;
    for mut mv in moves {
        make(board, &mut mv);
        nodes += perft(board, depth - 1);
        undo(board, &mv);
    }
    nodes
}

/// Parallel perft: the legal root moves are split across a worker pool, each
/// worker recursing single-threaded on its own board clone. Counts are
/// summed, so worker completion order cannot affect the result.
pub fn perft_parallel(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return perft(board, 0);
    }

    let root_moves = legal_moves(board);
    let snapshot: &Board = board;
    let next = AtomicUsize::new(0);
    let total = AtomicU64::new(0);

    thread::scope(|scope| {
        for _ in 0..worker_count() {
            scope.spawn(|| loop {
                let index = next.fetch_add(PARALLEL_CHUNK, Ordering::Relaxed);
                if index >= root_moves.len() {
                    break;
                }
                let mut local = snapshot.clone();
                let mut mv = root_moves[index];
                make(&mut local, &mut mv);
                total.fetch_add(perft(&mut local, depth - 1), Ordering::Relaxed);
            });
        }
    });

    total.into_inner()
}

/// Per-root-move subtotals, for narrowing down generator disagreements.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for mut mv in legal_moves(board) {
        make(board, &mut mv);
        let nodes = perft(board, depth - 1);
        undo(board, &mv);
        out.push((mv, nodes));
    }
    out
}

/// Parallel divide; subtotal order follows worker completion and is not
/// deterministic.
pub fn perft_divide_parallel(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let root_moves = legal_moves(board);
    let snapshot: &Board = board;
    let next = AtomicUsize::new(0);
    let results = Mutex::new(Vec::with_capacity(root_moves.len()));

    thread::scope(|scope| {
        for _ in 0..worker_count() {
            scope.spawn(|| loop {
                let index = next.fetch_add(PARALLEL_CHUNK, Ordering::Relaxed);
                if index >= root_moves.len() {
                    break;
                }
                let mut local = snapshot.clone();
                let mut mv = root_moves[index];
                make(&mut local, &mut mv);
                let nodes = perft(&mut local, depth - 1);
                if let Ok(mut guard) = results.lock() {
                    guard.push((root_moves[index], nodes));
                }
            });
        }
    });

    results.into_inner().unwrap_or_else(PoisonError::into_inner)
}

fn worker_count() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
