//! Attack queries over the mailbox board.
//!
//! `is_attacked` answers "does `by` attack this square" with a full-board
//! scan: for every piece of the attacking colour, test whether its movement
//! pattern reaches the target, reusing one ray-clearance helper for sliding
//! pieces and castling paths alike. The attacking colour is an explicit
//! parameter; nothing here mutates the board.

use crate::board::board::{col_of, row_of, Board, Square};
use crate::board::piece::{self, Color, BISHOP, KING, KNIGHT, PAWN, QUEEN, ROOK};
use crate::movegen::generator::KNIGHT_OFFSETS;

/// True when no piece stands strictly between `index1` and `index2` along
/// the line walked in steps of `step` (1 = rank, 8 = file, 7/9 = diagonals),
/// and the line does not run over the board edge.
pub fn clear_between(board: &Board, index1: i32, index2: i32, step: i32) -> bool {
    let (lo, hi) = if index1 > index2 {
        (index2, index1)
    } else {
        (index1, index2)
    };

    // A column jump of more than one per step means the line wrapped.
    if (col_of(lo) - col_of(lo + step)).abs() > 1 || (col_of(hi) - col_of(hi - step)).abs() > 1 {
        return false;
    }

    let mut i = lo + step;
    while i < hi {
        if board.squares[i as usize] != piece::EMPTY || (col_of(i) - col_of(i - step)).abs() > 1 {
            return false;
        }
        i += step;
    }
    true
}

/// Does any piece of colour `by` attack `target`?
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    let target = target as i32;
    let target_row = row_of(target);
    let target_col = col_of(target);

    for from in 0..64i32 {
        let attacker = board.squares[from as usize];
        if !piece::belongs_to(attacker, by) {
            continue;
        }

        let distance = target - from;
        let from_row = row_of(from);
        let from_col = col_of(from);

        let reaches = match piece::kind(attacker) {
            PAWN => pawn_reaches(by, distance, from_col),
            KNIGHT => {
                (target_row - from_row).abs() < 3
                    && (target_col - from_col).abs() < 3
                    && KNIGHT_OFFSETS.contains(&distance)
            }
            ROOK => {
                (from_row == target_row && clear_between(board, target, from, 1))
                    || (from_col == target_col && clear_between(board, target, from, 8))
            }
            BISHOP => {
                (distance % 7 == 0 && clear_between(board, target, from, 7))
                    || (distance % 9 == 0 && clear_between(board, target, from, 9))
            }
            QUEEN => {
                (from_row == target_row && clear_between(board, target, from, 1))
                    || (from_col == target_col && clear_between(board, target, from, 8))
                    || (distance % 7 == 0 && clear_between(board, target, from, 7))
                    || (distance % 9 == 0 && clear_between(board, target, from, 9))
            }
            KING => (target_row - from_row).abs() <= 1 && (target_col - from_col).abs() <= 1,
            _ => false,
        };

        if reaches {
            return true;
        }
    }
    false
}

/// Does any pawn of colour `by` attack `target`? Cheap variant used by the
/// move-ordering heuristic.
pub fn is_attacked_by_pawn(board: &Board, target: Square, by: Color) -> bool {
    let target = target as i32;
    for from in 0..64i32 {
        let attacker = board.squares[from as usize];
        if !piece::belongs_to(attacker, by) || piece::kind(attacker) != PAWN {
            continue;
        }
        if pawn_reaches(by, target - from, col_of(from)) {
            return true;
        }
    }
    false
}

#[inline]
fn pawn_reaches(by: Color, distance: i32, from_col: i32) -> bool {
    match by {
        Color::White => (distance == 7 && from_col != 0) || (distance == 9 && from_col != 7),
        Color::Black => (distance == -7 && from_col != 7) || (distance == -9 && from_col != 0),
    }
}

#[cfg(test)]
mod tests {
    use super::{clear_between, is_attacked, is_attacked_by_pawn};
    use crate::board::board::Board;
    use crate::board::piece::Color;
    use crate::utils::algebraic::square_from_text;

    fn sq(text: &str) -> u8 {
        square_from_text(text).expect("test square should parse")
    }

    #[test]
    fn rook_attacks_along_open_lines_only() {
        let board = Board::from_fen("8/8/8/3p4/8/8/3R4/k6K w - - 0 1").expect("FEN should parse");
        assert!(is_attacked(&board, sq("d5"), Color::White));
        assert!(is_attacked(&board, sq("h2"), Color::White));
        // The pawn on d5 blocks the file beyond it.
        assert!(!is_attacked(&board, sq("d7"), Color::White));
        // Off-line squares are not attacked.
        assert!(!is_attacked(&board, sq("e3"), Color::White));
    }

    #[test]
    fn bishop_rays_do_not_wrap_around_the_edge() {
        let board = Board::from_fen("8/8/8/8/8/7B/8/k6K w - - 0 1").expect("FEN should parse");
        // h3-c8 is the real long diagonal.
        assert!(is_attacked(&board, sq("g4"), Color::White));
        assert!(is_attacked(&board, sq("c8"), Color::White));
        assert!(is_attacked(&board, sq("g2"), Color::White));
        // a5 differs from h3 by 9 squares but lies across the edge.
        assert!(!is_attacked(&board, sq("a5"), Color::White));
    }

    #[test]
    fn pawns_attack_diagonally_not_forward() {
        let board =
            Board::from_fen("k7/8/8/8/4P3/8/8/K7 w - - 0 1").expect("FEN should parse");
        assert!(is_attacked(&board, sq("d5"), Color::White));
        assert!(is_attacked(&board, sq("f5"), Color::White));
        assert!(!is_attacked(&board, sq("e5"), Color::White));
        assert!(is_attacked_by_pawn(&board, sq("d5"), Color::White));
        assert!(!is_attacked_by_pawn(&board, sq("e5"), Color::White));
    }

    #[test]
    fn pawn_attacks_do_not_wrap_files() {
        // White pawn on h4 must not "attack" a6 across the board edge.
        let board = Board::from_fen("k7/8/8/8/7P/8/8/K7 w - - 0 1").expect("FEN should parse");
        assert!(is_attacked(&board, sq("g5"), Color::White));
        assert!(!is_attacked(&board, sq("a6"), Color::White));
    }

    #[test]
    fn knight_jumps_respect_the_edge_rule() {
        let board = Board::from_fen("7K/8/8/8/8/8/8/N3k3 w - - 0 1").expect("FEN should parse");
        assert!(is_attacked(&board, sq("b3"), Color::White));
        assert!(is_attacked(&board, sq("c2"), Color::White));
        // Offset 6 from a1 lands on g1 only by wrapping; must be rejected.
        assert!(!is_attacked(&board, sq("g1"), Color::White));
    }

    #[test]
    fn attacking_color_is_explicit() {
        let board = Board::from_fen("k7/8/8/3r4/8/8/8/K7 b - - 0 1").expect("FEN should parse");
        assert!(is_attacked(&board, sq("d1"), Color::Black));
        assert!(!is_attacked(&board, sq("d1"), Color::White));
        // Asking the same question for either colour leaves the board as-is.
        assert_eq!(board.turn, Color::Black);
    }

    #[test]
    fn clear_between_sees_blockers_and_edges() {
        let board = Board::from_fen("8/8/8/3p4/8/8/3R4/k6K w - - 0 1").expect("FEN should parse");
        let d2 = sq("d2") as i32;
        let d8 = sq("d8") as i32;
        let d5 = sq("d5") as i32;
        assert!(clear_between(&board, d2, d5, 8));
        assert!(!clear_between(&board, d2, d8, 8));
        // h1 to a2 is one "step" of 1 across the edge.
        assert!(!clear_between(&board, 7, 8, 1));
    }
}
