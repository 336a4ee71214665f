//! The reversible make/undo state machine.
//!
//! `make` stashes every irreversible piece of position state (castling
//! rights, halfmove clock, en-passant target, captured piece) into the
//! move's `info` field before mutating the board; `undo` restores the board
//! bit-for-bit from those fields. The two must be used with strict stack
//! discipline: `undo` takes the exact move most recently made.

use crate::board::board::{
    row_of, Board, BLACK_KINGSIDE_ROOK_HOME, BLACK_KING_HOME, BLACK_QUEENSIDE_ROOK_HOME,
    CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE,
    WHITE_KINGSIDE_ROOK_HOME, WHITE_KING_HOME, WHITE_QUEENSIDE_ROOK_HOME,
};
use crate::board::chess_move::{Move, CASTLING_FLAG, EN_PASSANT_FLAG, EP_NONE, PROMOTION_FLAG};
use crate::board::piece::{self, Color, BLACK, COLOR_MASK, EMPTY, KING, PAWN, ROOK, WHITE};

/// Apply `mv` to `board`, stashing the irreversible state into `mv.info`.
pub fn make(board: &mut Board, mv: &mut Move) {
    let moving_kind = piece::kind(board.piece_at(mv.from));
    let distance = mv.to as i32 - mv.from as i32;

    // A replayed move may still carry the snapshot of an earlier make; only
    // the promotion target survives, everything else is re-stashed below.
    mv.clear_stashed_info();
    let ep_state = match board.en_passant {
        Some(square) => square as u32,
        None => EP_NONE,
    };
    mv.stash_position_state(board.castling, board.halfmove_clock, ep_state);

    // A king or rook leaving its home square forfeits the matching rights.
    if board.turn == Color::White {
        if mv.from == WHITE_KING_HOME || mv.from == WHITE_QUEENSIDE_ROOK_HOME {
            board.castling &= !CASTLE_WHITE_QUEENSIDE;
        }
        if mv.from == WHITE_KING_HOME || mv.from == WHITE_KINGSIDE_ROOK_HOME {
            board.castling &= !CASTLE_WHITE_KINGSIDE;
        }
    } else {
        if mv.from == BLACK_KING_HOME || mv.from == BLACK_QUEENSIDE_ROOK_HOME {
            board.castling &= !CASTLE_BLACK_QUEENSIDE;
        }
        if mv.from == BLACK_KING_HOME || mv.from == BLACK_KINGSIDE_ROOK_HOME {
            board.castling &= !CASTLE_BLACK_KINGSIDE;
        }
    }

    // Relocate the piece, recording whatever occupied the destination.
    mv.stash_captured_piece(board.piece_at(mv.to));
    board.squares[mv.to as usize] = board.squares[mv.from as usize];
    board.squares[mv.from as usize] = EMPTY;

    board.en_passant = None;
    if moving_kind == PAWN {
        if distance == 16 || distance == -16 {
            board.en_passant = Some((mv.from as i32 + distance / 2) as u8);
        } else if row_of(mv.to as i32) == 7 || row_of(mv.to as i32) == 0 {
            // Promotion: swap the pawn for the requested target kind.
            let color_bits = board.squares[mv.to as usize] & COLOR_MASK;
            board.squares[mv.to as usize] = color_bits | mv.promotion_kind();
            mv.info |= PROMOTION_FLAG;
        } else if distance % 8 != 0 && !mv.is_capture() {
            // Diagonal pawn move onto an empty square: en passant.
            mv.info |= EN_PASSANT_FLAG;
            if board.turn == Color::White {
                mv.stash_captured_piece(BLACK | PAWN);
                board.squares[(mv.to - 8) as usize] = EMPTY;
            } else {
                mv.stash_captured_piece(WHITE | PAWN);
                board.squares[(mv.to + 8) as usize] = EMPTY;
            }
        }
    }

    if moving_kind == ROOK {
        clear_rook_rights(board, mv.from);
    }
    // A capture on a rook home square also forfeits that side's rights.
    clear_rook_rights(board, mv.to);

    if moving_kind == KING {
        board.set_king_square(board.turn, mv.to);
        if board.turn == Color::White {
            board.castling &= !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE);
        } else {
            board.castling &= !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE);
        }
        if distance == 2 {
            // Castling short: the rook jumps to the king's other side.
            board.squares[(mv.to - 1) as usize] = board.squares[(mv.to + 1) as usize];
            board.squares[(mv.to + 1) as usize] = EMPTY;
            mv.info |= CASTLING_FLAG;
        } else if distance == -2 {
            // Castling long.
            board.squares[(mv.to + 1) as usize] = board.squares[(mv.to - 2) as usize];
            board.squares[(mv.to - 2) as usize] = EMPTY;
            mv.info |= CASTLING_FLAG;
        }
    }

    if mv.is_capture() || moving_kind == PAWN {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock += 1;
    }
    if board.turn == Color::Black {
        board.fullmove_number += 1;
    }
    board.turn = board.turn.opposite();
}

/// Revert the most recently made move, restoring `board` exactly.
pub fn undo(board: &mut Board, mv: &Move) {
    let moved_kind = piece::kind(board.piece_at(mv.to));
    let distance = mv.to as i32 - mv.from as i32;
    let mover = board.turn.opposite();

    board.castling = mv.castling_rights();
    board.halfmove_clock = mv.halfmove_clock();
    board.en_passant = mv.en_passant_square();

    board.squares[mv.from as usize] = board.squares[mv.to as usize];
    board.squares[mv.to as usize] = mv.captured_piece();

    if mv.is_promotion() {
        board.squares[mv.from as usize] = mover.mask() | PAWN;
    } else if mv.is_en_passant() {
        // The captured pawn goes back behind the destination square.
        if board.turn == Color::White {
            board.squares[(mv.to + 8) as usize] = board.squares[mv.to as usize];
        } else {
            board.squares[(mv.to - 8) as usize] = board.squares[mv.to as usize];
        }
        board.squares[mv.to as usize] = EMPTY;
    } else if moved_kind == KING {
        board.set_king_square(mover, mv.from);
        if distance == 2 {
            board.squares[(mv.to + 1) as usize] = board.squares[(mv.to - 1) as usize];
            board.squares[(mv.to - 1) as usize] = EMPTY;
        } else if distance == -2 {
            board.squares[(mv.to - 2) as usize] = board.squares[(mv.to + 1) as usize];
            board.squares[(mv.to + 1) as usize] = EMPTY;
        }
    }

    if board.turn == Color::White {
        board.fullmove_number -= 1;
    }
    board.turn = mover;
}

fn clear_rook_rights(board: &mut Board, square: u8) {
    match square {
        WHITE_QUEENSIDE_ROOK_HOME => board.castling &= !CASTLE_WHITE_QUEENSIDE,
        WHITE_KINGSIDE_ROOK_HOME => board.castling &= !CASTLE_WHITE_KINGSIDE,
        BLACK_QUEENSIDE_ROOK_HOME => board.castling &= !CASTLE_BLACK_QUEENSIDE,
        BLACK_KINGSIDE_ROOK_HOME => board.castling &= !CASTLE_BLACK_KINGSIDE,
        _ => {}
    }
}
