//! FEN snapshot parsing and formatting.
//!
//! Pure text ⇄ `Board` conversion: six whitespace-separated fields, with the
//! halfmove clock and fullmove number optional (defaulting to 0) so
//! well-known four-field test positions parse unchanged.

use crate::board::board::{
    square_at, Board, CastlingRights, Square, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE,
    CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE,
};
use crate::board::piece::{kind, piece_from_char, piece_to_char, Color, KING};
use crate::utils::algebraic::{square_from_text, square_to_text};

pub fn parse_fen(fen: &str) -> Result<Board, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("missing piece placement in FEN")?;
    let side_part = parts.next().ok_or("missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("missing en-passant square in FEN")?;
    let halfmove_part = parts.next();
    let fullmove_part = parts.next();

    let mut board = Board::default();

    parse_placement(board_part, &mut board)?;
    board.turn = parse_side_to_move(side_part)?;
    board.castling = parse_castling_rights(castling_part)?;
    board.en_passant = parse_en_passant_square(en_passant_part)?;
    board.halfmove_clock = parse_clock(halfmove_part);
    if board.halfmove_clock > 50 {
        board.halfmove_clock = 0;
    }
    board.fullmove_number = parse_clock(fullmove_part);

    Ok(board)
}

fn parse_placement(board_part: &str, board: &mut Board) -> Result<(), String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("piece placement must contain 8 ranks".to_owned());
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(step) = ch.to_digit(10) {
                file += step as usize;
                continue;
            }

            if file >= 8 {
                return Err(format!("rank {} has too many files", board_rank + 1));
            }

            let piece = piece_from_char(ch)
                .ok_or_else(|| format!("invalid piece letter '{ch}' in placement"))?;
            let square = square_at(board_rank, file);
            board.squares[square as usize] = piece;
            if kind(piece) == KING {
                let color = if ch == 'K' { Color::White } else { Color::Black };
                board.set_king_square(color, square);
            }
            file += 1;
        }

        if file != 8 {
            return Err(format!("rank {} does not sum to 8 files", board_rank + 1));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(format!("invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_WHITE_KINGSIDE,
            'Q' => rights |= CASTLE_WHITE_QUEENSIDE,
            'k' => rights |= CASTLE_BLACK_KINGSIDE,
            'q' => rights |= CASTLE_BLACK_QUEENSIDE,
            _ => return Err(format!("invalid castling rights character: {ch}")),
        }
    }
    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    Ok(Some(square_from_text(en_passant_part)?))
}

fn parse_clock(part: Option<&str>) -> u32 {
    part.and_then(|s| s.parse::<u32>().ok()).unwrap_or(0)
}

/// Format `board` as a six-field FEN snapshot.
pub fn generate_fen(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8).rev() {
        let mut empty_run = 0u32;
        for file in 0..8 {
            let piece = board.squares[square_at(rank, file) as usize];
            match piece_to_char(piece) {
                Some(letter) => {
                    if empty_run > 0 {
                        out.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    out.push(letter);
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push_str(&empty_run.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(match board.turn {
        Color::White => 'w',
        Color::Black => 'b',
    });

    out.push(' ');
    if board.castling == 0 {
        out.push('-');
    } else {
        if board.castling & CASTLE_WHITE_KINGSIDE != 0 {
            out.push('K');
        }
        if board.castling & CASTLE_WHITE_QUEENSIDE != 0 {
            out.push('Q');
        }
        if board.castling & CASTLE_BLACK_KINGSIDE != 0 {
            out.push('k');
        }
        if board.castling & CASTLE_BLACK_QUEENSIDE != 0 {
            out.push('q');
        }
    }

    out.push(' ');
    match board.en_passant {
        Some(square) => out.push_str(&square_to_text(square)),
        None => out.push('-'),
    }

    out.push(' ');
    out.push_str(&board.halfmove_clock.to_string());
    out.push(' ');
    out.push_str(&board.fullmove_number.to_string());

    out
}
