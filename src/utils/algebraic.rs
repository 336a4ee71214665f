//! Square index ⇄ algebraic coordinate text.
//!
//! Converts between human-readable coordinates (for example `e4`) and the
//! flat 0–63 square indexing shared by the board, FEN, and move-text code.

use crate::board::board::Square;

/// Convert coordinate text (for example `e4`) to a square index.
#[inline]
pub fn square_from_text(text: &str) -> Result<Square, String> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("invalid square: {text}"));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("invalid file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("invalid rank: {}", rank as char));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert a square index (`0..=63`) to coordinate text (for example `e4`).
#[inline]
pub fn square_to_text(square: Square) -> String {
    let file_char = char::from(b'a' + square % 8);
    let rank_char = char::from(b'1' + square / 8);
    format!("{file_char}{rank_char}")
}

#[cfg(test)]
mod tests {
    use super::{square_from_text, square_to_text};

    #[test]
    fn corners_round_trip() {
        assert_eq!(square_from_text("a1").expect("a1 should parse"), 0);
        assert_eq!(square_from_text("h8").expect("h8 should parse"), 63);
        assert_eq!(square_to_text(0), "a1");
        assert_eq!(square_to_text(63), "h8");
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(square_from_text("i1").is_err());
        assert!(square_from_text("a9").is_err());
        assert!(square_from_text("e").is_err());
        assert!(square_from_text("e44").is_err());
    }
}
