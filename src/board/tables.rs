//! Constant tables for the 10×12 mailbox board.
//!
//! The board is 120 cells: two guard rows top and bottom plus one guard
//! file on each side, so every sliding-piece loop terminates on an
//! off-board sentinel instead of a range check. The 64 playable squares
//! run 21 (a8) through 98 (h1), eight per row.

/// The 64 playable squares in rank-major order, a8 first.
pub const REAL_SQUARES: [usize; 64] = [
    21, 22, 23, 24, 25, 26, 27, 28,
    31, 32, 33, 34, 35, 36, 37, 38,
    41, 42, 43, 44, 45, 46, 47, 48,
    51, 52, 53, 54, 55, 56, 57, 58,
    61, 62, 63, 64, 65, 66, 67, 68,
    71, 72, 73, 74, 75, 76, 77, 78,
    81, 82, 83, 84, 85, 86, 87, 88,
    91, 92, 93, 94, 95, 96, 97, 98,
];

/// Rank reflection: a8 <-> a1, b7 <-> b2, and so on. Lets a single
/// piece-square table per piece type serve both colors.
pub const MIRROR: [usize; 120] = {
    let mut table = [0usize; 120];
    let mut sq = 0;
    while sq < 120 {
        table[sq] = 110 - 10 * (sq / 10) + sq % 10;
        sq += 1;
    }
    table
};

/// King-step offsets. The first four are orthogonal, the last four
/// diagonal; several loops rely on that split.
pub const DIRECTIONS: [i32; 8] = [-10, -1, 10, 1, -11, -9, 9, 11];

/// Knight jump offsets.
pub const KNIGHT_JUMPS: [i32; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];

/// Castling rights bits.
pub const CASTLE_WK: u8 = 1;
pub const CASTLE_WQ: u8 = 2;
pub const CASTLE_BK: u8 = 4;
pub const CASTLE_BQ: u8 = 8;
pub const CASTLE_ALL: u8 = CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ;

/// Per-square castling rights mask, AND-ed into the current rights by both
/// the from- and to-square of every move. 15 everywhere except the king
/// and rook home squares, so moving (or capturing on) those squares
/// silently drops the matching rights.
pub const CASTLING_RIGHTS_MASK: [u8; 120] = [
    0,  0,  0,  0,  0,  0,  0,  0,  0, 0,
    0,  0,  0,  0,  0,  0,  0,  0,  0, 0,
    0,  7, 15, 15, 15,  3, 15, 15, 11, 0,
    0, 15, 15, 15, 15, 15, 15, 15, 15, 0,
    0, 15, 15, 15, 15, 15, 15, 15, 15, 0,
    0, 15, 15, 15, 15, 15, 15, 15, 15, 0,
    0, 15, 15, 15, 15, 15, 15, 15, 15, 0,
    0, 15, 15, 15, 15, 15, 15, 15, 15, 0,
    0, 15, 15, 15, 15, 15, 15, 15, 15, 0,
    0, 13, 15, 15, 15, 12, 15, 15, 14, 0,
    0,  0,  0,  0,  0,  0,  0,  0,  0, 0,
    0,  0,  0,  0,  0,  0,  0,  0,  0, 0,
];

/// Rook relocation for a castling move, keyed by the king's destination.
/// Returns `(rook_to, rook_from)`.
#[inline(always)]
pub fn rook_castle_squares(king_to: usize) -> Option<(usize, usize)> {
    match king_to {
        97 => Some((96, 98)), // White O-O
        93 => Some((94, 91)), // White O-O-O
        27 => Some((26, 28)), // Black O-O
        23 => Some((24, 21)), // Black O-O-O
        _ => None,
    }
}

/// Manhattan distance to the board center for each playable square
/// (indexed 0..64 in rank-major order). Drives the mop-up term.
pub const CENTER_MANHATTAN: [i32; 64] = [
    6, 5, 4, 3, 3, 4, 5, 6,
    5, 4, 3, 2, 2, 3, 4, 5,
    4, 3, 2, 1, 1, 2, 3, 4,
    3, 2, 1, 0, 0, 1, 2, 3,
    3, 2, 1, 0, 0, 1, 2, 3,
    4, 3, 2, 1, 1, 2, 3, 4,
    5, 4, 3, 2, 2, 3, 4, 5,
    6, 5, 4, 3, 3, 4, 5, 6,
];

/// Index of a mailbox square into the 64-entry tables above.
#[inline(always)]
pub fn real_index(sq: usize) -> usize {
    (sq / 10 - 2) * 8 + (sq % 10 - 1)
}

/// Algebraic name ("e4") of a mailbox square.
pub fn square_name(sq: usize) -> String {
    let file = (b'a' + (sq % 10 - 1) as u8) as char;
    let rank = (b'0' + (10 - sq / 10) as u8) as char;
    format!("{file}{rank}")
}

/// Mailbox square of an algebraic name, if it names a playable square.
pub fn parse_square(name: &str) -> Option<usize> {
    let mut chars = name.chars();
    let file = chars.next()?;
    let rank = chars.next()?;
    if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    let col = file as usize - 'a' as usize + 1;
    let row = 10 - (rank as usize - '0' as usize);
    Some(row * 10 + col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_maps_ranks_onto_each_other() {
        assert_eq!(MIRROR[21], 91); // a8 -> a1
        assert_eq!(MIRROR[98], 28); // h1 -> h8
        assert_eq!(MIRROR[55], 65); // e5 -> e4
        for &sq in &REAL_SQUARES {
            assert_eq!(MIRROR[MIRROR[sq]], sq);
        }
    }

    #[test]
    fn square_names_round_trip() {
        assert_eq!(square_name(21), "a8");
        assert_eq!(square_name(98), "h1");
        assert_eq!(parse_square("e4"), Some(65));
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        for &sq in &REAL_SQUARES {
            assert_eq!(parse_square(&square_name(sq)), Some(sq));
        }
    }

    #[test]
    fn rights_mask_clears_only_home_squares() {
        assert_eq!(CASTLING_RIGHTS_MASK[95], 15 & !(CASTLE_WK | CASTLE_WQ)); // e1
        assert_eq!(CASTLING_RIGHTS_MASK[25], 15 & !(CASTLE_BK | CASTLE_BQ)); // e8
        assert_eq!(CASTLING_RIGHTS_MASK[98], 15 & !CASTLE_WK); // h1
        assert_eq!(CASTLING_RIGHTS_MASK[91], 15 & !CASTLE_WQ); // a1
        assert_eq!(CASTLING_RIGHTS_MASK[28], 15 & !CASTLE_BK); // h8
        assert_eq!(CASTLING_RIGHTS_MASK[21], 15 & !CASTLE_BQ); // a8
        assert_eq!(CASTLING_RIGHTS_MASK[65], 15); // e4
    }
}
