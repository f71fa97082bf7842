//! FEN parsing and serialisation for [`Position`].

use thiserror::Error;

use super::tables::{
    parse_square, square_name, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, REAL_SQUARES,
};
use super::{piece_code, Color, PieceKind, Position, RepEntry, EMPTY, OFFBOARD};

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors produced when a FEN string fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 FEN fields, found {found}")]
    WrongFieldCount { found: usize },
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    #[error("rank {rank} describes {length} squares, expected 8")]
    BadRankLength { rank: usize, length: usize },
    #[error("invalid piece character '{0}'")]
    InvalidPieceChar(char),
    #[error("expected exactly one king per side")]
    WrongKingCount,
    #[error("invalid active color {0:?}")]
    InvalidColor(String),
    #[error("invalid castling rights {0:?}")]
    InvalidCastling(String),
    #[error("invalid en passant square {0:?}")]
    InvalidEnPassant(String),
    #[error("invalid move counter {0:?}")]
    InvalidCounter(String),
}

fn piece_from_char(c: char) -> Option<(Color, PieceKind)> {
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match c.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some((color, kind))
}

fn piece_to_char(color: Color, kind: PieceKind) -> char {
    let c = match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

pub(super) fn parse(fen: &str) -> Result<Position, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(FenError::WrongFieldCount {
            found: fields.len(),
        });
    }

    let mut board = [OFFBOARD; 120];
    for &sq in &REAL_SQUARES {
        board[sq] = EMPTY;
    }

    // Piece placement, rank 8 first.
    let ranks: Vec<&str> = fields[0].split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }
    for (rank_index, rank_str) in ranks.iter().enumerate() {
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(digit) = c.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(FenError::InvalidPieceChar(c));
                }
                file += digit as usize;
            } else {
                let (color, kind) = piece_from_char(c).ok_or(FenError::InvalidPieceChar(c))?;
                if file >= 8 {
                    return Err(FenError::BadRankLength {
                        rank: rank_index,
                        length: file + 1,
                    });
                }
                board[(rank_index + 2) * 10 + file + 1] = piece_code(color, kind);
                file += 1;
            }
        }
        if file != 8 {
            return Err(FenError::BadRankLength {
                rank: rank_index,
                length: file,
            });
        }
    }

    // Active color.
    let side_to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::InvalidColor(other.to_string())),
    };

    // Castling rights.
    let mut castling_rights = 0u8;
    if fields[2] != "-" {
        if fields[2].is_empty() || fields[2].len() > 4 {
            return Err(FenError::InvalidCastling(fields[2].to_string()));
        }
        for c in fields[2].chars() {
            castling_rights |= match c {
                'K' => CASTLE_WK,
                'Q' => CASTLE_WQ,
                'k' => CASTLE_BK,
                'q' => CASTLE_BQ,
                _ => return Err(FenError::InvalidCastling(fields[2].to_string())),
            };
        }
    }

    // En passant target: "-" or a square on rank 3 or 6.
    let en_passant = if fields[3] == "-" {
        None
    } else {
        let sq = parse_square(fields[3])
            .filter(|&sq| sq / 10 == 4 || sq / 10 == 7)
            .ok_or_else(|| FenError::InvalidEnPassant(fields[3].to_string()))?;
        Some(sq)
    };

    // Move counters default to 0 / 1 when absent.
    let halfmove_clock = match fields.get(4) {
        Some(s) => s
            .parse::<u32>()
            .map_err(|_| FenError::InvalidCounter(s.to_string()))?,
        None => 0,
    };
    let fullmove_number = match fields.get(5) {
        Some(s) => s
            .parse::<u32>()
            .map_err(|_| FenError::InvalidCounter(s.to_string()))?,
        None => 1,
    };

    // Exactly one king per color.
    let mut king_sq = [0usize; 2];
    let mut kings = [0u8; 2];
    for &sq in &REAL_SQUARES {
        let code = board[sq];
        if code == piece_code(Color::White, PieceKind::King) {
            king_sq[0] = sq;
            kings[0] += 1;
        } else if code == piece_code(Color::Black, PieceKind::King) {
            king_sq[1] = sq;
            kings[1] += 1;
        }
    }
    if kings != [1, 1] {
        return Err(FenError::WrongKingCount);
    }

    let mut pos = Position {
        board,
        side_to_move,
        castling_rights,
        en_passant,
        halfmove_clock,
        fullmove_number,
        king_sq,
        kings_distance: 0,
        piece_count: [[0; 6]; 2],
        accum: [0; 4],
        phase: 0,
        zobrist: 0,
        repetition: Vec::new(),
        log: Vec::new(),
    };

    pos.update_kings_distance();
    pos.piece_count = pos.count_pieces();
    pos.accum = pos.compute_accumulators();
    pos.phase = pos.compute_phase();
    pos.zobrist = pos.compute_zobrist_full();
    pos.repetition.push(RepEntry {
        key: pos.zobrist,
        irreversible: true,
    });

    Ok(pos)
}

impl Position {
    /// Serialise the position back into a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for row in 2..10 {
            let mut empties = 0;
            for col in 1..9 {
                match self.piece_at(row * 10 + col) {
                    Some((color, kind)) => {
                        if empties > 0 {
                            fen.push((b'0' + empties) as char);
                            empties = 0;
                        }
                        fen.push(piece_to_char(color, kind));
                    }
                    None => empties += 1,
                }
            }
            if empties > 0 {
                fen.push((b'0' + empties) as char);
            }
            if row != 9 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            for (flag, c) in [
                (CASTLE_WK, 'K'),
                (CASTLE_WQ, 'Q'),
                (CASTLE_BK, 'k'),
                (CASTLE_BQ, 'q'),
            ] {
                if self.castling_rights & flag != 0 {
                    fen.push(c);
                }
            }
        }

        match self.en_passant {
            Some(sq) => {
                fen.push(' ');
                fen.push_str(&square_name(sq));
            }
            None => fen.push_str(" -"),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}
