//! Static evaluation.
//!
//! The heavy lifting happened long before this is called: make/unmake
//! keep four piece-square accumulators (white/black × mid/endgame) and
//! the phase score current, so the tapered evaluation is a handful of
//! integer operations. A mop-up term takes over in pawnless endgames to
//! steer the winning king toward the loser and the loser toward a
//! corner.

use crate::board::tables::{real_index, CENTER_MANHATTAN};
use crate::board::{Color, PieceKind, Position};
use crate::search::psqt::{ENDGAME_PHASE, OPENING_PHASE};

/// Score of the position from the side to move's point of view, in
/// centipawns.
pub fn evaluate(pos: &Position) -> i32 {
    let score_mid = pos.accum[0] - pos.accum[1];
    let score_end = pos.accum[2] - pos.accum[3];
    let mut score =
        (score_mid * pos.phase + score_end * (OPENING_PHASE - pos.phase)) / OPENING_PHASE;

    if pos.phase <= 2 * ENDGAME_PHASE
        && pos.piece_count(Color::White, PieceKind::Pawn) == 0
        && pos.piece_count(Color::Black, PieceKind::Pawn) == 0
    {
        score = mop_up(pos, score_end);
    }

    match pos.side_to_move {
        Color::White => score,
        Color::Black => -score,
    }
}

/// Pawnless-endgame handling. The halved material term keeps the strong
/// side from throwing pieces away; the distance terms only apply when the
/// weak side is bare of rooks and queens while the strong side can
/// actually mate (rook, queen, or the bishop pair).
fn mop_up(pos: &Position, score_end: i32) -> i32 {
    let count = |color: Color, kind: PieceKind| pos.piece_count(color, kind);
    let mut score = score_end / 2;

    if count(Color::Black, PieceKind::Rook) == 0
        && count(Color::Black, PieceKind::Queen) == 0
        && score > 0
        && (count(Color::White, PieceKind::Rook) >= 1
            || count(Color::White, PieceKind::Queen) >= 1
            || count(Color::White, PieceKind::Bishop) >= 2)
    {
        let losing_king = real_index(pos.king_square(Color::Black));
        score += 47 * CENTER_MANHATTAN[losing_king] + 16 * (14 - pos.kings_distance);
    }

    if count(Color::White, PieceKind::Rook) == 0
        && count(Color::White, PieceKind::Queen) == 0
        && score < 0
        && (count(Color::Black, PieceKind::Rook) >= 1
            || count(Color::Black, PieceKind::Queen) >= 1
            || count(Color::Black, PieceKind::Bishop) >= 2)
    {
        let losing_king = real_index(pos.king_square(Color::White));
        score -= 47 * CENTER_MANHATTAN[losing_king] + 16 * (14 - pos.kings_distance);
    }

    score
}
