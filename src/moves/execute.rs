//! Applying and reverting moves.
//!
//! `make_move` updates every piece of derived state incrementally: the
//! Zobrist key, the four piece-square accumulators, the piece counts, the
//! phase score, the king cache and the castling/en-passant/clock fields.
//! The undo record snapshots the key, the accumulators and the halfmove
//! clock, so `unmake_move` restores those verbatim and only has to walk
//! the board changes back.

use crate::board::tables::{rook_castle_squares, CASTLING_RIGHTS_MASK, MIRROR};
use crate::board::{piece_code, code_kind, Color, PieceKind, Position, RepEntry, EMPTY};
use crate::hash::zobrist::zobrist_keys;
use crate::moves::types::{Move, MoveKind, NullUndo, Undo};
use crate::search::psqt;

/// Perspective square for accumulator updates: white reads the tables
/// directly, black through the rank reflection.
#[inline(always)]
fn persp(color: Color, sq: usize) -> usize {
    match color {
        Color::White => sq,
        Color::Black => MIRROR[sq],
    }
}

pub fn make_move(pos: &mut Position, mv: Move) {
    let keys = zobrist_keys();
    let us = pos.side_to_move;
    let them = us.opposite();
    let from = mv.from as usize;
    let to = mv.to as usize;
    let moved = piece_code(us, mv.piece) as usize;

    let undo = Undo {
        mv,
        captured: if mv.kind == MoveKind::EnPassant {
            piece_code(them, PieceKind::Pawn)
        } else {
            pos.board[to]
        },
        castling_rights: pos.castling_rights,
        en_passant: pos.en_passant,
        zobrist: pos.zobrist,
        accum: pos.accum,
        halfmove_clock: pos.halfmove_clock,
    };

    pos.halfmove_clock += 1;
    if us == Color::Black {
        pos.fullmove_number += 1;
    }

    // A stale en-passant target leaves the key before anything else.
    if let Some(ep) = pos.en_passant {
        pos.zobrist ^= keys.en_passant[ep];
    }
    pos.en_passant = None;

    let captured_on_to = pos.board[to];
    pos.board[from] = EMPTY;
    pos.board[to] = moved as u8;
    pos.zobrist ^= keys.pieces[moved][from] ^ keys.pieces[moved][to];

    if mv.piece == PieceKind::King {
        pos.king_sq[us as usize] = to;
        pos.update_kings_distance();

        if mv.kind == MoveKind::Castle {
            if let Some((rook_to, rook_from)) = rook_castle_squares(to) {
                let rook = piece_code(us, PieceKind::Rook) as usize;
                pos.board[rook_from] = EMPTY;
                pos.board[rook_to] = rook as u8;
                pos.zobrist ^= keys.pieces[rook][rook_from] ^ keys.pieces[rook][rook_to];

                let (rt, rf) = (persp(us, rook_to), persp(us, rook_from));
                pos.accum[us as usize] +=
                    psqt::mid_value(PieceKind::Rook, rt) - psqt::mid_value(PieceKind::Rook, rf);
                pos.accum[us as usize + 2] +=
                    psqt::end_value(PieceKind::Rook, rt) - psqt::end_value(PieceKind::Rook, rf);
            }
        }
    }

    let (pf, pt) = (persp(us, from), persp(us, to));
    if let MoveKind::Promotion(promo) = mv.kind {
        pos.halfmove_clock = 0;

        let promoted = piece_code(us, promo) as usize;
        pos.board[to] = promoted as u8;
        pos.zobrist ^= keys.pieces[moved][to] ^ keys.pieces[promoted][to];

        pos.piece_count[us as usize][PieceKind::Pawn as usize] -= 1;
        pos.piece_count[us as usize][promo as usize] += 1;

        pos.accum[us as usize] +=
            psqt::mid_value(promo, pt) - psqt::mid_value(PieceKind::Pawn, pf);
        pos.accum[us as usize + 2] +=
            psqt::end_value(promo, pt) - psqt::end_value(PieceKind::Pawn, pf);
    } else {
        pos.accum[us as usize] += psqt::mid_value(mv.piece, pt) - psqt::mid_value(mv.piece, pf);
        pos.accum[us as usize + 2] +=
            psqt::end_value(mv.piece, pt) - psqt::end_value(mv.piece, pf);
    }

    let is_capture = captured_on_to != EMPTY || mv.kind == MoveKind::EnPassant;
    if is_capture {
        pos.halfmove_clock = 0;

        let (cap_code, cap_sq) = if mv.kind == MoveKind::EnPassant {
            // The captured pawn sits one rank behind the landing square.
            let behind = if us == Color::White { to + 10 } else { to - 10 };
            let pawn = piece_code(them, PieceKind::Pawn) as usize;
            pos.board[behind] = EMPTY;
            (pawn, behind)
        } else {
            (captured_on_to as usize, to)
        };
        pos.zobrist ^= keys.pieces[cap_code][cap_sq];

        let cap_kind = code_kind(cap_code as u8);
        pos.piece_count[them as usize][cap_kind as usize] -= 1;
        pos.phase -= psqt::phase_weight(cap_kind);

        let cp = persp(them, cap_sq);
        pos.accum[them as usize] -= psqt::mid_value(cap_kind, cp);
        pos.accum[them as usize + 2] -= psqt::end_value(cap_kind, cp);
    } else if mv.kind == MoveKind::DoublePush {
        pos.halfmove_clock = 0;

        let ep = (from + to) / 2;
        pos.en_passant = Some(ep);
        pos.zobrist ^= keys.en_passant[ep];
    } else if mv.piece == PieceKind::Pawn {
        // Quiet single push still resets the fifty-move clock.
        pos.halfmove_clock = 0;
    }

    let old_rights = pos.castling_rights;
    let new_rights = old_rights & CASTLING_RIGHTS_MASK[from] & CASTLING_RIGHTS_MASK[to];
    pos.zobrist ^= keys.castling[old_rights as usize] ^ keys.castling[new_rights as usize];
    pos.castling_rights = new_rights;

    pos.side_to_move = them;
    pos.zobrist ^= keys.side;

    pos.repetition.push(RepEntry {
        key: pos.zobrist,
        irreversible: is_capture || mv.piece == PieceKind::Pawn,
    });
    pos.log.push(undo);
}

pub fn unmake_move(pos: &mut Position) {
    let undo = pos
        .log
        .pop()
        .expect("unmake_move called with an empty move log");
    pos.repetition.pop();

    let us = pos.side_to_move.opposite();
    pos.side_to_move = us;
    if us == Color::Black {
        pos.fullmove_number -= 1;
    }

    let mv = undo.mv;
    let from = mv.from as usize;
    let to = mv.to as usize;

    pos.board[from] = piece_code(us, mv.piece);
    if mv.kind == MoveKind::EnPassant {
        pos.board[to] = EMPTY;
        let behind = if us == Color::White { to + 10 } else { to - 10 };
        pos.board[behind] = undo.captured;
    } else {
        pos.board[to] = undo.captured;
    }

    if undo.captured != EMPTY {
        let cap_kind = code_kind(undo.captured);
        pos.piece_count[us.opposite() as usize][cap_kind as usize] += 1;
        pos.phase += psqt::phase_weight(cap_kind);
    }

    if let MoveKind::Promotion(promo) = mv.kind {
        pos.piece_count[us as usize][PieceKind::Pawn as usize] += 1;
        pos.piece_count[us as usize][promo as usize] -= 1;
    }

    if mv.kind == MoveKind::Castle {
        if let Some((rook_to, rook_from)) = rook_castle_squares(to) {
            pos.board[rook_to] = EMPTY;
            pos.board[rook_from] = piece_code(us, PieceKind::Rook);
        }
    }

    if mv.piece == PieceKind::King {
        pos.king_sq[us as usize] = from;
        pos.update_kings_distance();
    }

    // Snapshot fields come back verbatim.
    pos.castling_rights = undo.castling_rights;
    pos.en_passant = undo.en_passant;
    pos.zobrist = undo.zobrist;
    pos.accum = undo.accum;
    pos.halfmove_clock = undo.halfmove_clock;
}

/// Hand the move over to the opponent without touching the board. Used by
/// null-move pruning; the en-passant target is cleared for the duration.
pub(crate) fn make_null(pos: &mut Position) -> NullUndo {
    let keys = zobrist_keys();
    let undo = NullUndo {
        en_passant: pos.en_passant,
        zobrist: pos.zobrist,
    };

    if let Some(ep) = pos.en_passant {
        pos.zobrist ^= keys.en_passant[ep];
    }
    pos.en_passant = None;

    pos.side_to_move = pos.side_to_move.opposite();
    pos.zobrist ^= keys.side;

    undo
}

pub(crate) fn unmake_null(pos: &mut Position, undo: NullUndo) {
    pos.side_to_move = pos.side_to_move.opposite();
    pos.en_passant = undo.en_passant;
    pos.zobrist = undo.zobrist;
}
