//! Legal move generation.
//!
//! One king-ray scan produces the pin and check picture for the side to
//! move; the generators branch on piece type inline and consult that
//! shared context, so no pseudo-legal moves are ever emitted. Three
//! situations are covered: quiet generation, capture-only generation for
//! quiescence, and check evasions (restricted to the blocking-or-capture
//! square set) when the king is attacked.

use arrayvec::ArrayVec;

use crate::board::tables::{
    CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, DIRECTIONS, KNIGHT_JUMPS, REAL_SQUARES,
};
use crate::board::{code_color, code_kind, piece_code, Color, PieceKind, Position, EMPTY, OFFBOARD};
use crate::moves::types::{Move, MoveBuffer, MoveKind};

/// Squares a non-king move may land on while evading a single check:
/// the check ray from king to checker, checker included.
type Targets = ArrayVec<usize, 8>;

/// Pin and check picture around the friendly king. Each pin is
/// `(pinned square, ray direction)`; each check is `(attacker square,
/// ray direction or knight offset)`.
pub(crate) struct RayScan {
    pub in_check: bool,
    pub pins: ArrayVec<(usize, i32), 8>,
    pub checks: ArrayVec<(usize, i32), 8>,
}

/// Whether a piece of `kind` on the scanned ray attacks the origin.
/// `dir_index` indexes [`DIRECTIONS`] (0..4 orthogonal, 4..8 diagonal);
/// `step` is the distance along the ray.
#[inline]
fn attacks_along(dir_index: usize, step: i32, kind: PieceKind, attacker: Color) -> bool {
    match kind {
        PieceKind::Rook => dir_index < 4,
        PieceKind::Bishop => dir_index >= 4,
        PieceKind::Queen => true,
        PieceKind::Pawn => {
            step == 1
                && match attacker {
                    Color::White => dir_index == 6 || dir_index == 7,
                    Color::Black => dir_index == 4 || dir_index == 5,
                }
        }
        PieceKind::King => step == 1,
        PieceKind::Knight => false,
    }
}

/// Walk the eight rays out of the king square, classifying the first
/// friendly piece on each ray as a pin candidate and the first enemy
/// piece as a checker or pin confirmation; then probe the knight jumps.
pub(crate) fn pins_and_checks(pos: &Position, king: usize) -> RayScan {
    let us = pos.side_to_move;
    let them = us.opposite();
    let mut scan = RayScan {
        in_check: false,
        pins: ArrayVec::new(),
        checks: ArrayVec::new(),
    };

    for (i, &d) in DIRECTIONS.iter().enumerate() {
        let mut possible_pin: Option<(usize, i32)> = None;
        let mut cur = king as i32;
        let mut step = 0;
        loop {
            step += 1;
            cur += d;
            let code = pos.board[cur as usize];
            if code == OFFBOARD {
                break;
            }
            if code == EMPTY {
                continue;
            }
            if code_color(code) == us {
                if possible_pin.is_none() {
                    possible_pin = Some((cur as usize, d));
                } else {
                    // Second friendly piece shields the first; no pin.
                    break;
                }
            } else {
                if attacks_along(i, step, code_kind(code), them) {
                    match possible_pin {
                        None => {
                            scan.in_check = true;
                            scan.checks.push((cur as usize, d));
                        }
                        Some(pin) => scan.pins.push(pin),
                    }
                }
                break;
            }
        }
    }

    for &d in &KNIGHT_JUMPS {
        let sq = (king as i32 + d) as usize;
        if pos.board[sq] == piece_code(them, PieceKind::Knight) {
            scan.in_check = true;
            scan.checks.push((sq, d));
        }
    }

    scan
}

/// Point attack query: is `sq` attacked by the opponent of `us`?
///
/// The friendly king is transparent to the ray walks, which makes the
/// query equivalent to asking "would our king be attacked standing on
/// `sq`, having left its current square" — exactly what king-step and
/// castling-traversal legality need.
pub fn square_attacked(pos: &Position, sq: usize, us: Color) -> bool {
    let them = us.opposite();

    for (i, &d) in DIRECTIONS.iter().enumerate() {
        let mut cur = sq as i32;
        let mut step = 0;
        loop {
            step += 1;
            cur += d;
            let code = pos.board[cur as usize];
            if code == OFFBOARD {
                break;
            }
            if code == EMPTY {
                continue;
            }
            if code_color(code) == us {
                if code_kind(code) != PieceKind::King {
                    break;
                }
            } else {
                if attacks_along(i, step, code_kind(code), them) {
                    return true;
                }
                break;
            }
        }
    }

    for &d in &KNIGHT_JUMPS {
        if pos.board[(sq as i32 + d) as usize] == piece_code(them, PieceKind::Knight) {
            return true;
        }
    }

    false
}

/// Is `color`'s king currently attacked?
#[inline]
pub fn in_check(pos: &Position, color: Color) -> bool {
    square_attacked(pos, pos.king_square(color), color)
}

/// Fill `moves` with every legal move for the side to move.
pub fn generate_legal(pos: &mut Position, moves: &mut impl MoveBuffer) {
    moves.clear();
    let king = pos.king_square(pos.side_to_move);
    let scan = pins_and_checks(pos, king);

    if scan.in_check {
        if scan.checks.len() == 1 {
            let targets = evasion_targets(pos, king, scan.checks[0]);
            generate_for_side(pos, &scan, Some(&targets), false, moves);
        } else {
            // Double check: only the king may move.
            king_moves(pos, true, king, false, moves);
        }
    } else {
        generate_for_side(pos, &scan, None, false, moves);
    }
}

/// Fill `moves` with legal captures only (en passant included), for
/// quiescence. Promotion fans are reduced to the queen outside of check.
pub fn generate_captures(pos: &mut Position, moves: &mut impl MoveBuffer) {
    moves.clear();
    let king = pos.king_square(pos.side_to_move);
    let scan = pins_and_checks(pos, king);

    if scan.in_check {
        if scan.checks.len() == 1 {
            let targets = evasion_targets(pos, king, scan.checks[0]);
            generate_for_side(pos, &scan, Some(&targets), true, moves);
        } else {
            king_moves(pos, true, king, true, moves);
        }
    } else {
        generate_for_side(pos, &scan, None, true, moves);
    }
}

/// The blocking-or-capturing square set for a single check: exactly the
/// knight's square for a knight check, otherwise the ray from king to
/// checker inclusive.
fn evasion_targets(pos: &Position, king: usize, check: (usize, i32)) -> Targets {
    let (checker, d) = check;
    let mut targets = Targets::new();
    if code_kind(pos.board[checker]) == PieceKind::Knight {
        targets.push(checker);
    } else {
        let mut cur = king as i32;
        loop {
            cur += d;
            targets.push(cur as usize);
            if cur as usize == checker {
                break;
            }
        }
    }
    targets
}

fn generate_for_side(
    pos: &mut Position,
    scan: &RayScan,
    targets: Option<&Targets>,
    captures_only: bool,
    buf: &mut impl MoveBuffer,
) {
    for &sq in &REAL_SQUARES {
        let code = pos.board[sq];
        if code >= 12 || code_color(code) != pos.side_to_move {
            continue;
        }
        match code_kind(code) {
            PieceKind::Pawn => pawn_moves(pos, scan, sq, targets, captures_only, buf),
            PieceKind::Knight => knight_moves(pos, scan, sq, targets, captures_only, buf),
            PieceKind::Bishop => slider_moves(
                pos,
                scan,
                sq,
                PieceKind::Bishop,
                &DIRECTIONS[4..8],
                targets,
                captures_only,
                buf,
            ),
            PieceKind::Rook => slider_moves(
                pos,
                scan,
                sq,
                PieceKind::Rook,
                &DIRECTIONS[0..4],
                targets,
                captures_only,
                buf,
            ),
            PieceKind::Queen => slider_moves(
                pos,
                scan,
                sq,
                PieceKind::Queen,
                &DIRECTIONS,
                targets,
                captures_only,
                buf,
            ),
            PieceKind::King => king_moves(pos, scan.in_check, sq, captures_only, buf),
        }
    }
}

#[inline]
fn pin_direction(scan: &RayScan, sq: usize) -> Option<i32> {
    scan.pins
        .iter()
        .find(|&&(pinned, _)| pinned == sq)
        .map(|&(_, d)| d)
}

#[inline]
fn allowed(targets: Option<&Targets>, sq: usize) -> bool {
    targets.is_none_or(|t| t.contains(&sq))
}

/// Which promotions to fan into. Quiescence outside of check only keeps
/// the queen; everywhere else all four pieces are emitted.
#[derive(Clone, Copy)]
enum PromoSet {
    All,
    QueenOnly,
}

fn push_pawn_move(
    buf: &mut impl MoveBuffer,
    from: usize,
    to: usize,
    promo_row: usize,
    promos: PromoSet,
) {
    if to / 10 == promo_row {
        match promos {
            PromoSet::All => {
                for kind in [
                    PieceKind::Queen,
                    PieceKind::Rook,
                    PieceKind::Bishop,
                    PieceKind::Knight,
                ] {
                    buf.push(Move::new(
                        from,
                        to,
                        MoveKind::Promotion(kind),
                        PieceKind::Pawn,
                    ));
                }
            }
            PromoSet::QueenOnly => buf.push(Move::new(
                from,
                to,
                MoveKind::Promotion(PieceKind::Queen),
                PieceKind::Pawn,
            )),
        }
    } else {
        buf.push(Move::new(from, to, MoveKind::Quiet, PieceKind::Pawn));
    }
}

fn pawn_moves(
    pos: &mut Position,
    scan: &RayScan,
    from: usize,
    targets: Option<&Targets>,
    captures_only: bool,
    buf: &mut impl MoveBuffer,
) {
    let us = pos.side_to_move;
    let them = us.opposite();
    let dir: i32 = if us == Color::White { -10 } else { 10 };
    let start_row = if us == Color::White { 8 } else { 3 };
    let promo_row = if us == Color::White { 2 } else { 9 };
    let pin = pin_direction(scan, from);

    if !captures_only {
        let ahead = (from as i32 + dir) as usize;
        if pos.board[ahead] == EMPTY && pin.is_none_or(|p| p == dir || p == -dir) {
            if allowed(targets, ahead) {
                push_pawn_move(buf, from, ahead, promo_row, PromoSet::All);
            }
            let two = (from as i32 + 2 * dir) as usize;
            if from / 10 == start_row && pos.board[two] == EMPTY && allowed(targets, two) {
                buf.push(Move::new(from, two, MoveKind::DoublePush, PieceKind::Pawn));
            }
        }
    }

    for side in [-1i32, 1] {
        let dest = (from as i32 + dir + side) as usize;
        let code = pos.board[dest];
        // A capturing pawn moves only one way along its pin ray, so the
        // pin direction must match exactly.
        let pin_ok = pin.is_none_or(|p| p == dir + side);
        if code < 12 && code_color(code) == them {
            if pin_ok && allowed(targets, dest) {
                let promos = if captures_only && targets.is_none() {
                    PromoSet::QueenOnly
                } else {
                    PromoSet::All
                };
                push_pawn_move(buf, from, dest, promo_row, promos);
            }
        } else if pos.en_passant == Some(dest) && pin_ok {
            // Lifting both pawns can expose the king along the rank, so
            // en passant is validated by replaying it on the board.
            let beside = (from as i32 + side) as usize;
            if en_passant_legal(pos, from, beside, dest) {
                buf.push(Move::new(from, dest, MoveKind::EnPassant, PieceKind::Pawn));
            }
        }
    }
}

fn en_passant_legal(pos: &mut Position, from: usize, beside: usize, ep: usize) -> bool {
    let us = pos.side_to_move;
    let own = pos.board[from];
    let captured = pos.board[beside];

    pos.board[from] = EMPTY;
    pos.board[beside] = EMPTY;
    pos.board[ep] = own;
    let attacked = square_attacked(pos, pos.king_square(us), us);
    pos.board[from] = own;
    pos.board[beside] = captured;
    pos.board[ep] = EMPTY;

    !attacked
}

fn knight_moves(
    pos: &Position,
    scan: &RayScan,
    from: usize,
    targets: Option<&Targets>,
    captures_only: bool,
    buf: &mut impl MoveBuffer,
) {
    // A pinned knight can never stay on its pin ray.
    if pin_direction(scan, from).is_some() {
        return;
    }
    let them = pos.side_to_move.opposite();

    for &d in &KNIGHT_JUMPS {
        let dest = (from as i32 + d) as usize;
        let code = pos.board[dest];
        let reachable = if captures_only {
            code < 12 && code_color(code) == them
        } else {
            code == EMPTY || (code < 12 && code_color(code) == them)
        };
        if reachable && allowed(targets, dest) {
            buf.push(Move::new(from, dest, MoveKind::Quiet, PieceKind::Knight));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn slider_moves(
    pos: &Position,
    scan: &RayScan,
    from: usize,
    kind: PieceKind,
    dirs: &[i32],
    targets: Option<&Targets>,
    captures_only: bool,
    buf: &mut impl MoveBuffer,
) {
    let us = pos.side_to_move;
    let pin = pin_direction(scan, from);

    for &d in dirs {
        // A pinned slider keeps only the two directions along its pin.
        if let Some(p) = pin {
            if d != p && d != -p {
                continue;
            }
        }
        let mut cur = from as i32;
        loop {
            cur += d;
            let dest = cur as usize;
            let code = pos.board[dest];
            if code == OFFBOARD {
                break;
            }
            if code == EMPTY {
                if !captures_only && allowed(targets, dest) {
                    buf.push(Move::new(from, dest, MoveKind::Quiet, kind));
                }
                continue;
            }
            if code_color(code) != us && allowed(targets, dest) {
                buf.push(Move::new(from, dest, MoveKind::Quiet, kind));
            }
            break;
        }
    }
}

fn king_moves(
    pos: &mut Position,
    in_check_now: bool,
    from: usize,
    captures_only: bool,
    buf: &mut impl MoveBuffer,
) {
    let us = pos.side_to_move;
    let them = us.opposite();

    for &d in &DIRECTIONS {
        let dest = (from as i32 + d) as usize;
        let code = pos.board[dest];
        let reachable = if captures_only {
            code < 12 && code_color(code) == them
        } else {
            code == EMPTY || (code < 12 && code_color(code) == them)
        };
        if !reachable {
            continue;
        }
        // Clear the destination so a captured checker stops defending it,
        // then ask whether the king would stand attacked there.
        let saved = pos.board[dest];
        pos.board[dest] = EMPTY;
        let attacked = square_attacked(pos, dest, us);
        pos.board[dest] = saved;
        if !attacked {
            buf.push(Move::new(from, dest, MoveKind::Quiet, PieceKind::King));
        }
    }

    if captures_only || in_check_now {
        return;
    }

    let (kingside, queenside) = match us {
        Color::White => (CASTLE_WK, CASTLE_WQ),
        Color::Black => (CASTLE_BK, CASTLE_BQ),
    };

    if pos.has_castling(kingside)
        && pos.board[from + 1] == EMPTY
        && pos.board[from + 2] == EMPTY
        && !square_attacked(pos, from + 1, us)
        && !square_attacked(pos, from + 2, us)
    {
        buf.push(Move::new(from, from + 2, MoveKind::Castle, PieceKind::King));
    }

    if pos.has_castling(queenside)
        && pos.board[from - 1] == EMPTY
        && pos.board[from - 2] == EMPTY
        && pos.board[from - 3] == EMPTY
        && !square_attacked(pos, from - 1, us)
        && !square_attacked(pos, from - 2, us)
    {
        buf.push(Move::new(from, from - 2, MoveKind::Castle, PieceKind::King));
    }
}
