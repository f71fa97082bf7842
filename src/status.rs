//! Game status for drivers.
//!
//! The search itself never signals "no move"; a driver that receives an
//! empty legal move list asks here whether that means checkmate or
//! stalemate, and whether a draw is claimable first.

use crate::board::Position;
use crate::moves::movegen::{generate_legal, in_check};
use crate::moves::types::MoveList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InPlay,
    DrawThreefold,
    DrawFiftyMove,
    Stalemate,
    Checkmate,
}

pub fn is_draw_by_fifty_move(pos: &Position) -> bool {
    pos.halfmove_clock >= 100
}

/// Claimable threefold: the current key occurs three or more times in
/// the game history.
pub fn is_draw_by_threefold(pos: &Position) -> bool {
    let current = pos.zobrist;
    pos.repetition.iter().filter(|e| e.key == current).count() >= 3
}

/// Determine the game status for the current position, claimable draws
/// first, then move-based outcomes.
pub fn position_status(pos: &mut Position) -> GameStatus {
    if is_draw_by_threefold(pos) {
        return GameStatus::DrawThreefold;
    }
    if is_draw_by_fifty_move(pos) {
        return GameStatus::DrawFiftyMove;
    }

    let mut legal = MoveList::new();
    generate_legal(pos, &mut legal);
    if legal.is_empty() {
        if in_check(pos, pos.side_to_move) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else {
        GameStatus::InPlay
    }
}
