//! Perft: exhaustive legal-move-tree leaf counts for validating the
//! generator and make/unmake against known-good numbers.

use tracing::debug;

use crate::board::Position;
use crate::moves::execute::{make_move, unmake_move};
use crate::moves::movegen::generate_legal;
use crate::moves::types::{Move, MoveList};

pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mv in moves.iter() {
        make_move(pos, mv);
        nodes += perft(pos, depth - 1);
        unmake_move(pos);
    }
    nodes
}

/// Per-root-move subtotals, for bisecting a perft mismatch.
pub fn perft_divide(pos: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);

    let mut results = Vec::with_capacity(moves.len());
    for &mv in moves.iter() {
        make_move(pos, mv);
        let nodes = if depth <= 1 { 1 } else { perft(pos, depth - 1) };
        unmake_move(pos);
        debug!(target: "perft", mv = %mv, nodes, "divide");
        results.push((mv, nodes));
    }
    results
}
