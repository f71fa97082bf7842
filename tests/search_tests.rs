use std::time::Duration;

use courier::board::{PieceKind, Position};
use courier::moves::execute::make_move;
use courier::moves::movegen::generate_legal;
use courier::moves::types::MoveList;
use courier::search::search::{Score, SearchLimits, Searcher, MATE_SCORE};
use courier::status::{position_status, GameStatus};

#[test]
fn finds_the_back_rank_mate_in_one() {
    let mut pos: Position = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1".parse().unwrap();
    let mut searcher = Searcher::new();

    let mut last_score = None;
    let result = searcher.search_with(
        &mut pos,
        &SearchLimits::fixed_depth(2),
        |info| last_score = Some(info.score),
    );

    assert!(result.score > MATE_SCORE, "score {} is no mate", result.score);
    assert_eq!(last_score, Some(Score::MateIn(1)));

    let best = result.best_move.expect("a mate must produce a move");
    assert_eq!(best.piece, PieceKind::Rook);
    assert_eq!(best.to as usize / 10, 2, "the rook must land on the 8th rank");
}

#[test]
fn refuses_the_stalemating_queen_move() {
    let mut pos: Position = "7k/5Q2/6K1/8/8/8/8/8 w - - 0 1".parse().unwrap();
    let mut searcher = Searcher::new();

    let result = searcher.search(&mut pos, &SearchLimits::fixed_depth(3));
    assert!(
        result.score > MATE_SCORE,
        "with queen and king the score must be a forced mate, got {}",
        result.score
    );

    let best = result.best_move.expect("a move must come back");
    make_move(&mut pos, best);
    assert_ne!(
        position_status(&mut pos),
        GameStatus::Stalemate,
        "{} stalemates",
        best.to_uci()
    );
}

#[test]
fn quiescence_takes_the_hanging_queen() {
    let mut pos: Position = "r3k2r/8/8/3q4/3Q4/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    let mut searcher = Searcher::new();

    let result = searcher.search(&mut pos, &SearchLimits::fixed_depth(1));
    let best = result.best_move.expect("a move must come back");
    assert_eq!(
        best.to_uci(),
        "d4d5",
        "the queen capture must head the PV, got {} (score {})",
        best.to_uci(),
        result.score
    );
    assert!(result.score > 0);
}

#[test]
fn zugzwang_position_still_yields_a_legal_move() {
    // Every white move worsens the position; null-move pruning must not
    // talk the search out of returning one.
    let mut pos: Position = "7k/8/8/8/8/8/p7/K7 w - - 0 1".parse().unwrap();
    let mut searcher = Searcher::new();

    let result = searcher.search(&mut pos, &SearchLimits::fixed_depth(6));
    let best = result.best_move.expect("search must return a move");

    let mut legal = MoveList::new();
    generate_legal(&mut pos, &mut legal);
    assert!(
        legal.iter().any(|&mv| mv == best),
        "{} is not legal",
        best.to_uci()
    );
}

#[test]
fn iterative_deepening_reports_every_depth() {
    let mut pos = Position::new();
    let mut searcher = Searcher::new();

    let mut depths = Vec::new();
    let mut nodes = Vec::new();
    let result = searcher.search_with(&mut pos, &SearchLimits::fixed_depth(4), |info| {
        depths.push(info.depth);
        nodes.push(info.nodes);
        assert!(!info.pv.is_empty(), "depth {} reported an empty PV", info.depth);
    });

    assert_eq!(depths, vec![1, 2, 3, 4]);
    assert!(nodes.windows(2).all(|w| w[0] < w[1]), "node counts must grow");
    assert!(result.best_move.is_some());
}

#[test]
fn pv_starts_with_the_best_move() {
    let mut pos = Position::new();
    let mut searcher = Searcher::new();

    let mut last_pv = Vec::new();
    let result = searcher.search_with(&mut pos, &SearchLimits::fixed_depth(4), |info| {
        last_pv = info.pv.clone();
    });

    assert_eq!(result.best_move, last_pv.first().copied());
}

#[test]
fn movetime_is_respected() {
    let mut pos = Position::new();
    let mut searcher = Searcher::new();

    let limits = SearchLimits::fixed_time(Duration::from_millis(80));
    let result = searcher.search(&mut pos, &limits);

    assert!(result.best_move.is_some(), "a budget search still answers");
    assert!(
        result.elapsed < Duration::from_secs(5),
        "took {:?} on an 80ms budget",
        result.elapsed
    );
}

#[test]
fn search_leaves_the_position_untouched() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut pos: Position = fen.parse().unwrap();
    let before = pos.clone();

    let mut searcher = Searcher::new();
    let _ = searcher.search(&mut pos, &SearchLimits::fixed_depth(3));

    assert_eq!(pos, before);
}

#[test]
fn mated_side_reports_negative_mate_distance() {
    // Black to move with only one legal reply, after which the rook
    // ladder mates. From black's perspective the score is a negative
    // mate distance.
    let mut pos: Position = "7k/1R6/8/8/8/8/8/R5K1 b - - 0 1".parse().unwrap();
    let mut searcher = Searcher::new();

    let mut last_score = None;
    let _ = searcher.search_with(&mut pos, &SearchLimits::fixed_depth(4), |info| {
        last_score = Some(info.score)
    });

    match last_score {
        Some(Score::MateIn(n)) => assert!(n < 0, "expected to be getting mated, got {n}"),
        other => panic!("expected a mate score, got {other:?}"),
    }
}
