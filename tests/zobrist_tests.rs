use courier::board::Position;
use courier::moves::execute::{make_move, unmake_move};
use courier::moves::movegen::generate_legal;
use courier::moves::types::MoveList;

fn play(pos: &mut Position, uci: &str) {
    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);
    let mv = moves
        .iter()
        .copied()
        .find(|mv| mv.to_uci() == uci)
        .unwrap_or_else(|| panic!("{uci} is not legal in {}", pos.to_fen()));
    make_move(pos, mv);
    assert_eq!(
        pos.zobrist,
        pos.compute_zobrist_full(),
        "incremental key drifted after {uci}"
    );
}

#[test]
fn keys_are_identical_across_instances() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let a: Position = fen.parse().unwrap();
    let b: Position = fen.parse().unwrap();
    assert_eq!(a.zobrist, b.zobrist);
    assert_ne!(a.zobrist, 0);
}

#[test]
fn every_state_component_feeds_the_key() {
    let base: Position = "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1".parse().unwrap();
    let other_side: Position = "4k3/8/8/8/8/8/8/R3K3 b Q - 0 1".parse().unwrap();
    let no_rights: Position = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
    let moved_rook: Position = "4k3/8/8/8/8/8/8/1R2K3 w - - 0 1".parse().unwrap();

    assert_ne!(base.zobrist, other_side.zobrist);
    assert_ne!(base.zobrist, no_rights.zobrist);
    assert_ne!(no_rights.zobrist, moved_rook.zobrist);

    let ep: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
    let no_ep: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1".parse().unwrap();
    assert_ne!(ep.zobrist, no_ep.zobrist);
}

#[test]
fn incremental_key_tracks_special_moves() {
    // Castles both ways, an en-passant capture and a capture sequence.
    let mut pos: Position =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
    for uci in ["e1g1", "e8c8", "d5e6", "f7e6", "f3h3", "h8h4"] {
        play(&mut pos, uci);
    }

    // Promotion with capture.
    let mut pos: Position = "1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
    play(&mut pos, "a7b8q");

    // En passant for black.
    let mut pos: Position = "4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1".parse().unwrap();
    play(&mut pos, "e4d3");
}

#[test]
fn unmake_restores_the_key_exactly() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut pos: Position = fen.parse().unwrap();
    let original = pos.zobrist;

    let mut moves = MoveList::new();
    generate_legal(&mut pos, &mut moves);
    for &mv in moves.iter() {
        make_move(&mut pos, mv);
        unmake_move(&mut pos);
        assert_eq!(pos.zobrist, original, "key not restored after {mv}");
    }
}

#[test]
fn transpositions_share_a_key() {
    let mut a = Position::new();
    for uci in ["g1f3", "d7d6", "b1c3"] {
        play(&mut a, uci);
    }

    let mut b = Position::new();
    for uci in ["b1c3", "d7d6", "g1f3"] {
        play(&mut b, uci);
    }

    assert_eq!(a.zobrist, b.zobrist);
}
