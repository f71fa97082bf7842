use courier::board::{Color, FenError, PieceKind, Position, STARTING_FEN};

#[test]
fn catalogue_round_trips() {
    for fen in [
        STARTING_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
        "4k3/8/8/8/8/8/8/4K2R w K - 99 80",
    ] {
        let pos: Position = fen.parse().unwrap_or_else(|e| panic!("{fen}: {e}"));
        assert_eq!(pos.to_fen(), fen);
    }
}

#[test]
fn missing_counters_default_to_zero_and_one() {
    let pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6".parse().unwrap();
    assert_eq!(pos.halfmove_clock, 0);
    assert_eq!(pos.fullmove_number, 1);
    assert_eq!(pos.to_fen(), "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
}

#[test]
fn parses_state_fields() {
    let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 3 11".parse().unwrap();
    assert_eq!(pos.side_to_move, Color::Black);
    assert!(pos.has_castling(1)); // white kingside
    assert!(!pos.has_castling(2));
    assert!(!pos.has_castling(4));
    assert!(pos.has_castling(8)); // black queenside
    assert_eq!(pos.halfmove_clock, 3);
    assert_eq!(pos.fullmove_number, 11);
    assert_eq!(pos.piece_count(Color::White, PieceKind::Rook), 2);
}

#[test]
fn rejects_king_count_violations() {
    assert!(matches!(
        "8/8/8/8/8/8/8/8 w - - 0 1".parse::<Position>(),
        Err(FenError::WrongKingCount)
    ));
    assert!(matches!(
        "4k3/8/8/8/8/8/8/K3K3 w - - 0 1".parse::<Position>(),
        Err(FenError::WrongKingCount)
    ));
    assert!(matches!(
        "8/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>(),
        Err(FenError::WrongKingCount)
    ));
}

#[test]
fn rejects_malformed_fields() {
    // Nine squares on a rank.
    assert!(matches!(
        "ppppppppp/8/8/4k3/8/8/8/4K3 w - - 0 1".parse::<Position>(),
        Err(FenError::BadRankLength { .. })
    ));
    // Seven ranks.
    assert!(matches!(
        "8/8/4k3/8/8/8/4K3 w - - 0 1".parse::<Position>(),
        Err(FenError::WrongRankCount { found: 7 })
    ));
    // Unknown piece letter.
    assert!(matches!(
        "4x3/8/8/4k3/8/8/8/4K3 w - - 0 1".parse::<Position>(),
        Err(FenError::InvalidPieceChar('x'))
    ));
    // Bad side to move.
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4K3 x - - 0 1".parse::<Position>(),
        Err(FenError::InvalidColor(_))
    ));
    // Bad castling letter.
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4K3 w KX - 0 1".parse::<Position>(),
        Err(FenError::InvalidCastling(_))
    ));
    // En passant off ranks 3/6.
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4K3 w - e4 0 1".parse::<Position>(),
        Err(FenError::InvalidEnPassant(_))
    ));
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4K3 w - i6 0 1".parse::<Position>(),
        Err(FenError::InvalidEnPassant(_))
    ));
    // Non-numeric counter.
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4K3 w - - x 1".parse::<Position>(),
        Err(FenError::InvalidCounter(_))
    ));
    // Too few fields.
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4K3 w -".parse::<Position>(),
        Err(FenError::WrongFieldCount { found: 3 })
    ));
}

#[test]
fn derived_state_is_initialised_from_the_fen() {
    let pos: Position = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
        .parse()
        .unwrap();
    assert_eq!(pos.zobrist, pos.compute_zobrist_full());
    assert_eq!(pos.accumulators(), pos.compute_accumulators());
    assert_eq!(pos.phase(), pos.compute_phase());
    assert_eq!(pos.piece_at(pos.king_square(Color::White)), Some((Color::White, PieceKind::King)));
    assert_eq!(pos.piece_at(pos.king_square(Color::Black)), Some((Color::Black, PieceKind::King)));
}

#[test]
fn display_matches_to_fen() {
    let pos = Position::new();
    assert_eq!(format!("{pos}"), pos.to_fen());
}
