//! Edge case tests for special positions, promotions and notation.

use crate::board::{Color, FenError, Move, Piece, Position, SanError, Square};

fn sq(name: &str) -> Square {
    name.parse().expect("valid square")
}

#[test]
fn test_stalemate_position() {
    let pos: Position = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
    assert!(!pos.is_in_check());
    assert!(pos.legal_moves().is_empty());
}

#[test]
fn test_checkmate_position() {
    let pos: Position = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1".parse().unwrap();
    assert!(pos.is_in_check());
    assert!(pos.legal_moves().is_empty());
}

#[test]
fn test_every_promotion_piece_is_generated() {
    let pos: Position = "8/P7/8/8/8/8/8/K1k5 w - - 0 1".parse().unwrap();
    let promos: Vec<Piece> = pos
        .legal_moves()
        .iter()
        .filter_map(|m| m.promotion_piece())
        .collect();
    assert_eq!(promos.len(), 4);
    for piece in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
        assert!(promos.contains(&piece), "missing {piece:?}");
    }
}

#[test]
fn test_underpromotion_to_knight() {
    let mut pos: Position = "8/P7/8/8/8/8/8/K1k5 w - - 0 1".parse().unwrap();
    let mv = pos.parse_move("a7a8n").unwrap();
    pos.apply(mv).unwrap();
    assert_eq!(pos.piece_at(sq("a8")), Some((Color::White, Piece::Knight)));
    assert_eq!(pos.material(Color::White), Piece::Knight.value());
}

#[test]
fn test_promotion_moves_differ_by_piece() {
    let pos: Position = "8/P7/8/8/8/8/8/K1k5 w - - 0 1".parse().unwrap();
    let queen = pos.parse_move("a7a8q").unwrap();
    let rook = pos.parse_move("a7a8r").unwrap();
    assert_ne!(queen, rook);
    assert_eq!(queen.from(), rook.from());
    assert_eq!(queen.to(), rook.to());
}

#[test]
fn test_black_promotion() {
    let mut pos: Position = "k7/8/8/8/8/8/6p1/K7 b - - 0 1".parse().unwrap();
    let mv = pos.parse_san("g1=Q").unwrap();
    assert_eq!(mv.promotion_piece(), Some(Piece::Queen));
    pos.apply(mv).unwrap();
    assert_eq!(pos.piece_at(sq("g1")), Some((Color::Black, Piece::Queen)));
    assert!(pos.is_in_check());
}

#[test]
fn test_pawn_blocked_on_start_rank() {
    let pos: Position = "4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1".parse().unwrap();
    assert!(pos.legal_moves().iter().all(|m| m.piece() != Piece::Pawn));
}

#[test]
fn test_double_push_needs_both_squares_empty() {
    let pos: Position = "4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1".parse().unwrap();
    let pawn: Vec<String> = pos
        .legal_moves()
        .iter()
        .filter(|m| m.piece() == Piece::Pawn)
        .map(|m| m.to_string())
        .collect();
    assert_eq!(pawn, vec!["e2e3".to_string()]);
}

#[test]
fn test_en_passant_field_is_ignored() {
    let pos: Position = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3"
        .parse()
        .unwrap();
    assert!(pos.legal_moves().iter().all(|m| m.to() != sq("f6")));
}

// ============================================================================
// Notation
// ============================================================================

#[test]
fn test_san_round_trip_on_every_legal_move() {
    for fen in [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1",
    ] {
        let pos: Position = fen.parse().unwrap();
        for mv in pos.legal_moves() {
            let san = pos.to_san(mv);
            assert_eq!(pos.parse_san(&san), Ok(mv), "{fen}: {san}");
        }
    }
}

#[test]
fn test_san_marks_check_and_mate() {
    let pos: Position = "6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1".parse().unwrap();
    let mate = pos.parse_move("e1e8").unwrap();
    assert_eq!(pos.to_san(mate), "Qe8#");
    let quiet = pos.parse_move("e1e6").unwrap();
    assert_eq!(pos.to_san(quiet), "Qe6");

    let pos: Position = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
    let check = pos.parse_move("a1a8").unwrap();
    assert_eq!(pos.to_san(check), "Ra8+");
    assert_eq!(pos.parse_san("Ra8+"), Ok(check));
}

#[test]
fn test_san_rank_disambiguation() {
    // rooks on a1 and a5 can both reach a3
    let pos: Position = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1".parse().unwrap();
    let mv = pos.parse_san("R1a3").unwrap();
    assert_eq!(mv.from(), Square::A1);
    assert_eq!(pos.to_san(mv), "R1a3");
    assert!(matches!(pos.parse_san("Ra3"), Err(SanError::AmbiguousMove { .. })));
}

#[test]
fn test_san_rejects_garbage() {
    let pos = Position::new();
    assert_eq!(pos.parse_san(""), Err(SanError::Empty));
    assert!(matches!(pos.parse_san("e5"), Err(SanError::NoMatchingMove { .. })));
    assert!(matches!(pos.parse_san("Zf3"), Err(SanError::InvalidPiece { .. })));
    assert!(matches!(pos.parse_san("O-O"), Err(SanError::NoMatchingMove { .. })));
}

#[test]
fn test_coordinate_notation_errors() {
    let pos = Position::new();
    assert!(pos.parse_move("e2").is_err());
    assert!(pos.parse_move("e2e5").is_err());
    assert!(pos.parse_move("z2e4").is_err());
    assert!(pos.parse_move("e2e4x").is_err());
    let castle: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    let mv: Move = castle.parse_move("e1g1").unwrap();
    assert!(mv.castle_side().is_some());
}

#[test]
fn test_fen_errors() {
    assert!(matches!(
        "8/8/8/8/8/8/8/8".parse::<Position>(),
        Err(FenError::TooFewParts { found: 1 })
    ));
    assert!(matches!(
        "8/8/8/8/8/8/8 w - - 0 1".parse::<Position>(),
        Err(FenError::WrongRankCount { found: 7 })
    ));
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4K3 x - - 0 1".parse::<Position>(),
        Err(FenError::InvalidSideToMove { .. })
    ));
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4KK2 w - - 0 1".parse::<Position>(),
        Err(FenError::KingCount { color: Color::White, found: 2 })
    ));
    assert!(matches!(
        "4k3/8/8/8/8/8/8/4K2Z w - - 0 1".parse::<Position>(),
        Err(FenError::InvalidPiece { char: 'Z' })
    ));
}
