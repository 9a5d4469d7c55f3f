//! Move generation: check evasion, pins, castling legality and the
//! captures/checks generation modes.

use std::collections::BTreeSet;

use crate::board::{CastleSide, Color, Move, Piece, Position, Square};

fn coords(moves: impl IntoIterator<Item = Move>) -> BTreeSet<String> {
    moves.into_iter().map(|m| m.to_string()).collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_single_check_exact_evasions() {
    // rook e8 checks the king on e1; the knight can only block
    let pos: Position = "4r2k/8/8/8/8/2N5/8/4K3 w - - 0 1".parse().unwrap();
    assert!(pos.is_in_check());
    assert_eq!(pos.checkers().popcount(), 1);
    assert_eq!(
        coords(pos.legal_moves()),
        set(&["e1d1", "e1d2", "e1f1", "e1f2", "c3e2", "c3e4"])
    );
}

#[test]
fn test_check_evasion_by_capture() {
    // knight f3 gives check and can be taken by the pawn or the queen
    let pos: Position = "4k3/8/8/8/8/5n2/6P1/3QK3 w - - 0 1".parse().unwrap();
    let moves = coords(pos.legal_moves());
    assert!(moves.contains("g2f3"));
    assert!(moves.contains("d1f3"));
    assert!(!moves.contains("d1d4"));
    assert!(!moves.contains("g2g4"));
    assert!(pos.legal_moves().iter().all(|m| {
        let mut next = pos.clone();
        next.apply(*m).unwrap();
        !next.in_check(Color::White)
    }));
}

#[test]
fn test_pinned_knight_cannot_move() {
    let pos: Position = "4k3/8/8/8/1b6/8/3N4/4K3 w - - 0 1".parse().unwrap();
    assert!(pos.legal_moves().iter().all(|m| m.piece() != Piece::Knight));
}

#[test]
fn test_pinned_rook_slides_along_pin() {
    // rook e4 pinned on the e-file by the rook on e8
    let pos: Position = "4r1k1/8/8/8/4R3/8/8/4K3 w - - 0 1".parse().unwrap();
    let rook_moves: BTreeSet<String> = pos
        .legal_moves()
        .iter()
        .filter(|m| m.piece() == Piece::Rook)
        .map(|m| m.to_string())
        .collect();
    assert_eq!(
        rook_moves,
        set(&["e4e2", "e4e3", "e4e5", "e4e6", "e4e7", "e4e8"])
    );
}

#[test]
fn test_king_cannot_step_along_checking_ray() {
    // d1 stays on the queen's diagonal once the king leaves e2
    let pos: Position = "7k/8/8/7q/8/8/4K3/8 w - - 0 1".parse().unwrap();
    assert!(pos.is_in_check());
    let moves = coords(pos.legal_moves());
    assert!(!moves.contains("e2d1"));
    assert!(!moves.contains("e2f3"));
    assert!(moves.contains("e2e3"));
}

#[test]
fn test_castling_both_sides_available() {
    let pos: Position = "r3k2r/7b/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    let moves = pos.legal_moves();
    assert!(moves.contains(&Move::castle(Color::White, CastleSide::Short)));
    // b1 is attacked, but the king never crosses it
    assert!(moves.contains(&Move::castle(Color::White, CastleSide::Long)));
}

#[test]
fn test_no_castling_through_attacked_square() {
    let pos: Position = "r3k2r/8/b7/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    let moves = pos.legal_moves();
    assert!(!moves.contains(&Move::castle(Color::White, CastleSide::Short)));
    assert!(moves.contains(&Move::castle(Color::White, CastleSide::Long)));
}

#[test]
fn test_no_castling_out_of_check() {
    let pos: Position = "r3k2r/8/8/4r3/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    assert!(pos.is_in_check());
    assert!(pos.legal_moves().iter().all(|m| m.castle_side().is_none()));
}

#[test]
fn test_no_castling_when_blocked_or_moved() {
    let blocked: Position = "r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1".parse().unwrap();
    let moves = blocked.legal_moves();
    assert!(!moves.contains(&Move::castle(Color::White, CastleSide::Long)));
    assert!(moves.contains(&Move::castle(Color::White, CastleSide::Short)));

    let mut moved: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    moved.set_unmoved(Square::H1, false);
    let moves = moved.legal_moves();
    assert!(!moves.contains(&Move::castle(Color::White, CastleSide::Short)));
    assert!(moves.contains(&Move::castle(Color::White, CastleSide::Long)));
}

#[test]
fn test_black_castles_mirror_white() {
    let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1".parse().unwrap();
    let moves = pos.legal_moves();
    assert!(moves.contains(&Move::castle(Color::Black, CastleSide::Short)));
    assert!(moves.contains(&Move::castle(Color::Black, CastleSide::Long)));
    assert_eq!(moves.len(), 26);
}

#[test]
fn test_captures_mode_is_captures_and_promotions() {
    for fen in [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    ] {
        let pos: Position = fen.parse().unwrap();
        let expected = coords(
            pos.legal_moves()
                .iter()
                .copied()
                .filter(|m| m.is_capture() || m.is_promotion()),
        );
        assert_eq!(coords(pos.captures()), expected, "{fen}");
    }
}

#[test]
fn test_checks_mode_only_yields_checking_moves() {
    for fen in [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        "4k3/1P6/8/8/8/8/8/R3K1N1 w - - 0 1",
    ] {
        let pos: Position = fen.parse().unwrap();
        let legal = pos.legal_moves();
        for mv in pos.checks().iter() {
            assert!(legal.contains(mv), "{fen}: {mv} not legal");
            assert!(pos.gives_check(*mv), "{fen}: {mv} does not check");
            assert_ne!(mv.piece(), Piece::King);
        }
    }
}

#[test]
fn test_checks_mode_includes_checking_promotions() {
    // b8=Q and b8=R both check along the back rank
    let pos: Position = "4k3/1P6/8/8/8/8/8/6K1 w - - 0 1".parse().unwrap();
    let checks = coords(pos.checks());
    assert_eq!(checks, set(&["b7b8q", "b7b8r"]));
}
