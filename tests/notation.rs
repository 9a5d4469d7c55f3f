//! Algebraic notation and the opening book.

use magic_negamax::board::SanError;
use magic_negamax::{EngineConfig, EngineContext, OpeningBook, Position};

const RUY_LOPEZ: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 5. O-O Be7";

#[test]
fn replays_an_opening_line() {
    let mut pos = Position::new();
    let mut played = Vec::new();
    for token in RUY_LOPEZ.split_whitespace().filter(|t| !t.ends_with('.')) {
        played.push(pos.play_san(token).expect(token));
    }
    assert_eq!(played.len(), 10);
    assert_eq!(
        pos.to_fen(),
        "r1bqk2r/1pppbppp/p1n2n2/4p3/B3P3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 0 1"
    );

    // writing the moves back out gives the same line
    let mut replay = Position::new();
    let mut sans = Vec::new();
    for mv in played {
        sans.push(replay.to_san(mv));
        replay.apply(mv).expect("legal move");
    }
    assert_eq!(sans.join(" "), "e4 e5 Nf3 Nc6 Bb5 a6 Ba4 Nf6 O-O Be7");
    assert_eq!(replay, pos);
}

#[test]
fn captures_and_checks_in_a_short_game() {
    let mut pos = Position::new();
    for san in ["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6"] {
        pos.play_san(san).expect(san);
    }
    let mv = pos.parse_san("Qxf7#").expect("scholar's mate");
    assert_eq!(pos.to_san(mv), "Qxf7#");
    // the suffix is optional on input
    assert_eq!(pos.parse_san("Qxf7"), Ok(mv));
    pos.apply(mv).expect("legal move");
    assert!(pos.is_in_check() && pos.legal_moves().is_empty());
}

#[test]
fn illegal_san_is_reported_with_the_move() {
    let mut pos = Position::new();
    pos.play_san("e4").expect("legal");
    let err = pos.play_san("e4").unwrap_err();
    assert!(matches!(err, SanError::NoMatchingMove { .. }));
    assert!(err.to_string().contains("e4"));
}

#[test]
fn opening_book_follows_context_keys() {
    let ctx = EngineContext::new(EngineConfig::default().zobrist_seed(4242)).expect("context");
    let start = ctx.start_position();
    let book = OpeningBook::from_lines(&start, [RUY_LOPEZ, "1. e4 c5 2. Nf3 d6", "1. d4 Nf6"])
        .expect("valid lines");

    let first = book.candidates(&start);
    assert_eq!(first.len(), 2);

    let mut pos = start.clone();
    pos.play_san("e4").expect("legal");
    let replies: Vec<String> = book.candidates(&pos).iter().map(|&mv| pos.to_san(mv)).collect();
    assert_eq!(replies, vec!["e5".to_string(), "c5".to_string()]);

    pos.play_san("a5").expect("legal");
    assert!(book.candidates(&pos).is_empty());
}
