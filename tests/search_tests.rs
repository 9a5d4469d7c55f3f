//! Whole-engine search behaviour through the public API.

use std::sync::atomic::AtomicBool;

use magic_negamax::{
    EngineConfig, EngineContext, MaterialEvaluator, NullMove, Player, Position, SearchParams,
    SearchPlayer, MATE_THRESHOLD,
};

fn context() -> EngineContext {
    EngineContext::new(EngineConfig::default().tt_capacity(1 << 18)).expect("context")
}

fn player(depth: u32, null_move: NullMove) -> SearchPlayer<MaterialEvaluator> {
    SearchPlayer::new(context(), MaterialEvaluator, SearchParams::fixed_depth(depth, null_move))
}

fn is_mate(pos: &Position) -> bool {
    pos.is_in_check() && pos.legal_moves().is_empty()
}

#[test]
fn forced_mate_in_two_is_found_and_delivered() {
    // 1. Kb6 Kb8 2. Rh8#
    let fen = "k7/8/2K5/8/8/8/8/7R w - - 0 1";
    let mut ctx = context();
    let mut pos = ctx.position_from_fen(fen).expect("valid fen");
    let stop = AtomicBool::new(false);
    let outcome = ctx
        .search(&mut pos, &MaterialEvaluator, &SearchParams::fixed_depth(4, NullMove::Disabled), &stop)
        .expect("search");
    let report = outcome.report().expect("white has moves");
    assert!(report.score >= MATE_THRESHOLD, "expected a mate score, got {}", report.score);

    let mut white = player(4, NullMove::Disabled);
    let mut black = player(2, NullMove::Disabled);
    let mut plies = 0;
    while !is_mate(&pos) {
        assert!(plies < 3, "mate not delivered in two moves");
        let mover: &mut dyn Player = if plies % 2 == 0 { &mut white } else { &mut black };
        let mv = mover.next_move(&pos).expect("side to move is not mated");
        assert!(pos.is_legal(mv), "{mv} is illegal in {}", pos.to_fen());
        pos.apply(mv).expect("legal move");
        plies += 1;
    }
    assert_eq!(plies, 3);
    assert!(pos.legal_moves().is_empty());
    assert_eq!(black.next_move(&pos), None);
}

#[test]
fn pawn_zugzwang_skips_null_move_and_agrees() {
    // passing would be a blunder here; with only kings and pawns the null
    // move never runs, so both policies walk the same tree
    for fen in [
        "4k3/8/4K3/4P3/8/8/8/8 w - - 0 1",
        "8/8/1p6/1P1k4/3p4/3K4/8/8 b - - 0 1",
    ] {
        let mut ctx = context();
        let stop = AtomicBool::new(false);
        let mut results = Vec::new();
        for null_move in [NullMove::Enabled, NullMove::Disabled] {
            ctx.tt_mut().clear();
            let mut pos = ctx.position_from_fen(fen).expect("valid fen");
            let outcome = ctx
                .search(&mut pos, &MaterialEvaluator, &SearchParams::fixed_depth(6, null_move), &stop)
                .expect("search");
            let report = outcome.report().expect("side to move has moves");
            results.push((report.best_move, report.score, report.stats));
        }
        assert_eq!(results[0], results[1], "{fen}");
    }
}

#[test]
fn self_play_only_makes_legal_moves() {
    let mut white = player(2, NullMove::Enabled);
    let mut black = player(2, NullMove::Disabled);
    let mut pos = Position::new();
    for ply in 0..12 {
        let mover: &mut dyn Player = if ply % 2 == 0 { &mut white } else { &mut black };
        let Some(mv) = mover.next_move(&pos) else {
            assert!(pos.legal_moves().is_empty());
            break;
        };
        assert!(pos.is_legal(mv), "ply {ply}: {mv} is illegal in {}", pos.to_fen());
        pos.apply(mv).expect("legal move");
        assert_eq!(pos.hash(), pos.compute_hash());
    }
}

#[test]
fn reused_context_keeps_table_between_moves() {
    let mut ctx = context();
    let mut pos = ctx.start_position();
    let stop = AtomicBool::new(false);
    let params = SearchParams::fixed_depth(3, NullMove::Disabled);

    let first = ctx
        .search(&mut pos, &MaterialEvaluator, &params, &stop)
        .expect("search")
        .best_move()
        .expect("legal move");
    let stored = ctx.tt().len();
    assert!(stored > 0);

    pos.apply(first).expect("legal move");
    let reply = ctx
        .search(&mut pos, &MaterialEvaluator, &params, &stop)
        .expect("search")
        .best_move()
        .expect("legal move");
    assert!(pos.is_legal(reply));
    assert!(ctx.tt().len() >= stored);
}
