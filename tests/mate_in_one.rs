use std::sync::atomic::AtomicBool;

use serde::Deserialize;

use magic_negamax::{EngineConfig, EngineContext, MaterialEvaluator, NullMove, SearchParams, MATE_THRESHOLD};

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    name: String,
    fen: String,
    solution: String,
}

#[test]
fn mate_in_one_suite() {
    let data = include_str!("data/mate_in_one.json");
    let set: ProblemSet = serde_json::from_str(data).expect("invalid mate_in_one.json");
    let mut ctx = EngineContext::new(EngineConfig::default().tt_capacity(1 << 16)).expect("context");
    let stop = AtomicBool::new(false);

    for problem in &set.problems {
        let mut pos = ctx.position_from_fen(&problem.fen).expect("valid fen");

        // the listed solution really mates
        let mut solved = pos.clone();
        solved.play_san(&problem.solution).expect("solution parses");
        assert!(
            solved.is_in_check() && solved.legal_moves().is_empty(),
            "{}: {} is not mate",
            problem.name,
            problem.solution
        );

        for null_move in [NullMove::Disabled, NullMove::Enabled] {
            let params = SearchParams::fixed_depth(3, null_move);
            let outcome = ctx
                .search(&mut pos, &MaterialEvaluator, &params, &stop)
                .expect("search");
            let report = outcome.report().expect("side to move has moves");
            assert!(
                report.score >= MATE_THRESHOLD,
                "{}: expected a mate score, got {}",
                problem.name,
                report.score
            );

            let mut after = pos.clone();
            after.apply(report.best_move).expect("legal move");
            assert!(
                after.is_in_check() && after.legal_moves().is_empty(),
                "{}: {} does not mate",
                problem.name,
                pos.to_san(report.best_move)
            );
        }
    }
}
