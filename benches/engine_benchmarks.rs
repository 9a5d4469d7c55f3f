//! Benchmarks for chess engine performance.

use std::sync::atomic::AtomicBool;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use magic_negamax::board::Position;
use magic_negamax::{search, Evaluator, MaterialEvaluator, NullMove, SearchParams, TranspositionTable};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn parse(fen: &str) -> Position {
    fen.parse().expect("valid benchmark FEN")
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| startpos.perft(black_box(depth)))
        });
    }

    let mut kiwipete = parse(KIWIPETE);
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    for (name, fen) in [("middlegame", MIDDLEGAME), ("kiwipete", KIWIPETE)] {
        let pos = parse(fen);
        group.bench_with_input(BenchmarkId::new("legal", name), &pos, |b, pos| {
            b.iter(|| black_box(pos.legal_moves()))
        });
        group.bench_with_input(BenchmarkId::new("captures", name), &pos, |b, pos| {
            b.iter(|| black_box(pos.captures()))
        });
        group.bench_with_input(BenchmarkId::new("checks", name), &pos, |b, pos| {
            b.iter(|| black_box(pos.checks()))
        });
    }

    group.finish();
}

fn bench_see(c: &mut Criterion) {
    let pos = parse(KIWIPETE);
    let captures = pos.captures();
    c.bench_function("see/kiwipete_captures", |b| {
        b.iter(|| captures.iter().map(|&mv| pos.see(black_box(mv))).sum::<i32>())
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let stop = AtomicBool::new(false);
    for null_move in [NullMove::Disabled, NullMove::Enabled] {
        let params = SearchParams::fixed_depth(4, null_move);
        group.bench_with_input(
            BenchmarkId::new("middlegame_d4", format!("{null_move:?}")),
            &params,
            |b, params| {
                b.iter(|| {
                    let mut pos = parse(MIDDLEGAME);
                    let mut tt = TranspositionTable::new(1 << 20, 2);
                    search(&mut pos, &mut tt, &MaterialEvaluator, params, &stop)
                })
            },
        );
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let pos = parse(MIDDLEGAME);
    c.bench_function("eval/material", |b| {
        b.iter(|| black_box(MaterialEvaluator.evaluate(black_box(&pos))))
    });
}

criterion_group!(
    benches,
    bench_perft,
    bench_movegen,
    bench_see,
    bench_search,
    bench_eval
);
criterion_main!(benches);
