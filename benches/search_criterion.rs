use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use damson_chess::board::board::Board;
use damson_chess::search::negamax::{negamax, SCORE_BOUND};
use damson_chess::search::parallel::negamax_parallel;

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";

fn search_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for depth in [2u32, 3] {
        group.bench_with_input(
            BenchmarkId::new("negamax", depth),
            &depth,
            |bencher, &depth| {
                let mut board = Board::from_fen(KIWIPETE_FEN).expect("bench FEN should parse");
                bencher.iter(|| {
                    negamax(
                        &mut board,
                        black_box(depth),
                        depth,
                        -SCORE_BOUND,
                        SCORE_BOUND,
                    )
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("negamax_parallel", depth),
            &depth,
            |bencher, &depth| {
                let mut board = Board::from_fen(KIWIPETE_FEN).expect("bench FEN should parse");
                bencher.iter(|| {
                    negamax_parallel(&mut board, black_box(depth), -SCORE_BOUND, SCORE_BOUND)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, search_benches);
criterion_main!(benches);
