use criterion::{criterion_group, criterion_main, Criterion};

use courier::board::Position;
use courier::moves::perft::perft;

fn perft_startpos(c: &mut Criterion) {
    let mut pos = Position::new();
    c.bench_function("perft startpos depth 3", |b| {
        b.iter(|| perft(&mut pos, 3));
    });
}

fn perft_kiwipete(c: &mut Criterion) {
    let mut pos: Position =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
    c.bench_function("perft kiwipete depth 3", |b| {
        b.iter(|| perft(&mut pos, 3));
    });
}

criterion_group!(benches, perft_startpos, perft_kiwipete);
criterion_main!(benches);
