//! Flow-tick throughput. The tick walks five caves, samples the series,
//! and writes both JSON maps, so this mostly measures the persist path.

use criterion::{criterion_group, criterion_main, Criterion};
use footfall_core::prelude::*;
use footfall_logic::clock::Moment;

fn bench_tick(c: &mut Criterion) {
    let mut engine = Engine::new(Box::new(MemoryStore::new()), Moment::new(14, 0));
    c.bench_function("engine_tick", |b| {
        b.iter(|| engine.tick(Moment::new(14, 30)));
    });

    let mut engine = Engine::new(Box::new(MemoryStore::new()), Moment::new(14, 0));
    c.bench_function("engine_advance_frame", |b| {
        b.iter(|| engine.advance(1.0 / 60.0, Moment::new(14, 30)));
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
