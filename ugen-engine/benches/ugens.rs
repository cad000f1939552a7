//! Per-block cost of single nodes and of the demo patches.
//!
//! Run with: cargo bench -p ugen-engine
//!
//! One block is 256 samples at 44.1 kHz, a 5.8 ms deadline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ugen_engine::effects::{Delay, Filter};
use ugen_engine::envelope::Env;
use ugen_engine::nodes::{Mul, Noise, Value};
use ugen_engine::oscillators::{Sin, Square};
use ugen_engine::patches::Patch;
use ugen_engine::{silence, Clock, Engine, Processor, BLOCK_LEN};

fn run(c: &mut Criterion, name: &str, build: impl FnOnce(&Clock) -> Box<dyn Processor>) {
    let clock = Clock::new();
    let root = build(&clock);
    let mut engine = Engine::new(clock, root);
    let mut block = silence();
    let mut group = c.benchmark_group("nodes");
    group.throughput(Throughput::Elements(BLOCK_LEN as u64));
    group.bench_function(name, |b| {
        b.iter(|| {
            engine.tick(&mut block);
            black_box(&block);
        });
    });
    group.finish();
}

fn bench_nodes(c: &mut Criterion) {
    run(c, "square", |clock| Box::new(Square::new(Value(0.0), clock.trigger(Value(0.0)))));
    // Moving pitch defeats the frequency cache.
    run(c, "sin_modulated", |clock| {
        let lfo = Mul::new(Sin::new(Value(-0.6), clock.trigger(Value(0.0))), clock.source(Value(0.1)));
        Box::new(Sin::new(lfo, clock.trigger(Value(0.0))))
    });
    run(c, "env", |clock| {
        let pulse = clock.trigger(Square::new(Value(-0.3), clock.trigger(Value(0.0))));
        Box::new(Env::new(Value(0.0), pulse, clock.source(Value(0.001)), clock.source(Value(0.01))))
    });
    run(c, "noise", |_| Box::new(Noise::new()));
    run(c, "filter", |clock| Box::new(Filter::new(Noise::new(), clock.source(Value(-0.2)))));
    run(c, "delay", |clock| Box::new(Delay::new(Noise::new(), clock.source(Value(0.5)))));
}

fn bench_patches(c: &mut Criterion) {
    let mut group = c.benchmark_group("patches");
    group.throughput(Throughput::Elements(BLOCK_LEN as u64));
    for patch in Patch::ALL {
        let clock = Clock::new();
        let root = patch.build(&clock, 4.0);
        let mut engine = Engine::new(clock, root);
        let mut block = silence();
        group.bench_with_input(BenchmarkId::from_parameter(patch.name()), &patch, |b, _| {
            b.iter(|| {
                engine.tick(&mut block);
                black_box(&block);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_nodes, bench_patches);
criterion_main!(benches);
