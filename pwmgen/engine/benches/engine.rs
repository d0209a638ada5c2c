use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hal::mock::MockTimer;
use pwmgen_core::command::parse;
use pwmgen_core::config::{RESET_COMPARE, RESET_PERIOD, TIMER_CLOCK_HZ};
use pwmgen_engine::{EngineConfig, TimerEngine, UpdatePolicy};

fn engine(policy: UpdatePolicy) -> TimerEngine<MockTimer> {
    TimerEngine::with_config(
        MockTimer::new(TIMER_CLOCK_HZ, RESET_PERIOD, RESET_COMPARE),
        EngineConfig::default().policy(policy),
    )
}

fn bench_set_frequency(c: &mut Criterion) {
    let mut masked = engine(UpdatePolicy::Masked);
    c.bench_function("set_frequency_masked", |b| {
        b.iter(|| {
            masked.timer_mut().clear_writes();
            masked.set_frequency(black_box(2000)).unwrap()
        })
    });

    let mut torn = engine(UpdatePolicy::Torn);
    c.bench_function("set_frequency_torn", |b| {
        b.iter(|| {
            torn.timer_mut().clear_writes();
            torn.set_frequency(black_box(2000)).unwrap()
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_freq_line", |b| {
        b.iter(|| parse(black_box(b"FREQ=40436\0")))
    });
}

criterion_group!(benches, bench_set_frequency, bench_parse);
criterion_main!(benches);
