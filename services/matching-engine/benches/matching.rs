use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matching_engine::{Engine, EngineConfig, OrderRequest};
use types::order::{OrderType, Side};

fn limit(account: u32, qty: i64, price: i64, side: Side) -> OrderRequest {
    OrderRequest::typed(format!("ACCT{}", account), account, qty, price, side, OrderType::Limit)
}

fn bench_non_crossing_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("book_insert");

    for &count in [100, 1_000, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("non_crossing", count),
            &count,
            |b, &count| {
                b.iter(|| {
                    let mut engine = Engine::new(EngineConfig::new("TESTEX", "FOO"));
                    for i in 0..count {
                        let req = if i % 2 == 0 {
                            limit(0, 100, 10_000 - i as i64, Side::Buy)
                        } else {
                            limit(1, 100, 10_100 + i as i64, Side::Sell)
                        };
                        black_box(engine.place(&req).unwrap());
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_sweep_through_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    for &depth in [10, 100, 1_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("market_sweep", depth),
            &depth,
            |b, &depth| {
                b.iter_batched(
                    || {
                        let mut engine = Engine::new(EngineConfig::new("TESTEX", "FOO"));
                        for i in 0..depth {
                            engine
                                .place(&limit(0, 10, 10_000 + i as i64, Side::Sell))
                                .unwrap();
                        }
                        engine
                    },
                    |mut engine| {
                        let sweep = OrderRequest::typed(
                            "TAKER",
                            1,
                            10 * depth as i64,
                            0,
                            Side::Buy,
                            OrderType::Market,
                        );
                        black_box(engine.place(&sweep).unwrap());
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_same_level_fifo(c: &mut Criterion) {
    let mut group = c.benchmark_group("fifo_queue");

    group.bench_function("thousand_orders_one_level", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineConfig::new("TESTEX", "FOO"));
            for _ in 0..1_000 {
                black_box(engine.place(&limit(0, 5, 5_000, Side::Buy)).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_non_crossing_inserts,
    bench_sweep_through_depth,
    bench_same_level_fifo
);
criterion_main!(benches);
