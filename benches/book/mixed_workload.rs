//! A mixed workload approximating a live book: 70% adds, 20% cancels, 10% aggressive
//! crossing orders.

use criterion::{BenchmarkId, Criterion};
use orderbook_core::prelude::*;
use std::hint::black_box;

pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("MatchingEngine - mixed_70_20_10");

    for &op_count in &[1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("mixed_ops", op_count),
            &op_count,
            |b, &op_count| {
                b.iter_with_setup(
                    || MatchingEngine::new(InstrumentId(1), NullSink, BookConfig::default()),
                    |mut book| {
                        let mut resting_ids = Vec::new();
                        let mut next_id = 0u64;
                        for i in 0..op_count {
                            match i % 10 {
                                0..=6 => {
                                    let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                                    let price = if side == Side::Buy {
                                        1_000 - (i % 500) as i64
                                    } else {
                                        2_000 + (i % 500) as i64
                                    };
                                    let id = OrderId(next_id);
                                    next_id += 1;
                                    black_box(
                                        book.submit_limit(OrderIdentity {
                                            id,
                                            owner: "bench".into(),
                                            instrument: InstrumentId(1),
                                            side,
                                            price: Price(price),
                                            initial_quantity: Quantity(10),
                                            time_in_force: TimeInForce::Day,
                                        })
                                        .unwrap(),
                                    );
                                    resting_ids.push(id);
                                }
                                7..=8 => {
                                    if let Some(id) = resting_ids.pop() {
                                        let _ = black_box(book.cancel(id));
                                    }
                                }
                                _ => {
                                    black_box(book.submit_market(Side::Buy, Quantity(5)).unwrap());
                                }
                            }
                        }
                    },
                );
            },
        );
    }
}
