//! A market order that exhausts every level of a thin book (single order per level), the
//! worst case for the level-erase path.

use criterion::{BenchmarkId, Criterion};
use orderbook_core::prelude::*;
use std::hint::black_box;

pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("MatchingEngine - thin_book_sweep");

    for &levels in &[50, 500] {
        group.bench_with_input(
            BenchmarkId::new("exhaust_thin_book", levels),
            &levels,
            |b, &levels| {
                b.iter_with_setup(
                    || {
                        let mut book =
                            MatchingEngine::new(InstrumentId(1), NullSink, BookConfig::default());
                        for i in 0..levels {
                            book.submit_limit(OrderIdentity {
                                id: OrderId(i as u64),
                                owner: "bench".into(),
                                instrument: InstrumentId(1),
                                side: Side::Sell,
                                price: Price(1_000 + i as i64),
                                initial_quantity: Quantity(1),
                                time_in_force: TimeInForce::Day,
                            })
                            .unwrap();
                        }
                        book
                    },
                    |mut book| {
                        black_box(book.submit_market(Side::Buy, Quantity(levels as u32)).unwrap());
                        assert_eq!(book.count(), 0);
                    },
                );
            },
        );
    }
}
