//! A single-instrument, single-threaded limit order book and matching engine.
//!
//! The core maintains price-time priority across two price-ordered side ladders, executes
//! incoming orders against resting liquidity, and emits a bit-exact market-data delta stream
//! describing every change. It does not suspend, block, lock, or perform I/O internally —
//! callers serialize access and drive the market-data sink.
//!
//! ```
//! use orderbook_core::prelude::*;
//!
//! let mut book = MatchingEngine::new(InstrumentId(1), NullSink, BookConfig::default());
//! book.submit_limit(OrderIdentity {
//!     id: OrderId(1),
//!     owner: "alice".into(),
//!     instrument: InstrumentId(1),
//!     side: Side::Buy,
//!     price: Price(100),
//!     initial_quantity: Quantity(10),
//!     time_in_force: TimeInForce::Day,
//! }).unwrap();
//! assert_eq!(book.best_bid_price(), Some(Price(100)));
//! ```

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod fatal;
pub mod index;
pub mod ladder;
pub mod level;
pub mod order;
pub mod types;
pub mod wire;

pub mod prelude {
    pub use crate::adapter::{
        Clock, DeltaSink, MarketDataAdapter, NullSink, RingBufferSink, StepClock, SystemClock,
    };
    pub use crate::config::BookConfig;
    pub use crate::engine::MatchingEngine;
    pub use crate::error::{AmendError, CancelError, Fill, SubmitError};
    pub use crate::index::{OrderHandle, OrderIndex};
    pub use crate::ladder::{LevelKey, SideLadder};
    pub use crate::level::{NodeHandle, PriceLevel};
    pub use crate::order::{Order, OrderIdentity};
    pub use crate::types::{InstrumentId, OrderId, Price, Quantity, Side, TimeInForce};
}
