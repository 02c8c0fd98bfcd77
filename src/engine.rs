//! `MatchingEngine`: owns both ladders, the order index, and the market-data adapter; the
//! sole entry point for every mutating operation.

use tracing::{trace, warn};

use crate::adapter::{Clock, DeltaSink, MarketDataAdapter, SystemClock};
use crate::config::BookConfig;
use crate::error::{AmendError, CancelError, Fill, SubmitError};
use crate::fatal::invariant_violation;
use crate::index::{OrderHandle, OrderIndex};
use crate::ladder::SideLadder;
use crate::order::{Order, OrderIdentity};
use crate::types::{InstrumentId, OrderId, Price, Quantity, Side, TimeInForce};

fn crosses(incoming_side: Side, incoming_price: Price, level_price: Price) -> bool {
    match incoming_side {
        Side::Buy => incoming_price.0 >= level_price.0,
        Side::Sell => incoming_price.0 <= level_price.0,
    }
}

/// A single-instrument, single-threaded limit order book and matching engine.
pub struct MatchingEngine<S: DeltaSink, C: Clock = SystemClock> {
    instrument: InstrumentId,
    bids: SideLadder,
    asks: SideLadder,
    index: OrderIndex,
    adapter: MarketDataAdapter<S, C>,
    config: BookConfig,
    matched_quantity_total: u64,
    next_trade_id: u64,
}

impl<S: DeltaSink> MatchingEngine<S, SystemClock> {
    pub fn new(instrument: InstrumentId, sink: S, config: BookConfig) -> Self {
        MatchingEngine::with_clock(instrument, sink, SystemClock, config)
    }
}

impl<S: DeltaSink, C: Clock> MatchingEngine<S, C> {
    pub fn with_clock(instrument: InstrumentId, sink: S, clock: C, config: BookConfig) -> Self {
        MatchingEngine {
            instrument,
            bids: SideLadder::new(Side::Buy),
            asks: SideLadder::new(Side::Sell),
            index: OrderIndex::new(),
            adapter: MarketDataAdapter::with_clock(instrument, sink, clock),
            config,
            matched_quantity_total: 0,
            next_trade_id: 0,
        }
    }

    pub fn instrument(&self) -> InstrumentId {
        self.instrument
    }

    pub fn adapter(&self) -> &MarketDataAdapter<S, C> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut MarketDataAdapter<S, C> {
        &mut self.adapter
    }

    fn ladder_mut(&mut self, side: Side) -> &mut SideLadder {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn ladder(&self, side: Side) -> &SideLadder {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Submit a limit order: matches against the opposite ladder first, then rests any
    /// residual (unless the order is IOC, which discards residual instead).
    pub fn submit_limit(&mut self, identity: OrderIdentity) -> Result<Vec<Fill>, SubmitError> {
        trace!(
            id = %identity.id,
            price = %identity.price,
            quantity = %identity.initial_quantity,
            side = %identity.side,
            tif = %identity.time_in_force,
            "submit_limit"
        );

        if identity.instrument != self.instrument {
            return Err(SubmitError::WrongInstrument {
                order: identity.instrument,
                book: self.instrument,
            });
        }
        if identity.initial_quantity.is_zero() {
            return Err(SubmitError::InvalidQuantity);
        }
        if self.index.contains(identity.id) {
            warn!(id = %identity.id, "rejected duplicate order id");
            return Err(SubmitError::DuplicateOrder(identity.id));
        }
        self.config
            .validate(identity.price, identity.initial_quantity)?;

        let side = identity.side;
        let price = identity.price;
        let time_in_force = identity.time_in_force;
        let mut order = Order::new(identity);

        let fills = self.match_incoming(side, price, &mut order.residual);

        if order.residual.is_zero() || time_in_force == TimeInForce::Ioc {
            return Ok(fills);
        }

        let id = order.id();
        let ladder = self.ladder_mut(side);
        let level = ladder.level_for(price);
        let old_agg = level.aggregate_quantity();
        let node = level.append(order);
        let new_agg = level.aggregate_quantity();
        self.index.insert(id, OrderHandle { side, price, node });
        self.adapter.level_transition(side, price, old_agg, new_agg);
        Ok(fills)
    }

    /// Submit a market order: a synthetic marketable order at the extreme price for its side.
    /// Never rests; on an empty opposite side this is a no-op.
    pub fn submit_market(&mut self, side: Side, quantity: Quantity) -> Result<Vec<Fill>, SubmitError> {
        trace!(quantity = %quantity, side = %side, "submit_market");
        if quantity.is_zero() {
            return Err(SubmitError::InvalidQuantity);
        }
        let price = match side {
            Side::Buy => Price(i64::MAX),
            Side::Sell => Price(i64::MIN),
        };
        let mut residual = quantity;
        let fills = self.match_incoming(side, price, &mut residual);
        Ok(fills)
    }

    /// Cancel a resting order. No-op on the book if the id is unknown (returns an error).
    pub fn cancel(&mut self, id: OrderId) -> Result<(), CancelError> {
        trace!(id = %id, "cancel");
        let handle = self.index.lookup(id).ok_or(CancelError::OrderNotFound(id))?;
        let ladder = self.ladder_mut(handle.side);
        let level = match ladder.get_mut(handle.price) {
            Some(level) => level,
            None => invariant_violation("indexed order points at a price with no resident level"),
        };
        let old_agg = level.aggregate_quantity();
        level.remove(handle.node);
        let new_agg = level.aggregate_quantity();
        if level.is_empty() {
            ladder.erase(handle.price);
        }
        self.index.remove(id);
        self.adapter
            .level_transition(handle.side, handle.price, old_agg, new_agg);
        Ok(())
    }

    /// Amend = cancel + submit_limit. The new identity is a fresh arrival and loses queue
    /// priority even when it lands at the same price as the cancelled order.
    pub fn amend(&mut self, id: OrderId, new_identity: OrderIdentity) -> Result<Vec<Fill>, AmendError> {
        trace!(id = %id, new_id = %new_identity.id, "amend");
        self.cancel(id)?;
        Ok(self.submit_limit(new_identity)?)
    }

    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => Some(Price(ask.0 - bid.0)),
            _ => None,
        }
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.index.contains(id)
    }

    pub fn count(&self) -> usize {
        self.index.size()
    }

    /// Sum of resting order counts across both ladders, computed independently of the index —
    /// used to check invariant 5 (index size equals the sum of level counts) without relying
    /// on the index being the thing under test.
    pub fn resting_order_count(&self) -> usize {
        self.bids.resting_order_count() + self.asks.resting_order_count()
    }

    pub fn bid_quantities(&self) -> Vec<(Price, u64)> {
        self.bids.quantities()
    }

    pub fn ask_quantities(&self) -> Vec<(Price, u64)> {
        self.asks.quantities()
    }

    pub fn matched_quantity_total(&self) -> u64 {
        self.matched_quantity_total
    }

    /// Emits SNAPSHOT_BEGIN/ENTRY*/END describing the current book, bids then asks, each side
    /// best-to-worst.
    pub fn snapshot(&mut self) -> bool {
        let mut entries: Vec<(Side, Price, u64)> = self
            .bids
            .iter_from_best()
            .map(|l| (Side::Buy, l.price(), l.aggregate_quantity()))
            .collect();
        entries.extend(
            self.asks
                .iter_from_best()
                .map(|l| (Side::Sell, l.price(), l.aggregate_quantity())),
        );
        self.adapter.snapshot(&entries)
    }

    /// Discards all resting state and emits BOOK_CLEAR. An administrative operation, not a
    /// matching outcome.
    pub fn clear(&mut self, reason_code: u32) -> bool {
        self.bids.clear();
        self.asks.clear();
        self.index.clear();
        self.adapter.book_clear(reason_code)
    }

    pub fn heartbeat(&mut self) -> bool {
        self.adapter.heartbeat()
    }

    pub fn dropped_deltas(&self) -> u64 {
        self.adapter.dropped_deltas()
    }

    /// The inner matcher: walks the opposite ladder from its best level inward while the
    /// incoming order crosses and still has residual, filling FIFO within each level. Mutates
    /// only `incoming_residual` on the caller's side; the caller is responsible for resting
    /// whatever residual remains.
    fn match_incoming(&mut self, incoming_side: Side, incoming_price: Price, incoming_residual: &mut Quantity) -> Vec<Fill> {
        let mut fills = Vec::new();
        let opposite_side = incoming_side.opposite();
        let MatchingEngine {
            ref mut bids,
            ref mut asks,
            ref mut index,
            ref mut adapter,
            ref mut matched_quantity_total,
            ref mut next_trade_id,
            ..
        } = *self;
        let opposite = match incoming_side {
            Side::Buy => asks,
            Side::Sell => bids,
        };

        loop {
            if incoming_residual.is_zero() {
                break;
            }
            let best_price = match opposite.best_price() {
                Some(p) => p,
                None => break,
            };
            if !crosses(incoming_side, incoming_price, best_price) {
                break;
            }

            loop {
                if incoming_residual.is_zero() {
                    break;
                }
                let level = match opposite.get_mut(best_price) {
                    Some(level) => level,
                    None => invariant_violation("best price level vanished mid-match"),
                };
                let head = match level.head() {
                    Some(h) => h,
                    None => break,
                };

                let resting_price = level.price();
                let old_agg = level.aggregate_quantity();
                let (resting_id, fill_qty);
                {
                    let resting = level.order_at_mut(head);
                    fill_qty = Quantity(resting.residual.0.min(incoming_residual.0));
                    resting.reduce(fill_qty);
                    resting_id = resting.id();
                }
                incoming_residual.0 -= fill_qty.0;
                level.decrease_aggregate(fill_qty);
                *matched_quantity_total += fill_qty.0 as u64;

                *next_trade_id += 1;
                adapter.emit_trade(*next_trade_id, resting_price, fill_qty, incoming_side);
                fills.push(Fill {
                    resting_order_id: resting_id,
                    trade_price: resting_price,
                    trade_quantity: fill_qty,
                    aggressor_side: incoming_side,
                });

                let resting_filled = level.order_at(head).is_filled();
                if resting_filled {
                    level.remove(head);
                    index.remove(resting_id);
                    let new_agg = level.aggregate_quantity();
                    adapter.level_transition(opposite_side, resting_price, old_agg, new_agg);
                    if level.is_empty() {
                        opposite.erase(resting_price);
                        break;
                    }
                } else {
                    let new_agg = level.aggregate_quantity();
                    adapter.level_transition(opposite_side, resting_price, old_agg, new_agg);
                }
            }
        }

        fills
    }
}
