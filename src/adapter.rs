//! `MarketDataAdapter`: turns level-quantity transitions and trade events into the wire delta
//! stream, and owns the auxiliary book-lifecycle messages (heartbeat, snapshot, book-clear).
//!
//! The sink itself is a small capability trait, mirroring the abstract-base-plus-two-subclasses
//! shape of an external delta generator: a null sink for tests/simulation, and a ring-buffer
//! sink that hands bytes to an external publisher without blocking. Selection is
//! construction-time, never a per-call dynamic decision on the hot path beyond the one virtual
//! call the trait object itself costs.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tracing::debug;

use crate::types::{InstrumentId, Price, Quantity, Side};
use crate::wire::{self, UpdateAction};

/// Source of wall-clock nanosecond timestamps, abstracted so tests can supply a deterministic
/// clock instead of reading the real one.
pub trait Clock {
    fn now_ns(&mut self) -> u64;
}

/// Reads the system clock. The default clock for a production engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ns(&mut self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// A clock that counts up by a fixed step each call — deterministic, for tests.
#[derive(Debug, Clone, Copy)]
pub struct StepClock {
    next: u64,
    step: u64,
}

impl StepClock {
    pub fn new(start: u64, step: u64) -> Self {
        StepClock { next: start, step }
    }
}

impl Clock for StepClock {
    fn now_ns(&mut self) -> u64 {
        let ts = self.next;
        self.next += self.step;
        ts
    }
}

/// The capability set the core requires of a market-data sink. Every method takes already
/// fully-framed bytes — the adapter owns encoding, the sink only owns delivery.
pub trait DeltaSink {
    /// Hand a framed message to the sink. Returns `false` if the sink refused it (e.g. a full
    /// ring buffer) — the caller must treat this as non-fatal (`AdapterDropped`).
    fn emit(&mut self, bytes: Bytes) -> bool;
}

/// Discards everything. Used by tests and simulation runs where the feed is unwanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DeltaSink for NullSink {
    fn emit(&mut self, _bytes: Bytes) -> bool {
        true
    }
}

/// A bounded single-producer queue standing in for the SPSC ring buffer an external publisher
/// would drain. Pushing past capacity drops the newest message and reports failure, rather
/// than growing unbounded or blocking — there is nothing to block on in a single-threaded core.
#[derive(Debug)]
pub struct RingBufferSink {
    capacity: usize,
    queue: VecDeque<Bytes>,
}

impl RingBufferSink {
    pub fn new(capacity: usize) -> Self {
        RingBufferSink {
            capacity,
            queue: VecDeque::with_capacity(capacity),
        }
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Bytes> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl DeltaSink for RingBufferSink {
    fn emit(&mut self, bytes: Bytes) -> bool {
        if self.queue.len() >= self.capacity {
            return false;
        }
        self.queue.push_back(bytes);
        true
    }
}

/// Translates book-level transitions and trade events into framed wire messages, assigning
/// each one the next contiguous sequence number.
pub struct MarketDataAdapter<S: DeltaSink, C: Clock = SystemClock> {
    instrument: InstrumentId,
    sink: S,
    clock: C,
    sequence: u64,
    dropped: u64,
}

impl<S: DeltaSink> MarketDataAdapter<S, SystemClock> {
    pub fn new(instrument: InstrumentId, sink: S) -> Self {
        MarketDataAdapter::with_clock(instrument, sink, SystemClock)
    }
}

impl<S: DeltaSink, C: Clock> MarketDataAdapter<S, C> {
    pub fn with_clock(instrument: InstrumentId, sink: S, clock: C) -> Self {
        MarketDataAdapter {
            instrument,
            sink,
            clock,
            sequence: 0,
            dropped: 0,
        }
    }

    pub fn dropped_deltas(&self) -> u64 {
        self.dropped
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn next_seq(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn deliver(&mut self, bytes: Bytes) -> bool {
        let ok = self.sink.emit(bytes);
        if !ok {
            self.dropped += 1;
            debug!(instrument = %self.instrument, "market data sink dropped a message");
        }
        ok
    }

    /// Applies the emission rules for a single level transition: NEW on 0->n, CHANGE on
    /// n->m (n,m>0, n!=m), DELETE on n->0, nothing when old==new.
    pub fn level_transition(
        &mut self,
        side: Side,
        price: Price,
        old_quantity: u64,
        new_quantity: u64,
    ) -> bool {
        if old_quantity == new_quantity {
            return true;
        }
        if new_quantity == 0 {
            return self.emit_level_delete(side, price);
        }
        let action = if old_quantity == 0 {
            UpdateAction::New
        } else {
            UpdateAction::Change
        };
        self.emit_level_update(side, price, new_quantity, action)
    }

    pub fn emit_level_update(
        &mut self,
        side: Side,
        price: Price,
        quantity: u64,
        action: UpdateAction,
    ) -> bool {
        let seq = self.next_seq();
        let ts = self.clock.now_ns();
        let bytes =
            wire::encode_price_level_update(seq, ts, self.instrument, price, quantity, side, action);
        self.deliver(bytes)
    }

    pub fn emit_level_delete(&mut self, side: Side, price: Price) -> bool {
        let seq = self.next_seq();
        let ts = self.clock.now_ns();
        let bytes = wire::encode_price_level_delete(seq, ts, self.instrument, price, side);
        self.deliver(bytes)
    }

    pub fn emit_trade(
        &mut self,
        trade_id: u64,
        price: Price,
        quantity: Quantity,
        aggressor_side: Side,
    ) -> bool {
        let seq = self.next_seq();
        let ts = self.clock.now_ns();
        let bytes = wire::encode_trade(seq, ts, self.instrument, trade_id, price, quantity, aggressor_side);
        self.deliver(bytes)
    }

    pub fn heartbeat(&mut self) -> bool {
        let seq = self.next_seq();
        let ts = self.clock.now_ns();
        let bytes = wire::encode_heartbeat(seq, ts, self.instrument);
        self.deliver(bytes)
    }

    pub fn book_clear(&mut self, reason_code: u32) -> bool {
        let seq = self.next_seq();
        let ts = self.clock.now_ns();
        let bytes = wire::encode_book_clear(seq, ts, self.instrument, reason_code);
        self.deliver(bytes)
    }

    /// Emits SNAPSHOT_BEGIN, one SNAPSHOT_ENTRY per `entries` item (bid-then-ask, best-to-worst
    /// order expected from the caller), then SNAPSHOT_END with a CRC-32 over every entry body
    /// emitted in between, in emission order.
    pub fn snapshot(&mut self, entries: &[(Side, Price, u64)]) -> bool {
        let mut ok = true;
        {
            let seq = self.next_seq();
            let ts = self.clock.now_ns();
            let bytes =
                wire::encode_snapshot_begin(seq, ts, self.instrument, entries.len() as u32);
            ok &= self.deliver(bytes);
        }

        let mut hasher = crc32fast::Hasher::new();
        for &(side, price, quantity) in entries {
            hasher.update(&wire::encode_snapshot_entry_body(price, quantity, side));
            let seq = self.next_seq();
            let ts = self.clock.now_ns();
            let bytes = wire::encode_snapshot_entry(seq, ts, self.instrument, price, quantity, side);
            ok &= self.deliver(bytes);
        }

        {
            let checksum = hasher.finalize();
            let seq = self.next_seq();
            let ts = self.clock.now_ns();
            let bytes = wire::encode_snapshot_end(seq, ts, self.instrument, checksum);
            ok &= self.deliver(bytes);
        }
        ok
    }
}
