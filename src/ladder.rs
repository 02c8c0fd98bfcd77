//! `SideLadder`: an ordered price -> `PriceLevel` mapping whose iteration direction depends on
//! side. Bid and ask ladders are the same generic container; only the key's `Ord` differs.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::level::PriceLevel;
use crate::types::{Price, Side};

/// A price tagged with the side it belongs to, whose ordering flips by side: descending for
/// bids (best = highest price first), ascending for asks (best = lowest price first).
///
/// Comparing keys from different sides is a programmer error, not a recoverable condition —
/// `SideLadder` never mixes them, since a ladder only ever holds one side's keys.
#[derive(Debug, Clone, Copy, Eq)]
pub struct LevelKey {
    pub price: Price,
    pub side: Side,
}

impl LevelKey {
    pub fn new(price: Price, side: Side) -> Self {
        LevelKey { price, side }
    }
}

impl PartialEq for LevelKey {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price
    }
}

impl PartialOrd for LevelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LevelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert!(
            std::mem::discriminant(&self.side) == std::mem::discriminant(&other.side),
            "LevelKey compared across sides"
        );
        match self.side {
            Side::Buy => other.price.cmp(&self.price),
            Side::Sell => self.price.cmp(&other.price),
        }
    }
}

/// One side of the book: an ordered set of non-empty price levels.
#[derive(Debug, Clone)]
pub struct SideLadder {
    side: Side,
    levels: BTreeMap<LevelKey, PriceLevel>,
}

impl SideLadder {
    pub fn new(side: Side) -> Self {
        SideLadder {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    fn key(&self, price: Price) -> LevelKey {
        LevelKey::new(price, self.side)
    }

    /// The level at the best price under this ladder's ordering, if any.
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.values().next()
    }

    pub fn best_price(&self) -> Option<Price> {
        self.best().map(PriceLevel::price)
    }

    pub fn get(&self, price: Price) -> Option<&PriceLevel> {
        let key = self.key(price);
        self.levels.get(&key)
    }

    pub fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        let key = self.key(price);
        self.levels.get_mut(&key)
    }

    /// Borrow the level at `price`, creating an empty one if absent.
    pub fn level_for(&mut self, price: Price) -> &mut PriceLevel {
        let key = self.key(price);
        self.levels.entry(key).or_insert_with(|| PriceLevel::new(price))
    }

    /// Remove the (assumed empty) level at `price`. No-op if already absent.
    pub fn erase(&mut self, price: Price) {
        let key = self.key(price);
        if let Some(level) = self.levels.get(&key) {
            debug_assert!(level.is_empty(), "erasing a non-empty level");
        }
        self.levels.remove(&key);
    }

    /// Levels in best-to-worst order, used by the matcher and by snapshotting.
    pub fn iter_from_best(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn resting_order_count(&self) -> usize {
        self.levels.values().map(PriceLevel::count).sum()
    }

    /// `(price, aggregate_quantity)` pairs in best-to-worst order.
    pub fn quantities(&self) -> Vec<(Price, u64)> {
        self.levels
            .values()
            .map(|l| (l.price(), l.aggregate_quantity()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}
