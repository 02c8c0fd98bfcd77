//! Order identity and the mutable residual record that matching operates on.
//!
//! Per the identity-vs-record split: everything that never changes after submission
//! (`OrderIdentity`) is one value, and the one field matching mutates (`residual`) is kept
//! separate so it is obvious at a glance which parts of an `Order` the matcher is allowed to
//! touch.

use crate::types::{InstrumentId, OrderId, Price, Quantity, Side, TimeInForce};

/// The immutable half of an order: everything fixed at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderIdentity {
    pub id: OrderId,
    pub owner: String,
    pub instrument: InstrumentId,
    pub side: Side,
    pub price: Price,
    pub initial_quantity: Quantity,
    pub time_in_force: TimeInForce,
}

/// A live order: identity plus the residual quantity matching is allowed to decrease.
///
/// Invariant: `0 < residual <= identity.initial_quantity` while resting; an order whose
/// residual reaches zero is never found resting in any level.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub identity: OrderIdentity,
    pub residual: Quantity,
}

impl Order {
    pub fn new(identity: OrderIdentity) -> Self {
        let residual = identity.initial_quantity;
        Order { identity, residual }
    }

    pub fn id(&self) -> OrderId {
        self.identity.id
    }

    pub fn side(&self) -> Side {
        self.identity.side
    }

    pub fn price(&self) -> Price {
        self.identity.price
    }

    pub fn is_filled(&self) -> bool {
        self.residual.is_zero()
    }

    /// Reduce the residual by `qty`. Panics if `qty` exceeds the current residual: this is a
    /// matcher-internal invariant, never reachable from caller input (the matcher always caps
    /// a fill at `min(resting.residual, incoming.residual)`).
    pub fn reduce(&mut self, qty: Quantity) {
        debug_assert!(qty.0 <= self.residual.0, "fill exceeds resting residual");
        self.residual = Quantity(self.residual.0 - qty.0);
    }
}
