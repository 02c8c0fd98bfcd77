//! Error taxonomy for the book's public surface.
//!
//! Each fallible operation gets its own `thiserror`-derived enum rather than one catch-all
//! type, and every public enum is `#[non_exhaustive]` so new variants can be added later
//! without a semver break. `Fatal` invariant violations are deliberately not part of either
//! enum: per the concurrency/resource model, an invariant violation aborts the process rather
//! than returning to the caller, since continuing would let a corrupted book execute further
//! trades.

use thiserror::Error;

use crate::types::{InstrumentId, OrderId, Price, Quantity, Side};

/// Errors rejecting a `submit_limit` / `submit_market` call. The book is left exactly as
/// before the call.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("order {0} is already resting")]
    DuplicateOrder(OrderId),

    #[error("order quantity must be positive")]
    InvalidQuantity,

    #[error("order instrument {order} does not match book instrument {book}")]
    WrongInstrument {
        order: InstrumentId,
        book: InstrumentId,
    },

    #[error("price {price} is not a multiple of tick size {tick_size}")]
    InvalidTickSize { price: Price, tick_size: u64 },

    #[error("quantity {quantity} is not a multiple of lot size {lot_size}")]
    InvalidLotSize { quantity: Quantity, lot_size: u32 },

    #[error("quantity {quantity} is outside the allowed range [{min}, {max}]")]
    OrderSizeOutOfRange {
        quantity: Quantity,
        min: u32,
        max: u32,
    },
}

/// Errors rejecting a `cancel` call.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CancelError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),
}

/// Errors rejecting an `amend` call. Amend is cancel + submit_limit, so its failure modes are
/// exactly the union of the two halves.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AmendError {
    #[error(transparent)]
    Cancel(#[from] CancelError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// A single observed fill, used both by `submit_limit`/`submit_market` results and the matcher
/// internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub resting_order_id: OrderId,
    pub trade_price: Price,
    pub trade_quantity: Quantity,
    pub aggressor_side: Side,
}
