//! Book-level admission control: tick size, lot size, and order-size bounds.
//!
//! All four limits are optional; a book with no configuration (the default) accepts any
//! positive price and quantity. This runs before an order reaches the matcher — a rejected
//! order never touches either ladder and never matches.

use crate::error::SubmitError;
use crate::types::{Price, Quantity};

#[derive(Debug, Clone, Copy, Default)]
pub struct BookConfig {
    pub tick_size: Option<u64>,
    pub lot_size: Option<u32>,
    pub min_order_size: Option<u32>,
    pub max_order_size: Option<u32>,
}

impl BookConfig {
    pub fn validate(&self, price: Price, quantity: Quantity) -> Result<(), SubmitError> {
        if let Some(tick_size) = self.tick_size {
            if tick_size > 0 && (price.0.unsigned_abs()) % tick_size != 0 {
                return Err(SubmitError::InvalidTickSize { price, tick_size });
            }
        }
        if let Some(lot_size) = self.lot_size {
            if lot_size > 0 && quantity.0 % lot_size != 0 {
                return Err(SubmitError::InvalidLotSize {
                    quantity,
                    lot_size,
                });
            }
        }
        if let Some(min) = self.min_order_size {
            if quantity.0 < min {
                return Err(SubmitError::OrderSizeOutOfRange {
                    quantity,
                    min,
                    max: self.max_order_size.unwrap_or(u32::MAX),
                });
            }
        }
        if let Some(max) = self.max_order_size {
            if quantity.0 > max {
                return Err(SubmitError::OrderSizeOutOfRange {
                    quantity,
                    min: self.min_order_size.unwrap_or(0),
                    max,
                });
            }
        }
        Ok(())
    }
}
