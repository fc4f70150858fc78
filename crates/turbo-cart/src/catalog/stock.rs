//! Stock level types.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Purchasable quantity of a product, as reported by the lookup service.
///
/// This is the ceiling for the amount a cart may hold. The cart only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Product this record describes.
    pub id: ProductId,
    /// Units in stock.
    pub amount: u32,
}

impl StockRecord {
    /// Create a new stock record.
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }

    /// Check if a specific quantity is available.
    pub fn can_fulfill(&self, quantity: u32) -> bool {
        quantity <= self.amount
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.amount == 0
    }
}
