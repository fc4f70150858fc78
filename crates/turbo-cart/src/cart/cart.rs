//! Cart collection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartEntry;
use crate::ids::ProductId;

/// Why a stored snapshot could not become a [`Cart`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Two entries share an id.
    #[error("duplicate entry for product {0}")]
    DuplicateEntry(ProductId),

    /// An entry holds zero units.
    #[error("entry for product {0} has amount 0")]
    ZeroAmount(ProductId),
}

/// An insertion-ordered set of cart entries, at most one per product.
///
/// Entries are keyed by product id for constant-time lookup and update;
/// `order` remembers when each id was first added. Persisted as a plain JSON
/// array of entries in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: HashMap<ProductId, CartEntry>,
    order: Vec<ProductId>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for a product not yet in the cart.
    ///
    /// Returns `false` and leaves the cart untouched if the id is already
    /// present.
    pub fn push(&mut self, entry: CartEntry) -> bool {
        if self.entries.contains_key(&entry.id) {
            return false;
        }
        self.order.push(entry.id);
        self.entries.insert(entry.id, entry);
        true
    }

    /// Set an entry's amount in place, keeping its position.
    pub fn set_amount(&mut self, product_id: &ProductId, amount: u32) -> bool {
        match self.entries.get_mut(product_id) {
            Some(entry) => {
                entry.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove an entry.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartEntry> {
        let entry = self.entries.remove(product_id)?;
        self.order.retain(|id| id != product_id);
        Some(entry)
    }

    /// Get an entry by product id.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.get(product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.contains_key(product_id)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Owned snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<CartEntry> {
        self.iter().cloned().collect()
    }

    /// Get total item count (sum of amounts).
    pub fn item_count(&self) -> u64 {
        self.entries.values().map(|e| u64::from(e.amount)).sum()
    }

    /// Get number of distinct products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = SnapshotError;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        let mut cart = Cart::new();
        for entry in entries {
            if entry.amount == 0 {
                return Err(SnapshotError::ZeroAmount(entry.id));
            }
            let id = entry.id;
            if !cart.push(entry) {
                return Err(SnapshotError::DuplicateEntry(id));
            }
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        let Cart { mut entries, order } = cart;
        order
            .into_iter()
            .filter_map(|id| entries.remove(&id))
            .collect()
    }
}
