//! Shopping cart module.
//!
//! Contains the cart collection and its entries.

mod cart;
mod entry;

pub use cart::{Cart, SnapshotError};
pub use entry::CartEntry;
