//! Catalog module.
//!
//! Contains the types served by the product lookup service and the port the
//! cart store uses to reach it.

mod lookup;
mod product;
mod stock;

pub use lookup::{CatalogLookup, HttpCatalog};
pub use product::ProductDetails;
pub use stock::StockRecord;
