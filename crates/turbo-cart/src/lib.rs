//! Shopping cart state manager for TurboCart storefronts.
//!
//! This crate keeps a shopper's cart for the length of a browsing session:
//!
//! - **Cart**: insertion-ordered entries, one per product, with quantities
//! - **Catalog**: stock levels and product details from the lookup service
//! - **Store**: the three mutations (add, remove, update amount), checked
//!   against stock and mirrored into durable storage after every change
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_cart::prelude::*;
//!
//! let config = CartConfig::load("cart.toml")?;
//! let store = Arc::new(CartStore::connect(&config)?);
//!
//! match store.add_product(ProductId::new(1)).await {
//!     Ok(cart) => render(&cart),
//!     Err(e) => notify(e.notice()),
//! }
//!
//! // End of session
//! let final_cart = Arc::into_inner(store).unwrap().close().await?;
//! ```

pub mod error;
pub mod ids;

pub mod cart;
pub mod catalog;
pub mod config;
pub mod store;

pub use error::{CartError, ConfigError, ErrorKind, LookupError};
pub use ids::ProductId;
pub use store::CartStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, CartOperation, ConfigError, ErrorKind, LookupError};
    pub use crate::ids::ProductId;

    // Cart
    pub use crate::cart::{Cart, CartEntry, SnapshotError};

    // Catalog
    pub use crate::catalog::{CatalogLookup, HttpCatalog, ProductDetails, StockRecord};

    // Store
    pub use crate::config::{CartConfig, PersistMode, StockCheck};
    pub use crate::store::CartStore;
}
