//! Type-safe key-value storage layer for TurboCart.
//!
//! Provides a simple, ergonomic API for keeping small JSON documents in a
//! durable slot, the way a browser keeps values in local storage.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cache::Cache;
//!
//! let cache = Cache::open("/var/lib/storefront")?;
//!
//! // Store a value
//! cache.set("@Rocketshoes:cart", &entries)?;
//!
//! // Retrieve a value
//! let entries: Option<Vec<CartEntry>> = cache.get("@Rocketshoes:cart")?;
//!
//! // Delete a value
//! cache.delete("@Rocketshoes:cart")?;
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError};
}
