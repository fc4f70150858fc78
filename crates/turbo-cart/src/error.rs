//! Cart error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use turbo_cache::CacheError;
use turbo_data::FetchError;

use crate::ids::ProductId;

/// The store operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    /// `add_product`.
    Add,
    /// `remove_product`.
    Remove,
    /// `update_product_amount`.
    Update,
    /// Writing a pending snapshot back to storage.
    Flush,
}

impl CartOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::Add => "add",
            CartOperation::Remove => "remove",
            CartOperation::Update => "update",
            CartOperation::Flush => "flush",
        }
    }

    /// Generic user-facing message for a failure of this operation.
    pub fn failure_notice(&self) -> &'static str {
        match self {
            CartOperation::Add => "Failed to add product",
            CartOperation::Remove => "Failed to remove product",
            CartOperation::Update => "Failed to update product amount",
            CartOperation::Flush => "Failed to save cart",
        }
    }
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a [`CartError`] for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The quantity exceeds the service-reported stock ceiling.
    OutOfStock,
    /// A stock or product lookup failed.
    LookupFailure,
    /// Removing a product failed.
    RemovalFailure,
    /// Persisting the cart failed outside of a removal.
    StorageFailure,
    /// The requested amount breaks the `amount >= 1` invariant.
    InvalidAmount,
}

/// Errors returned by cart store operations.
///
/// When any of these is returned the cart is unchanged.
#[derive(Error, Debug)]
pub enum CartError {
    /// Requested or existing quantity exceeds stock.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Stock or product lookup failed.
    #[error("Failed to {operation} product {product_id}: {source}")]
    LookupFailed {
        operation: CartOperation,
        product_id: ProductId,
        #[source]
        source: LookupError,
    },

    /// Durable storage rejected the write.
    #[error("Failed to persist cart during {operation}: {source}")]
    StorageFailed {
        operation: CartOperation,
        #[source]
        source: CacheError,
    },

    /// Amount must be at least 1.
    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: u32 },
}

impl CartError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::OutOfStock { .. } => ErrorKind::OutOfStock,
            CartError::LookupFailed { .. } => ErrorKind::LookupFailure,
            CartError::StorageFailed {
                operation: CartOperation::Remove,
                ..
            } => ErrorKind::RemovalFailure,
            CartError::StorageFailed { .. } => ErrorKind::StorageFailure,
            CartError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
        }
    }

    /// Short message suitable for showing to the shopper.
    pub fn notice(&self) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => "Requested quantity is out of stock",
            CartError::LookupFailed { operation, .. } => operation.failure_notice(),
            CartError::StorageFailed { operation, .. } => operation.failure_notice(),
            CartError::InvalidAmount { .. } => "Quantity must be at least 1",
        }
    }
}

/// Errors from a [`CatalogLookup`](crate::catalog::CatalogLookup).
#[derive(Error, Debug)]
pub enum LookupError {
    /// The service does not know the product.
    #[error("{resource} not found for product {product_id}")]
    NotFound {
        resource: &'static str,
        product_id: ProductId,
    },

    /// The service answered for a different product than asked.
    #[error("Lookup for product {requested} returned product {returned}")]
    Mismatch {
        requested: ProductId,
        returned: ProductId,
    },

    /// Transport or decoding failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Failure reported by a non-HTTP lookup implementation.
    #[error("Lookup unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while loading configuration or wiring a store.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed.
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A field holds an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] FetchError),
}
