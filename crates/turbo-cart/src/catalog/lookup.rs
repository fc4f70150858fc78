//! Lookup port for stock levels and product details.

use async_trait::async_trait;
use turbo_data::{FetchClient, FetchError};

use crate::catalog::{ProductDetails, StockRecord};
use crate::error::LookupError;
use crate::ids::ProductId;

/// Read-only access to the product lookup service.
///
/// The cart store holds this behind an `Arc<dyn CatalogLookup>`, so UI code and
/// tests can swap the HTTP implementation for anything else.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Current stock level for a product.
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError>;

    /// Display details for a product.
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, LookupError>;

    /// Every product the service lists.
    async fn products(&self) -> Result<Vec<ProductDetails>, LookupError>;
}

/// [`CatalogLookup`] over the storefront's JSON API.
///
/// - `GET /stock/{id}` → [`StockRecord`]
/// - `GET /products/{id}` → [`ProductDetails`]
/// - `GET /products` → list of [`ProductDetails`]
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: FetchClient,
}

impl HttpCatalog {
    /// Wrap a client whose base URL points at the lookup service.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError> {
        let stock: StockRecord = self
            .client
            .get_json(&format!("/stock/{product_id}"))
            .await
            .map_err(|e| not_found_as("stock", product_id, e))?;
        ensure_same(product_id, stock.id)?;
        Ok(stock)
    }

    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, LookupError> {
        let product: ProductDetails = self
            .client
            .get_json(&format!("/products/{product_id}"))
            .await
            .map_err(|e| not_found_as("product", product_id, e))?;
        ensure_same(product_id, product.id)?;
        Ok(product)
    }

    async fn products(&self) -> Result<Vec<ProductDetails>, LookupError> {
        Ok(self.client.get_json("/products").await?)
    }
}

fn not_found_as(resource: &'static str, product_id: ProductId, err: FetchError) -> LookupError {
    if err.is_not_found() {
        LookupError::NotFound {
            resource,
            product_id,
        }
    } else {
        LookupError::Fetch(err)
    }
}

fn ensure_same(requested: ProductId, returned: ProductId) -> Result<(), LookupError> {
    if requested == returned {
        Ok(())
    } else {
        Err(LookupError::Mismatch {
            requested,
            returned,
        })
    }
}
