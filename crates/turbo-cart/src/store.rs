//! The cart store: in-memory cart, lookup-checked mutations, durable mirror.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use turbo_cache::Cache;
use turbo_data::FetchClient;

use crate::cart::{Cart, CartEntry};
use crate::catalog::{CatalogLookup, HttpCatalog, ProductDetails};
use crate::config::{CartConfig, PersistMode, StockCheck};
use crate::error::{CartError, CartOperation, ConfigError, LookupError};
use crate::ids::ProductId;

#[derive(Debug)]
struct State {
    cart: Cart,
    /// Storage is behind the in-memory cart (best-effort write failed).
    dirty: bool,
}

/// Owns the shopper's cart for one session.
///
/// Share it with the UI layer as an `Arc<CartStore>`. Mutations run one at a
/// time: each holds the store's gate across its lookups and its write, so two
/// overlapping `add_product` calls for the same product both count. Reads
/// never wait on the gate or on storage writes; they only wait for the
/// in-memory swap at the end of a mutation.
///
/// Every operation returns the new snapshot on success. On error the cart is
/// exactly as it was before the call.
pub struct CartStore {
    state: RwLock<State>,
    gate: Mutex<()>,
    catalog: Arc<dyn CatalogLookup>,
    storage: Cache,
    storage_key: String,
    persist: PersistMode,
    stock_check: StockCheck,
}

impl CartStore {
    /// Open a store, restoring the cart from `storage` if a readable snapshot
    /// exists under the configured key.
    pub fn open(config: &CartConfig, catalog: Arc<dyn CatalogLookup>, storage: Cache) -> Self {
        let cart = load_snapshot(&storage, &config.storage_key);
        debug!(
            key = %config.storage_key,
            entries = cart.len(),
            "cart store opened"
        );

        Self {
            state: RwLock::new(State { cart, dirty: false }),
            gate: Mutex::new(()),
            catalog,
            storage,
            storage_key: config.storage_key.clone(),
            persist: config.persist,
            stock_check: config.stock_check,
        }
    }

    /// Build the HTTP catalog and storage described by `config`, then open.
    pub fn connect(config: &CartConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = FetchClient::builder()
            .base_url(&config.api_base_url)
            .timeout(config.request_timeout())
            .build()?;
        let storage = match &config.storage_dir {
            Some(dir) => Cache::open(dir)?,
            None => Cache::in_memory(),
        };

        Ok(Self::open(
            config,
            Arc::new(HttpCatalog::new(client)),
            storage,
        ))
    }

    /// Snapshot of the cart in insertion order.
    pub async fn cart(&self) -> Vec<CartEntry> {
        self.state.read().await.cart.entries()
    }

    /// Snapshot of one entry.
    pub async fn entry(&self, product_id: ProductId) -> Option<CartEntry> {
        self.state.read().await.cart.get(&product_id).cloned()
    }

    /// Sum of all amounts.
    pub async fn item_count(&self) -> u64 {
        self.state.read().await.cart.item_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.cart.is_empty()
    }

    /// Whether storage is behind the in-memory cart.
    pub async fn is_dirty(&self) -> bool {
        self.state.read().await.dirty
    }

    pub fn storage(&self) -> &Cache {
        &self.storage
    }

    /// List the catalog. Does not touch the cart.
    pub async fn products(&self) -> Result<Vec<ProductDetails>, LookupError> {
        self.catalog.products().await
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is appended with amount 1 and the
    /// fetched display fields. An existing entry is incremented in place,
    /// unless that would exceed stock.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Vec<CartEntry>, CartError> {
        let _turn = self.gate.lock().await;

        let (stock, product) = futures::try_join!(
            self.catalog.stock(product_id),
            self.catalog.product(product_id)
        )
        .map_err(|source| {
            warn!(error = %source, "lookup failed");
            CartError::LookupFailed {
                operation: CartOperation::Add,
                product_id,
                source,
            }
        })?;

        let mut next = self.state.read().await.cart.clone();
        let current = next.get(&product_id).map(|e| e.amount);
        let desired = current.map_or(1, |amount| amount.saturating_add(1));

        let checked = current.is_some() || self.stock_check == StockCheck::Requested;
        if checked && !stock.can_fulfill(desired) {
            warn!(requested = desired, available = stock.amount, "out of stock");
            return Err(CartError::OutOfStock {
                product_id,
                requested: desired,
                available: stock.amount,
            });
        }

        if current.is_some() {
            next.set_amount(&product_id, desired);
        } else {
            next.push(CartEntry::from_product(ProductDetails {
                id: product_id,
                ..product
            }));
        }

        debug!(amount = desired, "product added");
        self.commit(CartOperation::Add, next).await
    }

    /// Remove a product's entry. Removing an absent product is a no-op and
    /// does not touch storage.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn remove_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<CartEntry>, CartError> {
        let _turn = self.gate.lock().await;

        let mut next = self.state.read().await.cart.clone();
        if next.remove(&product_id).is_none() {
            debug!("not in cart");
            return Ok(next.entries());
        }

        debug!("product removed");
        self.commit(CartOperation::Remove, next).await
    }

    /// Set a product's amount to `amount` (absolute, not a delta).
    ///
    /// A product not in the cart is a no-op. Which quantity is checked against
    /// stock depends on [`StockCheck`]; under the default the *existing*
    /// amount is checked, not `amount`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<Vec<CartEntry>, CartError> {
        let _turn = self.gate.lock().await;

        let mut next = self.state.read().await.cart.clone();
        let Some(current) = next.get(&product_id).map(|e| e.amount) else {
            debug!("not in cart");
            return Ok(next.entries());
        };

        if amount == 0 {
            warn!("rejected zero amount");
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        let stock = self.catalog.stock(product_id).await.map_err(|source| {
            warn!(error = %source, "stock lookup failed");
            CartError::LookupFailed {
                operation: CartOperation::Update,
                product_id,
                source,
            }
        })?;

        let checked = match self.stock_check {
            StockCheck::Existing => current,
            StockCheck::Requested => amount,
        };
        if !stock.can_fulfill(checked) {
            warn!(requested = checked, available = stock.amount, "out of stock");
            return Err(CartError::OutOfStock {
                product_id,
                requested: checked,
                available: stock.amount,
            });
        }

        next.set_amount(&product_id, amount);
        debug!(from = current, to = amount, "amount updated");
        self.commit(CartOperation::Update, next).await
    }

    /// Write the cart to storage if an earlier best-effort write failed.
    pub async fn flush(&self) -> Result<(), CartError> {
        let _turn = self.gate.lock().await;
        {
            let state = self.state.read().await;
            if !state.dirty {
                return Ok(());
            }
            self.storage
                .set(&self.storage_key, &state.cart)
                .map_err(|source| CartError::StorageFailed {
                    operation: CartOperation::Flush,
                    source,
                })?;
        }
        self.state.write().await.dirty = false;
        debug!(key = %self.storage_key, "pending cart flushed");
        Ok(())
    }

    /// End the session: flush anything pending and hand back the final cart.
    pub async fn close(self) -> Result<Vec<CartEntry>, CartError> {
        self.flush().await?;
        Ok(self.state.into_inner().cart.into())
    }

    /// Persist `next` and make it the current cart.
    ///
    /// Callers hold the gate, so the state cannot change between the write
    /// and the swap.
    async fn commit(
        &self,
        operation: CartOperation,
        next: Cart,
    ) -> Result<Vec<CartEntry>, CartError> {
        let dirty = match self.storage.set(&self.storage_key, &next) {
            Ok(()) => false,
            Err(source) => match self.persist {
                PersistMode::Strict => {
                    warn!(key = %self.storage_key, error = %source, "cart write failed");
                    return Err(CartError::StorageFailed { operation, source });
                }
                PersistMode::BestEffort => {
                    warn!(
                        key = %self.storage_key,
                        error = %source,
                        "cart write failed, keeping in-memory change"
                    );
                    true
                }
            },
        };

        let snapshot = next.entries();
        let mut state = self.state.write().await;
        state.cart = next;
        state.dirty = dirty;
        Ok(snapshot)
    }
}

fn load_snapshot(storage: &Cache, key: &str) -> Cart {
    match storage.get::<Cart>(key) {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "stored cart unreadable, starting empty");
            Cart::new()
        }
    }
}
