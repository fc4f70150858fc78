//! Cart store configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Storage slot the storefront has always used for the cart.
pub const DEFAULT_STORAGE_KEY: &str = "@Rocketshoes:cart";

/// Lookup service address used in local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// What a failed storage write means for the operation that caused it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// Storage is a cache. The mutation stands, the failure is logged, and the
    /// store retries on the next write or on close.
    #[default]
    BestEffort,
    /// The write must land. On failure the operation errors and the
    /// in-memory cart is left as it was.
    Strict,
}

/// Which quantity `update_product_amount` compares against stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockCheck {
    /// Compare the entry's amount *before* the update.
    ///
    /// This is how the storefront has always behaved, and it lets an update
    /// raise the amount past stock. Kept as the default until product owners
    /// confirm the intended rule. The first unit of a fresh `add_product` is
    /// not checked either.
    #[default]
    Existing,
    /// Compare the amount being requested, including the first unit added.
    Requested,
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Name of the durable storage slot holding the cart.
    pub storage_key: String,

    /// Directory for durable storage. `None` keeps the cart in memory only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Base URL of the stock/product lookup service.
    pub api_base_url: String,

    /// Total timeout for one lookup request, in milliseconds.
    pub request_timeout_ms: u64,

    /// Storage write failure policy.
    pub persist: PersistMode,

    /// Stock check rule for amount updates.
    pub stock_check: StockCheck,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            persist: PersistMode::default(),
            stock_check: StockCheck::default(),
        }
    }
}

impl CartConfig {
    /// Load config from a file.
    ///
    /// `.json` files are parsed as JSON, anything else as TOML. Missing
    /// fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let config: Self = if is_json {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the store cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url must not be empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_persist(mut self, persist: PersistMode) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_stock_check(mut self, stock_check: StockCheck) -> Self {
        self.stock_check = stock_check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "@Rocketshoes:cart");
        assert_eq!(config.api_base_url, "http://localhost:3333");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.persist, PersistMode::BestEffort);
        assert_eq!(config.stock_check, StockCheck::Existing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_toml_partial() {
        let file = write_temp(
            ".toml",
            r#"
api_base_url = "https://shop.example.com/api"
persist = "strict"
stock_check = "requested"
storage_dir = "/tmp/cart"
"#,
        );

        let config = CartConfig::load(file.path()).unwrap();
        assert_eq!(config.api_base_url, "https://shop.example.com/api");
        assert_eq!(config.persist, PersistMode::Strict);
        assert_eq!(config.stock_check, StockCheck::Requested);
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/cart")));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{"storage_key": "cart", "request_timeout_ms": 250}"#);

        let config = CartConfig::load(file.path()).unwrap();
        assert_eq!(config.storage_key, "cart");
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = write_temp(".toml", "request_timeout_ms = 0\n");
        assert!(matches!(
            CartConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));

        let file = write_temp(".toml", "persist = \"sometimes\"\n");
        assert!(matches!(
            CartConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CartConfig::load("/nonexistent/cart.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
