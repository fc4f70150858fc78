//! Product details as served by the lookup service.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product as served by `GET /products/{id}`.
///
/// Only the id is interpreted. Display fields (title, price, image, ...) are
/// kept as-is so the UI gets back exactly what the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    /// Product identity.
    pub id: ProductId,
    /// Everything else the service returned.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ProductDetails {
    /// Create product details with no display fields.
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Add a display field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a display field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The product title, if the service sent one.
    pub fn title(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_carried_through() {
        let json = r#"{"id": 1, "title": "Tênis de Caminhada", "price": 179.9, "image": "https://cdn/1.jpg"}"#;
        let product: ProductDetails = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.title(), Some("Tênis de Caminhada"));
        assert_eq!(product.field("price"), Some(&Value::from(179.9)));
        assert!(!product.fields.contains_key("id"));

        let back: Value = serde_json::to_value(&product).unwrap();
        assert_eq!(back["image"], "https://cdn/1.jpg");
        assert_eq!(back["id"], 1);
    }
}
