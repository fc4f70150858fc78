//! Cart entry type.

use crate::catalog::ProductDetails;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One product in the cart and how many units of it.
///
/// Serialized flat: `{"id": 1, "amount": 2, "title": "...", "price": 179.9}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product identity.
    pub id: ProductId,
    /// Quantity, always at least 1.
    pub amount: u32,
    /// Product display fields, carried through unchanged.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl CartEntry {
    /// Create an entry with no display fields.
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self {
            id,
            amount,
            details: Map::new(),
        }
    }

    /// Create an entry holding one unit of a fetched product.
    pub fn from_product(product: ProductDetails) -> Self {
        let mut details = product.fields;
        // The cart owns `amount`; a service-side field of that name must not
        // collide with it on serialization.
        details.remove("amount");
        Self {
            id: product.id,
            amount: 1,
            details,
        }
    }

    /// Get a display field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.details.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_starts_at_one() {
        let product = ProductDetails::new(ProductId::new(3))
            .with_field("title", "Tênis VR Caminhada")
            .with_field("amount", 99);

        let entry = CartEntry::from_product(product);
        assert_eq!(entry.amount, 1);
        assert_eq!(entry.field("title"), Some(&Value::from("Tênis VR Caminhada")));
        assert_eq!(entry.field("amount"), None);
    }

    #[test]
    fn test_serializes_flat() {
        let mut entry = CartEntry::new(ProductId::new(1), 2);
        entry.details.insert("price".into(), Value::from(139.9));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "amount": 2, "price": 139.9}));

        let back: CartEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
