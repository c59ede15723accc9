//! Product entity model.

use quarry_core::specification::Field;
use quarry_core::types::EntityId;
use serde::{Deserialize, Serialize};

/// A sellable catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Surrogate key.
    #[serde(default)]
    pub id: EntityId,
    /// Stock keeping unit, unique per product.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Unit price in cents.
    pub price_cents: i64,
    /// Discontinued products can no longer be ordered.
    pub discontinued: bool,
}

quarry_core::entity! {
    Product {
        table: "products",
        columns: [sku, name, price_cents, discontinued],
        navigations: [],
    }
}

impl Product {
    pub const ID: Field<Product> = Field::new("id");
    pub const SKU: Field<Product> = Field::new("sku");
    pub const NAME: Field<Product> = Field::new("name");
    pub const PRICE_CENTS: Field<Product> = Field::new("price_cents");
    pub const DISCONTINUED: Field<Product> = Field::new("discontinued");

    /// Create a transient, orderable product.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            id: EntityId::TRANSIENT,
            sku: sku.into(),
            name: name.into(),
            price_cents,
            discontinued: false,
        }
    }
}
