//! Order line entity model.

use quarry_core::specification::{Field, Navigation};
use quarry_core::types::EntityId;
use serde::{Deserialize, Serialize};

use crate::product::Product;

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Surrogate key.
    #[serde(default)]
    pub id: EntityId,
    /// The owning order.
    pub order_id: EntityId,
    /// The ordered product.
    pub product_id: EntityId,
    /// Units ordered.
    pub quantity: i64,
    /// Unit price in cents at the time of ordering.
    pub unit_price_cents: i64,
    /// The ordered product. Only populated when included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Box<Product>>,
}

quarry_core::entity! {
    OrderItem {
        table: "order_items",
        columns: [order_id, product_id, quantity, unit_price_cents],
        navigations: [product => Reference(Product, "product_id")],
    }
}

impl OrderItem {
    pub const ORDER_ID: Field<OrderItem> = Field::new("order_id");
    pub const PRODUCT_ID: Field<OrderItem> = Field::new("product_id");
    pub const QUANTITY: Field<OrderItem> = Field::new("quantity");

    pub const PRODUCT: Navigation<OrderItem> = Navigation::new("product");

    /// Create a transient line for `product` at its current price.
    pub fn new(order_id: EntityId, product: &Product, quantity: i64) -> Self {
        Self {
            id: EntityId::TRANSIENT,
            order_id,
            product_id: product.id,
            quantity,
            unit_price_cents: product.price_cents,
            product: None,
        }
    }

    /// Quantity times unit price.
    pub fn line_total_cents(&self) -> i64 {
        self.quantity * self.unit_price_cents
    }
}
