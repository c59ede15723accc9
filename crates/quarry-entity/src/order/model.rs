//! Order entity model.

use chrono::{DateTime, Utc};
use quarry_core::specification::{Field, Navigation};
use quarry_core::types::EntityId;
use serde::{Deserialize, Serialize};

use super::item::OrderItem;
use super::status::OrderStatus;
use crate::customer::Customer;

/// An order placed by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Surrogate key.
    #[serde(default)]
    pub id: EntityId,
    /// The customer who placed the order.
    pub customer_id: EntityId,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Order total in cents.
    pub total_cents: i64,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Free-form note from the customer.
    pub note: Option<String>,
    /// Order lines. Only populated when included.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,
    /// The placing customer. Only populated when included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Box<Customer>>,
}

quarry_core::entity! {
    Order {
        table: "orders",
        columns: [customer_id, status, total_cents, placed_at, note],
        navigations: [
            items => Collection(OrderItem, "order_id"),
            customer => Reference(Customer, "customer_id"),
        ],
    }
}

impl Order {
    pub const ID: Field<Order> = Field::new("id");
    pub const CUSTOMER_ID: Field<Order> = Field::new("customer_id");
    pub const STATUS: Field<Order> = Field::new("status");
    pub const TOTAL_CENTS: Field<Order> = Field::new("total_cents");
    pub const PLACED_AT: Field<Order> = Field::new("placed_at");
    pub const NOTE: Field<Order> = Field::new("note");

    pub const ITEMS: Navigation<Order> = Navigation::new("items");
    pub const CUSTOMER: Navigation<Order> = Navigation::new("customer");

    /// Create a transient pending order with no lines.
    pub fn new(customer_id: EntityId, placed_at: DateTime<Utc>) -> Self {
        Self {
            id: EntityId::TRANSIENT,
            customer_id,
            status: OrderStatus::Pending,
            total_cents: 0,
            placed_at,
            note: None,
            items: Vec::new(),
            customer: None,
        }
    }

    /// Sum of the included order lines.
    pub fn items_total_cents(&self) -> i64 {
        self.items.iter().map(OrderItem::line_total_cents).sum()
    }
}
