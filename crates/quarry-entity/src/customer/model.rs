//! Customer entity model.

use chrono::{DateTime, Utc};
use quarry_core::specification::{Field, Navigation};
use quarry_core::types::EntityId;
use serde::{Deserialize, Serialize};

use crate::order::Order;

/// A customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Surrogate key.
    #[serde(default)]
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Contact email, unique per customer.
    pub email: String,
    /// Whether the account may place orders.
    pub active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Orders placed by this customer. Only populated when included.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<Order>,
}

quarry_core::entity! {
    Customer {
        table: "customers",
        columns: [name, email, active, created_at],
        navigations: [orders => Collection(Order, "customer_id")],
    }
}

impl Customer {
    pub const ID: Field<Customer> = Field::new("id");
    pub const NAME: Field<Customer> = Field::new("name");
    pub const EMAIL: Field<Customer> = Field::new("email");
    pub const ACTIVE: Field<Customer> = Field::new("active");
    pub const CREATED_AT: Field<Customer> = Field::new("created_at");

    pub const ORDERS: Navigation<Customer> = Navigation::new("orders");

    /// Create a transient customer.
    pub fn new(name: impl Into<String>, email: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: EntityId::TRANSIENT,
            name: name.into(),
            email: email.into(),
            active: true,
            created_at,
            orders: Vec::new(),
        }
    }
}
