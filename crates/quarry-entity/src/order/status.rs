//! Order status enumeration.

use std::fmt;
use std::str::FromStr;

use quarry_core::error::AppError;
use quarry_core::types::FieldValue;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting payment.
    Pending,
    /// Payment captured.
    Paid,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before shipping.
    Cancelled,
}

impl OrderStatus {
    /// Statuses of orders that still need work.
    pub const OPEN: [OrderStatus; 2] = [Self::Pending, Self::Paid];

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::invalid_argument(format!(
                "Unknown order status '{other}'"
            ))),
        }
    }
}

// Stored as its serde name so filters compare against the persisted text.
impl From<OrderStatus> for FieldValue {
    fn from(status: OrderStatus) -> Self {
        FieldValue::Text(status.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_matches_serde_name() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let json = serde_json::to_value(status).expect("serialize");
            assert_eq!(FieldValue::from(status), FieldValue::Text(json.as_str().unwrap_or_default().to_string()));
            assert_eq!(status.as_str().parse::<OrderStatus>().expect("parse"), status);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!("lost".parse::<OrderStatus>().is_err());
    }
}
