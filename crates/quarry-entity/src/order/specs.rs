//! Named order queries.

use chrono::{DateTime, Utc};
use quarry_core::specification::Specification;
use quarry_core::types::EntityId;

use super::item::OrderItem;
use super::model::Order;
use super::status::OrderStatus;

/// Open orders of one customer, newest first, with their lines.
pub fn active_for_customer(customer_id: EntityId) -> Specification<Order> {
    Specification::new()
        .filter(Order::CUSTOMER_ID.eq(customer_id))
        .filter(Order::STATUS.is_in(OrderStatus::OPEN))
        .include(Order::ITEMS)
        .order_by_descending(Order::PLACED_AT)
}

/// One order with its lines, each line with its product, and the customer.
pub fn with_items(order_id: EntityId) -> Specification<Order> {
    Specification::new()
        .filter(Order::ID.eq(order_id))
        .include(Order::CUSTOMER)
        .include_path(Order::ITEMS.then(OrderItem::PRODUCT.name()))
}

/// Orders placed in `[from, to)`, oldest first.
pub fn placed_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Specification<Order> {
    Specification::new()
        .filter(Order::PLACED_AT.gte(from))
        .filter(Order::PLACED_AT.lt(to))
        .order_by(Order::PLACED_AT)
}

/// Orders in a status, largest first, one page at a time.
pub fn by_status_page(status: OrderStatus, skip: i64, take: i64) -> Specification<Order> {
    Specification::new()
        .filter(Order::STATUS.eq(status))
        .order_by_descending(Order::TOTAL_CENTS)
        .paged(skip, take)
}
