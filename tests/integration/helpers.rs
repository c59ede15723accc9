//! Shared test helpers for integration tests.

use chrono::{DateTime, TimeZone, Utc};

use quarry::core::config::AppConfig;
use quarry::prelude::*;
use quarry_entity::{Customer, Order, OrderItem, OrderStatus, Product};

/// Configuration used by the in-memory tests.
pub const TEST_CONFIG: &str = include_str!("../fixtures/test_config.toml");

/// Price keys of the ranked product fixture, in insertion order.
pub const RANKED_PRICES: [i64; 10] = [7, 3, 10, 1, 5, 9, 2, 8, 4, 6];

/// Test application context with a fresh store.
pub struct TestApp {
    /// Repository over the configured store.
    pub repo: StoreRepository<AnyStore>,
}

impl TestApp {
    /// Create a context over a new, empty in-memory store.
    pub async fn new() -> Self {
        let config = AppConfig::from_toml(TEST_CONFIG).expect("Failed to parse test config");
        let repo = quarry::from_config(&config)
            .await
            .expect("Failed to open test store");
        Self { repo }
    }
}

/// A whole-second UTC timestamp on day `day` of March 2024.
///
/// Whole seconds survive a round trip through `TIMESTAMPTZ` unchanged.
pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 10, 30, 0)
        .single()
        .expect("valid fixture date")
}

/// Add ten products whose prices are 1..=10 cents, inserted out of order.
pub async fn seed_ranked_products<R: Repository>(repo: &R) -> Vec<Product> {
    let products = RANKED_PRICES
        .iter()
        .map(|price| Product::new(format!("RANK-{price:02}"), format!("Ranked {price}"), *price))
        .collect();
    repo.add_range(products).await.expect("Failed to seed products")
}

/// Add a customer.
pub async fn add_customer<R: Repository>(repo: &R, name: &str, email: &str) -> Customer {
    repo.add(Customer::new(name, email, at(1)))
        .await
        .expect("Failed to add customer")
}

/// Add an order in `status` with one line per `(product, quantity)`.
pub async fn add_order<R: Repository>(
    repo: &R,
    customer: &Customer,
    status: OrderStatus,
    day: u32,
    lines: &[(&Product, i64)],
) -> Order {
    let mut order = Order::new(customer.id, at(day));
    order.status = status;
    order.total_cents = lines
        .iter()
        .map(|(product, quantity)| product.price_cents * quantity)
        .sum();
    let order = repo.add(order).await.expect("Failed to add order");

    let items = lines
        .iter()
        .map(|(product, quantity)| OrderItem::new(order.id, product, *quantity))
        .collect();
    repo.add_range(items).await.expect("Failed to add order items");
    order
}

/// Prices of `products`, in order.
pub fn prices(products: &[Product]) -> Vec<i64> {
    products.iter().map(|p| p.price_cents).collect()
}
