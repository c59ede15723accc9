//! Named product queries.

use quarry_core::specification::Specification;

use super::model::Product;

/// The product with the given SKU.
pub fn by_sku(sku: &str) -> Specification<Product> {
    Specification::new().filter(Product::SKU.eq(sku))
}

/// Orderable products priced within `min_cents..=max_cents`, cheapest first.
pub fn in_price_range(min_cents: i64, max_cents: i64) -> Specification<Product> {
    Specification::new()
        .filter(Product::PRICE_CENTS.gte(min_cents))
        .filter(Product::PRICE_CENTS.lte(max_cents))
        .filter(Product::DISCONTINUED.eq(false))
        .order_by(Product::PRICE_CENTS)
}

/// Every product in SKU order, one page at a time.
pub fn catalog_page(skip: i64, take: i64) -> Specification<Product> {
    Specification::new().order_by(Product::SKU).paged(skip, take)
}
