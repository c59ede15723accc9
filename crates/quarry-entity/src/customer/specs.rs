//! Named customer queries.

use quarry_core::specification::Specification;

use super::model::Customer;

/// The customer with the given email, compared case-insensitively.
pub fn by_email(email: &str) -> Specification<Customer> {
    Specification::new().filter(Customer::EMAIL.ilike(escape_like(email)))
}

/// Active customers ordered by name, with their orders and order lines.
pub fn active_with_orders() -> Specification<Customer> {
    Specification::new()
        .filter(Customer::ACTIVE.eq(true))
        .include(Customer::ORDERS)
        .include_path(Customer::ORDERS.then("items"))
        .order_by(Customer::NAME)
}

/// Customers whose name contains `fragment`, case-insensitively.
pub fn name_contains(fragment: &str) -> Specification<Customer> {
    Specification::new()
        .filter(Customer::NAME.ilike(format!("%{}%", escape_like(fragment))))
        .order_by(Customer::NAME)
}

/// Escape `LIKE` wildcards so `value` matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
