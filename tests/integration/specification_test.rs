//! Integration tests for specification evaluation against a store.

use quarry::prelude::*;
use quarry_entity::order::specs as order_specs;
use quarry_entity::customer::specs as customer_specs;
use quarry_entity::{Customer, Order, OrderStatus, Product};

use crate::helpers::{self, TestApp, at};

/// Two customers, three products, and four orders across statuses.
async fn seed_orders(app: &TestApp) -> (Customer, Customer, Vec<Product>) {
    let ada = helpers::add_customer(&app.repo, "Ada", "ada@example.com").await;
    let bob = helpers::add_customer(&app.repo, "Bob", "bob@example.com").await;
    let products = app
        .repo
        .add_range(vec![
            Product::new("PEN", "Pen", 150),
            Product::new("PAD", "Notepad", 400),
            Product::new("INK", "Ink", 900),
        ])
        .await
        .unwrap();

    let (pen, pad, ink) = (&products[0], &products[1], &products[2]);
    helpers::add_order(&app.repo, &ada, OrderStatus::Pending, 3, &[(pen, 2), (pad, 1)]).await;
    helpers::add_order(&app.repo, &ada, OrderStatus::Paid, 5, &[(ink, 1)]).await;
    helpers::add_order(&app.repo, &ada, OrderStatus::Delivered, 1, &[(pen, 10)]).await;
    helpers::add_order(&app.repo, &bob, OrderStatus::Pending, 4, &[(pad, 3)]).await;

    (ada, bob, products)
}

#[tokio::test]
async fn test_spec_without_criteria_lists_everything() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let all = app.repo.list_all::<Product>().await.unwrap();
    let listed = app.repo.list(&Specification::<Product>::new()).await.unwrap();
    assert_eq!(listed, all);

    let ordered = app
        .repo
        .list(&Specification::new().order_by(Product::PRICE_CENTS))
        .await
        .unwrap();
    assert_eq!(helpers::prices(&ordered), (1..=10).collect::<Vec<_>>());
    let mut unordered = helpers::prices(&all);
    unordered.sort();
    assert_eq!(unordered, helpers::prices(&ordered));
}

#[tokio::test]
async fn test_ascending_key_takes_precedence() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let spec = Specification::new()
        .order_by_descending(Product::PRICE_CENTS)
        .order_by(Product::PRICE_CENTS);
    let listed = app.repo.list(&spec).await.unwrap();
    assert_eq!(helpers::prices(&listed), (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_active_orders_for_customer() {
    let app = TestApp::new().await;
    let (ada, _, _) = seed_orders(&app).await;

    let orders = app
        .repo
        .list(&order_specs::active_for_customer(ada.id))
        .await
        .unwrap();
    let days: Vec<_> = orders.iter().map(|o| o.placed_at).collect();
    assert_eq!(days, vec![at(5), at(3)]);
    assert_eq!(orders[1].items.len(), 2);
    assert_eq!(orders[1].items_total_cents(), orders[1].total_cents);
    assert!(orders.iter().all(|o| o.customer.is_none()));
}

#[tokio::test]
async fn test_nested_include_reaches_products() {
    let app = TestApp::new().await;
    let (_, bob, _) = seed_orders(&app).await;
    let bobs: Order = app
        .repo
        .get_single_by_spec(&Specification::new().filter(Order::CUSTOMER_ID.eq(bob.id)))
        .await
        .unwrap()
        .unwrap();

    let order = app
        .repo
        .get_single_by_spec(&order_specs::with_items(bobs.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.customer.as_deref().map(|c| c.email.as_str()), Some("bob@example.com"));
    assert_eq!(order.items.len(), 1);
    let product = order.items[0].product.as_deref().unwrap();
    assert_eq!(product.sku, "PAD");
}

#[tokio::test]
async fn test_collection_include_on_customers() {
    let app = TestApp::new().await;
    seed_orders(&app).await;

    let customers = app.repo.list(&customer_specs::active_with_orders()).await.unwrap();
    let names: Vec<_> = customers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Bob"]);
    assert_eq!(customers[0].orders.len(), 3);
    assert_eq!(customers[1].orders.len(), 1);
    assert_eq!(customers[1].orders[0].items.len(), 1);
}

#[tokio::test]
async fn test_count_ignores_ordering_includes_and_paging() {
    let app = TestApp::new().await;
    let (ada, _, _) = seed_orders(&app).await;

    let spec = order_specs::active_for_customer(ada.id).paged(1, 1);
    let count = app.repo.count(&spec).await.unwrap();

    let unpaged = Specification::<Order>::new().filter(spec.criteria().cloned().unwrap());
    let listed = app.repo.list(&unpaged).await.unwrap();
    assert_eq!(count, listed.len() as u64);
    assert_eq!(count, 2);
    assert_eq!(app.repo.list(&spec).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_filters_use_three_valued_logic() {
    let app = TestApp::new().await;
    let ada = helpers::add_customer(&app.repo, "Ada", "ada@example.com").await;
    let mut quiet = Order::new(ada.id, at(2));
    quiet.note = None;
    let mut chatty = Order::new(ada.id, at(3));
    chatty.note = Some("leave at door".to_string());
    app.repo.add_range(vec![quiet, chatty]).await.unwrap();

    let not_door = Specification::<Order>::new().filter(Order::NOTE.eq("leave at door").negate());
    assert!(app.repo.list(&not_door).await.unwrap().is_empty());

    let without_note = Specification::<Order>::new().filter(Order::NOTE.is_null());
    assert_eq!(app.repo.count(&without_note).await.unwrap(), 1);

    let door = Specification::<Order>::new().filter(Order::NOTE.ilike("%DOOR"));
    assert_eq!(app.repo.count(&door).await.unwrap(), 1);
}

#[tokio::test]
async fn test_customer_lookup_by_email() {
    let app = TestApp::new().await;
    seed_orders(&app).await;

    let found = app
        .repo
        .get_single_by_spec(&customer_specs::by_email("BOB@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Bob");
}

#[tokio::test]
async fn test_malformed_specs_are_invalid_arguments() {
    let app = TestApp::new().await;

    let unknown_include = Specification::<Order>::new().include_path("items.warehouse");
    let err = app.repo.list(&unknown_include).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    let unknown_column = Specification::<Order>::new().order_by(Field::named("shipped_at"));
    let err = app.repo.list(&unknown_column).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    let bad_operand = Specification::<Order>::new().filter(Filter::field(
        "status",
        FilterOp::In,
        "pending",
    ));
    let err = app.repo.count(&bad_operand).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_specs_are_reusable_and_serializable() {
    let app = TestApp::new().await;
    let (ada, _, _) = seed_orders(&app).await;
    let spec = order_specs::active_for_customer(ada.id);

    let first = app.repo.list(&spec).await.unwrap();
    let second = app.repo.list(&spec).await.unwrap();
    assert_eq!(first, second);

    let json = serde_json::to_string(&spec).unwrap();
    let restored: Specification<Order> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, spec);
    assert_eq!(app.repo.list(&restored).await.unwrap(), first);
}

#[tokio::test]
async fn test_restored_spec_keeps_timestamp_shaped_text() {
    let app = TestApp::new().await;
    let ada = helpers::add_customer(&app.repo, "Ada", "ada@example.com").await;
    let mut gift = Order::new(ada.id, at(2));
    gift.note = Some("gift".to_string());
    let mut dated = Order::new(ada.id, at(3));
    dated.note = Some("2024-03-01T00:00:00Z".to_string());
    app.repo.add_range(vec![gift, dated]).await.unwrap();

    let spec = Specification::<Order>::new().filter(Order::NOTE.eq("2024-03-01T00:00:00Z"));
    let json = serde_json::to_string(&spec).unwrap();
    let restored: Specification<Order> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, spec);

    let listed = app.repo.list(&restored).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].placed_at, at(3));

    let placed = Specification::<Order>::new().filter(Order::PLACED_AT.gte(at(3)));
    let restored: Specification<Order> =
        serde_json::from_str(&serde_json::to_string(&placed).unwrap()).unwrap();
    assert_eq!(restored, placed);
    assert_eq!(app.repo.count(&restored).await.unwrap(), 1);
}
