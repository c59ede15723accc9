//! Integration tests for the repository CRUD surface.

use quarry::prelude::*;
use quarry_entity::product::specs;
use quarry_entity::{Customer, OrderStatus, Product};

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_add_then_get_round_trips() {
    let app = TestApp::new().await;
    let product = Product::new("SKU-1", "Stapler", 1299);

    let added = app.repo.add(product.clone()).await.unwrap();
    assert!(!added.id.is_transient());

    let fetched = app.repo.get_by_id::<Product>(added.id).await.unwrap();
    assert_eq!(fetched, Some(added));
}

#[tokio::test]
async fn test_add_range_assigns_distinct_ids() {
    let app = TestApp::new().await;
    let products = helpers::seed_ranked_products(&app.repo).await;

    let mut ids: Vec<_> = products.iter().map(|p| p.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
    assert!(ids.iter().all(|id| !id.is_transient()));
}

#[tokio::test]
async fn test_add_with_taken_id_conflicts() {
    let app = TestApp::new().await;
    let added = app.repo.add(Product::new("SKU-1", "Stapler", 1299)).await.unwrap();

    let mut duplicate = Product::new("SKU-2", "Tape", 199);
    duplicate.id = added.id;
    let err = app.repo.add(duplicate).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_get_missing_id_is_none() {
    let app = TestApp::new().await;
    let found = app.repo.get_by_id::<Customer>(EntityId(404)).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_update_then_get_reflects_changes() {
    let app = TestApp::new().await;
    let mut customer = helpers::add_customer(&app.repo, "Grace", "grace@example.com").await;

    customer.name = "Grace Hopper".to_string();
    customer.active = false;
    app.repo.update(&customer).await.unwrap();

    let fetched = app
        .repo
        .get_by_id::<Customer>(customer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.name, "Grace Hopper");
    assert!(!fetched.active);
}

#[tokio::test]
async fn test_update_of_never_added_entity_fails() {
    let app = TestApp::new().await;
    let mut ghost = Product::new("GHOST", "Ghost", 1);
    ghost.id = EntityId(77);

    let err = app.repo.update(&ghost).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(app.repo.list_all::<Product>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_then_get_is_none() {
    let app = TestApp::new().await;
    let product = app.repo.add(Product::new("SKU-1", "Stapler", 1299)).await.unwrap();

    app.repo.delete(&product).await.unwrap();
    assert!(app.repo.get_by_id::<Product>(product.id).await.unwrap().is_none());

    let err = app.repo.delete(&product).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_range_is_all_or_nothing() {
    let app = TestApp::new().await;
    let products = helpers::seed_ranked_products(&app.repo).await;
    app.repo.delete(&products[0]).await.unwrap();

    let err = app.repo.delete_range(&products[..3]).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(app.repo.list_all::<Product>().await.unwrap().len(), 9);

    app.repo.delete_range(&products[1..3]).await.unwrap();
    assert_eq!(app.repo.list_all::<Product>().await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_update_range_persists_every_entity() {
    let app = TestApp::new().await;
    let mut products = helpers::seed_ranked_products(&app.repo).await;
    for product in &mut products {
        product.discontinued = true;
    }
    app.repo.update_range(&products).await.unwrap();

    let listed = app.repo.list_all::<Product>().await.unwrap();
    assert!(listed.iter().all(|p| p.discontinued));
}

#[tokio::test]
async fn test_get_single_by_spec() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let none = app.repo.get_single_by_spec(&specs::by_sku("NOPE")).await.unwrap();
    assert!(none.is_none());

    let one = app
        .repo
        .get_single_by_spec(&specs::by_sku("RANK-05"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(one.price_cents, 5);

    // Several matches: the first in result order wins.
    let cheapest = app
        .repo
        .get_single_by_spec(&specs::in_price_range(3, 8))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cheapest.price_cents, 3);

    let dearest = app
        .repo
        .get_single_by_spec(
            &Specification::new()
                .filter(Product::PRICE_CENTS.lte(8))
                .order_by_descending(Product::PRICE_CENTS),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dearest.price_cents, 8);
}

#[tokio::test]
async fn test_concurrent_adds_get_distinct_ids() {
    let app = TestApp::new().await;
    let customer = helpers::add_customer(&app.repo, "Ada", "ada@example.com").await;

    let mut handles = Vec::new();
    for day in 1..=8 {
        let repo = app.repo.clone();
        let customer = customer.clone();
        handles.push(tokio::spawn(async move {
            helpers::add_order(&repo, &customer, OrderStatus::Pending, day, &[]).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}

#[tokio::test]
async fn test_stores_are_isolated() {
    let first = TestApp::new().await;
    let second = TestApp::new().await;
    helpers::seed_ranked_products(&first.repo).await;

    assert_eq!(first.repo.list_all::<Product>().await.unwrap().len(), 10);
    assert!(second.repo.list_all::<Product>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_with_largest_id() {
    let app = TestApp::new().await;
    let mut last = Product::new("MAX", "Last", 1);
    last.id = EntityId(i64::MAX);
    let added = app.repo.add(last).await.unwrap();
    assert_eq!(added.id, EntityId(i64::MAX));

    let err = app.repo.add(Product::new("NEXT", "Next", 2)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(app.repo.list_all::<Product>().await.unwrap(), vec![added]);
}
