//! Integration tests against a live PostgreSQL server.
//!
//! Skipped unless `QUARRY_TEST_DATABASE_URL` points at a disposable
//! database. The schema fixture drops and recreates its tables.

use quarry::core::config::DatabaseConfig;
use quarry::prelude::*;
use quarry_entity::order::specs as order_specs;
use quarry_entity::{Customer, Order, OrderItem, OrderStatus, Product};

use crate::helpers::{self, at};

const SCHEMA: &str = include_str!("../fixtures/schema.sql");

async fn repository() -> Option<StoreRepository<PgStore>> {
    let url = std::env::var("QUARRY_TEST_DATABASE_URL").ok()?;
    let store = PgStore::connect(&DatabaseConfig::new(url))
        .await
        .expect("Failed to connect to test database");
    sqlx::raw_sql(SCHEMA)
        .execute(store.pool())
        .await
        .expect("Failed to apply test schema");
    Some(StoreRepository::new(store))
}

// One scenario so the schema reset never races another test.
#[tokio::test]
async fn test_postgres_store_end_to_end() {
    let Some(repo) = repository().await else {
        return;
    };
    assert!(repo.store().health_check().await.unwrap());

    // Identity and explicit keys.
    let products = helpers::seed_ranked_products(&repo).await;
    assert!(products.iter().all(|p| !p.id.is_transient()));
    let mut pinned = Product::new("PIN", "Pinned", 50);
    pinned.id = EntityId(1000);
    let pinned = repo.add(pinned).await.unwrap();
    assert_eq!(pinned.id, EntityId(1000));
    let next = repo.add(Product::new("NEXT", "Next", 60)).await.unwrap();
    assert!(next.id > EntityId(1000));
    let mut duplicate = Product::new("DUP", "Duplicate", 70);
    duplicate.id = EntityId(1000);
    let err = repo.add(duplicate).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Ordering and paging.
    let ranked = Specification::new()
        .filter(Product::SKU.like("RANK-%"))
        .order_by(Product::PRICE_CENTS);
    let page = repo.list(&ranked.clone().paged(3, 4)).await.unwrap();
    assert_eq!(helpers::prices(&page), vec![4, 5, 6, 7]);
    assert!(repo.list(&ranked.clone().paged(0, 0)).await.unwrap().is_empty());
    assert_eq!(repo.count(&ranked.clone().paged(3, 4)).await.unwrap(), 10);
    let err = repo.list(&ranked.clone().paged(-2, 4)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    // Updates and deletes.
    let mut first = page[0].clone();
    first.discontinued = true;
    repo.update(&first).await.unwrap();
    let stored: Product = repo.get_by_id(first.id).await.unwrap().unwrap();
    assert!(stored.discontinued);
    repo.delete(&next).await.unwrap();
    let err = repo.delete(&next).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = repo.delete_range(&[pinned.clone(), next.clone()]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(repo.get_by_id::<Product>(pinned.id).await.unwrap().is_some());

    // Includes.
    let ada = helpers::add_customer(&repo, "Ada", "ada@example.com").await;
    let (pen, pad) = (&products[0], &products[1]);
    let open = helpers::add_order(&repo, &ada, OrderStatus::Pending, 3, &[(pen, 2), (pad, 1)]).await;
    helpers::add_order(&repo, &ada, OrderStatus::Delivered, 1, &[(pen, 1)]).await;

    let active = repo.list(&order_specs::active_for_customer(ada.id)).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].placed_at, at(3));
    assert_eq!(active[0].items.len(), 2);
    assert_eq!(active[0].items_total_cents(), open.total_cents);

    let full: Order = repo
        .get_single_by_spec(&order_specs::with_items(open.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.customer.as_deref().map(|c| c.id), Some(ada.id));
    assert!(full.items.iter().all(|item| item.product.is_some()));

    // Navigations are not persisted.
    let mut edited = full.clone();
    edited.note = Some("gift".to_string());
    repo.update(&edited).await.unwrap();
    let reloaded: Order = repo.get_by_id(open.id).await.unwrap().unwrap();
    assert_eq!(reloaded.note.as_deref(), Some("gift"));
    assert!(reloaded.items.is_empty());
    assert_eq!(repo.count(&Specification::<OrderItem>::new()).await.unwrap(), 3);

    let customers: Vec<Customer> = repo.list_all().await.unwrap();
    assert_eq!(customers.len(), 1);

    repo.store().close().await;
}
