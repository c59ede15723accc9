//! Integration tests for skip/take paging.

use quarry::prelude::*;
use quarry_entity::Product;
use quarry_entity::product::specs as product_specs;

use crate::helpers::{self, TestApp};

fn by_price() -> Specification<Product> {
    Specification::new().order_by(Product::PRICE_CENTS)
}

#[tokio::test]
async fn test_skip_then_take_after_ordering() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let page = app.repo.list(&by_price().paged(3, 4)).await.unwrap();
    assert_eq!(helpers::prices(&page), vec![4, 5, 6, 7]);

    let tail = app.repo.list(&by_price().paged(8, 5)).await.unwrap();
    assert_eq!(helpers::prices(&tail), vec![9, 10]);

    let past_end = app.repo.list(&by_price().paged(20, 5)).await.unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn test_non_positive_take_is_empty() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    for take in [0, -1] {
        let page = app.repo.list(&by_price().paged(0, take)).await.unwrap();
        assert!(page.is_empty(), "take {take} returned rows");
    }
}

#[tokio::test]
async fn test_negative_skip_is_invalid() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let err = app.repo.list(&by_price().paged(-1, 4)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_disabled_paging_ignores_window() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let rows = app.repo.list(&by_price().paged(3, 4).unpaged()).await.unwrap();
    assert_eq!(helpers::prices(&rows), (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_pages_partition_the_ordered_set() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let mut seen = Vec::new();
    for skip in (0..10).step_by(3) {
        let page = app.repo.list(&by_price().paged(skip, 3)).await.unwrap();
        seen.extend(helpers::prices(&page));
    }
    assert_eq!(seen, (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_list_page_reports_totals() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let spec = Specification::new()
        .filter(Product::PRICE_CENTS.gt(2))
        .order_by(Product::PRICE_CENTS)
        .page(PageRequest::new(2, 3));
    let page = app.repo.list_page(&spec).await.unwrap();

    assert_eq!(helpers::prices(&page.items), vec![6, 7, 8]);
    assert_eq!(page.page, 2);
    assert_eq!(page.total_items, 8);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next);
    assert!(page.has_previous);

    let unpaged = app.repo.list_page(&by_price()).await.unwrap();
    assert_eq!(unpaged.total_items, 10);
    assert_eq!(unpaged.total_pages, 1);
}

#[tokio::test]
async fn test_catalog_page_orders_by_sku() {
    let app = TestApp::new().await;
    helpers::seed_ranked_products(&app.repo).await;

    let page = app.repo.list(&product_specs::catalog_page(0, 2)).await.unwrap();
    let skus: Vec<_> = page.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, vec!["RANK-01", "RANK-02"]);
}
