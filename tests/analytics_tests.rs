//! Analytics service integration tests
//!
//! Exercises click recording, conversion updates and report generation
//! end to end against a SQLite database.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use tempfile::TempDir;

use affilink::analytics::AggregationScope;
use affilink::config::{AffiliateConfig, DatabaseConfig};
use affilink::errors::AffilinkError;
use affilink::services::AnalyticsService;
use affilink::storage::{ProductInput, SeaOrmStorage, StorageFactory};
use affilink::utils::RequestMeta;

// =============================================================================
// Test Setup
// =============================================================================

async fn create_service() -> (AnalyticsService, Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        database_url: format!(
            "sqlite://{}?mode=rwc",
            temp_dir.path().join("analytics_test.db").display()
        ),
        ..Default::default()
    };
    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    let service = AnalyticsService::new(storage.clone(), AffiliateConfig::default());
    (service, storage, temp_dir)
}

fn meta() -> RequestMeta {
    RequestMeta {
        ip_address: "192.0.2.1".to_string(),
        user_agent: "curl/8.0".to_string(),
    }
}

async fn click(service: &AnalyticsService, product: &str, user: Option<&str>) -> i64 {
    service
        .track_click(product, user.map(str::to_string), meta())
        .await
        .click_id()
        .expect("click persisted")
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_site_report_totals_and_ranking() {
    let (service, storage, _dir) = create_service().await;
    let product = storage
        .create_product(&ProductInput {
            name: "Protein Bar".to_string(),
            description: None,
            category: "Nutrition".to_string(),
            price: Decimal::new(299, 2),
            affiliate_link: None,
            image_url: None,
            rating: None,
            review_count: 0,
            is_featured: false,
        })
        .await
        .unwrap();

    let a1 = click(&service, &product.id, Some("u1")).await;
    click(&service, &product.id, None).await;
    let b1 = click(&service, "deleted-product", Some("u2")).await;

    service
        .track_conversion(a1, Decimal::from_str("10.00").unwrap())
        .await
        .unwrap();
    service
        .track_conversion(b1, Decimal::from_str("5.25").unwrap())
        .await
        .unwrap();

    let report = service
        .report(AggregationScope::SiteWide, Some(0))
        .await
        .unwrap();
    assert_eq!(report.totals.total_clicks, 3);
    assert_eq!(report.totals.total_conversions, 2);
    assert_eq!(report.totals.total_revenue, Decimal::from_str("15.25").unwrap());
    assert_eq!(report.totals.conversion_rate, "66.67");
    assert_eq!(report.totals.unique_products, 2);

    assert_eq!(report.top_products[0].product_id, product.id);
    assert_eq!(report.top_products[0].clicks, 2);
    assert_eq!(
        report.top_products[0].product.as_ref().map(|p| p.name.as_str()),
        Some("Protein Bar")
    );
    // 已删除商品的分组仍然保留
    assert_eq!(report.top_products[1].product_id, "deleted-product");
    assert!(report.top_products[1].product.is_none());

    assert_eq!(report.recent_clicks.len(), 3);
    assert_eq!(report.recent_clicks[0].id, b1);
    assert_eq!(report.daily_clicks.iter().map(|d| d.clicks).sum::<usize>(), 3);
}

#[tokio::test]
async fn test_user_report_only_sees_own_clicks() {
    let (service, _storage, _dir) = create_service().await;

    for product in ["A", "A", "B"] {
        click(&service, product, Some("u1")).await;
    }
    click(&service, "C", Some("u2")).await;
    click(&service, "C", None).await;

    let report = service
        .report(AggregationScope::User("u1".to_string()), None)
        .await
        .unwrap();
    assert_eq!(report.totals.total_clicks, 3);
    assert_eq!(report.totals.conversion_rate, "0.00");
    let ids: Vec<&str> = report
        .top_products
        .iter()
        .map(|p| p.product_id.as_str())
        .collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[tokio::test]
async fn test_empty_history_reports_literal_zero() {
    let (service, _storage, _dir) = create_service().await;

    let report = service
        .report(AggregationScope::User("nobody".to_string()), None)
        .await
        .unwrap();
    assert_eq!(report.totals.total_clicks, 0);
    assert_eq!(report.totals.conversion_rate, "0");
    assert_eq!(report.totals.total_revenue, Decimal::ZERO);
    assert!(report.top_products.is_empty());
    assert!(report.daily_clicks.is_empty());
}

#[tokio::test]
async fn test_report_rejects_out_of_range_offset() {
    let (service, _storage, _dir) = create_service().await;

    let err = service
        .report(AggregationScope::SiteWide, Some(24 * 60))
        .await
        .unwrap_err();
    assert!(matches!(err, AffilinkError::Validation(_)));
}

#[tokio::test]
async fn test_report_survives_click_fetch_failure() {
    let (service, storage, _dir) = create_service().await;
    click(&service, "A", Some("u1")).await;

    storage
        .get_db()
        .execute_unprepared("DROP TABLE affiliate_clicks")
        .await
        .unwrap();

    let report = service
        .report(AggregationScope::SiteWide, None)
        .await
        .unwrap();
    assert_eq!(report.totals.total_clicks, 0);
    assert_eq!(report.totals.total_conversions, 0);
    assert_eq!(report.totals.total_revenue, Decimal::ZERO);
    assert_eq!(report.totals.conversion_rate, "0");
    assert!(report.top_products.is_empty());
    assert!(report.recent_clicks.is_empty());
}

#[tokio::test]
async fn test_report_survives_product_fetch_failure() {
    let (service, storage, _dir) = create_service().await;
    click(&service, "A", None).await;
    click(&service, "A", None).await;
    click(&service, "B", None).await;

    storage
        .get_db()
        .execute_unprepared("DROP TABLE products")
        .await
        .unwrap();

    let report = service
        .report(AggregationScope::SiteWide, None)
        .await
        .unwrap();
    assert_eq!(report.totals.total_clicks, 3);
    assert_eq!(report.top_products.len(), 2);
    assert_eq!(report.top_products[0].product_id, "A");
    assert!(report.top_products.iter().all(|p| p.product.is_none()));
}

// =============================================================================
// Conversions
// =============================================================================

#[tokio::test]
async fn test_conversion_overwrites_previous_revenue() {
    let (service, _storage, _dir) = create_service().await;
    let id = click(&service, "A", None).await;

    service.track_conversion(id, Decimal::from(20)).await.unwrap();
    service.track_conversion(id, Decimal::from(35)).await.unwrap();

    let report = service
        .report(AggregationScope::SiteWide, None)
        .await
        .unwrap();
    assert_eq!(report.totals.total_conversions, 1);
    assert_eq!(report.totals.total_revenue, Decimal::from(35));
}

#[tokio::test]
async fn test_conversion_for_missing_click() {
    let (service, _storage, _dir) = create_service().await;

    let err = service
        .track_conversion(404, Decimal::ONE)
        .await
        .unwrap_err();
    assert!(matches!(err, AffilinkError::NotFound(_)));
}
