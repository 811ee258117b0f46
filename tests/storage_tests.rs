//! Storage integration tests
//!
//! Runs the SeaORM backend against a throwaway SQLite file with migrations applied.

use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use affilink::analytics::{ClickStore, NewClick};
use affilink::config::DatabaseConfig;
use affilink::errors::AffilinkError;
use affilink::storage::backend::PRODUCT_ID_CHUNK;
use affilink::storage::{
    ProductFilter, ProductInput, SeaOrmStorage, StorageFactory, SubscriberStatus,
};

// =============================================================================
// Test Setup
// =============================================================================

async fn create_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("storage_test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };
    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    (storage, temp_dir)
}

fn product_input(name: &str, category: &str, featured: bool) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        category: category.to_string(),
        price: Decimal::new(1999, 2),
        affiliate_link: Some("https://partner.example.com/item".to_string()),
        image_url: None,
        rating: Some(4.5),
        review_count: 12,
        is_featured: featured,
    }
}

fn click(product_id: &str, user_id: Option<&str>) -> NewClick {
    NewClick {
        product_id: product_id.to_string(),
        user_id: user_id.map(str::to_string),
        ip_address: "203.0.113.7".to_string(),
        user_agent: "Mozilla/5.0".to_string(),
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_product_crud() {
    let (storage, _dir) = create_storage().await;

    let created = storage
        .create_product(&product_input("Whey Protein", "Supplements", false))
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.price, Decimal::new(1999, 2));

    let mut input = product_input("Whey Protein Isolate", "Supplements", true);
    input.price = Decimal::new(2499, 2);
    let updated = storage.update_product(&created.id, &input).await.unwrap();
    assert_eq!(updated.name, "Whey Protein Isolate");
    assert!(updated.is_featured);

    storage.delete_product(&created.id).await.unwrap();
    assert!(storage.get_product(&created.id).await.unwrap().is_none());

    let err = storage.delete_product(&created.id).await.unwrap_err();
    assert!(matches!(err, AffilinkError::NotFound(_)));
}

#[tokio::test]
async fn test_product_filters_and_categories() {
    let (storage, _dir) = create_storage().await;

    storage
        .create_product(&product_input("Yoga Mat", "Fitness", true))
        .await
        .unwrap();
    storage
        .create_product(&product_input("Resistance Bands", "Fitness", false))
        .await
        .unwrap();
    storage
        .create_product(&product_input("Vitamin D", "Supplements", false))
        .await
        .unwrap();

    let fitness = storage
        .list_products(&ProductFilter {
            category: Some("Fitness".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(fitness.len(), 2);

    let featured = storage
        .list_products(&ProductFilter {
            featured: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].name, "Yoga Mat");

    // 搜索不区分大小写
    let search = storage
        .list_products(&ProductFilter {
            search: Some("vitamin".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(search.len(), 1);

    let categories = storage.list_categories().await.unwrap();
    assert_eq!(categories, vec!["Fitness".to_string(), "Supplements".to_string()]);
    assert_eq!(storage.count_products().await.unwrap(), 3);
}

#[tokio::test]
async fn test_products_by_ids_spans_multiple_chunks() {
    let (storage, _dir) = create_storage().await;

    let first = storage
        .create_product(&product_input("Creatine", "Supplements", false))
        .await
        .unwrap();
    let last = storage
        .create_product(&product_input("Electrolytes", "Supplements", false))
        .await
        .unwrap();

    // 真实 id 分别落在第一批和最后一批，中间全是不存在的 id
    let mut ids = vec![first.id.clone()];
    ids.extend((0..PRODUCT_ID_CHUNK * 2).map(|i| format!("missing-{}", i)));
    ids.push(last.id.clone());

    let mut found: Vec<String> = storage
        .get_products_by_ids(&ids)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    found.sort();
    let mut expected = vec![first.id, last.id];
    expected.sort();
    assert_eq!(found, expected);

    assert!(storage.get_products_by_ids(&[]).await.unwrap().is_empty());
}

// =============================================================================
// Clicks
// =============================================================================

#[tokio::test]
async fn test_click_insert_convert_and_list() {
    let (storage, _dir) = create_storage().await;

    let first = storage.insert_click(click("p1", Some("user-1"))).await.unwrap();
    let second = storage.insert_click(click("p2", None)).await.unwrap();
    assert_ne!(first, second);

    assert!(
        storage
            .mark_converted(first, Decimal::new(4250, 2))
            .await
            .unwrap()
    );
    assert!(!storage.mark_converted(9999, Decimal::ONE).await.unwrap());

    let all = storage.list_clicks(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let mine = storage.list_clicks(Some("user-1")).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(mine[0].conversion);
    assert_eq!(mine[0].revenue, Some(Decimal::new(4250, 2)));
    assert_eq!(mine[0].ip_address, "203.0.113.7");

    let anonymous = all.iter().find(|c| c.id == second).unwrap();
    assert_eq!(anonymous.user_id, None);
    assert!(!anonymous.conversion);
    assert_eq!(storage.count_clicks().await.unwrap(), 2);
}

#[tokio::test]
async fn test_reconverting_same_revenue_still_found() {
    let (storage, _dir) = create_storage().await;
    let id = storage.insert_click(click("p1", None)).await.unwrap();

    assert!(storage.mark_converted(id, Decimal::TEN).await.unwrap());
    assert!(storage.mark_converted(id, Decimal::TEN).await.unwrap());
}

// =============================================================================
// Shopper
// =============================================================================

#[tokio::test]
async fn test_cart_merges_quantity_and_scopes_by_user() {
    let (storage, _dir) = create_storage().await;
    let product = storage
        .create_product(&product_input("Kettlebell", "Fitness", false))
        .await
        .unwrap();

    let first = storage.add_to_cart("user-1", &product.id, 1).await.unwrap();
    let merged = storage.add_to_cart("user-1", &product.id, 2).await.unwrap();
    assert_eq!(first.id, merged.id);
    assert_eq!(merged.quantity, 3);

    // 其他用户不能修改或删除
    let err = storage
        .update_cart_quantity("user-2", &first.id, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AffilinkError::NotFound(_)));
    let err = storage.remove_cart_item("user-2", &first.id).await.unwrap_err();
    assert!(matches!(err, AffilinkError::NotFound(_)));

    storage.remove_cart_item("user-1", &first.id).await.unwrap();
    assert!(storage.list_cart("user-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_saved_flips_state() {
    let (storage, _dir) = create_storage().await;

    assert!(storage.toggle_saved("user-1", "p1").await.unwrap());
    assert_eq!(storage.list_saved("user-1").await.unwrap().len(), 1);
    assert!(!storage.toggle_saved("user-1", "p1").await.unwrap());
    assert!(storage.list_saved("user-1").await.unwrap().is_empty());
}

// =============================================================================
// Profiles & Newsletter
// =============================================================================

#[tokio::test]
async fn test_profile_and_admin_flag() {
    let (storage, _dir) = create_storage().await;

    let profile = storage
        .ensure_profile("user-1", "shopper@example.com")
        .await
        .unwrap();
    assert!(!profile.is_admin);

    // 再次调用不会覆盖已有资料
    let again = storage
        .ensure_profile("user-1", "other@example.com")
        .await
        .unwrap();
    assert_eq!(again.email, "shopper@example.com");

    let admin = storage.set_admin("user-1", None, true).await.unwrap();
    assert!(admin.is_admin);

    let err = storage.set_admin("ghost", None, true).await.unwrap_err();
    assert!(matches!(err, AffilinkError::NotFound(_)));
    assert_eq!(storage.count_profiles().await.unwrap(), 1);
}

#[tokio::test]
async fn test_subscriber_status_changes() {
    let (storage, _dir) = create_storage().await;

    let subscriber = storage
        .insert_subscriber("reader@example.com", Some("Reader".to_string()))
        .await
        .unwrap();
    assert_eq!(subscriber.status, SubscriberStatus::Subscribed);

    let unsubscribed = storage
        .set_subscriber_status("reader@example.com", SubscriberStatus::Unsubscribed)
        .await
        .unwrap();
    assert_eq!(unsubscribed.status, SubscriberStatus::Unsubscribed);

    let err = storage
        .set_subscriber_status("missing@example.com", SubscriberStatus::Unsubscribed)
        .await
        .unwrap_err();
    assert!(matches!(err, AffilinkError::NotFound(_)));
    assert_eq!(storage.count_subscribers().await.unwrap(), 1);
}

#[tokio::test]
async fn test_resubscribe_updates_name_when_given() {
    let (storage, _dir) = create_storage().await;

    storage
        .insert_subscriber("reader@example.com", Some("Old Name".to_string()))
        .await
        .unwrap();
    storage
        .set_subscriber_status("reader@example.com", SubscriberStatus::Unsubscribed)
        .await
        .unwrap();

    // 不带名字时保留原值
    let kept = storage.resubscribe("reader@example.com", None).await.unwrap();
    assert_eq!(kept.status, SubscriberStatus::Subscribed);
    assert_eq!(kept.full_name.as_deref(), Some("Old Name"));

    let renamed = storage
        .resubscribe("reader@example.com", Some("New Name".to_string()))
        .await
        .unwrap();
    assert_eq!(renamed.full_name.as_deref(), Some("New Name"));
}
