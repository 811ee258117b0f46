//! Cart, saved products and profile for a signed-in shopper
//!
//! Every operation is scoped to the user id resolved from the identity
//! token; items owned by another user behave as if they did not exist.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{AffilinkError, Result};
use crate::storage::{CartItem, Product, Profile, SavedProduct, SeaOrmStorage};
use crate::utils::round_money;

/// 购物车中的一行（带商品信息）
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: String,
    pub product_id: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    /// 商品已被删除时为 None
    pub product: Option<Product>,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub item_count: i64,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedEntry {
    pub id: String,
    pub product_id: String,
    pub created_at: DateTime<Utc>,
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedToggle {
    pub product_id: String,
    pub saved: bool,
}

/// 组装购物车视图，小计只统计仍存在的商品
pub fn build_cart_view(items: Vec<CartItem>, products: &[Product]) -> CartView {
    let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut subtotal = Decimal::ZERO;
    let mut item_count = 0i64;
    let lines = items
        .into_iter()
        .map(|item| {
            let product = by_id.get(item.product_id.as_str()).map(|p| (*p).clone());
            let line_total = product
                .as_ref()
                .map(|p| p.price * Decimal::from(item.quantity))
                .unwrap_or(Decimal::ZERO);
            let line_total = round_money(line_total);
            subtotal += line_total;
            item_count += i64::from(item.quantity);
            CartLine {
                id: item.id,
                product_id: item.product_id,
                quantity: item.quantity,
                created_at: item.created_at,
                product,
                line_total,
            }
        })
        .collect();

    CartView {
        items: lines,
        item_count,
        subtotal: round_money(subtotal),
    }
}

fn check_quantity(quantity: i32) -> Result<i32> {
    if quantity < 1 {
        return Err(AffilinkError::validation(format!(
            "Quantity must be at least 1, got {}",
            quantity
        )));
    }
    Ok(quantity)
}

pub struct ShopperService {
    storage: Arc<SeaOrmStorage>,
}

impl ShopperService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    async fn require_product(&self, product_id: &str) -> Result<Product> {
        if product_id.trim().is_empty() {
            return Err(AffilinkError::validation("Product ID is required"));
        }
        self.storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| AffilinkError::not_found(format!("Product '{}' not found", product_id)))
    }

    async fn products_for(&self, ids: impl Iterator<Item = &String>) -> Result<Vec<Product>> {
        let mut ids: Vec<String> = ids.cloned().collect();
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.storage.get_products_by_ids(&ids).await
    }

    // ============ Cart ============

    pub async fn add_to_cart(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: Option<i32>,
    ) -> Result<CartItem> {
        let quantity = check_quantity(quantity.unwrap_or(1))?;
        self.require_product(product_id).await?;
        let item = self.storage.add_to_cart(user_id, product_id, quantity).await?;
        info!(
            "ShopperService: user {} added {} x {} to cart",
            user_id, quantity, product_id
        );
        Ok(item)
    }

    pub async fn update_cart_quantity(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: i32,
    ) -> Result<CartItem> {
        let quantity = check_quantity(quantity)?;
        self.storage
            .update_cart_quantity(user_id, item_id, quantity)
            .await
    }

    pub async fn remove_from_cart(&self, user_id: &str, item_id: &str) -> Result<()> {
        if item_id.trim().is_empty() {
            return Err(AffilinkError::validation("Cart item ID is required"));
        }
        self.storage.remove_cart_item(user_id, item_id).await?;
        debug!("ShopperService: user {} removed cart item {}", user_id, item_id);
        Ok(())
    }

    pub async fn cart(&self, user_id: &str) -> Result<CartView> {
        let items = self.storage.list_cart(user_id).await?;
        let products = self.products_for(items.iter().map(|i| &i.product_id)).await?;
        Ok(build_cart_view(items, &products))
    }

    // ============ Saved products ============

    pub async fn toggle_saved(&self, user_id: &str, product_id: &str) -> Result<SavedToggle> {
        self.require_product(product_id).await?;
        let saved = self.storage.toggle_saved(user_id, product_id).await?;
        Ok(SavedToggle {
            product_id: product_id.to_string(),
            saved,
        })
    }

    pub async fn saved_products(&self, user_id: &str) -> Result<Vec<SavedEntry>> {
        let saved: Vec<SavedProduct> = self.storage.list_saved(user_id).await?;
        let products = self.products_for(saved.iter().map(|s| &s.product_id)).await?;
        let by_id: HashMap<&str, &Product> =
            products.iter().map(|p| (p.id.as_str(), p)).collect();

        Ok(saved
            .into_iter()
            .map(|s| SavedEntry {
                product: by_id.get(s.product_id.as_str()).map(|p| (*p).clone()),
                id: s.id,
                product_id: s.product_id,
                created_at: s.created_at,
            })
            .collect())
    }

    // ============ Profile ============

    /// 首次访问时按令牌信息创建资料
    pub async fn profile(&self, user_id: &str, email: Option<&str>) -> Result<Profile> {
        self.storage
            .ensure_profile(user_id, email.unwrap_or_default())
            .await
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        email: Option<&str>,
        full_name: Option<String>,
    ) -> Result<Profile> {
        self.profile(user_id, email).await?;
        let full_name = full_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self.storage.update_profile_name(user_id, full_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            category: "Supplements".to_string(),
            price: Decimal::new(cents, 2),
            affiliate_link: None,
            image_url: None,
            rating: None,
            review_count: 0,
            is_featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(id: &str, product_id: &str, quantity: i32) -> CartItem {
        CartItem {
            id: id.to_string(),
            user_id: "u1".to_string(),
            product_id: product_id.to_string(),
            quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_subtotal() {
        let products = vec![product("a", 1999), product("b", 500)];
        let view = build_cart_view(vec![item("1", "a", 2), item("2", "b", 3)], &products);

        assert_eq!(view.subtotal, Decimal::new(5498, 2));
        assert_eq!(view.item_count, 5);
        assert_eq!(view.items[0].line_total, Decimal::new(3998, 2));
    }

    #[test]
    fn test_cart_line_total_rounds_midpoint_up() {
        let mut products = vec![product("a", 0)];
        products[0].price = Decimal::new(125, 3);
        let view = build_cart_view(vec![item("1", "a", 1)], &products);

        assert_eq!(view.items[0].line_total, Decimal::new(13, 2));
        assert_eq!(view.subtotal, Decimal::new(13, 2));
    }

    #[test]
    fn test_cart_line_with_deleted_product() {
        let view = build_cart_view(vec![item("1", "gone", 4)], &[]);
        assert!(view.items[0].product.is_none());
        assert_eq!(view.items[0].line_total, Decimal::ZERO);
        assert_eq!(view.subtotal, Decimal::ZERO);
        assert_eq!(view.item_count, 4);
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(check_quantity(0).is_err());
        assert!(check_quantity(-2).is_err());
        assert_eq!(check_quantity(3).unwrap(), 3);
    }
}
