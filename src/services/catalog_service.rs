//! Product catalog service

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::errors::{AffilinkError, Result};
use crate::storage::{Product, ProductFilter, ProductInput, SeaOrmStorage};
use crate::utils::{round_money, validate_url};

/// 校验并规范化后台提交的商品
pub fn normalize_product_input(mut input: ProductInput) -> Result<ProductInput> {
    input.name = input.name.trim().to_string();
    input.category = input.category.trim().to_string();

    if input.name.is_empty() {
        return Err(AffilinkError::validation("Product name is required"));
    }
    if input.category.is_empty() {
        return Err(AffilinkError::validation("Product category is required"));
    }
    if input.price < Decimal::ZERO {
        return Err(AffilinkError::validation(format!(
            "Price must not be negative, got {}",
            input.price
        )));
    }
    if let Some(rating) = input.rating
        && !(0.0..=5.0).contains(&rating)
    {
        return Err(AffilinkError::validation(format!(
            "Rating must be between 0 and 5, got {}",
            rating
        )));
    }
    if input.review_count < 0 {
        return Err(AffilinkError::validation("Review count must not be negative"));
    }

    input.affiliate_link = normalize_link("affiliate_link", input.affiliate_link)?;
    input.image_url = normalize_link("image_url", input.image_url)?;
    input.price = round_money(input.price);

    Ok(input)
}

// 空字符串视为未设置
fn normalize_link(field: &str, value: Option<String>) -> Result<Option<String>> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(link) => {
            validate_url(&link)
                .map_err(|e| AffilinkError::validation(format!("Invalid {}: {}", field, e)))?;
            Ok(Some(link))
        }
        None => Ok(None),
    }
}

pub struct CatalogService {
    storage: Arc<SeaOrmStorage>,
}

impl CatalogService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        self.storage.list_products(filter).await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.storage
            .get_product(id)
            .await?
            .ok_or_else(|| AffilinkError::not_found(format!("Product '{}' not found", id)))
    }

    pub async fn list_categories(&self) -> Result<Vec<String>> {
        self.storage.list_categories().await
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product> {
        let input = normalize_product_input(input)?;
        let product = self.storage.create_product(&input).await?;
        info!("CatalogService: created product '{}' ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        let input = normalize_product_input(input)?;
        let product = self.storage.update_product(id, &input).await?;
        info!("CatalogService: updated product {}", id);
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.storage.delete_product(id).await?;
        info!("CatalogService: deleted product {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProductInput {
        ProductInput {
            name: "  Vitamin D3  ".to_string(),
            description: None,
            category: "Vitamins".to_string(),
            price: Decimal::new(1299, 2),
            affiliate_link: Some("https://shop.example.com/d3".to_string()),
            image_url: Some(String::new()),
            rating: Some(4.5),
            review_count: 10,
            is_featured: false,
        }
    }

    #[test]
    fn test_normalize_trims_and_clears_empty_links() {
        let normalized = normalize_product_input(input()).unwrap();
        assert_eq!(normalized.name, "Vitamin D3");
        assert_eq!(normalized.image_url, None);
        assert_eq!(
            normalized.affiliate_link.as_deref(),
            Some("https://shop.example.com/d3")
        );
    }

    #[test]
    fn test_price_midpoint_rounds_up() {
        let mut raw = input();
        raw.price = Decimal::new(12345, 3);
        let normalized = normalize_product_input(raw).unwrap();
        assert_eq!(normalized.price, Decimal::new(1235, 2));
    }

    #[test]
    fn test_rejects_missing_name_and_category() {
        let mut missing_name = input();
        missing_name.name = "   ".to_string();
        assert!(normalize_product_input(missing_name).is_err());

        let mut missing_category = input();
        missing_category.category = String::new();
        assert!(normalize_product_input(missing_category).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_numbers() {
        let mut negative_price = input();
        negative_price.price = Decimal::new(-1, 2);
        assert!(normalize_product_input(negative_price).is_err());

        let mut bad_rating = input();
        bad_rating.rating = Some(5.5);
        assert!(normalize_product_input(bad_rating).is_err());

        let mut bad_reviews = input();
        bad_reviews.review_count = -3;
        assert!(normalize_product_input(bad_reviews).is_err());
    }

    #[test]
    fn test_rejects_non_http_links() {
        let mut bad_link = input();
        bad_link.affiliate_link = Some("ftp://files.example.com".to_string());
        let err = normalize_product_input(bad_link).unwrap_err();
        assert!(matches!(err, AffilinkError::Validation(_)));
    }
}
