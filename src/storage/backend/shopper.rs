//! Cart and saved-product operations for SeaOrmStorage
//!
//! 所有操作都按 user_id 限定范围，别人的记录视为不存在。

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::{model_to_cart_item, model_to_saved_product};
use crate::errors::{AffilinkError, Result};
use crate::storage::models::{CartItem, SavedProduct};

use migration::entities::{cart_item, saved_product};

impl SeaOrmStorage {
    /// 加入购物车；同一商品已存在时累加数量
    pub async fn add_to_cart(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i32,
    ) -> Result<CartItem> {
        let existing = cart_item::Entity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询购物车失败: {}", e)))?;

        let model = match existing {
            Some(item) => {
                let new_quantity = item.quantity.saturating_add(quantity);
                let mut active = item.into_active_model();
                active.quantity = Set(new_quantity);
                active.update(&self.db).await
            }
            None => {
                cart_item::ActiveModel {
                    id: Set(uuid::Uuid::new_v4().to_string()),
                    user_id: Set(user_id.to_string()),
                    product_id: Set(product_id.to_string()),
                    quantity: Set(quantity),
                    created_at: Set(chrono::Utc::now()),
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| AffilinkError::database_operation(format!("写入购物车失败: {}", e)))?;

        debug!(
            "Cart item {} for user {} now has quantity {}",
            model.id, user_id, model.quantity
        );
        Ok(model_to_cart_item(model))
    }

    async fn find_owned_cart_item(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<Option<cart_item::Model>> {
        cart_item::Entity::find_by_id(item_id.to_string())
            .filter(cart_item::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询购物车失败: {}", e)))
    }

    pub async fn update_cart_quantity(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: i32,
    ) -> Result<CartItem> {
        let item = self
            .find_owned_cart_item(user_id, item_id)
            .await?
            .ok_or_else(|| AffilinkError::not_found(format!("Cart item not found: {}", item_id)))?;

        let mut active = item.into_active_model();
        active.quantity = Set(quantity);
        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("更新购物车失败: {}", e)))?;
        Ok(model_to_cart_item(model))
    }

    pub async fn remove_cart_item(&self, user_id: &str, item_id: &str) -> Result<()> {
        let result = cart_item::Entity::delete_many()
            .filter(cart_item::Column::Id.eq(item_id))
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("删除购物车条目失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AffilinkError::not_found(format!(
                "Cart item not found: {}",
                item_id
            )));
        }
        Ok(())
    }

    pub async fn list_cart(&self, user_id: &str) -> Result<Vec<CartItem>> {
        let models = cart_item::Entity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .order_by_desc(cart_item::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询购物车失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_cart_item).collect())
    }

    /// 收藏切换，返回切换后的状态（true = 已收藏）
    pub async fn toggle_saved(&self, user_id: &str, product_id: &str) -> Result<bool> {
        let existing = saved_product::Entity::find()
            .filter(saved_product::Column::UserId.eq(user_id))
            .filter(saved_product::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询收藏失败: {}", e)))?;

        match existing {
            Some(saved) => {
                saved_product::Entity::delete_by_id(saved.id)
                    .exec(&self.db)
                    .await
                    .map_err(|e| {
                        AffilinkError::database_operation(format!("取消收藏失败: {}", e))
                    })?;
                Ok(false)
            }
            None => {
                saved_product::ActiveModel {
                    id: Set(uuid::Uuid::new_v4().to_string()),
                    user_id: Set(user_id.to_string()),
                    product_id: Set(product_id.to_string()),
                    created_at: Set(chrono::Utc::now()),
                }
                .insert(&self.db)
                .await
                .map_err(|e| AffilinkError::database_operation(format!("收藏失败: {}", e)))?;
                Ok(true)
            }
        }
    }

    pub async fn list_saved(&self, user_id: &str) -> Result<Vec<SavedProduct>> {
        let models = saved_product::Entity::find()
            .filter(saved_product::Column::UserId.eq(user_id))
            .order_by_desc(saved_product::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询收藏失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_saved_product).collect())
    }
}
