//! Product catalog operations for SeaOrmStorage

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{model_to_product, product_input_to_active_model};
use crate::errors::{AffilinkError, Result};
use crate::storage::models::{Product, ProductFilter, ProductInput};

use migration::entities::product;

/// 单条 IN 查询的最大 id 数（SQLite 旧版本上限 999）
pub const PRODUCT_ID_CHUNK: usize = 500;

impl SeaOrmStorage {
    /// 按创建时间倒序列出商品
    ///
    /// category / featured 在 SQL 中过滤；search 在内存中做不区分大小写的子串匹配，
    /// 保证各数据库行为一致。
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let mut query = product::Entity::find();

        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            query = query.filter(product::Column::Category.eq(category));
        }
        if let Some(featured) = filter.featured {
            query = query.filter(product::Column::IsFeatured.eq(featured));
        }

        let models = query
            .order_by_desc(product::Column::CreatedAt)
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询商品列表失败: {}", e)))?;

        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let products: Vec<Product> = models
            .into_iter()
            .map(model_to_product)
            .filter(|p| match &needle {
                Some(needle) => {
                    p.name.to_lowercase().contains(needle)
                        || p
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                }
                None => true,
            })
            .collect();

        debug!("Listed {} products", products.len());
        Ok(products)
    }

    pub async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        let model = product::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询商品失败: {}", e)))?;
        Ok(model.map(model_to_product))
    }

    /// 批量按 id 读取（缺失的 id 直接忽略）
    ///
    /// 按 `PRODUCT_ID_CHUNK` 分批查询，避免超出数据库的绑定参数上限。
    pub async fn get_products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>> {
        let mut products = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(PRODUCT_ID_CHUNK) {
            let models = product::Entity::find()
                .filter(product::Column::Id.is_in(chunk.iter().cloned()))
                .all(&self.db)
                .await
                .map_err(|e| {
                    AffilinkError::database_operation(format!("批量查询商品失败: {}", e))
                })?;
            products.extend(models.into_iter().map(model_to_product));
        }

        Ok(products)
    }

    /// 去重后的分类列表（字母序）
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        let categories = product::Entity::find()
            .select_only()
            .column(product::Column::Category)
            .distinct()
            .order_by_asc(product::Column::Category)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询分类失败: {}", e)))?;
        Ok(categories)
    }

    pub async fn recent_products(&self, limit: u64) -> Result<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .order_by_asc(product::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询最新商品失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_product).collect())
    }

    pub async fn count_products(&self) -> Result<u64> {
        product::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("统计商品数量失败: {}", e)))
    }

    pub async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        let id = uuid::Uuid::new_v4().to_string();
        let model = product_input_to_active_model(input, &id, true)
            .insert(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("创建商品失败: {}", e)))?;

        info!("Product created: {} ({})", model.name, model.id);
        Ok(model_to_product(model))
    }

    pub async fn update_product(&self, id: &str, input: &ProductInput) -> Result<Product> {
        if self.get_product(id).await?.is_none() {
            return Err(AffilinkError::not_found(format!("Product not found: {}", id)));
        }

        let model = product_input_to_active_model(input, id, false)
            .update(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("更新商品失败: {}", e)))?;

        info!("Product updated: {}", id);
        Ok(model_to_product(model))
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let result = product::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("删除商品失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AffilinkError::not_found(format!("Product not found: {}", id)));
        }

        info!("Product deleted: {}", id);
        Ok(())
    }
}
