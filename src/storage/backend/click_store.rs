//! ClickStore implementation for SeaOrmStorage

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::model_to_click;
use crate::analytics::{ClickEvent, ClickStore, NewClick};
use crate::errors::{AffilinkError, Result};

use migration::entities::affiliate_click;

#[async_trait]
impl ClickStore for SeaOrmStorage {
    async fn insert_click(&self, click: NewClick) -> anyhow::Result<i64> {
        let model = affiliate_click::ActiveModel {
            product_id: Set(click.product_id),
            user_id: Set(click.user_id),
            ip_address: Set(click.ip_address),
            user_agent: Set(click.user_agent),
            created_at: Set(chrono::Utc::now()),
            conversion: Set(false),
            revenue: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to insert affiliate click: {}", e))?;

        debug!(
            "Affiliate click written to {} database (id={})",
            self.backend_name.to_uppercase(),
            model.id
        );
        Ok(model.id)
    }

    async fn mark_converted(&self, click_id: i64, revenue: Decimal) -> anyhow::Result<bool> {
        let result = affiliate_click::Entity::update_many()
            .col_expr(affiliate_click::Column::Conversion, Expr::value(true))
            .col_expr(affiliate_click::Column::Revenue, Expr::value(revenue))
            .filter(affiliate_click::Column::Id.eq(click_id))
            .exec(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to update affiliate click {}: {}", click_id, e))?;

        if result.rows_affected > 0 {
            return Ok(true);
        }

        // MySQL 对值未变化的行返回 0，需要再确认一次是否存在
        let exists = affiliate_click::Entity::find_by_id(click_id)
            .one(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load affiliate click {}: {}", click_id, e))?
            .is_some();
        Ok(exists)
    }

    async fn list_clicks(&self, user_id: Option<&str>) -> anyhow::Result<Vec<ClickEvent>> {
        let mut query = affiliate_click::Entity::find();
        if let Some(uid) = user_id {
            query = query.filter(affiliate_click::Column::UserId.eq(uid));
        }

        let models = query
            .order_by_desc(affiliate_click::Column::CreatedAt)
            .order_by_desc(affiliate_click::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load affiliate clicks: {}", e))?;

        Ok(models.into_iter().map(model_to_click).collect())
    }
}

impl SeaOrmStorage {
    pub async fn count_clicks(&self) -> Result<u64> {
        affiliate_click::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("统计点击数量失败: {}", e)))
    }
}
