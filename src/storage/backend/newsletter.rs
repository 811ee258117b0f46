//! Newsletter subscriber operations for SeaOrmStorage

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use super::SeaOrmStorage;
use super::converters::model_to_subscriber;
use crate::errors::{AffilinkError, Result};
use crate::storage::models::{Subscriber, SubscriberStatus};

use migration::entities::newsletter_subscriber;

impl SeaOrmStorage {
    pub async fn find_subscriber(&self, email: &str) -> Result<Option<Subscriber>> {
        let model = newsletter_subscriber::Entity::find()
            .filter(newsletter_subscriber::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询订阅者失败: {}", e)))?;
        Ok(model.map(model_to_subscriber))
    }

    pub async fn insert_subscriber(
        &self,
        email: &str,
        full_name: Option<String>,
    ) -> Result<Subscriber> {
        let now = chrono::Utc::now();
        let model = newsletter_subscriber::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            full_name: Set(full_name),
            status: Set(SubscriberStatus::Subscribed.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AffilinkError::database_operation(format!("写入订阅者失败: {}", e)))?;
        Ok(model_to_subscriber(model))
    }

    pub async fn set_subscriber_status(
        &self,
        email: &str,
        status: SubscriberStatus,
    ) -> Result<Subscriber> {
        self.update_subscriber(email, status, None).await
    }

    /// 重新订阅；请求里带了名字时一并覆盖
    pub async fn resubscribe(&self, email: &str, full_name: Option<String>) -> Result<Subscriber> {
        self.update_subscriber(email, SubscriberStatus::Subscribed, full_name)
            .await
    }

    async fn update_subscriber(
        &self,
        email: &str,
        status: SubscriberStatus,
        full_name: Option<String>,
    ) -> Result<Subscriber> {
        let model = newsletter_subscriber::Entity::find()
            .filter(newsletter_subscriber::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询订阅者失败: {}", e)))?
            .ok_or_else(|| AffilinkError::not_found(format!("Subscriber not found: {}", email)))?;

        let mut active = model.into_active_model();
        active.status = Set(status.as_str().to_string());
        if let Some(name) = full_name {
            active.full_name = Set(Some(name));
        }
        active.updated_at = Set(chrono::Utc::now());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("更新订阅状态失败: {}", e)))?;
        Ok(model_to_subscriber(updated))
    }

    pub async fn list_subscribers(&self) -> Result<Vec<Subscriber>> {
        let models = newsletter_subscriber::Entity::find()
            .order_by_desc(newsletter_subscriber::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询订阅者列表失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_subscriber).collect())
    }

    pub async fn count_subscribers(&self) -> Result<u64> {
        newsletter_subscriber::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("统计订阅者数量失败: {}", e)))
    }
}
