//! Profile operations for SeaOrmStorage

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, PaginatorTrait, QueryOrder,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::model_to_profile;
use crate::errors::{AffilinkError, Result};
use crate::storage::models::Profile;

use migration::entities::profile;

impl SeaOrmStorage {
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let model = profile::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询用户资料失败: {}", e)))?;
        Ok(model.map(model_to_profile))
    }

    /// 读取资料，不存在时按令牌中的信息创建
    pub async fn ensure_profile(&self, user_id: &str, email: &str) -> Result<Profile> {
        if let Some(existing) = self.get_profile(user_id).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now();
        let model = profile::ActiveModel {
            id: Set(user_id.to_string()),
            email: Set(email.to_string()),
            full_name: Set(None),
            is_admin: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AffilinkError::database_operation(format!("创建用户资料失败: {}", e)))?;

        info!("Profile provisioned for user {}", user_id);
        Ok(model_to_profile(model))
    }

    pub async fn update_profile_name(
        &self,
        user_id: &str,
        full_name: Option<String>,
    ) -> Result<Profile> {
        let model = profile::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询用户资料失败: {}", e)))?
            .ok_or_else(|| AffilinkError::not_found(format!("Profile not found: {}", user_id)))?;

        let mut active = model.into_active_model();
        active.full_name = Set(full_name);
        active.updated_at = Set(chrono::Utc::now());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("更新用户资料失败: {}", e)))?;
        Ok(model_to_profile(updated))
    }

    /// 授予或撤销管理员
    ///
    /// 资料不存在时需要提供 email 才能创建，否则返回 NotFound。
    pub async fn set_admin(
        &self,
        user_id: &str,
        email: Option<&str>,
        is_admin: bool,
    ) -> Result<Profile> {
        let existing = match self.get_profile(user_id).await? {
            Some(p) => p,
            None => match email {
                Some(email) => self.ensure_profile(user_id, email).await?,
                None => {
                    return Err(AffilinkError::not_found(format!(
                        "Profile not found: {} (pass an email to create it)",
                        user_id
                    )));
                }
            },
        };

        let now = chrono::Utc::now();
        let updated = profile::ActiveModel {
            id: Set(existing.id.clone()),
            is_admin: Set(is_admin),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| AffilinkError::database_operation(format!("更新管理员标记失败: {}", e)))?;

        info!("Admin flag for {} set to {}", user_id, is_admin);
        Ok(model_to_profile(updated))
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let models = profile::Entity::find()
            .order_by_desc(profile::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("查询用户列表失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_profile).collect())
    }

    pub async fn count_profiles(&self) -> Result<u64> {
        profile::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| AffilinkError::database_operation(format!("统计用户数量失败: {}", e)))
    }
}
