use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info};

use super::ClickStore;
use crate::errors::{AffilinkError, Result};
use crate::utils::round_money;

/// 转化上报：失败直接返回给调用方，不重试
///
/// 重复上报同一个 click 会覆盖 revenue。
#[derive(Clone)]
pub struct ConversionUpdater {
    store: Arc<dyn ClickStore>,
}

impl ConversionUpdater {
    pub fn new(store: Arc<dyn ClickStore>) -> Self {
        Self { store }
    }

    pub async fn mark_converted(&self, click_id: i64, revenue: Decimal) -> Result<()> {
        if revenue < Decimal::ZERO {
            return Err(AffilinkError::validation(format!(
                "Revenue must not be negative, got {}",
                revenue
            )));
        }

        // 列类型是 decimal(12,2)
        let revenue = round_money(revenue);

        let updated = self
            .store
            .mark_converted(click_id, revenue)
            .await
            .map_err(|e| {
                error!("Failed to record conversion for click {}: {}", click_id, e);
                AffilinkError::database_operation(format!("Failed to track conversion: {}", e))
            })?;

        if !updated {
            return Err(AffilinkError::not_found(format!(
                "Click {} not found",
                click_id
            )));
        }

        info!("Conversion recorded: click={}, revenue={}", click_id, revenue);
        Ok(())
    }
}
