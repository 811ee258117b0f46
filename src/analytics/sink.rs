use rust_decimal::Decimal;

use super::{ClickEvent, NewClick};

/// 点击事件存储
///
/// 记录器和转化更新只依赖这个 trait，测试里可以注入失败实现。
#[async_trait::async_trait]
pub trait ClickStore: Send + Sync {
    /// 写入一条点击，返回新 id
    async fn insert_click(&self, click: NewClick) -> anyhow::Result<i64>;

    /// 标记转化并写入收入；没有匹配的行时返回 false
    async fn mark_converted(&self, click_id: i64, revenue: Decimal) -> anyhow::Result<bool>;

    /// 读取点击历史，`user_id` 为 None 时返回全站
    async fn list_clicks(&self, user_id: Option<&str>) -> anyhow::Result<Vec<ClickEvent>>;
}

/// 内存实现，仅用于单元测试
#[cfg(test)]
#[derive(Default)]
pub struct MemoryClickStore {
    events: std::sync::Mutex<Vec<ClickEvent>>,
}

#[cfg(test)]
impl MemoryClickStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<ClickEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl ClickStore for MemoryClickStore {
    async fn insert_click(&self, click: NewClick) -> anyhow::Result<i64> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| anyhow::anyhow!("click store lock poisoned"))?;
        let id = events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        events.push(ClickEvent {
            id,
            product_id: click.product_id,
            user_id: click.user_id,
            ip_address: click.ip_address,
            user_agent: click.user_agent,
            created_at: chrono::Utc::now(),
            conversion: false,
            revenue: None,
        });
        Ok(id)
    }

    async fn mark_converted(&self, click_id: i64, revenue: Decimal) -> anyhow::Result<bool> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| anyhow::anyhow!("click store lock poisoned"))?;
        match events.iter_mut().find(|e| e.id == click_id) {
            Some(event) => {
                event.conversion = true;
                event.revenue = Some(revenue);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_clicks(&self, user_id: Option<&str>) -> anyhow::Result<Vec<ClickEvent>> {
        let events = self
            .events
            .lock()
            .map_err(|_| anyhow::anyhow!("click store lock poisoned"))?;
        Ok(events
            .iter()
            .filter(|e| user_id.is_none_or(|uid| e.user_id.as_deref() == Some(uid)))
            .cloned()
            .collect())
    }
}
