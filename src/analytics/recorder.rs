//! Click recorder
//!
//! 点击追踪是尽力而为的：存储失败只记录日志然后丢弃，
//! 不重试，也不影响调用方的跳转。

use std::sync::Arc;

use tracing::{debug, error};

use super::{ClickStore, NewClick};

/// 记录结果；两个分支对调用方都代表成功
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAck {
    Recorded(i64),
    Dropped,
}

impl ClickAck {
    pub fn click_id(&self) -> Option<i64> {
        match self {
            ClickAck::Recorded(id) => Some(*id),
            ClickAck::Dropped => None,
        }
    }
}

#[derive(Clone)]
pub struct ClickRecorder {
    store: Arc<dyn ClickStore>,
}

impl ClickRecorder {
    pub fn new(store: Arc<dyn ClickStore>) -> Self {
        Self { store }
    }

    /// 写入一条点击事件，永不返回错误
    pub async fn record(&self, click: NewClick) -> ClickAck {
        let product_id = click.product_id.clone();
        let anonymous = click.user_id.is_none();

        match self.store.insert_click(click).await {
            Ok(id) => {
                debug!(
                    "Affiliate click recorded: id={}, product={}, anonymous={}",
                    id, product_id, anonymous
                );
                ClickAck::Recorded(id)
            }
            Err(e) => {
                // TODO: 接入死信队列后在这里转存，目前点击直接丢失
                error!(
                    "Failed to record affiliate click for product {}: {}",
                    product_id, e
                );
                ClickAck::Dropped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::sink::MemoryClickStore;
    use rust_decimal::Decimal;

    struct FailingStore;

    #[async_trait::async_trait]
    impl ClickStore for FailingStore {
        async fn insert_click(&self, _click: NewClick) -> anyhow::Result<i64> {
            Err(anyhow::anyhow!("database is locked"))
        }

        async fn mark_converted(&self, _id: i64, _revenue: Decimal) -> anyhow::Result<bool> {
            Err(anyhow::anyhow!("database is locked"))
        }

        async fn list_clicks(
            &self,
            _user_id: Option<&str>,
        ) -> anyhow::Result<Vec<crate::analytics::ClickEvent>> {
            Err(anyhow::anyhow!("database is locked"))
        }
    }

    fn anonymous_click(product: &str) -> NewClick {
        NewClick {
            product_id: product.to_string(),
            user_id: None,
            ip_address: "unknown".to_string(),
            user_agent: "unknown".to_string(),
        }
    }

    #[tokio::test]
    async fn test_anonymous_click_is_persisted_without_user() {
        let store = Arc::new(MemoryClickStore::new());
        let recorder = ClickRecorder::new(store.clone());

        let ack = recorder.record(anonymous_click("p-1")).await;
        assert_eq!(ack, ClickAck::Recorded(1));

        let events = store.snapshot();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].product_id, "p-1");
        assert!(events[0].user_id.is_none());
        assert!(!events[0].conversion);
        assert!(events[0].revenue.is_none());
    }

    #[tokio::test]
    async fn test_metadata_is_stored_verbatim() {
        let store = Arc::new(MemoryClickStore::new());
        let recorder = ClickRecorder::new(store.clone());

        recorder
            .record(NewClick {
                product_id: "p-2".to_string(),
                user_id: Some("user-7".to_string()),
                ip_address: "203.0.113.9, 10.0.0.1".to_string(),
                user_agent: "  Mozilla/5.0  ".to_string(),
            })
            .await;

        let events = store.snapshot();
        assert_eq!(events[0].ip_address, "203.0.113.9, 10.0.0.1");
        assert_eq!(events[0].user_agent, "  Mozilla/5.0  ");
        assert_eq!(events[0].user_id.as_deref(), Some("user-7"));
    }

    #[tokio::test]
    async fn test_failing_store_still_acknowledges() {
        let recorder = ClickRecorder::new(Arc::new(FailingStore));
        let ack = recorder.record(anonymous_click("p-3")).await;
        assert_eq!(ack, ClickAck::Dropped);
        assert_eq!(ack.click_id(), None);
    }
}
