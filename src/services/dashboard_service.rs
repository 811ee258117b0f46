use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::storage::{Product, Profile, SeaOrmStorage};

/// 后台首页展示的最近商品数量
pub const RECENT_PRODUCTS_LIMIT: u64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCounts {
    pub products: u64,
    pub users: u64,
    pub subscribers: u64,
    pub clicks: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub counts: DashboardCounts,
    pub recent_products: Vec<Product>,
}

pub struct DashboardService {
    storage: Arc<SeaOrmStorage>,
}

impl DashboardService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 四个计数互不依赖，并发查询
    pub async fn summary(&self) -> Result<DashboardSummary> {
        let (products, users, subscribers, clicks, recent) = tokio::join!(
            self.storage.count_products(),
            self.storage.count_profiles(),
            self.storage.count_subscribers(),
            self.storage.count_clicks(),
            self.storage.recent_products(RECENT_PRODUCTS_LIMIT),
        );

        let counts = DashboardCounts {
            products: products?,
            users: users?,
            subscribers: subscribers?,
            clicks: clicks?,
        };
        debug!("Dashboard counts: {:?}", counts);

        Ok(DashboardSummary {
            counts,
            recent_products: recent?,
        })
    }

    pub async fn users(&self) -> Result<Vec<Profile>> {
        self.storage.list_profiles().await
    }
}
