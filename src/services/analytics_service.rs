//! Affiliate analytics service
//!
//! Wires the click recorder, conversion updater and aggregation engine to
//! the relational storage. Shared by the public tracking endpoints, the
//! per-user affiliate dashboard and the admin analytics page.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::FixedOffset;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::analytics::{
    AggregationOptions, AggregationScope, AnalyticsReport, ClickAck, ClickRecorder, ClickStore,
    ConversionUpdater, NewClick, aggregate, build_affiliate_link, viewer_offset,
};
use crate::config::AffiliateConfig;
use crate::errors::{AffilinkError, Result};
use crate::storage::{Product, SeaOrmStorage};
use crate::utils::RequestMeta;

/// 浏览器时区偏移 → FixedOffset，缺省时使用配置值
pub fn resolve_viewer_offset(tz_offset: Option<i32>, default_minutes: i32) -> Result<FixedOffset> {
    let minutes = tz_offset.unwrap_or(default_minutes);
    viewer_offset(minutes).ok_or_else(|| {
        AffilinkError::validation(format!("Invalid tz_offset: {} minutes", minutes))
    })
}

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
    recorder: ClickRecorder,
    updater: ConversionUpdater,
    affiliate: AffiliateConfig,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>, affiliate: AffiliateConfig) -> Self {
        let store: Arc<dyn ClickStore> = storage.clone();
        Self {
            recorder: ClickRecorder::new(store.clone()),
            updater: ConversionUpdater::new(store),
            storage,
            affiliate,
        }
    }

    /// 记录一次联盟点击，存储失败时同样返回确认
    pub async fn track_click(
        &self,
        product_id: &str,
        user_id: Option<String>,
        meta: RequestMeta,
    ) -> ClickAck {
        self.recorder
            .record(NewClick {
                product_id: product_id.to_string(),
                user_id,
                ip_address: meta.ip_address,
                user_agent: meta.user_agent,
            })
            .await
    }

    /// 记录点击并返回带 UTM 参数的跳转地址
    ///
    /// 商品不存在或没有联盟链接时返回 NotFound，此时不记录点击。
    pub async fn affiliate_redirect(
        &self,
        product_id: &str,
        user_id: Option<String>,
        meta: RequestMeta,
    ) -> Result<String> {
        let product = self
            .storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| AffilinkError::not_found(format!("Product '{}' not found", product_id)))?;

        let base_link = product
            .affiliate_link
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| {
                AffilinkError::not_found(format!("Product '{}' has no affiliate link", product_id))
            })?;

        let link = build_affiliate_link(
            &base_link,
            product_id,
            user_id.as_deref(),
            &self.affiliate.utm_source,
        )?;

        let ack = self.track_click(product_id, user_id, meta).await;
        debug!("Affiliate redirect for {} ({:?}) -> {}", product_id, ack, link);
        Ok(link)
    }

    pub async fn track_conversion(&self, click_id: i64, revenue: Decimal) -> Result<()> {
        self.updater.mark_converted(click_id, revenue).await
    }

    /// 生成分析报告
    ///
    /// 点击或商品读取失败只记日志，报告照常生成（按空集合处理）。
    pub async fn report(
        &self,
        scope: AggregationScope,
        tz_offset: Option<i32>,
    ) -> Result<AnalyticsReport> {
        let offset = resolve_viewer_offset(tz_offset, self.affiliate.default_tz_offset_minutes)?;
        let top_n = match scope {
            AggregationScope::SiteWide => self.affiliate.site_top_products,
            AggregationScope::User(_) => self.affiliate.user_top_products,
        };

        let events = match self.storage.list_clicks(scope.user_id()).await {
            Ok(events) => Some(events),
            Err(e) => {
                error!("Failed to load clicks for analytics ({:?}): {}", scope, e);
                None
            }
        };

        let catalog = match events.as_deref() {
            Some(events) if !events.is_empty() => self.load_catalog(events).await,
            _ => Vec::new(),
        };

        let options = AggregationOptions {
            top_n,
            recent_limit: self.affiliate.recent_clicks,
            offset,
        };
        let report = aggregate(events.as_deref(), &catalog, &options);

        info!(
            "Analytics report ({:?}): {} clicks, {} conversions",
            scope, report.totals.total_clicks, report.totals.total_conversions
        );
        Ok(report)
    }

    async fn load_catalog(&self, events: &[crate::analytics::ClickEvent]) -> Vec<Product> {
        let ids: Vec<String> = events
            .iter()
            .map(|e| e.product_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        self.storage
            .get_products_by_ids(&ids)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to load products for analytics: {}", e);
                Vec::new()
            })
    }
}
