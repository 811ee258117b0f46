//! Affiliate attribution
//!
//! - `recorder`: best-effort click persistence
//! - `conversion`: strict conversion reporting
//! - `aggregate`: read-time rollups over click events
//! - `utm`: affiliate link decoration

pub mod aggregate;
pub mod conversion;
pub mod recorder;
pub mod sink;
pub mod utm;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use aggregate::{
    AggregationOptions, AggregationScope, AnalyticsReport, DailyClicks, ProductPerformance,
    ReportTotals, aggregate, format_conversion_rate, viewer_offset,
};
pub use conversion::ConversionUpdater;
pub use recorder::{ClickAck, ClickRecorder};
pub use sink::ClickStore;
pub use utm::{UtmParams, build_affiliate_link};

/// 已持久化的点击事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub id: i64,
    pub product_id: String,
    pub user_id: Option<String>,
    pub ip_address: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub conversion: bool,
    /// 仅当 conversion = true 时有意义
    pub revenue: Option<Decimal>,
}

/// 待写入的点击
///
/// ip / user_agent 原样保存，不做校验或规范化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub product_id: String,
    pub user_id: Option<String>,
    pub ip_address: String,
    pub user_agent: String,
}
