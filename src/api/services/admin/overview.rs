//! 后台首页与全站统计

use actix_web::{Responder, web};
use std::sync::Arc;

use crate::analytics::AggregationScope;
use crate::api::services::error_code::ErrorCode;
use crate::api::services::helpers::{
    api_result, error_from_affilink, error_with_code, success_response,
};
use crate::api::services::types::TimezoneQuery;
use crate::errors::AffilinkError;
use crate::services::{AnalyticsService, DashboardService};

pub async fn dashboard(service: web::Data<Arc<DashboardService>>) -> impl Responder {
    api_result(service.summary().await)
}

/// 全站统计（Top 10）
pub async fn site_analytics(
    query: web::Query<TimezoneQuery>,
    service: web::Data<Arc<AnalyticsService>>,
) -> impl Responder {
    match service
        .report(AggregationScope::SiteWide, query.tz_offset)
        .await
    {
        Ok(report) => success_response(report),
        Err(e @ AffilinkError::Validation(_)) => error_with_code(&e, ErrorCode::InvalidTimezone),
        Err(e) => error_from_affilink(&e),
    }
}
