//! 联盟点击与转化追踪端点
//!
//! - POST /affiliate/track-click：尽力记录，存储失败也返回成功
//! - GET  /affiliate/go/{product_id}：记录点击后 307 跳转到带 UTM 的联盟链接
//! - POST /analytics/track-conversion：严格上报，失败原样返回
//! - GET  /affiliate/dashboard：当前用户的统计报告

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{info, warn};

use super::error_code::ErrorCode;
use super::helpers::{
    error_from_affilink, error_response, error_with_code, success_response, success_with_message,
};
use super::types::{
    TimezoneQuery, TrackClickRequest, TrackClickResponse, TrackConversionRequest,
};
use crate::analytics::AggregationScope;
use crate::api::middleware::Identity;
use crate::errors::AffilinkError;
use crate::services::AnalyticsService;
use crate::utils::RequestMeta;

fn click_acknowledged(click_id: Option<i64>) -> HttpResponse {
    success_with_message(
        StatusCode::OK,
        "Click tracked",
        Some(TrackClickResponse { click_id }),
    )
}

pub async fn track_click(
    req: HttpRequest,
    body: web::Bytes,
    identity: Option<web::ReqData<Identity>>,
    service: web::Data<Arc<AnalyticsService>>,
) -> impl Responder {
    // 请求体无法解析时同样确认，不让追踪影响前端跳转
    let payload: TrackClickRequest = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Unparsable track-click body ignored: {}", e);
            return click_acknowledged(None);
        }
    };

    let Some(product_id) = payload
        .product_id
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Product ID is required",
        );
    };

    let user_id = identity.map(|i| i.into_inner().user_id);
    let ack = service
        .track_click(&product_id, user_id, RequestMeta::from_request(&req))
        .await;

    click_acknowledged(ack.click_id())
}

pub async fn affiliate_redirect(
    req: HttpRequest,
    path: web::Path<String>,
    identity: Option<web::ReqData<Identity>>,
    service: web::Data<Arc<AnalyticsService>>,
) -> impl Responder {
    let product_id = path.into_inner();
    let user_id = identity.map(|i| i.into_inner().user_id);

    match service
        .affiliate_redirect(&product_id, user_id, RequestMeta::from_request(&req))
        .await
    {
        Ok(link) => HttpResponse::TemporaryRedirect()
            .insert_header((LOCATION, link))
            .finish(),
        Err(e @ AffilinkError::NotFound(_)) => error_with_code(&e, ErrorCode::ProductNotFound),
        Err(e) => error_from_affilink(&e),
    }
}

pub async fn track_conversion(
    payload: web::Json<TrackConversionRequest>,
    service: web::Data<Arc<AnalyticsService>>,
) -> impl Responder {
    let TrackConversionRequest { click_id, revenue } = payload.into_inner();

    match service.track_conversion(click_id, revenue).await {
        Ok(()) => {
            info!("Conversion tracked for click {}", click_id);
            success_with_message::<()>(StatusCode::OK, "Conversion tracked", None)
        }
        Err(e) => {
            let code = match e {
                AffilinkError::Validation(_) => ErrorCode::InvalidRevenue,
                AffilinkError::NotFound(_) => ErrorCode::ClickNotFound,
                _ => ErrorCode::ConversionFailed,
            };
            error_with_code(&e, code)
        }
    }
}

/// 当前用户的联盟统计（Top 5）
pub async fn affiliate_dashboard(
    identity: web::ReqData<Identity>,
    query: web::Query<TimezoneQuery>,
    service: web::Data<Arc<AnalyticsService>>,
) -> impl Responder {
    let scope = AggregationScope::User(identity.into_inner().user_id);

    match service.report(scope, query.tz_offset).await {
        Ok(report) => success_response(report),
        Err(e @ AffilinkError::Validation(_)) => error_with_code(&e, ErrorCode::InvalidTimezone),
        Err(e) => error_from_affilink(&e),
    }
}
