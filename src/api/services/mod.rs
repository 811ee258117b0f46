pub mod admin;
pub mod catalog;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod newsletter;
pub mod shopper;
pub mod tracking;
pub mod types;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, error, web};
use tracing::debug;

use crate::api::middleware::RequireIdentity;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{api_result, error_from_affilink, error_response, success_response};
pub use types::ApiResponse;

/// JSON 解析失败时也返回统一信封
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(crate::api::constants::MAX_JSON_PAYLOAD)
        .error_handler(|err: error::JsonPayloadError, req: &HttpRequest| {
            debug!("Rejected JSON body on {}: {}", req.path(), err);
            let response = error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                &format!("Invalid request body: {}", err),
            );
            error::InternalError::from_response(err, response).into()
        })
}

/// 查询参数解析失败
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req| {
        let response = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            &format!("Invalid query string: {}", err),
        );
        error::InternalError::from_response(err, response).into()
    })
}

/// 需要登录的路由，逐条包上 RequireIdentity
fn authenticated(route: actix_web::Route) -> actix_web::Route {
    route.wrap(RequireIdentity)
}

/// 注册 `/api/v1` 下的所有路由
///
/// 购物车、收藏、个人资料和个人联盟面板需要登录。
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/affiliate/track-click",
        web::post().to(tracking::track_click),
    )
    .route(
        "/affiliate/go/{product_id}",
        web::get().to(tracking::affiliate_redirect),
    )
    .route(
        "/analytics/track-conversion",
        web::post().to(tracking::track_conversion),
    )
    .route("/products", web::get().to(catalog::list_products))
    .route("/products/categories", web::get().to(catalog::list_categories))
    .route("/products/{id}", web::get().to(catalog::get_product))
    .route("/newsletter/subscribe", web::post().to(newsletter::subscribe))
    .route(
        "/newsletter/unsubscribe",
        web::post().to(newsletter::unsubscribe),
    )
    .route("/cart", authenticated(web::get().to(shopper::get_cart)))
    .route("/cart/add", authenticated(web::post().to(shopper::add_to_cart)))
    .route(
        "/cart/remove",
        authenticated(web::post().to(shopper::remove_from_cart)),
    )
    .route(
        "/cart/{id}",
        authenticated(web::put().to(shopper::update_cart_item)),
    )
    .route(
        "/saved-products",
        authenticated(web::get().to(shopper::get_saved_products)),
    )
    .route(
        "/saved-products/toggle",
        authenticated(web::post().to(shopper::toggle_saved_product)),
    )
    .route("/profile", authenticated(web::get().to(shopper::get_profile)))
    .route(
        "/profile",
        authenticated(web::put().to(shopper::update_profile)),
    )
    .route(
        "/affiliate/dashboard",
        authenticated(web::get().to(tracking::affiliate_dashboard)),
    );
}
