//! Admin API 路由配置

use actix_web::web;

use super::overview::{dashboard, site_analytics};
use super::people::{list_subscribers, list_users};
use super::products::{create_product, delete_product, get_product, list_products, update_product};

/// 商品管理路由 `/products`
///
/// 包含：
/// - GET/HEAD /products - 全部商品
/// - POST /products - 创建商品
/// - GET/HEAD /products/{id} - 单个商品
/// - PUT /products/{id} - 更新商品
/// - DELETE /products/{id} - 删除商品
pub fn products_routes() -> actix_web::Scope {
    web::scope("/products")
        .route("", web::get().to(list_products))
        .route("", web::head().to(list_products))
        .route("", web::post().to(create_product))
        .route("/{id}", web::get().to(get_product))
        .route("/{id}", web::head().to(get_product))
        .route("/{id}", web::put().to(update_product))
        .route("/{id}", web::delete().to(delete_product))
}

/// 注册 `/admin/v1` 下的所有路由（由调用方包上 AdminGate）
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(products_routes())
        .route("/users", web::get().to(list_users))
        .route("/subscribers", web::get().to(list_subscribers))
        .route("/dashboard", web::get().to(dashboard))
        .route("/analytics", web::get().to(site_analytics));
}
