//! 后台商品管理

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use std::sync::Arc;
use tracing::info;

use crate::api::middleware::Identity;
use crate::api::services::error_code::ErrorCode;
use crate::api::services::helpers::{
    api_result, error_from_affilink, error_with_code, success_response, success_with_message,
};
use crate::errors::AffilinkError;
use crate::services::CatalogService;
use crate::storage::{ProductFilter, ProductInput};

fn product_error(err: AffilinkError) -> actix_web::HttpResponse {
    match err {
        AffilinkError::NotFound(_) => error_with_code(&err, ErrorCode::ProductNotFound),
        AffilinkError::Validation(_) => error_with_code(&err, ErrorCode::ProductInvalid),
        _ => error_from_affilink(&err),
    }
}

pub async fn list_products(service: web::Data<Arc<CatalogService>>) -> impl Responder {
    api_result(service.list_products(&ProductFilter::default()).await)
}

pub async fn get_product(
    path: web::Path<String>,
    service: web::Data<Arc<CatalogService>>,
) -> impl Responder {
    match service.get_product(&path.into_inner()).await {
        Ok(product) => success_response(product),
        Err(e) => product_error(e),
    }
}

pub async fn create_product(
    admin: web::ReqData<Identity>,
    payload: web::Json<ProductInput>,
    service: web::Data<Arc<CatalogService>>,
) -> impl Responder {
    match service.create_product(payload.into_inner()).await {
        Ok(product) => {
            info!("Admin {} created product {}", admin.user_id, product.id);
            success_with_message(StatusCode::CREATED, "Product created", Some(product))
        }
        Err(e) => product_error(e),
    }
}

pub async fn update_product(
    admin: web::ReqData<Identity>,
    path: web::Path<String>,
    payload: web::Json<ProductInput>,
    service: web::Data<Arc<CatalogService>>,
) -> impl Responder {
    let id = path.into_inner();
    match service.update_product(&id, payload.into_inner()).await {
        Ok(product) => {
            info!("Admin {} updated product {}", admin.user_id, id);
            success_response(product)
        }
        Err(e) => product_error(e),
    }
}

pub async fn delete_product(
    admin: web::ReqData<Identity>,
    path: web::Path<String>,
    service: web::Data<Arc<CatalogService>>,
) -> impl Responder {
    let id = path.into_inner();
    match service.delete_product(&id).await {
        Ok(()) => {
            info!("Admin {} deleted product {}", admin.user_id, id);
            success_with_message::<()>(StatusCode::OK, "Product deleted", None)
        }
        Err(e) => product_error(e),
    }
}
