//! 公共商品目录端点

use actix_web::{Responder, web};
use std::sync::Arc;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_affilink, error_with_code, success_response};
use super::types::ProductListQuery;
use crate::errors::AffilinkError;
use crate::services::CatalogService;
use crate::storage::ProductFilter;

pub async fn list_products(
    query: web::Query<ProductListQuery>,
    service: web::Data<Arc<CatalogService>>,
) -> impl Responder {
    let filter: ProductFilter = query.into_inner().into();
    api_result(service.list_products(&filter).await)
}

pub async fn list_categories(service: web::Data<Arc<CatalogService>>) -> impl Responder {
    api_result(service.list_categories().await)
}

pub async fn get_product(
    path: web::Path<String>,
    service: web::Data<Arc<CatalogService>>,
) -> impl Responder {
    match service.get_product(&path.into_inner()).await {
        Ok(product) => success_response(product),
        Err(e @ AffilinkError::NotFound(_)) => error_with_code(&e, ErrorCode::ProductNotFound),
        Err(e) => error_from_affilink(&e),
    }
}
