//! 登录用户的购物车、收藏和个人资料端点
//!
//! 路由挂在 `RequireIdentity` 之后，handler 里的 `ReqData<Identity>` 一定存在。

use actix_web::{Responder, web};
use std::sync::Arc;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_affilink, error_with_code, success_response};
use super::types::{
    AddToCartRequest, RemoveFromCartRequest, ToggleSavedRequest, UpdateCartRequest,
    UpdateProfileRequest,
};
use crate::api::middleware::Identity;
use crate::errors::AffilinkError;
use crate::services::ShopperService;

/// 购物车相关错误码
fn cart_error(err: AffilinkError) -> actix_web::HttpResponse {
    match err {
        AffilinkError::NotFound(_) => error_with_code(&err, ErrorCode::CartItemNotFound),
        AffilinkError::Validation(_) => error_with_code(&err, ErrorCode::InvalidQuantity),
        _ => error_from_affilink(&err),
    }
}

pub async fn get_cart(
    identity: web::ReqData<Identity>,
    service: web::Data<Arc<ShopperService>>,
) -> impl Responder {
    api_result(service.cart(&identity.user_id).await)
}

pub async fn add_to_cart(
    identity: web::ReqData<Identity>,
    payload: web::Json<AddToCartRequest>,
    service: web::Data<Arc<ShopperService>>,
) -> impl Responder {
    let AddToCartRequest {
        product_id,
        quantity,
    } = payload.into_inner();

    match service
        .add_to_cart(&identity.user_id, product_id.trim(), quantity)
        .await
    {
        Ok(item) => success_response(item),
        Err(e @ AffilinkError::NotFound(_)) => error_with_code(&e, ErrorCode::ProductNotFound),
        Err(e) => error_from_affilink(&e),
    }
}

pub async fn update_cart_item(
    identity: web::ReqData<Identity>,
    path: web::Path<String>,
    payload: web::Json<UpdateCartRequest>,
    service: web::Data<Arc<ShopperService>>,
) -> impl Responder {
    match service
        .update_cart_quantity(&identity.user_id, &path.into_inner(), payload.quantity)
        .await
    {
        Ok(item) => success_response(item),
        Err(e) => cart_error(e),
    }
}

pub async fn remove_from_cart(
    identity: web::ReqData<Identity>,
    payload: web::Json<RemoveFromCartRequest>,
    service: web::Data<Arc<ShopperService>>,
) -> impl Responder {
    match service
        .remove_from_cart(&identity.user_id, payload.cart_item_id.trim())
        .await
    {
        Ok(()) => success_response(serde_json::json!({ "removed": true })),
        Err(e) => cart_error(e),
    }
}

pub async fn get_saved_products(
    identity: web::ReqData<Identity>,
    service: web::Data<Arc<ShopperService>>,
) -> impl Responder {
    api_result(service.saved_products(&identity.user_id).await)
}

pub async fn toggle_saved_product(
    identity: web::ReqData<Identity>,
    payload: web::Json<ToggleSavedRequest>,
    service: web::Data<Arc<ShopperService>>,
) -> impl Responder {
    match service
        .toggle_saved(&identity.user_id, payload.product_id.trim())
        .await
    {
        Ok(toggle) => success_response(toggle),
        Err(e @ AffilinkError::NotFound(_)) => error_with_code(&e, ErrorCode::ProductNotFound),
        Err(e) => error_from_affilink(&e),
    }
}

pub async fn get_profile(
    identity: web::ReqData<Identity>,
    service: web::Data<Arc<ShopperService>>,
) -> impl Responder {
    api_result(
        service
            .profile(&identity.user_id, identity.email.as_deref())
            .await,
    )
}

pub async fn update_profile(
    identity: web::ReqData<Identity>,
    payload: web::Json<UpdateProfileRequest>,
    service: web::Data<Arc<ShopperService>>,
) -> impl Responder {
    api_result(
        service
            .update_profile(
                &identity.user_id,
                identity.email.as_deref(),
                payload.into_inner().full_name,
            )
            .await,
    )
}
