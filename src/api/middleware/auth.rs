//! Access guards
//!
//! - [`RequireIdentity`]: 需要登录的接口，没有身份返回 401
//! - [`AdminGate`]: 后台接口，没有身份返回 401，资料不是管理员返回 403
//!
//! 两者都依赖外层的 [`super::IdentityResolver`] 先把身份放进 extensions。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{error, info, trace};

use super::identity::Identity;
use crate::api::services::{ApiResponse, ErrorCode};
use crate::storage::SeaOrmStorage;

fn json_reject<B>(
    req: ServiceRequest,
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    req.into_response(
        HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()> {
                code: code as i32,
                message: message.to_string(),
                data: None,
            })
            .map_into_right_body(),
    )
}

/// CORS 预检请求不带令牌，直接放行
fn handle_options_request<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    req.into_response(
        HttpResponse::NoContent()
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .finish()
            .map_into_right_body(),
    )
}

fn unauthorized<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    info!("Authentication required - missing or invalid token");
    json_reject(
        req,
        StatusCode::UNAUTHORIZED,
        ErrorCode::Unauthorized,
        "Unauthorized: Invalid or missing token",
    )
}

fn current_identity(req: &ServiceRequest) -> Option<Identity> {
    req.extensions().get::<Identity>().cloned()
}

// ============================================================
// RequireIdentity
// ============================================================

#[derive(Clone, Default)]
pub struct RequireIdentity;

impl<S, B> Transform<S, ServiceRequest> for RequireIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireIdentityMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireIdentityMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            if req.method() == Method::OPTIONS {
                return Ok(handle_options_request(req));
            }

            if current_identity(&req).is_none() {
                return Ok(unauthorized(req));
            }

            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}

// ============================================================
// AdminGate
// ============================================================

#[derive(Clone)]
pub struct AdminGate {
    storage: Arc<SeaOrmStorage>,
}

impl AdminGate {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGateMiddleware {
            service: Rc::new(service),
            storage: self.storage.clone(),
        }))
    }
}

pub struct AdminGateMiddleware<S> {
    service: Rc<S>,
    storage: Arc<SeaOrmStorage>,
}

impl<S, B> Service<ServiceRequest> for AdminGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let storage = self.storage.clone();

        Box::pin(async move {
            if req.method() == Method::OPTIONS {
                return Ok(handle_options_request(req));
            }

            let Some(identity) = current_identity(&req) else {
                return Ok(unauthorized(req));
            };

            // 每次请求都读取最新的管理员标记
            match storage.get_profile(&identity.user_id).await {
                Ok(Some(profile)) if profile.is_admin => {
                    trace!("Admin access granted to {}", identity.user_id);
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Ok(_) => {
                    info!("Admin access denied for user {}", identity.user_id);
                    Ok(json_reject(
                        req,
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        "Forbidden: Admin access required",
                    ))
                }
                Err(e) => {
                    error!("Failed to load profile for admin check: {}", e);
                    Ok(json_reject(
                        req,
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Failed to verify admin access",
                    ))
                }
            }
        })
    }
}
