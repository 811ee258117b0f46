//! Identity resolution middleware
//!
//! 从 `Authorization: Bearer <jwt>` 解析请求者身份并放入 request extensions。
//! 没有令牌或令牌无效时请求按匿名继续，是否必须登录由 [`super::auth`] 决定。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::api::constants::BEARER_PREFIX;
use crate::api::jwt::JwtService;

/// 已校验的请求者身份
///
/// handler 中用 `web::ReqData<Identity>` 或 `Option<web::ReqData<Identity>>` 提取。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

fn extract_bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Clone)]
pub struct IdentityResolver {
    jwt: Option<Arc<JwtService>>,
}

impl IdentityResolver {
    pub fn new(jwt: Option<Arc<JwtService>>) -> Self {
        Self { jwt }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityResolver
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityResolverMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityResolverMiddleware {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
        }))
    }
}

pub struct IdentityResolverMiddleware<S> {
    service: Rc<S>,
    jwt: Option<Arc<JwtService>>,
}

impl<S, B> Service<ServiceRequest> for IdentityResolverMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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

        if let (Some(jwt), Some(token)) = (self.jwt.as_ref(), extract_bearer_token(&req)) {
            match jwt.verify(token) {
                Ok(claims) => {
                    trace!("Identity resolved for user {}", claims.sub);
                    req.extensions_mut().insert(Identity {
                        user_id: claims.sub,
                        email: claims.email,
                    });
                }
                Err(e) => debug!("Identity token rejected: {}", e),
            }
        }

        Box::pin(async move { srv.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::jwt::IdentityClaims;
    use actix_web::{App, HttpResponse, test, web};

    const SECRET: &str = "identity_test_secret_32_bytes!!";

    async fn whoami(identity: Option<web::ReqData<Identity>>) -> HttpResponse {
        match identity {
            Some(identity) => HttpResponse::Ok().body(identity.user_id.clone()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    fn token(sub: &str) -> String {
        JwtService::new(SECRET, 0, None)
            .sign(&IdentityClaims {
                sub: sub.to_string(),
                email: None,
                exp: (chrono::Utc::now() + chrono::Duration::minutes(5)).timestamp(),
                aud: None,
            })
            .unwrap()
    }

    async fn call(jwt: Option<Arc<JwtService>>, auth: Option<String>) -> String {
        let app = test::init_service(
            App::new()
                .wrap(IdentityResolver::new(jwt))
                .route("/", web::get().to(whoami)),
        )
        .await;
        let mut req = test::TestRequest::get().uri("/");
        if let Some(auth) = auth {
            req = req.insert_header(("Authorization", auth));
        }
        let body = test::call_and_read_body(&app, req.to_request()).await;
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[actix_rt::test]
    async fn test_valid_token_resolves_identity() {
        let jwt = Some(Arc::new(JwtService::new(SECRET, 0, None)));
        let body = call(jwt, Some(format!("Bearer {}", token("user-42")))).await;
        assert_eq!(body, "user-42");
    }

    #[actix_rt::test]
    async fn test_invalid_token_is_anonymous() {
        let jwt = Some(Arc::new(JwtService::new(SECRET, 0, None)));
        let body = call(jwt, Some("Bearer not-a-jwt".to_string())).await;
        assert_eq!(body, "anonymous");
    }

    #[actix_rt::test]
    async fn test_no_secret_means_anonymous() {
        let body = call(None, Some(format!("Bearer {}", token("user-42")))).await;
        assert_eq!(body, "anonymous");
    }
}
