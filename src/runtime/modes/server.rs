//! Server mode
//!
//! Builds the shared startup context, configures actix-web and runs until
//! the server exits or Ctrl+C is received.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::config::{AppConfig, CorsConfig};
use crate::runtime::lifetime;

/// 请求体上限（字节），JSON 另有更小的限制
const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
///
/// 身份通过 Authorization 头传递，不使用 cookie，因此从不开启 credentials。
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 未启用时保持浏览器默认的同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .expose_headers(vec![crate::api::constants::REQUEST_ID_HEADER])
        .max_age(cors_config.max_age as usize);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &AppConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    // Clone db handle before startup moves into HttpServer closure
    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                    .add(("X-Content-Type-Options", "nosniff")),
            )
            .configure(|cfg| startup.configure(cfg))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(db_for_shutdown) => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_cors_is_default() {
        let config = CorsConfig {
            enabled: false,
            allowed_origins: vec!["https://shop.example.com".to_string()],
            max_age: 3600,
        };
        // 只验证构建不会 panic
        let _ = build_cors_middleware(&config);
    }

    #[test]
    fn test_wildcard_cors_builds() {
        let config = CorsConfig {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            max_age: 600,
        };
        let _ = build_cors_middleware(&config);
        validate_cors_config(&config);
    }
}
