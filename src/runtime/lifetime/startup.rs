use std::sync::Arc;

use actix_web::web;
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::constants::{ADMIN_PREFIX, API_PREFIX};
use crate::api::jwt::JwtService;
use crate::api::middleware::{AdminGate, IdentityResolver};
use crate::api::services::{self as handlers, AppStartTime, health_routes};
use crate::config::AppConfig;
use crate::services::{
    AnalyticsService, CatalogService, DashboardService, NewsletterService, ShopperService,
};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 服务器运行所需的全部共享组件
///
/// 启动时构建一次，通过 `web::Data` 注入到每个 worker。
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub jwt: Option<Arc<JwtService>>,
    pub analytics_service: Arc<AnalyticsService>,
    pub catalog_service: Arc<CatalogService>,
    pub shopper_service: Arc<ShopperService>,
    pub newsletter_service: Arc<NewsletterService>,
    pub dashboard_service: Arc<DashboardService>,
    pub app_start_time: AppStartTime,
}

impl StartupContext {
    /// 在已有存储之上组装 service（测试也走这里）
    pub fn build(storage: Arc<SeaOrmStorage>, config: &AppConfig) -> Self {
        Self {
            jwt: JwtService::from_config(&config.api).map(Arc::new),
            analytics_service: Arc::new(AnalyticsService::new(
                storage.clone(),
                config.affiliate.clone(),
            )),
            catalog_service: Arc::new(CatalogService::new(storage.clone())),
            shopper_service: Arc::new(ShopperService::new(storage.clone())),
            newsletter_service: Arc::new(NewsletterService::new(storage.clone())),
            dashboard_service: Arc::new(DashboardService::new(storage.clone())),
            storage,
            app_start_time: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
        }
    }

    /// 注册共享数据和全部路由
    ///
    /// - `/health`：健康检查
    /// - `/api/v1`：公共与登录用户接口（身份可选，部分路由要求登录）
    /// - `/admin/v1`：后台接口（AdminGate）
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.analytics_service.clone()))
            .app_data(web::Data::new(self.catalog_service.clone()))
            .app_data(web::Data::new(self.shopper_service.clone()))
            .app_data(web::Data::new(self.newsletter_service.clone()))
            .app_data(web::Data::new(self.dashboard_service.clone()))
            .app_data(web::Data::new(self.app_start_time.clone()))
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .service(health_routes())
            .service(
                web::scope(ADMIN_PREFIX)
                    .wrap(AdminGate::new(self.storage.clone()))
                    .wrap(IdentityResolver::new(self.jwt.clone()))
                    .configure(handlers::admin::configure),
            )
            .service(
                web::scope(API_PREFIX)
                    .wrap(IdentityResolver::new(self.jwt.clone()))
                    .configure(handlers::configure),
            );
    }
}

/// 安装 rustls 默认加密实现（数据库 TLS 连接需要）
pub fn install_crypto_provider() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))
}

/// 准备服务器启动的上下文：存储（含迁移）和各 service
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    install_crypto_provider()?;

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let context = StartupContext::build(storage, config);
    if context.jwt.is_none() {
        info!("Authenticated and admin routes will answer 401 until api.jwt_secret is set");
    }

    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(context)
}
