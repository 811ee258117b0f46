//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the CLI. Each service owns an
//! `Arc<SeaOrmStorage>` handed to it at startup.

mod analytics_service;
mod catalog_service;
mod dashboard_service;
mod newsletter_service;
mod shopper_service;

pub use analytics_service::*;
pub use catalog_service::*;
pub use dashboard_service::*;
pub use newsletter_service::*;
pub use shopper_service::*;
