//! Admin API 服务模块
//!
//! 所有端点都在 AdminGate 之后：
//! - 商品 CRUD
//! - 用户 / 订阅者列表
//! - 首页计数与全站统计

mod overview;
mod people;
mod products;
pub mod routes;

pub use routes::{configure, products_routes};
