//! HTTP API
//!
//! - `middleware`: request id, identity resolution, access guards
//! - `services`: actix handlers and route tables
//! - `jwt`: identity token verification

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
