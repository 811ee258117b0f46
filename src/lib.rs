//! Affilink - affiliate storefront backend
//!
//! This library provides the core functionality for the Affilink service:
//! a product catalog, shopper carts and saved lists, a newsletter, and
//! affiliate click attribution with conversion analytics.
//!
//! # Architecture
//! - `analytics`: Click recording, conversion updates, aggregation and UTM links
//! - `storage`: SeaORM storage backend and domain models
//! - `services`: Business logic shared by the HTTP API and the CLI
//! - `api`: HTTP handlers, identity middleware and response envelope
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
