//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - CLI mode (one-shot admin commands)

pub mod cli;
pub mod server;
