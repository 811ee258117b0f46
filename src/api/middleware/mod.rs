pub mod auth;
pub mod identity;
pub mod request_id;

pub use auth::{AdminGate, RequireIdentity};
pub use identity::{Identity, IdentityResolver};
pub use request_id::{RequestId, RequestIdMiddleware};
