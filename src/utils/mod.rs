pub mod email;
pub mod money;
pub mod request_meta;
pub mod url_validator;

pub use email::is_valid_email;
pub use money::round_money;
pub use request_meta::{RequestMeta, UNKNOWN};
pub use url_validator::{UrlValidationError, validate_url};
