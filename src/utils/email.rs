use std::sync::LazyLock;

use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// 邮箱格式校验：`本地部分@域名.后缀`，不含空白，只有一个 `@`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("a.b+tag@mail.co.uk"));
        assert!(is_valid_email("x@y.z"));
        assert!(is_valid_email("x@y..z"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane@.com"));
        assert!(!is_valid_email("jane@example."));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("ja@ne@example.com"));
        assert!(!is_valid_email("jane@example.com\n"));
        assert!(!is_valid_email("jane\t@example.com"));
    }
}
