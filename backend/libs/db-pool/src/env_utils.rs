//! Environment variable parsing helpers shared by service configs

use std::str::FromStr;

/// Parse `key`, falling back to `default` when missing or unparsable
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// `None` when missing or unparsable
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

pub fn parse_env_required<T: FromStr>(key: &str) -> Result<T, String> {
    std::env::var(key)
        .map_err(|_| format!("Environment variable {} not found", key))?
        .parse()
        .map_err(|_| format!("Failed to parse environment variable {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_parse_env_with_default() {
        std::env::remove_var("DB_POOL_TEST_PORT");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_PORT", 3000u16), 3000);

        std::env::set_var("DB_POOL_TEST_PORT", "8080");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_PORT", 3000u16), 8080);

        std::env::set_var("DB_POOL_TEST_PORT", "not-a-port");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_PORT", 3000u16), 3000);
        std::env::remove_var("DB_POOL_TEST_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_required() {
        std::env::remove_var("DB_POOL_TEST_REQ");
        assert!(parse_env_required::<u32>("DB_POOL_TEST_REQ").is_err());

        std::env::set_var("DB_POOL_TEST_REQ", "456");
        assert_eq!(parse_env_required::<u32>("DB_POOL_TEST_REQ"), Ok(456));
        std::env::remove_var("DB_POOL_TEST_REQ");
    }
}
