use once_cell::sync::Lazy;
use regex::Regex;

static EXPO_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^Expo(nent)?PushToken\[.*\]$").expect("static pattern compiles")
});

/// Bare device ids are accepted in UUID shape
static BARE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z\d]{8}-[a-z\d]{4}-[a-z\d]{4}-[a-z\d]{4}-[a-z\d]{12}$")
        .expect("static pattern compiles")
});

/// Syntactic check only; a well-formed token may still be unregistered
pub fn is_expo_push_token(token: &str) -> bool {
    EXPO_TOKEN.is_match(token) || BARE_TOKEN.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_expo_formats() {
        assert!(is_expo_push_token("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(is_expo_push_token("ExpoPushToken[abc]"));
        assert!(is_expo_push_token("ExponentPushToken[]"));
        assert!(is_expo_push_token("F5741A13-BCDA-434B-A316-5DC0E6FFA94F"));
        assert!(is_expo_push_token("f5741a13-bcda-434b-a316-5dc0e6ffa94f"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_expo_push_token(""));
        assert!(!is_expo_push_token("ExponentPushToken[abc"));
        assert!(!is_expo_push_token("fcm:dQw4w9WgXcQ"));
        assert!(!is_expo_push_token("f5741a13-bcda-434b-a316"));
    }
}
