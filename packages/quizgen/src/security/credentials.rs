//! API key handling.
//!
//! Uses the `secrecy` crate so keys never show up in logs or debug output.

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};

/// An inference API key that redacts itself when formatted.
pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(value.into().into_boxed_str()))
    }

    /// The raw key. Only call this when building the request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_redacted_when_formatted() {
        let key = ApiKey::new("sk-live-123456");
        assert!(!format!("{key:?}").contains("sk-live"));
        assert_eq!(format!("{key}"), "[REDACTED]");
        assert_eq!(key.expose(), "sk-live-123456");
    }

    #[test]
    fn test_blank_key_is_empty() {
        assert!(ApiKey::from("  ").is_empty());
        assert!(!ApiKey::from("sk").is_empty());
    }
}
