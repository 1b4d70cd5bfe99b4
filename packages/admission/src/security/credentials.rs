//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate so registry, registrar, news and classifier keys
//! never end up in logs or error messages.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use in a request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Key (and optional secret) for a collaborator API, plus where to send requests.
///
/// GoDaddy needs a key/secret pair; the other APIs only need a token.
#[derive(Clone)]
pub struct ApiCredential {
    pub key: SecretString,
    pub secret: Option<SecretString>,
    pub base_url: Option<String>,
}

impl ApiCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::new(key),
            secret: None,
            base_url: None,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(SecretString::new(secret));
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Read a credential from an env var, treating empty values as unset.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(Self::new)
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("key", &"[REDACTED]")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug() {
        let secret = SecretString::new("gd-super-secret-key");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("gd-super"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credential_debug_redacts_key_and_secret() {
        let cred = ApiCredential::new("key-123")
            .with_secret("secret-456")
            .with_base_url("https://api.ote-godaddy.com");
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("key-123"));
        assert!(!debug.contains("secret-456"));
        assert!(debug.contains("api.ote-godaddy.com"));
    }

    #[test]
    fn test_expose_works() {
        let secret = SecretString::new("hf_token");
        assert_eq!(secret.expose(), "hf_token");
        assert_eq!(secret.clone().expose(), "hf_token");
    }
}
