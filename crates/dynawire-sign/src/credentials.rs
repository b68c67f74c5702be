//! Access credentials.

use std::fmt;

/// The version prefix mixed into the secret before any key derivation.
const SECRET_PREFIX: &str = "AWS4";

/// An access key identifier paired with version-prefixed secret
/// material.
///
/// The raw secret is combined with the fixed version prefix at
/// construction time and only the prefixed form is kept; per-request
/// signing keys are derived from it through the HMAC chain in
/// [`crate::sigv4`] and discarded after use.
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    prefixed_secret: Vec<u8>,
}

impl Credentials {
    /// Build credentials from an access key and its secret.
    #[must_use]
    pub fn new(access_key: impl Into<String>, secret_key: &str) -> Self {
        let mut prefixed_secret = Vec::with_capacity(SECRET_PREFIX.len() + secret_key.len());
        prefixed_secret.extend_from_slice(SECRET_PREFIX.as_bytes());
        prefixed_secret.extend_from_slice(secret_key.as_bytes());
        Self {
            access_key: access_key.into(),
            prefixed_secret,
        }
    }

    /// The access key identifier.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The version-prefixed secret material used as the root of the key
    /// derivation chain.
    #[must_use]
    pub(crate) fn prefixed_secret(&self) -> &[u8] {
        &self.prefixed_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("prefixed_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_prefix_secret_material() {
        let creds = Credentials::new("AKID", "topsecret");
        assert_eq!(creds.access_key(), "AKID");
        assert_eq!(creds.prefixed_secret(), b"AWS4topsecret");
    }

    #[test]
    fn test_should_redact_secret_in_debug_output() {
        let creds = Credentials::new("AKID", "topsecret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("topsecret"));
    }
}
