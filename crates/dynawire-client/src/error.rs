//! Client error taxonomy.
//!
//! Every failure a caller can see falls into one of a few kinds:
//! local payload problems (fatal, raised before any network call),
//! transport-level failures (surfaced as-is, never retried here),
//! classified remote errors (the retryable subset drives the retry
//! loop), retry exhaustion, and cancellation (always terminal).

use dynawire_codec::CodecError;
use dynawire_model::RemoteError;

/// A failure below the HTTP status line: connection, TLS, timeout.
///
/// Classification of these is the caller's concern; the retry loop
/// treats them as terminal.
#[derive(Debug, thiserror::Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Build a transport error from a message alone.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Build a transport error wrapping an underlying cause.
    #[must_use]
    pub fn from_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors surfaced by [`crate::Client`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The payload could not be encoded locally.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Request or response JSON handling failed locally.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The exchange failed before a status line was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The store answered with a non-2xx status.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// The retryable error kept recurring past the attempt budget.
    #[error("retry budget exhausted after {attempts} retries: {source}")]
    RetryExhausted {
        /// Number of retries performed before giving up.
        attempts: u32,
        /// The final classified remote error.
        #[source]
        source: RemoteError,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// `GetItem` found no item for the key.
    #[error("item does not exist")]
    MissingItem,
}

impl ClientError {
    /// Returns `true` if the retry loop may try the call again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote(remote) => remote.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_only_transient_remote_errors_as_retryable() {
        let retryable = ClientError::Remote(RemoteError::from_body(
            500,
            br#"{"__type":"a#InternalServerError","message":"x"}"#,
        ));
        assert!(retryable.is_retryable());

        let terminal = ClientError::Remote(RemoteError::from_body(
            400,
            br#"{"__type":"a#ValidationException","message":"x"}"#,
        ));
        assert!(!terminal.is_retryable());

        assert!(!ClientError::Cancelled.is_retryable());
        assert!(!ClientError::Transport(TransportError::new("refused")).is_retryable());
    }
}
