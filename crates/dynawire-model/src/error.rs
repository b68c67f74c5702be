//! Remote error parsing and retry classification.
//!
//! Non-2xx responses carry a JSON body of the form
//! `{"__type": "com.amazonaws.dynamodb.v20120810#SomeException", "message": "..."}`.
//! The error kind is the text after the `#` namespace separator when one
//! is present. Bodies that are not parseable JSON fall back to a
//! status-code-only description.

use std::fmt;

use serde::Deserialize;

/// Server-reported kinds that are transient and safe to retry.
const RETRYABLE_KINDS: &[&str] = &[
    "InternalServerError",
    "ProvisionedThroughputExceededException",
    "ServiceUnavailable",
];

/// A classified non-2xx response from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The error kind token, with any `#` namespace prefix stripped.
    pub kind: Option<String>,
    /// The human-readable message from the body, if any.
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    message: Option<String>,
}

impl RemoteError {
    /// Parse an error response body, falling back to a status-only error
    /// when the body is not the expected JSON shape.
    #[must_use]
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) else {
            return Self {
                status,
                kind: None,
                message: None,
            };
        };
        let kind = parsed.error_type.map(|t| match t.find('#') {
            Some(idx) => t[idx + 1..].to_owned(),
            None => t,
        });
        Self {
            status,
            kind,
            message: parsed.message,
        }
    }

    /// Returns `true` if the server-reported kind is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| RETRYABLE_KINDS.contains(&kind))
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.message) {
            (Some(kind), Some(message)) => write!(f, "{kind}: {message}"),
            (Some(kind), None) => f.write_str(kind),
            _ => write!(f, "http status {}", self.status),
        }
    }
}

impl std::error::Error for RemoteError {}
