//! One signed HTTP exchange.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use dynawire_model::{Operation, RemoteError};
use dynawire_sign::{CONTENT_TYPE, Credentials, SigningParams, format_timestamp, sign_request};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Endpoint;
use crate::error::ClientError;
use crate::http::HttpSend;

/// Issues one signed call and classifies the outcome.
///
/// Each call computes a fresh timestamp and signature, races the
/// exchange against the cancellation token, and turns non-2xx
/// responses into classified [`RemoteError`]s. Retrying is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct Transport {
    endpoint: Endpoint,
    credentials: Credentials,
    sender: Arc<dyn HttpSend>,
}

impl Transport {
    /// Build a transport over the given endpoint and sender.
    #[must_use]
    pub fn new(endpoint: Endpoint, credentials: Credentials, sender: Arc<dyn HttpSend>) -> Self {
        Self {
            endpoint,
            credentials,
            sender,
        }
    }

    /// The endpoint this transport is bound to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Execute exactly one signed exchange.
    ///
    /// Exactly one of a response or an error is produced. If `cancel`
    /// fires while the call is in flight, the in-flight future is
    /// dropped (best-effort abort) and [`ClientError::Cancelled`] is
    /// returned without waiting for the call to finish.
    pub async fn send(
        &self,
        operation: Operation,
        payload: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Bytes, ClientError> {
        let timestamp = format_timestamp(Utc::now());
        let target = operation.target();
        let authorization = sign_request(
            &SigningParams {
                credentials: &self.credentials,
                region: self.endpoint.region(),
                host: self.endpoint.host(),
                target: &target,
                timestamp: &timestamp,
            },
            payload,
        );

        let request = http::Request::builder()
            .method(http::Method::POST)
            .uri(self.endpoint.url())
            .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
            .header(http::header::HOST, self.endpoint.host())
            .header("x-amz-date", &timestamp)
            .header("x-amz-target", &target)
            .header(http::header::AUTHORIZATION, &authorization)
            .body(Bytes::copy_from_slice(payload))
            .map_err(|err| {
                crate::error::TransportError::from_source("building request failed", err)
            })?;

        debug!(operation = %operation, host = self.endpoint.host(), "sending request");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = self.sender.send(request) => result?,
        };

        let status = response.status();
        let body = response.into_body();
        if status.is_success() {
            debug!(operation = %operation, status = %status, "request succeeded");
            return Ok(body);
        }

        let remote = RemoteError::from_body(status.as_u16(), &body);
        debug!(operation = %operation, status = %status, error = %remote, "request failed");
        Err(ClientError::Remote(remote))
    }
}
