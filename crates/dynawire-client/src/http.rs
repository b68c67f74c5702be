//! The HTTP-executing collaborator.
//!
//! The client never talks to a socket directly; it hands a fully built
//! request to an [`HttpSend`] implementation. The default is a thin
//! wrapper over a shared [`reqwest::Client`] (connection pooling and
//! parallelism limits live there), and tests substitute an in-process
//! mock.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransportError;

/// Executes exactly one HTTP exchange.
#[async_trait]
pub trait HttpSend: Send + Sync + fmt::Debug {
    /// Perform the request and return the full response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] for failures below the status line
    /// (connection, TLS, timeout).
    async fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError>;
}

/// [`HttpSend`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestSend {
    client: reqwest::Client,
}

impl ReqwestSend {
    /// Wrap an existing client, keeping its pool configuration.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestSend {
    async fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError> {
        let request = reqwest::Request::try_from(request)
            .map_err(|err| TransportError::from_source("invalid request", err))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| TransportError::from_source("request failed", err))?;

        let mut builder = http::Response::builder().status(response.status());
        for (name, value) in response.headers() {
            builder = builder.header(name, value);
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::from_source("reading response body failed", err))?;

        builder
            .body(body)
            .map_err(|err| TransportError::from_source("invalid response", err))
    }
}
