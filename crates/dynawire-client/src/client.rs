//! The client: retrying invoke loop, table administration calls and the
//! table-handle cache.

use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use dynawire_model::types::{
    CreateTableInput, ListTablesOutput, TableDescription, TableDescriptionWrapper,
    UpdateTableInput,
};
use dynawire_model::{Operation, types};
use dynawire_sign::Credentials;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Endpoint;
use crate::error::ClientError;
use crate::http::{HttpSend, ReqwestSend};
use crate::retry::RetryPolicy;
use crate::table::Table;
use crate::transport::Transport;

/// A handle to the remote store.
///
/// Cheap to clone; all clones share the endpoint, credentials, retry
/// policy and the underlying connection pool. Concurrent calls share no
/// mutable state beyond the table-handle cache, which is a concurrent
/// map.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    transport: Transport,
    policy: RetryPolicy,
    tables: DashMap<String, Arc<str>>,
}

/// Configures and builds a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    endpoint: Endpoint,
    credentials: Credentials,
    sender: Option<Arc<dyn HttpSend>>,
    policy: RetryPolicy,
}

impl ClientBuilder {
    /// Substitute the HTTP-executing collaborator (e.g. a mock, or a
    /// specially configured pool).
    #[must_use]
    pub fn sender(mut self, sender: Arc<dyn HttpSend>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client {
        let sender = self
            .sender
            .unwrap_or_else(|| Arc::new(ReqwestSend::default()));
        Client {
            inner: Arc::new(ClientInner {
                transport: Transport::new(self.endpoint, self.credentials, sender),
                policy: self.policy,
                tables: DashMap::new(),
            }),
        }
    }
}

impl Client {
    /// Connect to an endpoint with the default transport and retry
    /// policy.
    #[must_use]
    pub fn connect(endpoint: Endpoint, credentials: Credentials) -> Self {
        Self::builder(endpoint, credentials).build()
    }

    /// Start building a client with custom collaborators.
    #[must_use]
    pub fn builder(endpoint: Endpoint, credentials: Credentials) -> ClientBuilder {
        ClientBuilder {
            endpoint,
            credentials,
            sender: None,
            policy: RetryPolicy::default(),
        }
    }

    /// The endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        self.inner.transport.endpoint()
    }

    /// Get a handle to a table, reusing the cached handle name on
    /// repeat lookups.
    #[must_use]
    pub fn table(&self, name: &str) -> Table {
        let interned = self
            .inner
            .tables
            .entry(name.to_owned())
            .or_insert_with(|| Arc::from(name))
            .clone();
        Table::new(self.clone(), interned)
    }

    /// Invoke one logical operation with an already encoded payload.
    ///
    /// Retryable remote errors are retried with exponential backoff
    /// (`2^attempt * 50ms`, unjittered) up to the configured budget;
    /// every attempt is signed afresh. Cancellation preempts both the
    /// in-flight exchange and any backoff sleep.
    pub async fn invoke(
        &self,
        operation: Operation,
        payload: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Bytes, ClientError> {
        let policy = self.inner.policy;
        let mut attempt: u32 = 0;
        loop {
            match self.inner.transport.send(operation, payload, cancel).await {
                Ok(bytes) => return Ok(bytes),
                Err(ClientError::Remote(remote)) if remote.is_retryable() => {
                    if policy.is_exhausted(attempt) {
                        // A zero budget means "never retry": the first
                        // failure is surfaced unchanged rather than
                        // reported as exhaustion.
                        if attempt == 0 {
                            return Err(ClientError::Remote(remote));
                        }
                        return Err(ClientError::RetryExhausted {
                            attempts: attempt,
                            source: remote,
                        });
                    }
                    let delay = policy.delay_for(attempt);
                    attempt += 1;
                    debug!(
                        operation = %operation,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %remote,
                        "retrying after backoff"
                    );
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(ClientError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Invoke an operation with a JSON-serializable parameter object.
    pub async fn call<P: Serialize>(
        &self,
        operation: Operation,
        params: &P,
        cancel: &CancellationToken,
    ) -> Result<Bytes, ClientError> {
        let payload = serde_json::to_vec(params)?;
        self.invoke(operation, &payload, cancel).await
    }

    /// Create a table and return its description.
    pub async fn create_table(
        &self,
        input: &CreateTableInput,
        cancel: &CancellationToken,
    ) -> Result<TableDescription, ClientError> {
        let body = self.call(Operation::CreateTable, input, cancel).await?;
        let wrapper: TableDescriptionWrapper = serde_json::from_slice(&body)?;
        Ok(wrapper.table_description)
    }

    /// Describe a table.
    pub async fn describe_table(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<TableDescription, ClientError> {
        let params = serde_json::json!({ "TableName": name });
        let body = self.call(Operation::DescribeTable, &params, cancel).await?;
        let output: types::DescribeTableOutput = serde_json::from_slice(&body)?;
        Ok(output.table)
    }

    /// Delete a table and return its final description.
    pub async fn delete_table(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<TableDescription, ClientError> {
        let params = serde_json::json!({ "TableName": name });
        let body = self.call(Operation::DeleteTable, &params, cancel).await?;
        let wrapper: TableDescriptionWrapper = serde_json::from_slice(&body)?;
        Ok(wrapper.table_description)
    }

    /// Update a table's throughput or index configuration.
    pub async fn update_table(
        &self,
        input: &UpdateTableInput,
        cancel: &CancellationToken,
    ) -> Result<TableDescription, ClientError> {
        let body = self.call(Operation::UpdateTable, input, cancel).await?;
        let wrapper: TableDescriptionWrapper = serde_json::from_slice(&body)?;
        Ok(wrapper.table_description)
    }

    /// List table names, optionally bounded and resumed from a cursor.
    pub async fn list_tables(
        &self,
        limit: Option<u32>,
        start_table: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ListTablesOutput, ClientError> {
        let mut params = serde_json::Map::new();
        if let Some(limit) = limit {
            params.insert("Limit".to_owned(), limit.into());
        }
        if let Some(start) = start_table {
            params.insert("ExclusiveStartTableName".to_owned(), start.into());
        }
        let body = self
            .call(Operation::ListTables, &serde_json::Value::Object(params), cancel)
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
