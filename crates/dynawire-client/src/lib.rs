//! Signed, retrying client for the Dynawire wire format.
//!
//! The client turns a logical operation and an encoded payload into a
//! correctly signed HTTP exchange, classifies the outcome, and retries
//! the transient subset with bounded exponential backoff. All network
//! calls take an explicit [`CancellationToken`] and return promptly
//! when it fires, including during a backoff sleep.
//!
//! ```no_run
//! use dynawire_client::{Client, Endpoint};
//! use dynawire_sign::Credentials;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), dynawire_client::ClientError> {
//! let client = Client::connect(
//!     Endpoint::us_east_1(),
//!     Credentials::new("access-key", "secret-key"),
//! );
//! let cancel = CancellationToken::new();
//! let tables = client.list_tables(None, None, &cancel).await?;
//! # let _ = tables;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`] - endpoint catalog
//! - [`http`] - the HTTP-executing collaborator seam
//! - [`transport`] - one signed exchange and outcome classification
//! - [`retry`] - the backoff policy
//! - [`client`] - the retry loop, admin calls and table cache
//! - [`table`] - typed convenience API over one table

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;
pub mod table;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use config::Endpoint;
pub use error::{ClientError, TransportError};
pub use http::{HttpSend, ReqwestSend};
pub use retry::{RetryBudget, RetryPolicy};
pub use table::Table;
pub use transport::Transport;

pub use tokio_util::sync::CancellationToken;
