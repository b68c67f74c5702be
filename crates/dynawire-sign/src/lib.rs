//! AWS Signature Version 4 request signing for the Dynawire client.
//!
//! This crate implements the signing side of SigV4 for the store's
//! single-shape protocol: every call is a `POST /` with a fixed set of
//! four signed headers. Given credentials, the request scope and a
//! timestamp, [`sign_request`] produces the `Authorization` header value
//! the server will verify by re-deriving the same canonical request.
//!
//! Signing is a pure function of its inputs; callers supply a fresh
//! timestamp per attempt so a retried request is never sent with a
//! stale signature.
//!
//! # Modules
//!
//! - [`canonical`] - canonical request and string-to-sign construction
//! - [`credentials`] - access key and version-prefixed secret material
//! - [`sigv4`] - key derivation chain and signature computation

pub mod canonical;
pub mod credentials;
pub mod sigv4;

pub use canonical::{CONTENT_TYPE, SIGNED_HEADERS};
pub use credentials::Credentials;
pub use sigv4::{SigningParams, format_timestamp, hash_payload, sign_request};
