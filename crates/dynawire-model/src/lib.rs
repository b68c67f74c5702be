//! Wire-format data model for the Dynawire DynamoDB client.
//!
//! This crate defines the types that appear on the wire when talking to
//! DynamoDB's `application/x-amz-json-1.0` protocol:
//!
//! - [`AttributeValue`] - the tagged union carrying one field value
//! - [`Item`] - an ordered mapping from attribute name to value
//! - [`Operation`] - the logical remote call names
//! - [`RemoteError`] - parsed non-2xx responses and their retry classification
//! - table administration input/output shapes
//!
//! Request bodies are produced by the writer functions in [`item`] and
//! [`escape`], which implement the strict escaping law the store expects.
//! Responses are ordinary JSON and are decoded with serde.

pub mod attribute_value;
pub mod error;
pub mod escape;
pub mod item;
pub mod operations;
pub mod types;

pub use attribute_value::AttributeValue;
pub use error::RemoteError;
pub use escape::{escape_into, escape_str_into};
pub use item::{Item, write_attribute, write_item};
pub use operations::Operation;
