//! Typed record codec for the Dynawire wire format.
//!
//! A record type becomes usable with the client by implementing
//! [`WireRecord`], the bidirectional mapping between the native struct
//! and its wire [`Item`]. Two implementations satisfy the same contract:
//!
//! - the generic codec in this crate, driven by the record's serde
//!   `Serialize`/`Deserialize` impls ([`to_item`]/[`from_item`]), wired
//!   up with the [`wire_record!`] macro;
//! - specialized impls emitted offline by the `dynawire-codegen` tool,
//!   which resolve every field kind at generation time.
//!
//! Both obey the same field-to-tag law: booleans encode as the `N`
//! digits `"1"`/`"0"`, integers as decimal `N` text, [`bytes::Bytes`]
//! as base64 `B`, strings as `S`, time instants as `N` nanoseconds
//! since the epoch (see [`instant`]), and homogeneous sequences as the
//! matching set tag. A field whose type has no mapping is a hard
//! [`CodecError::Unsupported`], never a silent skip.
//!
//! Decoding is deliberately lenient to tolerate schema drift: missing
//! attributes leave fields at their zero value (derive `Default` and
//! mark the record `#[serde(default)]`), and type-mismatched attributes
//! decode as the zero value.

pub mod de;
pub mod error;
pub mod instant;
pub mod ser;

pub use de::from_item;
pub use error::CodecError;
pub use ser::to_item;

// Re-exported so `wire_record!` expansions resolve through `$crate`.
pub use dynawire_model::{AttributeValue, Item};

/// The codec contract between a record type and its wire item.
pub trait WireRecord: Sized {
    /// Attribute names forming the primary key, partition key first.
    fn key_attributes() -> &'static [&'static str];

    /// Convert this record into its wire item.
    fn to_item(&self) -> Result<Item, CodecError>;

    /// Rebuild a record from a wire item.
    ///
    /// Attributes that are absent or carry a mismatched tag leave the
    /// corresponding field at its zero value.
    fn from_item(item: &Item) -> Result<Self, CodecError>;
}

/// Implement [`WireRecord`] for a serde-capable record type.
///
/// The record should derive `Serialize`, `Deserialize`, `Default` and
/// carry `#[serde(default)]` so lenient decoding can fall back to zero
/// values.
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
/// #[serde(default)]
/// struct Reading {
///     #[serde(rename = "Sensor")]
///     sensor: String,
///     #[serde(rename = "Value")]
///     value: i64,
/// }
///
/// dynawire_codec::wire_record!(Reading, keys = ["Sensor"]);
/// ```
#[macro_export]
macro_rules! wire_record {
    ($record:ty, keys = [$($key:literal),+ $(,)?]) => {
        impl $crate::WireRecord for $record {
            fn key_attributes() -> &'static [&'static str] {
                &[$($key),+]
            }

            fn to_item(&self) -> Result<$crate::Item, $crate::CodecError> {
                $crate::to_item(self)
            }

            fn from_item(item: &$crate::Item) -> Result<Self, $crate::CodecError> {
                $crate::from_item(item)
            }
        }
    };
}
