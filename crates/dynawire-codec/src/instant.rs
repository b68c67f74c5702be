//! Serde adapter for time-instant fields.
//!
//! The wire format stores instants as `N` decimal nanoseconds since the
//! Unix epoch, UTC. Annotate record fields with
//! `#[serde(with = "dynawire_codec::instant")]` so the generic codec
//! applies that law instead of chrono's default RFC 3339 text form.
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Event {
//!     #[serde(with = "dynawire_codec::instant")]
//!     at: DateTime<Utc>,
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize an instant as nanoseconds since the epoch.
pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    let nanos = instant
        .timestamp_nanos_opt()
        .ok_or_else(|| serde::ser::Error::custom("instant out of nanosecond range"))?;
    serializer.serialize_i64(nanos)
}

/// Deserialize an instant from nanoseconds since the epoch.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let nanos = i64::deserialize(deserializer)?;
    Ok(DateTime::from_timestamp_nanos(nanos))
}
