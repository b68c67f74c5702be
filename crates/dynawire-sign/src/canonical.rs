//! Canonical request construction.
//!
//! The protocol is single-shape: always `POST /` with an empty query
//! string and the same four signed headers. The canonical request is
//! therefore a fixed template:
//!
//! ```text
//! POST\n
//! /\n
//! \n
//! content-type:application/x-amz-json-1.0\n
//! host:<host>\n
//! x-amz-date:<timestamp>\n
//! x-amz-target:<target>\n
//! \n
//! content-type;host;x-amz-date;x-amz-target\n
//! <hex(sha256(payload))>
//! ```
//!
//! Header lines are lowercase and alphabetically ordered; any deviation
//! in order or casing would change the hash and invalidate the
//! signature, so the template keeps the layout byte-exact by
//! construction.

/// Content type of every request body.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// The semicolon-joined signed header names, in sorted order.
pub const SIGNED_HEADERS: &str = "content-type;host;x-amz-date;x-amz-target";

/// Build the canonical request string.
#[must_use]
pub fn build_canonical_request(
    host: &str,
    timestamp: &str,
    target: &str,
    payload_hash: &str,
) -> String {
    format!(
        "POST\n/\n\ncontent-type:{CONTENT_TYPE}\nhost:{host}\nx-amz-date:{timestamp}\nx-amz-target:{target}\n\n{SIGNED_HEADERS}\n{payload_hash}"
    )
}

/// Build the credential scope binding a signature to its context.
#[must_use]
pub fn credential_scope(date: &str, region: &str, service: &str, terminator: &str) -> String {
    format!("{date}/{region}/{service}/{terminator}")
}

/// Build the string to sign from the timestamp, scope and canonical
/// request hash.
#[must_use]
pub fn build_string_to_sign(
    algorithm: &str,
    timestamp: &str,
    scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{algorithm}\n{timestamp}\n{scope}\n{canonical_request_hash}")
}
