//! The `AttributeValue` tagged union.
//!
//! Every scalar or collection field travels as a single-key JSON object
//! like `{"S": "hello"}` or `{"NS": ["1", "2"]}`. Exactly one tag is
//! populated per value; the deserializer rejects anything else as
//! malformed.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::escape::escape_str_into;

/// One wire value.
///
/// Numbers are string-encoded to preserve arbitrary precision, binary
/// values are base64 text, and the set variants hold their elements in
/// the same string-encoded form as the matching scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// String value.
    S(String),
    /// Number value (decimal text).
    N(String),
    /// Binary value (base64-encoded in JSON).
    B(bytes::Bytes),
    /// String set.
    Ss(Vec<String>),
    /// Number set (decimal text elements).
    Ns(Vec<String>),
    /// Binary set (base64-encoded in JSON).
    Bs(Vec<bytes::Bytes>),
}

impl AttributeValue {
    /// Returns the wire tag for this value (e.g. `"S"`, `"NS"`).
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
        }
    }

    /// Returns the string value if this is an `S` variant.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number text if this is an `N` variant.
    #[must_use]
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// Write this value as wire text, e.g. `{"S":"hello"}`.
    ///
    /// Strings use the strict escaping law from [`crate::escape`];
    /// binary payloads are standard padded base64. Set elements are each
    /// individually quoted, numeric ones included.
    pub fn write_wire(&self, out: &mut String) {
        out.push_str("{\"");
        out.push_str(self.tag());
        out.push_str("\":");
        match self {
            Self::S(s) => write_quoted_str(s, out),
            Self::N(n) => write_quoted_str(n, out),
            Self::B(b) => write_quoted_base64(b, out),
            Self::Ss(v) | Self::Ns(v) => {
                write_elements(v.iter().map(String::as_str), write_quoted_str, out);
            }
            Self::Bs(v) => {
                write_elements(v.iter(), |b, out| write_quoted_base64(b, out), out);
            }
        }
        out.push('}');
    }
}

fn write_quoted_str(s: &str, out: &mut String) {
    out.push('"');
    escape_str_into(s, out);
    out.push('"');
}

fn write_quoted_base64(b: &bytes::Bytes, out: &mut String) {
    use base64::Engine;
    out.push('"');
    out.push_str(&base64::engine::general_purpose::STANDARD.encode(b));
    out.push('"');
}

fn write_elements<T>(
    elems: impl Iterator<Item = T>,
    write: impl Fn(T, &mut String),
    out: &mut String,
) {
    out.push('[');
    for (idx, elem) in elems.enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write(elem, out);
    }
    out.push(']');
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "{{S: {s}}}"),
            Self::N(n) => write!(f, "{{N: {n}}}"),
            Self::B(b) => write!(f, "{{B: {} bytes}}", b.len()),
            Self::Ss(v) => write!(f, "{{SS: {v:?}}}"),
            Self::Ns(v) => write!(f, "{{NS: {v:?}}}"),
            Self::Bs(v) => write!(f, "{{BS: {} items}}", v.len()),
        }
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributeValueVisitor)
    }
}

struct AttributeValueVisitor;

impl<'de> Visitor<'de> for AttributeValueVisitor {
    type Value = AttributeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an attribute value object with exactly one type tag")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let Some(tag) = map.next_key::<String>()? else {
            return Err(de::Error::custom(
                "attribute value must carry exactly one type tag",
            ));
        };

        let value = match tag.as_str() {
            "S" => AttributeValue::S(map.next_value()?),
            "N" => AttributeValue::N(map.next_value()?),
            "B" => AttributeValue::B(decode_base64(map.next_value::<String>()?)?),
            "SS" => AttributeValue::Ss(map.next_value()?),
            "NS" => AttributeValue::Ns(map.next_value()?),
            "BS" => {
                let encoded: Vec<String> = map.next_value()?;
                let decoded: Result<Vec<bytes::Bytes>, _> =
                    encoded.into_iter().map(decode_base64).collect();
                AttributeValue::Bs(decoded?)
            }
            other => {
                return Err(de::Error::unknown_field(
                    other,
                    &["S", "N", "B", "SS", "NS", "BS"],
                ));
            }
        };

        // A second tag makes the value ambiguous.
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom(
                "attribute value must carry exactly one type tag",
            ));
        }

        Ok(value)
    }
}

fn decode_base64<E: de::Error>(encoded: String) -> Result<bytes::Bytes, E> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(&encoded)
        .map(bytes::Bytes::from)
        .map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(value: &AttributeValue) -> String {
        let mut out = String::new();
        value.write_wire(&mut out);
        out
    }

    #[test]
    fn test_should_write_string_value() {
        let val = AttributeValue::S("hello".to_owned());
        assert_eq!(wire(&val), r#"{"S":"hello"}"#);
    }

    #[test]
    fn test_should_escape_string_value() {
        let val = AttributeValue::S("a<b>&\"c".to_owned());
        assert_eq!(wire(&val), r#"{"S":"a\u003cb\u003e\u0026\"c"}"#);
    }

    #[test]
    fn test_should_write_number_value() {
        let val = AttributeValue::N("-42".to_owned());
        assert_eq!(wire(&val), r#"{"N":"-42"}"#);
    }

    #[test]
    fn test_should_write_binary_value_as_padded_base64() {
        let val = AttributeValue::B(bytes::Bytes::from_static(b"{}"));
        assert_eq!(wire(&val), r#"{"B":"e30="}"#);
    }

    #[test]
    fn test_should_quote_every_set_element() {
        let val = AttributeValue::Ns(vec!["1".to_owned(), "2".to_owned(), "3".to_owned()]);
        assert_eq!(wire(&val), r#"{"NS":["1","2","3"]}"#);
    }

    #[test]
    fn test_should_write_empty_set_as_empty_array() {
        let val = AttributeValue::Ss(Vec::new());
        assert_eq!(wire(&val), r#"{"SS":[]}"#);
    }

    #[test]
    fn test_should_deserialize_each_tag() {
        let val: AttributeValue = serde_json::from_str(r#"{"S":"hi"}"#).unwrap();
        assert_eq!(val, AttributeValue::S("hi".to_owned()));

        let val: AttributeValue = serde_json::from_str(r#"{"N":"7"}"#).unwrap();
        assert_eq!(val, AttributeValue::N("7".to_owned()));

        let val: AttributeValue = serde_json::from_str(r#"{"B":"e30="}"#).unwrap();
        assert_eq!(val, AttributeValue::B(bytes::Bytes::from_static(b"{}")));

        let val: AttributeValue = serde_json::from_str(r#"{"SS":["a","b"]}"#).unwrap();
        assert!(matches!(val, AttributeValue::Ss(ref v) if v.len() == 2));

        let val: AttributeValue = serde_json::from_str(r#"{"BS":["e30="]}"#).unwrap();
        assert!(matches!(val, AttributeValue::Bs(ref v) if v.len() == 1));
    }

    #[test]
    fn test_should_reject_zero_tags() {
        let result: Result<AttributeValue, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_should_reject_multiple_tags() {
        let result: Result<AttributeValue, _> =
            serde_json::from_str(r#"{"S":"a","N":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_should_reject_unknown_tag() {
        let result: Result<AttributeValue, _> = serde_json::from_str(r#"{"BOOL":true}"#);
        assert!(result.is_err());
    }
}
