//! Generic record decoding.
//!
//! Rebuilds a record from a wire [`Item`] through the record's serde
//! `Deserialize` impl. Decoding is lenient by design: attributes the
//! item does not carry are simply not visited (the record's
//! `#[serde(default)]` fills the zero value), and attributes whose tag
//! does not match the requested field type decode as the zero value.
//! This tolerates schema drift between writer and reader versions.

use dynawire_model::{AttributeValue, Item};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, SeqAccess, Visitor};

use crate::error::CodecError;

/// Decode a record from a wire item.
pub fn from_item<T: de::DeserializeOwned>(item: &Item) -> Result<T, CodecError> {
    T::deserialize(ItemDeserializer { item })
}

/// Top-level deserializer: a record is a struct or map of attributes.
struct ItemDeserializer<'a> {
    item: &'a Item,
}

impl<'de> de::Deserializer<'de> for ItemDeserializer<'de> {
    type Error = CodecError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_map(ItemAccess {
            entries: self.item.iter(),
            value: None,
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_any(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_any(visitor)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct enum identifier ignored_any
    }
}

struct ItemAccess<'a> {
    entries: std::collections::btree_map::Iter<'a, String, AttributeValue>,
    value: Option<&'a AttributeValue>,
}

impl<'de> de::MapAccess<'de> for ItemAccess<'de> {
    type Error = CodecError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        match self.entries.next() {
            Some((name, value)) => {
                self.value = Some(value);
                seed.deserialize(BorrowedStrDeserializer::new(name)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, Self::Error> {
        let value = self
            .value
            .take()
            .ok_or_else(|| CodecError::Message("value requested before key".to_owned()))?;
        seed.deserialize(AttrDeserializer { value })
    }
}

/// Deserializes one attribute value into the field type the record's
/// visitor asks for, synthesizing the zero value on tag mismatch.
struct AttrDeserializer<'a> {
    value: &'a AttributeValue,
}

macro_rules! deserialize_parsed_number {
    ($($method:ident => $visit:ident: $ty:ty),+ $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                visitor.$visit(parse_number::<$ty>(self.value.as_n()))
            }
        )+
    };
}

fn parse_number<T: std::str::FromStr + Default>(text: Option<&str>) -> T {
    text.and_then(|n| n.parse().ok()).unwrap_or_default()
}

impl<'de> de::Deserializer<'de> for AttrDeserializer<'de> {
    type Error = CodecError;

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_bool(self.value.as_n() == Some("1"))
    }

    deserialize_parsed_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    fn deserialize_f32<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(CodecError::Unsupported {
            field: String::new(),
            kind: "floating-point number",
        })
    }

    fn deserialize_f64<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(CodecError::Unsupported {
            field: String::new(),
            kind: "floating-point number",
        })
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let ch = self
            .value
            .as_s()
            .and_then(|s| s.chars().next())
            .unwrap_or_default();
        visitor.visit_char(ch)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_borrowed_str(self.value.as_s().unwrap_or_default())
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let bytes = match self.value {
            AttributeValue::B(b) => b.to_vec(),
            _ => Vec::new(),
        };
        visitor.visit_byte_buf(bytes)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        // The attribute is present, so the option is always populated.
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            AttributeValue::Ss(v) => visitor.visit_seq(SetAccess::Str(v.iter())),
            AttributeValue::Ns(v) => visitor.visit_seq(SetAccess::Num(v.iter())),
            AttributeValue::Bs(v) => visitor.visit_seq(SetAccess::Bin(v.iter())),
            _ => visitor.visit_seq(SetAccess::Empty),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(CodecError::Unsupported {
            field: String::new(),
            kind: "nested record",
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        Err(CodecError::Unsupported {
            field: String::new(),
            kind: "nested record",
        })
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        Err(CodecError::Unsupported {
            field: String::new(),
            kind: "enum",
        })
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            AttributeValue::S(s) => visitor.visit_borrowed_str(s),
            AttributeValue::N(n) => {
                if let Ok(i) = n.parse::<i64>() {
                    visitor.visit_i64(i)
                } else if let Ok(u) = n.parse::<u64>() {
                    visitor.visit_u64(u)
                } else {
                    visitor.visit_borrowed_str(n)
                }
            }
            AttributeValue::B(b) => visitor.visit_byte_buf(b.to_vec()),
            AttributeValue::Ss(_) | AttributeValue::Ns(_) | AttributeValue::Bs(_) => {
                self.deserialize_seq(visitor)
            }
        }
    }
}

/// Iterates the elements of one set attribute.
enum SetAccess<'a> {
    Str(std::slice::Iter<'a, String>),
    Num(std::slice::Iter<'a, String>),
    Bin(std::slice::Iter<'a, bytes::Bytes>),
    Empty,
}

impl<'de> SeqAccess<'de> for SetAccess<'de> {
    type Error = CodecError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        match self {
            Self::Str(iter) => iter
                .next()
                .map(|s| seed.deserialize(ScalarDeserializer::Str(s)))
                .transpose(),
            Self::Num(iter) => iter
                .next()
                .map(|n| seed.deserialize(ScalarDeserializer::Num(n)))
                .transpose(),
            Self::Bin(iter) => iter
                .next()
                .map(|b| seed.deserialize(ScalarDeserializer::Bin(b)))
                .transpose(),
            Self::Empty => Ok(None),
        }
    }
}

/// Deserializes one set element with the same leniency as
/// [`AttrDeserializer`].
enum ScalarDeserializer<'a> {
    Str(&'a str),
    Num(&'a str),
    Bin(&'a bytes::Bytes),
}

impl ScalarDeserializer<'_> {
    fn number_text(&self) -> Option<&str> {
        match self {
            Self::Num(n) => Some(n),
            _ => None,
        }
    }
}

macro_rules! deserialize_parsed_element {
    ($($method:ident => $visit:ident: $ty:ty),+ $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                visitor.$visit(parse_number::<$ty>(self.number_text()))
            }
        )+
    };
}

impl<'de> de::Deserializer<'de> for ScalarDeserializer<'de> {
    type Error = CodecError;

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_bool(self.number_text() == Some("1"))
    }

    deserialize_parsed_element! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            Self::Str(s) => visitor.visit_borrowed_str(s),
            _ => visitor.visit_borrowed_str(""),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let bytes = match self {
            Self::Bin(b) => b.to_vec(),
            _ => Vec::new(),
        };
        visitor.visit_byte_buf(bytes)
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            Self::Str(s) | Self::Num(s) => visitor.visit_borrowed_str(s),
            Self::Bin(b) => visitor.visit_byte_buf(b.to_vec()),
        }
    }

    serde::forward_to_deserialize_any! {
        f32 f64 char option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default, rename_all = "PascalCase")]
    struct Sample {
        name: String,
        weight: i64,
        active: bool,
        tags: Vec<String>,
        counts: Vec<u32>,
    }

    fn item_from_json(json: &str) -> Item {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_should_decode_each_field_kind() {
        let item = item_from_json(
            r#"{"Name":{"S":"Tom"},"Weight":{"N":"80"},"Active":{"N":"1"},
               "Tags":{"SS":["a","b"]},"Counts":{"NS":["1","2"]}}"#,
        );
        let sample: Sample = from_item(&item).unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "Tom".to_owned(),
                weight: 80,
                active: true,
                tags: vec!["a".to_owned(), "b".to_owned()],
                counts: vec![1, 2],
            }
        );
    }

    #[test]
    fn test_should_leave_missing_attributes_at_zero_value() {
        let item = item_from_json(r#"{"Name":{"S":"Tom"}}"#);
        let sample: Sample = from_item(&item).unwrap();
        assert_eq!(sample.name, "Tom");
        assert_eq!(sample.weight, 0);
        assert!(!sample.active);
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn test_should_skip_type_mismatched_attributes() {
        let item = item_from_json(r#"{"Name":{"N":"3"},"Weight":{"S":"eighty"}}"#);
        let sample: Sample = from_item(&item).unwrap();
        assert_eq!(sample.name, "");
        assert_eq!(sample.weight, 0);
    }

    #[test]
    fn test_should_ignore_unknown_attributes() {
        let item = item_from_json(r#"{"Name":{"S":"Tom"},"Extra":{"S":"x"}}"#);
        let sample: Sample = from_item(&item).unwrap();
        assert_eq!(sample.name, "Tom");
    }

    #[test]
    fn test_should_decode_bool_digits_only() {
        let item = item_from_json(r#"{"Active":{"N":"true"}}"#);
        let sample: Sample = from_item(&item).unwrap();
        assert!(!sample.active);
    }

    #[test]
    fn test_should_decode_binary_attribute() {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct Blob {
            data: bytes::Bytes,
        }
        let item = item_from_json(r#"{"data":{"B":"e30="}}"#);
        let blob: Blob = from_item(&item).unwrap();
        assert_eq!(blob.data.as_ref(), b"{}");
    }

    #[test]
    fn test_should_decode_present_option_as_some() {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct Opt {
            value: Option<i64>,
        }
        let item = item_from_json(r#"{"value":{"N":"5"}}"#);
        let opt: Opt = from_item(&item).unwrap();
        assert_eq!(opt.value, Some(5));

        let opt: Opt = from_item(&Item::new()).unwrap();
        assert_eq!(opt.value, None);
    }

    #[test]
    fn test_should_decode_number_set_of_bools() {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct Flags {
            flags: Vec<bool>,
        }
        let item = item_from_json(r#"{"flags":{"NS":["1","0","1"]}}"#);
        let flags: Flags = from_item(&item).unwrap();
        assert_eq!(flags.flags, vec![true, false, true]);
    }
}
