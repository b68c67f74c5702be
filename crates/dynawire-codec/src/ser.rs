//! Generic record encoding.
//!
//! Drives a record's `Serialize` impl into an [`Item`], applying the
//! field-to-tag mapping law. The serializer only accepts the shapes the
//! wire format can carry; anything else fails fast with
//! [`CodecError::Unsupported`] naming the offending field.

use bytes::Bytes;
use dynawire_model::{AttributeValue, Item};
use serde::Serialize;
use serde::ser::{self, Impossible};

use crate::error::CodecError;

/// Encode a record into its wire item.
///
/// Fields map to tags by value kind: booleans and integers to `N`,
/// strings to `S`, byte payloads to `B`, homogeneous sequences to the
/// matching set tag. `None` fields are omitted from the item.
pub fn to_item<T: Serialize>(record: &T) -> Result<Item, CodecError> {
    record.serialize(RecordSerializer)
}

/// Top-level serializer: only structs and maps form records.
struct RecordSerializer;

impl ser::Serializer for RecordSerializer {
    type Ok = Item;
    type Error = CodecError;

    type SerializeSeq = Impossible<Item, CodecError>;
    type SerializeTuple = Impossible<Item, CodecError>;
    type SerializeTupleStruct = Impossible<Item, CodecError>;
    type SerializeTupleVariant = Impossible<Item, CodecError>;
    type SerializeMap = ItemBuilder;
    type SerializeStruct = ItemBuilder;
    type SerializeStructVariant = Impossible<Item, CodecError>;

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(ItemBuilder::default())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(ItemBuilder::default())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_i8(self, _v: i8) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_i16(self, _v: i16) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_i32(self, _v: i32) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_i64(self, _v: i64) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_u8(self, _v: u8) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_u16(self, _v: u16) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_u32(self, _v: u32) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_u64(self, _v: u64) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_char(self, _v: char) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_str(self, _v: &str) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(CodecError::NotARecord)
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(CodecError::NotARecord)
    }
}

/// Accumulates attribute pairs for a struct or map record.
#[derive(Default)]
struct ItemBuilder {
    item: Item,
    pending_key: Option<String>,
}

impl ItemBuilder {
    fn insert_value<T: Serialize + ?Sized>(
        &mut self,
        field: &str,
        value: &T,
    ) -> Result<(), CodecError> {
        if let Some(av) = value.serialize(ValueSerializer { field })? {
            self.item.insert(field.to_owned(), av);
        }
        Ok(())
    }
}

impl ser::SerializeStruct for ItemBuilder {
    type Ok = Item;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.insert_value(key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.item)
    }
}

impl ser::SerializeMap for ItemBuilder {
    type Ok = Item;
    type Error = CodecError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Self::Error> {
        self.pending_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| CodecError::Message("value serialized before key".to_owned()))?;
        self.insert_value(&key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(self.item)
    }
}

/// Serializes one field value into at most one [`AttributeValue`].
///
/// `None` yields no attribute at all, which is how optional fields are
/// omitted from the item.
struct ValueSerializer<'a> {
    field: &'a str,
}

impl<'a> ValueSerializer<'a> {
    fn unsupported<T>(&self, kind: &'static str) -> Result<T, CodecError> {
        Err(CodecError::Unsupported {
            field: self.field.to_owned(),
            kind,
        })
    }
}

macro_rules! serialize_number {
    ($($method:ident: $ty:ty),+ $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
                Ok(Some(AttributeValue::N(v.to_string())))
            }
        )+
    };
}

impl<'a> ser::Serializer for ValueSerializer<'a> {
    type Ok = Option<AttributeValue>;
    type Error = CodecError;

    type SerializeSeq = SetBuilder<'a>;
    type SerializeTuple = SetBuilder<'a>;
    type SerializeTupleStruct = Impossible<Option<AttributeValue>, CodecError>;
    type SerializeTupleVariant = Impossible<Option<AttributeValue>, CodecError>;
    type SerializeMap = Impossible<Option<AttributeValue>, CodecError>;
    type SerializeStruct = Impossible<Option<AttributeValue>, CodecError>;
    type SerializeStructVariant = Impossible<Option<AttributeValue>, CodecError>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        // The wire form of a boolean is the digit, never true/false.
        Ok(Some(AttributeValue::N(
            if v { "1" } else { "0" }.to_owned(),
        )))
    }

    serialize_number! {
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        self.unsupported("floating-point number")
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        self.unsupported("floating-point number")
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        Ok(Some(AttributeValue::S(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(Some(AttributeValue::S(v.to_owned())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(Some(AttributeValue::B(Bytes::copy_from_slice(v))))
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(None)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        self.unsupported("unit")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.unsupported("unit struct")
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.unsupported("enum")
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        self.unsupported("enum")
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(SetBuilder {
            field: self.field,
            elems: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.unsupported("tuple struct")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        self.unsupported("enum")
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        self.unsupported("nested record")
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        self.unsupported("nested record")
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        self.unsupported("enum")
    }
}

/// Collects sequence elements and infers the set tag from the first one.
struct SetBuilder<'a> {
    field: &'a str,
    elems: Vec<AttributeValue>,
}

impl SetBuilder<'_> {
    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        let Some(av) = value.serialize(ValueSerializer { field: self.field })? else {
            return Err(CodecError::Unsupported {
                field: self.field.to_owned(),
                kind: "optional set element",
            });
        };
        match av {
            AttributeValue::S(_) | AttributeValue::N(_) | AttributeValue::B(_) => {
                self.elems.push(av);
                Ok(())
            }
            _ => Err(CodecError::Unsupported {
                field: self.field.to_owned(),
                kind: "nested sequence",
            }),
        }
    }

    fn finish(self) -> Result<Option<AttributeValue>, CodecError> {
        let mixed = || CodecError::Unsupported {
            field: self.field.to_owned(),
            kind: "mixed-kind sequence",
        };
        match self.elems.first().map(AttributeValue::tag) {
            None => Err(CodecError::EmptySet {
                field: self.field.to_owned(),
            }),
            Some("S") => {
                let mut out = Vec::with_capacity(self.elems.len());
                for elem in &self.elems {
                    out.push(elem.as_s().ok_or_else(mixed)?.to_owned());
                }
                Ok(Some(AttributeValue::Ss(out)))
            }
            Some("N") => {
                let mut out = Vec::with_capacity(self.elems.len());
                for elem in &self.elems {
                    out.push(elem.as_n().ok_or_else(mixed)?.to_owned());
                }
                Ok(Some(AttributeValue::Ns(out)))
            }
            Some(_) => {
                let mut out = Vec::with_capacity(self.elems.len());
                for elem in &self.elems {
                    match elem {
                        AttributeValue::B(b) => out.push(b.clone()),
                        _ => return Err(mixed()),
                    }
                }
                Ok(Some(AttributeValue::Bs(out)))
            }
        }
    }
}

impl ser::SerializeSeq for SetBuilder<'_> {
    type Ok = Option<AttributeValue>;
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

impl ser::SerializeTuple for SetBuilder<'_> {
    type Ok = Option<AttributeValue>;
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.finish()
    }
}

/// Map keys must be plain strings.
struct KeySerializer;

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = CodecError;

    type SerializeSeq = Impossible<String, CodecError>;
    type SerializeTuple = Impossible<String, CodecError>;
    type SerializeTupleStruct = Impossible<String, CodecError>;
    type SerializeTupleVariant = Impossible<String, CodecError>;
    type SerializeMap = Impossible<String, CodecError>;
    type SerializeStruct = Impossible<String, CodecError>;
    type SerializeStructVariant = Impossible<String, CodecError>;

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(v.to_owned())
    }

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_i8(self, _v: i8) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_i16(self, _v: i16) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_i32(self, _v: i32) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_i64(self, _v: i64) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_u8(self, _v: u8) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_u16(self, _v: u16) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_u32(self, _v: u32) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_u64(self, _v: u64) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        Ok(v.to_string())
    }
    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        Err(key_error())
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(key_error())
    }
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(key_error())
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(key_error())
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(key_error())
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(key_error())
    }
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(key_error())
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(key_error())
    }
}

fn key_error() -> CodecError {
    CodecError::Message("map key must be a string".to_owned())
}
