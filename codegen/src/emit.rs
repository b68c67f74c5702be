//! Code emission.
//!
//! Produces the generated source for one schema unit: the cleaned
//! struct declarations (directives stripped, standard derives added)
//! plus a specialized `WireRecord` impl per record. Output is a pure
//! function of the parsed schema, so regenerating from the same input
//! yields byte-identical text.

use std::fmt::Write;

use anyhow::Result;

use crate::model::{FieldModel, Kind, RecordModel, Scalar, Schema};

/// Generated output for one schema unit.
#[derive(Debug)]
pub struct Generated {
    /// The emitted source text, or `None` when no record survived.
    pub code: Option<String>,
    /// One message per skipped record.
    pub errors: Vec<String>,
}

/// Generate the output source for a parsed schema.
pub fn generate(schema: &Schema, input_name: &str) -> Result<Generated> {
    if schema.records.is_empty() {
        return Ok(Generated {
            code: None,
            errors: schema.errors.clone(),
        });
    }

    let mut out = String::with_capacity(4 * 1024);
    writeln!(
        out,
        "// Generated by dynawire-codegen from {input_name}. DO NOT EDIT."
    )?;
    writeln!(out)?;

    let needs_bytes = any_scalar(schema, &Scalar::Binary);
    let needs_chrono = any_scalar(schema, &Scalar::Instant);
    if needs_bytes {
        writeln!(out, "use bytes::Bytes;")?;
    }
    if needs_chrono {
        writeln!(out, "use chrono::{{DateTime, Utc}};")?;
    }
    if needs_bytes || needs_chrono {
        writeln!(out)?;
    }
    writeln!(out, "use dynawire_codec::{{CodecError, WireRecord}};")?;
    writeln!(out, "use dynawire_model::{{AttributeValue, Item}};")?;

    for record in &schema.records {
        writeln!(out)?;
        write_struct(&mut out, record)?;
        writeln!(out)?;
        write_impl(&mut out, record)?;
    }

    Ok(Generated {
        code: Some(out),
        errors: schema.errors.clone(),
    })
}

fn any_scalar(schema: &Schema, scalar: &Scalar) -> bool {
    schema.records.iter().any(|record| {
        record.fields.iter().any(|field| match &field.kind {
            Kind::Scalar(s) | Kind::Set(s) | Kind::Optional(s) => s == scalar,
        })
    })
}

fn field_type_text(kind: &Kind) -> String {
    match kind {
        Kind::Scalar(scalar) => scalar.type_text(),
        Kind::Set(scalar) => format!("Vec<{}>", scalar.type_text()),
        Kind::Optional(scalar) => format!("Option<{}>", scalar.type_text()),
    }
}

fn write_struct(out: &mut String, record: &RecordModel) -> Result<()> {
    writeln!(out, "#[derive(Debug, Clone, Default, PartialEq)]")?;
    writeln!(out, "pub struct {} {{", record.name)?;
    for field in &record.fields {
        writeln!(out, "    pub {}: {},", field.name, field_type_text(&field.kind))?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

fn write_impl(out: &mut String, record: &RecordModel) -> Result<()> {
    writeln!(out, "impl WireRecord for {} {{", record.name)?;

    writeln!(out, "    fn key_attributes() -> &'static [&'static str] {{")?;
    if record.key_attributes.is_empty() {
        writeln!(out, "        &[]")?;
    } else {
        let quoted: Vec<String> = record
            .key_attributes
            .iter()
            .map(|attr| format!("\"{attr}\""))
            .collect();
        writeln!(out, "        &[{}]", quoted.join(", "))?;
    }
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    fn to_item(&self) -> Result<Item, CodecError> {{")?;
    writeln!(out, "        let mut item = Item::new();")?;
    for field in encoded_fields(record) {
        write_encode_field(out, field)?;
    }
    writeln!(out, "        Ok(item)")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    fn from_item(item: &Item) -> Result<Self, CodecError> {{")?;
    writeln!(out, "        let mut record = Self::default();")?;
    for field in encoded_fields(record) {
        write_decode_field(out, field)?;
    }
    writeln!(out, "        Ok(record)")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    Ok(())
}

fn encoded_fields(record: &RecordModel) -> impl Iterator<Item = &FieldModel> {
    record.fields.iter().filter(|field| !field.skip)
}

/// The encode expression for a scalar, reading from `access`.
fn scalar_encode_expr(scalar: &Scalar, access: &str, deref: bool) -> String {
    match scalar {
        Scalar::Bool => {
            let cond = if deref {
                format!("*{access}")
            } else {
                access.to_owned()
            };
            format!("AttributeValue::N(if {cond} {{ \"1\" }} else {{ \"0\" }}.to_owned())")
        }
        Scalar::Integer(_) => format!("AttributeValue::N({access}.to_string())"),
        Scalar::Text => format!("AttributeValue::S({access}.clone())"),
        Scalar::Binary => format!("AttributeValue::B({access}.clone())"),
        Scalar::Instant => format!("AttributeValue::N({access}.to_string())"),
    }
}

fn write_insert(out: &mut String, indent: &str, attr: &str, expr: &str) -> Result<()> {
    let single = format!("{indent}item.insert(\"{attr}\".to_owned(), {expr});");
    if single.len() < 100 {
        writeln!(out, "{single}")?;
    } else {
        writeln!(out, "{indent}item.insert(")?;
        writeln!(out, "{indent}    \"{attr}\".to_owned(),")?;
        writeln!(out, "{indent}    {expr},")?;
        writeln!(out, "{indent});")?;
    }
    Ok(())
}

fn write_encode_field(out: &mut String, field: &FieldModel) -> Result<()> {
    let attr = &field.attr;
    let this = format!("self.{}", field.name);
    match &field.kind {
        Kind::Scalar(Scalar::Instant) => {
            writeln!(out, "        let nanos = self")?;
            writeln!(out, "            .{}", field.name)?;
            writeln!(out, "            .timestamp_nanos_opt()")?;
            writeln!(
                out,
                "            .ok_or_else(|| CodecError::Message(\"instant out of nanosecond range\".to_owned()))?;"
            )?;
            write_insert(out, "        ", attr, &scalar_encode_expr(&Scalar::Instant, "nanos", false))?;
        }
        Kind::Scalar(scalar) => {
            write_insert(out, "        ", attr, &scalar_encode_expr(scalar, &this, false))?;
        }
        Kind::Set(scalar) => {
            let expr = match scalar {
                Scalar::Text => format!("AttributeValue::Ss({this}.clone())"),
                Scalar::Binary => format!("AttributeValue::Bs({this}.clone())"),
                Scalar::Integer(_) => {
                    format!("AttributeValue::Ns({this}.iter().map(ToString::to_string).collect())")
                }
                Scalar::Bool => format!(
                    "AttributeValue::Ns({this}.iter().map(|v| if *v {{ \"1\" }} else {{ \"0\" }}.to_owned()).collect())"
                ),
                Scalar::Instant => unreachable!("instant sets are rejected during parsing"),
            };
            write_insert(out, "        ", attr, &expr)?;
        }
        Kind::Optional(Scalar::Instant) => {
            writeln!(out, "        if let Some(value) = &{this} {{")?;
            writeln!(out, "            let nanos = value")?;
            writeln!(out, "                .timestamp_nanos_opt()")?;
            writeln!(
                out,
                "                .ok_or_else(|| CodecError::Message(\"instant out of nanosecond range\".to_owned()))?;"
            )?;
            write_insert(out, "            ", attr, &scalar_encode_expr(&Scalar::Instant, "nanos", false))?;
            writeln!(out, "        }}")?;
        }
        Kind::Optional(scalar) => {
            writeln!(out, "        if let Some(value) = &{this} {{")?;
            write_insert(out, "            ", attr, &scalar_encode_expr(scalar, "value", true))?;
            writeln!(out, "        }}")?;
        }
    }
    Ok(())
}

fn write_decode_field(out: &mut String, field: &FieldModel) -> Result<()> {
    let attr = &field.attr;
    let name = &field.name;
    match &field.kind {
        Kind::Scalar(Scalar::Text) => {
            writeln!(
                out,
                "        if let Some(AttributeValue::S(value)) = item.get(\"{attr}\") {{"
            )?;
            writeln!(out, "            record.{name}.clone_from(value);")?;
            writeln!(out, "        }}")?;
        }
        Kind::Scalar(Scalar::Integer(_)) => {
            writeln!(
                out,
                "        if let Some(AttributeValue::N(value)) = item.get(\"{attr}\") {{"
            )?;
            writeln!(out, "            record.{name} = value.parse().unwrap_or_default();")?;
            writeln!(out, "        }}")?;
        }
        Kind::Scalar(Scalar::Bool) => {
            writeln!(
                out,
                "        if let Some(AttributeValue::N(value)) = item.get(\"{attr}\") {{"
            )?;
            writeln!(out, "            if value.as_str() == \"1\" {{")?;
            writeln!(out, "                record.{name} = true;")?;
            writeln!(out, "            }} else if value.as_str() == \"0\" {{")?;
            writeln!(out, "                record.{name} = false;")?;
            writeln!(out, "            }}")?;
            writeln!(out, "        }}")?;
        }
        Kind::Scalar(Scalar::Binary) => {
            writeln!(
                out,
                "        if let Some(AttributeValue::B(value)) = item.get(\"{attr}\") {{"
            )?;
            writeln!(out, "            record.{name} = value.clone();")?;
            writeln!(out, "        }}")?;
        }
        Kind::Scalar(Scalar::Instant) => {
            writeln!(
                out,
                "        if let Some(AttributeValue::N(value)) = item.get(\"{attr}\") {{"
            )?;
            writeln!(
                out,
                "            record.{name} = DateTime::from_timestamp_nanos(value.parse::<i64>().unwrap_or_default());"
            )?;
            writeln!(out, "        }}")?;
        }
        Kind::Set(scalar) => {
            let (tag, assign) = match scalar {
                Scalar::Text => ("Ss", format!("record.{name} = values.clone();")),
                Scalar::Binary => ("Bs", format!("record.{name} = values.clone();")),
                Scalar::Integer(_) => (
                    "Ns",
                    format!(
                        "record.{name} = values.iter().map(|v| v.parse().unwrap_or_default()).collect();"
                    ),
                ),
                Scalar::Bool => (
                    "Ns",
                    format!("record.{name} = values.iter().map(|v| v.as_str() == \"1\").collect();"),
                ),
                Scalar::Instant => unreachable!("instant sets are rejected during parsing"),
            };
            writeln!(
                out,
                "        if let Some(AttributeValue::{tag}(values)) = item.get(\"{attr}\") {{"
            )?;
            writeln!(out, "            {assign}")?;
            writeln!(out, "        }}")?;
        }
        Kind::Optional(scalar) => {
            let (tag, expr) = match scalar {
                Scalar::Text => ("S", "Some(value.clone())".to_owned()),
                Scalar::Binary => ("B", "Some(value.clone())".to_owned()),
                Scalar::Integer(_) => ("N", "Some(value.parse().unwrap_or_default())".to_owned()),
                Scalar::Bool => ("N", "Some(value.as_str() == \"1\")".to_owned()),
                Scalar::Instant => (
                    "N",
                    "Some(DateTime::from_timestamp_nanos(value.parse::<i64>().unwrap_or_default()))"
                        .to_owned(),
                ),
            };
            writeln!(
                out,
                "        if let Some(AttributeValue::{tag}(value)) = item.get(\"{attr}\") {{"
            )?;
            writeln!(out, "            record.{name} = {expr};")?;
            writeln!(out, "        }}")?;
        }
    }
    Ok(())
}
