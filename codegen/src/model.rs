//! Schema parsing.
//!
//! Reads a Rust source file of record struct declarations and resolves
//! each field to its wire kind. Directives are `#[wire(...)]` field
//! attributes: `rename = "..."`, `skip`, `hash_key`, `range_key`.
//! Schema files refer to binary and instant fields by their imported
//! names (`Bytes`, `DateTime<Utc>`).

use anyhow::{Context, Result};

/// A scalar wire kind, classified from the declared field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// `bool`, encoded as the `N` digits `"1"`/`"0"`.
    Bool,
    /// Any integer type; the original type name is kept for re-emission.
    Integer(String),
    /// `String`, encoded as `S`.
    Text,
    /// `Bytes`, encoded as base64 `B`.
    Binary,
    /// `DateTime<Utc>`, encoded as `N` epoch nanoseconds.
    Instant,
}

impl Scalar {
    /// The canonical Rust type text for re-emitting the field.
    #[must_use]
    pub fn type_text(&self) -> String {
        match self {
            Self::Bool => "bool".to_owned(),
            Self::Integer(ty) => ty.clone(),
            Self::Text => "String".to_owned(),
            Self::Binary => "Bytes".to_owned(),
            Self::Instant => "DateTime<Utc>".to_owned(),
        }
    }
}

/// The full wire kind of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// A plain scalar field.
    Scalar(Scalar),
    /// `Vec<scalar>`, encoded as the matching set tag.
    Set(Scalar),
    /// `Option<scalar>`; the attribute is omitted when `None`.
    Optional(Scalar),
}

/// One resolved record field.
#[derive(Debug, Clone)]
pub struct FieldModel {
    /// The Rust field identifier.
    pub name: String,
    /// The wire attribute name (rename directive or the field name).
    pub attr: String,
    /// The resolved wire kind.
    pub kind: Kind,
    /// Skip directive: the field stays on the struct but is never
    /// encoded or decoded.
    pub skip: bool,
}

/// One record declaration.
#[derive(Debug, Clone)]
pub struct RecordModel {
    /// The struct name.
    pub name: String,
    /// All fields, in declaration order.
    pub fields: Vec<FieldModel>,
    /// Attribute names of the primary key, partition key first.
    pub key_attributes: Vec<String>,
}

/// The outcome of parsing one schema source unit.
#[derive(Debug)]
pub struct Schema {
    /// Records whose every field resolved to a wire kind.
    pub records: Vec<RecordModel>,
    /// One message per record that had to be skipped.
    pub errors: Vec<String>,
}

/// Parse a schema source unit.
///
/// A record with an unmappable field is reported and skipped; the
/// remaining records in the same source unit are still resolved.
pub fn parse_schema(source: &str) -> Result<Schema> {
    let file = syn::parse_file(source).context("schema file does not parse as Rust source")?;

    let mut records = Vec::new();
    let mut errors = Vec::new();

    for item in &file.items {
        let syn::Item::Struct(item) = item else {
            continue;
        };
        match resolve_record(item) {
            Ok(record) => records.push(record),
            Err(message) => errors.push(message),
        }
    }

    Ok(Schema { records, errors })
}

fn resolve_record(item: &syn::ItemStruct) -> Result<RecordModel, String> {
    let record_name = item.ident.to_string();
    let syn::Fields::Named(fields) = &item.fields else {
        return Err(format!(
            "record {record_name} skipped: only named-field structs are supported"
        ));
    };

    let mut resolved = Vec::new();
    let mut hash_key = None;
    let mut range_key = None;

    for field in &fields.named {
        let field_name = field
            .ident
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let directives = parse_directives(&field.attrs)
            .map_err(|err| format!("record {record_name} skipped: field {field_name}: {err}"))?;
        let attr = directives.rename.unwrap_or_else(|| field_name.clone());

        let Some(kind) = classify_type(&field.ty) else {
            return Err(format!(
                "unsupported field kind for {record_name}.{field_name}"
            ));
        };

        if directives.hash_key {
            hash_key = Some(attr.clone());
        }
        if directives.range_key {
            range_key = Some(attr.clone());
        }

        resolved.push(FieldModel {
            name: field_name,
            attr,
            kind,
            skip: directives.skip,
        });
    }

    let mut key_attributes = Vec::new();
    key_attributes.extend(hash_key);
    key_attributes.extend(range_key);

    Ok(RecordModel {
        name: record_name,
        fields: resolved,
        key_attributes,
    })
}

#[derive(Default)]
struct Directives {
    rename: Option<String>,
    skip: bool,
    hash_key: bool,
    range_key: bool,
}

fn parse_directives(attrs: &[syn::Attribute]) -> Result<Directives, String> {
    let mut directives = Directives::default();
    for attr in attrs {
        if !attr.path().is_ident("wire") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                directives.rename = Some(value.value());
            } else if meta.path.is_ident("skip") {
                directives.skip = true;
            } else if meta.path.is_ident("hash_key") {
                directives.hash_key = true;
            } else if meta.path.is_ident("range_key") {
                directives.range_key = true;
            } else {
                return Err(meta.error("unknown wire directive"));
            }
            Ok(())
        })
        .map_err(|err| err.to_string())?;
    }
    Ok(directives)
}

fn classify_type(ty: &syn::Type) -> Option<Kind> {
    let segment = path_segment(ty)?;
    match segment.ident.to_string().as_str() {
        "Vec" => {
            let inner = generic_argument(segment)?;
            let scalar = classify_scalar(inner)?;
            // Instants inside sets have no wire form.
            if scalar == Scalar::Instant {
                return None;
            }
            Some(Kind::Set(scalar))
        }
        "Option" => {
            let inner = generic_argument(segment)?;
            Some(Kind::Optional(classify_scalar(inner)?))
        }
        _ => Some(Kind::Scalar(classify_scalar(ty)?)),
    }
}

fn classify_scalar(ty: &syn::Type) -> Option<Scalar> {
    let segment = path_segment(ty)?;
    let ident = segment.ident.to_string();
    match ident.as_str() {
        "bool" => Some(Scalar::Bool),
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
            Some(Scalar::Integer(ident))
        }
        "String" => Some(Scalar::Text),
        "Bytes" => Some(Scalar::Binary),
        "DateTime" => Some(Scalar::Instant),
        _ => None,
    }
}

fn path_segment(ty: &syn::Type) -> Option<&syn::PathSegment> {
    match ty {
        syn::Type::Path(path) => path.path.segments.last(),
        _ => None,
    }
}

fn generic_argument(segment: &syn::PathSegment) -> Option<&syn::Type> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(syn::GenericArgument::Type(ty)) if args.args.len() == 1 => Some(ty),
        _ => None,
    }
}
