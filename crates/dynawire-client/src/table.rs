//! Typed convenience API over one table.
//!
//! Thin wrappers that encode a record with its [`WireRecord`] codec,
//! splice the wire text into the operation payload and hand it to
//! [`Client::invoke`]. Consistency guarantees (conditional overwrite,
//! put-if-absent) come from the store's own atomic operation semantics,
//! not from this client.

use std::sync::Arc;

use dynawire_codec::{CodecError, WireRecord};
use dynawire_model::types::GetItemOutput;
use dynawire_model::{Item, Operation, escape_str_into, write_item};
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::error::ClientError;

/// A handle to one named table.
#[derive(Debug, Clone)]
pub struct Table {
    client: Client,
    name: Arc<str>,
}

impl Table {
    pub(crate) fn new(client: Client, name: Arc<str>) -> Self {
        Self { client, name }
    }

    /// The table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetch the item whose key attributes are set on `key`.
    pub async fn get<T: WireRecord>(
        &self,
        key: &T,
        consistent: bool,
        cancel: &CancellationToken,
    ) -> Result<T, ClientError> {
        let payload = get_payload(&self.name, &key_item(key)?, consistent);
        let body = self
            .client
            .invoke(Operation::GetItem, payload.as_bytes(), cancel)
            .await?;
        let output: GetItemOutput = serde_json::from_slice(&body)?;
        let item = output.item.ok_or(ClientError::MissingItem)?;
        Ok(T::from_item(&item)?)
    }

    /// Insert or replace a record.
    pub async fn put<T: WireRecord>(
        &self,
        record: &T,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let payload = put_payload(&self.name, &record.to_item()?);
        self.client
            .invoke(Operation::PutItem, payload.as_bytes(), cancel)
            .await?;
        Ok(())
    }

    /// Replace a record only if the stored item still equals `expected`.
    pub async fn put_if<T: WireRecord>(
        &self,
        record: &T,
        expected: &T,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let payload = put_if_payload(&self.name, &record.to_item()?, &expected.to_item()?);
        self.client
            .invoke(Operation::PutItem, payload.as_bytes(), cancel)
            .await?;
        Ok(())
    }

    /// Insert a record only if its key does not exist yet.
    pub async fn add<T: WireRecord>(
        &self,
        record: &T,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let payload = add_payload(&self.name, &record.to_item()?, T::key_attributes());
        self.client
            .invoke(Operation::PutItem, payload.as_bytes(), cancel)
            .await?;
        Ok(())
    }

    /// Delete the item whose key attributes are set on `key`.
    pub async fn delete<T: WireRecord>(
        &self,
        key: &T,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let payload = delete_payload(&self.name, &key_item(key)?);
        self.client
            .invoke(Operation::DeleteItem, payload.as_bytes(), cancel)
            .await?;
        Ok(())
    }
}

/// Reduce a record's item to its declared key attributes.
fn key_item<T: WireRecord>(record: &T) -> Result<Item, ClientError> {
    let mut item = record.to_item()?;
    let mut key = Item::new();
    for &attr in T::key_attributes() {
        let value = item
            .remove(attr)
            .ok_or_else(|| CodecError::MissingKey(attr.to_owned()))?;
        key.insert(attr.to_owned(), value);
    }
    Ok(key)
}

fn write_table_name(name: &str, out: &mut String) {
    out.push_str("{\"TableName\":\"");
    escape_str_into(name, out);
    out.push('"');
}

fn get_payload(name: &str, key: &Item, consistent: bool) -> String {
    let mut out = String::new();
    write_table_name(name, &mut out);
    out.push_str(",\"Key\":");
    write_item(key, &mut out);
    out.push_str(",\"ConsistentRead\":");
    out.push_str(if consistent { "true" } else { "false" });
    out.push('}');
    out
}

fn put_payload(name: &str, item: &Item) -> String {
    let mut out = String::new();
    write_table_name(name, &mut out);
    out.push_str(",\"Item\":");
    write_item(item, &mut out);
    out.push('}');
    out
}

fn put_if_payload(name: &str, item: &Item, expected: &Item) -> String {
    let mut out = String::new();
    write_table_name(name, &mut out);
    out.push_str(",\"Item\":");
    write_item(item, &mut out);
    out.push_str(",\"Expected\":{");
    for (idx, (attr, value)) in expected.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push('"');
        escape_str_into(attr, &mut out);
        out.push_str("\":{\"Value\":");
        value.write_wire(&mut out);
        out.push('}');
    }
    out.push_str("}}");
    out
}

fn add_payload(name: &str, item: &Item, key_attributes: &[&str]) -> String {
    let mut out = String::new();
    write_table_name(name, &mut out);
    out.push_str(",\"Item\":");
    write_item(item, &mut out);
    out.push_str(",\"Expected\":{");
    for (idx, attr) in key_attributes.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push('"');
        escape_str_into(attr, &mut out);
        out.push_str("\":{\"Exists\":false}");
    }
    out.push_str("}}");
    out
}

fn delete_payload(name: &str, key: &Item) -> String {
    let mut out = String::new();
    write_table_name(name, &mut out);
    out.push_str(",\"Key\":");
    write_item(key, &mut out);
    out.push('}');
    out
}
