// Generated by dynawire-codegen from reading.rs. DO NOT EDIT.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use dynawire_codec::{CodecError, WireRecord};
use dynawire_model::{AttributeValue, Item};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub sensor: String,
    pub taken: DateTime<Utc>,
    pub value: i64,
    pub ok: bool,
    pub payload: Bytes,
    pub tags: Vec<String>,
    pub samples: Vec<i64>,
    pub cached: bool,
    pub note: Option<String>,
}

impl WireRecord for Reading {
    fn key_attributes() -> &'static [&'static str] {
        &["Sensor"]
    }

    fn to_item(&self) -> Result<Item, CodecError> {
        let mut item = Item::new();
        item.insert("Sensor".to_owned(), AttributeValue::S(self.sensor.clone()));
        let nanos = self
            .taken
            .timestamp_nanos_opt()
            .ok_or_else(|| CodecError::Message("instant out of nanosecond range".to_owned()))?;
        item.insert("Taken".to_owned(), AttributeValue::N(nanos.to_string()));
        item.insert("value".to_owned(), AttributeValue::N(self.value.to_string()));
        item.insert(
            "ok".to_owned(),
            AttributeValue::N(if self.ok { "1" } else { "0" }.to_owned()),
        );
        item.insert("payload".to_owned(), AttributeValue::B(self.payload.clone()));
        item.insert("tags".to_owned(), AttributeValue::Ss(self.tags.clone()));
        item.insert(
            "samples".to_owned(),
            AttributeValue::Ns(self.samples.iter().map(ToString::to_string).collect()),
        );
        if let Some(value) = &self.note {
            item.insert("Note".to_owned(), AttributeValue::S(value.clone()));
        }
        Ok(item)
    }

    fn from_item(item: &Item) -> Result<Self, CodecError> {
        let mut record = Self::default();
        if let Some(AttributeValue::S(value)) = item.get("Sensor") {
            record.sensor.clone_from(value);
        }
        if let Some(AttributeValue::N(value)) = item.get("Taken") {
            record.taken = DateTime::from_timestamp_nanos(value.parse::<i64>().unwrap_or_default());
        }
        if let Some(AttributeValue::N(value)) = item.get("value") {
            record.value = value.parse().unwrap_or_default();
        }
        if let Some(AttributeValue::N(value)) = item.get("ok") {
            if value.as_str() == "1" {
                record.ok = true;
            } else if value.as_str() == "0" {
                record.ok = false;
            }
        }
        if let Some(AttributeValue::B(value)) = item.get("payload") {
            record.payload = value.clone();
        }
        if let Some(AttributeValue::Ss(values)) = item.get("tags") {
            record.tags = values.clone();
        }
        if let Some(AttributeValue::Ns(values)) = item.get("samples") {
            record.samples = values.iter().map(|v| v.parse().unwrap_or_default()).collect();
        }
        if let Some(AttributeValue::S(value)) = item.get("Note") {
            record.note = Some(value.clone());
        }
        Ok(record)
    }
}
