//! Table administration input/output shapes.
//!
//! These mirror the JSON bodies of the table management operations. The
//! protocol uses PascalCase member names throughout.

// Member names match the wire protocol; per-field docs would only repeat them.
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::Item;

/// Key role of an attribute within a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    /// Partition (hash) key.
    #[serde(rename = "HASH")]
    Hash,
    /// Sort (range) key.
    #[serde(rename = "RANGE")]
    Range,
}

/// Scalar storage type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// String.
    S,
    /// Number.
    N,
    /// Binary.
    B,
}

/// One element of a table or index key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyType,
}

/// Declares the storage type of an attribute referenced by a key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: ScalarType,
}

/// Provisioned read/write capacity for a table or global index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    pub read_capacity_units: u64,
    pub write_capacity_units: u64,
}

/// Attribute projection of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_key_attributes: Option<Vec<String>>,
    pub projection_type: String,
}

/// A local secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

/// A global secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
    pub provisioned_throughput: ProvisionedThroughput,
}

/// One entry of an `UpdateTable` index update list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndexUpdate {
    pub update: GlobalSecondaryIndexThroughputUpdate,
}

/// New throughput for one global secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndexThroughputUpdate {
    pub index_name: String,
    pub provisioned_throughput: ProvisionedThroughput,
}

/// Request body for `CreateTable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTableInput {
    pub table_name: String,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_secondary_indexes: Option<Vec<GlobalSecondaryIndex>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_secondary_indexes: Option<Vec<LocalSecondaryIndex>>,
    pub provisioned_throughput: ProvisionedThroughput,
}

impl CreateTableInput {
    /// Start a table definition with the given name and capacity.
    #[must_use]
    pub fn new(table_name: impl Into<String>, read_capacity: u64, write_capacity: u64) -> Self {
        Self {
            table_name: table_name.into(),
            attribute_definitions: Vec::new(),
            key_schema: Vec::new(),
            global_secondary_indexes: None,
            local_secondary_indexes: None,
            provisioned_throughput: ProvisionedThroughput {
                read_capacity_units: read_capacity,
                write_capacity_units: write_capacity,
            },
        }
    }

    /// Declare the partition key attribute.
    #[must_use]
    pub fn hash_key(mut self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.push_key(name.into(), scalar, KeyType::Hash);
        self
    }

    /// Declare the sort key attribute.
    #[must_use]
    pub fn range_key(mut self, name: impl Into<String>, scalar: ScalarType) -> Self {
        self.push_key(name.into(), scalar, KeyType::Range);
        self
    }

    fn push_key(&mut self, name: String, scalar: ScalarType, role: KeyType) {
        self.attribute_definitions.push(AttributeDefinition {
            attribute_name: name.clone(),
            attribute_type: scalar,
        });
        self.key_schema.push(KeySchemaElement {
            attribute_name: name,
            key_type: role,
        });
    }
}

/// Request body for `UpdateTable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTableInput {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_secondary_index_updates: Option<Vec<GlobalSecondaryIndexUpdate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

/// Description of a table as reported by the store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TableDescription {
    pub table_name: String,
    pub table_status: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub item_count: u64,
    pub table_size_bytes: u64,
    pub creation_date_time: f64,
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
}

/// Throughput description including decrease/increase bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProvisionedThroughputDescription {
    pub read_capacity_units: u64,
    pub write_capacity_units: u64,
    pub number_of_decreases_today: u64,
    pub last_decrease_date_time: Option<f64>,
    pub last_increase_date_time: Option<f64>,
}

/// Response wrapper used by `CreateTable`, `DeleteTable` and `UpdateTable`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescriptionWrapper {
    pub table_description: TableDescription,
}

/// Response wrapper used by `DescribeTable`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    pub table: TableDescription,
}

/// Response body of `ListTables`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListTablesOutput {
    pub table_names: Vec<String>,
    pub last_evaluated_table_name: Option<String>,
}

/// Response body of `GetItem`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetItemOutput {
    pub item: Option<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_create_table_input() {
        let input = CreateTableInput::new("Test", 10, 5).hash_key("Name", ScalarType::S);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["TableName"], "Test");
        assert_eq!(json["KeySchema"][0]["AttributeName"], "Name");
        assert_eq!(json["KeySchema"][0]["KeyType"], "HASH");
        assert_eq!(json["AttributeDefinitions"][0]["AttributeType"], "S");
        assert_eq!(json["ProvisionedThroughput"]["ReadCapacityUnits"], 10);
        assert!(json.get("GlobalSecondaryIndexes").is_none());
    }

    #[test]
    fn test_should_deserialize_table_description_wrapper() {
        let body = r#"{"TableDescription":{"TableName":"Test","TableStatus":"ACTIVE","ItemCount":3}}"#;
        let wrapper: TableDescriptionWrapper = serde_json::from_str(body).unwrap();
        assert_eq!(wrapper.table_description.table_name, "Test");
        assert_eq!(wrapper.table_description.table_status, "ACTIVE");
        assert_eq!(wrapper.table_description.item_count, 3);
    }

    #[test]
    fn test_should_deserialize_get_item_output_without_item() {
        let output: GetItemOutput = serde_json::from_str("{}").unwrap();
        assert!(output.item.is_none());
    }

    #[test]
    fn test_should_deserialize_get_item_output_with_item() {
        let body = r#"{"Item":{"Name":{"S":"Tom"},"Weight":{"N":"80"}}}"#;
        let output: GetItemOutput = serde_json::from_str(body).unwrap();
        let item = output.item.unwrap();
        assert_eq!(item["Name"], crate::AttributeValue::S("Tom".to_owned()));
        assert_eq!(item["Weight"], crate::AttributeValue::N("80".to_owned()));
    }
}
