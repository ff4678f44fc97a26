//! Structural description of a table: everything needed to provision an empty copy of it.

use serde::{Deserialize, Serialize};

pub const PAY_PER_REQUEST_BILLING_MODE: &str = "PAY_PER_REQUEST";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub attribute_name: String,
    /// `S`, `N` or `B`.
    pub attribute_type: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct KeySchemaElement {
    pub attribute_name: String,
    /// `HASH` or `RANGE`.
    pub key_type: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    pub projection_type: Option<String>,
    pub non_key_attributes: Option<Vec<String>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionedThroughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum BillingMode {
    Provisioned(ProvisionedThroughput),
    PayPerRequest,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GlobalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
    /// Absent for on-demand tables.
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LocalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StreamSpecification {
    pub stream_enabled: bool,
    pub stream_view_type: Option<String>,
}

/// Read-only snapshot of a table's keys, indexes, capacity and stream settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
    pub local_secondary_indexes: Vec<LocalSecondaryIndex>,
    pub billing_mode: BillingMode,
    pub stream_specification: Option<StreamSpecification>,
}

impl TableSchema {
    /// The same structure under another name.
    pub fn renamed(&self, table_name: &str) -> TableSchema {
        TableSchema {
            table_name: table_name.to_owned(),
            ..self.clone()
        }
    }
}
