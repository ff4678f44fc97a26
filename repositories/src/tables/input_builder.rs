use std::collections::HashMap;

use bytes::Bytes;
use model::attribute_value::{AttributeValue, Item};
use model::table_schema::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement,
    LocalSecondaryIndex, Projection, ProvisionedThroughput, TableSchema,
    PAY_PER_REQUEST_BILLING_MODE,
};
use model::write_intent::WriteIntent;
use rusoto_dynamodb as dynamodb;
use rusoto_dynamodb::{BatchWriteItemInput, CreateTableInput, DeleteRequest, PutRequest, WriteRequest};

const PROVISIONED_BILLING_MODE: &str = "PROVISIONED";

pub fn to_dynamodb_attribute_value(value: AttributeValue) -> dynamodb::AttributeValue {
    match value {
        AttributeValue::S(s) => dynamodb::AttributeValue {
            s: Some(s),
            ..Default::default()
        },
        AttributeValue::N(n) => dynamodb::AttributeValue {
            n: Some(n),
            ..Default::default()
        },
        AttributeValue::B(b) => dynamodb::AttributeValue {
            b: Some(Bytes::from(b)),
            ..Default::default()
        },
        AttributeValue::Bool(b) => dynamodb::AttributeValue {
            bool: Some(b),
            ..Default::default()
        },
        AttributeValue::Null(null) => dynamodb::AttributeValue {
            null: Some(null),
            ..Default::default()
        },
        AttributeValue::L(l) => dynamodb::AttributeValue {
            l: Some(l.into_iter().map(to_dynamodb_attribute_value).collect()),
            ..Default::default()
        },
        AttributeValue::M(m) => dynamodb::AttributeValue {
            m: Some(
                m.into_iter()
                    .map(|(k, v)| (k, to_dynamodb_attribute_value(v)))
                    .collect(),
            ),
            ..Default::default()
        },
        AttributeValue::Ss(ss) => dynamodb::AttributeValue {
            ss: Some(ss),
            ..Default::default()
        },
        AttributeValue::Ns(ns) => dynamodb::AttributeValue {
            ns: Some(ns),
            ..Default::default()
        },
        AttributeValue::Bs(bs) => dynamodb::AttributeValue {
            bs: Some(bs.into_iter().map(Bytes::from).collect()),
            ..Default::default()
        },
    }
}

pub fn to_dynamodb_item(item: Item) -> HashMap<String, dynamodb::AttributeValue> {
    item.into_iter()
        .map(|(name, value)| (name, to_dynamodb_attribute_value(value)))
        .collect()
}

pub fn build_write_request(intent: WriteIntent) -> WriteRequest {
    match intent {
        WriteIntent::Put(item) => WriteRequest {
            put_request: Some(PutRequest {
                item: to_dynamodb_item(item),
            }),
            delete_request: None,
        },
        WriteIntent::Delete(key) => WriteRequest {
            put_request: None,
            delete_request: Some(DeleteRequest {
                key: to_dynamodb_item(key),
            }),
        },
    }
}

pub fn build_batch_write_item_input(
    table_name: &str,
    write_requests: Vec<WriteRequest>,
) -> BatchWriteItemInput {
    BatchWriteItemInput {
        request_items: HashMap::from([(table_name.to_owned(), write_requests)]),
        ..BatchWriteItemInput::default()
    }
}

fn to_dynamodb_key_schema(key_schema: &[KeySchemaElement]) -> Vec<dynamodb::KeySchemaElement> {
    key_schema
        .iter()
        .map(|k| dynamodb::KeySchemaElement {
            attribute_name: k.attribute_name.clone(),
            key_type: k.key_type.clone(),
        })
        .collect()
}

fn to_dynamodb_attribute_definitions(
    definitions: &[AttributeDefinition],
) -> Vec<dynamodb::AttributeDefinition> {
    definitions
        .iter()
        .map(|d| dynamodb::AttributeDefinition {
            attribute_name: d.attribute_name.clone(),
            attribute_type: d.attribute_type.clone(),
        })
        .collect()
}

fn to_dynamodb_projection(projection: &Projection) -> dynamodb::Projection {
    dynamodb::Projection {
        projection_type: projection.projection_type.clone(),
        non_key_attributes: projection.non_key_attributes.clone(),
    }
}

fn to_dynamodb_throughput(throughput: &ProvisionedThroughput) -> dynamodb::ProvisionedThroughput {
    dynamodb::ProvisionedThroughput {
        read_capacity_units: throughput.read_capacity_units,
        write_capacity_units: throughput.write_capacity_units,
    }
}

fn to_dynamodb_global_secondary_index(
    index: &GlobalSecondaryIndex,
) -> dynamodb::GlobalSecondaryIndex {
    dynamodb::GlobalSecondaryIndex {
        index_name: index.index_name.clone(),
        key_schema: to_dynamodb_key_schema(&index.key_schema),
        projection: to_dynamodb_projection(&index.projection),
        provisioned_throughput: index
            .provisioned_throughput
            .as_ref()
            .map(to_dynamodb_throughput),
    }
}

fn to_dynamodb_local_secondary_index(index: &LocalSecondaryIndex) -> dynamodb::LocalSecondaryIndex {
    dynamodb::LocalSecondaryIndex {
        index_name: index.index_name.clone(),
        key_schema: to_dynamodb_key_schema(&index.key_schema),
        projection: to_dynamodb_projection(&index.projection),
    }
}

/// Create request for an empty table shaped like `schema`.
///
/// The store rejects empty index lists, so tables without secondary indexes leave
/// those fields unset.
pub fn build_create_table_input(schema: &TableSchema) -> CreateTableInput {
    let global_secondary_indexes: Vec<dynamodb::GlobalSecondaryIndex> = schema
        .global_secondary_indexes
        .iter()
        .map(to_dynamodb_global_secondary_index)
        .collect();
    let local_secondary_indexes: Vec<dynamodb::LocalSecondaryIndex> = schema
        .local_secondary_indexes
        .iter()
        .map(to_dynamodb_local_secondary_index)
        .collect();

    let (billing_mode, provisioned_throughput) = match &schema.billing_mode {
        BillingMode::Provisioned(throughput) => (
            PROVISIONED_BILLING_MODE,
            Some(to_dynamodb_throughput(throughput)),
        ),
        BillingMode::PayPerRequest => (PAY_PER_REQUEST_BILLING_MODE, None),
    };

    CreateTableInput {
        table_name: schema.table_name.clone(),
        attribute_definitions: to_dynamodb_attribute_definitions(&schema.attribute_definitions),
        key_schema: to_dynamodb_key_schema(&schema.key_schema),
        global_secondary_indexes: (!global_secondary_indexes.is_empty())
            .then_some(global_secondary_indexes),
        local_secondary_indexes: (!local_secondary_indexes.is_empty())
            .then_some(local_secondary_indexes),
        billing_mode: Some(billing_mode.to_owned()),
        provisioned_throughput,
        stream_specification: schema.stream_specification.as_ref().map(|s| {
            dynamodb::StreamSpecification {
                stream_enabled: s.stream_enabled,
                stream_view_type: s.stream_view_type.clone(),
            }
        }),
        ..CreateTableInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::table_schema::StreamSpecification;
    use std::collections::BTreeMap;

    fn key(name: &str, key_type: &str) -> KeySchemaElement {
        KeySchemaElement {
            attribute_name: name.to_owned(),
            key_type: key_type.to_owned(),
        }
    }

    fn schema_without_indexes() -> TableSchema {
        TableSchema {
            table_name: "orders-restored".to_owned(),
            attribute_definitions: vec![AttributeDefinition {
                attribute_name: "order_id".to_owned(),
                attribute_type: "S".to_owned(),
            }],
            key_schema: vec![key("order_id", "HASH")],
            global_secondary_indexes: vec![],
            local_secondary_indexes: vec![],
            billing_mode: BillingMode::Provisioned(ProvisionedThroughput {
                read_capacity_units: 5,
                write_capacity_units: 10,
            }),
            stream_specification: None,
        }
    }

    #[test]
    fn nested_values_are_converted() {
        let value = AttributeValue::M(BTreeMap::from([
            (
                "list".to_owned(),
                AttributeValue::L(vec![AttributeValue::N("1".to_owned())]),
            ),
            ("blob".to_owned(), AttributeValue::B(vec![0xca, 0xfe])),
        ]));

        let converted = to_dynamodb_attribute_value(value);
        let map = converted.m.unwrap();
        assert_eq!(
            Some("1".to_owned()),
            map["list"].l.as_ref().unwrap()[0].n.clone()
        );
        assert_eq!(Some(Bytes::from(vec![0xca, 0xfe])), map["blob"].b.clone());
    }

    #[test]
    fn sets_and_null_are_converted() {
        assert_eq!(
            Some(vec!["a".to_owned()]),
            to_dynamodb_attribute_value(AttributeValue::Ss(vec!["a".to_owned()])).ss
        );
        assert_eq!(
            Some(vec![Bytes::from(vec![1u8])]),
            to_dynamodb_attribute_value(AttributeValue::Bs(vec![vec![1]])).bs
        );
        assert_eq!(
            Some(true),
            to_dynamodb_attribute_value(AttributeValue::Null(true)).null
        );
    }

    #[test]
    fn put_intent_becomes_put_request() {
        let item = HashMap::from([("id".to_owned(), AttributeValue::S("1".to_owned()))]);
        let request = build_write_request(WriteIntent::Put(item));
        assert!(request.delete_request.is_none());
        assert_eq!(
            Some("1".to_owned()),
            request.put_request.unwrap().item["id"].s.clone()
        );
    }

    #[test]
    fn delete_intent_becomes_delete_request() {
        let key = HashMap::from([("id".to_owned(), AttributeValue::N("7".to_owned()))]);
        let request = build_write_request(WriteIntent::Delete(key));
        assert!(request.put_request.is_none());
        assert_eq!(
            Some("7".to_owned()),
            request.delete_request.unwrap().key["id"].n.clone()
        );
    }

    #[test]
    fn create_table_input_without_indexes_leaves_index_lists_unset() {
        let input = build_create_table_input(&schema_without_indexes());

        assert_eq!("orders-restored", input.table_name);
        assert!(input.global_secondary_indexes.is_none());
        assert!(input.local_secondary_indexes.is_none());
        assert_eq!(Some("PROVISIONED".to_owned()), input.billing_mode);
        assert_eq!(
            Some(dynamodb::ProvisionedThroughput {
                read_capacity_units: 5,
                write_capacity_units: 10,
            }),
            input.provisioned_throughput
        );
        assert!(input.stream_specification.is_none());
    }

    #[test]
    fn create_table_input_copies_indexes_and_stream() {
        let mut schema = schema_without_indexes();
        schema.billing_mode = BillingMode::PayPerRequest;
        schema.global_secondary_indexes = vec![GlobalSecondaryIndex {
            index_name: "by_state".to_owned(),
            key_schema: vec![key("state", "HASH")],
            projection: Projection {
                projection_type: Some("ALL".to_owned()),
                non_key_attributes: None,
            },
            provisioned_throughput: None,
        }];
        schema.local_secondary_indexes = vec![LocalSecondaryIndex {
            index_name: "by_created_at".to_owned(),
            key_schema: vec![key("order_id", "HASH"), key("created_at", "RANGE")],
            projection: Projection {
                projection_type: Some("KEYS_ONLY".to_owned()),
                non_key_attributes: None,
            },
        }];
        schema.stream_specification = Some(StreamSpecification {
            stream_enabled: true,
            stream_view_type: Some("NEW_AND_OLD_IMAGES".to_owned()),
        });

        let input = build_create_table_input(&schema);

        assert_eq!(Some("PAY_PER_REQUEST".to_owned()), input.billing_mode);
        assert!(input.provisioned_throughput.is_none());
        let gsis = input.global_secondary_indexes.unwrap();
        assert_eq!("by_state", gsis[0].index_name);
        assert!(gsis[0].provisioned_throughput.is_none());
        let lsis = input.local_secondary_indexes.unwrap();
        assert_eq!(2, lsis[0].key_schema.len());
        assert_eq!(
            Some("NEW_AND_OLD_IMAGES".to_owned()),
            input.stream_specification.unwrap().stream_view_type
        );
    }
}
