use anyhow::{anyhow, Context};
use model::table_schema::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement,
    LocalSecondaryIndex, Projection, ProvisionedThroughput, StreamSpecification, TableSchema,
    PAY_PER_REQUEST_BILLING_MODE,
};
use rusoto_dynamodb as dynamodb;
use rusoto_dynamodb::TableDescription;

fn parse_key_schema(
    key_schema: Option<Vec<dynamodb::KeySchemaElement>>,
    owner: &str,
) -> Result<Vec<KeySchemaElement>, anyhow::Error> {
    let key_schema = key_schema
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow!("{owner} has no key schema"))?;

    Ok(key_schema
        .into_iter()
        .map(|k| KeySchemaElement {
            attribute_name: k.attribute_name,
            key_type: k.key_type,
        })
        .collect())
}

fn parse_projection(projection: Option<dynamodb::Projection>) -> Projection {
    projection
        .map(|p| Projection {
            projection_type: p.projection_type,
            non_key_attributes: p.non_key_attributes,
        })
        .unwrap_or_default()
}

fn parse_throughput(
    throughput: Option<dynamodb::ProvisionedThroughputDescription>,
    owner: &str,
) -> Result<ProvisionedThroughput, anyhow::Error> {
    let throughput = throughput.ok_or_else(|| anyhow!("{owner} has no provisioned throughput"))?;
    match (throughput.read_capacity_units, throughput.write_capacity_units) {
        (Some(read_capacity_units), Some(write_capacity_units)) => Ok(ProvisionedThroughput {
            read_capacity_units,
            write_capacity_units,
        }),
        _ => Err(anyhow!("{owner} has incomplete provisioned throughput")),
    }
}

fn parse_global_secondary_index(
    index: dynamodb::GlobalSecondaryIndexDescription,
    on_demand: bool,
) -> Result<GlobalSecondaryIndex, anyhow::Error> {
    let index_name = index
        .index_name
        .ok_or_else(|| anyhow!("global secondary index without a name"))?;
    let owner = format!("global secondary index {index_name}");

    let provisioned_throughput = if on_demand {
        None
    } else {
        Some(parse_throughput(index.provisioned_throughput, &owner)?)
    };

    Ok(GlobalSecondaryIndex {
        key_schema: parse_key_schema(index.key_schema, &owner)?,
        projection: parse_projection(index.projection),
        provisioned_throughput,
        index_name,
    })
}

fn parse_local_secondary_index(
    index: dynamodb::LocalSecondaryIndexDescription,
) -> Result<LocalSecondaryIndex, anyhow::Error> {
    let index_name = index
        .index_name
        .ok_or_else(|| anyhow!("local secondary index without a name"))?;
    let owner = format!("local secondary index {index_name}");

    Ok(LocalSecondaryIndex {
        key_schema: parse_key_schema(index.key_schema, &owner)?,
        projection: parse_projection(index.projection),
        index_name,
    })
}

/// Reads the structural parts of a table description. Live state (status, item
/// count, ARNs, creation time) is left behind.
pub fn parse_table_description(description: TableDescription) -> Result<TableSchema, anyhow::Error> {
    let table_name = description
        .table_name
        .ok_or_else(|| anyhow!("table description without a table name"))?;
    let owner = format!("table {table_name}");

    let on_demand = description
        .billing_mode_summary
        .and_then(|summary| summary.billing_mode)
        .map(|mode| mode == PAY_PER_REQUEST_BILLING_MODE)
        .unwrap_or(false);

    let billing_mode = if on_demand {
        BillingMode::PayPerRequest
    } else {
        BillingMode::Provisioned(parse_throughput(description.provisioned_throughput, &owner)?)
    };

    let global_secondary_indexes = description
        .global_secondary_indexes
        .unwrap_or_default()
        .into_iter()
        .map(|index| parse_global_secondary_index(index, on_demand))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("unable to read indexes of {owner}"))?;

    let local_secondary_indexes = description
        .local_secondary_indexes
        .unwrap_or_default()
        .into_iter()
        .map(parse_local_secondary_index)
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("unable to read indexes of {owner}"))?;

    let stream_specification = description
        .stream_specification
        .filter(|s| s.stream_enabled)
        .map(|s| StreamSpecification {
            stream_enabled: s.stream_enabled,
            stream_view_type: s.stream_view_type,
        });

    Ok(TableSchema {
        attribute_definitions: description
            .attribute_definitions
            .unwrap_or_default()
            .into_iter()
            .map(|d| AttributeDefinition {
                attribute_name: d.attribute_name,
                attribute_type: d.attribute_type,
            })
            .collect(),
        key_schema: parse_key_schema(description.key_schema, &owner)?,
        global_secondary_indexes,
        local_secondary_indexes,
        billing_mode,
        stream_specification,
        table_name,
    })
}
