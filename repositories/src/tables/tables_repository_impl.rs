use anyhow::anyhow;
use async_trait::async_trait;
use common::aws_clients::dynamodb::TableStorageClient;
use model::table_schema::TableSchema;
use model::write_intent::WriteIntent;
use rusoto_core::RusotoError;
use rusoto_dynamodb::{
    BatchWriteItemError, CreateTableError, DescribeTableError, DescribeTableInput, WriteRequest,
};

use crate::errors::UnknownError;
use crate::tables::description_parser::parse_table_description;
use crate::tables::input_builder::{
    build_batch_write_item_input, build_create_table_input, build_write_request,
};
use crate::tables::{
    TablesRepository, TablesRepositoryError, UnprocessedItemsRetryPolicy, MAX_BATCH_WRITE_ITEMS,
};

pub struct TablesRepositoryImpl<T: TableStorageClient> {
    dynamodb_client: T,
    retry_policy: UnprocessedItemsRetryPolicy,
}

impl<T: TableStorageClient> TablesRepositoryImpl<T> {
    pub fn new(dynamodb_client: T, retry_policy: UnprocessedItemsRetryPolicy) -> Self {
        Self {
            dynamodb_client,
            retry_policy,
        }
    }

    async fn submit(
        &self,
        table_name: &str,
        write_requests: Vec<WriteRequest>,
    ) -> Result<Vec<WriteRequest>, TablesRepositoryError> {
        let output = self
            .dynamodb_client
            .batch_write_item(build_batch_write_item_input(table_name, write_requests))
            .await
            .map_err(|e| match e {
                RusotoError::Service(BatchWriteItemError::ResourceNotFound(message)) => {
                    TablesRepositoryError::TableNotFound(format!(
                        "Table {table_name} not found: {message}"
                    ))
                }
                e => TablesRepositoryError::unknown(
                    e,
                    Some(format!("Error writing batch to table {table_name}")),
                ),
            })?;

        Ok(output
            .unprocessed_items
            .and_then(|mut unprocessed| unprocessed.remove(table_name))
            .unwrap_or_default())
    }
}

#[async_trait]
impl<T: TableStorageClient> TablesRepository for TablesRepositoryImpl<T> {
    async fn describe_table(&self, table_name: String) -> Result<TableSchema, TablesRepositoryError> {
        let description = self
            .dynamodb_client
            .describe_table(DescribeTableInput {
                table_name: table_name.clone(),
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(DescribeTableError::ResourceNotFound(_)) => {
                    TablesRepositoryError::TableNotFound(format!("Table {table_name} not found"))
                }
                e => TablesRepositoryError::unknown(
                    e,
                    Some(format!("Error describing table {table_name}")),
                ),
            })?
            .table
            .ok_or_else(|| {
                TablesRepositoryError::Unknown(anyhow!(
                    "Describe of table {table_name} returned no description"
                ))
            })?;

        parse_table_description(description).map_err(|e| {
            TablesRepositoryError::Unknown(
                e.context(format!("Error reading description of table {table_name}")),
            )
        })
    }

    async fn create_table(&self, schema: TableSchema) -> Result<(), TablesRepositoryError> {
        let table_name = schema.table_name.clone();
        self.dynamodb_client
            .create_table(build_create_table_input(&schema))
            .await
            .map_err(|e| match e {
                RusotoError::Service(CreateTableError::ResourceInUse(_)) => {
                    TablesRepositoryError::TableAlreadyExists(format!(
                        "Table {table_name} already exists"
                    ))
                }
                e => TablesRepositoryError::unknown(
                    e,
                    Some(format!("Error creating table {table_name}")),
                ),
            })?;

        tracing::info!(table_name = ?table_name, "create table request accepted");
        Ok(())
    }

    async fn batch_write(
        &self,
        table_name: String,
        intents: Vec<WriteIntent>,
    ) -> Result<(), TablesRepositoryError> {
        if intents.len() > MAX_BATCH_WRITE_ITEMS {
            return Err(TablesRepositoryError::BatchTooLarge(intents.len()));
        }
        if intents.is_empty() {
            return Ok(());
        }

        let mut pending: Vec<WriteRequest> = intents.into_iter().map(build_write_request).collect();
        let mut attempt = 0;

        loop {
            pending = self.submit(&table_name, pending).await?;
            if pending.is_empty() {
                return Ok(());
            }

            if attempt >= self.retry_policy.max_retries {
                return Err(TablesRepositoryError::UnprocessedItems {
                    table_name,
                    count: pending.len(),
                });
            }

            let delay = self.retry_policy.delay_for(attempt);
            tracing::warn!(
                table_name = ?table_name,
                unprocessed = pending.len(),
                attempt,
                "re-submitting unprocessed items in {delay:?}"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
