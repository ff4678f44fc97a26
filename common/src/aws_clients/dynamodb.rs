use crate::config::aws_client_config::AwsClientConfig;
use async_trait::async_trait;
use rusoto_core::RusotoError;
use rusoto_dynamodb::{
    BatchWriteItemError, BatchWriteItemInput, BatchWriteItemOutput, CreateTableError,
    CreateTableInput, CreateTableOutput, DescribeTableError, DescribeTableInput,
    DescribeTableOutput, DynamoDb, DynamoDbClient,
};

pub fn get_dynamodb_client(config: &AwsClientConfig) -> Result<DynamoDbClient, anyhow::Error> {
    Ok(DynamoDbClient::new(config.region()?))
}

/// The slice of the DynamoDB API the restore tooling talks to.
#[async_trait]
pub trait TableStorageClient
where
    Self: Sync + Send,
{
    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, RusotoError<DescribeTableError>>;

    async fn create_table(
        &self,
        input: CreateTableInput,
    ) -> Result<CreateTableOutput, RusotoError<CreateTableError>>;

    async fn batch_write_item(
        &self,
        input: BatchWriteItemInput,
    ) -> Result<BatchWriteItemOutput, RusotoError<BatchWriteItemError>>;
}

#[async_trait]
impl TableStorageClient for DynamoDbClient {
    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, RusotoError<DescribeTableError>> {
        DynamoDb::describe_table(self, input).await
    }

    async fn create_table(
        &self,
        input: CreateTableInput,
    ) -> Result<CreateTableOutput, RusotoError<CreateTableError>> {
        DynamoDb::create_table(self, input).await
    }

    async fn batch_write_item(
        &self,
        input: BatchWriteItemInput,
    ) -> Result<BatchWriteItemOutput, RusotoError<BatchWriteItemError>> {
        DynamoDb::batch_write_item(self, input).await
    }
}
