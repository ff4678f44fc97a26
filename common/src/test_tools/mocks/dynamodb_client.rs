use crate::aws_clients::dynamodb::TableStorageClient;
use async_trait::async_trait;
use mockall::mock;
use rusoto_core::RusotoError;
use rusoto_dynamodb::*;

mock! {
    pub DbClient {}

    #[async_trait]
    impl TableStorageClient for DbClient {
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
}
