use std::time::Duration;

use crate::impl_unknown_error_trait;
use async_trait::async_trait;
use model::table_schema::TableSchema;
use model::write_intent::WriteIntent;

pub mod description_parser;
pub mod input_builder;
pub mod tables_repository_impl;

#[cfg(feature = "test_mocks")]
use mockall::mock;

/// Most write requests the table store accepts in a single batch.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

#[derive(Debug, thiserror::Error)]
pub enum TablesRepositoryError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
    #[error("{0}")]
    TableNotFound(String),
    #[error("{0}")]
    TableAlreadyExists(String),
    #[error("{count} items were left unprocessed by table {table_name} after retrying")]
    UnprocessedItems { table_name: String, count: usize },
    #[error("a batch holds at most {max} items, got {0}", max = MAX_BATCH_WRITE_ITEMS)]
    BatchTooLarge(usize),
}

impl_unknown_error_trait!(TablesRepositoryError);

/// How often items the store reports as unprocessed are re-submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnprocessedItemsRetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl UnprocessedItemsRetryPolicy {
    /// Exponential backoff: `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

impl Default for UnprocessedItemsRetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(50),
        }
    }
}

#[async_trait]
pub trait TablesRepository
where
    Self: Sync + Send,
{
    async fn describe_table(&self, table_name: String) -> Result<TableSchema, TablesRepositoryError>;

    /// Creates an empty table named `schema.table_name`. Returns once the create request
    /// is accepted, the table may still be provisioning.
    async fn create_table(&self, schema: TableSchema) -> Result<(), TablesRepositoryError>;

    /// Applies up to [`MAX_BATCH_WRITE_ITEMS`] intents in one batch request.
    async fn batch_write(
        &self,
        table_name: String,
        intents: Vec<WriteIntent>,
    ) -> Result<(), TablesRepositoryError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub TablesRepository {}
    #[async_trait]
    impl TablesRepository for TablesRepository {
        async fn describe_table(&self, table_name: String) -> Result<TableSchema, TablesRepositoryError>;
        async fn create_table(&self, schema: TableSchema) -> Result<(), TablesRepositoryError>;
        async fn batch_write(
            &self,
            table_name: String,
            intents: Vec<WriteIntent>,
        ) -> Result<(), TablesRepositoryError>;
    }
}

#[cfg(test)]
mod tests {
    use super::UnprocessedItemsRetryPolicy;
    use std::time::Duration;

    #[test]
    fn retry_delay_doubles_per_attempt() {
        let policy = UnprocessedItemsRetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(50),
        };
        assert_eq!(Duration::from_millis(50), policy.delay_for(0));
        assert_eq!(Duration::from_millis(100), policy.delay_for(1));
        assert_eq!(Duration::from_millis(400), policy.delay_for(3));
    }
}
