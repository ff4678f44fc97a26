use common::config::aws_client_config::AwsClientConfig;
use repositories::backups::MAX_LIST_PAGE_SIZE;
use repositories::tables::{UnprocessedItemsRetryPolicy, MAX_BATCH_WRITE_ITEMS};
use serde::{self, Deserialize};
use std::time::Duration;
use validator::Validate;

#[derive(Deserialize, Clone, Debug)]
pub struct GlobalConfig {
    /// Current AWS region.
    pub aws_region: String,

    /// Only used for development. LocalStack endpoint
    #[serde(default = "default_localstack_test_mode_endpoint")]
    pub localstack_test_mode_endpoint: Option<String>,
}

impl GlobalConfig {
    pub fn aws_client_config(&self) -> AwsClientConfig {
        AwsClientConfig::new(
            self.aws_region.clone(),
            self.localstack_test_mode_endpoint.clone(),
        )
    }
}

fn default_localstack_test_mode_endpoint() -> Option<String> {
    None
}

/// Tuning knobs for reading backups and writing them back.
#[derive(Deserialize, Validate, Clone, Debug, PartialEq, Eq)]
pub struct RestoreConfig {
    /// Write requests sent per batch.
    #[serde(default = "default_batch_size")]
    #[validate(range(min = 1, max = 25))]
    pub batch_size: usize,

    /// Keys requested per listing page.
    #[serde(default = "default_list_page_size")]
    #[validate(range(min = 1, max = 1000))]
    pub list_page_size: i64,

    #[serde(default = "default_max_unprocessed_retries")]
    pub max_unprocessed_retries: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// When set, only backup objects whose key ends with it are read, e.g. `.gz`.
    #[serde(default)]
    pub backup_file_extension: Option<String>,
}

impl RestoreConfig {
    pub fn retry_policy(&self) -> UnprocessedItemsRetryPolicy {
        UnprocessedItemsRetryPolicy {
            max_retries: self.max_unprocessed_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            list_page_size: default_list_page_size(),
            max_unprocessed_retries: default_max_unprocessed_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            backup_file_extension: None,
        }
    }
}

fn default_batch_size() -> usize {
    MAX_BATCH_WRITE_ITEMS
}

fn default_list_page_size() -> i64 {
    MAX_LIST_PAGE_SIZE
}

fn default_max_unprocessed_retries() -> u32 {
    5
}

fn default_retry_base_delay_ms() -> u64 {
    50
}
