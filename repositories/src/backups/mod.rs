use crate::impl_unknown_error_trait;
use async_trait::async_trait;

pub mod backups_repository_impl;

#[cfg(feature = "test_mocks")]
use mockall::mock;

/// Largest page the object listing protocol hands back per request.
pub const MAX_LIST_PAGE_SIZE: i64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum BackupsRepositoryError {
    #[error("{0:#}")]
    Unknown(anyhow::Error),
    #[error("{0}")]
    BucketNotFound(String),
    #[error("{0}")]
    ObjectNotFound(String),
}

impl_unknown_error_trait!(BackupsRepositoryError);

/// Catalog and reader for change-log backup objects kept in a bucket.
#[async_trait]
pub trait BackupsRepository
where
    Self: Sync + Send,
{
    /// Every object key under `prefix`, following continuation markers until the
    /// listing is exhausted. Keys are unique; their order is unspecified.
    async fn list_keys(&self, prefix: String) -> Result<Vec<String>, BackupsRepositoryError>;

    /// Full content of one backup object.
    async fn get_object(&self, key: String) -> Result<Vec<u8>, BackupsRepositoryError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub BackupsRepository {}
    #[async_trait]
    impl BackupsRepository for BackupsRepository {
        async fn list_keys(&self, prefix: String) -> Result<Vec<String>, BackupsRepositoryError>;
        async fn get_object(&self, key: String) -> Result<Vec<u8>, BackupsRepositoryError>;
    }
}
