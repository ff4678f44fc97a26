use crate::config::aws_client_config::AwsClientConfig;
use async_trait::async_trait;
use rusoto_core::RusotoError;
use rusoto_s3::{
    GetObjectError, GetObjectOutput, GetObjectRequest, ListObjectsError, ListObjectsOutput,
    ListObjectsRequest, S3Client, S3,
};

pub fn get_s3_client(config: &AwsClientConfig) -> Result<S3Client, anyhow::Error> {
    Ok(S3Client::new(config.region()?))
}

/// Read-only object store operations used to fetch change-log backups.
#[async_trait]
pub trait ObjectStorageClient
where
    Self: Sync + Send,
{
    async fn list_objects(
        &self,
        input: ListObjectsRequest,
    ) -> Result<ListObjectsOutput, RusotoError<ListObjectsError>>;

    async fn get_object(
        &self,
        input: GetObjectRequest,
    ) -> Result<GetObjectOutput, RusotoError<GetObjectError>>;
}

#[async_trait]
impl ObjectStorageClient for S3Client {
    async fn list_objects(
        &self,
        input: ListObjectsRequest,
    ) -> Result<ListObjectsOutput, RusotoError<ListObjectsError>> {
        S3::list_objects(self, input).await
    }

    async fn get_object(
        &self,
        input: GetObjectRequest,
    ) -> Result<GetObjectOutput, RusotoError<GetObjectError>> {
        S3::get_object(self, input).await
    }
}
