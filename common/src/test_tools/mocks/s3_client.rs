use crate::aws_clients::s3::ObjectStorageClient;
use async_trait::async_trait;
use mockall::mock;
use rusoto_core::RusotoError;
use rusoto_s3::{
    GetObjectError, GetObjectOutput, GetObjectRequest, ListObjectsError, ListObjectsOutput,
    ListObjectsRequest,
};

mock! {
    pub S3Client {}

    #[async_trait]
    impl ObjectStorageClient for S3Client {
        async fn list_objects(
            &self,
            input: ListObjectsRequest,
        ) -> Result<ListObjectsOutput, RusotoError<ListObjectsError>>;

        async fn get_object(
            &self,
            input: GetObjectRequest,
        ) -> Result<GetObjectOutput, RusotoError<GetObjectError>>;
    }
}
