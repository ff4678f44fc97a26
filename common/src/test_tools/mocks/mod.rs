pub mod dynamodb_client;
pub mod s3_client;
