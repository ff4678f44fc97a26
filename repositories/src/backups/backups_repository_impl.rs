use std::collections::BTreeSet;

use anyhow::anyhow;
use async_trait::async_trait;
use common::aws_clients::s3::ObjectStorageClient;
use rusoto_core::RusotoError;
use rusoto_s3::{GetObjectError, GetObjectRequest, ListObjectsError, ListObjectsRequest};
use tokio::io::AsyncReadExt;

use crate::backups::{BackupsRepository, BackupsRepositoryError};
use crate::errors::UnknownError;

pub struct BackupsRepositoryImpl<T: ObjectStorageClient> {
    bucket: String,
    page_size: i64,
    s3_client: T,
}

impl<T: ObjectStorageClient> BackupsRepositoryImpl<T> {
    pub fn new(bucket: String, page_size: i64, s3_client: T) -> Self {
        Self {
            bucket,
            page_size,
            s3_client,
        }
    }

    fn build_list_objects_request(&self, prefix: &str, marker: Option<String>) -> ListObjectsRequest {
        ListObjectsRequest {
            bucket: self.bucket.clone(),
            prefix: Some(prefix.to_owned()),
            marker,
            max_keys: Some(self.page_size),
            ..ListObjectsRequest::default()
        }
    }
}

#[async_trait]
impl<T: ObjectStorageClient> BackupsRepository for BackupsRepositoryImpl<T> {
    async fn list_keys(&self, prefix: String) -> Result<Vec<String>, BackupsRepositoryError> {
        // Pages may overlap at their boundary, the set absorbs repeats.
        let mut keys = BTreeSet::new();
        let mut marker: Option<String> = None;
        let mut pages = 0;

        loop {
            let input = self.build_list_objects_request(&prefix, marker.take());
            let output = self
                .s3_client
                .list_objects(input)
                .await
                .map_err(|e| match e {
                    RusotoError::Service(ListObjectsError::NoSuchBucket(message)) => {
                        BackupsRepositoryError::BucketNotFound(format!(
                            "Bucket {} not found: {message}",
                            self.bucket
                        ))
                    }
                    e => BackupsRepositoryError::unknown(
                        e,
                        Some(format!("Error listing backups under prefix {prefix}")),
                    ),
                })?;
            pages += 1;

            let page_keys: Vec<String> = output
                .contents
                .unwrap_or_default()
                .into_iter()
                .filter_map(|object| object.key)
                .collect();
            let last_key = page_keys.last().cloned();
            keys.extend(page_keys);

            if !output.is_truncated.unwrap_or(false) {
                break;
            }

            // NextMarker is only sent for delimited listings; otherwise the last key
            // of the page is where the next one starts.
            match output.next_marker.or(last_key) {
                Some(next) => marker = Some(next),
                None => {
                    return Err(BackupsRepositoryError::Unknown(anyhow!(
                        "Listing under prefix {prefix} is truncated but carries no continuation marker"
                    )))
                }
            }
        }

        tracing::info!(
            prefix = ?prefix,
            pages,
            keys = keys.len(),
            "listed backup objects"
        );

        Ok(keys.into_iter().collect())
    }

    async fn get_object(&self, key: String) -> Result<Vec<u8>, BackupsRepositoryError> {
        let output = self
            .s3_client
            .get_object(GetObjectRequest {
                bucket: self.bucket.clone(),
                key: key.clone(),
                ..GetObjectRequest::default()
            })
            .await
            .map_err(|e| match e {
                RusotoError::Service(GetObjectError::NoSuchKey(_)) => {
                    BackupsRepositoryError::ObjectNotFound(format!(
                        "Object {key} not found in bucket {}",
                        self.bucket
                    ))
                }
                e => BackupsRepositoryError::unknown(e, Some(format!("Error getting object {key}"))),
            })?;

        let body = output.body.ok_or_else(|| {
            BackupsRepositoryError::Unknown(anyhow!("Object {key} was returned without a body"))
        })?;

        let mut content = Vec::new();
        Box::pin(body.into_async_read())
            .read_to_end(&mut content)
            .await
            .map_err(|e| {
                BackupsRepositoryError::unknown(e, Some(format!("Error reading object {key}")))
            })?;

        Ok(content)
    }
}
