//! S3-backed object store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{ObjectStore, StoreError, StoredObject};

/// Object store backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Build a store from the ambient AWS environment (credential chain,
    /// profile, instance role) with an explicit region.
    pub async fn from_env(bucket: String, region: String) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .load()
            .await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn to_chrono(ts: aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, key: &str) -> Result<StoredObject, StoreError> {
        debug!("S3 get: s3://{}/{}", self.bucket, key);

        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match resp {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Err(StoreError::NotFound(key.to_string()));
                }
                return Err(StoreError::Backend(format!(
                    "get s3://{}/{}: {}",
                    self.bucket, key, service_err
                )));
            }
        };

        let last_modified = output.last_modified().copied().and_then(to_chrono);
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| {
                StoreError::Backend(format!("read body of s3://{}/{}: {}", self.bucket, key, e))
            })?
            .into_bytes()
            .to_vec();

        Ok(StoredObject {
            bytes,
            last_modified,
        })
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        debug!("S3 put: s3://{}/{} ({} bytes)", self.bucket, key, bytes.len());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                StoreError::Backend(format!(
                    "put s3://{}/{}: {}",
                    self.bucket,
                    key,
                    e.into_service_error()
                ))
            })?;

        Ok(())
    }
}
