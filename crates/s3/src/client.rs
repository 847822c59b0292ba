//! S3 store implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bf-core for a
//! single bucket.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use bf_core::{BucketBinding, Error, ObjectStore, Result, StorageConfig, StorageConnector};

/// S3 store bound to one bucket
#[derive(Debug, Clone)]
pub struct S3Store {
    inner: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Create a new S3 store from a resolved binding and transport settings
    ///
    /// No request is sent; the bucket is not checked for existence.
    pub async fn new(binding: &BucketBinding, config: &StorageConfig) -> Result<Self> {
        let credentials = aws_credential_types::Credentials::new(
            binding.credentials().access_key_id(),
            binding.credentials().secret_access_key(),
            None, // session token
            None, // expiry
            "bf-environment-credentials",
        );

        let timeout = config.timeout_config();
        let timeout_config = aws_config::timeout::TimeoutConfig::builder()
            .connect_timeout(Duration::from_millis(timeout.connect_ms))
            .read_timeout(Duration::from_millis(timeout.read_ms))
            .build();
        let retry_config = aws_config::retry::RetryConfig::standard()
            .with_max_attempts(config.retry_config().max_attempts);

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(binding.endpoint())
            .timeout_config(timeout_config)
            .retry_config(retry_config)
            .load()
            .await;

        // Path-style addressing for S3-compatible services
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style())
            .build();

        Ok(Self::from_client(
            aws_sdk_s3::Client::from_conf(s3_config),
            binding.bucket(),
        ))
    }

    /// Wrap an already configured client
    pub fn from_client(inner: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            inner,
            bucket: bucket.into(),
        }
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Resolve credentials and bind a connector to the configured bucket
///
/// Credential variables are resolved before the client is built, so an unset
/// variable fails without any network activity.
pub async fn connect(config: &StorageConfig) -> Result<StorageConnector<S3Store>> {
    let binding = config.resolve()?;
    let store = S3Store::new(&binding, config).await?;
    tracing::debug!(
        endpoint = binding.endpoint(),
        bucket = binding.bucket(),
        "Bound storage connector"
    );
    Ok(StorageConnector::new(binding, store))
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut pages = self
            .inner
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| Error::Network(DisplayErrorContext(&e).to_string()))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }

        tracing::debug!(prefix, count = keys.len(), "Listed keys");
        Ok(keys)
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    Error::ObjectNotFound(format!("{}/{}", self.bucket, key))
                } else {
                    Error::Network(DisplayErrorContext(&e).to_string())
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.inner
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| Error::Upload(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
