//! ObjectStore trait definition
//!
//! This trait defines the bucket-scoped storage operations the connector
//! needs. It keeps the connector independent of the S3 SDK and can be
//! mocked for testing.

use async_trait::async_trait;

use crate::error::Result;

/// Storage operations against one bound bucket
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every key starting with `prefix`, across all listing pages
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Get the full object body
    ///
    /// Fails with `Error::ObjectNotFound` when the key does not exist.
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    /// Store `data` under `key`, replacing any existing object
    ///
    /// Failures are reported as `Error::Upload`.
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;
}
