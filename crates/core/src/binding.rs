//! Storage configuration and bucket binding
//!
//! `StorageConfig` is what the configuration file says about the bucket:
//! the endpoint, the bucket name and the *names* of the environment
//! variables that hold the credentials. Resolving it produces a
//! `BucketBinding`, which carries the credential values and never changes
//! afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::ObjectLocation;

/// Retry configuration passed through to the storage client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts made by the client for one request
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

/// Timeout configuration passed through to the storage client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Read timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_ms: u64,
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_read_timeout() -> u64 {
    30000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            read_ms: default_read_timeout(),
        }
    }
}

/// Connection settings for one bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// S3 endpoint URL
    pub endpoint_url: String,

    /// Bucket name
    pub bucket: String,

    /// Name of the environment variable holding the access key id
    pub access_key_env: String,

    /// Name of the environment variable holding the secret access key
    pub secret_key_env: String,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket lookup style: "auto", "path", or "dns"
    #[serde(default = "default_bucket_lookup")]
    pub bucket_lookup: String,

    /// Retry configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,

    /// Timeout configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket_lookup() -> String {
    "auto".to_string()
}

impl StorageConfig {
    /// Create a new storage configuration with required fields
    pub fn new(
        endpoint_url: impl Into<String>,
        bucket: impl Into<String>,
        access_key_env: impl Into<String>,
        secret_key_env: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            bucket: bucket.into(),
            access_key_env: access_key_env.into(),
            secret_key_env: secret_key_env.into(),
            region: default_region(),
            bucket_lookup: default_bucket_lookup(),
            retry: None,
            timeout: None,
        }
    }

    /// Get the effective retry configuration
    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }

    /// Whether requests should use path-style addressing
    pub fn force_path_style(&self) -> bool {
        self.bucket_lookup == "path" || self.bucket_lookup == "auto"
    }

    /// Resolve the credential variables from the process environment
    pub fn resolve(&self) -> Result<BucketBinding> {
        BucketBinding::from_env(
            &self.access_key_env,
            &self.secret_key_env,
            &self.endpoint_url,
            &self.bucket,
        )
    }
}

/// Access credentials resolved from the environment
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    /// Create credentials from literal values
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Read both credentials from the named environment variables
    pub fn from_env(access_var: &str, secret_var: &str) -> Result<Self> {
        Self::resolve_with(access_var, secret_var, |name| std::env::var(name).ok())
    }

    /// Resolve both credentials through `lookup`
    ///
    /// The access variable is looked up first; the first missing variable
    /// is reported.
    pub fn resolve_with<F>(access_var: &str, secret_var: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = |variable: &str| Error::CredentialResolution {
            variable: variable.to_string(),
        };
        let access_key_id = lookup(access_var).ok_or_else(|| missing(access_var))?;
        let secret_access_key = lookup(secret_var).ok_or_else(|| missing(secret_var))?;
        Ok(Self::new(access_key_id, secret_access_key))
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Endpoint, bucket and credentials of a connector
///
/// Created once at construction and shared read-only by every operation.
#[derive(Debug, Clone)]
pub struct BucketBinding {
    endpoint: String,
    bucket: String,
    credentials: Credentials,
}

impl BucketBinding {
    /// Bind to a bucket with already resolved credentials
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint)?;
        Ok(Self {
            endpoint,
            bucket: bucket.into(),
            credentials,
        })
    }

    /// Bind to a bucket, resolving credentials from the named variables
    pub fn from_env(
        access_var: &str,
        secret_var: &str,
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Credentials::from_env(access_var, secret_var)?;
        Self::new(endpoint, bucket, credentials)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Fully qualified location of `key` in this bucket
    pub fn location(&self, key: &str) -> ObjectLocation {
        ObjectLocation::new(&self.endpoint, &self.bucket, key)
    }
}
