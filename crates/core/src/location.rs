//! Fully qualified object locations
//!
//! A location names one object as `endpoint/bucket/key`. It is what the
//! connector logs before every transfer and what it reports after a write.

use serde::Serialize;

/// A fully qualified object location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectLocation {
    /// Endpoint URL of the storage service
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
}

impl ObjectLocation {
    /// Create a new ObjectLocation
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Get the full location as a string (endpoint/bucket/key)
    pub fn to_full_path(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if self.key.is_empty() {
            format!("{}/{}", endpoint, self.bucket)
        } else {
            format!("{}/{}/{}", endpoint, self.bucket, self.key)
        }
    }
}

impl std::fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_full_path())
    }
}
