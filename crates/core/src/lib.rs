//! bf-core: Core library for bucketframe
//!
//! This crate provides the core functionality for moving tables between an
//! object-storage bucket and memory, including:
//! - `Table`, the in-memory tabular value
//! - CSV and Parquet body encoding and decoding
//! - `StorageConnector`, which lists, reads and writes tables in one bucket
//! - Configuration and credential binding
//! - The `ObjectStore` trait and an in-memory implementation
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod binding;
pub mod config;
pub mod connector;
pub mod error;
pub mod format;
pub mod location;
pub mod memory;
pub mod table;
pub mod traits;

pub use binding::{BucketBinding, Credentials, RetryConfig, StorageConfig, TimeoutConfig};
pub use config::{Config, ConfigManager, LoggingConfig};
pub use connector::{StorageConnector, WriteOutcome};
pub use error::{Error, Result};
pub use format::{ReadOptions, SerializationFormat};
pub use location::ObjectLocation;
pub use memory::MemoryStore;
pub use table::Table;
pub use traits::ObjectStore;
