//! bf-s3: S3 SDK adapter for bucketframe
//!
//! This crate provides the implementation of the ObjectStore trait
//! using the aws-sdk-s3 crate. It is the only crate that directly
//! depends on the AWS SDK.

pub mod client;

pub use client::{S3Store, connect};

/// Storage connector bound to an S3 bucket
pub type S3Connector = bf_core::StorageConnector<S3Store>;
