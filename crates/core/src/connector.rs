//! The storage connector
//!
//! `StorageConnector` binds one bucket and moves tables in and out of it:
//! it lists keys, reads delimited text or parquet objects into tables, and
//! writes tables back in either format. Writing an empty table uploads
//! nothing and reports `WriteOutcome::Skipped`.

use serde::Serialize;

use crate::binding::BucketBinding;
use crate::error::{Error, Result};
use crate::format::{self, ReadOptions, SerializationFormat};
use crate::location::ObjectLocation;
use crate::table::Table;
use crate::traits::ObjectStore;

/// What a call to `write_table` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The table was serialized and uploaded
    Written {
        location: ObjectLocation,
        size_bytes: usize,
    },
    /// The table had no rows; nothing was uploaded
    Skipped,
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }
}

/// Reads and writes tables in one bucket
#[derive(Debug)]
pub struct StorageConnector<S> {
    binding: BucketBinding,
    store: S,
}

impl<S: ObjectStore> StorageConnector<S> {
    pub fn new(binding: BucketBinding, store: S) -> Self {
        Self { binding, store }
    }

    pub fn binding(&self) -> &BucketBinding {
        &self.binding
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// List all keys starting with `prefix`
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        self.store.list_keys(prefix).await
    }

    /// Read a delimited text object into a table
    pub async fn read_table(&self, key: &str, options: &ReadOptions) -> Result<Table> {
        let data = self.fetch(key).await?;
        format::decode_csv(&data, options)
    }

    /// Read a parquet object into a table
    pub async fn read_parquet(&self, key: &str) -> Result<Table> {
        let data = self.fetch(key).await?;
        format::decode_parquet(data)
    }

    /// Write `table` under `key` in the format named by `format`
    ///
    /// Empty tables short-circuit before the format is looked at.
    pub async fn write_table(&self, table: &Table, key: &str, format: &str) -> Result<WriteOutcome> {
        if table.is_empty() {
            return Ok(self.skip(key));
        }

        let Ok(parsed) = format.parse::<SerializationFormat>() else {
            tracing::warn!(format, key, "The file format {format} is not supported");
            return Err(Error::UnsupportedFormat {
                format: format.to_string(),
                key: Some(key.to_string()),
            });
        };
        self.write_table_as(table, key, parsed).await
    }

    /// Write `table` under `key` in a known format
    pub async fn write_table_as(
        &self,
        table: &Table,
        key: &str,
        format: SerializationFormat,
    ) -> Result<WriteOutcome> {
        if table.is_empty() {
            return Ok(self.skip(key));
        }

        let buffer = format.encode(table)?;
        self.put_object(buffer, key, format).await
    }

    fn skip(&self, key: &str) -> WriteOutcome {
        tracing::info!(key, "Table is empty, no file to be written");
        WriteOutcome::Skipped
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let location = self.binding.location(key);
        tracing::info!("Reading file {location}");
        self.store.get_object(key).await.map_err(|e| match e {
            Error::ObjectNotFound(_) => Error::ObjectNotFound(location.to_string()),
            other => other,
        })
    }

    async fn put_object(
        &self,
        buffer: Vec<u8>,
        key: &str,
        format: SerializationFormat,
    ) -> Result<WriteOutcome> {
        let location = self.binding.location(key);
        tracing::info!("Writing file to {location}");
        let size_bytes = buffer.len();
        self.store
            .put_object(key, buffer, format.content_type())
            .await?;
        Ok(WriteOutcome::Written {
            location,
            size_bytes,
        })
    }
}
