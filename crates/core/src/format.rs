//! Object body formats
//!
//! Tables travel as one of two bodies:
//! - `csv`: delimited text with a header row and no index column
//! - `parquet`: a parquet file with its schema embedded
//!
//! Encoding always produces a complete in-memory buffer; decoding always
//! consumes one.

use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::{Error, Result};
use crate::table::Table;

/// Default text encoding for delimited text
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Default field delimiter for delimited text
pub const DEFAULT_DELIMITER: char = ',';

/// Serialization format of an object body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationFormat {
    Csv,
    Parquet,
}

impl SerializationFormat {
    /// The tag used in configuration and on the command line
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }

    /// MIME type sent with uploads
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Parquet => "application/vnd.apache.parquet",
        }
    }

    /// Serialize `table` into a complete object body
    pub fn encode(self, table: &Table) -> Result<Vec<u8>> {
        match self {
            Self::Csv => encode_csv(table),
            Self::Parquet => encode_parquet(table),
        }
    }
}

impl FromStr for SerializationFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(Error::UnsupportedFormat {
                format: other.to_string(),
                key: None,
            }),
        }
    }
}

impl std::fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to decode a delimited text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Encoding label, e.g. "utf-8", "latin1", "windows-1252"
    pub encoding: String,
    /// Field delimiter
    pub delimiter: char,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

fn encode_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .with_delimiter(DEFAULT_DELIMITER as u8)
        .build(Vec::new());
    writer
        .write(table.batch())
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(writer.into_inner())
}

fn encode_parquet(table: &Table) -> Result<Vec<u8>> {
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, table.schema(), Some(props))
        .map_err(|e| Error::Encode(e.to_string()))?;
    writer
        .write(table.batch())
        .map_err(|e| Error::Encode(e.to_string()))?;
    writer.close().map_err(|e| Error::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Decode bytes as text under `encoding`
///
/// Malformed input is an error; no replacement characters are produced and
/// a byte order mark is kept as data.
pub fn decode_text<'a>(data: &'a [u8], encoding: &str) -> Result<std::borrow::Cow<'a, str>> {
    let encoding = encoding_rs::Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| Error::Decode(format!("unknown encoding '{encoding}'")))?;
    encoding
        .decode_without_bom_handling_and_without_replacement(data)
        .ok_or_else(|| Error::Decode(format!("bytes are not valid {}", encoding.name())))
}

/// Decode a delimited text body into a table
///
/// The first line is the header and must be present. Column types are
/// inferred from the data, so an empty field decodes as null.
pub fn decode_csv(data: &[u8], options: &ReadOptions) -> Result<Table> {
    if !options.delimiter.is_ascii() {
        return Err(Error::Decode(format!(
            "delimiter '{}' is not a single-byte character",
            options.delimiter
        )));
    }
    let delimiter = options.delimiter as u8;
    let text = decode_text(data, &options.encoding)?;
    if text.trim().is_empty() {
        return Err(Error::Decode("no header row".to_string()));
    }

    let (schema, _) = Format::default()
        .with_header(true)
        .with_delimiter(delimiter)
        .infer_schema(Cursor::new(text.as_bytes()), None)
        .map_err(|e| Error::Decode(e.to_string()))?;
    if schema.fields().is_empty() {
        return Err(Error::Decode("no header row".to_string()));
    }
    let schema = Arc::new(schema);

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(delimiter)
        .build(Cursor::new(text.as_bytes()))
        .map_err(|e| Error::Decode(e.to_string()))?;
    let batches = reader
        .collect::<std::result::Result<Vec<RecordBatch>, _>>()
        .map_err(|e| Error::Decode(e.to_string()))?;

    concat_batches(&schema, &batches)
        .map(Table::new)
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Decode a parquet body into a table using its embedded schema
pub fn decode_parquet(data: Vec<u8>) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(data))
        .map_err(|e| Error::Decode(e.to_string()))?;
    let schema = builder.schema().clone();
    let reader = builder
        .build()
        .map_err(|e| Error::Decode(e.to_string()))?;
    let batches = reader
        .collect::<std::result::Result<Vec<RecordBatch>, _>>()
        .map_err(|e| Error::Decode(e.to_string()))?;

    concat_batches(&schema, &batches)
        .map(Table::new)
        .map_err(|e| Error::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};

    fn sample_table() -> Table {
        Table::try_from_columns([
            ("id", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
            ("value", Arc::new(StringArray::from(vec!["a", "b"])) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(
            "csv".parse::<SerializationFormat>().unwrap(),
            SerializationFormat::Csv
        );
        assert_eq!(
            "parquet".parse::<SerializationFormat>().unwrap(),
            SerializationFormat::Parquet
        );
        for bad in ["xml", "CSV", "", "json"] {
            let err = bad.parse::<SerializationFormat>().unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedFormat { ref format, key: None } if format == bad)
            );
        }
    }

    #[test]
    fn test_format_display_and_content_type() {
        assert_eq!(SerializationFormat::Csv.to_string(), "csv");
        assert_eq!(SerializationFormat::Parquet.to_string(), "parquet");
        assert_eq!(SerializationFormat::Csv.content_type(), "text/csv");
    }

    #[test]
    fn test_encode_csv_exact_body() {
        let body = SerializationFormat::Csv.encode(&sample_table()).unwrap();
        assert_eq!(String::from_utf8(body).unwrap(), "id,value\n1,a\n2,b\n");
    }

    #[test]
    fn test_encode_parquet_has_magic() {
        let body = SerializationFormat::Parquet.encode(&sample_table()).unwrap();
        assert_eq!(&body[..4], b"PAR1");
        assert_eq!(&body[body.len() - 4..], b"PAR1");
    }

    #[test]
    fn test_decode_csv_infers_types() {
        let table = decode_csv(b"id,price,name\n1,1.5,x\n2,2.25,y\n", &ReadOptions::default())
            .unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column_names(), vec!["id", "price", "name"]);

        let ids = table
            .column("id")
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(ids.values().to_vec(), vec![1, 2]);

        let prices = table
            .column("price")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(prices.value(1), 2.25);
    }

    #[test]
    fn test_decode_csv_custom_delimiter_and_encoding() {
        // "München" in latin1
        let data = b"city;count\nM\xfcnchen;3\n";
        let options = ReadOptions::new().encoding("latin1").delimiter(';');
        let table = decode_csv(data, &options).unwrap();

        let cities = table
            .column("city")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(cities.value(0), "München");
    }

    #[test]
    fn test_decode_csv_invalid_utf8() {
        let err = decode_csv(b"a,b\n\xff\xfe,1\n", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_csv_unknown_encoding() {
        let options = ReadOptions::new().encoding("klingon-8");
        let err = decode_csv(b"a\n1\n", &options).unwrap_err();
        assert!(err.to_string().contains("unknown encoding"));
    }

    #[test]
    fn test_decode_csv_rejects_multibyte_delimiter() {
        let options = ReadOptions::new().delimiter('§');
        let err = decode_csv(b"a\n1\n", &options).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_csv_ragged_rows() {
        let err = decode_csv(b"a,b\n1,2\n3\n", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_csv_header_only() {
        let table = decode_csv(b"id,value\n", &ReadOptions::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["id", "value"]);
    }

    #[test]
    fn test_decode_csv_without_header_row() {
        for body in [&b""[..], b"\n", b"  \r\n"] {
            let err = decode_csv(body, &ReadOptions::default()).unwrap_err();
            assert!(
                matches!(err, Error::Decode(ref msg) if msg == "no header row"),
                "{body:?}: {err}"
            );
        }
    }

    #[test]
    fn test_csv_empty_strings_come_back_null() {
        let table = Table::try_from_columns([
            (
                "code",
                Arc::new(StringArray::from(vec!["007", "", "x"])) as ArrayRef,
            ),
            ("n", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
        ])
        .unwrap();
        let body = SerializationFormat::Csv.encode(&table).unwrap();
        assert_eq!(
            String::from_utf8(body.clone()).unwrap(),
            "code,n\n007,1\n,2\nx,3\n"
        );

        let decoded = decode_csv(&body, &ReadOptions::default()).unwrap();
        let codes = decoded
            .column("code")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.value(0), "007");
        assert!(codes.is_null(1));
        assert_eq!(codes.value(2), "x");
    }

    #[test]
    fn test_decode_parquet_garbage() {
        let err = decode_parquet(b"definitely not parquet".to_vec()).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_parquet_body_decodes_to_same_table() {
        let table = sample_table();
        let body = SerializationFormat::Parquet.encode(&table).unwrap();
        let decoded = decode_parquet(body).unwrap();
        assert_eq!(decoded.column_names(), table.column_names());
        assert_eq!(decoded.batch().columns(), table.batch().columns());
    }
}
