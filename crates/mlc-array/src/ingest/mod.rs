//! Ingestion: typed buffers and delimited text into `NumericArray`.

pub mod buffer;
pub mod tabular;

pub use buffer::{prepare_bytes, prepare_data, DataType, TypedBuffer};
pub use tabular::{read_csv, read_csv_from_reader, read_csv_with_config, ParsedRow};
