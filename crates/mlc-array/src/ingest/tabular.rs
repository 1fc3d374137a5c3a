//! Delimited text reader.
//!
//! Records are turned into row vectors by `parse_record`, which knows
//! nothing about storage. `RowTable` enforces a uniform column count and
//! appends rows into a `GrowthBuffer` that doubles its capacity whenever it
//! is full, then trims to exactly `rows * cols` when the read completes.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::config::TabularConfig;
use crate::error::MlcError;
use crate::math::{alloc_exact, NumericArray};
use crate::Result;

/// A parsed, non-blank record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based line number in the source.
    pub line: u64,
    pub values: Vec<f32>,
}

/// Read a comma-separated file into a `rows x cols` array.
///
/// Each line is one record. Quotes have no special meaning, so a quoted
/// field is rejected as non-numeric and never spans lines.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<NumericArray> {
    read_csv_with_config(path, &TabularConfig::default())
}

/// Read a delimited file using a custom configuration.
pub fn read_csv_with_config<P: AsRef<Path>>(path: P, config: &TabularConfig) -> Result<NumericArray> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = File::open(path)
        .map_err(|e| MlcError::malformed(&source_name, format!("failed to open file: {}", e)))?;
    read_csv_from_reader(file, &source_name, config)
}

/// Read delimited text from any reader. `source_name` is only used in errors.
///
/// # Errors
///
/// * `MalformedSource` if the input has no data rows, a field is not a
///   decimal float, a row has a different column count than the first, or
///   the underlying reader fails.
/// * `ResourceExhausted` if the storage cannot grow.
pub fn read_csv_from_reader<R: Read>(
    reader: R,
    source_name: &str,
    config: &TabularConfig,
) -> Result<NumericArray> {
    let trim = if config.trim_fields {
        csv::Trim::All
    } else {
        csv::Trim::None
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(trim)
        .from_reader(reader);

    let mut table = RowTable::new(source_name, config.initial_capacity)?;
    for row in parse_rows(reader.records()) {
        let row = row.map_err(|reason| MlcError::malformed(source_name, reason))?;
        table.push_row(&row)?;
    }
    table.finish()
}

/// Lazily parse csv records into rows, skipping blank lines.
pub fn parse_rows<I>(records: I) -> impl Iterator<Item = std::result::Result<ParsedRow, String>>
where
    I: Iterator<Item = csv::Result<StringRecord>>,
{
    records.enumerate().filter_map(|(idx, record)| match record {
        Ok(record) => parse_record(&record, idx as u64 + 1).transpose(),
        Err(e) => Some(Err(format!("failed to read record {}: {}", idx + 1, e))),
    })
}

/// Parse one record. Returns `Ok(None)` for a blank line.
///
/// `fallback_line` is used when the record carries no position.
pub fn parse_record(
    record: &StringRecord,
    fallback_line: u64,
) -> std::result::Result<Option<ParsedRow>, String> {
    if is_blank(record) {
        return Ok(None);
    }
    let line = record
        .position()
        .map(|p| p.line())
        .unwrap_or(fallback_line);

    let mut values = Vec::with_capacity(record.len());
    for (col, field) in record.iter().enumerate() {
        let value = field.parse::<f32>().map_err(|_| {
            format!(
                "invalid number '{}' at line {}, column {}",
                field,
                line,
                col + 1
            )
        })?;
        values.push(value);
    }
    Ok(Some(ParsedRow { line, values }))
}

fn is_blank(record: &StringRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record[0].trim().is_empty())
}

/// Row-major accumulator that fixes the column count on the first row.
struct RowTable<'a> {
    source_name: &'a str,
    cols: Option<usize>,
    rows: usize,
    buffer: GrowthBuffer,
}

impl<'a> RowTable<'a> {
    fn new(source_name: &'a str, initial_capacity: usize) -> Result<Self> {
        Ok(Self {
            source_name,
            cols: None,
            rows: 0,
            buffer: GrowthBuffer::with_capacity(initial_capacity)?,
        })
    }

    fn push_row(&mut self, row: &ParsedRow) -> Result<()> {
        let found = row.values.len();
        match self.cols {
            None => {
                if found == 0 {
                    return Err(MlcError::malformed(
                        self.source_name,
                        format!("line {} has no columns", row.line),
                    ));
                }
                self.cols = Some(found);
            }
            Some(expected) if expected != found => {
                return Err(MlcError::malformed(
                    self.source_name,
                    format!(
                        "line {} has {} columns, expected {}",
                        row.line, found, expected
                    ),
                ));
            }
            Some(_) => {}
        }
        self.buffer.extend_from_slice(&row.values)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(self) -> Result<NumericArray> {
        let cols = match self.cols {
            Some(cols) if self.rows > 0 => cols,
            _ => return Err(MlcError::malformed(self.source_name, "no data rows")),
        };
        NumericArray::from_shape_vec(&[self.rows, cols], self.buffer.into_exact())
    }
}

/// Smallest power-of-two multiple of `current` that holds `needed` elements.
fn doubled_capacity(current: usize, needed: usize) -> Result<usize> {
    let mut target = current.max(1);
    while target < needed {
        target = target.checked_mul(2).ok_or_else(|| {
            MlcError::ResourceExhausted(format!("cannot grow storage past {} elements", target))
        })?;
    }
    Ok(target)
}

/// `f32` storage that doubles its capacity when full.
#[derive(Debug)]
pub(crate) struct GrowthBuffer {
    data: Vec<f32>,
}

impl GrowthBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            data: alloc_exact(capacity.max(1))?,
        })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub(crate) fn extend_from_slice(&mut self, values: &[f32]) -> Result<()> {
        let needed = self.data.len().checked_add(values.len()).ok_or_else(|| {
            MlcError::ResourceExhausted("element count overflows usize".to_string())
        })?;
        if needed > self.data.capacity() {
            let target = doubled_capacity(self.data.capacity(), needed)?;
            self.data
                .try_reserve_exact(target - self.data.len())
                .map_err(|e| {
                    MlcError::ResourceExhausted(format!(
                        "cannot grow storage to {} elements: {}",
                        target, e
                    ))
                })?;
        }
        self.data.extend_from_slice(values);
        Ok(())
    }

    /// Trim spare capacity and hand over the values.
    pub(crate) fn into_exact(mut self) -> Vec<f32> {
        self.data.shrink_to_fit();
        self.data
    }
}
