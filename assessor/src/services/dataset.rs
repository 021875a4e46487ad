//! CSV survey dataset loader

use std::io::Read;
use std::path::{Path, PathBuf};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::core::features::{FeatureValue, RawRecord};
use crate::error::{AssessorError, AssessorResult};

/// Reads survey rows into `RawRecord`s
///
/// Blank and `NaN` cells become nulls and numeric cells are coerced to
/// numbers. Rows are identified by the optional id column, falling back to
/// the zero-based data row index. A row that cannot be parsed is returned as
/// an error in its position so the caller can count it and carry on.
#[derive(Debug, Clone)]
pub struct CsvDatasetLoader {
    path: PathBuf,
    id_column: Option<String>,
    sample_size: Option<usize>,
}

impl CsvDatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            id_column: None,
            sample_size: None,
        }
    }

    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    /// Only read the first `size` data rows
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every row; fails only if the file or its header cannot be read
    pub fn load(&self) -> AssessorResult<Vec<AssessorResult<RawRecord>>> {
        let reader = ReaderBuilder::new().trim(Trim::All).from_path(&self.path)?;
        let rows = self.read_rows(reader)?;
        info!(path = %self.path.display(), rows = rows.len(), "Loaded dataset");
        Ok(rows)
    }

    /// Load from any reader; used for in-memory data
    pub fn load_from_reader<R: Read>(&self, input: R) -> AssessorResult<Vec<AssessorResult<RawRecord>>> {
        self.read_rows(ReaderBuilder::new().trim(Trim::All).from_reader(input))
    }

    fn read_rows<R: Read>(&self, mut reader: csv::Reader<R>) -> AssessorResult<Vec<AssessorResult<RawRecord>>> {
        let headers = reader.headers()?.clone();
        let id_index = match &self.id_column {
            Some(column) => Some(
                headers
                    .iter()
                    .position(|h| h == column)
                    .ok_or_else(|| AssessorError::config("id_column", format!("column '{column}' not found in dataset")))?,
            ),
            None => None,
        };
        debug!(columns = headers.len(), "Dataset header parsed");

        let limit = self.sample_size.unwrap_or(usize::MAX);
        let rows = reader
            .records()
            .take(limit)
            .enumerate()
            .map(|(index, row)| match row {
                Ok(row) => Ok(to_record(index, &headers, &row, id_index)),
                Err(e) => Err(AssessorError::row(index.to_string(), format!("malformed CSV row: {e}"))),
            })
            .collect();

        Ok(rows)
    }
}

fn to_record(index: usize, headers: &StringRecord, row: &StringRecord, id_index: Option<usize>) -> RawRecord {
    let row_id = id_index
        .and_then(|i| row.get(i))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| index.to_string());

    let mut record = RawRecord::new(row_id);
    for (column, cell) in headers.iter().zip(row.iter()) {
        record.insert(column, FeatureValue::parse_cell(cell));
    }
    record
}
