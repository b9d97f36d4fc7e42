//! CSV Survey Loader Module
//! Reads the survey export into a `Table` using Polars.

use crate::data::schema::SurveySchema;
use crate::data::table::{Table, TableError};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Malformed CSV: {0}")]
    MalformedCsv(#[from] PolarsError),
    #[error("Column not found in header: {0}")]
    ColumnNotFound(String),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Loads a survey CSV with every column read as text.
///
/// Cells equal to the null marker (and empty cells) become missing values.
/// A row with more fields than the header is rejected; a short row is
/// padded with missing values.
#[derive(Debug, Clone)]
pub struct SurveyLoader {
    null_marker: String,
    categorical: Vec<String>,
    multi_select: Vec<String>,
}

impl Default for SurveyLoader {
    fn default() -> Self {
        Self::new("NA")
    }
}

impl SurveyLoader {
    pub fn new(null_marker: impl Into<String>) -> Self {
        Self {
            null_marker: null_marker.into(),
            categorical: Vec::new(),
            multi_select: Vec::new(),
        }
    }

    /// Columns that must be present and hold one category per row.
    pub fn with_categorical(mut self, columns: Vec<String>) -> Self {
        self.categorical = columns;
        self
    }

    /// Columns that must be present and hold `;`-joined options.
    pub fn with_multi_select(mut self, columns: Vec<String>) -> Self {
        self.multi_select = columns;
        self
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&self, file_path: &Path) -> Result<Table, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::FileNotFound(file_path.to_path_buf()));
        }

        let path_str = file_path.to_string_lossy().to_string();
        debug!("Reading {} (null marker {:?})", path_str, self.null_marker);

        // Schema inference off: every column comes back as String
        let df = LazyCsvReader::new(path_str.as_str())
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_null_values(Some(NullValues::AllColumnsSingle(
                self.null_marker.as_str().into(),
            )))
            .finish()?
            .collect()?;

        let header: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(missing) = self
            .categorical
            .iter()
            .chain(self.multi_select.iter())
            .find(|c| !header.contains(c))
        {
            return Err(LoaderError::ColumnNotFound(missing.clone()));
        }

        let schema = SurveySchema::from_header(&header, &self.categorical, &self.multi_select);
        let table = Table::new(df, schema)?;

        info!(
            "Loaded {} rows, {} columns from {}",
            table.height(),
            header.len(),
            file_path.display()
        );
        Ok(table)
    }
}
