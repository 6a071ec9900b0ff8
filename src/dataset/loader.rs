//! Delimited text loader producing in-memory [`Table`] partitions.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::table::{Cell, Table, TableError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{table}: malformed record: {source}")]
    Csv { table: String, source: csv::Error },
    #[error("{table}: line {line} has {actual} fields but {expected} columns are configured")]
    RowWidth {
        table: String,
        line: u64,
        expected: usize,
        actual: usize,
    },
    #[error("{table}: no column names configured and the file has no header row")]
    MissingSchema { table: String },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Options controlling how delimited text is split into rows.
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    /// Ordered column names; empty means "take them from the header row".
    pub columns: Vec<String>,
    pub delimiter: u8,
    /// Lines starting with this byte are skipped.
    pub comment: Option<u8>,
    /// Trim surrounding whitespace from every field.
    pub trim: bool,
    pub has_headers: bool,
    /// Keep at most this many data rows.
    pub max_rows: Option<usize>,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            delimiter: b',',
            comment: None,
            trim: true,
            has_headers: false,
            max_rows: None,
        }
    }
}

/// Load a delimited text file into a table named `name`.
pub fn load_delimited(
    path: &Path,
    name: &str,
    options: &DelimitedOptions,
) -> Result<Table, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_delimited(file, name, options)?;
    tracing::debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Read delimited text from any reader into a table named `name`.
pub fn read_delimited<R: Read>(
    reader: R,
    name: &str,
    options: &DelimitedOptions,
) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .comment(options.comment)
        .trim(if options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .flexible(true)
        .from_reader(reader);

    let columns = if !options.columns.is_empty() {
        options.columns.clone()
    } else if options.has_headers {
        reader
            .headers()
            .map_err(|source| LoadError::Csv {
                table: name.to_string(),
                source,
            })?
            .iter()
            .map(str::to_string)
            .collect()
    } else {
        return Err(LoadError::MissingSchema {
            table: name.to_string(),
        });
    };

    let mut table = Table::new(name, columns)?;
    let expected = table.columns().len();
    for record in reader.records() {
        if options.max_rows.is_some_and(|max| table.len() >= max) {
            break;
        }
        let record = record.map_err(|source| LoadError::Csv {
            table: name.to_string(),
            source,
        })?;
        if record.len() != expected {
            return Err(LoadError::RowWidth {
                table: name.to_string(),
                line: record.position().map(|pos| pos.line()).unwrap_or(0),
                expected,
                actual: record.len(),
            });
        }
        table.push_row(record.iter().map(Cell::from).collect())?;
    }
    Ok(table)
}
