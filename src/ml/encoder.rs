//! Applies a [`Codebook`] to a table, producing the numeric training matrix.

use thiserror::Error;

use super::codebook::{Codebook, CodebookError, ColumnKind};
use crate::dataset::Table;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("label column {column} must be categorical")]
    LabelNotCategorical { column: String },
    #[error("table {table} has no column {column}")]
    MissingColumn { table: String, column: String },
    #[error(transparent)]
    Codebook(#[from] CodebookError),
    #[error("{table} row {row}, column {column}: {source}")]
    Cell {
        table: String,
        row: usize,
        column: String,
        source: CodebookError,
    },
}

/// Encoded partition: one attribute vector and one class code per input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedPartition {
    /// Row-major attribute matrix, one column per input column.
    pub matrix: Vec<Vec<f64>>,
    /// Class codes aligned with `matrix`.
    pub labels: Vec<usize>,
}

impl EncodedPartition {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Encode `table` row by row, preserving row order.
pub fn encode(
    table: &Table,
    codebook: &Codebook,
    input_columns: &[String],
    label_column: &str,
) -> Result<EncodedPartition, EncodeError> {
    if codebook.kind(label_column)? != ColumnKind::Categorical {
        return Err(EncodeError::LabelNotCategorical {
            column: label_column.to_string(),
        });
    }
    let positions = input_columns
        .iter()
        .map(|column| column_position(table, column))
        .collect::<Result<Vec<_>, _>>()?;
    let label_position = column_position(table, label_column)?;

    let mut matrix = Vec::with_capacity(table.len());
    let mut labels = Vec::with_capacity(table.len());
    for (row, cells) in table.rows().iter().enumerate() {
        let mut values = Vec::with_capacity(positions.len());
        for (column, &col) in input_columns.iter().zip(&positions) {
            let value = codebook
                .encode_value(column, &cells[col])
                .map_err(|source| cell_error(table, row, column, source))?;
            values.push(value);
        }
        let label = codebook
            .encode_value(label_column, &cells[label_position])
            .map_err(|source| cell_error(table, row, label_column, source))?;
        matrix.push(values);
        labels.push(label as usize);
    }
    Ok(EncodedPartition { matrix, labels })
}

fn column_position(table: &Table, column: &str) -> Result<usize, EncodeError> {
    table
        .column_index(column)
        .ok_or_else(|| EncodeError::MissingColumn {
            table: table.name().to_string(),
            column: column.to_string(),
        })
}

fn cell_error(table: &Table, row: usize, column: &str, source: CodebookError) -> EncodeError {
    EncodeError::Cell {
        table: table.name().to_string(),
        row,
        column: column.to_string(),
        source,
    }
}
