//! In-memory tabular partitions shared by the codebook and encoder.

use std::borrow::Cow;
use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table {table}: duplicate column {column}")]
    DuplicateColumn { table: String, column: String },
    #[error("table {table}: row {row} has {actual} cells but the schema has {expected} columns")]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Raw cell value as produced by a table provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Raw text, used for categorical symbols and unparsed numbers.
    Text(String),
    /// Already-numeric value.
    Number(f64),
}

impl Cell {
    /// Text form used as the symbol key for categorical columns.
    pub fn as_symbol(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(text) => Cow::Borrowed(text.as_str()),
            Cell::Number(value) => Cow::Owned(value.to_string()),
        }
    }

    /// Parse the cell as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Text(text) => text.trim().parse::<f64>().ok()?,
            Cell::Number(value) => *value,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Named partition (training set, evaluation set, ...) with a fixed column order.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given ordered column names.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Result<Self, TableError> {
        let name = name.into();
        let mut index = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if index.insert(column.clone(), idx).is_some() {
                return Err(TableError::DuplicateColumn {
                    table: name,
                    column: column.clone(),
                });
            }
        }
        Ok(Self {
            name,
            columns,
            index,
            rows: Vec::new(),
        })
    }

    /// Append a row; its width must match the column count.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<(), TableError> {
        if cells.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                table: self.name.clone(),
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Borrow a cell by row position and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
