//! Deterministic codification of categorical columns.
//!
//! A [`Codebook`] is built once from every partition of a run (training and
//! evaluation together) so that encoding any of them can never meet a symbol
//! that was not assigned a code. Codes are dense, start at zero, and follow
//! first-seen order over the concatenated partitions.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{Cell, Table};

#[derive(Debug, Error)]
pub enum CodebookError {
    #[error("column {column} is not present in any partition")]
    MissingColumn { column: String },
    #[error("continuous column {column} has non-numeric value {value:?} ({table} row {row})")]
    NonNumeric {
        table: String,
        row: usize,
        column: String,
        value: String,
    },
    #[error("column {column} is not registered in the codebook")]
    UnknownColumn { column: String },
    #[error("column {column} has no code for symbol {value:?}")]
    UnknownSymbol { column: String, value: String },
    #[error("column {column} has malformed numeric value {value:?}")]
    Parse { column: String, value: String },
}

/// How a column is treated by the codebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// String symbols mapped to dense integer codes.
    Categorical,
    /// Numeric values passed through after parsing.
    Continuous,
}

/// Column name plus its codification kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical,
        }
    }

    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Continuous,
        }
    }
}

/// Bijection between the symbols of one column and `0..len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolTable {
    symbols: Vec<String>,
    codes: HashMap<String, usize>,
}

impl SymbolTable {
    fn intern(&mut self, symbol: &str) -> usize {
        if let Some(&code) = self.codes.get(symbol) {
            return code;
        }
        let code = self.symbols.len();
        self.symbols.push(symbol.to_string());
        self.codes.insert(symbol.to_string(), code);
        code
    }

    pub fn code(&self, symbol: &str) -> Option<usize> {
        self.codes.get(symbol).copied()
    }

    pub fn symbol(&self, code: usize) -> Option<&str> {
        self.symbols.get(code).map(String::as_str)
    }

    /// Symbols in code order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl From<Vec<String>> for SymbolTable {
    fn from(symbols: Vec<String>) -> Self {
        let mut table = SymbolTable::default();
        for symbol in &symbols {
            table.intern(symbol);
        }
        table
    }
}

impl From<SymbolTable> for Vec<String> {
    fn from(table: SymbolTable) -> Self {
        table.symbols
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "symbols", rename_all = "lowercase")]
enum ColumnCoding {
    Categorical(SymbolTable),
    Continuous,
}

/// Immutable per-column codification for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Codebook {
    columns: BTreeMap<String, ColumnCoding>,
}

impl Codebook {
    /// Build the codebook from the union of `partitions`, in the given order.
    pub fn build(partitions: &[&Table], columns: &[ColumnSpec]) -> Result<Self, CodebookError> {
        let mut coded = BTreeMap::new();
        for spec in columns {
            let present: Vec<(&Table, usize)> = partitions
                .iter()
                .filter_map(|table| table.column_index(&spec.name).map(|idx| (*table, idx)))
                .collect();
            if present.is_empty() {
                return Err(CodebookError::MissingColumn {
                    column: spec.name.clone(),
                });
            }
            let coding = match spec.kind {
                ColumnKind::Categorical => {
                    let mut symbols = SymbolTable::default();
                    for (table, col) in &present {
                        for cells in table.rows() {
                            symbols.intern(&cells[*col].as_symbol());
                        }
                    }
                    ColumnCoding::Categorical(symbols)
                }
                ColumnKind::Continuous => {
                    for (table, col) in &present {
                        for (row, cells) in table.rows().iter().enumerate() {
                            let cell = &cells[*col];
                            if cell.as_number().is_none() {
                                return Err(CodebookError::NonNumeric {
                                    table: table.name().to_string(),
                                    row,
                                    column: spec.name.clone(),
                                    value: cell.as_symbol().into_owned(),
                                });
                            }
                        }
                    }
                    ColumnCoding::Continuous
                }
            };
            coded.insert(spec.name.clone(), coding);
        }
        Ok(Self { columns: coded })
    }

    /// Encode one raw cell of `column` as a double.
    pub fn encode_value(&self, column: &str, cell: &Cell) -> Result<f64, CodebookError> {
        match self.coding(column)? {
            ColumnCoding::Categorical(symbols) => {
                let symbol = cell.as_symbol();
                symbols
                    .code(&symbol)
                    .map(|code| code as f64)
                    .ok_or_else(|| CodebookError::UnknownSymbol {
                        column: column.to_string(),
                        value: symbol.into_owned(),
                    })
            }
            ColumnCoding::Continuous => {
                cell.as_number().ok_or_else(|| CodebookError::Parse {
                    column: column.to_string(),
                    value: cell.as_symbol().into_owned(),
                })
            }
        }
    }

    /// Kind of a registered column.
    pub fn kind(&self, column: &str) -> Result<ColumnKind, CodebookError> {
        Ok(match self.coding(column)? {
            ColumnCoding::Categorical(_) => ColumnKind::Categorical,
            ColumnCoding::Continuous => ColumnKind::Continuous,
        })
    }

    /// Symbol table of a categorical column, `None` for continuous or unknown columns.
    pub fn symbols(&self, column: &str) -> Option<&SymbolTable> {
        match self.columns.get(column) {
            Some(ColumnCoding::Categorical(symbols)) => Some(symbols),
            _ => None,
        }
    }

    /// Reverse lookup of a categorical code.
    pub fn decode(&self, column: &str, code: usize) -> Option<&str> {
        self.symbols(column).and_then(|symbols| symbols.symbol(code))
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    fn coding(&self, column: &str) -> Result<&ColumnCoding, CodebookError> {
        self.columns
            .get(column)
            .ok_or_else(|| CodebookError::UnknownColumn {
                column: column.to_string(),
            })
    }
}
