//! Persisted model: the tree plus everything needed to encode new rows.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::c45::{DecisionTree, VariableKind};
use super::codebook::{Codebook, ColumnKind};
use super::encoder::{EncodeError, EncodedPartition, encode};
use crate::dataset::Table;

pub const BUNDLE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write model {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid model bundle: {0}")]
    Invalid(String),
}

/// A trained tree together with its codebook and column binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: u32,
    /// Columns feeding the tree, in attribute order.
    pub input_columns: Vec<String>,
    pub label_column: String,
    pub codebook: Codebook,
    pub tree: DecisionTree,
}

impl ModelBundle {
    pub fn new(
        input_columns: Vec<String>,
        label_column: String,
        codebook: Codebook,
        tree: DecisionTree,
    ) -> Self {
        Self {
            format_version: BUNDLE_FORMAT_VERSION,
            input_columns,
            label_column,
            codebook,
            tree,
        }
    }

    /// Write the bundle as pretty JSON, replacing `path` atomically.
    pub fn save_json(&self, path: &Path) -> Result<(), BundleError> {
        let write_err = |source| BundleError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, bytes).map_err(write_err)?;
        fs::rename(&tmp_path, path).map_err(write_err)?;
        Ok(())
    }

    /// Read and validate a bundle written by [`ModelBundle::save_json`].
    pub fn load_json(path: &Path) -> Result<Self, BundleError> {
        let bytes = fs::read(path).map_err(|source| BundleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bundle: Self = serde_json::from_slice(&bytes)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check that the codebook, columns and tree agree with each other.
    pub fn validate(&self) -> Result<(), BundleError> {
        let invalid = |message: String| Err(BundleError::Invalid(message));
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return invalid(format!(
                "unsupported format version {} (expected {BUNDLE_FORMAT_VERSION})",
                self.format_version
            ));
        }
        match self.codebook.kind(&self.label_column) {
            Ok(ColumnKind::Categorical) => {}
            Ok(ColumnKind::Continuous) => {
                return invalid(format!("label {} is continuous", self.label_column));
            }
            Err(err) => return invalid(err.to_string()),
        }
        let variables = self.tree.variables();
        if variables.len() != self.input_columns.len() {
            return invalid(format!(
                "tree has {} attributes but {} input columns are bound",
                variables.len(),
                self.input_columns.len()
            ));
        }
        for (column, variable) in self.input_columns.iter().zip(variables) {
            if *column != variable.name {
                return invalid(format!(
                    "input column {column} is bound to attribute {}",
                    variable.name
                ));
            }
            let kind = self
                .codebook
                .kind(column)
                .map_err(|err| BundleError::Invalid(err.to_string()))?;
            let consistent = match (kind, variable.kind) {
                (ColumnKind::Continuous, VariableKind::Continuous) => true,
                (ColumnKind::Categorical, VariableKind::Discrete { cardinality }) => {
                    self.codebook.symbols(column).map_or(0, |s| s.len()) == cardinality
                }
                _ => false,
            };
            if !consistent {
                return invalid(format!("attribute {column} disagrees with the codebook"));
            }
        }
        self.tree.validate().map_err(BundleError::Invalid)
    }

    /// Encode `table` with the stored codebook. Symbols unseen at training
    /// time are rejected.
    pub fn encode(&self, table: &Table) -> Result<EncodedPartition, EncodeError> {
        encode(table, &self.codebook, &self.input_columns, &self.label_column)
    }

    /// Class symbols indexed by class code.
    pub fn class_names(&self) -> Vec<String> {
        self.codebook
            .symbols(&self.label_column)
            .map(|table| table.symbols().to_vec())
            .unwrap_or_default()
    }

    /// Tree rendering with decoded attribute values and class names.
    pub fn describe(&self) -> String {
        describe_tree(&self.tree, &self.codebook, &self.label_column)
    }
}

/// Render `tree` using the symbols in `codebook`.
pub fn describe_tree(tree: &DecisionTree, codebook: &Codebook, label_column: &str) -> String {
    let variables = tree.variables();
    tree.render(
        |attribute, code| {
            variables
                .get(attribute)
                .and_then(|variable| codebook.decode(&variable.name, code))
                .map_or_else(|| code.to_string(), str::to_string)
        },
        |class| {
            codebook
                .decode(label_column, class)
                .map_or_else(|| class.to_string(), str::to_string)
        },
    )
}
