use serde::{Deserialize, Serialize};

use crate::ml::codebook::{Codebook, CodebookError, ColumnKind};

/// Attribute kind as seen by the induction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VariableKind {
    /// Coded attribute with values in `0..cardinality`.
    Discrete { cardinality: usize },
    /// Real-valued attribute split by thresholds.
    Continuous,
}

/// Named attribute in matrix column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionVariable {
    pub name: String,
    pub kind: VariableKind,
}

impl DecisionVariable {
    pub fn discrete(name: impl Into<String>, cardinality: usize) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Discrete { cardinality },
        }
    }

    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Continuous,
        }
    }

    /// Derive the schema for `input_columns` from a finished codebook.
    pub fn from_codebook(
        codebook: &Codebook,
        input_columns: &[String],
    ) -> Result<Vec<Self>, CodebookError> {
        input_columns
            .iter()
            .map(|column| {
                Ok(match codebook.kind(column)? {
                    ColumnKind::Categorical => {
                        let cardinality = codebook.symbols(column).map_or(0, |s| s.len());
                        Self::discrete(column.clone(), cardinality)
                    }
                    ColumnKind::Continuous => Self::continuous(column.clone()),
                })
            })
            .collect()
    }
}
