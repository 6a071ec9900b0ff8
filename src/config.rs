//! Run configuration loaded from TOML.
//!
//! Defaults describe the UCI Census Income files: fifteen unlabelled,
//! comma-separated columns with `income` as the class.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::DelimitedOptions;
use crate::ml::c45::{TrainOptions, UnroutablePolicy};
use crate::ml::codebook::ColumnSpec;
use crate::pipeline::RunSpec;

pub const RUN_CONFIG_FILE_NAME: &str = "run.toml";

const CENSUS_COLUMNS: [&str; 15] = [
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education-num",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
    "native-country",
    "income",
];

const CENSUS_CONTINUOUS: [&str; 6] = [
    "age",
    "fnlwgt",
    "education-num",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
}

/// How the delimited input files are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Column names in file order.
    pub columns: Vec<String>,
    pub delimiter: String,
    /// Lines starting with this character are skipped.
    pub comment: Option<String>,
    pub trim: bool,
    pub has_headers: bool,
    /// Cap on training rows read from the file.
    pub max_training_rows: Option<usize>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            columns: CENSUS_COLUMNS.iter().map(|c| c.to_string()).collect(),
            delimiter: ",".to_string(),
            comment: Some("|".to_string()),
            trim: true,
            has_headers: false,
            max_training_rows: Some(10_000),
        }
    }
}

/// Which columns feed the tree and how it is induced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub label: String,
    /// Input columns; every non-label column when unset.
    pub inputs: Option<Vec<String>>,
    /// Inputs parsed as numbers instead of codified as symbols.
    pub continuous: Vec<String>,
    pub min_samples_per_leaf: usize,
    pub time_limit_secs: Option<f64>,
    pub parallel: bool,
    pub unroutable: UnroutablePolicy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            label: "income".to_string(),
            inputs: None,
            continuous: CENSUS_CONTINUOUS.iter().map(|c| c.to_string()).collect(),
            min_samples_per_leaf: TrainOptions::default().min_samples_per_leaf,
            time_limit_secs: None,
            parallel: false,
            unroutable: UnroutablePolicy::default(),
        }
    }
}

impl RunConfig {
    /// Load and validate a TOML run configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `run.toml` from `dir` if it exists.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(RUN_CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid(message));
        let known = |column: &str| self.data.columns.iter().any(|c| c == column);
        if !self.data.columns.is_empty() && !known(&self.model.label) {
            return invalid(format!("label {} is not a data column", self.model.label));
        }
        if self.data.columns.is_empty() && !self.data.has_headers {
            return invalid("data.columns is empty and has_headers is false".to_string());
        }
        if let Some(inputs) = &self.model.inputs {
            if inputs.is_empty() {
                return invalid("model.inputs is empty".to_string());
            }
            if inputs.contains(&self.model.label) {
                return invalid(format!("label {} is listed as an input", self.model.label));
            }
        }
        if self.model.continuous.contains(&self.model.label) {
            return invalid(format!("label {} cannot be continuous", self.model.label));
        }
        if !self.data.columns.is_empty() {
            let referenced = self
                .model
                .inputs
                .iter()
                .flatten()
                .chain(&self.model.continuous);
            for column in referenced {
                if !known(column) {
                    return invalid(format!("column {column} is not a data column"));
                }
            }
        }
        if self.model.min_samples_per_leaf == 0 {
            return invalid("model.min_samples_per_leaf must be at least 1".to_string());
        }
        if self
            .model
            .time_limit_secs
            .is_some_and(|secs| Duration::try_from_secs_f64(secs).is_err())
        {
            return invalid(
                "model.time_limit_secs must be a non-negative number of seconds that fits a duration"
                    .to_string(),
            );
        }
        single_byte("data.delimiter", &self.data.delimiter)?;
        if let Some(comment) = &self.data.comment {
            single_byte("data.comment", comment)?;
        }
        Ok(())
    }

    /// Input column names for a file with `columns` (used when the config
    /// takes its columns from a header row).
    pub fn input_columns(&self, columns: &[String]) -> Vec<String> {
        match &self.model.inputs {
            Some(inputs) => inputs.clone(),
            None => columns
                .iter()
                .filter(|c| **c != self.model.label)
                .cloned()
                .collect(),
        }
    }

    /// Pipeline specification for a file with `columns`.
    pub fn run_spec(&self, columns: &[String]) -> RunSpec {
        let input_columns = self
            .input_columns(columns)
            .into_iter()
            .map(|name| {
                if self.model.continuous.contains(&name) {
                    ColumnSpec::continuous(name)
                } else {
                    ColumnSpec::categorical(name)
                }
            })
            .collect();
        RunSpec {
            input_columns,
            label_column: self.model.label.clone(),
            options: self.train_options(),
        }
    }

    pub fn train_options(&self) -> TrainOptions {
        TrainOptions {
            min_samples_per_leaf: self.model.min_samples_per_leaf,
            time_limit: self
                .model
                .time_limit_secs
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
            parallel: self.model.parallel,
            unroutable: self.model.unroutable,
        }
    }

    /// Reader options; `max_rows` caps the rows read.
    pub fn delimited_options(&self, max_rows: Option<usize>) -> DelimitedOptions {
        DelimitedOptions {
            columns: self.data.columns.clone(),
            delimiter: self.data.delimiter.as_bytes().first().copied().unwrap_or(b','),
            comment: self
                .data
                .comment
                .as_ref()
                .and_then(|c| c.as_bytes().first().copied()),
            trim: self.data.trim,
            has_headers: self.data.has_headers,
            max_rows,
        }
    }
}

fn single_byte(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() != 1 {
        return Err(ConfigError::Invalid(format!(
            "{field} must be a single ASCII character, got {value:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::codebook::ColumnKind;
    use tempfile::tempdir;

    #[test]
    fn defaults_describe_census_layout() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        let spec = config.run_spec(&config.data.columns);
        assert_eq!(spec.input_columns.len(), 14);
        assert_eq!(spec.label_column, "income");
        let kinds: Vec<(&str, ColumnKind)> = spec
            .input_columns
            .iter()
            .map(|c| (c.name.as_str(), c.kind))
            .collect();
        assert_eq!(kinds[0], ("age", ColumnKind::Continuous));
        assert_eq!(kinds[1], ("workclass", ColumnKind::Categorical));
        assert_eq!(
            config.delimited_options(Some(5)).comment,
            Some(b'|')
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RunConfig = toml::from_str(
            r#"
            [model]
            min_samples_per_leaf = 5
            unroutable = "reject"
            time_limit_secs = 1.5
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.data, DataConfig::default());
        let options = config.train_options();
        assert_eq!(options.min_samples_per_leaf, 5);
        assert_eq!(options.unroutable, UnroutablePolicy::Reject);
        assert_eq!(options.time_limit, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn explicit_inputs_restrict_the_schema() {
        let config: RunConfig = toml::from_str(
            r#"
            [data]
            columns = ["age", "workclass", "income"]
            max_training_rows = 100

            [model]
            label = "income"
            inputs = ["workclass", "age"]
            continuous = ["age"]
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        let spec = config.run_spec(&config.data.columns);
        assert_eq!(
            spec.input_columns,
            vec![
                ColumnSpec::categorical("workclass"),
                ColumnSpec::continuous("age")
            ]
        );
    }

    #[test]
    fn rejects_inconsistent_configs() {
        let mut config = RunConfig::default();
        config.model.label = "salary".to_string();
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.model.continuous.push("income".to_string());
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.model.inputs = Some(vec!["age".to_string(), "income".to_string()]);
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.model.min_samples_per_leaf = 0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.data.delimiter = "::".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn time_limit_must_fit_a_duration() {
        let config: RunConfig = toml::from_str("[model]\ntime_limit_secs = 1e30\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert_eq!(config.train_options().time_limit, None);

        for secs in [-1.0, f64::NAN, f64::INFINITY] {
            let mut config = RunConfig::default();
            config.model.time_limit_secs = Some(secs);
            assert!(config.validate().is_err(), "{secs}");
        }

        let mut config = RunConfig::default();
        config.model.time_limit_secs = Some(1e19);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.train_options().time_limit,
            Some(Duration::from_secs_f64(1e19))
        );
    }

    #[test]
    fn loads_run_toml_from_dir() {
        let dir = tempdir().unwrap();
        assert!(RunConfig::load_from_dir(dir.path()).unwrap().is_none());
        std::fs::write(
            dir.path().join(RUN_CONFIG_FILE_NAME),
            "[model]\nparallel = true\n",
        )
        .unwrap();
        let config = RunConfig::load_from_dir(dir.path()).unwrap().unwrap();
        assert!(config.model.parallel);

        std::fs::write(dir.path().join(RUN_CONFIG_FILE_NAME), "[model\n").unwrap();
        assert!(matches!(
            RunConfig::load_from_dir(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
