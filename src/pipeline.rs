//! End-to-end training run: codify, encode, induce, score.

use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::dataset::Table;
use crate::ml::c45::{DecisionTree, DecisionVariable, TrainError, TrainOptions, TreeError, train_c45};
use crate::ml::codebook::{Codebook, CodebookError, ColumnSpec};
use crate::ml::encoder::{EncodeError, EncodedPartition, encode};
use crate::ml::evaluate::classification_error;

pub use crate::ml::bundle::{ModelBundle, describe_tree};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no input columns configured")]
    NoInputs,
    #[error(transparent)]
    Codebook(#[from] CodebookError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Train(#[from] TrainError),
    #[error(transparent)]
    Evaluate(#[from] TreeError),
}

/// Which columns to use and how to induce the tree.
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Attribute columns in matrix order.
    pub input_columns: Vec<ColumnSpec>,
    pub label_column: String,
    pub options: TrainOptions,
}

impl RunSpec {
    pub fn input_names(&self) -> Vec<String> {
        self.input_columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Result of [`train_and_evaluate`].
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub training_error: f64,
    pub test_error: f64,
    pub model: DecisionTree,
    pub codebook: Codebook,
    /// Set when the time limit cut induction short and `model` is partial.
    pub timed_out: bool,
    pub training: EncodedPartition,
    pub evaluation: EncodedPartition,
}

impl Evaluation {
    /// Package the model for persistence.
    pub fn bundle(&self, spec: &RunSpec) -> ModelBundle {
        ModelBundle::new(
            spec.input_names(),
            spec.label_column.clone(),
            self.codebook.clone(),
            self.model.clone(),
        )
    }
}

/// Train on `training` and report training and test error.
///
/// One codebook is built over both partitions so every symbol in either one
/// encodes. A timeout is not fatal: the partial tree is scored and
/// `timed_out` is set.
pub fn train_and_evaluate(
    training: &Table,
    evaluation: &Table,
    spec: &RunSpec,
) -> Result<Evaluation, PipelineError> {
    if spec.input_columns.is_empty() {
        return Err(PipelineError::NoInputs);
    }
    let started = Instant::now();
    let mut schema = spec.input_columns.clone();
    schema.push(ColumnSpec::categorical(spec.label_column.clone()));
    let codebook = Codebook::build(&[training, evaluation], &schema)?;
    info!(
        columns = schema.len(),
        training_rows = training.len(),
        evaluation_rows = evaluation.len(),
        "Codebook built in {:?}",
        started.elapsed()
    );

    let inputs = spec.input_names();
    let encoded_training = encode(training, &codebook, &inputs, &spec.label_column)?;
    let encoded_evaluation = encode(evaluation, &codebook, &inputs, &spec.label_column)?;
    let variables = DecisionVariable::from_codebook(&codebook, &inputs)?;
    info!("Encoded partitions in {:?}", started.elapsed());

    let train_started = Instant::now();
    let (model, timed_out) = match train_c45(
        &encoded_training.matrix,
        &encoded_training.labels,
        &variables,
        &spec.options,
    ) {
        Ok(model) => (model, false),
        Err(TrainError::Timeout {
            limit,
            elapsed,
            partial,
        }) => {
            warn!(?limit, ?elapsed, "Induction timed out; scoring partial tree");
            (*partial, true)
        }
        Err(err) => return Err(err.into()),
    };
    info!(
        nodes = model.node_count(),
        leaves = model.leaf_count(),
        depth = model.depth(),
        "Tree induced in {:?}",
        train_started.elapsed()
    );

    let training_error =
        classification_error(&model, &encoded_training.matrix, &encoded_training.labels)?;
    let test_error = classification_error(
        &model,
        &encoded_evaluation.matrix,
        &encoded_evaluation.labels,
    )?;
    info!(training_error, test_error, "Evaluation finished");

    Ok(Evaluation {
        training_error,
        test_error,
        model,
        codebook,
        timed_out,
        training: encoded_training,
        evaluation: encoded_evaluation,
    })
}
