//! Empirical error of a trained tree over an encoded partition.

use super::c45::{DecisionTree, TreeError};
use super::metrics::ConfusionMatrix;

/// Fraction of samples in `matrix` whose predicted class differs from `labels`.
///
/// An empty partition scores 0.
pub fn classification_error(
    model: &DecisionTree,
    matrix: &[Vec<f64>],
    labels: &[usize],
) -> Result<f64, TreeError> {
    let predictions = predict_all(model, matrix, labels)?;
    if labels.is_empty() {
        return Ok(0.0);
    }
    let wrong = predictions
        .iter()
        .zip(labels)
        .filter(|(predicted, truth)| predicted != truth)
        .count();
    Ok(wrong as f64 / labels.len() as f64)
}

/// Confusion matrix of `model` over `matrix`, sized for `n_classes`.
pub fn confusion_matrix(
    model: &DecisionTree,
    matrix: &[Vec<f64>],
    labels: &[usize],
    n_classes: usize,
) -> Result<ConfusionMatrix, TreeError> {
    let predictions = predict_all(model, matrix, labels)?;
    let mut cm = ConfusionMatrix::new(n_classes);
    for (&predicted, &truth) in predictions.iter().zip(labels) {
        cm.add(truth, predicted);
    }
    Ok(cm)
}

fn predict_all(
    model: &DecisionTree,
    matrix: &[Vec<f64>],
    labels: &[usize],
) -> Result<Vec<usize>, TreeError> {
    if matrix.len() != labels.len() {
        return Err(TreeError::ShapeMismatch {
            rows: matrix.len(),
            labels: labels.len(),
        });
    }
    let expected = model.variables().len();
    if let Some((row, sample)) = matrix
        .iter()
        .enumerate()
        .find(|(_, sample)| sample.len() != expected)
    {
        return Err(TreeError::RowLength {
            row,
            expected,
            actual: sample.len(),
        });
    }
    matrix.iter().map(|sample| model.classify(sample)).collect()
}
