//! Classification reports built from a confusion matrix.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
/// Confusion matrix for a `K`-class tree.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Record one prediction; out-of-range classes are ignored.
    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    fn correct(&self) -> u64 {
        (0..self.n_classes).map(|c| self.get(c, c) as u64).sum()
    }

    /// Off-diagonal cells, most frequent first; ties keep row-major order.
    pub fn top_confusions(&self, limit: usize) -> Vec<Confusion> {
        let mut confusions = Vec::new();
        for truth in 0..self.n_classes {
            for predicted in 0..self.n_classes {
                let count = self.get(truth, predicted);
                if truth != predicted && count > 0 {
                    confusions.push(Confusion {
                        truth,
                        predicted,
                        count,
                    });
                }
            }
        }
        confusions.sort_by(|a, b| b.count.cmp(&a.count));
        confusions.truncate(limit);
        confusions
    }
}

/// One off-diagonal confusion-matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confusion {
    pub truth: usize,
    pub predicted: usize,
    pub count: u32,
}

/// Serialized scoring snapshot written by the evaluation CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Scored samples.
    pub samples: u64,
    /// Misclassified fraction; 0 when nothing was scored.
    pub error: f64,
    pub accuracy: f64,
    pub per_class: Vec<ClassReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub class: String,
    pub support: u32,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationReport {
    /// Summarize `cm`, naming classes from `class_names` (codes beyond it
    /// are printed as numbers).
    pub fn from_confusion(cm: &ConfusionMatrix, class_names: &[String]) -> Self {
        let samples = cm.total();
        let (error, accuracy) = if samples == 0 {
            (0.0, 0.0)
        } else {
            let correct = cm.correct();
            (
                (samples - correct) as f64 / samples as f64,
                correct as f64 / samples as f64,
            )
        };
        let per_class = (0..cm.n_classes)
            .map(|class| {
                let tp = cm.get(class, class) as f64;
                let mut support = 0u32;
                let mut predicted = 0f64;
                for other in 0..cm.n_classes {
                    support = support.saturating_add(cm.get(class, other));
                    predicted += cm.get(other, class) as f64;
                }
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support as f64);
                ClassReport {
                    class: class_names
                        .get(class)
                        .cloned()
                        .unwrap_or_else(|| class.to_string()),
                    support,
                    precision,
                    recall,
                    f1: ratio(2.0 * precision * recall, precision + recall),
                }
            })
            .collect();
        Self {
            samples,
            error,
            accuracy,
            per_class,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
