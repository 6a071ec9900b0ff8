use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use thiserror::Error;

use super::entropy::{entropy, gain_ratio};
use super::model::{DecisionTree, Leaf, Node, Split, SplitKind, UnroutablePolicy, majority_class};
use super::variable::{DecisionVariable, VariableKind};

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("matrix has {rows} rows but {labels} labels were given")]
    ShapeMismatch { rows: usize, labels: usize },
    #[error("row {row} has {actual} attributes but the schema has {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("min_samples_per_leaf must be at least 1")]
    InvalidMinSamples,
    #[error("row {row}: value {value} is not a valid code for discrete attribute {attribute}")]
    InvalidCode {
        row: usize,
        attribute: usize,
        value: f64,
    },
    #[error("row {row}: continuous attribute {attribute} is not finite")]
    NonFinite { row: usize, attribute: usize },
    #[error("induction exceeded its {limit:?} time limit after {elapsed:?}")]
    Timeout {
        limit: Duration,
        elapsed: Duration,
        /// Tree whose unfinished nodes were closed as majority leaves.
        partial: Box<DecisionTree>,
    },
}

/// Induction hyperparameters.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Nodes with fewer than twice this many samples become leaves.
    pub min_samples_per_leaf: usize,
    /// Wall-clock budget checked at every node.
    pub time_limit: Option<Duration>,
    /// Score attributes on the rayon pool.
    pub parallel: bool,
    /// Routing policy stored in the produced tree.
    pub unroutable: UnroutablePolicy,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            min_samples_per_leaf: 2,
            time_limit: None,
            parallel: false,
            unroutable: UnroutablePolicy::Majority,
        }
    }
}

/// Induce a C4.5 tree from an encoded training matrix.
pub fn train_c45(
    matrix: &[Vec<f64>],
    labels: &[usize],
    variables: &[DecisionVariable],
    options: &TrainOptions,
) -> Result<DecisionTree, TrainError> {
    validate_inputs(matrix, labels, variables, options)?;

    let started = Instant::now();
    let mut inducer = Inducer {
        matrix,
        labels,
        variables,
        n_classes: labels.iter().copied().max().map_or(0, |max| max + 1),
        min_samples_per_leaf: options.min_samples_per_leaf,
        parallel: options.parallel,
        // A limit past the end of representable time means no deadline.
        deadline: options
            .time_limit
            .and_then(|limit| started.checked_add(limit)),
        timed_out: false,
        nodes: Vec::new(),
    };
    let root = inducer.grow((0..labels.len()).collect());
    let timed_out = inducer.timed_out;

    let tree =
        DecisionTree::from_parts(variables.to_vec(), inducer.nodes, root, options.unroutable);
    tracing::debug!(
        "Induced tree with {} nodes, {} leaves, depth {} in {:?}",
        tree.node_count(),
        tree.leaf_count(),
        tree.depth(),
        started.elapsed()
    );
    match options.time_limit {
        Some(limit) if timed_out => Err(TrainError::Timeout {
            limit,
            elapsed: started.elapsed(),
            partial: Box::new(tree),
        }),
        _ => Ok(tree),
    }
}

fn validate_inputs(
    matrix: &[Vec<f64>],
    labels: &[usize],
    variables: &[DecisionVariable],
    options: &TrainOptions,
) -> Result<(), TrainError> {
    if options.min_samples_per_leaf == 0 {
        return Err(TrainError::InvalidMinSamples);
    }
    if matrix.len() != labels.len() {
        return Err(TrainError::ShapeMismatch {
            rows: matrix.len(),
            labels: labels.len(),
        });
    }
    if matrix.is_empty() {
        return Err(TrainError::EmptyTrainingSet);
    }
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != variables.len() {
            return Err(TrainError::RowLength {
                row,
                expected: variables.len(),
                actual: values.len(),
            });
        }
        for (attribute, (&value, variable)) in values.iter().zip(variables).enumerate() {
            match variable.kind {
                VariableKind::Discrete { cardinality } => {
                    let valid = value.is_finite()
                        && value >= 0.0
                        && value.fract() == 0.0
                        && (value as usize) < cardinality;
                    if !valid {
                        return Err(TrainError::InvalidCode {
                            row,
                            attribute,
                            value,
                        });
                    }
                }
                VariableKind::Continuous => {
                    if !value.is_finite() {
                        return Err(TrainError::NonFinite { row, attribute });
                    }
                }
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    attribute: usize,
    gain_ratio: f64,
    threshold: Option<f64>,
}

struct Inducer<'a> {
    matrix: &'a [Vec<f64>],
    labels: &'a [usize],
    variables: &'a [DecisionVariable],
    n_classes: usize,
    min_samples_per_leaf: usize,
    parallel: bool,
    deadline: Option<Instant>,
    timed_out: bool,
    nodes: Vec<Node>,
}

/// Pending work on the explicit induction stack.
enum Task {
    /// Turn `samples` into a leaf or a split.
    Grow {
        samples: Vec<usize>,
        exhausted: Vec<bool>,
    },
    /// Every child is finished; their ids are on top of the finished stack.
    Assemble {
        attribute: usize,
        pending: PendingSplit,
        class_counts: BTreeMap<usize, usize>,
    },
}

enum PendingSplit {
    Continuous { threshold: f64 },
    Discrete { codes: Vec<usize> },
}

impl PendingSplit {
    fn arity(&self) -> usize {
        match self {
            PendingSplit::Continuous { .. } => 2,
            PendingSplit::Discrete { codes } => codes.len(),
        }
    }
}

impl Inducer<'_> {
    /// Build the tree for `samples` depth-first and return the root's arena
    /// index.
    ///
    /// Uses an explicit stack so depth is bounded by memory, not the thread
    /// stack. Children are pushed before their parent, first branch first,
    /// so every child index is smaller than the parent's and node order does
    /// not depend on how candidates were scored.
    fn grow(&mut self, samples: Vec<usize>) -> usize {
        let mut tasks = vec![Task::Grow {
            samples,
            exhausted: vec![false; self.variables.len()],
        }];
        let mut finished: Vec<usize> = Vec::new();
        while let Some(task) = tasks.pop() {
            match task {
                Task::Grow { samples, exhausted } => {
                    if let Some(leaf) = self.expand(samples, exhausted, &mut tasks) {
                        finished.push(leaf);
                    }
                }
                Task::Assemble {
                    attribute,
                    pending,
                    class_counts,
                } => {
                    let first_child = finished.len().saturating_sub(pending.arity());
                    let children = finished.split_off(first_child);
                    let kind = match pending {
                        PendingSplit::Continuous { threshold } => {
                            let &[left, right] = children.as_slice() else {
                                unreachable!(
                                    "binary split finished with {} children",
                                    children.len()
                                );
                            };
                            SplitKind::Continuous {
                                threshold,
                                left,
                                right,
                            }
                        }
                        PendingSplit::Discrete { codes } => SplitKind::Discrete {
                            branches: codes.into_iter().zip(children).collect(),
                        },
                    };
                    self.nodes.push(Node::Split(Split {
                        attribute,
                        kind,
                        class_counts,
                    }));
                    finished.push(self.nodes.len() - 1);
                }
            }
        }
        // The root is always the last node pushed.
        self.nodes.len().saturating_sub(1)
    }

    /// Close `samples` as a leaf (returning its id) or queue its split.
    fn expand(
        &mut self,
        samples: Vec<usize>,
        mut exhausted: Vec<bool>,
        tasks: &mut Vec<Task>,
    ) -> Option<usize> {
        let counts = self.class_counts(&samples);
        let stop = self.deadline_passed()
            || counts.iter().filter(|&&count| count > 0).count() <= 1
            || samples.len() < self.min_samples_per_leaf.saturating_mul(2);
        let best = if stop {
            None
        } else {
            self.best_split(&samples, &counts, &exhausted)
        };
        let Some(best) = best else {
            return Some(self.push_leaf(&counts));
        };

        let attribute = best.attribute;
        let class_counts = sparse_counts(&counts);
        match best.threshold {
            Some(threshold) => {
                let (left, right): (Vec<usize>, Vec<usize>) = samples
                    .into_iter()
                    .partition(|&i| self.matrix[i][attribute] <= threshold);
                tasks.push(Task::Assemble {
                    attribute,
                    pending: PendingSplit::Continuous { threshold },
                    class_counts,
                });
                tasks.push(Task::Grow {
                    samples: right,
                    exhausted: exhausted.clone(),
                });
                tasks.push(Task::Grow {
                    samples: left,
                    exhausted,
                });
            }
            None => {
                let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
                for i in samples {
                    groups
                        .entry(self.matrix[i][attribute] as usize)
                        .or_default()
                        .push(i);
                }
                exhausted[attribute] = true;
                tasks.push(Task::Assemble {
                    attribute,
                    pending: PendingSplit::Discrete {
                        codes: groups.keys().copied().collect(),
                    },
                    class_counts,
                });
                // Reversed so the lowest code is grown first.
                for subset in groups.into_values().rev() {
                    tasks.push(Task::Grow {
                        samples: subset,
                        exhausted: exhausted.clone(),
                    });
                }
            }
        }
        None
    }

    fn deadline_passed(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            tracing::warn!("Induction time limit reached; closing remaining nodes as leaves");
            self.timed_out = true;
        }
        self.timed_out
    }

    fn push_leaf(&mut self, counts: &[usize]) -> usize {
        let class_counts = sparse_counts(counts);
        self.nodes.push(Node::Leaf(Leaf {
            predicted_class: majority_class(&class_counts),
            class_counts,
        }));
        self.nodes.len() - 1
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in samples {
            counts[self.labels[i]] += 1;
        }
        counts
    }

    /// Highest gain ratio over all usable attributes; ties keep the lowest
    /// attribute index, then the lowest threshold.
    fn best_split(
        &self,
        samples: &[usize],
        counts: &[usize],
        exhausted: &[bool],
    ) -> Option<Candidate> {
        let parent_entropy = entropy(counts);
        let score = |attribute: usize| -> Option<Candidate> {
            if exhausted[attribute] {
                return None;
            }
            match self.variables[attribute].kind {
                VariableKind::Discrete { .. } => {
                    self.discrete_candidate(attribute, samples, parent_entropy)
                }
                VariableKind::Continuous => {
                    self.continuous_candidate(attribute, samples, counts, parent_entropy)
                }
            }
        };
        let candidates: Vec<Candidate> = if self.parallel {
            (0..self.variables.len())
                .into_par_iter()
                .filter_map(score)
                .collect()
        } else {
            (0..self.variables.len()).filter_map(score).collect()
        };
        candidates
            .into_iter()
            .max_by_key(|c| (OrderedFloat(c.gain_ratio), Reverse(c.attribute)))
    }

    fn discrete_candidate(
        &self,
        attribute: usize,
        samples: &[usize],
        parent_entropy: f64,
    ) -> Option<Candidate> {
        let mut branches: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &i in samples {
            branches
                .entry(self.matrix[i][attribute] as usize)
                .or_insert_with(|| vec![0; self.n_classes])[self.labels[i]] += 1;
        }
        if branches.len() < 2 {
            return None;
        }
        let histograms: Vec<&[usize]> = branches.values().map(Vec::as_slice).collect();
        let ratio = gain_ratio(parent_entropy, &histograms);
        (ratio > 0.0).then_some(Candidate {
            attribute,
            gain_ratio: ratio,
            threshold: None,
        })
    }

    /// Sweep midpoints between consecutive distinct values in ascending order.
    fn continuous_candidate(
        &self,
        attribute: usize,
        samples: &[usize],
        counts: &[usize],
        parent_entropy: f64,
    ) -> Option<Candidate> {
        let mut sorted: Vec<(f64, usize)> = samples
            .iter()
            .map(|&i| (self.matrix[i][attribute], self.labels[i]))
            .collect();
        sorted.sort_by_key(|&(value, _)| OrderedFloat(value));

        let mut left = vec![0usize; self.n_classes];
        let mut right = counts.to_vec();
        let mut best: Option<(f64, f64)> = None;
        for pair in sorted.windows(2) {
            let (value, label) = pair[0];
            let next = pair[1].0;
            left[label] += 1;
            right[label] -= 1;
            if value == next {
                continue;
            }
            let threshold = value + (next - value) / 2.0;
            // Adjacent floats have no midpoint distinct from both values.
            if !(value < threshold && threshold < next) {
                continue;
            }
            let ratio = gain_ratio(parent_entropy, &[left.as_slice(), right.as_slice()]);
            if ratio > best.map_or(0.0, |(best_ratio, _)| best_ratio) {
                best = Some((ratio, threshold));
            }
        }
        best.map(|(ratio, threshold)| Candidate {
            attribute,
            gain_ratio: ratio,
            threshold: Some(threshold),
        })
    }
}

fn sparse_counts(counts: &[usize]) -> BTreeMap<usize, usize> {
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(class, &count)| (class, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(min_samples_per_leaf: usize) -> TrainOptions {
        TrainOptions {
            min_samples_per_leaf,
            ..TrainOptions::default()
        }
    }

    /// age (continuous), workclass (Private=0, Self-emp=1); income <=50K=0, >50K=1.
    fn census_scenario() -> (Vec<Vec<f64>>, Vec<usize>, Vec<DecisionVariable>) {
        let matrix = vec![
            vec![25.0, 0.0],
            vec![50.0, 0.0],
            vec![30.0, 0.0],
            vec![60.0, 1.0],
        ];
        let labels = vec![0, 1, 0, 1];
        let variables = vec![
            DecisionVariable::continuous("age"),
            DecisionVariable::discrete("workclass", 2),
        ];
        (matrix, labels, variables)
    }

    fn root_split(tree: &DecisionTree) -> &Split {
        match tree.node(tree.root_id()) {
            Some(Node::Split(split)) => split,
            other => panic!("expected split at root, got {other:?}"),
        }
    }

    #[test]
    fn splits_census_scenario_on_age_midpoint() {
        let (matrix, labels, variables) = census_scenario();
        let tree = train_c45(&matrix, &labels, &variables, &options(1)).unwrap();
        let split = root_split(&tree);
        assert_eq!(split.attribute, 0);
        match &split.kind {
            SplitKind::Continuous {
                threshold,
                left,
                right,
            } => {
                assert_eq!(*threshold, 40.0);
                for (child, class) in [(*left, 0), (*right, 1)] {
                    match tree.node(child) {
                        Some(Node::Leaf(leaf)) => {
                            assert_eq!(leaf.predicted_class, class);
                            assert_eq!(leaf.class_counts.len(), 1);
                        }
                        other => panic!("expected leaf, got {other:?}"),
                    }
                }
            }
            other => panic!("expected continuous split, got {other:?}"),
        }
        for (row, &label) in matrix.iter().zip(&labels) {
            assert_eq!(tree.classify(row).unwrap(), label);
        }
    }

    #[test]
    fn pure_training_set_yields_single_leaf() {
        let matrix = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let labels = vec![1, 1, 1, 1];
        let variables = vec![DecisionVariable::continuous("x")];
        let tree = train_c45(&matrix, &labels, &variables, &options(1)).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.classify(&[10.0]).unwrap(), 1);
    }

    #[test]
    fn small_nodes_become_majority_leaves() {
        let (matrix, labels, variables) = census_scenario();
        // 4 samples < 2 * 3, so the root cannot split.
        let tree = train_c45(&matrix, &labels, &variables, &options(3)).unwrap();
        assert_eq!(tree.node_count(), 1);
        match tree.node(tree.root_id()) {
            Some(Node::Leaf(leaf)) => {
                assert_eq!(leaf.predicted_class, 0);
                assert_eq!(leaf.class_counts, [(0, 2), (1, 2)].into_iter().collect());
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn constant_attribute_is_never_selected() {
        let matrix = vec![
            vec![0.0, 1.0],
            vec![0.0, 2.0],
            vec![0.0, 3.0],
            vec![0.0, 4.0],
        ];
        let labels = vec![0, 0, 1, 1];
        let variables = vec![
            DecisionVariable::discrete("constant", 1),
            DecisionVariable::continuous("x"),
        ];
        let tree = train_c45(&matrix, &labels, &variables, &options(1)).unwrap();
        assert_eq!(root_split(&tree).attribute, 1);

        let only_constant: Vec<Vec<f64>> = matrix.iter().map(|row| vec![row[0]]).collect();
        let tree = train_c45(&only_constant, &labels, &variables[..1], &options(1)).unwrap();
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn discrete_attribute_is_not_reused_below_its_split() {
        // color decides most of the labels; inside color=0 only x helps.
        let matrix = vec![
            vec![0.0, 1.0],
            vec![0.0, 2.0],
            vec![0.0, 3.0],
            vec![0.0, 4.0],
            vec![1.0, 1.0],
            vec![1.0, 2.0],
            vec![1.0, 3.0],
            vec![1.0, 4.0],
        ];
        let labels = vec![0, 0, 1, 1, 2, 2, 2, 2];
        let variables = vec![
            DecisionVariable::discrete("color", 2),
            DecisionVariable::continuous("x"),
        ];
        let tree = train_c45(&matrix, &labels, &variables, &options(1)).unwrap();
        let root = root_split(&tree);
        assert_eq!(root.attribute, 0);
        for node in tree.nodes() {
            if let Node::Split(split) = node
                && !std::ptr::eq(split, root)
            {
                assert_ne!(split.attribute, 0);
            }
        }
        for (row, &label) in matrix.iter().zip(&labels) {
            assert_eq!(tree.classify(row).unwrap(), label);
        }
    }

    #[test]
    fn thresholds_are_midpoints_with_non_empty_sides() {
        let matrix: Vec<Vec<f64>> = [1.0, 2.0, 2.0, 7.0, 9.0, 9.0]
            .iter()
            .map(|&v| vec![v])
            .collect();
        let labels = vec![0, 0, 1, 1, 1, 0];
        let variables = vec![DecisionVariable::continuous("x")];
        let tree = train_c45(&matrix, &labels, &variables, &options(1)).unwrap();
        let values: Vec<f64> = matrix.iter().map(|row| row[0]).collect();
        for node in tree.nodes() {
            if let Node::Split(Split {
                kind: SplitKind::Continuous { threshold, .. },
                ..
            }) = node
            {
                assert!(!values.contains(threshold));
                assert!(values.iter().any(|v| v < threshold));
                assert!(values.iter().any(|v| v > threshold));
            }
        }
    }

    #[test]
    fn ties_prefer_lowest_attribute_index() {
        let matrix = vec![
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        ];
        let labels = vec![0, 0, 1, 1];
        let variables = vec![
            DecisionVariable::discrete("a", 2),
            DecisionVariable::discrete("b", 2),
        ];
        let tree = train_c45(&matrix, &labels, &variables, &options(1)).unwrap();
        assert_eq!(root_split(&tree).attribute, 0);
    }

    #[test]
    fn parallel_scoring_builds_the_same_tree() {
        let matrix: Vec<Vec<f64>> = (0..60)
            .map(|i| {
                let i = i as f64;
                vec![(i * 7.0) % 13.0, (i % 3.0).floor(), (i * 3.0) % 11.0]
            })
            .collect();
        let labels: Vec<usize> = matrix
            .iter()
            .map(|row| usize::from(row[0] + row[2] > 10.0) + usize::from(row[1] == 2.0))
            .collect();
        let variables = vec![
            DecisionVariable::continuous("a"),
            DecisionVariable::discrete("b", 3),
            DecisionVariable::continuous("c"),
        ];
        let serial = train_c45(&matrix, &labels, &variables, &options(2)).unwrap();
        let parallel = train_c45(
            &matrix,
            &labels,
            &variables,
            &TrainOptions {
                parallel: true,
                ..options(2)
            },
        )
        .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn zero_time_limit_reports_partial_tree() {
        let (matrix, labels, variables) = census_scenario();
        let err = train_c45(
            &matrix,
            &labels,
            &variables,
            &TrainOptions {
                time_limit: Some(Duration::ZERO),
                ..options(1)
            },
        )
        .unwrap_err();
        match err {
            TrainError::Timeout { partial, .. } => {
                assert_eq!(partial.node_count(), 1);
                assert_eq!(partial.classify(&[25.0, 0.0]).unwrap(), 0);
            }
            other => panic!("expected timeout, got {other}"),
        }
    }

    #[test]
    fn rejects_malformed_inputs() {
        let variables = vec![DecisionVariable::discrete("a", 2)];
        assert!(matches!(
            train_c45(&[], &[], &variables, &options(1)),
            Err(TrainError::EmptyTrainingSet)
        ));
        assert!(matches!(
            train_c45(&[vec![0.0]], &[0, 1], &variables, &options(1)),
            Err(TrainError::ShapeMismatch { rows: 1, labels: 2 })
        ));
        assert!(matches!(
            train_c45(&[vec![0.0, 1.0]], &[0], &variables, &options(1)),
            Err(TrainError::RowLength { row: 0, .. })
        ));
        assert!(matches!(
            train_c45(&[vec![2.0]], &[0], &variables, &options(1)),
            Err(TrainError::InvalidCode { attribute: 0, .. })
        ));
        assert!(matches!(
            train_c45(&[vec![0.0]], &[0], &variables, &options(0)),
            Err(TrainError::InvalidMinSamples)
        ));
    }

    #[test]
    fn unrepresentable_time_limit_means_no_deadline() {
        let (matrix, labels, variables) = census_scenario();
        for limit in [Duration::MAX, Duration::from_secs_f64(1e19)] {
            let tree = train_c45(
                &matrix,
                &labels,
                &variables,
                &TrainOptions {
                    time_limit: Some(limit),
                    ..options(1)
                },
            )
            .unwrap();
            assert_eq!(root_split(&tree).attribute, 0);
        }
    }

    #[test]
    fn deep_chains_do_not_exhaust_the_thread_stack() {
        // Alternating labels peel one sample per level, so depth tracks the
        // row count. A small stack proves induction does not recurse.
        const ROWS: usize = 4_000;
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let matrix: Vec<Vec<f64>> = (0..ROWS).map(|i| vec![i as f64]).collect();
                let labels: Vec<usize> = (0..ROWS).map(|i| i % 2).collect();
                let variables = vec![DecisionVariable::continuous("x")];
                let tree = train_c45(&matrix, &labels, &variables, &options(1)).unwrap();
                assert!(tree.depth() > ROWS / 2, "depth {}", tree.depth());
                assert!(tree.validate().is_ok());
                for (row, &label) in matrix.iter().zip(&labels) {
                    assert_eq!(tree.classify(row).unwrap(), label);
                }
                tree.node_count()
            })
            .unwrap();
        assert!(handle.join().unwrap() >= 2 * ROWS - 1);
    }

    #[test]
    fn adjacent_floats_never_become_thresholds() {
        let low = 1.0f64;
        let high = f64::from_bits(low.to_bits() + 1);
        let variables = vec![DecisionVariable::continuous("x")];

        // The only split position has no midpoint distinct from both values.
        let tree = train_c45(&[vec![low], vec![high]], &[0, 1], &variables, &options(1)).unwrap();
        assert_eq!(tree.node_count(), 1);

        let matrix = vec![vec![low], vec![high], vec![3.0]];
        let tree = train_c45(&matrix, &[0, 1, 1], &variables, &options(1)).unwrap();
        match &root_split(&tree).kind {
            SplitKind::Continuous { threshold, .. } => {
                assert!(*threshold > high && *threshold < 3.0);
            }
            other => panic!("expected continuous split, got {other:?}"),
        }
        for node in tree.nodes() {
            if let Node::Split(Split {
                kind: SplitKind::Continuous { threshold, .. },
                ..
            }) = node
            {
                assert!(matrix.iter().all(|row| row[0] != *threshold));
            }
        }
    }
}
