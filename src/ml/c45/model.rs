use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::variable::{DecisionVariable, VariableKind};

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("matrix has {rows} rows but {labels} labels were given")]
    ShapeMismatch { rows: usize, labels: usize },
    #[error("row {row} has {actual} attributes but the model expects {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("sample has {actual} attributes but the model expects {expected}")]
    SampleLength { expected: usize, actual: usize },
    #[error("no branch of attribute {attribute} matches value {value}")]
    UnroutableSample { attribute: usize, value: f64 },
    #[error("node {node} does not exist")]
    DanglingNode { node: usize },
}

/// Behaviour when a discrete split has no branch for a sample's code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnroutablePolicy {
    /// Predict the majority class recorded at the split node.
    #[default]
    Majority,
    /// Report [`TreeError::UnroutableSample`].
    Reject,
}

/// Terminal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub predicted_class: usize,
    /// Training samples per class that reached this leaf.
    pub class_counts: BTreeMap<usize, usize>,
}

/// Internal decision node; children are indices into the tree's node arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub attribute: usize,
    pub kind: SplitKind,
    /// Training samples per class across all children.
    pub class_counts: BTreeMap<usize, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SplitKind {
    /// One child per code observed at this node.
    Discrete { branches: BTreeMap<usize, usize> },
    /// `value <= threshold` goes left, everything else right.
    Continuous {
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf(Leaf),
    Split(Split),
}

impl Split {
    /// Majority class over the node's training samples (ties to the smallest class).
    pub fn majority_class(&self) -> usize {
        majority_class(&self.class_counts)
    }

    fn children(&self) -> Vec<usize> {
        match &self.kind {
            SplitKind::Discrete { branches } => branches.values().copied().collect(),
            SplitKind::Continuous { left, right, .. } => vec![*left, *right],
        }
    }
}

/// Most frequent class, ties broken towards the smallest class id.
pub fn majority_class(class_counts: &BTreeMap<usize, usize>) -> usize {
    let mut best = (0usize, 0usize);
    for (&class, &count) in class_counts {
        if count > best.1 {
            best = (class, count);
        }
    }
    best.0
}

/// Induced C4.5 tree.
///
/// Nodes live in an arena. Every child index is smaller than its parent's
/// index and is referenced by exactly one parent, so the arena is a strict
/// out-tree rooted at `root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    variables: Vec<DecisionVariable>,
    nodes: Vec<Node>,
    root: usize,
    #[serde(default)]
    unroutable: UnroutablePolicy,
}

impl DecisionTree {
    pub(crate) fn from_parts(
        variables: Vec<DecisionVariable>,
        nodes: Vec<Node>,
        root: usize,
        unroutable: UnroutablePolicy,
    ) -> Self {
        Self {
            variables,
            nodes,
            root,
            unroutable,
        }
    }

    /// Replace the policy used for samples that no discrete branch accepts.
    pub fn with_unroutable_policy(mut self, policy: UnroutablePolicy) -> Self {
        self.unroutable = policy;
        self
    }

    pub fn unroutable_policy(&self) -> UnroutablePolicy {
        self.unroutable
    }

    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Arena index of the root node.
    pub fn root_id(&self) -> usize {
        self.root
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Predict the class of one encoded attribute vector.
    pub fn classify(&self, sample: &[f64]) -> Result<usize, TreeError> {
        if sample.len() != self.variables.len() {
            return Err(TreeError::SampleLength {
                expected: self.variables.len(),
                actual: sample.len(),
            });
        }
        Ok(self.leaf_for(sample)?.predicted_class)
    }

    /// Walk `sample` down the tree; the returned leaf is `None` when a discrete
    /// split could not route it and the majority fallback applied.
    fn leaf_for(&self, sample: &[f64]) -> Result<Routed<'_>, TreeError> {
        let mut id = self.root;
        loop {
            let node = self
                .nodes
                .get(id)
                .ok_or(TreeError::DanglingNode { node: id })?;
            let split = match node {
                Node::Leaf(leaf) => {
                    return Ok(Routed {
                        predicted_class: leaf.predicted_class,
                        leaf: Some(leaf),
                    });
                }
                Node::Split(split) => split,
            };
            let value = *sample
                .get(split.attribute)
                .ok_or(TreeError::SampleLength {
                    expected: split.attribute + 1,
                    actual: sample.len(),
                })?;
            id = match &split.kind {
                SplitKind::Continuous {
                    threshold,
                    left,
                    right,
                } => {
                    if value <= *threshold {
                        *left
                    } else {
                        *right
                    }
                }
                SplitKind::Discrete { branches } => {
                    match as_code(value).and_then(|code| branches.get(&code)) {
                        Some(&child) => child,
                        None => {
                            return match self.unroutable {
                                UnroutablePolicy::Majority => Ok(Routed {
                                    predicted_class: split.majority_class(),
                                    leaf: None,
                                }),
                                UnroutablePolicy::Reject => Err(TreeError::UnroutableSample {
                                    attribute: split.attribute,
                                    value,
                                }),
                            };
                        }
                    }
                }
            };
        }
    }

    /// Leaf reached by `sample`, `None` if routing fell back at a split.
    pub fn leaf(&self, sample: &[f64]) -> Result<Option<&Leaf>, TreeError> {
        if sample.len() != self.variables.len() {
            return Err(TreeError::SampleLength {
                expected: self.variables.len(),
                actual: sample.len(),
            });
        }
        Ok(self.leaf_for(sample)?.leaf)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf(_)))
            .count()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some(Node::Split(split)) = self.nodes.get(id) {
                stack.extend(split.children().into_iter().map(|child| (child, depth + 1)));
            }
        }
        deepest
    }

    /// Check the structural invariants of a tree loaded from outside.
    pub fn validate(&self) -> Result<(), String> {
        if self.root >= self.nodes.len() {
            return Err(format!(
                "Root {} is outside the node arena of {} nodes",
                self.root,
                self.nodes.len()
            ));
        }
        let mut referenced = vec![false; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            let Node::Split(split) = node else {
                continue;
            };
            let Some(variable) = self.variables.get(split.attribute) else {
                return Err(format!(
                    "Node {id} splits on attribute {} but the model has {} variables",
                    split.attribute,
                    self.variables.len()
                ));
            };
            match (&split.kind, variable.kind) {
                (SplitKind::Discrete { branches }, VariableKind::Discrete { cardinality }) => {
                    if let Some(code) = branches.keys().find(|&&code| code >= cardinality) {
                        return Err(format!(
                            "Node {id} has a branch for code {code} but {} has {cardinality} symbols",
                            variable.name
                        ));
                    }
                }
                (SplitKind::Continuous { threshold, .. }, VariableKind::Continuous) => {
                    if !threshold.is_finite() {
                        return Err(format!("Node {id} has a non-finite threshold"));
                    }
                }
                _ => {
                    return Err(format!(
                        "Node {id} split kind does not match variable {}",
                        variable.name
                    ));
                }
            }
            for child in split.children() {
                if child >= id {
                    return Err(format!("Node {id} points forward to node {child}"));
                }
                if std::mem::replace(&mut referenced[child], true) {
                    return Err(format!("Node {child} has more than one parent"));
                }
            }
        }
        if referenced[self.root] {
            return Err("Root node is referenced as a child".to_string());
        }
        Ok(())
    }

    /// Render the tree as indented rules.
    ///
    /// `value_name(attribute, code)` names discrete codes and `class_name(class)`
    /// names predicted classes.
    pub fn render<V, C>(&self, value_name: V, class_name: C) -> String
    where
        V: Fn(usize, usize) -> String,
        C: Fn(usize) -> String,
    {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize, None::<String>)];
        while let Some((id, indent, condition)) = stack.pop() {
            let pad = "  ".repeat(indent);
            let indent = match condition {
                Some(condition) => {
                    out.push_str(&format!("{pad}{condition}\n"));
                    indent + 1
                }
                None => indent,
            };
            let pad = "  ".repeat(indent);
            match self.nodes.get(id) {
                Some(Node::Leaf(leaf)) => {
                    let total: usize = leaf.class_counts.values().sum();
                    out.push_str(&format!(
                        "{pad}=> {} ({total})\n",
                        class_name(leaf.predicted_class)
                    ));
                }
                Some(Node::Split(split)) => {
                    let name = self
                        .variables
                        .get(split.attribute)
                        .map_or("?", |variable| variable.name.as_str());
                    // Pushed in reverse so branches print in order.
                    match &split.kind {
                        SplitKind::Continuous {
                            threshold,
                            left,
                            right,
                        } => {
                            stack.push((*right, indent, Some(format!("{name} > {threshold}"))));
                            stack.push((*left, indent, Some(format!("{name} <= {threshold}"))));
                        }
                        SplitKind::Discrete { branches } => {
                            for (&code, &child) in branches.iter().rev() {
                                let condition =
                                    format!("{name} == {}", value_name(split.attribute, code));
                                stack.push((child, indent, Some(condition)));
                            }
                        }
                    }
                }
                None => out.push_str(&format!("{pad}<missing node {id}>\n")),
            }
        }
        out
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.render(|_, code| code.to_string(), |class| class.to_string());
        f.write_str(&rendered)
    }
}

struct Routed<'a> {
    predicted_class: usize,
    leaf: Option<&'a Leaf>,
}

fn as_code(value: f64) -> Option<usize> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(usize, usize)]) -> BTreeMap<usize, usize> {
        pairs.iter().copied().collect()
    }

    fn leaf(class: usize, n: usize) -> Node {
        Node::Leaf(Leaf {
            predicted_class: class,
            class_counts: counts(&[(class, n)]),
        })
    }

    /// workclass (discrete, 3 codes) at the root; code 0 splits on age at 40.
    fn sample_tree() -> DecisionTree {
        let variables = vec![
            DecisionVariable::continuous("age"),
            DecisionVariable::discrete("workclass", 3),
        ];
        let nodes = vec![
            leaf(0, 2),
            leaf(1, 2),
            Node::Split(Split {
                attribute: 0,
                kind: SplitKind::Continuous {
                    threshold: 40.0,
                    left: 0,
                    right: 1,
                },
                class_counts: counts(&[(0, 2), (1, 2)]),
            }),
            leaf(1, 3),
            Node::Split(Split {
                attribute: 1,
                kind: SplitKind::Discrete {
                    branches: [(0, 2), (1, 3)].into_iter().collect(),
                },
                class_counts: counts(&[(0, 2), (1, 5)]),
            }),
        ];
        DecisionTree::from_parts(variables, nodes, 4, UnroutablePolicy::Majority)
    }

    #[test]
    fn routes_continuous_and_discrete_splits() {
        let tree = sample_tree();
        assert_eq!(tree.classify(&[25.0, 0.0]).unwrap(), 0);
        assert_eq!(tree.classify(&[40.0, 0.0]).unwrap(), 0);
        assert_eq!(tree.classify(&[40.5, 0.0]).unwrap(), 1);
        assert_eq!(tree.classify(&[25.0, 1.0]).unwrap(), 1);
    }

    #[test]
    fn unseen_branch_falls_back_to_split_majority() {
        let tree = sample_tree();
        assert_eq!(tree.classify(&[25.0, 2.0]).unwrap(), 1);
        assert!(tree.leaf(&[25.0, 2.0]).unwrap().is_none());
    }

    #[test]
    fn reject_policy_reports_unroutable_samples() {
        let tree = sample_tree().with_unroutable_policy(UnroutablePolicy::Reject);
        let err = tree.classify(&[25.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::UnroutableSample { attribute: 1, .. }
        ));
    }

    #[test]
    fn rejects_wrong_sample_length() {
        let tree = sample_tree();
        assert!(matches!(
            tree.classify(&[1.0]),
            Err(TreeError::SampleLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn majority_ties_go_to_smallest_class() {
        assert_eq!(majority_class(&counts(&[(2, 3), (1, 3), (4, 1)])), 1);
        assert_eq!(majority_class(&BTreeMap::new()), 0);
    }

    #[test]
    fn reports_shape_statistics() {
        let tree = sample_tree();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn validate_accepts_induced_layout_and_rejects_cycles() {
        let tree = sample_tree();
        assert!(tree.validate().is_ok());

        let mut broken = sample_tree();
        if let Node::Split(split) = &mut broken.nodes[2] {
            split.kind = SplitKind::Continuous {
                threshold: 40.0,
                left: 0,
                right: 3,
            };
        }
        assert!(broken.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_codes() {
        let mut tree = sample_tree();
        if let Node::Split(split) = &mut tree.nodes[4] {
            split.kind = SplitKind::Discrete {
                branches: [(0, 2), (7, 3)].into_iter().collect(),
            };
        }
        assert!(tree.validate().is_err());
    }

    #[test]
    fn renders_rules_in_branch_order() {
        let rendered = sample_tree().to_string();
        let expected = "\
workclass == 0
  age <= 40
    => 0 (2)
  age > 40
    => 1 (2)
workclass == 1
  => 1 (3)
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn survives_json_round_trip() {
        let tree = sample_tree();
        let json = serde_json::to_string(&tree).unwrap();
        let restored: DecisionTree = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tree);
        assert!(restored.validate().is_ok());
    }
}
