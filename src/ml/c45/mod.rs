//! C4.5 decision tree over mixed discrete and continuous attributes.
//!
//! Induction is depth-first: each node picks the split with the highest
//! information-gain ratio, discrete attributes fan out one branch per code
//! and are not reused below their split, continuous attributes split in two
//! at a midpoint between observed values and may be reused. Nodes with fewer
//! than `2 * min_samples_per_leaf` samples, pure nodes, and nodes without an
//! informative split become majority-vote leaves.

mod entropy;
mod model;
mod train;
mod variable;

pub use entropy::{entropy, gain_ratio};
pub use model::{
    DecisionTree, Leaf, Node, Split, SplitKind, TreeError, UnroutablePolicy, majority_class,
};
pub use train::{TrainError, TrainOptions, train_c45};
pub use variable::{DecisionVariable, VariableKind};
