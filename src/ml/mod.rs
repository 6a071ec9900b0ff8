//! Codification, C4.5 induction, and evaluation.
//!
//! The flow is: [`codebook::Codebook`] over every partition, [`encoder::encode`]
//! per partition, [`c45::DecisionVariable::from_codebook`] for the schema,
//! [`c45::train_c45`] for the model, and [`evaluate`] for the scores.

pub mod bundle;
pub mod c45;
pub mod codebook;
pub mod encoder;
pub mod evaluate;
pub mod metrics;
