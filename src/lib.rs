//! C4.5 decision-tree training and evaluation over mixed categorical and
//! numeric tables, with the UCI Census Income layout as the default run.
/// Application directories for configuration and logs.
pub mod app_dirs;
/// TOML run configuration.
pub mod config;
/// Tables and the delimited text loader.
pub mod dataset;
/// Tracing subscriber setup with rolling log files.
pub mod logging;
/// Codification, induction, and evaluation.
pub mod ml;
/// End-to-end training run.
pub mod pipeline;
