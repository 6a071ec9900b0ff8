//! Tabular partitions and the delimited text loader that produces them.

pub mod loader;
pub mod table;

pub use loader::{DelimitedOptions, LoadError, load_delimited, read_delimited};
pub use table::{Cell, Table, TableError};
