//! Comparison tables built from indicator files.
//!
//! [`TableAggregator`] walks the result tree for `QI.<indicator>` files and
//! turns line `i` of each into the cell `(problem, run i, column)` of a
//! [`Table`]. Columns default to the algorithm tag, giving one column per
//! compared algorithm.

mod aggregator;
mod config;
mod types;

pub use aggregator::{TableAggregator, INDICATOR_PREFIX};
pub use config::{AggregatorConfig, ColumnKey, DuplicatePolicy};
pub use types::Table;
