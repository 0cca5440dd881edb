//! Publication-style table output.
//!
//! # Key Types
//!
//! - [`Tabular`]: Row/column view implemented by [`Table`](crate::table::Table)
//!   and [`VerdictTable`](crate::significance::VerdictTable)
//! - [`TableRenderer`]: LaTeX `table` environment writer
//!
//! Rendering is pure formatting: rows and columns come out in exactly
//! the order the source yields them.

mod latex;
mod types;

pub use latex::TableRenderer;
pub use types::Tabular;
