//! Experiment laboratory for multi-objective optimization algorithms.
//!
//! Runs many (algorithm, problem, run) jobs, stores their Pareto fronts
//! on disk, scores them with quality indicators, and turns the scores
//! into comparison tables with significance tests:
//!
//! - **Experiment**: Runs [`experiment::Job`]s on a bounded worker pool and
//!   writes each result under `<base>/<algorithm>/<problem>/`.
//! - **Output**: `FUN.<run>.ps` / `VAR.<run>.ps` artifact naming, writing,
//!   and parsing.
//! - **Indicator**: Scans artifacts, computes quality indicators, and
//!   stores each value at the line of its run in a `QI.<name>` file.
//! - **Table**: Aggregates indicator files into an in-memory table keyed
//!   by problem and run, with per-problem medians.
//! - **Significance**: Wilcoxon signed-rank (two columns) or
//!   Kruskal–Wallis (three or more) verdicts per problem.
//! - **Render**: LaTeX output for value and verdict tables.
//!
//! # Pipeline
//!
//! ```text
//! Experiment ─▶ FUN/VAR files ─▶ IndicatorScanner ─▶ QI files
//!     ─▶ TableAggregator ─▶ Table ─▶ SignificanceTester ─▶ VerdictTable
//!     ─▶ TableRenderer
//! ```
//!
//! Every stage reads only what the previous stage left on disk or in
//! memory, so stages can be rerun independently. Scanning must not start
//! until [`experiment::Experiment::run`] has returned.

pub mod error;
pub mod experiment;
pub mod indicator;
pub mod output;
pub mod render;
pub mod significance;
pub mod table;

pub use error::{BoxError, JobFailure, LabError, Result};
