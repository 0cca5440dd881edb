//! Statistical significance of indicator differences.
//!
//! [`SignificanceTester`] compares the columns of a [`Table`](crate::table::Table)
//! problem by problem and produces a [`VerdictTable`] of `*`
//! (significant) / `-` (not significant) markers.
//!
//! # Key Types
//!
//! - [`SignificanceConfig`]: Significance level and exact-test threshold
//! - [`SignificanceTester`]: Chooses and runs the test per problem
//! - [`VerdictTable`]: One verdict per problem
//!
//! # Building Blocks
//!
//! - [`wilcoxon_signed_rank`]: paired two-sample test
//! - [`kruskal_wallis`]: k-sample test
//! - [`average_ranks`]: ranking with ties
//!
//! Normal and chi-squared tail probabilities come from
//! [`u_numflow::special`].
//!
//! # References
//!
//! - Hollander, Wolfe & Chicken (2013), *Nonparametric Statistical Methods*

mod config;
mod kruskal;
mod rank;
mod tester;
mod wilcoxon;

pub use config::SignificanceConfig;
pub use kruskal::kruskal_wallis;
pub use rank::average_ranks;
pub use tester::{SignificanceTester, TestKind, Verdict, VerdictRow, VerdictTable};
pub use wilcoxon::wilcoxon_signed_rank;

/// Statistic and p-value of a single test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestOutcome {
    /// Test statistic.
    pub statistic: f64,
    /// Two-sided p-value in `[0, 1]`.
    pub p_value: f64,
}
