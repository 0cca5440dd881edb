//! Per-problem significance verdicts.
//!
//! The test is chosen by the number of compared columns, assuming
//! non-normal samples (median comparison, non-parametric tests):
//!
//! - 2 columns: Wilcoxon signed-rank, paired by run
//! - 3+ columns: Kruskal–Wallis
//!
//! # References
//!
//! - Luque & Alba (2011), *Parallel Genetic Algorithms*, Springer,
//!   ISBN 978-3-642-22084-5

use super::config::SignificanceConfig;
use super::kruskal::kruskal_wallis;
use super::wilcoxon::wilcoxon_signed_rank;
use crate::error::{LabError, Result};
use crate::table::Table;
use std::fmt;
use tracing::{debug, info};

/// Which test produced a verdict table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestKind {
    /// Wilcoxon signed-rank test (two paired groups).
    Wilcoxon,
    /// Kruskal–Wallis H test (three or more groups).
    KruskalWallis,
}

impl TestKind {
    /// Column name used in verdict tables.
    pub fn name(self) -> &'static str {
        match self {
            TestKind::Wilcoxon => "Wilcoxon",
            TestKind::KruskalWallis => "Kruskal-Wallis",
        }
    }
}

/// Categorical outcome of a test for one problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    /// p-value below alpha.
    Significant,
    /// p-value at or above alpha.
    NotSignificant,
}

impl Verdict {
    /// `*` or `-`.
    pub fn symbol(self) -> &'static str {
        match self {
            Verdict::Significant => "*",
            Verdict::NotSignificant => "-",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Verdict for one problem.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerdictRow {
    /// Problem name.
    pub problem: String,
    /// Categorical outcome.
    pub verdict: Verdict,
    /// Test statistic (`T` or `H`).
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// One row per problem, one column named after the test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerdictTable {
    /// Test that produced the verdicts.
    pub test: TestKind,
    /// Rows in problem order.
    pub rows: Vec<VerdictRow>,
}

impl VerdictTable {
    /// Name of the single verdict column.
    pub fn column(&self) -> &'static str {
        self.test.name()
    }

    /// Verdict for `problem`, if tested.
    pub fn get(&self, problem: &str) -> Option<Verdict> {
        self.rows
            .iter()
            .find(|r| r.problem == problem)
            .map(|r| r.verdict)
    }
}

/// Runs the appropriate test per problem over a [`Table`].
///
/// Pure computation: no I/O beyond logging.
///
/// # Usage
///
/// ```ignore
/// let table = TableAggregator::new(AggregatorConfig::default().with_indicator("HV")).build(root)?;
/// let verdicts = SignificanceTester::default().analyze(&table)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignificanceTester {
    config: SignificanceConfig,
}

impl SignificanceTester {
    /// Creates a tester.
    pub fn new(config: SignificanceConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &SignificanceConfig {
        &self.config
    }

    /// Tests every problem of `table`, treating each column as a group.
    pub fn analyze(&self, table: &Table) -> Result<VerdictTable> {
        self.config.validate().map_err(LabError::InvalidConfig)?;

        let columns = table.columns();
        if columns.len() < 2 {
            return Err(LabError::InsufficientGroups {
                found: columns.len(),
            });
        }

        let test = if columns.len() == 2 {
            TestKind::Wilcoxon
        } else {
            TestKind::KruskalWallis
        };
        info!(test = test.name(), groups = columns.len(), "running non-parametric test");

        let mut rows = Vec::new();
        for problem in table.problems() {
            let outcome = match test {
                TestKind::Wilcoxon => {
                    let (x, y) = paired(table, problem, &columns[0], &columns[1])?;
                    wilcoxon_signed_rank(&x, &y, self.config.exact_threshold)?
                }
                TestKind::KruskalWallis => {
                    let groups: Vec<Vec<f64>> = columns
                        .iter()
                        .map(|c| table.column_values(problem, c))
                        .collect();
                    let present = groups.iter().filter(|g| !g.is_empty()).count();
                    if present < 2 {
                        return Err(LabError::InsufficientGroups { found: present });
                    }
                    kruskal_wallis(&groups)
                }
            };

            let verdict = if outcome.p_value < self.config.alpha {
                Verdict::Significant
            } else {
                Verdict::NotSignificant
            };
            debug!(
                problem,
                statistic = outcome.statistic,
                p_value = outcome.p_value,
                verdict = verdict.symbol(),
                "problem tested"
            );
            rows.push(VerdictRow {
                problem: problem.to_owned(),
                verdict,
                statistic: outcome.statistic,
                p_value: outcome.p_value,
            });
        }

        Ok(VerdictTable { test, rows })
    }
}

/// Values of two columns for `problem`, paired by run.
fn paired(table: &Table, problem: &str, a: &str, b: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let runs = table.runs(problem);
    let mut x = Vec::with_capacity(runs.len());
    let mut y = Vec::with_capacity(runs.len());
    for run in runs {
        let missing = |column: &str| LabError::UnpairedSamples {
            problem: problem.to_owned(),
            run,
            column: column.to_owned(),
        };
        x.push(table.get(problem, run, a).ok_or_else(|| missing(a))?);
        y.push(table.get(problem, run, b).ok_or_else(|| missing(b))?);
    }
    Ok((x, y))
}

// ============================================================================
// Tests
// ============================================================================
