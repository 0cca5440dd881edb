//! In-memory comparison table.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use u_numflow::stats::median;

/// Indicator values keyed by `(problem, run)` rows and named columns.
///
/// Rows iterate in `(problem, run)` order; columns keep their insertion
/// order. Absent cells stay absent rather than being filled with NaN.
///
/// ```
/// use u_metalab::table::Table;
///
/// let mut table = Table::new();
/// table.insert("ZDT1", 0, "NSGAII", 0.61);
/// table.insert("ZDT1", 0, "SMPSO", 0.66);
/// table.insert("ZDT1", 1, "NSGAII", 0.62);
///
/// assert_eq!(table.columns(), ["NSGAII", "SMPSO"]);
/// assert_eq!(table.get("ZDT1", 1, "SMPSO"), None);
/// assert_eq!(table.column_values("ZDT1", "NSGAII"), vec![0.61, 0.62]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    columns: Vec<String>,
    rows: BTreeMap<(String, usize), HashMap<String, f64>>,
    per_problem: bool,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cell at `(problem, run, column)`, replacing any old value.
    pub fn insert(
        &mut self,
        problem: impl Into<String>,
        run: usize,
        column: impl Into<String>,
        value: f64,
    ) {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column.clone());
        }
        self.rows
            .entry((problem.into(), run))
            .or_default()
            .insert(column, value);
    }

    /// Cell value, if present.
    pub fn get(&self, problem: &str, run: usize, column: &str) -> Option<f64> {
        self.rows
            .get(&(problem.to_owned(), run))
            .and_then(|cells| cells.get(column))
            .copied()
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether rows represent whole problems rather than single runs.
    ///
    /// True for tables produced by [`median_by_problem`](Self::median_by_problem).
    pub fn is_per_problem(&self) -> bool {
        self.per_problem
    }

    /// Rows as `(problem, run, cells)`, cells aligned with [`columns`](Self::columns).
    pub fn rows(&self) -> impl Iterator<Item = (&str, usize, Vec<Option<f64>>)> + '_ {
        self.rows.iter().map(move |((problem, run), cells)| {
            let aligned = self
                .columns
                .iter()
                .map(|c| cells.get(c).copied())
                .collect();
            (problem.as_str(), *run, aligned)
        })
    }

    /// Distinct problems, sorted.
    pub fn problems(&self) -> Vec<&str> {
        self.rows
            .keys()
            .map(|(p, _)| p.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Runs present for `problem`, ascending.
    pub fn runs(&self, problem: &str) -> Vec<usize> {
        self.rows
            .keys()
            .filter(|(p, _)| p == problem)
            .map(|(_, r)| *r)
            .collect()
    }

    /// Values of `column` for `problem`, ordered by run, absent cells skipped.
    pub fn column_values(&self, problem: &str, column: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|((p, _), _)| p == problem)
            .filter_map(|(_, cells)| cells.get(column).copied())
            .collect()
    }

    /// One row per problem holding the median of each column.
    ///
    /// Rows of the result use run `0`. Columns whose values include NaN
    /// have no median and stay absent.
    pub fn median_by_problem(&self) -> Table {
        let mut out = Table {
            columns: self.columns.clone(),
            rows: BTreeMap::new(),
            per_problem: true,
        };
        for problem in self.problems() {
            for column in &self.columns {
                if let Some(m) = median(&self.column_values(problem, column)) {
                    out.insert(problem, 0, column.as_str(), m);
                }
            }
        }
        out
    }
}
