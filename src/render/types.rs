//! Tabular sources for rendering.

use crate::significance::VerdictTable;
use crate::table::Table;

/// Anything that can be laid out as labelled rows and columns.
///
/// Implementations decide how cells are formatted; renderers only
/// arrange them and never reorder rows or columns.
pub trait Tabular {
    /// Column headers, left to right.
    fn column_labels(&self) -> Vec<String>;

    /// Rows as `(label, cells)`; `None` marks an absent cell.
    fn rows(&self) -> Vec<(String, Vec<Option<String>>)>;
}

impl Tabular for Table {
    fn column_labels(&self) -> Vec<String> {
        self.columns().to_vec()
    }

    /// Values in scientific notation. Per-problem tables label rows by
    /// problem only.
    fn rows(&self) -> Vec<(String, Vec<Option<String>>)> {
        let per_problem = self.is_per_problem();
        Table::rows(self)
            .map(|(problem, run, cells)| {
                let label = if per_problem {
                    problem.to_owned()
                } else {
                    format!("{problem}-{run}")
                };
                let cells = cells
                    .into_iter()
                    .map(|v| v.map(|v| format!("{v:.2e}")))
                    .collect();
                (label, cells)
            })
            .collect()
    }
}

impl Tabular for VerdictTable {
    fn column_labels(&self) -> Vec<String> {
        vec![self.column().to_owned()]
    }

    fn rows(&self) -> Vec<(String, Vec<Option<String>>)> {
        self.rows
            .iter()
            .map(|r| (r.problem.clone(), vec![Some(r.verdict.symbol().to_owned())]))
            .collect()
    }
}
