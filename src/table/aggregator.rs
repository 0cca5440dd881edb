//! Indicator files to [`Table`].
//!
//! Every line of an indicator file is strictly parsed: a single
//! non-numeric line fails the whole aggregation, because a skipped line
//! would silently shift every later run onto the wrong row.

use super::config::{AggregatorConfig, DuplicatePolicy};
use super::types::Table;
use crate::error::{walk_error, LabError, Result};
use crate::output::owner_of;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Prefix of indicator file names.
pub const INDICATOR_PREFIX: &str = "QI.";

/// Builds comparison tables from the indicator files of a result tree.
///
/// # Usage
///
/// ```ignore
/// let aggregator = TableAggregator::new(AggregatorConfig::default().with_indicator("HV"));
/// let table = aggregator.build(Path::new("data"))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableAggregator {
    config: AggregatorConfig,
}

impl TableAggregator {
    /// Creates an aggregator.
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Walks `input_root` and collects every indicator value.
    ///
    /// Line `i` of `<algorithm>/<problem>/QI.<name>` becomes the cell
    /// `(problem, i, column)`. Cells receiving more than one value are
    /// averaged or rejected according to [`DuplicatePolicy`].
    ///
    /// A column never mixes indicators: when two indicators map to the
    /// same column (algorithm columns without an indicator filter) the
    /// build fails with [`LabError::MixedIndicators`].
    pub fn build(&self, input_root: &Path) -> Result<Table> {
        self.config.validate().map_err(LabError::InvalidConfig)?;

        // (problem, run, column) -> (sum, count), in first-seen column order.
        let mut cells: BTreeMap<(String, usize, String), (f64, usize)> = BTreeMap::new();
        let mut column_order: Vec<String> = Vec::new();
        let mut column_indicators: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut files = 0usize;

        for entry in WalkDir::new(input_root).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(input_root, e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            let Some(indicator) = file_name.strip_prefix(INDICATOR_PREFIX) else {
                continue;
            };
            if let Some(wanted) = &self.config.indicator {
                if indicator != wanted {
                    continue;
                }
            }

            let path = entry.path();
            let (algorithm, problem) = owner_of(path)?;
            let column = self.config.column_key.column(&algorithm, file_name);
            let seen = column_indicators.entry(column.clone()).or_default();
            seen.insert(indicator.to_owned());
            if seen.len() > 1 {
                return Err(LabError::MixedIndicators {
                    column,
                    indicators: seen.iter().cloned().collect(),
                });
            }
            if !column_order.contains(&column) {
                column_order.push(column.clone());
            }

            let values = parse_indicator_file(path)?;
            debug!(
                path = %path.display(),
                algorithm = %algorithm,
                problem = %problem,
                runs = values.len(),
                "indicator file read"
            );

            for (run, value) in values.into_iter().enumerate() {
                let cell = cells
                    .entry((problem.clone(), run, column.clone()))
                    .or_insert((0.0, 0));
                if cell.1 > 0 && self.config.duplicates == DuplicatePolicy::Error {
                    return Err(LabError::DuplicateCell {
                        problem,
                        run,
                        column,
                    });
                }
                cell.0 += value;
                cell.1 += 1;
            }
            files += 1;
        }

        // Stable sort by discovery position so the table registers columns
        // in walk order while rows keep their (problem, run) order.
        let mut table = Table::new();
        let mut ordered: Vec<_> = cells.into_iter().collect();
        ordered.sort_by_key(|((_, _, column), _)| {
            column_order
                .iter()
                .position(|c| c == column)
                .unwrap_or(usize::MAX)
        });
        for ((problem, run, column), (sum, count)) in ordered {
            table.insert(problem, run, column, sum / count as f64);
        }

        info!(
            root = %input_root.display(),
            files,
            rows = table.len(),
            columns = table.columns().len(),
            "indicator table built"
        );
        Ok(table)
    }
}

/// Reads one value per line; any unparsable line is an error.
fn parse_indicator_file(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path).map_err(|e| LabError::io(path, e))?;
    text.lines()
        .enumerate()
        .map(|(idx, line)| {
            line.trim().parse::<f64>().map_err(|_| LabError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("not a number: {line:?}"),
            })
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
