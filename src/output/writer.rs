//! Reading and writing whitespace-delimited solution files.
//!
//! One solution per line, values separated by a single space. The same
//! format is used for objective values, decision variables, and
//! reference fronts.

use crate::error::{LabError, Result};
use crate::experiment::Solution;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::artifact::ArtifactKind;

/// Serializes the result of one run into its two artifacts.
///
/// # Usage
///
/// ```ignore
/// ResultWriter::write(&algorithm.get_result(), &dir, run)?;
/// // dir/FUN.<run>.ps and dir/VAR.<run>.ps now exist
/// ```
pub struct ResultWriter;

impl ResultWriter {
    /// Writes `FUN.<run>.ps` and `VAR.<run>.ps` into `directory`.
    pub fn write(solutions: &[Solution], directory: &Path, run: usize) -> Result<()> {
        write_objectives(
            solutions,
            &directory.join(ArtifactKind::Objectives.file_name(run)),
        )?;
        write_variables(
            solutions,
            &directory.join(ArtifactKind::Variables.file_name(run)),
        )
    }
}

/// Writes the objective values of `solutions` to `path`, one row each.
pub fn write_objectives(solutions: &[Solution], path: &Path) -> Result<()> {
    write_rows(solutions.iter().map(|s| s.objectives.as_slice()), path)
}

/// Writes the decision variables of `solutions` to `path`, one row each.
pub fn write_variables(solutions: &[Solution], path: &Path) -> Result<()> {
    write_rows(solutions.iter().map(|s| s.variables.as_slice()), path)
}

fn write_rows<'a>(rows: impl Iterator<Item = &'a [f64]>, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| LabError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for row in rows {
        let line = row
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{line}").map_err(|e| LabError::io(path, e))?;
    }
    out.flush().map_err(|e| LabError::io(path, e))
}

/// Reads a front (objective rows) from `path`.
///
/// Blank lines are skipped. Tokens may be separated by any whitespace.
pub fn read_front(path: &Path) -> Result<Vec<Vec<f64>>> {
    let text = fs::read_to_string(path).map_err(|e| LabError::io(path, e))?;
    parse_front(&text, path)
}

pub(crate) fn parse_front(text: &str, path: &Path) -> Result<Vec<Vec<f64>>> {
    let mut front = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| LabError::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    message: format!("not a number: {tok:?}"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        front.push(row);
    }
    Ok(front)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn solutions() -> Vec<Solution> {
        vec![
            Solution::new(vec![0.5, 1.25], vec![0.1, 0.2, 0.3]),
            Solution::new(vec![1.0e-3, -2.0], vec![0.0, 1.0, 0.5]),
        ]
    }

    #[test]
    fn test_write_objectives_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FUN.0.ps");
        write_objectives(&solutions(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "0.5 1.25\n0.001 -2\n");
    }

    #[test]
    fn test_write_variables_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VAR.0.ps");
        write_variables(&solutions(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "0.1 0.2 0.3\n0 1 0.5\n");
    }

    #[test]
    fn test_result_writer_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        ResultWriter::write(&solutions(), dir.path(), 5).unwrap();
        assert!(dir.path().join("FUN.5.ps").is_file());
        assert!(dir.path().join("VAR.5.ps").is_file());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_read_front_accepts_tabs_and_blank_lines() {
        let front = parse_front("1.0\t2.0\n\n  3.0   4.0  \n", Path::new("x.pf")).unwrap();
        assert_eq!(front, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_read_front_reports_line() {
        let err = parse_front("1.0 2.0\n1.0 abc\n", Path::new("bad.pf")).unwrap_err();
        match err {
            LabError::Parse { line, path, .. } => {
                assert_eq!(line, 2);
                assert_eq!(path, Path::new("bad.pf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_front(&dir.path().join("missing.pf")).unwrap_err();
        assert!(matches!(err, LabError::Io { .. }));
    }

    proptest! {
        #[test]
        fn prop_objectives_survive_write_and_read(
            rows in prop::collection::vec(prop::collection::vec(-1.0e6f64..1.0e6, 1..5), 1..20)
        ) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("FUN.0.ps");
            let sols: Vec<Solution> = rows
                .iter()
                .map(|r| Solution::new(r.clone(), Vec::new()))
                .collect();
            write_objectives(&sols, &path).unwrap();
            let front = read_front(&path).unwrap();
            prop_assert_eq!(front.len(), rows.len());
            for (a, b) in front.iter().zip(rows.iter()) {
                prop_assert_eq!(a.len(), b.len());
                for (x, y) in a.iter().zip(b.iter()) {
                    prop_assert!((x - y).abs() <= 1e-12 * y.abs().max(1.0));
                }
            }
        }
    }
}
