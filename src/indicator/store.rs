//! Positional indicator files.
//!
//! An indicator file `QI.<name>` holds one value per line, ordered by run.
//! A hidden sibling `.QI.<name>.runs` records the run of every line, so an
//! insert lands after all lines of lower or equal runs no matter in which
//! order runs arrive. Both files are replaced atomically through temporary
//! siblings. A per-file lock serializes read-modify-write cycles, so
//! several threads may share one store.
//!
//! A value file without a matching run index (missing, or with a different
//! line count) is read as runs `0..n`.

use super::config::GapPolicy;
use crate::error::{LabError, Result};
use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Run-indexed storage of indicator values on top of flat text files.
#[derive(Debug, Default)]
pub struct IndicatorStore {
    gap_policy: GapPolicy,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl IndicatorStore {
    /// Creates a store with the given gap policy.
    pub fn new(gap_policy: GapPolicy) -> Self {
        Self {
            gap_policy,
            locks: DashMap::new(),
        }
    }

    /// Inserts `value` for `run` into the file at `path`.
    ///
    /// The value goes after every line whose run is lower than or equal to
    /// `run`, so the file stays sorted by run and repeated runs keep their
    /// insertion order. Returns the line index written.
    pub fn insert(&self, path: &Path, run: usize, value: f64) -> Result<usize> {
        let lock = self.lock_for(path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = read_entries(path)?;
        if run > entries.len() {
            match self.gap_policy {
                GapPolicy::Append => debug!(
                    path = %path.display(),
                    run,
                    lines = entries.len(),
                    "indicator run past end of file"
                ),
                GapPolicy::Error => {
                    return Err(LabError::IndicatorGap {
                        path: path.to_path_buf(),
                        run,
                        lines: entries.len(),
                    })
                }
            }
        }

        let index = entries.partition_point(|(r, _)| *r <= run);
        entries.insert(index, (run, format!("{value:?}")));

        let runs: Vec<String> = entries.iter().map(|(r, _)| r.to_string()).collect();
        let lines: Vec<String> = entries.into_iter().map(|(_, line)| line).collect();
        replace_contents(&index_path(path)?, &runs)?;
        replace_contents(path, &lines)?;
        Ok(index)
    }

    /// Deletes the file at `path` and its run index if they exist.
    pub fn reset(&self, path: &Path) -> Result<()> {
        let lock = self.lock_for(path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        remove_if_present(path)?;
        remove_if_present(&index_path(path)?)
    }

    /// Reads every value of the file at `path`, line order preserved.
    pub fn values(&self, path: &Path) -> Result<Vec<f64>> {
        let lock = self.lock_for(path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        read_lines(path)?
            .iter()
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

    /// Run of every line of the file at `path`.
    pub fn runs(&self, path: &Path) -> Result<Vec<usize>> {
        let lock = self.lock_for(path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(read_entries(path)?.into_iter().map(|(run, _)| run).collect())
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        Arc::clone(
            self.locks
                .entry(path.to_path_buf())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }
}

/// `(run, line)` pairs of a value file.
fn read_entries(path: &Path) -> Result<Vec<(usize, String)>> {
    let lines = read_lines(path)?;
    let index = index_path(path)?;
    let recorded = read_lines(&index)?;

    let runs: Vec<usize> = if recorded.len() == lines.len() {
        recorded
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                line.trim().parse::<usize>().map_err(|_| LabError::Parse {
                    path: index.clone(),
                    line: idx + 1,
                    message: format!("not a run index: {line:?}"),
                })
            })
            .collect::<Result<_>>()?
    } else {
        if !recorded.is_empty() {
            warn!(
                path = %path.display(),
                lines = lines.len(),
                indexed = recorded.len(),
                "run index out of step with indicator file, assuming runs 0..n"
            );
        }
        (0..lines.len()).collect()
    };

    Ok(runs.into_iter().zip(lines).collect())
}

fn index_path(path: &Path) -> Result<PathBuf> {
    Ok(path.with_file_name(format!(".{}.runs", file_name(path)?)))
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LabError::InvalidLayout {
            path: path.to_path_buf(),
        })
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().map(str::to_owned).collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(LabError::io(path, e)),
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LabError::io(path, e)),
    }
}

fn replace_contents(path: &Path, lines: &[String]) -> Result<()> {
    let tmp = path.with_file_name(format!(".{}.tmp", file_name(path)?));

    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&tmp, text).map_err(|e| LabError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| LabError::io(path, e))
}
