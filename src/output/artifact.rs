//! Artifact naming and the `<base>/<algorithm>/<problem>/` convention.

use crate::error::{LabError, Result};
use std::path::{Path, PathBuf};

/// Kind of per-run result artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArtifactKind {
    /// Objective values (`FUN`).
    Objectives,
    /// Decision variables (`VAR`).
    Variables,
}

impl ArtifactKind {
    /// File name marker.
    pub fn marker(self) -> &'static str {
        match self {
            ArtifactKind::Objectives => "FUN",
            ArtifactKind::Variables => "VAR",
        }
    }

    /// File name of this artifact for `run`, e.g. `FUN.3.ps`.
    pub fn file_name(self, run: usize) -> String {
        format!("{}.{}.ps", self.marker(), run)
    }

    /// Returns the kind whose marker is the first dot-separated token of
    /// `file_name`, if any.
    pub fn detect(file_name: &str) -> Option<Self> {
        match file_name.split('.').next() {
            Some("FUN") => Some(ArtifactKind::Objectives),
            Some("VAR") => Some(ArtifactKind::Variables),
            _ => None,
        }
    }
}

/// Identity of a result artifact: which algorithm produced it, on which
/// problem, and in which run.
///
/// The directory layout is derived from this key, not the other way round:
/// [`directory`](Self::directory) builds the path a job writes into, and
/// [`from_path`](Self::from_path) recovers the key when scanning.
///
/// ```
/// use std::path::Path;
/// use u_metalab::output::ArtifactKey;
///
/// let key = ArtifactKey::from_path(Path::new("data/NSGAII/ZDT1/FUN.7.ps")).unwrap();
/// assert_eq!(key.algorithm, "NSGAII");
/// assert_eq!(key.problem, "ZDT1");
/// assert_eq!(key.run, 7);
/// assert_eq!(key.directory(Path::new("data")), Path::new("data/NSGAII/ZDT1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtifactKey {
    /// Algorithm tag.
    pub algorithm: String,
    /// Problem tag.
    pub problem: String,
    /// Run identifier.
    pub run: usize,
}

impl ArtifactKey {
    /// Creates a key.
    pub fn new(algorithm: impl Into<String>, problem: impl Into<String>, run: usize) -> Self {
        Self {
            algorithm: algorithm.into(),
            problem: problem.into(),
            run,
        }
    }

    /// `<base>/<algorithm>/<problem>`.
    pub fn directory(&self, base: &Path) -> PathBuf {
        base.join(&self.algorithm).join(&self.problem)
    }

    /// Full path of the artifact of `kind` under `base`.
    pub fn artifact_path(&self, base: &Path, kind: ArtifactKind) -> PathBuf {
        self.directory(base).join(kind.file_name(self.run))
    }

    /// Recovers the key from an artifact path.
    ///
    /// The algorithm and problem are the two directories enclosing the
    /// file; the run is the last purely numeric dot-separated token of
    /// the file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let (algorithm, problem) = owner_of(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| LabError::InvalidLayout {
                path: path.to_path_buf(),
            })?;
        let run = run_token(file_name).ok_or_else(|| LabError::Parse {
            path: path.to_path_buf(),
            line: 0,
            message: format!("no run identifier in file name {file_name:?}"),
        })?;
        Ok(Self {
            algorithm,
            problem,
            run,
        })
    }
}

/// Returns `(algorithm, problem)` for a file laid out as
/// `<base>/<algorithm>/<problem>/<file>`.
pub fn owner_of(path: &Path) -> Result<(String, String)> {
    let invalid = || LabError::InvalidLayout {
        path: path.to_path_buf(),
    };
    let problem_dir = path.parent().ok_or_else(invalid)?;
    let algorithm_dir = problem_dir.parent().ok_or_else(invalid)?;
    let problem = segment(problem_dir).ok_or_else(invalid)?;
    let algorithm = segment(algorithm_dir).ok_or_else(invalid)?;
    Ok((algorithm, problem))
}

fn segment(dir: &Path) -> Option<String> {
    dir.file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Last dot-separated token made only of ASCII digits.
pub(crate) fn run_token(file_name: &str) -> Option<usize> {
    file_name
        .split('.')
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
        .last()
        .and_then(|t| t.parse().ok())
}
