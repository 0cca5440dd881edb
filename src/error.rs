//! Error types for the laboratory.
//!
//! Every variant names the file, job, or problem that caused it, so a
//! failed batch can be traced back without re-running it.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error returned by collaborator code (algorithms) across the job boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias.
pub type Result<T> = std::result::Result<T, LabError>;

/// A job that did not complete.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFailure {
    /// Algorithm tag of the job.
    pub tag: String,
    /// Problem the algorithm was solving.
    pub problem: String,
    /// Run identifier.
    pub run: usize,
    /// Error or panic message.
    pub message: String,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} run {}: {}",
            self.tag, self.problem, self.run, self.message
        )
    }
}

/// Laboratory error types.
#[derive(Error, Debug)]
pub enum LabError {
    /// Filesystem error on a specific path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed artifact, front, or indicator file.
    #[error("parse error in {} line {line}: {message}", .path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// 1-based line number; 0 when the file name is at fault.
        line: usize,
        /// What could not be parsed.
        message: String,
    },

    /// An algorithm failed while running a job.
    #[error("job {tag}/{problem} run {run} failed: {message}")]
    Algorithm {
        /// Algorithm tag of the job.
        tag: String,
        /// Problem the algorithm was solving.
        problem: String,
        /// Run identifier.
        run: usize,
        /// Error or panic message.
        message: String,
    },

    /// One or more jobs of an experiment failed.
    #[error("{} job(s) failed: {}", .0.len(), join_failures(.0))]
    JobsFailed(Vec<JobFailure>),

    /// Significance testing needs at least two compared groups.
    #[error("insufficient groups: significance testing needs at least 2 columns, found {found}")]
    InsufficientGroups {
        /// Number of columns in the table.
        found: usize,
    },

    /// A paired test found a run present in only one of the two columns.
    #[error("unpaired samples for problem {problem}: run {run} missing in column {column}")]
    UnpairedSamples {
        /// Problem group.
        problem: String,
        /// Run without a partner value.
        run: usize,
        /// Column lacking the value.
        column: String,
    },

    /// Paired samples of different length.
    #[error("paired samples differ in length: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first sample.
        left: usize,
        /// Length of the second sample.
        right: usize,
    },

    /// Two values landed in the same cell under `DuplicatePolicy::Error`.
    #[error("duplicate cell for problem {problem} run {run} column {column}")]
    DuplicateCell {
        /// Problem of the row.
        problem: String,
        /// Run of the row.
        run: usize,
        /// Column receiving two values.
        column: String,
    },

    /// One column received values of several indicators.
    #[error(
        "column {column} mixes indicators {}; set an indicator filter or a file-name column key",
        .indicators.join(", ")
    )]
    MixedIndicators {
        /// Column receiving the values.
        column: String,
        /// Indicator names seen for the column, sorted.
        indicators: Vec<String>,
    },

    /// A positional insert targeted a line past the end of an indicator file.
    #[error("run {run} is beyond the {lines} line(s) of {}", .path.display())]
    IndicatorGap {
        /// Indicator file.
        path: PathBuf,
        /// Target run (line index).
        run: usize,
        /// Current number of lines.
        lines: usize,
    },

    /// A path does not follow `<base>/<algorithm>/<problem>/<file>`.
    #[error("path {} does not follow <base>/<algorithm>/<problem>/<file>", .path.display())]
    InvalidLayout {
        /// Offending path.
        path: PathBuf,
    },

    /// Configuration rejected by `validate()`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Worker pool could not be created.
    #[error("worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl LabError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Converts a directory-walk error into [`LabError::Io`].
pub(crate) fn walk_error(root: &Path, err: walkdir::Error) -> LabError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
    LabError::io(path, source)
}

fn join_failures(failures: &[JobFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
