//! Experiment configuration.

use std::path::PathBuf;

/// Configuration for an [`Experiment`](super::Experiment).
///
/// # Defaults
///
/// ```
/// use u_metalab::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::new("data");
/// assert_eq!(config.m_workers, 3);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// Root of the `<base>/<algorithm>/<problem>/` tree.
    pub base_directory: PathBuf,

    /// Maximum number of jobs executing at the same time.
    pub m_workers: usize,
}

impl ExperimentConfig {
    /// Creates a configuration writing under `base_directory`.
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
            m_workers: 3,
        }
    }

    /// Sets the worker-pool bound.
    pub fn with_m_workers(mut self, n: usize) -> Self {
        self.m_workers = n;
        self
    }

    /// Uses one worker per available CPU.
    pub fn with_available_parallelism(mut self) -> Self {
        self.m_workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.m_workers == 0 {
            return Err("m_workers must be at least 1".into());
        }
        if self.base_directory.as_os_str().is_empty() {
            return Err("base_directory must not be empty".into());
        }
        Ok(())
    }
}
