//! A single algorithm run.

use super::types::Algorithm;
use crate::error::{LabError, Result};
use crate::output::{ArtifactKey, ResultWriter};
use std::fmt;
use std::path::{Path, PathBuf};

/// One unit of work: an algorithm instance, its tag, and a run index.
///
/// Executing a job runs the algorithm and writes `FUN.<run>.ps` and
/// `VAR.<run>.ps` into the output directory.
pub struct Job {
    algorithm: Box<dyn Algorithm>,
    tag: String,
    problem: String,
    run: usize,
}

impl Job {
    /// Binds `algorithm` to an algorithm tag and a run index.
    ///
    /// The problem tag defaults to [`Algorithm::problem_name`].
    pub fn new(algorithm: impl Algorithm + 'static, tag: impl Into<String>, run: usize) -> Self {
        let problem = algorithm.problem_name();
        Self {
            algorithm: Box::new(algorithm),
            tag: tag.into(),
            problem,
            run,
        }
    }

    /// Overrides the problem tag used for the output directory.
    pub fn with_problem(mut self, problem: impl Into<String>) -> Self {
        self.problem = problem.into();
        self
    }

    /// Algorithm tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Problem tag.
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Run identifier.
    pub fn run(&self) -> usize {
        self.run
    }

    /// Identity of the artifacts this job produces.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(&self.tag, &self.problem, self.run)
    }

    /// `<base>/<tag>/<problem>`.
    pub fn output_directory(&self, base: &Path) -> PathBuf {
        self.key().directory(base)
    }

    /// Runs the algorithm and writes both artifacts into `output_directory`.
    ///
    /// An algorithm failure is returned as [`LabError::Algorithm`] and no
    /// artifact is written.
    pub fn execute(&mut self, output_directory: &Path) -> Result<()> {
        self.algorithm.run().map_err(|e| LabError::Algorithm {
            tag: self.tag.clone(),
            problem: self.problem.clone(),
            run: self.run,
            message: e.to_string(),
        })?;

        let result = self.algorithm.get_result();
        ResultWriter::write(&result, output_directory, self.run)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("algorithm", &self.algorithm.name())
            .field("tag", &self.tag)
            .field("problem", &self.problem)
            .field("run", &self.run)
            .finish()
    }
}
