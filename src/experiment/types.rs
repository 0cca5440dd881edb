//! Collaborator contracts for experiment jobs.
//!
//! The laboratory never implements an optimizer itself. Anything that can
//! [`run`](Algorithm::run) and then hand back a set of [`Solution`]s can
//! be scheduled as a job.

use crate::error::BoxError;

/// A solution as seen by the laboratory: objective values plus the
/// decision variables that produced them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Objective values (one per objective).
    pub objectives: Vec<f64>,
    /// Decision variables, written as numbers.
    pub variables: Vec<f64>,
}

impl Solution {
    /// Creates a solution from objectives and variables.
    pub fn new(objectives: Vec<f64>, variables: Vec<f64>) -> Self {
        Self {
            objectives,
            variables,
        }
    }
}

/// An optimization algorithm bound to a problem instance.
///
/// # Thread Safety
///
/// `Algorithm` must be `Send` because the experiment hands each job to a
/// worker thread.
///
/// # Implementing
///
/// ```ignore
/// struct RandomSearch { problem: Zdt1, evaluations: usize, front: Vec<Solution> }
///
/// impl Algorithm for RandomSearch {
///     fn run(&mut self) -> Result<(), BoxError> {
///         self.front = sample(&self.problem, self.evaluations);
///         Ok(())
///     }
///     fn get_result(&self) -> Vec<Solution> { self.front.clone() }
///     fn name(&self) -> String { "RandomSearch".into() }
///     fn problem_name(&self) -> String { "ZDT1".into() }
/// }
/// ```
pub trait Algorithm: Send {
    /// Runs the optimization to completion.
    ///
    /// May block for an arbitrary amount of time; no timeout is imposed.
    fn run(&mut self) -> Result<(), BoxError>;

    /// Returns the final result set of the last [`run`](Self::run).
    fn get_result(&self) -> Vec<Solution>;

    /// Display name of the algorithm.
    fn name(&self) -> String;

    /// Name of the problem being solved; used as the problem directory.
    fn problem_name(&self) -> String;
}
