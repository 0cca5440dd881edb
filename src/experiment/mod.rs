//! Batch execution of algorithm runs.
//!
//! An [`Experiment`] owns a list of [`Job`]s, each binding one
//! [`Algorithm`] instance to a tag and a run index, and executes them on a
//! bounded worker pool. Every job leaves two artifacts behind:
//!
//! ```text
//! <base>/<tag>/<problem>/FUN.<run>.ps
//! <base>/<tag>/<problem>/VAR.<run>.ps
//! ```
//!
//! # Key Types
//!
//! - [`Algorithm`] / [`Solution`]: collaborator contract
//! - [`Job`]: one run, executable on its own
//! - [`ExperimentConfig`]: base directory and worker bound
//! - [`Experiment`]: runs all jobs, reports failures after all complete

mod config;
mod job;
mod runner;
mod types;

pub use config::ExperimentConfig;
pub use job::Job;
pub use runner::{Experiment, ExperimentSummary};
pub use types::{Algorithm, Solution};
