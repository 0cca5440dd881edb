//! Bounded-concurrency execution of experiment jobs.
//!
//! [`Experiment`] hands every [`Job`] to a dedicated rayon thread pool of
//! `m_workers` threads. Jobs are submitted unevaluated, so no work runs on
//! the caller's thread, and at most `m_workers` of them are in flight at
//! any moment. The pool is torn down before [`Experiment::run`] returns.

use super::config::ExperimentConfig;
use super::job::Job;
use crate::error::{JobFailure, LabError, Result};
use crate::output::ArtifactKey;
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Outcome of a fully successful experiment.
#[derive(Debug, Clone)]
pub struct ExperimentSummary {
    /// Keys of the completed jobs, in completion order.
    pub completed: Vec<ArtifactKey>,

    /// Wall-clock time of the whole batch.
    pub elapsed: Duration,
}

/// A batch of jobs executed with bounded concurrency.
///
/// # Usage
///
/// ```ignore
/// let config = ExperimentConfig::new("data").with_m_workers(4);
/// let jobs = (0..30).map(|run| Job::new(make_nsgaii(), "NSGAII", run)).collect();
/// let summary = Experiment::new(config, jobs).run()?;
/// println!("{} runs in {:?}", summary.completed.len(), summary.elapsed);
/// ```
#[derive(Debug)]
pub struct Experiment {
    config: ExperimentConfig,
    jobs: Vec<Job>,
}

impl Experiment {
    /// Creates an experiment over `jobs`.
    pub fn new(config: ExperimentConfig, jobs: Vec<Job>) -> Self {
        Self { config, jobs }
    }

    /// The configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// The jobs, in submission order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Executes every job, at most `m_workers` at a time.
    ///
    /// Each job writes into `<base>/<tag>/<problem>/`, which is created
    /// on demand. All jobs are awaited even when some fail; failures
    /// (errors and panics alike) are then reported together as
    /// [`LabError::JobsFailed`].
    pub fn run(&mut self) -> Result<ExperimentSummary> {
        self.config.validate().map_err(LabError::InvalidConfig)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.m_workers)
            .thread_name(|i| format!("lab-worker-{i}"))
            .build()?;

        info!(
            jobs = self.jobs.len(),
            workers = self.config.m_workers,
            base = %self.config.base_directory.display(),
            "starting experiment"
        );

        let start = Instant::now();
        let base = self.config.base_directory.as_path();
        let (tx, rx) = mpsc::channel();

        pool.scope(|s| {
            for job in self.jobs.iter_mut() {
                let tx = tx.clone();
                s.spawn(move |_| {
                    let key = job.key();
                    let outcome = execute_guarded(job, base);
                    // Receiver outlives the scope.
                    let _ = tx.send((key, outcome));
                });
            }
        });
        drop(tx);
        drop(pool);

        let mut completed = Vec::with_capacity(self.jobs.len());
        let mut failures = Vec::new();
        for (key, outcome) in rx {
            match outcome {
                Ok(()) => completed.push(key),
                Err(message) => {
                    error!(
                        algorithm = %key.algorithm,
                        problem = %key.problem,
                        run = key.run,
                        %message,
                        "job failed"
                    );
                    failures.push(JobFailure {
                        tag: key.algorithm,
                        problem: key.problem,
                        run: key.run,
                        message,
                    });
                }
            }
        }

        let elapsed = start.elapsed();
        info!(
            completed = completed.len(),
            failed = failures.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "experiment finished"
        );

        if failures.is_empty() {
            Ok(ExperimentSummary { completed, elapsed })
        } else {
            Err(LabError::JobsFailed(failures))
        }
    }
}

/// Runs one job, turning errors and panics into a message.
fn execute_guarded(job: &mut Job, base: &Path) -> std::result::Result<(), String> {
    let dir = job.output_directory(base);
    debug!(
        algorithm = job.tag(),
        problem = job.problem(),
        run = job.run(),
        "job started"
    );

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<()> {
        fs::create_dir_all(&dir).map_err(|e| LabError::io(&dir, e))?;
        job.execute(&dir)
    }));

    let result = match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(LabError::Algorithm { message, .. })) => Err(message),
        Ok(Err(other)) => Err(other.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    };

    debug!(
        algorithm = job.tag(),
        problem = job.problem(),
        run = job.run(),
        ok = result.is_ok(),
        "job finished"
    );
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::experiment::{Algorithm, Solution};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // ---- Sleeping algorithm that records concurrency ----

    struct Sleeper {
        millis: u64,
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        fail: bool,
        panic: bool,
    }

    impl Sleeper {
        fn new(millis: u64, active: &Arc<AtomicUsize>, peak: &Arc<AtomicUsize>) -> Self {
            Self {
                millis,
                active: Arc::clone(active),
                peak: Arc::clone(peak),
                fail: false,
                panic: false,
            }
        }
    }

    impl Algorithm for Sleeper {
        fn run(&mut self) -> std::result::Result<(), BoxError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(self.millis));
            self.active.fetch_sub(1, Ordering::SeqCst);
            if self.panic {
                panic!("objective evaluated to NaN");
            }
            if self.fail {
                return Err("budget exhausted".into());
            }
            Ok(())
        }

        fn get_result(&self) -> Vec<Solution> {
            vec![Solution::new(vec![self.millis as f64, 1.0], vec![0.5])]
        }

        fn name(&self) -> String {
            "Sleeper".into()
        }

        fn problem_name(&self) -> String {
            "ZDT1".into()
        }
    }

    fn counters() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)))
    }

    #[test]
    fn test_bounded_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let (active, peak) = counters();
        let jobs = [80u64, 10, 60, 20, 40]
            .iter()
            .enumerate()
            .map(|(run, &ms)| Job::new(Sleeper::new(ms, &active, &peak), "SLEEP", run))
            .collect();

        let config = ExperimentConfig::new(dir.path()).with_m_workers(2);
        let summary = Experiment::new(config, jobs).run().unwrap();

        assert_eq!(summary.completed.len(), 5);
        assert!(peak.load(Ordering::SeqCst) <= 2, "more than 2 jobs ran at once");
        assert_eq!(active.load(Ordering::SeqCst), 0);
        for run in 0..5 {
            assert!(dir.path().join(format!("SLEEP/ZDT1/FUN.{run}.ps")).is_file());
            assert!(dir.path().join(format!("SLEEP/ZDT1/VAR.{run}.ps")).is_file());
        }
    }

    #[test]
    fn test_jobs_run_in_parallel() {
        let dir = tempfile::tempdir().unwrap();
        let (active, peak) = counters();
        let jobs = (0..4)
            .map(|run| Job::new(Sleeper::new(100, &active, &peak), "SLEEP", run))
            .collect();

        let config = ExperimentConfig::new(dir.path()).with_m_workers(4);
        Experiment::new(config, jobs).run().unwrap();

        assert!(peak.load(Ordering::SeqCst) > 1, "jobs were serialized");
    }

    #[test]
    fn test_failures_surface_after_all_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let (active, peak) = counters();
        let mut failing = Sleeper::new(5, &active, &peak);
        failing.fail = true;
        let mut panicking = Sleeper::new(5, &active, &peak);
        panicking.panic = true;

        let jobs = vec![
            Job::new(Sleeper::new(5, &active, &peak), "OK", 0),
            Job::new(failing, "BAD", 1),
            Job::new(panicking, "BOOM", 2),
            Job::new(Sleeper::new(5, &active, &peak), "OK", 3),
        ];

        let config = ExperimentConfig::new(dir.path()).with_m_workers(2);
        let err = Experiment::new(config, jobs).run().unwrap_err();

        match err {
            LabError::JobsFailed(mut failures) => {
                failures.sort_by_key(|f| f.run);
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].tag, "BAD");
                assert_eq!(failures[0].message, "budget exhausted");
                assert_eq!(failures[1].tag, "BOOM");
                assert!(failures[1].message.contains("objective evaluated to NaN"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // The healthy jobs still completed.
        assert!(dir.path().join("OK/ZDT1/FUN.0.ps").is_file());
        assert!(dir.path().join("OK/ZDT1/FUN.3.ps").is_file());
        assert!(!dir.path().join("BAD/ZDT1/FUN.1.ps").exists());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExperimentConfig::new("unused").with_m_workers(0);
        let err = Experiment::new(config, Vec::new()).run().unwrap_err();
        assert!(matches!(err, LabError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_experiment() {
        let dir = tempfile::tempdir().unwrap();
        let summary = Experiment::new(ExperimentConfig::new(dir.path()), Vec::new())
            .run()
            .unwrap();
        assert!(summary.completed.is_empty());
    }
}
