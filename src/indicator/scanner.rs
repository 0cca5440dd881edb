//! Quality indicator computation over a result tree.
//!
//! [`IndicatorScanner`] walks `<base>/<algorithm>/<problem>/`, reads every
//! objective file (`FUN.<run>.*`), and writes one value per indicator into
//! `QI.<indicator>` beside it, on the line matching the run.

use super::config::{MalformedPolicy, ScanConfig};
use super::store::IndicatorStore;
use super::types::QualityIndicator;
use crate::error::{walk_error, LabError, Result};
use crate::output::{read_front, ArtifactKey, ArtifactKind};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// An objective file that could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFailure {
    /// The offending file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub message: String,
}

/// Outcome of a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Number of objective files read successfully.
    pub fronts: usize,

    /// Number of indicator values written.
    pub values_written: usize,

    /// Files skipped under [`MalformedPolicy::Skip`].
    pub failures: Vec<ScanFailure>,
}

/// Computes quality indicators for every run found under a directory.
///
/// Runs are processed in ascending `(directory, run)` order, so a scan
/// into empty indicator files writes run `i` on line `i`.
///
/// # Re-scanning
///
/// Indicator files are insert-only. Scanning the same tree twice inserts
/// every value again, so each run appears twice, unless
/// [`ScanConfig::reset_existing`] is set.
///
/// # Usage
///
/// ```ignore
/// let mut indicators: Vec<Box<dyn QualityIndicator>> = vec![Box::new(Hv::new()), Box::new(Igd::default())];
/// let scanner = IndicatorScanner::new(ScanConfig::default());
/// let report = scanner.compute(Path::new("data"), &mut indicators, Some(Path::new("fronts")))?;
/// ```
#[derive(Debug)]
pub struct IndicatorScanner {
    config: ScanConfig,
    store: IndicatorStore,
}

impl IndicatorScanner {
    /// Creates a scanner.
    pub fn new(config: ScanConfig) -> Self {
        let store = IndicatorStore::new(config.gap_policy);
        Self { config, store }
    }

    /// The configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The underlying indicator file store.
    pub fn store(&self) -> &IndicatorStore {
        &self.store
    }

    /// Scans `input_root` and writes every indicator value.
    ///
    /// Reference fronts are looked up as
    /// `<reference_front_root>/<problem>.<ext>` for indicators that need
    /// one. A missing front is logged and the indicator computes without
    /// it; a present but unreadable front is an error.
    pub fn compute(
        &self,
        input_root: &Path,
        indicators: &mut [Box<dyn QualityIndicator>],
        reference_front_root: Option<&Path>,
    ) -> Result<ScanReport> {
        self.config.validate().map_err(LabError::InvalidConfig)?;

        let mut report = ScanReport::default();
        let runs = self.discover(input_root, &mut report)?;

        let mut fronts: HashMap<String, Option<Vec<Vec<f64>>>> = HashMap::new();
        let mut bound: Vec<Option<String>> = vec![None; indicators.len()];
        let mut reset_done: HashSet<PathBuf> = HashSet::new();

        for (path, key) in runs {
            let front = match read_front(&path) {
                Ok(front) => front,
                Err(e) => {
                    self.reject(&path, e, &mut report)?;
                    continue;
                }
            };
            report.fronts += 1;
            let dir = path.parent().unwrap_or(input_root);

            for (slot, indicator) in indicators.iter_mut().enumerate() {
                if indicator.requires_reference_front()
                    && bound[slot].as_deref() != Some(key.problem.as_str())
                {
                    let reference = match fronts.get(&key.problem) {
                        Some(cached) => cached.clone(),
                        None => {
                            let loaded = self.load_reference(&key.problem, reference_front_root)?;
                            fronts.insert(key.problem.clone(), loaded.clone());
                            loaded
                        }
                    };
                    indicator.set_reference_front(reference);
                    bound[slot] = Some(key.problem.clone());
                }

                let value = indicator.compute(&front);
                let qi_path = dir.join(format!("QI.{}", indicator.name()));

                if self.config.reset_existing && reset_done.insert(qi_path.clone()) {
                    self.store.reset(&qi_path)?;
                }

                let line = self.store.insert(&qi_path, key.run, value)?;
                debug!(
                    algorithm = %key.algorithm,
                    problem = %key.problem,
                    run = key.run,
                    line,
                    indicator = %indicator.name(),
                    value,
                    "indicator value written"
                );
                report.values_written += 1;
            }
        }

        info!(
            root = %input_root.display(),
            fronts = report.fronts,
            values = report.values_written,
            skipped = report.failures.len(),
            "indicator scan finished"
        );
        Ok(report)
    }

    /// Finds every objective file and sorts it by `(directory, run)`.
    fn discover(
        &self,
        input_root: &Path,
        report: &mut ScanReport,
    ) -> Result<Vec<(PathBuf, ArtifactKey)>> {
        let mut runs = Vec::new();
        for entry in WalkDir::new(input_root).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(input_root, e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_objective = entry
                .file_name()
                .to_str()
                .is_some_and(|n| ArtifactKind::detect(n) == Some(ArtifactKind::Objectives));
            if !is_objective {
                continue;
            }
            match ArtifactKey::from_path(entry.path()) {
                Ok(key) => runs.push((entry.into_path(), key)),
                Err(e) => self.reject(entry.path(), e, report)?,
            }
        }
        runs.sort_by(|(pa, ka), (pb, kb)| pa.parent().cmp(&pb.parent()).then(ka.run.cmp(&kb.run)));
        Ok(runs)
    }

    fn load_reference(
        &self,
        problem: &str,
        reference_front_root: Option<&Path>,
    ) -> Result<Option<Vec<Vec<f64>>>> {
        let Some(root) = reference_front_root else {
            warn!(problem, "no reference front directory configured");
            return Ok(None);
        };
        let path = root.join(format!(
            "{problem}.{}",
            self.config.reference_front_extension
        ));
        if path.is_file() {
            read_front(&path).map(Some)
        } else {
            warn!(problem, path = %path.display(), "reference front not found");
            Ok(None)
        }
    }

    /// Applies the malformed-file policy to `err`.
    fn reject(&self, path: &Path, err: LabError, report: &mut ScanReport) -> Result<()> {
        match self.config.malformed {
            MalformedPolicy::Abort => Err(err),
            MalformedPolicy::Skip => {
                error!(path = %path.display(), error = %err, "skipping objective file");
                report.failures.push(ScanFailure {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::GapPolicy;
    use std::fs;
    use std::sync::{Arc, Mutex};

    // ---- Test indicators ----

    /// Sum of the first objective over the front.
    struct FirstSum;

    impl QualityIndicator for FirstSum {
        fn name(&self) -> String {
            "SUM".into()
        }
        fn compute(&self, front: &[Vec<f64>]) -> f64 {
            front.iter().map(|row| row[0]).sum()
        }
    }

    /// Number of reference points, or -1 without a reference front.
    struct RefCount {
        reference: Option<Vec<Vec<f64>>>,
        bindings: Arc<Mutex<Vec<Option<usize>>>>,
    }

    impl QualityIndicator for RefCount {
        fn name(&self) -> String {
            "REF".into()
        }
        fn compute(&self, _front: &[Vec<f64>]) -> f64 {
            self.reference.as_ref().map_or(-1.0, |r| r.len() as f64)
        }
        fn requires_reference_front(&self) -> bool {
            true
        }
        fn set_reference_front(&mut self, front: Option<Vec<Vec<f64>>>) {
            self.bindings.lock().unwrap().push(front.as_ref().map(Vec::len));
            self.reference = front;
        }
    }

    /// Front size, under a name that starts with an artifact marker.
    struct FuncCount;

    impl QualityIndicator for FuncCount {
        fn name(&self) -> String {
            "FUNC".into()
        }
        fn compute(&self, front: &[Vec<f64>]) -> f64 {
            front.len() as f64
        }
    }

    fn write_fun(root: &Path, alg: &str, problem: &str, run: usize, rows: &str) {
        let dir = root.join(alg).join(problem);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("FUN.{run}.ps")), rows).unwrap();
    }

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn sum_only() -> Vec<Box<dyn QualityIndicator>> {
        vec![Box::new(FirstSum)]
    }

    #[test]
    fn test_values_land_on_run_lines() {
        let dir = tempfile::tempdir().unwrap();
        // Written in shuffled order; run 10 sorts after run 2 numerically.
        write_fun(dir.path(), "A", "P1", 10, "10 0\n");
        write_fun(dir.path(), "A", "P1", 2, "2 0\n");
        for run in [0, 1, 3, 4, 5, 6, 7, 8, 9] {
            write_fun(dir.path(), "A", "P1", run, &format!("{run} 0\n"));
        }

        let scanner = IndicatorScanner::new(ScanConfig::default());
        let report = scanner.compute(dir.path(), &mut sum_only(), None).unwrap();

        assert_eq!(report.fronts, 11);
        assert_eq!(report.values_written, 11);
        let qi = lines(&dir.path().join("A/P1/QI.SUM"));
        let expected: Vec<String> = (0..=10).map(|r| format!("{:?}", r as f64)).collect();
        assert_eq!(qi, expected);
    }

    #[test]
    fn test_indicator_files_per_problem_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_fun(dir.path(), "A", "P1", 0, "1 0\n2 0\n");
        write_fun(dir.path(), "B", "P1", 0, "5 0\n");
        write_fun(dir.path(), "A", "P2", 0, "7 0\n");

        let scanner = IndicatorScanner::new(ScanConfig::default());
        scanner.compute(dir.path(), &mut sum_only(), None).unwrap();

        assert_eq!(lines(&dir.path().join("A/P1/QI.SUM")), vec!["3.0"]);
        assert_eq!(lines(&dir.path().join("B/P1/QI.SUM")), vec!["5.0"]);
        assert_eq!(lines(&dir.path().join("A/P2/QI.SUM")), vec!["7.0"]);
    }

    #[test]
    fn test_rescan_doubles_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_fun(dir.path(), "A", "P1", 0, "1 0\n");
        write_fun(dir.path(), "A", "P1", 1, "2 0\n");

        let scanner = IndicatorScanner::new(ScanConfig::default());
        scanner.compute(dir.path(), &mut sum_only(), None).unwrap();
        scanner.compute(dir.path(), &mut sum_only(), None).unwrap();

        // Each repeated run lands after its earlier value.
        assert_eq!(
            lines(&dir.path().join("A/P1/QI.SUM")),
            vec!["1.0", "1.0", "2.0", "2.0"]
        );
        assert_eq!(
            scanner.store().runs(&dir.path().join("A/P1/QI.SUM")).unwrap(),
            vec![0, 0, 1, 1]
        );
    }

    #[test]
    fn test_indicator_files_never_scanned_as_fronts() {
        let dir = tempfile::tempdir().unwrap();
        write_fun(dir.path(), "A", "P1", 0, "1 0\n2 0\n");

        let scanner = IndicatorScanner::new(ScanConfig::default());
        let mut indicators: Vec<Box<dyn QualityIndicator>> = vec![Box::new(FuncCount)];
        scanner.compute(dir.path(), &mut indicators, None).unwrap();
        let report = scanner.compute(dir.path(), &mut indicators, None).unwrap();

        assert_eq!(report.fronts, 1);
        assert!(report.failures.is_empty());
        assert_eq!(lines(&dir.path().join("A/P1/QI.FUNC")), vec!["2.0", "2.0"]);
    }

    #[test]
    fn test_rescan_with_reset_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_fun(dir.path(), "A", "P1", 0, "1 0\n");
        write_fun(dir.path(), "A", "P1", 1, "2 0\n");

        let scanner = IndicatorScanner::new(ScanConfig::default().with_reset_existing(true));
        scanner.compute(dir.path(), &mut sum_only(), None).unwrap();
        scanner.compute(dir.path(), &mut sum_only(), None).unwrap();

        assert_eq!(lines(&dir.path().join("A/P1/QI.SUM")), vec!["1.0", "2.0"]);
    }

    #[test]
    fn test_reference_front_bound_per_problem() {
        let dir = tempfile::tempdir().unwrap();
        let fronts = tempfile::tempdir().unwrap();
        fs::write(fronts.path().join("P1.pf"), "0 1\n0.5 0.5\n1 0\n").unwrap();
        write_fun(dir.path(), "A", "P1", 0, "1 0\n");
        write_fun(dir.path(), "A", "P1", 1, "1 0\n");
        write_fun(dir.path(), "A", "P2", 0, "1 0\n");

        let bindings = Arc::new(Mutex::new(Vec::new()));
        let mut indicators: Vec<Box<dyn QualityIndicator>> = vec![Box::new(RefCount {
            reference: None,
            bindings: Arc::clone(&bindings),
        })];

        let scanner = IndicatorScanner::new(ScanConfig::default());
        scanner
            .compute(dir.path(), &mut indicators, Some(fronts.path()))
            .unwrap();

        assert_eq!(lines(&dir.path().join("A/P1/QI.REF")), vec!["3.0", "3.0"]);
        // P2 has no front: computed in degraded mode, P1's front not reused.
        assert_eq!(lines(&dir.path().join("A/P2/QI.REF")), vec!["-1.0"]);
        assert_eq!(*bindings.lock().unwrap(), vec![Some(3), None]);
    }

    #[test]
    fn test_malformed_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_fun(dir.path(), "A", "P1", 0, "1 0\n");
        write_fun(dir.path(), "A", "P1", 1, "1 zero\n");
        write_fun(dir.path(), "B", "P1", 0, "4 0\n");

        let scanner = IndicatorScanner::new(ScanConfig::default());
        let report = scanner.compute(dir.path(), &mut sum_only(), None).unwrap();

        assert_eq!(report.fronts, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("A/P1/FUN.1.ps"));
        assert_eq!(lines(&dir.path().join("A/P1/QI.SUM")), vec!["1.0"]);
        assert_eq!(lines(&dir.path().join("B/P1/QI.SUM")), vec!["4.0"]);
    }

    #[test]
    fn test_malformed_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write_fun(dir.path(), "A", "P1", 0, "oops\n");

        let scanner =
            IndicatorScanner::new(ScanConfig::default().with_malformed(MalformedPolicy::Abort));
        let err = scanner.compute(dir.path(), &mut sum_only(), None).unwrap_err();
        match err {
            LabError::Parse { path, line, .. } => {
                assert!(path.ends_with("A/P1/FUN.0.ps"));
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sparse_runs_with_gap_error() {
        let dir = tempfile::tempdir().unwrap();
        write_fun(dir.path(), "A", "P1", 0, "1 0\n");
        write_fun(dir.path(), "A", "P1", 4, "1 0\n");

        let scanner =
            IndicatorScanner::new(ScanConfig::default().with_gap_policy(GapPolicy::Error));
        let err = scanner.compute(dir.path(), &mut sum_only(), None).unwrap_err();
        assert!(matches!(err, LabError::IndicatorGap { run: 4, .. }));
    }

    #[test]
    fn test_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write_fun(dir.path(), "A", "P1", 0, "1 0\n");
        fs::write(dir.path().join("A/P1/VAR.0.ps"), "not numbers at all\n").unwrap();
        fs::write(dir.path().join("A/P1/notes.txt"), "hello\n").unwrap();

        let scanner = IndicatorScanner::new(ScanConfig::default());
        let report = scanner.compute(dir.path(), &mut sum_only(), None).unwrap();
        assert_eq!(report.fronts, 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = IndicatorScanner::new(ScanConfig::default());
        let err = scanner
            .compute(&dir.path().join("nope"), &mut sum_only(), None)
            .unwrap_err();
        assert!(matches!(err, LabError::Io { .. }));
    }
}
