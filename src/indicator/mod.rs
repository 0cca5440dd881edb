//! Quality indicator files.
//!
//! After an experiment has finished, [`IndicatorScanner`] reduces every
//! objective file to one number per [`QualityIndicator`] and records it in
//! a positional indicator file:
//!
//! ```text
//! <base>/<algorithm>/<problem>/QI.<indicator>         one value per line, sorted by run
//! <base>/<algorithm>/<problem>/.QI.<indicator>.runs    run of each line
//! ```
//!
//! # Key Types
//!
//! - [`QualityIndicator`]: collaborator contract (`compute`, optional reference front)
//! - [`ScanConfig`]: gap, malformed-file, and re-scan policies
//! - [`IndicatorStore`]: lock-guarded run-ordered inserts into `QI.*` files
//! - [`IndicatorScanner`]: the directory scan itself
//!
//! # Ordering
//!
//! Scanning must not overlap with the jobs that produce the objective
//! files. [`Experiment::run`](crate::experiment::Experiment::run) only
//! returns once its worker pool has shut down, so calling the scanner
//! after it is sufficient.

mod config;
mod scanner;
mod store;
mod types;

pub use config::{GapPolicy, MalformedPolicy, ScanConfig};
pub use scanner::{IndicatorScanner, ScanFailure, ScanReport};
pub use store::IndicatorStore;
pub use types::QualityIndicator;
