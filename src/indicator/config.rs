//! Indicator scan configuration.

/// What to do when a run index exceeds the line count of an indicator file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapPolicy {
    /// Write the value without placeholder lines.
    ///
    /// Lines stay sorted by run, so a dense run set `0..n` puts run `i` on
    /// line `i` whatever the arrival order. Sparse run sets (e.g. runs 0,
    /// 1 and 5) end up compacted.
    #[default]
    Append,

    /// Refuse the write with [`LabError::IndicatorGap`](crate::LabError::IndicatorGap).
    Error,
}

/// What to do with an objective file that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MalformedPolicy {
    /// Log the file, record it in the scan report, and keep scanning.
    #[default]
    Skip,

    /// Stop the scan and return the parse error.
    Abort,
}

/// Configuration for an [`IndicatorScanner`](super::IndicatorScanner).
///
/// # Builder Pattern
///
/// ```
/// use u_metalab::indicator::{GapPolicy, MalformedPolicy, ScanConfig};
///
/// let config = ScanConfig::default()
///     .with_gap_policy(GapPolicy::Error)
///     .with_malformed(MalformedPolicy::Abort)
///     .with_reset_existing(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanConfig {
    /// Handling of inserts past the end of an indicator file.
    pub gap_policy: GapPolicy,

    /// Handling of unparsable objective files.
    pub malformed: MalformedPolicy,

    /// Truncate every indicator file the first time a scan writes to it.
    ///
    /// Off by default: scanning the same artifacts twice then inserts
    /// every value a second time. Turn it on to make re-scans idempotent.
    pub reset_existing: bool,

    /// Extension of reference front files, `<problem>.<ext>`.
    pub reference_front_extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            gap_policy: GapPolicy::default(),
            malformed: MalformedPolicy::default(),
            reset_existing: false,
            reference_front_extension: "pf".into(),
        }
    }
}

impl ScanConfig {
    /// Sets the gap policy.
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }

    /// Sets the malformed-file policy.
    pub fn with_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }

    /// Enables or disables truncation of existing indicator files.
    pub fn with_reset_existing(mut self, reset: bool) -> Self {
        self.reset_existing = reset;
        self
    }

    /// Sets the reference front extension (without the dot).
    pub fn with_reference_front_extension(mut self, ext: impl Into<String>) -> Self {
        self.reference_front_extension = ext.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let ext = &self.reference_front_extension;
        if ext.is_empty() {
            return Err("reference_front_extension must not be empty".into());
        }
        if ext.contains(['.', '/', '\\']) {
            return Err(format!(
                "reference_front_extension {ext:?} must not contain '.' or path separators"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.gap_policy, GapPolicy::Append);
        assert_eq!(config.malformed, MalformedPolicy::Skip);
        assert!(!config.reset_existing);
        assert_eq!(config.reference_front_extension, "pf");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_extension() {
        assert!(ScanConfig::default()
            .with_reference_front_extension("")
            .validate()
            .is_err());
        assert!(ScanConfig::default()
            .with_reference_front_extension(".pf")
            .validate()
            .is_err());
        assert!(ScanConfig::default()
            .with_reference_front_extension("csv")
            .validate()
            .is_ok());
    }
}
