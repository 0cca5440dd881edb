//! Aggregation configuration.

/// How a column name is derived from an indicator file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnKey {
    /// The algorithm directory, e.g. `NSGAII`. One column per compared
    /// algorithm, the shape significance testing expects.
    #[default]
    Algorithm,

    /// The indicator file name, e.g. `QI.HV`.
    FileName,

    /// Both, e.g. `NSGAII.QI.HV`.
    AlgorithmAndFile,
}

impl ColumnKey {
    /// Column name for an indicator file of `algorithm`.
    pub fn column(self, algorithm: &str, file_name: &str) -> String {
        match self {
            ColumnKey::Algorithm => algorithm.to_owned(),
            ColumnKey::FileName => file_name.to_owned(),
            ColumnKey::AlgorithmAndFile => format!("{algorithm}.{file_name}"),
        }
    }
}

/// What to do when two values map to the same `(problem, run, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuplicatePolicy {
    /// Average all values of the cell.
    #[default]
    Average,

    /// Fail with [`LabError::DuplicateCell`](crate::LabError::DuplicateCell).
    Error,
}

/// Configuration for a [`TableAggregator`](super::TableAggregator).
///
/// # Builder Pattern
///
/// ```
/// use u_metalab::table::{AggregatorConfig, ColumnKey, DuplicatePolicy};
///
/// let config = AggregatorConfig::default()
///     .with_indicator("HV")
///     .with_duplicates(DuplicatePolicy::Error);
/// assert_eq!(config.column_key, ColumnKey::Algorithm);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregatorConfig {
    /// Column naming.
    pub column_key: ColumnKey,

    /// Only read `QI.<indicator>` files when set.
    ///
    /// Required with [`ColumnKey::Algorithm`] when several indicators are
    /// on disk, otherwise the build fails with
    /// [`LabError::MixedIndicators`](crate::LabError::MixedIndicators).
    pub indicator: Option<String>,

    /// Handling of colliding cells.
    pub duplicates: DuplicatePolicy,
}

impl AggregatorConfig {
    /// Sets the column naming.
    pub fn with_column_key(mut self, key: ColumnKey) -> Self {
        self.column_key = key;
        self
    }

    /// Restricts aggregation to one indicator.
    pub fn with_indicator(mut self, name: impl Into<String>) -> Self {
        self.indicator = Some(name.into());
        self
    }

    /// Sets the duplicate policy.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.indicator {
            if name.is_empty() {
                return Err("indicator filter must not be empty".into());
            }
        }
        Ok(())
    }
}
