//! Significance testing configuration.

/// Configuration for a [`SignificanceTester`](super::SignificanceTester).
///
/// # Defaults
///
/// ```
/// use u_metalab::significance::SignificanceConfig;
///
/// let config = SignificanceConfig::default();
/// assert_eq!(config.alpha, 0.05);
/// assert_eq!(config.exact_threshold, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignificanceConfig {
    /// Significance level: a p-value strictly below it is significant.
    pub alpha: f64,

    /// Largest sample size for which the Wilcoxon test uses the exact
    /// null distribution (only when there are no tied differences).
    pub exact_threshold: usize,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            exact_threshold: 50,
        }
    }
}

impl SignificanceConfig {
    /// Sets the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the exact-distribution threshold (0 always uses the normal
    /// approximation).
    pub fn with_exact_threshold(mut self, n: usize) -> Self {
        self.exact_threshold = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("alpha must be in (0, 1), got {}", self.alpha));
        }
        if self.exact_threshold > 1000 {
            return Err("exact_threshold above 1000 is numerically unsafe".into());
        }
        Ok(())
    }
}
