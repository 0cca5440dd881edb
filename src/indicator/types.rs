//! Quality indicator contract.

/// A function reducing a front to a single comparable number.
///
/// Indicators that measure a front against a reference (generational
/// distance, IGD, epsilon, ...) return `true` from
/// [`requires_reference_front`](Self::requires_reference_front). The
/// scanner then binds the `<problem>.pf` front before every computation,
/// or `None` when the problem has no reference front, in which case the
/// indicator falls back to whatever degraded computation it supports.
///
/// # Implementing
///
/// ```
/// use u_metalab::indicator::QualityIndicator;
///
/// /// Number of points in the front.
/// struct Cardinality;
///
/// impl QualityIndicator for Cardinality {
///     fn name(&self) -> String { "CARD".into() }
///     fn compute(&self, front: &[Vec<f64>]) -> f64 { front.len() as f64 }
/// }
///
/// assert_eq!(Cardinality.compute(&[vec![0.0, 1.0], vec![1.0, 0.0]]), 2.0);
/// ```
pub trait QualityIndicator: Send {
    /// Name used in the indicator file name, `QI.<name>`.
    fn name(&self) -> String;

    /// Computes the indicator value of `front` (rows of objective values).
    fn compute(&self, front: &[Vec<f64>]) -> f64;

    /// Whether the scanner should look up and bind a reference front.
    fn requires_reference_front(&self) -> bool {
        false
    }

    /// Binds the reference front of the problem about to be computed.
    ///
    /// `None` means no reference front was found for that problem.
    fn set_reference_front(&mut self, _front: Option<Vec<Vec<f64>>>) {}
}
