//! Wilcoxon signed-rank test for paired samples.
//!
//! # Algorithm
//!
//! 1. Differences `d_i = x_i - y_i`; zero differences are dropped
//! 2. `|d_i|` are ranked (average ranks for ties)
//! 3. `T = min(R+, R-)`
//! 4. Two-sided p-value from the exact null distribution when there are
//!    no ties and `n <= exact_threshold`, otherwise from the normal
//!    approximation with tie correction
//!
//! # References
//!
//! - Wilcoxon (1945), "Individual Comparisons by Ranking Methods"
//! - Hollander, Wolfe & Chicken (2013), *Nonparametric Statistical Methods*, §3.1

use super::rank::{average_ranks, tie_term};
use super::TestOutcome;
use crate::error::{LabError, Result};
use u_numflow::special::standard_normal_sf;

/// Runs the two-sided Wilcoxon signed-rank test on paired samples.
///
/// Samples of different length cannot be paired and are rejected with
/// [`LabError::LengthMismatch`].
///
/// ```
/// use u_metalab::significance::wilcoxon_signed_rank;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let y = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0];
/// let outcome = wilcoxon_signed_rank(&x, &y, 50).unwrap();
/// assert_eq!(outcome.statistic, 0.0);
/// assert!((outcome.p_value - 0.03125).abs() < 1e-12);
/// ```
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64], exact_threshold: usize) -> Result<TestOutcome> {
    if x.len() != y.len() {
        return Err(LabError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let diffs: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();
    let n = diffs.len();
    if n == 0 {
        return Ok(TestOutcome {
            statistic: 0.0,
            p_value: 1.0,
        });
    }

    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let (ranks, ties) = average_ranks(&magnitudes);
    let r_plus: f64 = diffs
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let statistic = r_plus.min(total - r_plus);

    let p_value = if ties.is_empty() && n <= exact_threshold {
        exact_p_value(n, statistic)
    } else {
        normal_p_value(n, statistic, tie_term(&ties))
    };

    Ok(TestOutcome {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// `2 · P(T <= t)` under the exact null distribution of `n` untied ranks.
fn exact_p_value(n: usize, statistic: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    // counts[s] = number of subsets of {1..n} summing to s.
    let mut counts = vec![0.0f64; max_sum + 1];
    counts[0] = 1.0;
    for k in 1..=n {
        for s in (k..=max_sum).rev() {
            counts[s] += counts[s - k];
        }
    }
    let t = statistic.round() as usize;
    let tail: f64 = counts[..=t.min(max_sum)].iter().sum();
    2.0 * tail / 2f64.powi(n as i32)
}

fn normal_p_value(n: usize, statistic: f64, ties: f64) -> f64 {
    let n = n as f64;
    let mean = n * (n + 1.0) / 4.0;
    let var = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - ties / 48.0;
    if var <= 0.0 {
        return 1.0;
    }
    let z = (statistic - mean) / var.sqrt();
    2.0 * standard_normal_sf(z.abs())
}
