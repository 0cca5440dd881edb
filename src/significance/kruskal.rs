//! Kruskal–Wallis H test for k independent samples.
//!
//! # References
//!
//! - Kruskal & Wallis (1952), "Use of Ranks in One-Criterion Variance Analysis"

use super::rank::{average_ranks, tie_term};
use super::TestOutcome;
use u_numflow::special::chi_squared_cdf;

/// Runs the Kruskal–Wallis test over `groups`.
///
/// Empty groups are ignored. With fewer than two non-empty groups, or
/// when every observation is identical, the outcome is `H = 0, p = 1`.
///
/// ```
/// use u_metalab::significance::kruskal_wallis;
///
/// let outcome = kruskal_wallis(&[
///     vec![1.0, 2.0, 3.0, 4.0, 5.0],
///     vec![1.5, 2.5, 3.5, 4.5, 5.5],
///     vec![100.0; 5],
/// ]);
/// assert!(outcome.p_value < 0.05);
/// ```
pub fn kruskal_wallis(groups: &[Vec<f64>]) -> TestOutcome {
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = pooled.len() as f64;

    let not_significant = TestOutcome {
        statistic: 0.0,
        p_value: 1.0,
    };
    if k < 2 {
        return not_significant;
    }

    let (ranks, ties) = average_ranks(&pooled);
    let correction = 1.0 - tie_term(&ties) / (n * n * n - n);
    if correction <= 0.0 {
        return not_significant;
    }

    let mut offset = 0;
    let mut sum_sq = 0.0;
    for group in &groups {
        let r: f64 = ranks[offset..offset + group.len()].iter().sum();
        sum_sq += r * r / group.len() as f64;
        offset += group.len();
    }

    let h = (12.0 / (n * (n + 1.0)) * sum_sq - 3.0 * (n + 1.0)) / correction;
    if h <= 0.0 {
        return TestOutcome {
            statistic: h.max(0.0),
            p_value: 1.0,
        };
    }
    TestOutcome {
        statistic: h,
        p_value: (1.0 - chi_squared_cdf(h, (k - 1) as f64)).clamp(0.0, 1.0),
    }
}
