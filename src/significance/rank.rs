//! Ranking with ties.

/// Ranks of `values` (1-based, ties receive the average rank) together
/// with the size of every tie group.
///
/// ```
/// use u_metalab::significance::average_ranks;
///
/// let (ranks, ties) = average_ranks(&[3.0, 1.0, 3.0, 2.0]);
/// assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
/// assert_eq!(ties, vec![2]);
/// ```
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut ties = Vec::new();
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j share ranks i+1..=j.
        let rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        if j - i > 1 {
            ties.push(j - i);
        }
        i = j;
    }
    (ranks, ties)
}

/// `Σ (t³ - t)` over tie group sizes.
pub(crate) fn tie_term(ties: &[usize]) -> f64 {
    ties.iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}
