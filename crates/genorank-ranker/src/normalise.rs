//! Rank-based score normalisation.

/// Shared-rank normalisation, higher raw score is better.
///
/// Each score gets rank r in [1, N] (1 = best). Tied scores (exact float
/// equality) share the midpoint of the ranks they span, so a group of k
/// genes starting at rank r gets r + (k − 1)/2. The normalised value is
/// 1 − rank/N. Returns values in the same order as the input.
pub fn rank_normalise(raw_scores: &[f64]) -> Vec<f64> {
    let n = raw_scores.len();
    if n == 0 {
        return vec![];
    }

    let mut indexed: Vec<(usize, f64)> = raw_scores.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut normalised = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && indexed[j + 1].1 == indexed[i].1 {
            j += 1;
        }
        let first_rank = (i + 1) as f64;
        let group_size = (j - i + 1) as f64;
        let shared_rank = first_rank + (group_size - 1.0) / 2.0;
        let value = 1.0 - shared_rank / n as f64;
        for &(original, _) in &indexed[i..=j] {
            normalised[original] = value;
        }
        i = j + 1;
    }

    normalised
}
