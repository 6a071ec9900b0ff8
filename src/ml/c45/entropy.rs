//! Information measures used to score candidate splits.

/// Gains at or below this are treated as zero, absorbing rounding noise from
/// splits that leave the class distribution unchanged.
pub(crate) const MIN_GAIN: f64 = 1e-12;

/// Base-2 entropy of a class-count histogram, with `0 * log(0) = 0`.
pub fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    entropy_with_total(counts.iter().copied(), total)
}

fn entropy_with_total(counts: impl Iterator<Item = usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut sum = 0.0;
    for count in counts.filter(|&c| c > 0) {
        let p = count as f64 / total;
        sum += p * p.log2();
    }
    if sum == 0.0 { 0.0 } else { -sum }
}

/// C4.5 gain ratio of splitting a node into `branches` (class histograms).
///
/// Returns 0 for degenerate splits whose split information is 0 and for
/// splits without information gain.
pub fn gain_ratio(parent_entropy: f64, branches: &[&[usize]]) -> f64 {
    let sizes: Vec<usize> = branches.iter().map(|b| b.iter().sum()).collect();
    let total: usize = sizes.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let weighted: f64 = branches
        .iter()
        .zip(&sizes)
        .map(|(counts, &size)| (size as f64 / total as f64) * entropy(counts))
        .sum();
    let gain = parent_entropy - weighted;
    let split_info = entropy_with_total(sizes.iter().copied(), total);
    if split_info <= 0.0 || gain <= MIN_GAIN {
        return 0.0;
    }
    gain / split_info
}
