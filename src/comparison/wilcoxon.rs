// Wilcoxon signed-rank test for paired samples
//
// Scientific Foundation:
// Wilcoxon, F. (1945). Individual comparisons by ranking methods.
//     Biometrics Bulletin 1(6), 80-83.
//
// Conventions (two-sided):
// - Zero differences are discarded before ranking
// - Tied |d| receive their average rank
// - The exact null distribution is used for up to 50 pairs without zeros
//   or ties; otherwise the normal approximation with tie-corrected
//   variance and no continuity correction

use crate::error::ComparisonError;
use statrs::distribution::{ContinuousCDF, Normal};

/// Largest sample evaluated with the exact null distribution
pub const EXACT_LIMIT: usize = 50;

/// How the p-value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PValueMethod {
    Exact,
    NormalApproximation,
}

/// Result of a paired signed-rank test
#[derive(Debug, Clone, PartialEq)]
pub struct WilcoxonTest {
    /// min(W+, W-)
    pub statistic: f64,
    /// Two-sided p-value
    pub pvalue: f64,
    /// Pairs left after discarding zero differences
    pub n_effective: usize,
    pub method: PValueMethod,
}

/// Paired two-sided Wilcoxon signed-rank test of `x` against `y`
///
/// # Example
/// ```
/// use kernel_sweep::comparison::wilcoxon_signed_rank;
///
/// let before = [0.61, 0.64, 0.70, 0.72, 0.75, 0.79];
/// let after = [0.50, 0.52, 0.55, 0.56, 0.58, 0.60];
/// let test = wilcoxon_signed_rank(&before, &after).unwrap();
/// assert!((test.pvalue - 0.03125).abs() < 1e-12);
/// ```
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<WilcoxonTest, ComparisonError> {
    if x.len() != y.len() {
        return Err(ComparisonError::MismatchedPairLength {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(ComparisonError::NonFiniteSample);
    }

    let diffs: Vec<f64> = x.iter().zip(y).map(|(a, b)| a - b).collect();
    let has_zeros = diffs.iter().any(|&d| d == 0.0);
    let nonzero: Vec<f64> = diffs.into_iter().filter(|&d| d != 0.0).collect();
    let n = nonzero.len();
    if n == 0 {
        return Err(ComparisonError::DegenerateSample);
    }

    let abs: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let (ranks, tie_groups) = average_ranks(&abs);

    let r_plus: f64 = nonzero
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let r_minus = total - r_plus;
    let statistic = r_plus.min(r_minus);

    let has_ties = tie_groups.iter().any(|&t| t > 1);
    let (pvalue, method) = if x.len() <= EXACT_LIMIT && !has_zeros && !has_ties {
        (exact_pvalue(n, statistic), PValueMethod::Exact)
    } else {
        (
            normal_pvalue(n, statistic, &tie_groups),
            PValueMethod::NormalApproximation,
        )
    };

    Ok(WilcoxonTest {
        statistic,
        pvalue: pvalue.min(1.0),
        n_effective: n,
        method,
    })
}

/// 1-based average ranks, plus the size of every tie group
fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut groups = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        groups.push(end - start);
        start = end;
    }
    (ranks, groups)
}

/// P(W <= t) doubled, with W the signed-rank sum under H0
fn exact_pvalue(n: usize, statistic: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    // counts[s] = number of subsets of {1..n} summing to s
    let mut counts = vec![0u64; max_sum + 1];
    counts[0] = 1;
    for k in 1..=n {
        for s in (k..=max_sum).rev() {
            counts[s] += counts[s - k];
        }
    }

    let t = statistic.floor() as usize;
    let below: u64 = counts[..=t.min(max_sum)].iter().sum();
    let total = 2f64.powi(n as i32);
    2.0 * below as f64 / total
}

fn normal_pvalue(n: usize, statistic: f64, tie_groups: &[usize]) -> f64 {
    let n = n as f64;
    let mean = n * (n + 1.0) / 4.0;
    let tie_term: f64 = tie_groups
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let variance = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_term / 48.0;
    if variance <= 0.0 {
        return 1.0;
    }

    let z = (statistic - mean) / variance.sqrt();
    match Normal::new(0.0, 1.0) {
        Ok(standard) => 2.0 * standard.cdf(-z.abs()),
        Err(_) => f64::NAN,
    }
}
