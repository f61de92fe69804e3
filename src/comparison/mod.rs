// Paired significance testing across kernel-width sweeps
//
// Run-groups of one model family that differ only in smoothing kernel
// width are compared run by run with the Wilcoxon signed-rank test.

mod comparator;
mod wilcoxon;

pub use comparator::{
    compare_kernel_widths, compare_pair, kernel_width_pairs, ComparisonRow, KernelWidthPair,
};
pub use wilcoxon::{wilcoxon_signed_rank, PValueMethod, WilcoxonTest, EXACT_LIMIT};

#[cfg(test)]
mod tests;
