//! Run-group identifier resolution
//!
//! The model name comes from the run-group directory, the receptive field
//! from the parameter bundle or the score file name, and the kernel width
//! from the score file name only. Each field is resolved by trying an
//! ordered list of strategies; the run-group fails only when all of them
//! fail.
//!
//! Score files follow `scores_<model>_k<kernel_width>_<rf>.<ext>`, e.g.
//! `scores_glm_rf0_k5_0.npy`.

use crate::bundle::ParameterBundle;
use crate::error::RunGroupError;
use serde::Serialize;
use std::fmt;

/// Identity of one evaluation configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RunGroupKey {
    pub model_name: String,
    pub receptive_field: i64,
    pub kernel_width: i64,
}

impl fmt::Display for RunGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (rf {}, kernel width {})",
            self.model_name, self.receptive_field, self.kernel_width
        )
    }
}

/// Inputs available to the resolution strategies
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Run-group directory name
    pub run_group: &'a str,
    /// Score file name, with extension
    pub score_file: &'a str,
    pub params: &'a ParameterBundle,
}

impl<'a> ResolveContext<'a> {
    /// `_`-delimited segments of the score file name without its extension
    fn score_segments(&self) -> Vec<&'a str> {
        let stem = match self.score_file.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => self.score_file,
        };
        stem.split('_').collect()
    }

    fn score_segment_from_end(&self, position: usize) -> Result<&'a str, String> {
        let segments = self.score_segments();
        if position == 0 || segments.len() < position {
            return Err(format!(
                "'{}' has fewer than {} '_'-separated segments",
                self.score_file, position
            ));
        }
        Ok(segments[segments.len() - position])
    }
}

type Strategy<T> = (&'static str, fn(&ResolveContext<'_>) -> Result<T, String>);

const RECEPTIVE_FIELD_STRATEGIES: [Strategy<i64>; 2] = [
    ("rf parameter", rf_from_params),
    ("score file suffix", rf_from_score_file),
];

// `k`-prefixed tokens win over other letter+digits segments such as `d3`
const KERNEL_WIDTH_STRATEGIES: [Strategy<KernelToken>; 4] = [
    ("third-from-last k token", k_token_third_last),
    ("second-from-last k token", k_token_second_last),
    ("third-from-last score token", kernel_from_third_last),
    ("second-from-last score token", kernel_from_second_last),
];

/// Conventional prefix of kernel-width tokens
const KERNEL_TOKEN_PREFIX: char = 'k';

/// Kernel-width token of a score file name, e.g. `k5`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelToken {
    pub token: String,
    pub width: i64,
}

/// Drop the final `_`-delimited component (trial or seed suffix)
///
/// # Example
/// ```
/// use kernel_sweep::identifier::strip_trailing_suffix;
///
/// assert_eq!(strip_trailing_suffix("glm_rf2_trial3"), "glm_rf2");
/// assert_eq!(strip_trailing_suffix("glm"), "glm");
/// ```
pub fn strip_trailing_suffix(name: &str) -> &str {
    match name.rsplit_once('_') {
        Some((head, _)) => head,
        None => name,
    }
}

/// Parse a kernel-width token: one non-digit prefix character, then digits
pub fn parse_kernel_token(token: &str) -> Option<i64> {
    let mut chars = token.chars();
    let prefix = chars.next()?;
    if prefix.is_ascii_digit() {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn kernel_token_at(ctx: &ResolveContext<'_>, position: usize) -> Result<KernelToken, String> {
    let token = ctx.score_segment_from_end(position)?;
    parse_kernel_token(token)
        .map(|width| KernelToken {
            token: token.to_string(),
            width,
        })
        .ok_or_else(|| format!("'{}' is not a kernel-width token", token))
}

fn k_token_at(ctx: &ResolveContext<'_>, position: usize) -> Result<KernelToken, String> {
    let kernel = kernel_token_at(ctx, position)?;
    if !kernel.token.starts_with(KERNEL_TOKEN_PREFIX) {
        return Err(format!(
            "'{}' does not start with '{}'",
            kernel.token, KERNEL_TOKEN_PREFIX
        ));
    }
    Ok(kernel)
}

fn k_token_third_last(ctx: &ResolveContext<'_>) -> Result<KernelToken, String> {
    k_token_at(ctx, 3)
}

fn k_token_second_last(ctx: &ResolveContext<'_>) -> Result<KernelToken, String> {
    k_token_at(ctx, 2)
}

fn kernel_from_third_last(ctx: &ResolveContext<'_>) -> Result<KernelToken, String> {
    kernel_token_at(ctx, 3)
}

fn kernel_from_second_last(ctx: &ResolveContext<'_>) -> Result<KernelToken, String> {
    kernel_token_at(ctx, 2)
}

fn rf_from_params(ctx: &ResolveContext<'_>) -> Result<i64, String> {
    let rf = ctx.params.rf.as_ref().ok_or("no 'rf' parameter")?;

    let mut values = Vec::new();
    collect_numbers(rf, &mut values)?;
    if values.is_empty() {
        return Err("'rf' parameter is empty".to_string());
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if !mean.is_finite() {
        return Err("'rf' parameter mean is not finite".to_string());
    }
    Ok(mean.round() as i64)
}

fn collect_numbers(value: &serde_json::Value, out: &mut Vec<f64>) -> Result<(), String> {
    use serde_json::Value;

    match value {
        Value::Number(n) => {
            out.push(n.as_f64().ok_or("'rf' value out of range")?);
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(|item| collect_numbers(item, out)),
        other => Err(format!("'rf' parameter is not numeric: {}", other)),
    }
}

fn rf_from_score_file(ctx: &ResolveContext<'_>) -> Result<i64, String> {
    let suffix = ctx.score_segment_from_end(1)?;
    suffix
        .parse()
        .map_err(|_| format!("suffix '{}' is not an integer", suffix))
}

fn resolve_field<T>(
    ctx: &ResolveContext<'_>,
    field: &'static str,
    strategies: &[Strategy<T>],
) -> Result<T, RunGroupError> {
    let mut attempts = Vec::with_capacity(strategies.len());
    for (name, strategy) in strategies {
        match strategy(ctx) {
            Ok(value) => {
                tracing::trace!(run_group = ctx.run_group, field, strategy = *name, "resolved");
                return Ok(value);
            }
            Err(reason) => attempts.push(format!("{}: {}", name, reason)),
        }
    }
    Err(RunGroupError::IdentifierResolution {
        run_group: ctx.run_group.to_string(),
        field,
        attempts,
    })
}

/// Resolve the receptive field alone
pub fn resolve_receptive_field(ctx: &ResolveContext<'_>) -> Result<i64, RunGroupError> {
    resolve_field(ctx, "receptive field", &RECEPTIVE_FIELD_STRATEGIES)
}

/// Resolve the kernel-width token alone
pub fn resolve_kernel_width(ctx: &ResolveContext<'_>) -> Result<KernelToken, RunGroupError> {
    resolve_field(ctx, "kernel width", &KERNEL_WIDTH_STRATEGIES)
}

/// Resolve the full key of a run-group
///
/// The model name is the directory name without its trial suffix. If what
/// remains still ends in the kernel-width token of the score file, that
/// token is dropped too; the kernel width has its own column.
pub fn resolve_key(ctx: &ResolveContext<'_>) -> Result<RunGroupKey, RunGroupError> {
    let kernel = resolve_kernel_width(ctx)?;
    let receptive_field = resolve_receptive_field(ctx)?;

    let mut model_name = strip_trailing_suffix(ctx.run_group);
    if let Some((head, last)) = model_name.rsplit_once('_') {
        if last == kernel.token {
            model_name = head;
        }
    }

    Ok(RunGroupKey {
        model_name: model_name.to_string(),
        receptive_field,
        kernel_width: kernel.width,
    })
}
