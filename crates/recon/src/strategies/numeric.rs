//! Mean, mode, and range for numeric columns. Entries that fail to parse
//! are excluded and counted in the explanation; they never abort the run.

use crate::config::ReconConfig;
use crate::format::{blank_explanation, pluralize, was_were};
use crate::model::{MatchKind, Reconciliation, Transcription};

pub fn reconcile(group: &[Transcription], _config: &ReconConfig) -> Reconciliation {
    let count = group.len();
    let filled: Vec<&str> = group
        .iter()
        .map(|t| t.value.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if filled.is_empty() {
        return Reconciliation {
            kind: MatchKind::AllBlank,
            explanation: blank_explanation(count),
            value: String::new(),
        };
    }

    let numbers: Vec<f64> = filled.iter().filter_map(|v| v.parse().ok()).collect();
    let excluded = filled.len() - numbers.len();

    if numbers.is_empty() {
        return Reconciliation {
            kind: MatchKind::NoMatch,
            explanation: format!(
                "There were no numbers in {} {}",
                count,
                pluralize(count, "record")
            ),
            value: String::new(),
        };
    }

    let k = numbers.len();
    let mean = numbers.iter().sum::<f64>() / k as f64;
    let (lo, hi) = range(&numbers);
    let mode = mode(&numbers);

    Reconciliation {
        kind: MatchKind::NumericStats,
        explanation: format!(
            "There {} {} {} in {} {} with {} non-numeric {} excluded",
            was_were(k),
            k,
            pluralize(k, "number"),
            count,
            pluralize(count, "record"),
            excluded,
            pluralize(excluded, "value")
        ),
        value: format!(
            "mean={}, mode={}, range={}-{}",
            fmt_num(mean),
            fmt_num(mode),
            fmt_num(lo),
            fmt_num(hi)
        ),
    }
}

fn range(numbers: &[f64]) -> (f64, f64) {
    let mut lo = numbers[0];
    let mut hi = numbers[0];
    for &n in &numbers[1..] {
        if n < lo {
            lo = n;
        }
        if n > hi {
            hi = n;
        }
    }
    (lo, hi)
}

/// Most frequent value; ties resolve to the smallest so output is
/// deterministic.
fn mode(numbers: &[f64]) -> f64 {
    let mut sorted = numbers.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut best = sorted[0];
    let mut best_count = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > best_count {
            best = sorted[i];
            best_count = j - i;
        }
        i = j;
    }
    best
}

/// Minimal float formatting: integral values print without a decimal
/// point (Rust's `{}` already does this for f64).
fn fmt_num(n: f64) -> String {
    format!("{n}")
}
