//! Sanity check for columns that should never disagree. A mismatch is a
//! per-group problem folded into the explanation, never a run abort.

use crate::config::ReconConfig;
use crate::format::{blank_explanation, is_are, pluralize, the_all};
use crate::model::{MatchKind, Reconciliation, Transcription};

pub fn reconcile(group: &[Transcription], _config: &ReconConfig) -> Reconciliation {
    let count = group.len();
    let filled: Vec<&str> = group
        .iter()
        .map(|t| t.value.trim())
        .filter(|v| !v.is_empty())
        .collect();
    let blanks = count - filled.len();

    if filled.is_empty() {
        return Reconciliation {
            kind: MatchKind::AllBlank,
            explanation: blank_explanation(count),
            value: String::new(),
        };
    }

    let first = filled[0];
    if filled.iter().all(|v| *v == first) {
        let k = filled.len();
        return Reconciliation {
            kind: MatchKind::Unanimous,
            explanation: format!(
                "{} {} {} {} the same",
                the_all(k),
                k,
                pluralize(k, "record"),
                is_are(k)
            ),
            value: first.to_string(),
        };
    }

    Reconciliation {
        kind: MatchKind::Mismatch,
        explanation: format!(
            "Not all values are the same in {} {} with {} {}",
            count,
            pluralize(count, "record"),
            blanks,
            pluralize(blanks, "blank")
        ),
        value: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(values: &[&str]) -> Vec<Transcription> {
        values.iter().map(|v| Transcription::new(*v)).collect()
    }

    fn config() -> ReconConfig {
        ReconConfig::default()
    }

    #[test]
    fn all_identical() {
        let result = reconcile(&entries(&["KSP-0042", "KSP-0042", "KSP-0042"]), &config());
        assert_eq!(result.kind, MatchKind::Unanimous);
        assert_eq!(result.explanation, "All 3 records are the same");
        assert_eq!(result.value, "KSP-0042");
    }

    #[test]
    fn blanks_are_ignored() {
        let result = reconcile(&entries(&["KSP-0042", "", "KSP-0042"]), &config());
        assert_eq!(result.kind, MatchKind::Unanimous);
        assert_eq!(result.explanation, "All 2 records are the same");
    }

    #[test]
    fn mismatch_is_flagged() {
        let result = reconcile(&entries(&["KSP-0042", "KSP-0043", ""]), &config());
        assert_eq!(result.kind, MatchKind::Mismatch);
        assert_eq!(
            result.explanation,
            "Not all values are the same in 3 records with 1 blank"
        );
        assert_eq!(result.value, "");
    }

    #[test]
    fn all_blank() {
        let result = reconcile(&entries(&["", ""]), &config());
        assert_eq!(result.kind, MatchKind::AllBlank);
    }

    #[test]
    fn single_value() {
        let result = reconcile(&entries(&["KSP-0042"]), &config());
        assert_eq!(result.kind, MatchKind::Unanimous);
        assert_eq!(result.explanation, "The 1 record is the same");
    }
}
