//! Majority vote for fixed-option columns. Exact trimmed equality only;
//! ties are reported explicitly and never fall through to fuzzy matching.

use crate::config::ReconConfig;
use crate::format::{blank_explanation, pluralize};
use crate::model::{MatchKind, Reconciliation, Transcription};

pub fn reconcile(group: &[Transcription], _config: &ReconConfig) -> Reconciliation {
    let count = group.len();

    // vote groups in first-occurrence order
    let mut votes: Vec<(&str, usize)> = Vec::new();
    for transcription in group {
        let value = transcription.value.trim();
        if value.is_empty() {
            continue;
        }
        match votes.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => votes.push((value, 1)),
        }
    }

    let filled: usize = votes.iter().map(|(_, n)| n).sum();
    let blanks = count - filled;

    if votes.is_empty() {
        return Reconciliation {
            kind: MatchKind::AllBlank,
            explanation: blank_explanation(count),
            value: String::new(),
        };
    }

    let (mut winner, mut top) = votes[0];
    for &(value, n) in &votes[1..] {
        if n > top {
            winner = value;
            top = n;
        }
    }
    let tied = votes.iter().filter(|(_, n)| *n == top).count() > 1;

    if top > 1 && tied {
        return Reconciliation {
            kind: MatchKind::Tie,
            explanation: format!(
                "Exact match is a tie, {} of {} {} with {} {}",
                top,
                count,
                pluralize(count, "record"),
                blanks,
                pluralize(blanks, "blank")
            ),
            value: winner.to_string(),
        };
    }

    if top > 1 && top == count {
        return Reconciliation {
            kind: MatchKind::Unanimous,
            explanation: format!(
                "Exact unanimous match, {} of {} {}",
                top,
                count,
                pluralize(count, "record")
            ),
            value: winner.to_string(),
        };
    }

    if top > 1 {
        return Reconciliation {
            kind: MatchKind::Majority,
            explanation: format!(
                "Exact match, {} of {} {} with {} {}",
                top,
                count,
                pluralize(count, "record"),
                blanks,
                pluralize(blanks, "blank")
            ),
            value: winner.to_string(),
        };
    }

    if votes.len() == 1 {
        return Reconciliation {
            kind: MatchKind::Onesie,
            explanation: format!(
                "Only 1 transcript in {} {}",
                count,
                pluralize(count, "record")
            ),
            value: winner.to_string(),
        };
    }

    Reconciliation {
        kind: MatchKind::NoMatch,
        explanation: format!(
            "No select match on {} {} with {} {}",
            count,
            pluralize(count, "record"),
            blanks,
            pluralize(blanks, "blank")
        ),
        value: String::new(),
    }
}
