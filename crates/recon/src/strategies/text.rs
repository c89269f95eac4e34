//! Weighted fuzzy reconciliation for free-text columns.
//!
//! The decision ladder prefers certainty over heuristics: normalized
//! exact agreement wins outright, then a user-weighted partial-ratio
//! pass, then an unweighted token-set pass. Every tie-break is pinned to
//! the original authoring order so identical input yields identical
//! output.

use crate::config::ReconConfig;
use crate::format::{blank_explanation, pluralize};
use crate::model::{
    ExactScore, FuzzyRatioScore, FuzzySetScore, MatchKind, Reconciliation, Transcription,
};
use crate::similarity::{partial_ratio, token_set_ratio};

pub fn reconcile(group: &[Transcription], config: &ReconConfig) -> Reconciliation {
    let values: Vec<String> = group.iter().map(|t| normalize(&t.value)).collect();
    let count = values.len();

    let filled = only_filled_values(&values);
    let blanks = count - filled.iter().map(|f| f.count).sum::<usize>();

    if filled.is_empty() {
        return Reconciliation {
            kind: MatchKind::AllBlank,
            explanation: blank_explanation(count),
            value: String::new(),
        };
    }

    if filled[0].count > 1 && filled[0].count == count {
        return Reconciliation {
            kind: MatchKind::Unanimous,
            explanation: format!(
                "Normalized unanimous match, {} of {} {}",
                filled[0].count,
                count,
                pluralize(count, "record")
            ),
            value: filled[0].value.clone(),
        };
    }

    if filled[0].count > 1 {
        return Reconciliation {
            kind: MatchKind::Majority,
            explanation: format!(
                "Normalized majority match, {} of {} {} with {} {}",
                filled[0].count,
                count,
                pluralize(count, "record"),
                blanks,
                pluralize(blanks, "blank")
            ),
            value: filled[0].value.clone(),
        };
    }

    if filled.len() == 1 {
        return Reconciliation {
            kind: MatchKind::Onesie,
            explanation: format!(
                "Only 1 transcript in {} {}",
                count,
                pluralize(count, "record")
            ),
            value: filled[0].value.clone(),
        };
    }

    // Simple in-place fuzzy matches next
    if let Some(top) = top_partial_ratio(group, &values, config) {
        if top.score >= config.fuzzy_ratio_threshold {
            return Reconciliation {
                kind: MatchKind::PartialRatio,
                explanation: format!(
                    "Partial ratio match on {} {} with {} {}, score={}",
                    count,
                    pluralize(count, "record"),
                    blanks,
                    pluralize(blanks, "blank"),
                    top.score
                ),
                value: top.value,
            };
        }
    }

    // Now look for the best token match
    if let Some(top) = top_token_set_ratio(&values) {
        if top.score >= config.fuzzy_set_threshold {
            return Reconciliation {
                kind: MatchKind::TokenSetRatio,
                explanation: format!(
                    "Token set ratio match on {} {} with {} {}, score={}",
                    count,
                    pluralize(count, "record"),
                    blanks,
                    pluralize(blanks, "blank"),
                    top.score
                ),
                value: top.value,
            };
        }
    }

    Reconciliation {
        kind: MatchKind::NoMatch,
        explanation: format!(
            "No text match on {} {} with {} {}",
            count,
            pluralize(count, "record"),
            blanks,
            pluralize(blanks, "blank")
        ),
        value: String::new(),
    }
}

/// Collapse internal whitespace line-by-line and trim each line.
fn normalize(value: &str) -> String {
    value
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Group the filled entries by a squished comparison key (non-word
/// characters stripped, lowercased) and keep the longest literal variant
/// per key, first occurrence winning length ties. Sorted by occurrence
/// count descending; insertion order preserved among equals.
fn only_filled_values(values: &[String]) -> Vec<ExactScore> {
    let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let key = squish(value);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, same_values)) => same_values.push(value),
            None => groups.push((key, vec![value])),
        }
    }

    let mut filled: Vec<ExactScore> = groups
        .into_iter()
        .map(|(_, same_values)| {
            let mut longest = same_values[0];
            for &candidate in &same_values[1..] {
                if candidate.chars().count() > longest.chars().count() {
                    longest = candidate;
                }
            }
            ExactScore {
                value: longest.to_string(),
                count: same_values.len(),
            }
        })
        .collect();

    filled.sort_by(|a, b| b.count.cmp(&a.count));
    filled
}

fn squish(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase()
}

/// Best weighted partial-ratio pair. For each unordered pair of filled
/// entries (in authoring order) the candidate is the longer member, ties
/// going to the first; the candidate's author weight is added to the raw
/// score, clamped to a ceiling of 100 with no floor.
fn top_partial_ratio(
    group: &[Transcription],
    values: &[String],
    config: &ReconConfig,
) -> Option<FuzzyRatioScore> {
    let attribution = user_attribution(group, values);
    let filled: Vec<&String> = values.iter().filter(|v| !v.trim().is_empty()).collect();

    let mut scores: Vec<FuzzyRatioScore> = Vec::new();
    for (i, a) in filled.iter().enumerate() {
        for b in &filled[i + 1..] {
            let value = if a.chars().count() >= b.chars().count() {
                a.as_str()
            } else {
                b.as_str()
            };
            let weight = attribution
                .iter()
                .find(|(v, _)| *v == value)
                .and_then(|(_, user)| user.map(|u| config.weight_for(u)))
                .unwrap_or(0);
            let score = (partial_ratio(a, b) + weight).min(100);
            scores.push(FuzzyRatioScore {
                score,
                value: value.to_string(),
            });
        }
    }

    // stable sort: equal (score, length) keeps pair enumeration order
    scores.sort_by(|x, y| {
        y.score
            .cmp(&x.score)
            .then_with(|| y.value.chars().count().cmp(&x.value.chars().count()))
    });
    scores.into_iter().next()
}

/// Value → authoring user over the whole group, in order. Two users
/// submitting identical text resolve last-writer-wins.
fn user_attribution<'a>(
    group: &'a [Transcription],
    values: &'a [String],
) -> Vec<(&'a str, Option<&'a str>)> {
    let mut attribution: Vec<(&str, Option<&str>)> = Vec::new();
    for (transcription, value) in group.iter().zip(values) {
        match attribution.iter_mut().find(|(v, _)| *v == value.as_str()) {
            Some(entry) => entry.1 = transcription.user.as_deref(),
            None => attribution.push((value.as_str(), transcription.user.as_deref())),
        }
    }
    attribution
}

/// Best token-set pair over the normalized (not deduped) filled entries.
/// The candidate is the member with more tokens; equal token counts fall
/// to the shorter member, then to pair order. No user weighting here.
fn top_token_set_ratio(values: &[String]) -> Option<FuzzySetScore> {
    let filled: Vec<&String> = values.iter().filter(|v| !v.trim().is_empty()).collect();

    let mut scores: Vec<FuzzySetScore> = Vec::new();
    for (i, a) in filled.iter().enumerate() {
        for b in &filled[i + 1..] {
            let score = token_set_ratio(a, b);
            let tokens_a = a.split_whitespace().count();
            let tokens_b = b.split_whitespace().count();
            let (value, tokens) = if tokens_a > tokens_b {
                (a.as_str(), tokens_a)
            } else if tokens_a < tokens_b {
                (b.as_str(), tokens_b)
            } else if a.chars().count() <= b.chars().count() {
                (a.as_str(), tokens_a)
            } else {
                (b.as_str(), tokens_b)
            };
            scores.push(FuzzySetScore {
                score,
                value: value.to_string(),
                tokens,
            });
        }
    }

    scores.sort_by(|x, y| {
        y.score
            .cmp(&x.score)
            .then_with(|| y.tokens.cmp(&x.tokens))
            .then_with(|| x.value.chars().count().cmp(&y.value.chars().count()))
    });
    scores.into_iter().next()
}
