//! Fuzzy string similarity, integer scores in [0, 100].
//!
//! `partial_ratio` measures how well the shorter string's best-aligned
//! substring matches inside the longer one; `token_set_ratio` measures
//! word-set overlap independent of word order. Both are pure and
//! symmetric in score.

use std::collections::BTreeSet;

fn to_score(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

/// Best alignment of the shorter string inside the longer: the maximum
/// normalized edit-distance ratio over every shorter-length window of the
/// longer string. Windows are Unicode scalar values, not bytes.
pub fn partial_ratio(a: &str, b: &str) -> i64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    if shorter.is_empty() {
        return if longer.is_empty() { 100 } else { 0 };
    }

    let longer_chars: Vec<char> = longer.chars().collect();
    let window_len = shorter.chars().count();
    if window_len >= longer_chars.len() {
        return to_score(strsim::normalized_levenshtein(shorter, longer));
    }

    let mut best = 0.0_f64;
    for start in 0..=(longer_chars.len() - window_len) {
        let window: String = longer_chars[start..start + window_len].iter().collect();
        let ratio = strsim::normalized_levenshtein(shorter, &window);
        if ratio > best {
            best = ratio;
            if best >= 1.0 {
                break;
            }
        }
    }
    to_score(best)
}

/// Word-set overlap: fold case, drop punctuation, split to token sets,
/// then score the sorted intersection against each side's full sorted
/// token string and take the best. Equal token sets score 100 regardless
/// of word order.
pub fn token_set_ratio(a: &str, b: &str) -> i64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let intersection: Vec<&String> = tokens_a.intersection(&tokens_b).collect();
    let only_a: Vec<&String> = tokens_a.difference(&tokens_b).collect();
    let only_b: Vec<&String> = tokens_b.difference(&tokens_a).collect();

    let joined = |tokens: &[&String]| -> String {
        tokens
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let base = joined(&intersection);
    let combined_a = join_nonempty(&base, &joined(&only_a));
    let combined_b = join_nonempty(&base, &joined(&only_b));

    // base is empty when the sets are disjoint; it then scores 0 against
    // either non-empty side, so no special case is needed
    let best = [
        strsim::normalized_levenshtein(&base, &combined_a),
        strsim::normalized_levenshtein(&base, &combined_b),
        strsim::normalized_levenshtein(&combined_a, &combined_b),
    ]
    .into_iter()
    .fold(0.0_f64, f64::max);
    to_score(best)
}

fn join_nonempty(base: &str, rest: &str) -> String {
    match (base.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{base} {rest}"),
    }
}

/// Lowercased alphanumeric tokens; BTreeSet keeps them sorted.
fn token_set(value: &str) -> BTreeSet<String> {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ratio_substring_containment() {
        assert_eq!(partial_ratio("New York", "New York City"), 100);
        assert_eq!(partial_ratio("New York City", "New York"), 100);
    }

    #[test]
    fn partial_ratio_identical() {
        assert_eq!(partial_ratio("Ohio", "Ohio"), 100);
    }

    #[test]
    fn partial_ratio_reordered_words_score_low() {
        let score = partial_ratio("a b c", "c b a");
        assert!(score < 90, "got {score}");
    }

    #[test]
    fn partial_ratio_empty() {
        assert_eq!(partial_ratio("", "anything"), 0);
        assert_eq!(partial_ratio("", ""), 100);
    }

    #[test]
    fn partial_ratio_symmetric() {
        let a = "Gray's Peak, alt 4300m";
        let b = "grays peak alt 4300 m";
        assert_eq!(partial_ratio(a, b), partial_ratio(b, a));
    }

    #[test]
    fn token_set_ignores_order() {
        assert_eq!(token_set_ratio("a b c", "c b a"), 100);
        assert_eq!(token_set_ratio("New York City", "City New York"), 100);
    }

    #[test]
    fn token_set_ignores_case_and_punctuation() {
        assert_eq!(token_set_ratio("Ohio, USA", "usa ohio"), 100);
    }

    #[test]
    fn token_set_subset_scores_high() {
        let score = token_set_ratio("New York", "New York City");
        assert!(score >= 50, "got {score}");
    }

    #[test]
    fn token_set_disjoint_scores_low() {
        let score = token_set_ratio("alpha beta", "gamma delta");
        assert!(score < 50, "got {score}");
    }

    #[test]
    fn token_set_empty_after_processing() {
        assert_eq!(token_set_ratio("...", "dots"), 0);
        assert_eq!(token_set_ratio("", ""), 0);
    }
}
