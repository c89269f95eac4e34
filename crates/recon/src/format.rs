//! Explanation wording helpers shared by every strategy.
//!
//! Counts of zero take the plural form ("0 records", "0 blanks").

/// "record" → "records" for any count other than exactly one.
pub fn pluralize(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Article for a blank-count sentence: "The 1 record…", "All 3 records…".
pub fn the_all(count: usize) -> &'static str {
    if count == 1 {
        "The"
    } else {
        "All"
    }
}

pub fn is_are(count: usize) -> &'static str {
    if count == 1 {
        "is"
    } else {
        "are"
    }
}

pub fn was_were(count: usize) -> &'static str {
    if count == 1 {
        "was"
    } else {
        "were"
    }
}

/// The shared "all entries are blank" explanation.
pub fn blank_explanation(count: usize) -> String {
    format!(
        "{} {} {} {} blank",
        the_all(count),
        count,
        pluralize(count, "record"),
        is_are(count)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_only_at_one() {
        assert_eq!(pluralize(0, "blank"), "blanks");
        assert_eq!(pluralize(1, "blank"), "blank");
        assert_eq!(pluralize(2, "blank"), "blanks");
    }

    #[test]
    fn blank_sentence_agrees() {
        assert_eq!(blank_explanation(1), "The 1 record is blank");
        assert_eq!(blank_explanation(3), "All 3 records are blank");
    }
}
