use serde::{Deserialize, Serialize};

use crate::config::ReconConfig;
use crate::model::{Reconciliation, Transcription};
use crate::strategies;

/// The closed set of reconciliation strategies, keyed by a stable tag.
///
/// Column declarations name a tag; an unknown tag is rejected while the
/// configuration is built, before any group is reconciled. Columns without
/// a declared type are not reconciled at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Free text: weighted fuzzy reconciliation.
    Text,
    /// A fixed list of options: majority vote, ties reported.
    Select,
    /// All entries in a group must be the same.
    Same,
    /// Mean, mode, and range of the numeric entries.
    Mmr,
}

impl ColumnType {
    pub const ALL: [ColumnType; 4] = [Self::Text, Self::Select, Self::Same, Self::Mmr];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(Self::Text),
            "select" => Some(Self::Select),
            "same" => Some(Self::Same),
            "mmr" => Some(Self::Mmr),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Select => "select",
            Self::Same => "same",
            Self::Mmr => "mmr",
        }
    }

    /// Every valid tag, comma-separated, for error messages.
    pub fn tag_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.tag())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Reconcile one group with this column's strategy. The strategy sees
    /// only its own group plus the shared read-only config.
    pub fn reconcile(&self, group: &[Transcription], config: &ReconConfig) -> Reconciliation {
        match self {
            Self::Text => strategies::text::reconcile(group, config),
            Self::Select => strategies::select::reconcile(group, config),
            Self::Same => strategies::same::reconcile(group, config),
            Self::Mmr => strategies::numeric::reconcile(group, config),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for column_type in ColumnType::ALL {
            assert_eq!(ColumnType::from_tag(column_type.tag()), Some(column_type));
        }
        assert_eq!(ColumnType::from_tag("guess"), None);
    }

    #[test]
    fn serde_uses_tags() {
        let json = serde_json::to_string(&ColumnType::Mmr).unwrap();
        assert_eq!(json, "\"mmr\"");
        let parsed: ColumnType = serde_json::from_str("\"select\"").unwrap();
        assert_eq!(parsed, ColumnType::Select);
    }

    #[test]
    fn tag_list_names_all_types() {
        assert_eq!(ColumnType::tag_list(), "text, select, same, mmr");
    }
}
