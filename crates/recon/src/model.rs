use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One contributor's submitted value for one field of one record.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub value: String,
    pub user: Option<String>,
}

impl Transcription {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            user: None,
        }
    }

    pub fn by(value: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            user: Some(user.into()),
        }
    }
}

/// All transcriptions for one (record, column) pair, in authoring order.
/// The order is load-bearing: fuzzy tie-breaks fall back to it.
pub type TranscriptionGroup = Vec<Transcription>;

/// Pre-grouped transcriptions: record id → column name → group.
pub type GroupedRecords = BTreeMap<String, BTreeMap<String, TranscriptionGroup>>;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Longest literal variant among entries sharing a normalized form,
/// plus how many entries share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactScore {
    pub value: String,
    pub count: usize,
}

/// One weighted partial-ratio candidate.
#[derive(Debug, Clone)]
pub struct FuzzyRatioScore {
    pub score: i64,
    pub value: String,
}

/// One token-set-ratio candidate.
#[derive(Debug, Clone)]
pub struct FuzzySetScore {
    pub score: i64,
    pub value: String,
    pub tokens: usize,
}

// ---------------------------------------------------------------------------
// Reconciliation result
// ---------------------------------------------------------------------------

/// How a cell was decided. One bucket per explanation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Unanimous,
    Majority,
    Onesie,
    PartialRatio,
    TokenSetRatio,
    NumericStats,
    Tie,
    Mismatch,
    NoMatch,
    AllBlank,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unanimous => write!(f, "unanimous"),
            Self::Majority => write!(f, "majority"),
            Self::Onesie => write!(f, "onesie"),
            Self::PartialRatio => write!(f, "partial_ratio"),
            Self::TokenSetRatio => write!(f, "token_set_ratio"),
            Self::NumericStats => write!(f, "numeric_stats"),
            Self::Tie => write!(f, "tie"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::NoMatch => write!(f, "no_match"),
            Self::AllBlank => write!(f, "all_blank"),
        }
    }
}

/// The reconciled value for one cell plus its audit trail. Every group
/// yields exactly one of these; an all-blank group is a result, not an
/// error.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub kind: MatchKind,
    pub explanation: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Output tables
// ---------------------------------------------------------------------------

/// Row-aligned output keyed by record id. The reconciled-value table and
/// the explanation table are two instances sharing the same row index and
/// column set, meant to be zipped row-by-row downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTable {
    pub columns: Vec<String>,
    pub rows: BTreeMap<String, Vec<String>>,
}

impl OutputTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: BTreeMap::new(),
        }
    }

    /// Cell lookup by record id and column name.
    pub fn get(&self, record_id: &str, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(record_id)?.get(idx).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_records: usize,
    pub total_cells: usize,
    pub exact_matches: usize,
    pub fuzzy_matches: usize,
    pub onesies: usize,
    pub numeric_stats: usize,
    pub all_blank: usize,
    pub problems: usize,
    /// column → match kind → count.
    pub by_column: BTreeMap<String, BTreeMap<String, usize>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconOutput {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub reconciled: OutputTable,
    pub explanations: OutputTable,
}
