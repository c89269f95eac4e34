use std::collections::BTreeMap;

use crate::model::{MatchKind, ReconSummary};

/// Roll up per-cell outcomes into run totals and per-column counts.
pub fn compute_summary(total_records: usize, cells: &[(String, MatchKind)]) -> ReconSummary {
    let mut by_column: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut exact_matches = 0;
    let mut fuzzy_matches = 0;
    let mut onesies = 0;
    let mut numeric_stats = 0;
    let mut all_blank = 0;
    let mut problems = 0;

    for (column, kind) in cells {
        *by_column
            .entry(column.clone())
            .or_default()
            .entry(kind.to_string())
            .or_insert(0) += 1;

        match kind {
            MatchKind::Unanimous | MatchKind::Majority => exact_matches += 1,
            MatchKind::PartialRatio | MatchKind::TokenSetRatio => fuzzy_matches += 1,
            MatchKind::Onesie => onesies += 1,
            MatchKind::NumericStats => numeric_stats += 1,
            MatchKind::AllBlank => all_blank += 1,
            MatchKind::Tie | MatchKind::Mismatch | MatchKind::NoMatch => problems += 1,
        }
    }

    ReconSummary {
        total_records,
        total_cells: cells.len(),
        exact_matches,
        fuzzy_matches,
        onesies,
        numeric_stats,
        all_blank,
        problems,
        by_column,
    }
}
