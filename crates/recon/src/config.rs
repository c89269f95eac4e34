use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ReconError;
use crate::registry::ColumnType;

// ---------------------------------------------------------------------------
// Column declarations
// ---------------------------------------------------------------------------

/// How one column is reconciled. Built once from schema + overrides,
/// immutable during reconciliation.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub order: usize,
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Shared, read-only configuration for one reconciliation run.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    #[serde(default)]
    pub name: String,
    /// Lowercased user id → weight added to that user's partial-ratio
    /// candidates. Negative weights distrust a user.
    #[serde(default)]
    pub user_weights: BTreeMap<String, i64>,
    /// Cutoff for partial-ratio matching, 0-100 inclusive.
    #[serde(default = "default_fuzzy_ratio_threshold")]
    pub fuzzy_ratio_threshold: i64,
    /// Cutoff for token-set matching, 0-100 inclusive.
    #[serde(default = "default_fuzzy_set_threshold")]
    pub fuzzy_set_threshold: i64,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

fn default_fuzzy_ratio_threshold() -> i64 {
    90
}

fn default_fuzzy_set_threshold() -> i64 {
    50
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            user_weights: BTreeMap::new(),
            fuzzy_ratio_threshold: default_fuzzy_ratio_threshold(),
            fuzzy_set_threshold: default_fuzzy_set_threshold(),
            columns: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let mut config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.user_weights = lowercase_keys(config.user_weights);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (name, value) in [
            ("fuzzy-ratio-threshold", self.fuzzy_ratio_threshold),
            ("fuzzy-set-threshold", self.fuzzy_set_threshold),
        ] {
            if !(0..=100).contains(&value) {
                return Err(ReconError::ThresholdOutOfRange { name, value });
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for spec in &self.columns {
            if seen.contains(&spec.name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "column \"{}\" is declared twice",
                    spec.name
                )));
            }
            seen.push(&spec.name);
        }

        Ok(())
    }

    /// The weight configured for a user, 0 when unknown. Lookup is
    /// case-insensitive; stored keys are already lowercased.
    pub fn weight_for(&self, user: &str) -> i64 {
        self.user_weights
            .get(&user.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Declared columns in reconciliation order (order index, then name).
    pub fn sorted_columns(&self) -> Vec<&ColumnSpec> {
        let mut columns: Vec<&ColumnSpec> = self.columns.iter().collect();
        columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        columns
    }

    /// Add or override a column declaration. Overriding keeps the original
    /// order slot; new columns go after everything already declared.
    pub fn set_column(&mut self, name: &str, column_type: ColumnType) {
        if let Some(spec) = self.columns.iter_mut().find(|s| s.name == name) {
            spec.column_type = column_type;
            return;
        }
        let order = self.columns.iter().map(|s| s.order + 1).max().unwrap_or(0);
        self.columns.push(ColumnSpec {
            name: name.to_string(),
            column_type,
            order,
        });
    }
}

fn lowercase_keys(weights: BTreeMap<String, i64>) -> BTreeMap<String, i64> {
    weights
        .into_iter()
        .map(|(user, weight)| (user.to_lowercase(), weight))
        .collect()
}

/// Parse the CLI's `"user:weight,user:weight"` form. User ids are
/// lowercased; a non-integer weight is a fatal configuration error.
pub fn parse_user_weights(spec: &str) -> Result<BTreeMap<String, i64>, ReconError> {
    let mut weights = BTreeMap::new();
    for entry in spec.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (user, weight) = entry
            .split_once(':')
            .ok_or_else(|| ReconError::BadWeight(entry.to_string()))?;
        let weight: i64 = weight
            .trim()
            .parse()
            .map_err(|_| ReconError::BadWeight(entry.to_string()))?;
        weights.insert(user.trim().to_lowercase(), weight);
    }
    Ok(weights)
}

/// Parse the CLI's `"column:type,column:type"` form against the registry.
pub fn parse_column_types(spec: &str) -> Result<Vec<(String, ColumnType)>, ReconError> {
    let mut parsed = Vec::new();
    for entry in spec.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (name, tag) = entry.split_once(':').ok_or_else(|| {
            ReconError::ConfigValidation(format!(
                "bad column type \"{entry}\" (expected column:type)"
            ))
        })?;
        let column_type = ColumnType::from_tag(tag.trim())
            .ok_or_else(|| ReconError::UnknownColumnType(tag.trim().to_string()))?;
        parsed.push((name.trim().to_string(), column_type));
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
