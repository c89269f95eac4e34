//! Parse already-read CSV or JSON text into grouped transcriptions.
//! Takes `&str`, never a path: file IO belongs to the caller.

use std::collections::BTreeMap;

use crate::error::ReconError;
use crate::model::{GroupedRecords, Transcription};

/// How rows are grouped and attributed.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Column holding the record id rows are grouped by.
    pub group_by: String,
    /// Column holding the authoring user id, if any.
    pub user_column: Option<String>,
    /// Columns to extract into groups (the declared columns).
    pub columns: Vec<String>,
    /// Drop repeated (record, user) rows, keeping the first.
    pub dedup_by_user: bool,
    /// Cap transcriptions per record, first rows win.
    pub keep_count: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            group_by: "subject_id".to_string(),
            user_column: None,
            columns: Vec::new(),
            dedup_by_user: false,
            keep_count: None,
        }
    }
}

/// One flat input row: record id, optional user, declared column values.
struct Row {
    record_id: String,
    user: Option<String>,
    values: Vec<String>,
}

pub fn from_csv(data: &str, opts: &LoadOptions) -> Result<GroupedRecords, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn {
                column: name.to_string(),
            })
    };

    let group_idx = idx(&opts.group_by)?;
    let user_idx = match &opts.user_column {
        Some(column) => Some(idx(column)?),
        None => None,
    };
    let column_idx: Vec<usize> = opts
        .columns
        .iter()
        .map(|c| idx(c))
        .collect::<Result<_, _>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        rows.push(Row {
            record_id: record.get(group_idx).unwrap_or("").to_string(),
            user: user_idx.map(|i| record.get(i).unwrap_or("").to_string()),
            values: column_idx
                .iter()
                .map(|&i| record.get(i).unwrap_or("").to_string())
                .collect(),
        });
    }

    Ok(group_rows(rows, opts))
}

pub fn from_json(data: &str, opts: &LoadOptions) -> Result<GroupedRecords, ReconError> {
    let objects: Vec<BTreeMap<String, serde_json::Value>> =
        serde_json::from_str(data).map_err(|e| ReconError::Io(e.to_string()))?;

    let mut rows = Vec::new();
    for object in &objects {
        let record_id = object
            .get(&opts.group_by)
            .map(value_to_string)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ReconError::MissingColumn {
                column: opts.group_by.clone(),
            })?;
        let user = opts
            .user_column
            .as_ref()
            .map(|c| object.get(c).map(value_to_string).unwrap_or_default());
        // a declared column absent from an object is just blank
        let values = opts
            .columns
            .iter()
            .map(|c| object.get(c).map(value_to_string).unwrap_or_default())
            .collect();
        rows.push(Row {
            record_id,
            user,
            values,
        });
    }

    Ok(group_rows(rows, opts))
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Group rows by record id in file order, applying user dedup and the
/// per-record cap.
fn group_rows(rows: Vec<Row>, opts: &LoadOptions) -> GroupedRecords {
    let mut records = GroupedRecords::new();
    let mut seen_users: Vec<(String, String)> = Vec::new();
    let mut kept: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows {
        if opts.dedup_by_user {
            if let Some(user) = &row.user {
                let pair = (row.record_id.clone(), user.clone());
                if seen_users.contains(&pair) {
                    continue;
                }
                seen_users.push(pair);
            }
        }

        let count = kept.entry(row.record_id.clone()).or_insert(0);
        if let Some(cap) = opts.keep_count {
            if *count >= cap {
                continue;
            }
        }
        *count += 1;

        let fields = records.entry(row.record_id).or_default();
        for (column, value) in opts.columns.iter().zip(row.values) {
            fields
                .entry(column.clone())
                .or_default()
                .push(Transcription {
                    value,
                    user: row.user.clone(),
                });
        }
    }

    records
}
