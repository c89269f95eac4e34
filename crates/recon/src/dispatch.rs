use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::model::{GroupedRecords, OutputTable, ReconMeta, ReconOutput};
use crate::summary::compute_summary;

/// Reconcile every (record, declared column) cell and assemble the two
/// row-aligned output tables.
///
/// Configuration problems abort before any group is touched. Each
/// strategy call sees only its own group plus the shared read-only
/// config, so cells are independent and the result is order-agnostic.
pub fn build(config: &ReconConfig, records: &GroupedRecords) -> Result<ReconOutput, ReconError> {
    config.validate()?;
    if config.columns.is_empty() {
        return Err(ReconError::ConfigValidation(
            "no column types declared, nothing to reconcile".into(),
        ));
    }

    let columns = config.sorted_columns();
    let column_names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

    let mut reconciled = OutputTable::new(column_names.clone());
    let mut explanations = OutputTable::new(column_names);
    let mut cells = Vec::with_capacity(records.len() * columns.len());

    for (record_id, fields) in records {
        let mut values = Vec::with_capacity(columns.len());
        let mut reasons = Vec::with_capacity(columns.len());

        for spec in &columns {
            // a record missing this column reconciles an empty group
            let group = fields
                .get(&spec.name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let cell = spec.column_type.reconcile(group, config);

            cells.push((spec.name.clone(), cell.kind));
            values.push(cell.value);
            reasons.push(cell.explanation);
        }

        reconciled.rows.insert(record_id.clone(), values);
        explanations.rows.insert(record_id.clone(), reasons);
    }

    let summary = compute_summary(records.len(), &cells);

    Ok(ReconOutput {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        reconciled,
        explanations,
    })
}
