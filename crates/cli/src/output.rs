//! CSV writers for the engine's row-aligned tables and the grouped input.

use quorum_recon::model::OutputTable;
use quorum_recon::GroupedRecords;

use crate::exit_codes::EXIT_ERROR;
use crate::CliError;

fn csv_err(err: impl std::fmt::Display) -> CliError {
    CliError::new(EXIT_ERROR, format!("CSV write error: {err}"))
}

/// Render an output table as CSV, record ids in the first column.
pub fn table_to_csv(table: &OutputTable, group_by: &str) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![group_by.to_string()];
    header.extend(table.columns.iter().cloned());
    writer.write_record(&header).map_err(csv_err)?;

    for (record_id, row) in &table.rows {
        let mut fields = vec![record_id.clone()];
        fields.extend(row.iter().cloned());
        writer.write_record(&fields).map_err(csv_err)?;
    }

    finish(writer)
}

/// Render the grouped input back out flat, one row per transcription,
/// for eyeballing next to the reconciled table.
pub fn unreconciled_to_csv(
    records: &GroupedRecords,
    columns: &[String],
    group_by: &str,
    user_column: Option<&str>,
) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![group_by.to_string()];
    if let Some(user_column) = user_column {
        header.push(user_column.to_string());
    }
    header.extend(columns.iter().cloned());
    writer.write_record(&header).map_err(csv_err)?;

    for (record_id, fields) in records {
        let depth = columns
            .iter()
            .filter_map(|c| fields.get(c).map(Vec::len))
            .max()
            .unwrap_or(0);

        for i in 0..depth {
            let mut row = vec![record_id.clone()];
            if user_column.is_some() {
                let user = columns
                    .iter()
                    .filter_map(|c| fields.get(c).and_then(|g| g.get(i)))
                    .find_map(|t| t.user.clone())
                    .unwrap_or_default();
                row.push(user);
            }
            for column in columns {
                let value = fields
                    .get(column)
                    .and_then(|g| g.get(i))
                    .map(|t| t.value.clone())
                    .unwrap_or_default();
                row.push(value);
            }
            writer.write_record(&row).map_err(csv_err)?;
        }
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, CliError> {
    let bytes = writer.into_inner().map_err(csv_err)?;
    String::from_utf8(bytes).map_err(csv_err)
}
