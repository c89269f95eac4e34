//! `quorum run` / `quorum validate`: argument structs and command bodies.

use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use quorum_recon::config::{parse_column_types, parse_user_weights};
use quorum_recon::load::{self, LoadOptions};
use quorum_recon::{build, ReconConfig, ReconError};
use tracing::{debug, info};

use crate::exit_codes::{EXIT_ERROR, EXIT_INPUT, EXIT_INVALID_CONFIG, EXIT_USAGE};
use crate::output::{table_to_csv, unreconciled_to_csv};
use crate::CliError;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML config file with columns, weights, and thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column types as "name:type,name:type". Repeatable; overrides the
    /// config file. Valid types: text, select, same, mmr.
    #[arg(long = "column-types", value_name = "LIST")]
    column_types: Vec<String>,

    /// User weights as "user:weight,user:weight", added to that user's
    /// partial-ratio scores. Negative weights distrust a user.
    #[arg(long = "user-weights", value_name = "LIST")]
    user_weights: Option<String>,

    /// Cutoff for partial ratio matching (0-100)
    #[arg(long, value_name = "N")]
    fuzzy_ratio_threshold: Option<i64>,

    /// Cutoff for token set matching (0-100)
    #[arg(long, value_name = "N")]
    fuzzy_set_threshold: Option<i64>,
}

#[derive(Args)]
pub struct RunArgs {
    /// The input file
    input: PathBuf,

    /// Input format
    #[arg(long, short = 'f', value_enum, default_value = "csv")]
    format: Format,

    #[command(flatten)]
    config: ConfigArgs,

    /// Column the rows are grouped by
    #[arg(long, default_value = "subject_id")]
    group_by: String,

    /// Column holding the transcriber's user id
    #[arg(long)]
    user_column: Option<String>,

    /// Keep at most N transcriptions per record (first rows win)
    #[arg(long, value_name = "N")]
    keep_count: Option<usize>,

    /// Drop repeated rows from the same user on the same record
    #[arg(long)]
    dedup_users: bool,

    /// Write reconciled values to this CSV file
    #[arg(long, short = 'r')]
    reconciled: Option<PathBuf>,

    /// Write explanations to this CSV file
    #[arg(long, short = 'e')]
    explanations: Option<PathBuf>,

    /// Write the grouped input back out to this CSV file
    #[arg(long, short = 'u')]
    unreconciled: Option<PathBuf>,

    /// Write the full result JSON to this file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print the full result JSON to stdout
    #[arg(long)]
    json: bool,
}

fn recon_err(err: ReconError) -> CliError {
    let code = match err {
        ReconError::Io(_) => EXIT_INPUT,
        _ => EXIT_INVALID_CONFIG,
    };
    CliError::new(code, err.to_string())
}

/// Assemble the run configuration: config file first, flags override.
fn build_config(args: &ConfigArgs) -> Result<ReconConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::new(EXIT_USAGE, format!("cannot read {}: {e}", path.display()))
            })?;
            ReconConfig::from_toml(&text).map_err(recon_err)?
        }
        None => ReconConfig::default(),
    };

    if let Some(spec) = &args.user_weights {
        let weights = parse_user_weights(spec).map_err(recon_err)?;
        config.user_weights.extend(weights);
    }
    if let Some(threshold) = args.fuzzy_ratio_threshold {
        config.fuzzy_ratio_threshold = threshold;
    }
    if let Some(threshold) = args.fuzzy_set_threshold {
        config.fuzzy_set_threshold = threshold;
    }
    for spec in &args.column_types {
        for (name, column_type) in parse_column_types(spec).map_err(recon_err)? {
            config.set_column(&name, column_type);
        }
    }

    config.validate().map_err(recon_err)?;
    Ok(config)
}

pub fn cmd_run(args: &RunArgs) -> Result<(), CliError> {
    let config = build_config(&args.config)?;
    if config.columns.is_empty() {
        return Err(CliError::new(
            EXIT_INVALID_CONFIG,
            "no column types declared (use --column-types or --config)",
        ));
    }

    let data = fs::read_to_string(&args.input).map_err(|e| {
        CliError::new(
            EXIT_USAGE,
            format!("cannot read {}: {e}", args.input.display()),
        )
    })?;

    let opts = LoadOptions {
        group_by: args.group_by.clone(),
        user_column: args.user_column.clone(),
        columns: config.columns.iter().map(|c| c.name.clone()).collect(),
        dedup_by_user: args.dedup_users,
        keep_count: args.keep_count,
    };
    let records = match args.format {
        Format::Csv => load::from_csv(&data, &opts),
        Format::Json => load::from_json(&data, &opts),
    }
    .map_err(recon_err)?;
    info!(
        records = records.len(),
        columns = config.columns.len(),
        "loaded input"
    );

    let result = build(&config, &records).map_err(recon_err)?;
    for (column, kinds) in &result.summary.by_column {
        debug!(column = %column, kinds = ?kinds, "reconciled column");
    }

    if let Some(path) = &args.reconciled {
        let csv = table_to_csv(&result.reconciled, &args.group_by)?;
        write_file(path, &csv)?;
    }
    if let Some(path) = &args.explanations {
        let csv = table_to_csv(&result.explanations, &args.group_by)?;
        write_file(path, &csv)?;
    }
    if let Some(path) = &args.unreconciled {
        let csv = unreconciled_to_csv(
            &records,
            &result.reconciled.columns,
            &args.group_by,
            args.user_column.as_deref(),
        )?;
        write_file(path, &csv)?;
    }

    if args.output.is_some() || args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        if let Some(path) = &args.output {
            write_file(path, &json)?;
        }
        if args.json {
            println!("{json}");
        }
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "reconciled {} records x {} columns — {} exact, {} fuzzy, {} onesies, {} numeric, {} blank, {} problems",
        s.total_records,
        result.reconciled.columns.len(),
        s.exact_matches,
        s.fuzzy_matches,
        s.onesies,
        s.numeric_stats,
        s.all_blank,
        s.problems,
    );

    Ok(())
}

pub fn cmd_validate(args: &ConfigArgs) -> Result<(), CliError> {
    let config = build_config(args)?;
    let declared: Vec<String> = config
        .sorted_columns()
        .iter()
        .map(|c| format!("{}:{}", c.name, c.column_type))
        .collect();
    eprintln!(
        "valid: {} column(s) [{}], {} user weight(s), thresholds {}/{}",
        config.columns.len(),
        declared.join(", "),
        config.user_weights.len(),
        config.fuzzy_ratio_threshold,
        config.fuzzy_set_threshold,
    );
    Ok(())
}

fn write_file(path: &std::path::Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot write {}: {e}", path.display())))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_args() -> ConfigArgs {
        ConfigArgs {
            config: None,
            column_types: vec!["location:text,habitat:select".to_string()],
            user_weights: Some("aSmith:-50".to_string()),
            fuzzy_ratio_threshold: Some(95),
            fuzzy_set_threshold: None,
        }
    }

    #[test]
    fn flags_build_a_config() {
        let config = build_config(&config_args()).unwrap();
        assert_eq!(config.columns.len(), 2);
        assert_eq!(config.weight_for("ASMITH"), -50);
        assert_eq!(config.fuzzy_ratio_threshold, 95);
        assert_eq!(config.fuzzy_set_threshold, 50);
    }

    #[test]
    fn bad_weight_is_invalid_config() {
        let mut args = config_args();
        args.user_weights = Some("aSmith:friendly".to_string());
        let err = build_config(&args).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
    }

    #[test]
    fn unknown_type_tag_is_invalid_config() {
        let mut args = config_args();
        args.column_types = vec!["location:guess".to_string()];
        let err = build_config(&args).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
        assert!(err.message.contains("not a column type"));
    }

    #[test]
    fn threshold_out_of_range_is_invalid_config() {
        let mut args = config_args();
        args.fuzzy_ratio_threshold = Some(101);
        let err = build_config(&args).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
    }

    #[test]
    fn run_writes_output_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("classifications.csv");
        std::fs::write(
            &input,
            "subject_id,user_name,location,habitat\n\
             s1,asmith,Ohio,meadow\n\
             s1,bjones,ohio,meadow\n",
        )
        .unwrap();

        let reconciled = dir.path().join("reconciled.csv");
        let explanations = dir.path().join("explanations.csv");
        let args = RunArgs {
            input,
            format: Format::Csv,
            config: ConfigArgs {
                config: None,
                column_types: vec!["location:text,habitat:select".to_string()],
                user_weights: None,
                fuzzy_ratio_threshold: None,
                fuzzy_set_threshold: None,
            },
            group_by: "subject_id".to_string(),
            user_column: Some("user_name".to_string()),
            keep_count: None,
            dedup_users: false,
            reconciled: Some(reconciled.clone()),
            explanations: Some(explanations.clone()),
            unreconciled: None,
            output: None,
            json: false,
        };
        cmd_run(&args).unwrap();

        let reconciled = std::fs::read_to_string(reconciled).unwrap();
        assert_eq!(
            reconciled,
            "subject_id,location,habitat\ns1,Ohio,meadow\n"
        );
        let explanations = std::fs::read_to_string(explanations).unwrap();
        assert!(explanations.contains("Normalized unanimous match, 2 of 2 records"));
        assert!(explanations.contains("Exact unanimous match, 2 of 2 records"));
    }

    #[test]
    fn missing_input_file_is_usage_error() {
        let args = RunArgs {
            input: std::path::PathBuf::from("/nonexistent/input.csv"),
            format: Format::Csv,
            config: config_args(),
            group_by: "subject_id".to_string(),
            user_column: None,
            keep_count: None,
            dedup_users: false,
            reconciled: None,
            explanations: None,
            unreconciled: None,
            output: None,
            json: false,
        };
        let err = cmd_run(&args).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
    }
}
