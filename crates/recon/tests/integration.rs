use std::path::PathBuf;

use quorum_recon::config::ReconConfig;
use quorum_recon::load::{self, LoadOptions};
use quorum_recon::model::ReconOutput;
use quorum_recon::{build, ColumnType};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_and_run() -> ReconOutput {
    let dir = fixtures_dir();
    let config_toml = std::fs::read_to_string(dir.join("labels.recon.toml")).unwrap();
    let config = ReconConfig::from_toml(&config_toml).unwrap();

    let csv_data = std::fs::read_to_string(dir.join("classifications.csv")).unwrap();
    let opts = LoadOptions {
        user_column: Some("user_name".to_string()),
        columns: config.columns.iter().map(|c| c.name.clone()).collect(),
        ..LoadOptions::default()
    };
    let records = load::from_csv(&csv_data, &opts).unwrap();

    build(&config, &records).unwrap()
}

#[test]
fn end_to_end_tables_align() {
    let output = load_and_run();

    assert_eq!(
        output.reconciled.columns,
        vec!["location", "habitat", "specimen_id", "count"]
    );
    assert_eq!(output.reconciled.columns, output.explanations.columns);

    let ids: Vec<&String> = output.reconciled.rows.keys().collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
    for (record_id, row) in &output.reconciled.rows {
        assert_eq!(row.len(), 4);
        assert_eq!(output.explanations.rows[record_id].len(), 4);
    }
}

#[test]
fn end_to_end_text_ladder() {
    let output = load_and_run();

    // s1: three spellings squish to one key → unanimous, longest literal wins
    assert_eq!(
        output.explanations.get("s1", "location"),
        Some("Normalized unanimous match, 3 of 3 records")
    );
    assert_eq!(output.reconciled.get("s1", "location"), Some("cuyahoga falls."));

    // s2: substring containment → partial ratio, longer candidate wins
    assert_eq!(
        output.explanations.get("s2", "location"),
        Some("Partial ratio match on 3 records with 1 blank, score=100")
    );
    assert_eq!(output.reconciled.get("s2", "location"), Some("New York City"));

    // s3: nothing transcribed
    assert_eq!(
        output.explanations.get("s3", "location"),
        Some("All 2 records are blank")
    );
    assert_eq!(output.reconciled.get("s3", "location"), Some(""));
}

#[test]
fn end_to_end_peer_strategies() {
    let output = load_and_run();

    assert_eq!(
        output.explanations.get("s1", "habitat"),
        Some("Exact match, 2 of 3 records with 0 blanks")
    );
    assert_eq!(output.reconciled.get("s1", "habitat"), Some("meadow"));

    assert_eq!(
        output.explanations.get("s1", "specimen_id"),
        Some("All 3 records are the same")
    );
    assert_eq!(output.reconciled.get("s1", "specimen_id"), Some("KSP-0042"));

    assert_eq!(
        output.explanations.get("s1", "count"),
        Some("There were 3 numbers in 3 records with 0 non-numeric values excluded")
    );
    assert_eq!(output.reconciled.get("s1", "count"), Some("mean=4, mode=3, range=3-5"));

    assert_eq!(
        output.explanations.get("s2", "count"),
        Some("There was 1 number in 3 records with 1 non-numeric value excluded")
    );
    assert_eq!(output.reconciled.get("s2", "count"), Some("mean=2, mode=2, range=2-2"));
}

#[test]
fn end_to_end_summary() {
    let output = load_and_run();

    assert_eq!(output.summary.total_records, 3);
    assert_eq!(output.summary.total_cells, 12);
    assert_eq!(output.summary.by_column["location"]["unanimous"], 1);
    assert_eq!(output.summary.by_column["location"]["partial_ratio"], 1);
    assert_eq!(output.summary.by_column["location"]["all_blank"], 1);
}

#[test]
fn rerun_is_byte_identical() {
    let first = load_and_run();
    let second = load_and_run();

    let first_json = serde_json::to_string(&(&first.reconciled, &first.explanations)).unwrap();
    let second_json = serde_json::to_string(&(&second.reconciled, &second.explanations)).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn user_weights_steer_the_fuzzy_step() {
    let csv_data = std::fs::read_to_string(fixtures_dir().join("classifications.csv")).unwrap();
    let opts = LoadOptions {
        user_column: Some("user_name".to_string()),
        columns: vec!["location".to_string()],
        ..LoadOptions::default()
    };
    let records = load::from_csv(&csv_data, &opts).unwrap();

    let mut config = ReconConfig::default();
    config.set_column("location", ColumnType::Text);

    // bJones authored "New York City", the s2 partial-ratio candidate
    config.user_weights.insert("bjones".into(), -50);
    let distrusted = build(&config, &records).unwrap();
    assert_eq!(
        distrusted.explanations.get("s2", "location"),
        Some("Token set ratio match on 3 records with 1 blank, score=100")
    );
    assert_eq!(distrusted.reconciled.get("s2", "location"), Some("New York City"));

    config.user_weights.insert("bjones".into(), 0);
    let neutral = build(&config, &records).unwrap();
    assert_eq!(
        neutral.explanations.get("s2", "location"),
        Some("Partial ratio match on 3 records with 1 blank, score=100")
    );
}
