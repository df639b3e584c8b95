//! Integration tests for the cleaning pipeline.
//!
//! These tests drive the public API end to end, from CSV fixtures through the
//! pipeline to the files written by the report writer.

use autoclean::{
    Cell, CleaningConfig, CleaningError, CleaningPipeline, CleaningStage, Column, ColumnType,
    ImputationStrategy, IssueKind, ProgressUpdate, ReportWriter, Table, TypeInferencer,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::{DataFrame, SerReader};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(path: &Path) -> DataFrame {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn load_fixture(filename: &str) -> Table {
    let df = load_csv(&fixtures_path().join(filename));
    Table::from_dataframe(&df).expect("fixture is a valid table")
}

fn clean(table: &Table) -> autoclean::CleaningResult {
    CleaningPipeline::builder()
        .build()
        .unwrap()
        .run(table)
        .expect("pipeline should succeed")
}

fn text_at(table: &Table, column: &str, row: usize) -> Option<String> {
    table.column(column).unwrap().cells()[row]
        .as_text()
        .map(str::to_string)
}

// ============================================================================
// Full Pipeline Tests with the Customers Fixture
// ============================================================================

#[test]
fn test_customers_fixture_end_to_end() {
    let table = load_fixture("customers.csv");
    assert_eq!(table.height(), 6);

    let result = clean(&table);
    let report = &result.report;
    let cleaned = &result.cleaned_table;

    // The fourth record repeats the first up to case and whitespace
    assert_eq!(report.rows_before, 6);
    assert_eq!(report.rows_after, 5);
    assert_eq!(report.duplicate_records_removed, 1);
    assert_eq!(report.duplicate_groups[0].kept, 0);
    assert_eq!(report.duplicate_groups[0].dropped, vec![3]);

    let types: Vec<(String, ColumnType)> = report
        .columns
        .iter()
        .map(|c| (c.name.clone(), c.column_type))
        .collect();
    assert_eq!(
        types,
        vec![
            ("id".to_string(), ColumnType::Integer),
            ("name".to_string(), ColumnType::Categorical),
            ("email".to_string(), ColumnType::Email),
            ("age".to_string(), ColumnType::Integer),
            ("signup".to_string(), ColumnType::Date),
            ("active".to_string(), ColumnType::Boolean),
        ]
    );

    // Sanitization: trimmed, markers and blanks became missing
    assert_eq!(text_at(cleaned, "name", 4).as_deref(), Some("Eve"));
    assert_eq!(report.column("age").unwrap().missing_count_before, 2);
    assert_eq!(report.column("email").unwrap().missing_count_before, 1);

    // Emails are lowercased after deduplication
    assert_eq!(text_at(cleaned, "email", 0).as_deref(), Some("alice@example.com"));
    assert_eq!(text_at(cleaned, "email", 2).as_deref(), Some("carol@example.com"));
    assert_eq!(report.column("email").unwrap().changes.emails_normalized, 2);

    // Imputation per type
    assert_eq!(text_at(cleaned, "age", 1).as_deref(), Some("34"));
    assert_eq!(text_at(cleaned, "age", 4).as_deref(), Some("34"));
    assert_eq!(text_at(cleaned, "signup", 2).as_deref(), Some("2024-02-10"));
    assert_eq!(text_at(cleaned, "active", 4).as_deref(), Some("no"));
    assert_eq!(text_at(cleaned, "email", 3).as_deref(), Some("alice@example.com"));

    let signup = report.column("signup").unwrap();
    assert_eq!(
        signup.imputation.as_ref().unwrap().strategy,
        ImputationStrategy::MedianDate
    );
    assert_eq!(signup.date_format.as_deref(), Some("%Y-%m-%d"));

    assert_eq!(report.total_imputed(), 5);
    assert!(report.score_after > report.score_before);
    assert_eq!(report.overall_score, report.score_after);
    assert_eq!(report.issues[0].kind, IssueKind::DuplicateRecords);
}

#[test]
fn test_no_missing_cells_after_cleaning() {
    let result = clean(&load_fixture("customers.csv"));

    for column in result.cleaned_table.columns() {
        assert_eq!(
            column.missing_count(),
            0,
            "column '{}' still has missing cells",
            column.name()
        );
    }
    assert!(
        result
            .report
            .columns
            .iter()
            .all(|c| c.missing_count_after == 0)
    );
}

#[test]
fn test_cleaning_is_idempotent() {
    let first = clean(&load_fixture("customers.csv"));
    let second = clean(&first.cleaned_table);

    assert_eq!(second.cleaned_table, first.cleaned_table);
    assert_eq!(second.report.duplicate_records_removed, 0);
    assert_eq!(second.report.total_imputed(), 0);
}

#[test]
fn test_cleaning_is_deterministic() {
    let table = load_fixture("customers.csv");
    let pipeline = CleaningPipeline::builder().build().unwrap();

    let a = pipeline.run(&table).unwrap();
    let b = pipeline.run(&table).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Documented Scenarios
// ============================================================================

#[test]
fn test_small_table_scenario() {
    let table = Table::from_rows(
        &["name", "age"],
        &[
            vec![Some("A"), Some("10")],
            vec![Some("A"), Some("20")],
            vec![Some("B"), Some("")],
            vec![Some(""), Some("40")],
        ],
    )
    .unwrap();

    let result = clean(&table);
    let report = &result.report;

    assert_eq!(report.duplicate_records_removed, 0);
    assert_eq!(result.cleaned_table.height(), 4);

    let age = report.column("age").unwrap();
    assert_eq!(age.column_type, ColumnType::Integer);
    assert_eq!(text_at(&result.cleaned_table, "age", 2).as_deref(), Some("20"));

    let name = report.column("name").unwrap();
    assert_eq!(name.column_type, ColumnType::Categorical);
    assert_eq!(name.imputation.as_ref().unwrap().strategy, ImputationStrategy::Mode);
    assert_eq!(text_at(&result.cleaned_table, "name", 3).as_deref(), Some("A"));
}

#[test]
fn test_type_inference_examples() {
    let config = CleaningConfig::default();
    let inferencer = TypeInferencer::new(&config);

    let flags = Column::from_values("flag", [Some("0"), Some("1"), Some("0"), Some("1")]);
    assert_eq!(inferencer.infer(&flags), ColumnType::Boolean);

    let amounts = Column::from_values("amount", [Some("1"), Some("2"), Some("3.5")]);
    assert_eq!(inferencer.infer(&amounts), ColumnType::Float);
}

#[test]
fn test_integer_median_fill() {
    let table = Table::new(vec![Column::from_values(
        "score",
        [Some("10"), None, Some("20"), Some("30")],
    )])
    .unwrap();

    let result = clean(&table);
    assert_eq!(text_at(&result.cleaned_table, "score", 1).as_deref(), Some("20"));
}

#[test]
fn test_empty_records_collapse() {
    let table = Table::from_rows(
        &["a", "b"],
        &[
            vec![None, None],
            vec![Some(""), Some("  ")],
            vec![Some("x"), Some("1")],
        ],
    )
    .unwrap();

    let result = clean(&table);
    assert_eq!(result.report.duplicate_records_removed, 1);
    assert_eq!(result.cleaned_table.height(), 2);
}

#[test]
fn test_zero_row_input() {
    let table = Table::empty(["a", "b", "c"]).unwrap();

    let result = clean(&table);
    assert!(result.report.empty_input);
    assert_eq!(result.report.overall_score, 0.0);
    assert_eq!(result.report.issues[0].kind, IssueKind::EmptyInput);
    assert_eq!(result.cleaned_table.height(), 0);
    assert_eq!(result.cleaned_table.column_names(), vec!["a", "b", "c"]);

    let names: Vec<&str> = result.report.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(result.report.total_imputed(), 0);
}

#[test]
fn test_zero_column_input() {
    let result = clean(&Table::default());

    assert!(result.report.empty_input);
    assert_eq!(result.report.overall_score, 0.0);
    assert_eq!(result.report.column_count, 0);
    assert!(result.report.columns.is_empty());
    assert_eq!(result.cleaned_table.width(), 0);
}

#[test]
fn test_fully_imputed_table_is_not_perfect() {
    let table = Table::from_rows(
        &["a", "b"],
        &[vec![None::<&str>, None], vec![None, None], vec![None, None]],
    )
    .unwrap();

    let result = clean(&table);
    let report = &result.report;

    assert_eq!(report.duplicate_records_removed, 2);
    assert_eq!(
        result.cleaned_table.row(0),
        vec![&Cell::text("Unknown"), &Cell::text("Unknown")]
    );
    // Every value was made up, so completeness stays at 0
    let a = report.column("a").unwrap();
    assert_eq!(a.missing_count_after, 0);
    assert_eq!(a.score_after.missing_count, 1);
    assert_eq!(a.score_after.completeness, 0.0);
    assert!(report.score_after < 100.0);
    assert!((report.score_after - 200.0 / 3.0).abs() < 1e-9);
    assert!((report.score_before - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_malformed_table_is_rejected() {
    let json = r#"{"columns":[
        {"name":"a","cells":[{"text":"1"},{"text":"2"}]},
        {"name":"b","cells":[{"text":"x"}]}
    ]}"#;
    let table: Table = serde_json::from_str(json).unwrap();

    let err = CleaningPipeline::builder()
        .build()
        .unwrap()
        .run(&table)
        .unwrap_err();
    assert!(err.is_malformed_input());
    assert!(matches!(err, CleaningError::MalformedTable { .. }));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let content = std::fs::read_to_string(fixtures_path().join("strict_config.json")).unwrap();
    let config: CleaningConfig = serde_json::from_str(&content).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.max_categorical_distinct, 2);
    // Fields left out keep their defaults
    assert!(config.trim_whitespace);

    let table = Table::new(vec![
        Column::from_values("name", [Some("A"), Some("B"), Some("C"), Some("A")]),
        Column::from_values("notes", [None::<&str>, None, None, None]),
        Column::from_values(
            "email",
            [Some("Ann@Mail.com"), Some("bo@mail.com"), None, Some("cy@mail.com")],
        ),
    ])
    .unwrap();

    let result = CleaningPipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run(&table)
        .unwrap();

    // Three distinct values exceed the limit of two
    assert_eq!(
        result.report.column("name").unwrap().column_type,
        ColumnType::Text
    );
    assert_eq!(
        text_at(&result.cleaned_table, "notes", 0).as_deref(),
        Some("(none)")
    );
    assert_eq!(
        text_at(&result.cleaned_table, "email", 0).as_deref(),
        Some("Ann@Mail.com")
    );
}

// ============================================================================
// Progress Reporting
// ============================================================================

#[test]
fn test_progress_stages_in_order() {
    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);

    let pipeline = CleaningPipeline::builder()
        .on_progress(move |update| sink.lock().unwrap().push(update))
        .build()
        .unwrap();
    pipeline.run(&load_fixture("customers.csv")).unwrap();

    let updates = updates.lock().unwrap();
    let stages: Vec<CleaningStage> = updates.iter().map(|u| u.stage).collect();
    assert_eq!(
        stages,
        vec![
            CleaningStage::Validating,
            CleaningStage::Sanitizing,
            CleaningStage::TypeInference,
            CleaningStage::Deduplication,
            CleaningStage::Scoring,
            CleaningStage::Normalization,
            CleaningStage::Imputation,
            CleaningStage::Reporting,
            CleaningStage::Complete,
        ]
    );
    assert!(updates.windows(2).all(|w| w[0].progress <= w[1].progress));
    assert_eq!(updates.last().unwrap().progress, 1.0);
}

// ============================================================================
// DataFrames and Output Files
// ============================================================================

#[test]
fn test_dataframe_round_trip() {
    let table = Table::new(vec![
        Column::from_values("city", [Some("Oslo"), None, Some(" Rome ")]),
        Column::from_values("zip", [Some("0150"), Some("00184"), None]),
    ])
    .unwrap();

    let df = table.to_dataframe().unwrap();
    assert_eq!(df.shape(), (3, 2));
    assert_eq!(Table::from_dataframe(&df).unwrap(), table);
}

#[test]
fn test_written_csv_reloads_as_cleaned_table() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = clean(&load_fixture("customers.csv"));

    let writer = ReportWriter::new(dir.path().to_path_buf(), Some("customers".to_string()));
    let files = writer.write(&result).unwrap();
    assert!(files.report_json.exists());
    assert_eq!(
        files.cleaned_csv.file_name().unwrap().to_str(),
        Some("customers_cleaned.csv")
    );

    let reloaded = Table::from_dataframe(&load_csv(&files.cleaned_csv)).unwrap();
    assert_eq!(reloaded, result.cleaned_table);
    assert!(
        reloaded
            .columns()
            .iter()
            .flat_map(|c| c.cells())
            .all(|cell| matches!(cell, Cell::Text(_)))
    );
}
