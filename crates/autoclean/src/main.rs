//! CLI entry point for the autoclean pipeline.

use anyhow::{Result, anyhow};
use autoclean::{
    CleaningConfig, CleaningPipeline, CleaningResult, Column, DuplicateResolver, QualityScorer,
    ReportWriter, Sanitizer, Table, TypeInferencer,
};
use clap::Parser;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::{CsvParseOptions, DataFrame, SerReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Automatic cleaning and quality scoring for messy CSV files",
    long_about = "Cleans a CSV file: infers column types, removes duplicate records,\n\
                  fills missing values and scores data quality before and after.\n\n\
                  EXAMPLES:\n  \
                  # Clean a file into ./outputs\n  \
                  autoclean -i data.csv\n\n  \
                  # Preview inferred types and the input score\n  \
                  autoclean -i data.csv --dry-run\n\n  \
                  # Machine-readable report on stdout\n  \
                  autoclean -i data.csv --json | jq .overall_score"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Output directory for the cleaned CSV and the report
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Base name of the output files (defaults to the input file stem)
    #[arg(long)]
    output_name: Option<String>,

    /// JSON file with a cleaning configuration
    ///
    /// Fields left out take their default value. Flags below override it.
    #[arg(long)]
    config: Option<String>,

    /// Minimum distinct-value limit for categorical columns
    #[arg(long)]
    max_categorical: Option<usize>,

    /// Share of rows (0.0 - 1.0) that also bounds categorical columns
    #[arg(long)]
    categorical_ratio: Option<f64>,

    /// Fill value for text columns without any observed value
    #[arg(long)]
    placeholder: Option<String>,

    /// Date format to try, in chrono syntax; repeat to give several
    ///
    /// Replaces the built-in list when given.
    #[arg(long = "date-format")]
    date_formats: Vec<String>,

    /// Keep surrounding whitespace in values
    #[arg(long)]
    no_trim: bool,

    /// Keep email addresses as written
    #[arg(long)]
    no_email_normalization: bool,

    /// Output the JSON report to stdout instead of a human-readable summary
    ///
    /// Disables all logs so stdout only holds the report.
    #[arg(long)]
    json: bool,

    /// Show inferred types and the input score without writing files
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings, errors and the final result
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// With `json_output` nothing is initialized so stdout carries only JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;

    info!("Loading dataset from: {}", args.input);
    let df = load_csv(&args.input)?;
    let table = Table::from_dataframe(&df)?;
    info!(
        "Dataset loaded: {} rows x {} columns",
        table.height(),
        table.width()
    );

    if args.dry_run {
        return run_dry_run(&args, &config, &table);
    }

    let pipeline = CleaningPipeline::builder()
        .config(config)
        .on_progress(|update| {
            debug!("[{:>3.0}%] {}", update.progress * 100.0, update.message);
        })
        .build()?;

    let result = pipeline.run(&table)?;

    let output_name = args
        .output_name
        .clone()
        .unwrap_or_else(|| extract_file_stem(&args.input));
    let writer = ReportWriter::new(PathBuf::from(&args.output), Some(output_name));
    let files = writer.write(&result)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
    } else {
        print_human_readable_summary(&args, &result);
        println!("Cleaned data: {}", files.cleaned_csv.display());
        println!("Report:       {}", files.report_json.display());
    }

    Ok(())
}

/// Merge the optional config file with the command-line overrides.
fn build_config(args: &Args) -> Result<CleaningConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Could not read config file {}: {}", path, e))?;
            serde_json::from_str::<CleaningConfig>(&content)
                .map_err(|e| anyhow!("Invalid config file {}: {}", path, e))?
        }
        None => CleaningConfig::default(),
    };

    if let Some(max) = args.max_categorical {
        config.max_categorical_distinct = max;
    }
    if let Some(ratio) = args.categorical_ratio {
        config.categorical_ratio = ratio;
    }
    if let Some(placeholder) = &args.placeholder {
        config.placeholder_token = placeholder.clone();
    }
    if !args.date_formats.is_empty() {
        config.date_formats = args.date_formats.clone();
    }
    if args.no_trim {
        config.trim_whitespace = false;
    }
    if args.no_email_normalization {
        config.normalize_emails = false;
    }

    config.validate()?;
    Ok(config)
}

/// Preview inferred types and the input score without cleaning anything.
///
/// Output goes through `println!` so it shows at every log level.
fn run_dry_run(args: &Args, config: &CleaningConfig, table: &Table) -> Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of cleaning");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", table.height());
    println!("  Columns: {}", table.width());
    println!();

    if table.is_empty() {
        println!("  Input is empty; nothing to clean.");
        println!("{}", "=".repeat(80));
        return Ok(());
    }

    let (sanitized, _) = Sanitizer::new(config).sanitize(table);
    let profiles = TypeInferencer::new(config).profile_table(&sanitized);
    let dedupe = DuplicateResolver.dedupe(&sanitized);
    let missing: Vec<usize> = sanitized.columns().iter().map(Column::missing_count).collect();
    let score = QualityScorer::new(config).score(
        &sanitized,
        &profiles,
        &missing,
        dedupe.duplicate_count,
    );

    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<12} {:<10} {:<10} {:<10}",
        "Column", "Type", "Missing", "Distinct", "Score"
    );
    println!("{}", "-".repeat(66));
    for (profile, column_score) in profiles.iter().zip(&score.columns) {
        println!(
            "{:<20} {:<12} {:<10} {:<10} {:<10.2}",
            truncate_str(&profile.name, 19),
            profile.column_type,
            column_score.missing_count,
            profile.distinct_count,
            column_score.composite
        );
    }
    println!();

    println!("CLEANING PREVIEW");
    println!("{}", "-".repeat(40));
    if dedupe.duplicate_count > 0 {
        println!("  Will remove {} duplicate records", dedupe.duplicate_count);
    } else {
        println!("  No duplicate records found");
    }
    let missing_total: usize = missing.iter().sum();
    println!("  Will fill {} missing values (before deduplication)", missing_total);
    println!("  Quality score (input): {:.1}", score.overall);
    println!();

    let output_name = args
        .output_name
        .clone()
        .unwrap_or_else(|| extract_file_stem(&args.input));
    let files = ReportWriter::new(PathBuf::from(&args.output), Some(output_name)).output_files();
    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    println!("  - {}", files.cleaned_csv.display());
    println!("  - {}", files.report_json.display());
    println!();

    println!("{}", "=".repeat(80));
    println!("To clean the file, run without --dry-run");
    println!("{}", "=".repeat(80));

    Ok(())
}

fn print_human_readable_summary(args: &Args, result: &CleaningResult) {
    let report = &result.report;

    println!("\n{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!("Input: {}", args.input);
    println!();

    if report.empty_input {
        println!("Input has no rows or no columns; nothing was cleaned.");
        println!("{}", "=".repeat(80));
        return;
    }

    println!("Summary:");
    println!("  Rows: {} -> {}", report.rows_before, report.rows_after);
    println!("  Columns: {}", report.column_count);
    println!("  Duplicates removed: {}", report.duplicate_records_removed);
    println!("  Values imputed: {}", report.total_imputed());
    println!(
        "  Quality score: {:.1} -> {:.1} ({:+.1})",
        report.score_before,
        report.score_after,
        report.quality_improvement()
    );
    println!();

    println!(
        "{:<20} {:<12} {:<10} {:<12} {:<20}",
        "Column", "Type", "Missing", "Distinct", "Filled with"
    );
    println!("{}", "-".repeat(76));
    for column in &report.columns {
        let filled = match &column.imputation {
            Some(record) => record
                .fill_value
                .clone()
                .unwrap_or_else(|| "<unknown date>".to_string()),
            None => "-".to_string(),
        };
        println!(
            "{:<20} {:<12} {:<10} {:<12} {:<20}",
            truncate_str(&column.name, 19),
            column.column_type,
            column.missing_count_before,
            column.distinct_value_count,
            truncate_str(&filled, 19)
        );
    }
    println!();

    if !report.issues.is_empty() {
        println!("Issues:");
        for issue in &report.issues {
            match &issue.column {
                Some(column) => println!("  ! {}: {}", column, issue.detail),
                None => println!("  ! {}", issue.detail),
            }
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| autoclean::reporting::DEFAULT_OUTPUT_NAME.to_string())
}

/// Load a CSV with every column kept as text.
fn load_csv(path: &str) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| anyhow!("Failed to parse CSV {}: {}", path, e))
}
