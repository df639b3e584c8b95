use crate::error::{Result, ResultExt};
use crate::types::{CleaningResult, QualityReport};
use polars::prelude::{CsvWriter, SerWriter};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Base name used when none is configured.
pub const DEFAULT_OUTPUT_NAME: &str = "autoclean";

/// Paths of the files produced by [`ReportWriter::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub cleaned_csv: PathBuf,
    pub report_json: PathBuf,
}

/// Writes the cleaned table and its report into an output directory.
///
/// For a base name `sales` the files are `sales_cleaned.csv` and
/// `sales_report.json`.
pub struct ReportWriter {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl ReportWriter {
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    fn base_name(&self) -> &str {
        self.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME)
    }

    /// Where [`write`](Self::write) will put its files.
    pub fn output_files(&self) -> OutputFiles {
        OutputFiles {
            cleaned_csv: self.output_dir.join(format!("{}_cleaned.csv", self.base_name())),
            report_json: self.output_dir.join(format!("{}_report.json", self.base_name())),
        }
    }

    /// Write both the cleaned CSV and the JSON report.
    pub fn write(&self, result: &CleaningResult) -> Result<OutputFiles> {
        let files = self.output_files();
        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create {}", self.output_dir.display()))?;

        let mut df = result.cleaned_table.to_dataframe()?;
        let mut file = File::create(&files.cleaned_csv)
            .context(format!("Failed to create {}", files.cleaned_csv.display()))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .context("Failed to write cleaned CSV")?;
        info!("Cleaned dataset saved: {}", files.cleaned_csv.display());

        self.write_report(&result.report, &files.report_json)?;

        Ok(files)
    }

    fn write_report(&self, report: &QualityReport, path: &Path) -> Result<()> {
        let mut file =
            File::create(path).context(format!("Failed to create {}", path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;
        info!("Report saved: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CleaningPipeline;
    use crate::table::{Column, Table};

    #[test]
    fn test_output_file_names() {
        let writer = ReportWriter::new(PathBuf::from("out"), Some("sales".to_string()));
        let files = writer.output_files();
        assert_eq!(files.cleaned_csv, PathBuf::from("out/sales_cleaned.csv"));
        assert_eq!(files.report_json, PathBuf::from("out/sales_report.json"));

        let unnamed = ReportWriter::new(PathBuf::from("out"), None);
        assert_eq!(
            unnamed.output_files().report_json,
            PathBuf::from("out/autoclean_report.json")
        );
    }

    #[test]
    fn test_write_creates_both_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let table = Table::new(vec![
            Column::from_values("name", [Some("A"), Some("B"), None]),
            Column::from_values("age", [Some("10"), None, Some("30")]),
        ])
        .unwrap();
        let result = CleaningPipeline::builder().build().unwrap().run(&table).unwrap();

        let writer = ReportWriter::new(dir.path().join("nested"), Some("people".to_string()));
        let files = writer.write(&result).unwrap();

        let csv = fs::read_to_string(&files.cleaned_csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,age"));
        assert_eq!(lines.next(), Some("A,10"));
        assert_eq!(csv.lines().count(), 4);

        let json = fs::read_to_string(&files.report_json).unwrap();
        let report: QualityReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, result.report);
    }
}
