use anyhow::{Context, Result, bail};
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A record type that can be written as a report row.
pub trait ReportRecord: Serialize {
    /// Header row, in the same order the record serializes its fields.
    fn headers() -> &'static [&'static str];
}

impl ReportRecord for crate::domain::constituent::Constituent {
    fn headers() -> &'static [&'static str] {
        &Self::FIELDS
    }
}

/// Writes timestamped, fully quoted CSV files into one directory.
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    output_dir: PathBuf,
}

impl CsvReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `rows` to `<dir>/<stem>_<now>.csv`.
    pub fn write<R: ReportRecord>(&self, stem: &str, rows: &[R]) -> Result<PathBuf> {
        self.write_at(stem, rows, Utc::now())
    }

    pub fn write_at<R: ReportRecord>(
        &self,
        stem: &str,
        rows: &[R],
        at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        ensure_directory(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("{}_{}.csv", stem, report_timestamp(at)));

        let contents = to_csv_string(rows)?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("File generated: {}", path.display());
        Ok(path)
    }
}

/// Serialize rows with a header line, every value quoted, `\n` between rows.
pub fn to_csv_string<R: ReportRecord>(rows: &[R]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    // Header names stay unquoted.
    let mut out = R::headers().join(",");
    out.push('\n');

    for row in rows {
        wtr.serialize(row).context("Failed to serialize report row")?;
    }
    let bytes = wtr.into_inner().context("Failed to flush CSV writer")?;
    out.push_str(&String::from_utf8(bytes).context("Report is not valid UTF-8")?);

    // No trailing newline after the last row.
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// ISO-8601 UTC instant with `:` and `.` replaced, e.g. `2024-05-01T12-30-45-123Z`.
pub fn report_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        bail!("Path exists but is not a directory: {}", dir.display());
    }
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}
