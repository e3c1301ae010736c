//! File system adapter
//!
//! Reads reports from a directory of `.txt` files or a JSON Lines file and
//! writes redacted reports, annotation dumps and re-exported reports back to
//! disk. Nothing here inspects report content; it only moves `(text, meta)`
//! pairs in and out of the engine.

use crate::anonymization::annotation::{parse_jsonl, AnnotationBatch, AnnotationRecord, ID_KEYS};
use crate::anonymization::anonymizer::apply_annotation;
use crate::anonymization::engine::ProcessedReport;
use crate::domain::{Report, ReportId, Result, RraError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory (under the output directory) for flagged reports
pub const EXCEPTIONS_DIR: &str = "exceptions";

fn is_jsonl(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("jsonl")
}

/// Where reports come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Directory searched recursively for `.txt` files
    Directory(PathBuf),
    /// One report per line: `{"text": ..., "meta": {...}}`
    JsonLines(PathBuf),
}

impl InputSource {
    pub fn detect(path: &Path) -> Result<Self> {
        if is_jsonl(path) && path.is_file() {
            Ok(Self::JsonLines(path.to_path_buf()))
        } else if path.is_dir() {
            Ok(Self::Directory(path.to_path_buf()))
        } else {
            Err(RraError::Configuration(format!(
                "Invalid input path {}: expected a directory with .txt files or a .jsonl file",
                path.display()
            )))
        }
    }
}

/// Where redacted reports go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// One `.txt` per report, flagged reports under `exceptions/`
    Directory(PathBuf),
    /// One `{"text": ..., "meta": {...}}` line per report
    JsonLines(PathBuf),
}

impl OutputTarget {
    pub fn detect(path: &Path) -> Self {
        if is_jsonl(path) {
            Self::JsonLines(path.to_path_buf())
        } else {
            Self::Directory(path.to_path_buf())
        }
    }
}

/// Reports read from an input, plus the lines that could not be used
#[derive(Debug, Default)]
pub struct InputBatch {
    pub reports: Vec<Report>,
    pub rejected: Vec<RraError>,
}

/// One input line of a JSON Lines report file
#[derive(Debug, Deserialize)]
struct InputLine {
    text: String,
    #[serde(default)]
    meta: Map<String, Value>,
}

/// Read all reports from a directory or JSON Lines file
pub async fn read_reports(path: &Path) -> Result<InputBatch> {
    match InputSource::detect(path)? {
        InputSource::JsonLines(file) => {
            let content = tokio::fs::read_to_string(&file).await?;
            Ok(parse_report_lines(&content))
        }
        InputSource::Directory(dir) => read_text_directory(dir).await,
    }
}

/// Parse report lines; ids follow `StudyInstanceUID` > `filename` > a counter
/// over the lines that carry neither
pub fn parse_report_lines(content: &str) -> InputBatch {
    let mut batch = InputBatch::default();
    let mut counter = 0;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: InputLine = match serde_json::from_str(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping unreadable report line");
                batch.rejected.push(RraError::MalformedAnnotation {
                    line: line_no,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let id = ID_KEYS
            .iter()
            .filter_map(|key| parsed.meta.get(*key))
            .find_map(|value| match value {
                Value::String(s) => ReportId::new(s.as_str()).ok(),
                Value::Null => None,
                other => ReportId::new(other.to_string()).ok(),
            })
            .unwrap_or_else(|| {
                let id = ReportId::from_index(counter);
                counter += 1;
                id
            });

        let mut report = Report::new(id, parsed.text);
        report.metadata = parsed.meta;
        batch.reports.push(report);
    }

    batch
}

async fn read_text_directory(dir: PathBuf) -> Result<InputBatch> {
    let files = tokio::task::spawn_blocking(move || list_text_files(&dir))
        .await
        .map_err(|e| RraError::Other(format!("Directory scan failed: {e}")))??;

    if files.is_empty() {
        return Err(RraError::Configuration(
            "No reports found: the input directory contains no .txt files".to_string(),
        ));
    }

    let mut batch = InputBatch::default();
    for file in files {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let text = tokio::fs::read_to_string(&file).await.map_err(|e| {
            RraError::Io(format!("Failed to read {}: {}", file.display(), e))
        })?;
        let id = ReportId::new(stem.as_str())
            .map_err(|e| RraError::Validation(format!("{}: {e}", file.display())))?;
        batch
            .reports
            .push(Report::new(id, text).with_metadata("filename", stem));
    }
    Ok(batch)
}

/// `.txt` files below `dir`, sorted by path
fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| RraError::Io(e.to_string()))?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("txt")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Counts of files written by [`write_reports`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub exceptions: usize,
}

/// Write redacted reports; flagged reports go to the exception channel
pub async fn write_reports(target: &OutputTarget, reports: &[ProcessedReport]) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    match target {
        OutputTarget::JsonLines(file) => {
            let mut content = String::new();
            for report in reports {
                content.push_str(&serde_json::to_string(&report.to_output_record())?);
                content.push('\n');
                if report.flagged {
                    summary.exceptions += 1;
                } else {
                    summary.written += 1;
                }
            }
            ensure_parent(file).await?;
            tokio::fs::write(file, content).await?;
        }
        OutputTarget::Directory(dir) => {
            let exceptions_dir = dir.join(EXCEPTIONS_DIR);
            tokio::fs::create_dir_all(&exceptions_dir).await?;

            for report in reports {
                let name = txt_name(&report_file_name(report));
                if report.flagged {
                    tokio::fs::write(exceptions_dir.join(name), &report.result.text).await?;
                    summary.exceptions += 1;
                } else {
                    tokio::fs::write(dir.join(name), &report.result.text).await?;
                    summary.written += 1;
                }
            }
        }
    }

    tracing::debug!(
        written = summary.written,
        exceptions = summary.exceptions,
        "Reports written"
    );
    Ok(summary)
}

/// Dump annotation records (original text plus labels) instead of reports
///
/// A `.jsonl` output is used as is; for a directory the file is named
/// `annotations_<date>.jsonl`.
pub async fn write_annotations(output: &Path, reports: &[ProcessedReport]) -> Result<PathBuf> {
    let path = if is_jsonl(output) {
        output.to_path_buf()
    } else {
        output.join(format!(
            "annotations_{}.jsonl",
            chrono::Local::now().format("%Y-%m-%d")
        ))
    };

    let mut content = String::new();
    for report in reports {
        content.push_str(&report.to_annotation().to_json_line()?);
        content.push('\n');
    }

    ensure_parent(&path).await?;
    tokio::fs::write(&path, content).await?;
    Ok(path)
}

/// Read an annotation file; bad lines are returned as rejections
pub async fn read_annotations(path: &Path) -> Result<AnnotationBatch> {
    if !path.is_file() {
        return Err(RraError::Configuration(format!(
            "Annotation file not found: {}",
            path.display()
        )));
    }
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_jsonl(&content))
}

/// Outcome of [`export_annotations`]
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, RraError)>,
}

/// Re-apply stored labels and write one anonymized `.txt` per record
///
/// Records carry their 1-based line numbers; records without a filename are
/// named after their report id, which falls back to the line index.
pub async fn export_annotations(
    records: &[(usize, AnnotationRecord)],
    output_dir: &Path,
) -> Result<ExportSummary> {
    tokio::fs::create_dir_all(output_dir).await?;
    let mut summary = ExportSummary::default();

    for (line_no, record) in records {
        let name = record
            .filename()
            .map(String::from)
            .unwrap_or_else(|| record.report_id(line_no.saturating_sub(1)).into_inner());

        match apply_annotation(record) {
            Ok(result) => {
                let path = output_dir.join(txt_name(&name));
                tokio::fs::write(&path, result.text).await?;
                summary.written.push(path);
            }
            Err(e) => {
                tracing::warn!(report = %name, error = %e, "Failed to export record");
                summary.failed.push((name, e));
            }
        }
    }

    Ok(summary)
}

fn report_file_name(report: &ProcessedReport) -> String {
    report
        .report
        .metadata_str("filename")
        .map(String::from)
        .unwrap_or_else(|| report.id().to_string())
}

/// Final path component of `name` with `.txt` appended when missing
fn txt_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("report");
    if base.ends_with(".txt") {
        base.to_string()
    } else {
        format!("{base}.txt")
    }
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
