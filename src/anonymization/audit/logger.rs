//! Audit logger for redaction operations

use crate::anonymization::models::RedactionResult;
use crate::anonymization::text::slice_chars;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    report_id: String,
    spans_count: usize,
    flagged: bool,
    processing_time_ms: u64,
    replacements: Vec<AuditReplacement>,
}

/// One replacement (with hashed original value)
#[derive(Debug, Serialize)]
struct AuditReplacement {
    category: String,
    start: usize,
    end: usize,
    /// SHA-256 hash of the replaced text (never log plaintext)
    value_hash: String,
}

/// Audit logger for redaction operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
    /// Serializes appends from concurrent report workers
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            // Ensure parent directory exists
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
            write_lock: Mutex::new(()),
        })
    }

    /// A logger that writes nothing
    pub fn disabled() -> Self {
        Self {
            log_path: PathBuf::new(),
            json_format: true,
            enabled: false,
            write_lock: Mutex::new(()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log the redaction of one report
    pub fn log_redaction(
        &self,
        report_id: &str,
        original_text: &str,
        result: &RedactionResult,
        flagged: bool,
        processing_time_ms: u64,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            report_id: report_id.to_string(),
            spans_count: result.spans.len(),
            flagged,
            processing_time_ms,
            replacements: result
                .spans
                .iter()
                .map(|span| AuditReplacement {
                    category: span.category.label().to_string(),
                    start: span.start,
                    end: span.end,
                    value_hash: self.hash_value(
                        slice_chars(original_text, span.start, span.end).unwrap_or_default(),
                    ),
                })
                .collect(),
        };

        self.write_entry(&entry)
    }

    /// Hash a value using SHA-256
    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            // Plain text format
            writeln!(
                file,
                "[{}] Report: {} | Spans: {} | Flagged: {} | Time: {}ms",
                entry.timestamp,
                entry.report_id,
                entry.spans_count,
                entry.flagged,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::anonymizer::redact;
    use crate::anonymization::models::{EntityCategory, Span, SpanSet};
    use tempfile::tempdir;

    fn redacted() -> (String, RedactionResult) {
        let text = "Voorbeeld van Hendrix, Ward.".to_string();
        let spans =
            SpanSet::from_sorted(vec![Span::new(14, 27, EntityCategory::Person).unwrap()]).unwrap();
        let result = redact(&text, &spans).unwrap();
        (text, result)
    }

    #[test]
    fn test_audit_logger_creation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit").join("anonymization.log");

        let logger = AuditLogger::new(log_path, true, true).unwrap();
        assert!(logger.is_enabled());
        assert!(dir.path().join("audit").exists());
    }

    #[test]
    fn test_hash_value() {
        let logger = AuditLogger::disabled();

        let hash1 = logger.hash_value("Hendrix, Ward");
        let hash2 = logger.hash_value("Hendrix, Ward");
        let hash3 = logger.hash_value("Jansen");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_log_redaction_json() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();
        let (text, result) = redacted();

        logger.log_redaction("example.txt", &text, &result, false, 3).unwrap();
        logger.log_redaction("example.txt", &text, &result, true, 4).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("example.txt"));
        assert!(content.contains("\"category\":\"PERSON\""));
        // Should NOT contain plaintext values
        assert!(!content.contains("Hendrix"));
    }

    #[test]
    fn test_log_redaction_plain_text() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), false, true).unwrap();
        let (text, result) = redacted();

        logger.log_redaction("example.txt", &text, &result, false, 3).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Report: example.txt | Spans: 1 | Flagged: false"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, false).unwrap();
        let (text, result) = redacted();

        logger.log_redaction("example.txt", &text, &result, false, 3).unwrap();
        assert!(!log_path.exists());
    }
}
