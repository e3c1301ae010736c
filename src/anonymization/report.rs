//! Run summary for anonymization batches
//!
//! Collects per-run statistics (spans per category, flagged reports, resolver
//! conflicts, failures) and renders them for the console or as JSON. Report
//! text and detected values never enter the summary.

use crate::anonymization::models::{EntityCategory, RedactionResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one anonymization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,

    /// Reports handed to the engine
    pub total_reports: usize,

    /// Reports redacted successfully (flagged ones included)
    pub processed_reports: usize,

    /// Total spans redacted
    pub total_spans: usize,

    /// Redacted spans by category
    pub spans_by_category: BTreeMap<EntityCategory, usize>,

    /// Ids of reports routed to manual review
    pub flagged_reports: Vec<String>,

    /// Candidate spans dropped by the resolver
    pub conflicts: usize,

    /// Reports that failed, with the reason
    pub failures: Vec<ReportFailure>,

    /// Reports never scheduled because the run was interrupted
    pub cancelled: usize,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// A report that could not be processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFailure {
    pub report_id: String,
    pub error: String,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per report (ms)
    pub avg_processing_time_ms: u64,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    /// Reports with at least one span
    pub reports_with_spans: usize,

    /// Reports without any span
    pub reports_without_spans: usize,
}

impl RunSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_reports: 0,
            processed_reports: 0,
            total_spans: 0,
            spans_by_category: BTreeMap::new(),
            flagged_reports: Vec::new(),
            conflicts: 0,
            failures: Vec::new(),
            cancelled: 0,
            stats: ProcessingStats::default(),
        }
    }

    /// Add the outcome of a successfully processed report
    pub fn add_report(
        &mut self,
        report_id: &str,
        result: &RedactionResult,
        flagged: bool,
        conflicts: usize,
        processing_time_ms: u64,
    ) {
        self.total_reports += 1;
        self.processed_reports += 1;
        self.conflicts += conflicts;
        self.stats.total_processing_time_ms += processing_time_ms;

        if result.spans.is_empty() {
            self.stats.reports_without_spans += 1;
        } else {
            self.stats.reports_with_spans += 1;
            self.total_spans += result.spans.len();
            for (category, count) in result.count_by_category() {
                *self.spans_by_category.entry(category).or_insert(0) += count;
            }
        }

        if flagged {
            self.flagged_reports.push(report_id.to_string());
        }

        // Update average processing time
        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.processed_reports as u64;
    }

    /// Record a report that failed
    pub fn add_failure(&mut self, report_id: &str, error: impl ToString) {
        self.total_reports += 1;
        self.failures.push(ReportFailure {
            report_id: report_id.to_string(),
            error: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Format summary for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                  ANONYMIZATION RUN SUMMARY                    \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Total Reports:               {}\n",
            self.total_reports
        ));
        output.push_str(&format!(
            "  Reports Processed:           {}\n",
            self.processed_reports
        ));
        output.push_str(&format!(
            "  Reports with Spans:          {}\n",
            self.stats.reports_with_spans
        ));
        output.push_str(&format!(
            "  Reports Flagged:             {}\n",
            self.flagged_reports.len()
        ));
        output.push_str(&format!(
            "  Total Spans Redacted:        {}\n",
            self.total_spans
        ));
        output.push_str(&format!("  Resolver Conflicts:          {}\n", self.conflicts));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push('\n');

        if !self.spans_by_category.is_empty() {
            output.push_str("🔍 SPANS BY CATEGORY\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for category in EntityCategory::ALL {
                if let Some(count) = self.spans_by_category.get(&category) {
                    output.push_str(&format!(
                        "  {:30} {:>5}\n",
                        category.placeholder(),
                        count
                    ));
                }
            }
            output.push('\n');
        }

        if !self.flagged_reports.is_empty() {
            output.push_str("📝 FLAGGED FOR REVIEW\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for id in self.flagged_reports.iter().take(20) {
                output.push_str(&format!("  • {id}\n"));
            }
            if self.flagged_reports.len() > 20 {
                output.push_str(&format!(
                    "  … and {} more\n",
                    self.flagged_reports.len() - 20
                ));
            }
            output.push('\n');
        }

        if !self.failures.is_empty() || self.cancelled > 0 {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for failure in &self.failures {
                output.push_str(&format!("  • {}: {}\n", failure.report_id, failure.error));
            }
            if self.cancelled > 0 {
                output.push_str(&format!(
                    "  • Interrupted: {} reports were not processed\n",
                    self.cancelled
                ));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format summary as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write summary to file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
