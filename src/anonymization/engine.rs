//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that orchestrates span
//! detection, conflict resolution, redaction, flagging and audit logging for
//! clinical reports.
//!
//! # Architecture
//!
//! The engine coordinates:
//! - **Detectors**: one per [`EntityCategory`], all reading the same immutable [`Lexicon`]
//! - **Resolver**: merges candidates into a non-overlapping [`SpanSet`](crate::anonymization::models::SpanSet)
//! - **Redaction**: substitutes category placeholders
//! - **Flag list**: routes reports containing review keywords to the exception channel
//! - **Audit Logger**: records replacements with hashed values
//!
//! # Examples
//!
//! ```no_run
//! use rra::anonymization::{AnonymizationEngine, config::AnonymizationConfig};
//! use rra::domain::{Report, ReportId};
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = AnonymizationEngine::new(&AnonymizationConfig::default())?;
//!
//! let id = ReportId::new("example.txt").map_err(anyhow::Error::msg)?;
//! let report = Report::new(id, "Voorbeeld van Hendrix, Ward.");
//! let processed = engine.process(&report)?;
//! assert_eq!(processed.result.text, "Voorbeeld van <PERSOON>.");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    annotation::AnnotationRecord,
    anonymizer::redact,
    audit::AuditLogger,
    config::AnonymizationConfig,
    detector::{detectors_for, EntityDetector},
    flagging::FlagList,
    lexicon::Lexicon,
    models::{EnabledCategories, EntityCategory, RedactionResult},
    report::RunSummary,
    resolver::{resolve, ConflictPolicy, Resolution, SpanConflict},
};
use crate::domain::{Report, ReportId, Result, RraError};
use anyhow::Context;
use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Version tag written into annotation metadata
pub const RRA_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// A report after detection, redaction and flagging
#[derive(Debug, Clone)]
pub struct ProcessedReport {
    /// The untouched input report
    pub report: Report,
    pub result: RedactionResult,
    pub flagged: bool,
    /// Flag keywords found in the text
    pub flag_matches: Vec<String>,
    /// Candidates dropped by the resolver
    pub conflicts: Vec<SpanConflict>,
    pub processing_time_ms: u64,
}

impl ProcessedReport {
    pub fn id(&self) -> &ReportId {
        &self.report.id
    }

    /// Metadata written alongside the report output
    pub fn output_meta(&self) -> Map<String, Value> {
        let mut meta = self.report.metadata.clone();
        meta.entry("filename")
            .or_insert_with(|| Value::String(self.report.id.to_string()));
        meta.insert("flagged".to_string(), Value::Bool(self.flagged));
        meta.insert(
            "rra_version".to_string(),
            Value::String(RRA_VERSION.to_string()),
        );
        meta
    }

    /// Annotation record holding the original text and the redacted spans
    pub fn to_annotation(&self) -> AnnotationRecord {
        AnnotationRecord::from_result(&self.result, &self.report.text, self.output_meta())
    }

    /// `{"text": <redacted>, "meta": {...}}` line for JSON Lines output
    pub fn to_output_record(&self) -> Value {
        serde_json::json!({
            "text": self.result.text,
            "meta": self.output_meta(),
        })
    }
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully processed reports, in input order
    pub processed: Vec<ProcessedReport>,
    pub summary: RunSummary,
}

/// Main anonymization engine
///
/// # Thread Safety
///
/// The engine holds only immutable state (lexicon, compiled detectors, flag
/// list) and is shared across blocking workers through an `Arc`.
pub struct AnonymizationEngine {
    lexicon: Lexicon,
    /// Detectors for every category, in detector order
    detectors: Vec<Box<dyn EntityDetector>>,
    enabled: EnabledCategories,
    policy: ConflictPolicy,
    flag_list: FlagList,
    audit_logger: AuditLogger,
    parallel_reports: usize,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails (unknown entity names included)
    /// - The lexicon file cannot be loaded
    /// - Audit logger initialization fails
    pub fn new(config: &AnonymizationConfig) -> anyhow::Result<Self> {
        config
            .validate()
            .context("Invalid anonymization configuration")?;

        let lexicon = match config.lexicon_path {
            Some(ref path) => Lexicon::from_file(path)
                .with_context(|| format!("Failed to load lexicon: {}", path.display()))?,
            None => Lexicon::builtin().context("Failed to load built-in lexicon")?,
        };

        Self::with_lexicon(config, lexicon)
    }

    /// Create an engine with an explicitly constructed lexicon
    pub fn with_lexicon(config: &AnonymizationConfig, lexicon: Lexicon) -> anyhow::Result<Self> {
        let enabled = config.enabled_categories()?;
        let policy = config.resolved_conflict_policy()?;
        let detectors = detectors_for(&EnabledCategories::all())?;

        let audit_logger = AuditLogger::new(
            config.audit.log_path.clone(),
            config.audit.json_format,
            config.audit.enabled,
        )?;

        tracing::debug!(
            names = lexicon.name_count(),
            cities = lexicon.city_count(),
            categories = enabled.len(),
            "Anonymization engine initialised"
        );

        Ok(Self {
            lexicon,
            detectors,
            enabled,
            policy,
            flag_list: FlagList::new(&config.flag_list),
            audit_logger,
            parallel_reports: config.parallel_reports.max(1),
        })
    }

    /// Categories enabled by the configuration
    pub fn enabled_categories(&self) -> &EnabledCategories {
        &self.enabled
    }

    pub fn flag_list(&self) -> &FlagList {
        &self.flag_list
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Run the enabled detectors and resolve their candidates
    pub fn detect(&self, text: &str, enabled: &EnabledCategories) -> Resolution {
        let candidates = self
            .detectors
            .iter()
            .filter(|d| enabled.contains(d.category()))
            .flat_map(|d| d.detect(text, &self.lexicon))
            .collect();
        resolve(candidates, &self.policy)
    }

    /// Detect and redact one report with an explicit category set
    pub fn anonymize(&self, report: &Report, enabled: &EnabledCategories) -> Result<RedactionResult> {
        let resolution = self.detect(&report.text, enabled);
        redact(&report.text, &resolution.spans)
    }

    /// Anonymize one report with the configured categories, flag it and
    /// write its audit entry
    pub fn process(&self, report: &Report) -> Result<ProcessedReport> {
        let start = Instant::now();

        let resolution = self.detect(&report.text, &self.enabled);
        let result = redact(&report.text, &resolution.spans)?;
        let flag_matches: Vec<String> = self
            .flag_list
            .matches(&report.text)
            .into_iter()
            .map(String::from)
            .collect();
        let flagged = !flag_matches.is_empty();

        let processing_time_ms = start.elapsed().as_millis() as u64;

        self.audit_logger
            .log_redaction(
                report.id.as_str(),
                &report.text,
                &result,
                flagged,
                processing_time_ms,
            )
            .map_err(|e| RraError::Io(format!("{e:#}")))?;

        tracing::debug!(
            report_id = %report.id,
            spans = result.spans.len(),
            conflicts = resolution.conflicts.len(),
            flagged,
            "Report anonymized"
        );

        Ok(ProcessedReport {
            report: report.clone(),
            result,
            flagged,
            flag_matches,
            conflicts: resolution.conflicts,
            processing_time_ms,
        })
    }

    /// Process a batch of reports on the blocking thread pool
    ///
    /// At most `parallel_reports` reports are in flight; results keep input
    /// order. Once `shutdown` turns `true` no further reports are scheduled,
    /// reports already running complete. A failing report is recorded in the
    /// summary and does not affect the others.
    pub async fn process_batch(
        self: &Arc<Self>,
        reports: Vec<Report>,
        shutdown: watch::Receiver<bool>,
    ) -> BatchOutcome {
        let total = reports.len();
        tracing::info!(
            reports = total,
            parallel = self.parallel_reports,
            "Starting anonymization batch"
        );

        let outcomes: Vec<(ReportId, Result<ProcessedReport>)> = stream::iter(reports)
            .take_while(move |_| futures::future::ready(!*shutdown.borrow()))
            .map(|report| {
                let engine = Arc::clone(self);
                async move {
                    let id = report.id.clone();
                    let outcome = tokio::task::spawn_blocking(move || engine.process(&report))
                        .await
                        .unwrap_or_else(|e| {
                            Err(RraError::Other(format!("Report worker failed: {e}")))
                        });
                    (id, outcome)
                }
            })
            .buffered(self.parallel_reports)
            .collect()
            .await;

        let mut batch = BatchOutcome::default();
        batch.summary.cancelled = total - outcomes.len();

        for (id, outcome) in outcomes {
            match outcome {
                Ok(processed) => {
                    batch.summary.add_report(
                        id.as_str(),
                        &processed.result,
                        processed.flagged,
                        processed.conflicts.len(),
                        processed.processing_time_ms,
                    );
                    batch.processed.push(processed);
                }
                Err(e) => {
                    tracing::error!(report_id = %id, error = %e, "Failed to anonymize report");
                    batch.summary.add_failure(id.as_str(), &e);
                }
            }
        }

        if batch.summary.cancelled > 0 {
            tracing::warn!(
                cancelled = batch.summary.cancelled,
                "Shutdown requested, remaining reports were not scheduled"
            );
        }

        tracing::info!(
            processed = batch.summary.processed_reports,
            flagged = batch.summary.flagged_reports.len(),
            failed = batch.summary.failures.len(),
            spans = batch.summary.total_spans,
            "Anonymization batch completed"
        );

        batch
    }

    /// Detect spans only, for callers that want a category breakdown
    pub fn spans_of(&self, text: &str, category: EntityCategory) -> Resolution {
        let mut only = EnabledCategories::none();
        only.insert(category);
        self.detect(text, &only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::Span;

    fn engine() -> AnonymizationEngine {
        AnonymizationEngine::new(&AnonymizationConfig::default()).unwrap()
    }

    fn report(id: &str, text: &str) -> Report {
        Report::new(ReportId::new(id).unwrap(), text)
    }

    #[test]
    fn test_engine_creation() {
        let engine = AnonymizationEngine::new(&AnonymizationConfig::default());
        assert!(engine.is_ok());
    }

    #[test]
    fn test_unknown_entity_fails_before_processing() {
        let config = AnonymizationConfig {
            entities: vec!["telefoon".to_string()],
            ..Default::default()
        };
        assert!(AnonymizationEngine::new(&config).is_err());
    }

    #[test]
    fn test_process_redacts_and_flags() {
        let engine = engine();
        let processed = engine
            .process(&report("a.txt", "Voorbeeld van Hendrix, Ward. Nieuw adres bekend."))
            .unwrap();
        assert!(processed.result.text.starts_with("Voorbeeld van <PERSOON>."));
        assert!(processed.flagged);
        assert_eq!(processed.flag_matches, vec!["adres"]);
    }

    #[test]
    fn test_anonymize_with_no_categories_keeps_text() {
        let engine = engine();
        let r = report("a.txt", "Gezien op 12-03-2020 door Hendrix, Ward.");
        let result = engine.anonymize(&r, &EnabledCategories::none()).unwrap();
        assert_eq!(result.text, r.text);
        assert!(result.spans.is_empty());
    }

    #[test]
    fn test_spans_of_single_category() {
        let engine = engine();
        let resolution = engine.spans_of("Gezien op 12-03-2020 om 14:30.", EntityCategory::Time);
        assert_eq!(
            resolution.spans.as_slice(),
            &[Span::new(24, 29, EntityCategory::Time).unwrap()]
        );
    }

    #[test]
    fn test_output_meta() {
        let engine = engine();
        let processed = engine.process(&report("a", "Geen bijzonderheden.")).unwrap();
        let meta = processed.output_meta();
        assert_eq!(meta["filename"], "a");
        assert_eq!(meta["flagged"], false);
        assert_eq!(meta["rra_version"], RRA_VERSION);

        let record = processed.to_annotation();
        assert_eq!(record.text, "Geen bijzonderheden.");
        assert!(record.labels.is_empty());
    }

    #[tokio::test]
    async fn test_process_batch_preserves_order() {
        let engine = Arc::new(engine());
        let (_tx, rx) = watch::channel(false);
        let reports = (0..10)
            .map(|i| report(&format!("r{i}"), "Gezien op 12-03-2020."))
            .collect();

        let outcome = engine.process_batch(reports, rx).await;
        let ids: Vec<&str> = outcome.processed.iter().map(|p| p.id().as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("r{i}")).collect();
        assert_eq!(ids, expected);
        assert_eq!(outcome.summary.processed_reports, 10);
        assert_eq!(outcome.summary.cancelled, 0);
    }

    #[tokio::test]
    async fn test_process_batch_stops_after_shutdown() {
        let engine = Arc::new(engine());
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let reports = vec![report("a", "tekst"), report("b", "tekst")];

        let outcome = engine.process_batch(reports, rx).await;
        assert!(outcome.processed.is_empty());
        assert_eq!(outcome.summary.cancelled, 2);
    }
}
