//! Integration tests for batch processing
//!
//! These tests verify that:
//! - Shutdown signals stop scheduling of further reports
//! - Results keep input order under concurrency
//! - The run summary and the audit log agree with the processed reports

use rra::anonymization::config::AuditConfig;
use rra::anonymization::{AnonymizationConfig, AnonymizationEngine, EntityCategory};
use rra::domain::{Report, ReportId};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

fn reports(count: usize) -> Vec<Report> {
    (0..count)
        .map(|i| {
            Report::new(
                ReportId::new(format!("report_{i:03}")).unwrap(),
                "Voorbeeld van Hendrix, Ward. Gescand om 14:30.",
            )
        })
        .collect()
}

fn engine_with(config: AnonymizationConfig) -> Arc<AnonymizationEngine> {
    Arc::new(AnonymizationEngine::new(&config).unwrap())
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_batch_completes_without_shutdown() {
    let engine = engine_with(AnonymizationConfig {
        parallel_reports: 3,
        ..Default::default()
    });
    let (_tx, rx) = watch::channel(false);

    let outcome = engine.process_batch(reports(25), rx).await;

    assert_eq!(outcome.processed.len(), 25);
    assert_eq!(outcome.summary.total_reports, 25);
    assert_eq!(outcome.summary.processed_reports, 25);
    assert_eq!(outcome.summary.cancelled, 0);
    assert!(!outcome.summary.has_failures());

    let ids: Vec<String> = outcome.processed.iter().map(|p| p.id().to_string()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    assert_eq!(
        outcome.summary.spans_by_category.get(&EntityCategory::Person),
        Some(&25)
    );
    assert_eq!(
        outcome.summary.spans_by_category.get(&EntityCategory::Time),
        Some(&25)
    );
    assert_eq!(outcome.summary.total_spans, 50);
    assert_eq!(outcome.summary.stats.reports_with_spans, 25);
}

#[tokio::test]
async fn test_shutdown_before_start_processes_nothing() {
    let engine = engine_with(AnonymizationConfig::default());
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let outcome = engine.process_batch(reports(5), rx).await;

    assert!(outcome.processed.is_empty());
    assert_eq!(outcome.summary.cancelled, 5);
    assert!(outcome
        .summary
        .format_console()
        .contains("5 reports were not processed"));
}

#[tokio::test]
async fn test_summary_lists_flagged_reports() {
    let engine = engine_with(AnonymizationConfig::default());
    let (_tx, rx) = watch::channel(false);
    let batch = vec![
        Report::new(ReportId::new("plain").unwrap(), "Geen bijzonderheden."),
        Report::new(
            ReportId::new("flagged").unwrap(),
            "Voorbeeld van Hendrix, Ward. Nieuw adres bekend.",
        ),
    ];

    let outcome = engine.process_batch(batch, rx).await;
    assert_eq!(outcome.summary.flagged_reports, vec!["flagged"]);
    assert_eq!(outcome.summary.stats.reports_without_spans, 1);

    let json: serde_json::Value =
        serde_json::from_str(&outcome.summary.format_json().unwrap()).unwrap();
    assert_eq!(json["flagged_reports"][0], "flagged");
}

#[tokio::test]
async fn test_audit_log_has_one_entry_per_report() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("audit").join("anonymization.log");
    let engine = engine_with(AnonymizationConfig {
        audit: AuditConfig {
            enabled: true,
            log_path: log_path.clone(),
            json_format: true,
        },
        ..Default::default()
    });
    let (_tx, rx) = watch::channel(false);

    let outcome = engine.process_batch(reports(4), rx).await;
    assert_eq!(outcome.summary.processed_reports, 4);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let entries: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(entries.len(), 4);
    for entry in &entries {
        assert_eq!(entry["spans_count"], 2);
        // values are hashed, never stored
        assert!(!entry.to_string().contains("Hendrix"));
    }
}
