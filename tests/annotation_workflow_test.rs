//! Integration tests for the annotation workflows
//!
//! Covers the path from raw report files to an annotation dump, the export of
//! anonymized reports from that dump and the evaluation against a ground truth.

use rra::adapters::files::{
    export_annotations, read_annotations, read_reports, write_annotations, write_reports,
    OutputTarget,
};
use rra::anonymization::evaluation::{evaluate_batch, REPORT_JSON, REPORT_TXT};
use rra::anonymization::{AnonymizationConfig, AnonymizationEngine};
use rra::domain::RraError;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

fn engine() -> Arc<AnonymizationEngine> {
    Arc::new(AnonymizationEngine::new(&AnonymizationConfig::default()).unwrap())
}

fn write_input(dir: &std::path::Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("example.txt"), "Voorbeeld van Hendrix, Ward.").unwrap();
    std::fs::write(dir.join("location.txt"), "Patiënt woont in Nijmegen.").unwrap();
    std::fs::write(dir.join("review.txt"), "Nieuw adres: onbekend. Gescand om 14:30.").unwrap();
}

#[tokio::test]
async fn test_dump_then_export_matches_direct_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    write_input(&input);

    let batch = read_reports(&input).await.unwrap();
    assert_eq!(batch.reports.len(), 3);
    assert!(batch.rejected.is_empty());

    let (_tx, rx) = watch::channel(false);
    let outcome = engine().process_batch(batch.reports, rx).await;
    assert_eq!(outcome.summary.processed_reports, 3);

    // Direct output
    let direct = dir.path().join("direct");
    let written = write_reports(&OutputTarget::detect(&direct), &outcome.processed)
        .await
        .unwrap();
    assert_eq!(written.written, 2);
    assert_eq!(written.exceptions, 1);
    assert!(direct.join("exceptions").join("review.txt").exists());

    // Annotation dump, then export
    let dump = write_annotations(&dir.path().join("annotations.jsonl"), &outcome.processed)
        .await
        .unwrap();
    let annotations = read_annotations(&dump).await.unwrap();
    assert!(annotations.rejected.is_empty());
    assert_eq!(annotations.records.len(), 3);

    let exported_dir = dir.path().join("exported");
    let exported = export_annotations(&annotations.records, &exported_dir).await.unwrap();
    assert_eq!(exported.written.len(), 3);
    assert!(exported.failed.is_empty());

    for name in ["example.txt", "location.txt"] {
        assert_eq!(
            std::fs::read_to_string(exported_dir.join(name)).unwrap(),
            std::fs::read_to_string(direct.join(name)).unwrap(),
        );
    }
    assert_eq!(
        std::fs::read_to_string(exported_dir.join("review.txt")).unwrap(),
        std::fs::read_to_string(direct.join("exceptions").join("review.txt")).unwrap(),
    );
}

#[tokio::test]
async fn test_jsonl_input_and_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reports.jsonl");
    std::fs::write(
        &input,
        concat!(
            r#"{"text": "Voorbeeld van Hendrix, Ward.", "meta": {"StudyInstanceUID": "1.2.3"}}"#,
            "\n",
            "not json\n",
            r#"{"text": "Geen bijzonderheden.", "meta": {}}"#,
            "\n",
        ),
    )
    .unwrap();

    let batch = read_reports(&input).await.unwrap();
    assert_eq!(batch.reports.len(), 2);
    assert_eq!(batch.rejected.len(), 1);
    assert!(matches!(
        batch.rejected[0],
        RraError::MalformedAnnotation { line: 2, .. }
    ));
    assert_eq!(batch.reports[0].id.as_str(), "1.2.3");

    let (_tx, rx) = watch::channel(false);
    let outcome = engine().process_batch(batch.reports, rx).await;

    let output = dir.path().join("out").join("reports.jsonl");
    write_reports(&OutputTarget::detect(&output), &outcome.processed)
        .await
        .unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["text"], "Voorbeeld van <PERSOON>.");
    assert_eq!(lines[0]["meta"]["StudyInstanceUID"], "1.2.3");
    assert_eq!(lines[0]["meta"]["flagged"], false);
    assert_eq!(lines[1]["text"], "Geen bijzonderheden.");
}

#[tokio::test]
async fn test_empty_input_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    let error = read_reports(dir.path()).await.unwrap_err();
    assert!(error.is_fatal());
}

#[tokio::test]
async fn test_malformed_annotations_are_reported_by_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("annotations.jsonl");
    std::fs::write(
        &path,
        concat!(
            r#"{"text": "Gezien om 14:30.", "labels": [[10, 15, "<TIJD>"]], "meta": {"filename": "a"}}"#,
            "\n",
            r#"{"labels": [], "meta": {"filename": "b"}}"#,
            "\n",
            r#"{"text": "kort", "labels": [[0, 10, "<TIJD>"]], "meta": {"filename": "c"}}"#,
            "\n",
        ),
    )
    .unwrap();

    let batch = read_annotations(&path).await.unwrap();
    let lines: Vec<usize> = batch
        .rejected
        .iter()
        .map(|e| match e {
            RraError::MalformedAnnotation { line, .. } => *line,
            other => panic!("unexpected error {other}"),
        })
        .collect();
    assert_eq!(lines, vec![2, 3]);
    assert_eq!(batch.into_records().len(), 1);
}

#[tokio::test]
async fn test_evaluation_against_corrected_ground_truth() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    write_input(&input);

    let batch = read_reports(&input).await.unwrap();
    let (_tx, rx) = watch::channel(false);
    let outcome = engine().process_batch(batch.reports, rx).await;
    let candidates: Vec<_> = outcome
        .processed
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, p.to_annotation()))
        .collect();

    // Ground truth drops one report and misses the person span in another
    let mut ground_truth: Vec<_> = candidates
        .iter()
        .filter(|(_, r)| r.filename() != Some("location"))
        .cloned()
        .collect();
    for (_, record) in &mut ground_truth {
        if record.filename() == Some("example") {
            record.labels.clear();
        }
    }

    let summary = evaluate_batch(&candidates, &ground_truth);
    assert_eq!(summary.reports_evaluated, 2);
    assert_eq!(summary.mismatch.missing_in_ground_truth, vec!["location"]);
    assert!(summary.mismatch.missing_in_candidate.is_empty());
    assert!(summary.has_errors());
    assert!(summary.precision < 1.0);

    let (txt, json) = summary.write_to_dir(&dir.path().join("evaluation")).unwrap();
    assert!(txt.ends_with(REPORT_TXT));
    assert!(json.ends_with(REPORT_JSON));
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
    assert_eq!(report["reports_evaluated"], 2);
}
