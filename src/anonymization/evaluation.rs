//! Evaluation engine
//!
//! Scores candidate annotations against ground truth. A candidate span is a
//! true positive only on an exact `(start, end, category)` match. Every
//! unmatched ground-truth span becomes an error record:
//!
//! - `LENGTH_MISMATCH`: an overlapping candidate has the same category
//! - `WRONG_TOKEN`: an overlapping candidate has another category
//! - `NOT_ANONYMIZED`: no candidate overlaps it
//!
//! Candidates overlapping nothing in the ground truth are `SPURIOUS`.
//! Precision and recall are computed over all evaluated reports together.

use crate::anonymization::annotation::AnnotationRecord;
use crate::anonymization::models::{EntityCategory, Span, SpanSet};
use crate::domain::errors::RraError;
use crate::domain::ids::ReportId;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Characters of context on each side of an error snippet
pub const SNIPPET_WINDOW: usize = 20;

/// File names written by [`EvaluationSummary::write_to_dir`]
pub const REPORT_TXT: &str = "evaluation_report.txt";
pub const REPORT_JSON: &str = "evaluation_report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    LengthMismatch,
    WrongToken,
    NotAnonymized,
    Spurious,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::LengthMismatch => "LENGTH_MISMATCH",
            ErrorKind::WrongToken => "WRONG_TOKEN",
            ErrorKind::NotAnonymized => "NOT_ANONYMIZED",
            ErrorKind::Spurious => "SPURIOUS",
        };
        f.write_str(name)
    }
}

/// One evaluation error with text snippets around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub case_id: String,
    pub error_kind: ErrorKind,
    /// Placeholder of the span the error is about
    pub pattern_label: String,
    pub start: usize,
    pub end: usize,
    /// Original text
    pub input_snippet: String,
    /// Text as redacted by the candidate spans
    pub output_snippet: String,
    /// Text as redacted by the ground truth
    pub target_snippet: String,
}

/// Counts for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    /// Ground-truth spans
    pub gold: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl CategoryScore {
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    fn merge(&mut self, other: &CategoryScore) {
        self.gold += other.gold;
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Evaluation result for one report
#[derive(Debug, Clone, PartialEq)]
pub struct CaseEvaluation {
    pub case_id: ReportId,
    pub scores: BTreeMap<EntityCategory, CategoryScore>,
    pub errors: Vec<ErrorRecord>,
}

impl CaseEvaluation {
    pub fn total(&self) -> CategoryScore {
        let mut total = CategoryScore::default();
        for score in self.scores.values() {
            total.merge(score);
        }
        total
    }
}

/// Evaluate one report's candidate spans against its ground truth
pub fn evaluate_case(case_id: &ReportId, text: &str, candidate: &SpanSet, gold: &SpanSet) -> CaseEvaluation {
    let cand = candidate.as_slice();
    let truth = gold.as_slice();
    let mut scores: BTreeMap<EntityCategory, CategoryScore> = BTreeMap::new();

    let mut cand_matched = vec![false; cand.len()];
    let mut gold_matched = vec![false; truth.len()];

    for (gi, g) in truth.iter().enumerate() {
        scores.entry(g.category).or_default().gold += 1;
        if let Some(ci) = cand
            .iter()
            .enumerate()
            .position(|(ci, c)| !cand_matched[ci] && c == g)
        {
            cand_matched[ci] = true;
            gold_matched[gi] = true;
            scores.entry(g.category).or_default().true_positives += 1;
        }
    }

    let chars: Vec<char> = text.chars().collect();
    let snippets = Snippets {
        chars: &chars,
        candidate,
        gold,
    };
    let mut errors = Vec::new();
    let mut cand_explained = cand_matched.clone();

    for (gi, g) in truth.iter().enumerate() {
        if gold_matched[gi] {
            continue;
        }
        scores.entry(g.category).or_default().false_negatives += 1;

        let overlapping: Vec<usize> = (0..cand.len())
            .filter(|&ci| !cand_matched[ci] && cand[ci].overlaps(g))
            .collect();
        let kind = if overlapping.iter().any(|&ci| cand[ci].category == g.category) {
            ErrorKind::LengthMismatch
        } else if !overlapping.is_empty() {
            ErrorKind::WrongToken
        } else {
            ErrorKind::NotAnonymized
        };
        for ci in overlapping {
            cand_explained[ci] = true;
        }
        errors.push(snippets.record(case_id, kind, g));
    }

    for (ci, c) in cand.iter().enumerate() {
        if cand_matched[ci] {
            continue;
        }
        scores.entry(c.category).or_default().false_positives += 1;
        if !cand_explained[ci] {
            errors.push(snippets.record(case_id, ErrorKind::Spurious, c));
        }
    }

    errors.sort_by_key(|e| (e.start, e.end));

    CaseEvaluation {
        case_id: case_id.clone(),
        scores,
        errors,
    }
}

/// Evaluate one candidate record against its ground-truth record
///
/// Both records must carry the same original text.
pub fn evaluate(candidate: &AnnotationRecord, ground_truth: &AnnotationRecord) -> Result<CaseEvaluation> {
    let case_id = ground_truth.report_id(0);
    if candidate.text != ground_truth.text {
        return Err(RraError::Validation(format!(
            "Report {case_id}: candidate and ground-truth texts differ"
        )));
    }
    Ok(evaluate_case(
        &case_id,
        &ground_truth.text,
        &candidate.spans()?,
        &ground_truth.spans()?,
    ))
}

struct Snippets<'a> {
    chars: &'a [char],
    candidate: &'a SpanSet,
    gold: &'a SpanSet,
}

impl Snippets<'_> {
    fn record(&self, case_id: &ReportId, kind: ErrorKind, anchor: &Span) -> ErrorRecord {
        let len = self.chars.len();
        let end = (anchor.end + SNIPPET_WINDOW).min(len);
        let start = anchor.start.saturating_sub(SNIPPET_WINDOW).min(end);

        ErrorRecord {
            case_id: case_id.to_string(),
            error_kind: kind,
            pattern_label: anchor.category.placeholder().to_string(),
            start: anchor.start,
            end: anchor.end,
            input_snippet: flatten(self.chars[start..end].iter().collect()),
            output_snippet: self.window(self.candidate, start, end),
            target_snippet: self.window(self.gold, start, end),
        }
    }

    /// Window of the text with every intersecting span replaced by its placeholder
    fn window(&self, spans: &SpanSet, start: usize, end: usize) -> String {
        let mut out = String::new();
        let mut pos = start;
        for span in spans.iter().filter(|s| s.end > start && s.start < end) {
            if span.start > pos {
                out.extend(&self.chars[pos..span.start]);
            }
            out.push_str(span.category.placeholder());
            pos = pos.max(span.end);
        }
        if pos < end {
            out.extend(&self.chars[pos..end]);
        }
        flatten(out)
    }
}

fn flatten(s: String) -> String {
    s.replace(['\n', '\r'], " ")
}

/// Report ids present on only one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationMismatch {
    pub missing_in_candidate: Vec<String>,
    pub missing_in_ground_truth: Vec<String>,
}

impl EvaluationMismatch {
    pub fn is_empty(&self) -> bool {
        self.missing_in_candidate.is_empty() && self.missing_in_ground_truth.is_empty()
    }
}

/// Aggregated evaluation over all matched reports
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
    pub created_at: DateTime<Utc>,
    pub reports_evaluated: usize,
    pub per_category: BTreeMap<EntityCategory, CategoryScore>,
    pub total: CategoryScore,
    pub precision: f64,
    pub recall: f64,
    pub errors: Vec<ErrorRecord>,
    pub mismatch: EvaluationMismatch,
    /// Reports that could not be compared, with the reason
    pub skipped: Vec<String>,
}

impl EvaluationSummary {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            reports_evaluated: 0,
            per_category: BTreeMap::new(),
            total: CategoryScore::default(),
            precision: 0.0,
            recall: 0.0,
            errors: Vec::new(),
            mismatch: EvaluationMismatch::default(),
            skipped: Vec::new(),
        }
    }

    /// Fold one report into the totals
    pub fn add_case(&mut self, case: CaseEvaluation) {
        self.reports_evaluated += 1;
        for (category, score) in &case.scores {
            self.per_category.entry(*category).or_default().merge(score);
            self.total.merge(score);
        }
        self.precision = self.total.precision();
        self.recall = self.total.recall();
        self.errors.extend(case.errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Count error records of one kind
    pub fn error_count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.error_kind == kind).count()
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                ANONYMIZATION EVALUATION REPORT                \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Created:              {}\n",
            self.created_at.format("%d/%m/%Y %H:%M:%S")
        ));
        output.push_str(&format!("  Reports Evaluated:    {}\n", self.reports_evaluated));
        output.push_str(&format!(
            "  Precision:            {}\n",
            score_cell(self.precision, self.total.true_positives, self.total.false_positives)
        ));
        output.push_str(&format!(
            "  Recall:               {}\n",
            score_cell(self.recall, self.total.true_positives, self.total.false_negatives)
        ));
        output.push_str(&format!("  Error Records:        {}\n", self.errors.len()));
        output.push('\n');

        output.push_str("🔍 SCORES BY CATEGORY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  {:<16} {:>6} {:>13}  {:<16} {:<16}\n",
            "Category", "Count", "Fraction (%)", "Precision", "Recall"
        ));
        for category in EntityCategory::ALL {
            let score = self.per_category.get(&category).copied().unwrap_or_default();
            output.push_str(&format!(
                "  {:<16} {:>6} {:>13.2}  {:<16} {:<16}\n",
                category.label(),
                score.gold,
                ratio(score.gold, self.total.gold) * 100.0,
                score_cell(score.precision(), score.true_positives, score.false_positives),
                score_cell(score.recall(), score.true_positives, score.false_negatives),
            ));
        }
        output.push_str(&format!(
            "  {:<16} {:>6} {:>13}  {:<16} {:<16}\n",
            "TOTAL", self.total.gold, "100", "-", "-"
        ));
        output.push('\n');

        if !self.mismatch.is_empty() || !self.skipped.is_empty() {
            output.push_str("⚠️  UNMATCHED REPORTS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for id in &self.mismatch.missing_in_candidate {
                output.push_str(&format!("  • {id}: missing in candidate annotations\n"));
            }
            for id in &self.mismatch.missing_in_ground_truth {
                output.push_str(&format!("  • {id}: missing in ground truth\n"));
            }
            for reason in &self.skipped {
                output.push_str(&format!("  • {reason}\n"));
            }
            output.push('\n');
        }

        if !self.errors.is_empty() {
            output.push_str("📝 ERRORS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for error in &self.errors {
                output.push_str(&format!(
                    "\n  [{}] {} in {} ({}..{})\n",
                    error.error_kind, error.pattern_label, error.case_id, error.start, error.end
                ));
                output.push_str(&format!("    input:   ...{}...\n", error.input_snippet));
                output.push_str(&format!("    output:  ...{}...\n", error.output_snippet));
                output.push_str(&format!("    target:  ...{}...\n", error.target_snippet));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the text and JSON report into `dir`
    pub fn write_to_dir(&self, dir: &Path) -> std::io::Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)?;
        let txt = dir.join(REPORT_TXT);
        let json = dir.join(REPORT_JSON);
        std::fs::write(&txt, self.format_console())?;
        std::fs::write(&json, self.format_json().map_err(std::io::Error::other)?)?;
        Ok((txt, json))
    }
}

impl Default for EvaluationSummary {
    fn default() -> Self {
        Self::new()
    }
}

fn score_cell(value: f64, hits: usize, misses: usize) -> String {
    format!("{:.2} ({}/{})", value, hits, hits + misses)
}

/// Evaluate every report present in both sets
///
/// Records come with their 1-based line numbers, as in
/// [`AnnotationBatch::records`](crate::anonymization::annotation::AnnotationBatch).
/// Records without an explicit id fall back to their line index, so rejected
/// lines never shift the pairing. Each side resolves its own report ids; ids
/// present on one side only are listed in [`EvaluationSummary::mismatch`] and
/// excluded from scoring.
pub fn evaluate_batch(
    candidates: &[(usize, AnnotationRecord)],
    ground_truth: &[(usize, AnnotationRecord)],
) -> EvaluationSummary {
    let candidate_by_id = index_by_id(candidates, "candidate");
    let truth_by_id = index_by_id(ground_truth, "ground truth");

    let mut summary = EvaluationSummary::new();
    for (id, truth) in &truth_by_id {
        let Some(candidate) = candidate_by_id.get(id) else {
            tracing::warn!(report_id = %id, "Report missing in candidate annotations");
            summary.mismatch.missing_in_candidate.push(id.to_string());
            continue;
        };
        if candidate.text != truth.text {
            tracing::warn!(report_id = %id, "Candidate and ground-truth texts differ");
            summary
                .skipped
                .push(format!("{id}: candidate and ground-truth texts differ"));
            continue;
        }
        match (candidate.spans(), truth.spans()) {
            (Ok(cand), Ok(gold)) => {
                let case = evaluate_case(id, &truth.text, &cand, &gold);
                tracing::debug!(report_id = %id, errors = case.errors.len(), "Report evaluated");
                summary.add_case(case);
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(report_id = %id, error = %e, "Report skipped");
                summary.skipped.push(format!("{id}: {e}"));
            }
        }
    }
    for id in candidate_by_id.keys() {
        if !truth_by_id.contains_key(id) {
            tracing::warn!(report_id = %id, "Report missing in ground truth");
            summary.mismatch.missing_in_ground_truth.push(id.to_string());
        }
    }

    tracing::info!(
        reports = summary.reports_evaluated,
        precision = summary.precision,
        recall = summary.recall,
        errors = summary.errors.len(),
        "Evaluation completed"
    );
    summary
}

fn index_by_id<'a>(
    records: &'a [(usize, AnnotationRecord)],
    side: &str,
) -> BTreeMap<ReportId, &'a AnnotationRecord> {
    let mut by_id = BTreeMap::new();
    for (line_no, record) in records {
        let id = record.report_id(line_no.saturating_sub(1));
        if by_id.insert(id.clone(), record).is_some() {
            tracing::warn!(report_id = %id, side, "Duplicate report id, keeping the last record");
        }
    }
    by_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::annotation::{parse_jsonl, Label};
    use serde_json::{json, Map, Value};

    fn set(spans: &[(usize, usize, EntityCategory)]) -> SpanSet {
        SpanSet::from_unsorted(
            spans
                .iter()
                .map(|&(s, e, c)| Span::new(s, e, c).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn record(text: &str, labels: &[(usize, usize, &str)], filename: &str) -> AnnotationRecord {
        let mut meta = Map::new();
        meta.insert("filename".to_string(), Value::from(filename));
        AnnotationRecord {
            text: text.to_string(),
            labels: labels
                .iter()
                .map(|&(s, e, t)| Label(s, e, t.to_string()))
                .collect(),
            meta,
        }
    }

    fn numbered(records: Vec<AnnotationRecord>) -> Vec<(usize, AnnotationRecord)> {
        records.into_iter().enumerate().map(|(i, r)| (i + 1, r)).collect()
    }

    const TEXT: &str = "Hendrix, Ward belde op 12-03-2020 om 14:30 uur.";

    #[test]
    fn test_exact_match_is_perfect() {
        let spans = set(&[(0, 7, EntityCategory::Person)]);
        let case = evaluate_case(&ReportId::from_index(0), TEXT, &spans, &spans);
        let total = case.total();
        assert_eq!(total.precision(), 1.0);
        assert_eq!(total.recall(), 1.0);
        assert!(case.errors.is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let candidate = set(&[(0, 7, EntityCategory::Person)]);
        let gold = set(&[(0, 13, EntityCategory::Person)]);
        let case = evaluate_case(&ReportId::from_index(0), TEXT, &candidate, &gold);
        assert_eq!(case.errors.len(), 1);
        let error = &case.errors[0];
        assert_eq!(error.error_kind, ErrorKind::LengthMismatch);
        assert_eq!(error.pattern_label, "<PERSOON>");
        assert_eq!(error.input_snippet, "Hendrix, Ward belde op 12-03-2020");
        assert_eq!(error.output_snippet, "<PERSOON>, Ward belde op 12-03-2020");
        assert_eq!(error.target_snippet, "<PERSOON> belde op 12-03-2020");

        let total = case.total();
        assert_eq!((total.true_positives, total.false_positives, total.false_negatives), (0, 1, 1));
    }

    #[test]
    fn test_wrong_token() {
        let candidate = set(&[(23, 33, EntityCategory::PatientId)]);
        let gold = set(&[(23, 33, EntityCategory::Date)]);
        let case = evaluate_case(&ReportId::from_index(0), TEXT, &candidate, &gold);
        assert_eq!(case.errors.len(), 1);
        assert_eq!(case.errors[0].error_kind, ErrorKind::WrongToken);
        assert_eq!(case.errors[0].pattern_label, "<DATUM>");
    }

    #[test]
    fn test_not_anonymized_and_spurious() {
        let candidate = set(&[(37, 46, EntityCategory::Time)]);
        let gold = set(&[(23, 33, EntityCategory::Date)]);
        let case = evaluate_case(&ReportId::from_index(0), TEXT, &candidate, &gold);
        let kinds: Vec<ErrorKind> = case.errors.iter().map(|e| e.error_kind).collect();
        assert_eq!(kinds, vec![ErrorKind::NotAnonymized, ErrorKind::Spurious]);
        assert_eq!(case.scores[&EntityCategory::Time].false_positives, 1);
        assert_eq!(case.scores[&EntityCategory::Date].false_negatives, 1);
    }

    #[test]
    fn test_snippet_newlines_become_spaces() {
        let text = "Regel een\nJansen\nregel drie";
        let gold = set(&[(10, 16, EntityCategory::Person)]);
        let case = evaluate_case(&ReportId::from_index(0), text, &SpanSet::empty(), &gold);
        assert_eq!(case.errors[0].input_snippet, "Regel een Jansen regel drie");
        assert_eq!(case.errors[0].target_snippet, "Regel een <PERSOON> regel drie");
        assert_eq!(case.errors[0].output_snippet, case.errors[0].input_snippet);
    }

    #[test]
    fn test_zero_denominators() {
        let score = CategoryScore::default();
        assert_eq!(score.precision(), 0.0);
        assert_eq!(score.recall(), 0.0);
    }

    #[test]
    fn test_evaluate_rejects_different_texts() {
        let a = record("tekst een", &[], "a.txt");
        let b = record("tekst twee", &[], "a.txt");
        assert!(matches!(evaluate(&a, &b), Err(RraError::Validation(_))));
    }

    #[test]
    fn test_batch_reports_mismatched_ids() {
        let candidates = vec![
            record(TEXT, &[(0, 13, "<PERSOON>")], "a.txt"),
            record("x", &[], "only_candidate.txt"),
        ];
        let mut truth_b = record(TEXT, &[(0, 13, "<PERSOON>")], "ignored.txt");
        truth_b.meta.insert("StudyInstanceUID".to_string(), json!("a.txt"));
        let truth = vec![truth_b, record("y", &[], "only_truth.txt")];

        let summary = evaluate_batch(&numbered(candidates), &numbered(truth));
        assert_eq!(summary.reports_evaluated, 1);
        assert_eq!(summary.precision, 1.0);
        assert_eq!(summary.recall, 1.0);
        assert_eq!(summary.mismatch.missing_in_candidate, vec!["only_truth.txt"]);
        assert_eq!(summary.mismatch.missing_in_ground_truth, vec!["only_candidate.txt"]);
        assert!(!summary.has_errors());
    }

    #[test]
    fn test_rejected_line_keeps_line_based_ids() {
        let candidates = parse_jsonl(concat!(
            r#"{"text": "Hendrix belde.", "labels": [[0, 40, "<PERSOON>"]], "meta": {}}"#,
            "\n",
            r#"{"text": "Jansen belde.", "labels": [[0, 6, "<PERSOON>"]], "meta": {}}"#,
            "\n",
        ));
        let truth = parse_jsonl(concat!(
            r#"{"text": "Hendrix belde.", "labels": [[0, 7, "<PERSOON>"]], "meta": {}}"#,
            "\n",
            r#"{"text": "Jansen belde.", "labels": [[0, 6, "<PERSOON>"]], "meta": {}}"#,
            "\n",
        ));
        assert_eq!(candidates.rejected.len(), 1);
        assert_eq!(candidates.records[0].0, 2);

        let summary = evaluate_batch(&candidates.records, &truth.records);
        assert_eq!(summary.reports_evaluated, 1);
        assert_eq!(summary.precision, 1.0);
        assert_eq!(summary.recall, 1.0);
        assert_eq!(summary.mismatch.missing_in_candidate, vec!["0"]);
        assert!(summary.mismatch.missing_in_ground_truth.is_empty());
    }

    #[test]
    fn test_summary_formats() {
        let candidates = vec![record(TEXT, &[(0, 7, "<PERSOON>")], "a.txt")];
        let truth = vec![record(TEXT, &[(0, 13, "<PERSOON>"), (23, 33, "<DATUM>")], "a.txt")];
        let summary = evaluate_batch(&numbered(candidates), &numbered(truth));

        assert_eq!(summary.error_count(ErrorKind::LengthMismatch), 1);
        assert_eq!(summary.error_count(ErrorKind::NotAnonymized), 1);
        let console = summary.format_console();
        assert!(console.contains("ANONYMIZATION EVALUATION REPORT"));
        assert!(console.contains("[LENGTH_MISMATCH] <PERSOON> in a.txt"));
        assert!(console.contains("0.00 (0/1)"));

        let json: Value = serde_json::from_str(&summary.format_json().unwrap()).unwrap();
        assert_eq!(json["errors"][0]["error_kind"], "LENGTH_MISMATCH");
        assert_eq!(json["reports_evaluated"], 1);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let summary = EvaluationSummary::new();
        let (txt, json) = summary.write_to_dir(dir.path()).unwrap();
        assert!(txt.ends_with(REPORT_TXT));
        assert!(json.exists());
    }
}
