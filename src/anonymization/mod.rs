//! Anonymization module for RRA
//!
//! This module provides rule-based detection and redaction of privacy-sensitive
//! spans in Dutch clinical reports, plus the annotation exchange format and the
//! evaluation of detections against ground truth.
//!
//! # Architecture
//!
//! The anonymization pipeline consists of:
//! - **Lexicon**: immutable name, city and cue-word tables loaded once
//! - **Detection**: one detector per [`EntityCategory`](models::EntityCategory)
//! - **Resolution**: greedy merge into a non-overlapping span set
//! - **Redaction**: placeholder substitution in a single pass
//! - **Flagging**: keyword routing to manual review
//! - **Audit**: structured logging with hashed values
//!
//! # Usage
//!
//! ```rust,no_run
//! use rra::anonymization::{AnonymizationEngine, config::AnonymizationConfig};
//! use rra::anonymization::models::EnabledCategories;
//! use rra::domain::{Report, ReportId};
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = AnonymizationEngine::new(&AnonymizationConfig::default())?;
//! let report = Report::new(ReportId::from_index(0), "Patiënt woont in Nijmegen.");
//! let result = engine.anonymize(&report, &EnabledCategories::all())?;
//! assert_eq!(result.text, "Patiënt woont in <PLAATS>.");
//! # Ok(())
//! # }
//! ```

pub mod annotation;
pub mod anonymizer;
pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod evaluation;
pub mod flagging;
pub mod lexicon;
pub mod models;
pub mod report;
pub mod resolver;
pub mod text;

// Re-export main types
pub use annotation::AnnotationRecord;
pub use config::AnonymizationConfig;
pub use engine::{AnonymizationEngine, BatchOutcome, ProcessedReport};
pub use evaluation::EvaluationSummary;
pub use lexicon::Lexicon;
pub use models::{EntityCategory, RedactionResult, Span, SpanSet};
pub use report::RunSummary;
