// RRA - Radiology Report Anonymizer
// Copyright (c) 2025 RRA Contributors
// Licensed under the MIT License

//! # RRA - Radiology Report Anonymizer
//!
//! RRA detects privacy-sensitive spans in Dutch clinical (radiology and
//! pathology) reports and replaces them with category placeholders such as
//! `<PERSOON>`, `<DATUM>` or `<PLAATS>`.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** persons, dates, times, internal phone numbers, patient ids,
//!   Z-numbers, report ids and locations with rule-based detectors
//! - **Resolving** overlapping detections into a non-overlapping span set
//! - **Redacting** reports and flagging those that need manual review
//! - **Exchanging** span annotations as JSON Lines and rebuilding reports from them
//! - **Evaluating** annotations against a ground truth with per-category precision and recall
//!
//! ## Architecture
//!
//! RRA follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Detectors, resolver, redaction, flagging, evaluation and the batch engine
//! - [`adapters`] - Report and annotation file I/O
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rra::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use rra::domain::{Report, ReportId};
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = AnonymizationEngine::new(&AnonymizationConfig::default())?;
//!
//!     let id = ReportId::new("example").map_err(anyhow::Error::msg)?;
//!     let report = Report::new(id, "Voorbeeld van Hendrix, Ward.");
//!     let processed = engine.process(&report)?;
//!
//!     println!("{}", processed.result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Batch Processing
//!
//! Reports are processed concurrently; a failing report is recorded in the
//! run summary without stopping the batch, and a shutdown signal stops new
//! reports from starting:
//!
//! ```rust,no_run
//! use rra::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use std::sync::Arc;
//! use tokio::sync::watch;
//!
//! # async fn example(reports: Vec<rra::domain::Report>) -> anyhow::Result<()> {
//! let engine = Arc::new(AnonymizationEngine::new(&AnonymizationConfig::default())?);
//! let (_tx, shutdown) = watch::channel(false);
//!
//! let outcome = engine.process_batch(reports, shutdown).await;
//! print!("{}", outcome.summary.format_console());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], backed by [`domain::RraError`].
//! Command-level code uses `anyhow` and maps errors to process exit codes.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
