//! Audit logging module
//!
//! Provides structured audit logging for redaction operations. Replaced text
//! is only ever recorded as a SHA-256 hash.

pub mod logger;

pub use logger::AuditLogger;
