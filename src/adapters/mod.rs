//! External system integrations for RRA.
//!
//! - [`files`] - report directories, JSON Lines files and annotation dumps
//!
//! Adapters only move `(text, metadata)` pairs between the file system and the
//! anonymization engine; they never look inside report text.

pub mod files;
