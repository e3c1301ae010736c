//! Domain models and types for RRA.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ReportId`])
//! - **Domain models** ([`Report`])
//! - **Error types** ([`RraError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, RraError>`]:
//!
//! ```rust
//! use rra::domain::{Report, ReportId, Result};
//!
//! fn example() -> Result<Report> {
//!     let id = ReportId::new("1.2.840.113619.2.55")
//!         .map_err(rra::domain::RraError::Validation)?;
//!     Ok(Report::new(id, "Geen bijzonderheden."))
//! }
//! # example().unwrap();
//! ```

pub mod errors;
pub mod ids;
pub mod report;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::RraError;
pub use ids::ReportId;
pub use report::Report;
pub use result::Result;
