//! Data models for detection and redaction

pub mod entity;
pub mod span;

pub use entity::{EnabledCategories, EntityCategory};
pub use span::{RedactionResult, Span, SpanSet};
