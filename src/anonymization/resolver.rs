//! Span resolver
//!
//! Merges the candidate spans of all detectors into one [`SpanSet`] with a
//! greedy left-to-right sweep: earliest start first, longer span first among
//! equal starts. A candidate overlapping the last accepted span is dropped and
//! recorded as a [`SpanConflict`].

use crate::anonymization::models::{EntityCategory, Span, SpanSet};
use serde::Serialize;
use std::cmp::Reverse;

/// Tie-break between candidates with equal start and equal length
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Keep the candidate that came first (detector order)
    #[default]
    LongestFirst,
    /// Prefer categories listed earlier; unlisted categories rank last
    CategoryPriority(Vec<EntityCategory>),
}

impl ConflictPolicy {
    fn rank(&self, category: EntityCategory) -> usize {
        match self {
            ConflictPolicy::LongestFirst => 0,
            ConflictPolicy::CategoryPriority(order) => order
                .iter()
                .position(|c| *c == category)
                .unwrap_or(order.len()),
        }
    }
}

/// A candidate dropped because it overlapped an accepted span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpanConflict {
    pub kept: Span,
    pub dropped: Span,
}

/// Resolver output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub spans: SpanSet,
    pub conflicts: Vec<SpanConflict>,
}

/// Resolve overlapping candidates into a non-overlapping span set
pub fn resolve(mut candidates: Vec<Span>, policy: &ConflictPolicy) -> Resolution {
    // stable sort keeps detector order for full ties
    candidates.sort_by_key(|s| (s.start, Reverse(s.len()), policy.rank(s.category)));

    let mut accepted: Vec<Span> = Vec::with_capacity(candidates.len());
    let mut conflicts = Vec::new();

    for candidate in candidates {
        match accepted.last() {
            Some(last) if candidate == *last => {}
            Some(last) if candidate.start < last.end => {
                tracing::debug!(
                    kept = %last.category,
                    kept_start = last.start,
                    kept_end = last.end,
                    dropped = %candidate.category,
                    dropped_start = candidate.start,
                    dropped_end = candidate.end,
                    "Span conflict resolved"
                );
                conflicts.push(SpanConflict {
                    kept: *last,
                    dropped: candidate,
                });
            }
            _ => accepted.push(candidate),
        }
    }

    Resolution {
        spans: SpanSet::from_resolved(accepted),
        conflicts,
    }
}
