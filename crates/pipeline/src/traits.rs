//! Core trait for candidate post-filtering.
//!
//! Recommendations come out of the neighbour search in distance order and
//! every filter must keep the survivors in that order.

use anyhow::Result;
use sources::{Candidate, UserContext};

/// A single step of the post-filtering pipeline.
///
/// ## Design Note
/// - `Send + Sync` lets a shared pipeline serve concurrent requests
/// - Filters take ownership of the Vec<Candidate> and return the survivors,
///   preserving their relative order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - Candidates in neighbour-search order (takes ownership)
    /// * `context` - The requesting profile and its rated titles
    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &UserContext,
    ) -> Result<Vec<Candidate>>;
}
