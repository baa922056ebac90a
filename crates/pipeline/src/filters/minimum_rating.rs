//! Filter to ensure minimum quality threshold.
//!
//! Removes movies whose catalog IMDb rating does not exceed the threshold,
//! ensuring we only recommend well-received titles.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};

/// Default threshold; a rating equal to it is removed
pub const DEFAULT_MIN_IMDB_RATING: f64 = 6.5;

/// Removes candidates at or below an IMDb rating threshold.
pub struct MinimumRatingFilter {
    min_rating: f64,
}

impl Default for MinimumRatingFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_IMDB_RATING)
    }
}

impl MinimumRatingFilter {
    /// Create a new MinimumRatingFilter.
    ///
    /// # Arguments
    /// * `min_rating` - Candidates need a strictly higher IMDb rating (typically 6.5)
    pub fn new(min_rating: f64) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.imdb_rating > self.min_rating)
            .collect();

        Ok(filtered)
    }
}
