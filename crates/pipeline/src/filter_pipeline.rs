//! The FilterPipeline chains post-filters over similarity candidates.

use crate::filters::{AlreadyRatedFilter, DuplicateTitleFilter, MinimumRatingFilter};
use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};
use tracing::{debug, instrument};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyRatedFilter)
///     .add_filter(DuplicateTitleFilter)
///     .add_filter(MinimumRatingFilter::new(6.5));
///
/// let filtered = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The recommendation post-filters, in their fixed order:
    /// already rated, duplicate title, IMDb rating above 6.5.
    pub fn recommendation_filters() -> Self {
        Self::new()
            .add_filter(AlreadyRatedFilter)
            .add_filter(DuplicateTitleFilter)
            .add_filter(MinimumRatingFilter::default())
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// ## Algorithm
    /// 1. Start with the input candidates
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    #[instrument(skip_all, fields(profile = %context.profile_id, input = candidates.len()))]
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context)?;
            debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::ProfileId;

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let context = UserContext::new(ProfileId::default());

        let candidates = vec![
            Candidate::new(0, "Heat", 1995, 8.3),
            Candidate::new(1, "Ronin", 1998, 7.2),
        ];

        let filtered = pipeline.apply(candidates, &context).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_single_filter() {
        let mut context = UserContext::new(ProfileId::default());
        context.rated_titles.insert("Heat".to_string());

        let pipeline = FilterPipeline::new().add_filter(AlreadyRatedFilter);

        let candidates = vec![
            Candidate::new(0, "Heat", 1995, 8.3),
            Candidate::new(1, "Ronin", 1998, 7.2),
        ];

        let filtered = pipeline.apply(candidates, &context).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Ronin");
    }

    #[test]
    fn test_recommendation_filters_order() {
        let pipeline = FilterPipeline::recommendation_filters();
        assert_eq!(
            pipeline.filter_names(),
            vec!["AlreadyRatedFilter", "DuplicateTitleFilter", "MinimumRatingFilter"]
        );

        let mut context = UserContext::new(ProfileId::default());
        context.rated_titles.insert("Heat".to_string());

        let candidates = vec![
            Candidate::new(0, "Heat", 1995, 8.3),
            Candidate::new(1, "Ronin", 1998, 7.2),
            Candidate::new(2, "Solaris", 2002, 6.2),
            Candidate::new(3, "Solaris", 1972, 8.0),
            Candidate::new(1, "Ronin", 1998, 7.2),
        ];

        // Dedup runs before the rating filter, so the low-rated "Solaris"
        // hides the high-rated one
        let filtered = pipeline.apply(candidates, &context).unwrap();
        let titles: Vec<&str> = filtered.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Ronin"]);
    }
}
