//! Filter to remove movies the user has already rated.
//!
//! This is the first filter in the pipeline, as there's no point in
//! recommending movies the user has already seen.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};

/// Removes candidates whose title matches a rated title exactly.
///
/// ## Algorithm
/// Uses the HashSet in UserContext.rated_titles for O(1) lookups.
pub struct AlreadyRatedFilter;

impl Filter for AlreadyRatedFilter {
    fn name(&self) -> &str {
        "AlreadyRatedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| !context.has_rated(&candidate.title))
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::ProfileId;

    #[test]
    fn test_already_rated_filter() {
        let mut context = UserContext::new(ProfileId::default());
        context.rated_titles.insert("Heat".to_string());
        context.rated_titles.insert("Alien".to_string());

        let candidates = vec![
            Candidate::new(0, "Heat", 1995, 8.3),
            Candidate::new(1, "Ronin", 1998, 7.2),
            Candidate::new(2, "Alien", 1979, 8.5),
            Candidate::new(3, "alien", 1979, 8.5),
        ];

        let filter = AlreadyRatedFilter;
        let filtered = filter.apply(candidates, &context).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].title, "Ronin");
        assert_eq!(filtered[1].title, "alien");
    }
}
