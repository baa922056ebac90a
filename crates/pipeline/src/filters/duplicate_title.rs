//! Filter to collapse candidates retrieved more than once.
//!
//! The same catalog movie is usually a neighbour of several rated movies.
//! Only its first appearance survives, so the nearest-first order of the
//! neighbour search is kept.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserContext};
use std::collections::HashSet;

/// Keeps the first candidate for every distinct title
pub struct DuplicateTitleFilter;

impl Filter for DuplicateTitleFilter {
    fn name(&self) -> &str {
        "DuplicateTitleFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &UserContext,
    ) -> Result<Vec<Candidate>> {
        let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.title.clone()))
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_occurrence() {
        let mut first = Candidate::new(4, "Heat", 1995, 8.3);
        first.distance = 0.5;
        let mut second = Candidate::new(4, "Heat", 1995, 8.3);
        second.distance = 0.1;
        second.query_index = 1;

        let candidates = vec![
            first,
            Candidate::new(1, "Ronin", 1998, 7.2),
            second,
            Candidate::new(1, "Ronin", 1998, 7.2),
        ];

        let filtered = DuplicateTitleFilter
            .apply(candidates, &UserContext::default())
            .unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].title, "Heat");
        assert_eq!(filtered[0].distance, 0.5);
        assert_eq!(filtered[1].title, "Ronin");
    }

    #[test]
    fn test_distinct_rows_sharing_a_title_collapse() {
        let candidates = vec![
            Candidate::new(10, "Solaris", 1972, 8.0),
            Candidate::new(11, "Solaris", 2002, 6.2),
        ];
        let filtered = DuplicateTitleFilter
            .apply(candidates, &UserContext::default())
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].year, 1972);
    }
}
