//! Types shared between candidate generation and the filter pipeline.

use data_loader::ProfileId;
use serde::Serialize;
use std::collections::HashSet;

/// A catalog movie retrieved as a neighbour of one of the user's rated movies.
///
/// Candidates are produced in neighbour-search order: grouped by the query
/// (rated movie) that retrieved them, closest first within each group. The
/// same catalog movie may appear under several queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// Row position in the vote/year-filtered catalog
    pub catalog_row: usize,
    pub title: String,
    pub year: i32,
    pub imdb_rating: f64,
    /// Euclidean distance in the weighted feature space
    pub distance: f64,
    /// Which of the user's complete rows retrieved this candidate
    pub query_index: usize,
    /// Position within that query's neighbour list (0 = closest)
    pub rank: usize,
}

impl Candidate {
    pub fn new(catalog_row: usize, title: impl Into<String>, year: i32, imdb_rating: f64) -> Self {
        Self {
            catalog_row,
            title: title.into(),
            year,
            imdb_rating,
            distance: 0.0,
            query_index: 0,
            rank: 0,
        }
    }
}

/// What the filters need to know about the requesting profile
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub profile_id: ProfileId,
    /// Every title in the stored profile, compared by exact string match
    pub rated_titles: HashSet<String>,
}

impl UserContext {
    pub fn new(profile_id: ProfileId) -> Self {
        Self {
            profile_id,
            rated_titles: HashSet::new(),
        }
    }

    pub fn has_rated(&self, title: &str) -> bool {
        self.rated_titles.contains(title)
    }
}
