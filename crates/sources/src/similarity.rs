//! Similarity Source - nearest catalog neighbours of the user's rated movies
//!
//! ## Algorithm
//! 1. Keep catalog rows with more than 700 votes and released after 1930
//! 2. Align both tables on their shared numeric columns
//! 3. Fit a standard scaler on the user's rows, apply it to both tables
//! 4. Re-weight: "IMDb Rating" x3.5 on both sides; catalog "Year" compressed
//!    to `year * 0.0005 + mean(catalog year) * 0.0005`
//! 5. Append "Your Rating" to user vectors and a constant 0.0 to catalog vectors
//! 6. Query the 20 nearest catalog rows for every user row
//!
//! Scaling statistics come from the user's rows only, and only the catalog
//! side of the year column is compressed. Changing either moves neighbours.

use crate::feature_space::FeatureSpace;
use crate::neighbors::NearestNeighbors;
use crate::scaler::StandardScaler;
use crate::types::Candidate;
use anyhow::{Context, Result, anyhow, bail};
use data_loader::Table;
use data_loader::types::{NUM_VOTES, ORIGINAL_TITLE, YEAR};
use ndarray::{Array1, Array2, Axis, concatenate};
use tracing::{debug, instrument};

/// Generates recommendation candidates by k-nearest-neighbour search
#[derive(Debug, Clone)]
pub struct SimilaritySource {
    /// Catalog rows need strictly more votes than this
    min_votes: f64,

    /// Catalog rows need a release year strictly after this
    min_year: f64,

    /// Neighbours retrieved per rated movie
    neighbors_per_query: usize,

    /// Multiplier applied to the scaled "IMDb Rating" column on both sides
    imdb_rating_weight: f64,

    /// Multiplier applied to the scaled catalog "Year" column
    catalog_year_weight: f64,
}

impl Default for SimilaritySource {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilaritySource {
    pub fn new() -> Self {
        Self {
            min_votes: 700.0,
            min_year: 1930.0,
            neighbors_per_query: 20,
            imdb_rating_weight: 3.5,
            catalog_year_weight: 0.0005,
        }
    }

    /// Configure the vote-count threshold (default: 700, exclusive)
    pub fn with_min_votes(mut self, votes: f64) -> Self {
        self.min_votes = votes;
        self
    }

    /// Configure the release-year threshold (default: 1930, exclusive)
    pub fn with_min_year(mut self, year: f64) -> Self {
        self.min_year = year;
        self
    }

    /// Configure neighbours per rated movie (default: 20)
    pub fn with_neighbors_per_query(mut self, k: usize) -> Self {
        self.neighbors_per_query = k;
        self
    }

    /// Configure the IMDb rating weight (default: 3.5)
    pub fn with_imdb_rating_weight(mut self, weight: f64) -> Self {
        self.imdb_rating_weight = weight;
        self
    }

    /// Configure the catalog year weight (default: 0.0005)
    pub fn with_catalog_year_weight(mut self, weight: f64) -> Self {
        self.catalog_year_weight = weight;
        self
    }

    pub fn neighbors_per_query(&self) -> usize {
        self.neighbors_per_query
    }

    /// Drop obscure and very old catalog rows.
    ///
    /// Rows whose vote count or year is missing do not pass.
    pub fn filter_catalog(&self, catalog: &Table) -> Result<Table> {
        let votes = catalog
            .numeric_column(NUM_VOTES)
            .ok_or_else(|| anyhow!("Catalog has no '{}' column", NUM_VOTES))?;
        let years = catalog
            .numeric_column(YEAR)
            .ok_or_else(|| anyhow!("Catalog has no '{}' column", YEAR))?;

        let kept: Vec<usize> = votes
            .iter()
            .zip(&years)
            .enumerate()
            .filter(|(_, (v, y))| {
                matches!((v, y), (Some(v), Some(y)) if *v > self.min_votes && *y > self.min_year)
            })
            .map(|(i, _)| i)
            .collect();

        debug!(
            "Catalog filter kept {} of {} rows",
            kept.len(),
            catalog.len()
        );
        Ok(catalog.select_rows(&kept))
    }

    /// Generate candidates for a stored profile against the catalog.
    ///
    /// Candidates come back grouped by user row, nearest first. Duplicates
    /// across user rows are kept; filtering happens downstream.
    #[instrument(skip_all, fields(user_rows = user.len(), catalog_rows = catalog.len()))]
    pub fn get_candidates(&self, user: &Table, catalog: &Table) -> Result<Vec<Candidate>> {
        let catalog = self.filter_catalog(catalog)?;

        let space = FeatureSpace::align(user, &catalog).context("Aligning feature columns")?;
        let user_features = space.user_features(user)?;
        let catalog_features = space.catalog_features(&catalog)?;

        if user_features.features.nrows() == 0 {
            bail!("Profile has no complete rows to compare");
        }
        if catalog_features.features.nrows() == 0 {
            debug!("No complete catalog rows left after filtering");
            return Ok(Vec::new());
        }
        debug!(
            "Comparing {} user rows against {} catalog rows over {} features",
            user_features.features.nrows(),
            catalog_features.features.nrows(),
            space.dimension()
        );

        // Scaling statistics come from the user side only
        let mut scaler = StandardScaler::new();
        let mut user_scaled = scaler.fit_transform(&user_features.features)?;
        let mut catalog_scaled = scaler.transform(&catalog_features.features)?;

        let rating_col = space.imdb_rating_index();
        let year_col = space.year_index();
        let weight = self.imdb_rating_weight;
        user_scaled.column_mut(rating_col).mapv_inplace(|v| v * weight);
        catalog_scaled.column_mut(rating_col).mapv_inplace(|v| v * weight);

        let year_mean = catalog_features
            .features
            .column(year_col)
            .mean()
            .ok_or_else(|| anyhow!("Catalog year column is empty"))?;
        let year_weight = self.catalog_year_weight;
        catalog_scaled
            .column_mut(year_col)
            .mapv_inplace(|v| v * year_weight + year_mean * year_weight);

        // Trailing preference dimension: the user's rating, and 0.0 on the
        // catalog side where no rating exists
        let user_scaled = append_column(&user_scaled, &user_features.your_ratings)?;
        let catalog_scaled =
            append_column(&catalog_scaled, &Array1::zeros(catalog_scaled.nrows()))?;

        let index = NearestNeighbors::fit(catalog_scaled);
        let neighbors = index.kneighbors(&user_scaled, self.neighbors_per_query);

        let titles = catalog
            .text_column(ORIGINAL_TITLE)
            .ok_or_else(|| anyhow!("Catalog has no '{}' column", ORIGINAL_TITLE))?;

        let mut candidates = Vec::with_capacity(neighbors.iter().map(Vec::len).sum());
        for (query_index, hits) in neighbors.iter().enumerate() {
            for (rank, hit) in hits.iter().enumerate() {
                let row = catalog_features.rows[hit.index];
                let raw = catalog_features.features.row(hit.index);
                let Some(title) = titles[row] else {
                    debug!("Skipping catalog row {} without a title", row);
                    continue;
                };
                candidates.push(Candidate {
                    catalog_row: row,
                    title: title.to_string(),
                    year: raw[year_col] as i32,
                    imdb_rating: raw[rating_col],
                    distance: hit.distance,
                    query_index,
                    rank,
                });
            }
        }

        debug!("Generated {} similarity candidates", candidates.len());
        Ok(candidates)
    }
}

/// `matrix` with `values` as an extra last column
fn append_column(matrix: &Array2<f64>, values: &Array1<f64>) -> Result<Array2<f64>> {
    Ok(concatenate(
        Axis(1),
        &[matrix.view(), values.view().insert_axis(Axis(1))],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    const CATALOG_HEADERS: [&str; 5] =
        ["Original Title", "IMDb Rating", "Runtime (mins)", "Year", "Num Votes"];
    const USER_HEADERS: [&str; 5] =
        ["Your Rating", "Original Title", "IMDb Rating", "Runtime (mins)", "Year"];

    #[test]
    fn test_catalog_filter_is_strict() {
        let catalog = table(
            &CATALOG_HEADERS,
            &[
                &["Exactly 700 votes", "8.0", "100", "1990", "700"],
                &["Exactly 1930", "8.0", "100", "1930", "5000"],
                &["Kept", "8.0", "100", "1931", "701"],
                &["No votes", "8.0", "100", "1990", ""],
            ],
        );
        let filtered = SimilaritySource::new().filter_catalog(&catalog).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.cell(0, 0), Some("Kept"));
    }

    #[test]
    fn test_identical_catalog_rows_both_retrieved() {
        let user = table(&USER_HEADERS, &[&["9", "The Shawshank Redemption", "9.3", "142", "1994"]]);
        let catalog = table(
            &CATALOG_HEADERS,
            &[
                &["The Shawshank Redemption", "9.3", "142", "1994", "2800000"],
                &["Foo", "9.3", "142", "1994", "2800000"],
            ],
        );

        let candidates = SimilaritySource::new().get_candidates(&user, &catalog).unwrap();
        let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["The Shawshank Redemption", "Foo"]);
        assert_eq!(candidates[0].year, 1994);
        assert_eq!(candidates[0].imdb_rating, 9.3);
        assert_eq!(candidates[0].distance, candidates[1].distance);
    }

    #[test]
    fn test_candidates_grouped_by_query_nearest_first() {
        let user = table(
            &USER_HEADERS,
            &[
                &["8", "Short", "7.0", "90", "2000"],
                &["6", "Long", "8.0", "180", "2010"],
            ],
        );
        let catalog = table(
            &CATALOG_HEADERS,
            &[
                &["Long-ish", "8.0", "175", "2010", "10000"],
                &["Short-ish", "7.0", "92", "2000", "10000"],
                &["Middle", "7.5", "135", "2005", "10000"],
            ],
        );

        let source = SimilaritySource::new().with_neighbors_per_query(2);
        let candidates = source.get_candidates(&user, &catalog).unwrap();

        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].query_index, 0);
        assert_eq!(candidates[0].title, "Short-ish");
        assert_eq!(candidates[2].query_index, 1);
        assert_eq!(candidates[2].title, "Long-ish");
        for pair in candidates.chunks(2) {
            assert!(pair[0].distance <= pair[1].distance);
            assert_eq!(pair[0].rank, 0);
            assert_eq!(pair[1].rank, 1);
        }
    }

    #[test]
    fn test_distance_after_weighting() {
        // User columns scale to z = -1 and z = +1 (means 8 / 110 / 2005,
        // stds 1 / 10 / 5). The catalog row sits on the means, so it scales
        // to zero everywhere except Year, which becomes 0 * 0.0005 + 2005 *
        // 0.0005.
        let user = table(
            &USER_HEADERS,
            &[
                &["8", "Low", "7.0", "100", "2000"],
                &["6", "High", "9.0", "120", "2010"],
            ],
        );
        let catalog = table(&CATALOG_HEADERS, &[&["Centre", "8.0", "110", "2005", "10000"]]);

        let candidates = SimilaritySource::new().get_candidates(&user, &catalog).unwrap();
        assert_eq!(candidates.len(), 2);

        let catalog_year: f64 = 2005.0 * 0.0005;
        let expected_low =
            (3.5f64.powi(2) + 1.0 + (-1.0 - catalog_year).powi(2) + 8.0f64.powi(2)).sqrt();
        let expected_high =
            (3.5f64.powi(2) + 1.0 + (1.0 - catalog_year).powi(2) + 6.0f64.powi(2)).sqrt();
        assert_eq!(candidates[0].query_index, 0);
        assert!((candidates[0].distance - expected_low).abs() < 1e-9);
        assert_eq!(candidates[1].query_index, 1);
        assert!((candidates[1].distance - expected_high).abs() < 1e-9);
    }

    #[test]
    fn test_rating_weight_changes_nearest_neighbour() {
        // From "Low" (z = -1 on rating and runtime), "Same rating" is 4
        // runtime stds away while "Close runtime" is 1.5 rating stds away.
        // Unweighted the latter is nearer; x3.5 on rating flips the order.
        let user = table(
            &USER_HEADERS,
            &[
                &["8", "Low", "7.0", "100", "2000"],
                &["6", "High", "9.0", "120", "2010"],
            ],
        );
        let catalog = table(
            &CATALOG_HEADERS,
            &[
                &["Same rating", "7.0", "140", "2000", "10000"],
                &["Close runtime", "8.5", "100", "2000", "10000"],
            ],
        );

        let weighted = SimilaritySource::new().get_candidates(&user, &catalog).unwrap();
        assert_eq!(weighted[0].query_index, 0);
        assert_eq!(weighted[0].title, "Same rating");

        let unweighted = SimilaritySource::new()
            .with_imdb_rating_weight(1.0)
            .get_candidates(&user, &catalog)
            .unwrap();
        assert_eq!(unweighted[0].query_index, 0);
        assert_eq!(unweighted[0].title, "Close runtime");
    }

    #[test]
    fn test_catalog_positions_survive_missing_features() {
        let user = table(&USER_HEADERS, &[&["9", "Heat", "8.3", "170", "1995"]]);
        let catalog = table(
            &CATALOG_HEADERS,
            &[
                &["Broken", "8.3", "", "1995", "10000"],
                &["Ronin", "7.2", "122", "1998", "10000"],
            ],
        );

        let candidates = SimilaritySource::new().get_candidates(&user, &catalog).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Ronin");
        assert_eq!(candidates[0].catalog_row, 1);
        assert_eq!(candidates[0].year, 1998);
    }

    #[test]
    fn test_empty_catalog_after_filter_is_not_an_error() {
        let user = table(&USER_HEADERS, &[&["9", "Heat", "8.3", "170", "1995"]]);
        let catalog = table(&CATALOG_HEADERS, &[&["Obscure", "8.0", "100", "1990", "12"]]);

        let candidates = SimilaritySource::new().get_candidates(&user, &catalog).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_profile_without_complete_rows_is_an_error() {
        let user = table(&USER_HEADERS, &[&["", "Heat", "8.3", "170", "1995"]]);
        let catalog = table(&CATALOG_HEADERS, &[&["Ronin", "7.2", "122", "1998", "10000"]]);

        assert!(SimilaritySource::new().get_candidates(&user, &catalog).is_err());
    }
}
