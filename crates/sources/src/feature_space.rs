//! Aligning the profile table and the catalog on a shared numeric feature space.
//!
//! ## Algorithm
//! 1. Walk the catalog header in order and keep every column the profile
//!    table also has, except "Original Title" and "Your Rating"
//! 2. Drop columns holding non-numeric cells in either table (dates, text)
//! 3. Require "IMDb Rating" and "Year" among the survivors; both are
//!    re-weighted after scaling
//! 4. Extract row vectors, skipping any row with a missing cell in a
//!    feature column (and, on the profile side, in "Your Rating")

use anyhow::{Result, anyhow, bail};
use data_loader::Table;
use ndarray::{Array1, Array2};
use data_loader::types::{IMDB_RATING, ORIGINAL_TITLE, YEAR, YOUR_RATING};
use tracing::{debug, warn};

/// Ordered feature columns present in both tables
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpace {
    columns: Vec<String>,
    imdb_rating_index: usize,
    year_index: usize,
}

/// Complete profile rows projected onto the feature space
#[derive(Debug, Clone)]
pub struct UserFeatures {
    /// One row per complete profile row, one column per feature
    pub features: Array2<f64>,
    pub your_ratings: Array1<f64>,
}

/// Complete catalog rows projected onto the feature space
#[derive(Debug, Clone)]
pub struct CatalogFeatures {
    pub features: Array2<f64>,
    /// Position in the source table of each feature row
    pub rows: Vec<usize>,
}

impl FeatureSpace {
    pub fn align(user: &Table, catalog: &Table) -> Result<Self> {
        if !user.has_column(YOUR_RATING) {
            bail!("Profile table has no '{}' column", YOUR_RATING);
        }

        let mut columns: Vec<String> = Vec::new();
        for name in catalog.headers() {
            if name == ORIGINAL_TITLE || name == YOUR_RATING {
                continue;
            }
            if !user.has_column(name) || columns.contains(name) {
                continue;
            }
            if !user.is_numeric_column(name) || !catalog.is_numeric_column(name) {
                warn!("Skipping non-numeric shared column '{}'", name);
                continue;
            }
            columns.push(name.clone());
        }

        let position = |target: &str| {
            columns
                .iter()
                .position(|c| c == target)
                .ok_or_else(|| anyhow!("Feature column '{}' is not shared by both tables", target))
        };
        let imdb_rating_index = position(IMDB_RATING)?;
        let year_index = position(YEAR)?;

        debug!("Feature space: {:?}", columns);
        Ok(Self {
            columns,
            imdb_rating_index,
            year_index,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dimension(&self) -> usize {
        self.columns.len()
    }

    pub fn imdb_rating_index(&self) -> usize {
        self.imdb_rating_index
    }

    pub fn year_index(&self) -> usize {
        self.year_index
    }

    /// Profile rows with every feature and "Your Rating" present
    pub fn user_features(&self, user: &Table) -> Result<UserFeatures> {
        let columns = self.numeric_columns(user)?;
        let ratings = user
            .numeric_column(YOUR_RATING)
            .ok_or_else(|| anyhow!("Profile table has no '{}' column", YOUR_RATING))?;

        let mut values = Vec::new();
        let mut your_ratings = Vec::new();
        for (row, rating) in ratings.into_iter().enumerate() {
            if let (Some(features), Some(rating)) = (collect_row(&columns, row), rating) {
                values.extend(features);
                your_ratings.push(rating);
            }
        }
        Ok(UserFeatures {
            features: Array2::from_shape_vec((your_ratings.len(), self.dimension()), values)?,
            your_ratings: Array1::from(your_ratings),
        })
    }

    /// Catalog rows with every feature present
    pub fn catalog_features(&self, catalog: &Table) -> Result<CatalogFeatures> {
        let columns = self.numeric_columns(catalog)?;

        let mut values = Vec::new();
        let mut rows = Vec::new();
        for row in 0..catalog.len() {
            if let Some(features) = collect_row(&columns, row) {
                values.extend(features);
                rows.push(row);
            }
        }
        Ok(CatalogFeatures {
            features: Array2::from_shape_vec((rows.len(), self.dimension()), values)?,
            rows,
        })
    }

    fn numeric_columns(&self, table: &Table) -> Result<Vec<Vec<Option<f64>>>> {
        self.columns
            .iter()
            .map(|name| {
                table
                    .numeric_column(name)
                    .ok_or_else(|| anyhow!("Table has no feature column '{}'", name))
            })
            .collect()
    }
}

fn collect_row(columns: &[Vec<Option<f64>>], row: usize) -> Option<Vec<f64>> {
    columns.iter().map(|col| col[row]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_align_uses_catalog_order_and_skips_text() {
        let user = table(
            &["Your Rating", "Original Title", "Year", "Date Rated", "IMDb Rating", "Drama"],
            &[&["9", "Heat", "1995", "2020-01-01", "8.3", "1"]],
        );
        let catalog = table(
            &["Original Title", "Drama", "IMDb Rating", "Year", "Date Rated", "Num Votes"],
            &[&["Alien", "0", "8.5", "1979", "2020-01-01", "900000"]],
        );

        let space = FeatureSpace::align(&user, &catalog).unwrap();
        assert_eq!(space.columns(), &["Drama", "IMDb Rating", "Year"]);
        assert_eq!(space.imdb_rating_index(), 1);
        assert_eq!(space.year_index(), 2);
    }

    #[test]
    fn test_align_requires_rating_and_year() {
        let user = table(&["Your Rating", "IMDb Rating"], &[&["9", "8.3"]]);
        let catalog = table(&["IMDb Rating", "Year"], &[&["8.5", "1979"]]);
        assert!(FeatureSpace::align(&user, &catalog).is_err());

        let user = table(&["IMDb Rating", "Year"], &[&["8.3", "1995"]]);
        assert!(FeatureSpace::align(&user, &catalog).is_err());
    }

    #[test]
    fn test_incomplete_rows_are_skipped() {
        let user = table(
            &["Your Rating", "IMDb Rating", "Year"],
            &[&["9", "8.3", "1995"], &["", "8.0", "2000"], &["7", "7.1", ""]],
        );
        let catalog = table(
            &["IMDb Rating", "Year"],
            &[&["8.5", "1979"], &["", "1980"], &["6.0", "1999"]],
        );
        let space = FeatureSpace::align(&user, &catalog).unwrap();

        let user_features = space.user_features(&user).unwrap();
        assert_eq!(user_features.features, array![[8.3, 1995.0]]);
        assert_eq!(user_features.your_ratings, array![9.0]);

        let catalog_features = space.catalog_features(&catalog).unwrap();
        assert_eq!(catalog_features.rows, vec![0, 2]);
        assert_eq!(catalog_features.features.row(1), array![6.0, 1999.0]);
    }

    #[test]
    fn test_boolean_genre_flags_join_the_feature_space() {
        let user = table(
            &["Your Rating", "IMDb Rating", "Year", "Drama"],
            &[&["9", "8.3", "1995", "1"]],
        );
        let catalog = table(
            &["IMDb Rating", "Year", "Drama"],
            &[&["8.5", "1979", "True"], &["7.0", "1990", "False"]],
        );
        let space = FeatureSpace::align(&user, &catalog).unwrap();
        assert_eq!(space.columns(), &["IMDb Rating", "Year", "Drama"]);

        let catalog_features = space.catalog_features(&catalog).unwrap();
        assert_eq!(catalog_features.features.column(2), array![1.0, 0.0]);
    }
}
