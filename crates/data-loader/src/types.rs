//! Core domain types for rating uploads and the movie catalog.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Column names shared by the upload, the encoded profile and the catalog
//! - `ProfileId`, the key of the profile store
//! - `RawRatingRecord`, one typed row of an upload
//! - `EncodedRatingRecord`, one row that survived feature encoding

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataLoadError;

// =============================================================================
// Column names
// =============================================================================

pub const CONST: &str = "Const";
pub const YOUR_RATING: &str = "Your Rating";
pub const DATE_RATED: &str = "Date Rated";
pub const TITLE: &str = "Title";
pub const ORIGINAL_TITLE: &str = "Original Title";
pub const URL: &str = "URL";
pub const TITLE_TYPE: &str = "Title Type";
pub const IMDB_RATING: &str = "IMDb Rating";
pub const RUNTIME: &str = "Runtime (mins)";
pub const YEAR: &str = "Year";
pub const GENRES: &str = "Genres";
pub const NUM_VOTES: &str = "Num Votes";
pub const RELEASE_DATE: &str = "Release Date";
pub const DIRECTORS: &str = "Directors";

/// Derived columns written by the encoder
pub const RELEASED_YEAR: &str = "Released_Year";
pub const DIRECTORS_ENCODED: &str = "directors_encoded";

/// Columns every upload must carry (order irrelevant)
pub const REQUIRED_COLUMNS: [&str; 14] = [
    CONST,
    YOUR_RATING,
    DATE_RATED,
    TITLE,
    ORIGINAL_TITLE,
    URL,
    TITLE_TYPE,
    IMDB_RATING,
    RUNTIME,
    YEAR,
    GENRES,
    NUM_VOTES,
    RELEASE_DATE,
    DIRECTORS,
];

/// Only rows with exactly this type tag are kept
pub const MOVIE_TITLE_TYPE: &str = "Movie";

// =============================================================================
// Profile identifiers
// =============================================================================

/// Key of a stored user profile.
///
/// Restricted to `[A-Za-z0-9_-]`, 1 to 64 characters, so it can be used
/// directly as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId(String);

impl ProfileId {
    pub const MAX_LEN: usize = 64;

    pub fn new(id: impl Into<String>) -> Result<Self, DataLoadError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id.len() <= Self::MAX_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(Self(id))
        } else {
            Err(DataLoadError::InvalidValue {
                field: "profile id".to_string(),
                value: id,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProfileId {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProfileId {
    type Error = DataLoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProfileId> for String {
    fn from(id: ProfileId) -> Self {
        id.0
    }
}

// =============================================================================
// Upload rows
// =============================================================================

/// One row of a user's rating export, addressed by header name.
///
/// Every field is optional: an empty cell, or a numeric cell that does not
/// parse, is `None`. Deciding what to do with incomplete rows is the
/// encoder's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRatingRecord {
    pub catalog_id: Option<String>,
    pub your_rating: Option<f64>,
    pub date_rated: Option<String>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub url: Option<String>,
    pub title_type: Option<String>,
    pub imdb_rating: Option<f64>,
    pub runtime_mins: Option<f64>,
    pub year: Option<f64>,
    pub genres: Option<String>,
    pub num_votes: Option<f64>,
    pub release_date: Option<String>,
    pub directors: Option<String>,
}

impl RawRatingRecord {
    /// Whether the row is a feature film (exact, case-sensitive match)
    pub fn is_movie(&self) -> bool {
        self.title_type.as_deref() == Some(MOVIE_TITLE_TYPE)
    }
}

// =============================================================================
// Encoded rows
// =============================================================================

/// A fully populated row of the encoded profile table.
///
/// `genres` holds one flag per entry of the vocabulary the batch was encoded
/// with, in vocabulary order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedRatingRecord {
    pub your_rating: f64,
    pub date_rated: NaiveDate,
    pub original_title: String,
    pub imdb_rating: f64,
    pub runtime_mins: f64,
    pub year: f64,
    pub num_votes: f64,
    pub release_date: NaiveDate,
    pub released_year: i32,
    pub genres: Vec<bool>,
    pub directors_encoded: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_id_accepts_simple_names() {
        assert!(ProfileId::new("default").is_ok());
        assert!(ProfileId::new("alice_2-b").is_ok());
        assert_eq!(ProfileId::default().as_str(), "default");
    }

    #[test]
    fn test_profile_id_rejects_paths_and_empty() {
        assert!(ProfileId::new("").is_err());
        assert!(ProfileId::new("../etc").is_err());
        assert!(ProfileId::new("a b").is_err());
        assert!(ProfileId::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_is_movie_is_case_sensitive() {
        let mut record = RawRatingRecord {
            title_type: Some("Movie".to_string()),
            ..Default::default()
        };
        assert!(record.is_movie());

        record.title_type = Some("movie".to_string());
        assert!(!record.is_movie());

        record.title_type = None;
        assert!(!record.is_movie());
    }
}
