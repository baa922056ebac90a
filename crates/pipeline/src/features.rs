//! Rating ingestion and feature encoding.
//!
//! Turns an uploaded IMDb ratings export into the encoded profile table the
//! similarity source compares against the catalog.
//!
//! ## Algorithm
//! 1. Reject the upload if any required column is absent
//! 2. Keep rows whose "Title Type" is exactly "Movie"
//! 3. Parse "Date Rated" and "Release Date" as `YYYY-MM-DD`; a bad date
//!    drops the row
//! 4. Drop rows with any other missing value; "Title" becomes the
//!    "Original Title" of the encoded row
//! 5. Derive "Released_Year" from the release date
//! 6. One-hot encode "Genres" against the genre vocabulary
//! 7. Replace "Directors" with the smoothed director score
//!
//! Every dropped row is counted in the `IngestReport`.

use crate::directors::{DEFAULT_DIRECTOR_ALPHA, smoothed_director_scores};
use crate::genres::{GenreVocabulary, encode_genres};
use crate::report::{DropReason, IngestReport};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use data_loader::parser::{format_date, parse_date, parse_raw_records};
use data_loader::types::{
    DATE_RATED, DIRECTORS_ENCODED, IMDB_RATING, NUM_VOTES, ORIGINAL_TITLE, RELEASE_DATE,
    RELEASED_YEAR, RUNTIME, YEAR, YOUR_RATING,
};
use data_loader::{EncodedRatingRecord, RawRatingRecord, Table};
use rayon::prelude::*;
use tracing::{info, instrument};

/// A row that passed every check but has no director score yet
struct CompleteRow {
    your_rating: f64,
    date_rated: NaiveDate,
    title: String,
    imdb_rating: f64,
    runtime_mins: f64,
    year: f64,
    num_votes: f64,
    release_date: NaiveDate,
    genres: String,
    directors: String,
}

/// Encoded rows plus the vocabulary they were encoded with
#[derive(Debug, Clone)]
pub struct EncodedBatch {
    pub vocabulary: GenreVocabulary,
    pub records: Vec<EncodedRatingRecord>,
    pub report: IngestReport,
}

impl EncodedBatch {
    /// Column order of the encoded profile table
    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = [
            YOUR_RATING,
            DATE_RATED,
            ORIGINAL_TITLE,
            IMDB_RATING,
            RUNTIME,
            YEAR,
            NUM_VOTES,
            RELEASE_DATE,
            RELEASED_YEAR,
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();
        headers.extend(self.vocabulary.genres().iter().cloned());
        headers.push(DIRECTORS_ENCODED.to_string());
        headers
    }

    /// Render as a table ready for the profile store.
    ///
    /// Genre flags are written as `1`/`0`.
    pub fn to_table(&self) -> Table {
        let rows = self
            .records
            .iter()
            .map(|r| {
                let mut row = vec![
                    r.your_rating.to_string(),
                    format_date(r.date_rated),
                    r.original_title.clone(),
                    r.imdb_rating.to_string(),
                    r.runtime_mins.to_string(),
                    r.year.to_string(),
                    r.num_votes.to_string(),
                    format_date(r.release_date),
                    r.released_year.to_string(),
                ];
                row.extend(r.genres.iter().map(|&g| if g { "1" } else { "0" }.to_string()));
                row.push(r.directors_encoded.to_string());
                row
            })
            .collect();
        Table::new(self.headers(), rows)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Encodes uploaded rating exports
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    vocabulary: GenreVocabulary,
    director_alpha: f64,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureEncoder {
    pub fn new() -> Self {
        Self {
            vocabulary: GenreVocabulary::default(),
            director_alpha: DEFAULT_DIRECTOR_ALPHA,
        }
    }

    /// Configure the genre vocabulary (default: IMDb genres, version 1)
    pub fn with_vocabulary(mut self, vocabulary: GenreVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Configure director score smoothing (default: 10)
    pub fn with_director_alpha(mut self, alpha: f64) -> Self {
        self.director_alpha = alpha;
        self
    }

    pub fn vocabulary(&self) -> &GenreVocabulary {
        &self.vocabulary
    }

    /// Encode an uploaded table.
    ///
    /// Fails only when required columns are missing; bad cells drop their
    /// row and are counted in the report.
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn encode(&self, table: &Table) -> Result<EncodedBatch> {
        let records = parse_raw_records(table).context("Upload rejected")?;

        let mut report = IngestReport {
            rows_read: records.len(),
            vocabulary_version: self.vocabulary.version(),
            ..Default::default()
        };

        let checked: Vec<Result<CompleteRow, DropReason>> =
            records.par_iter().map(check_row).collect();

        let mut complete = Vec::with_capacity(checked.len());
        for row in checked {
            match row {
                Ok(row) => complete.push(row),
                Err(reason) => report.record_drop(reason),
            }
        }

        let director_scores = smoothed_director_scores(
            complete.iter().map(|r| (r.directors.as_str(), r.imdb_rating)),
            self.director_alpha,
        );

        let mut encoded = Vec::with_capacity(complete.len());
        for row in complete {
            let genres = encode_genres(&row.genres, &self.vocabulary);
            for token in &genres.unknown {
                report.record_unknown_genre(token);
            }
            let directors_encoded = director_scores
                .get(&row.directors)
                .copied()
                .context("Director score missing for a kept row")?;

            encoded.push(EncodedRatingRecord {
                your_rating: row.your_rating,
                date_rated: row.date_rated,
                original_title: row.title,
                imdb_rating: row.imdb_rating,
                runtime_mins: row.runtime_mins,
                year: row.year,
                num_votes: row.num_votes,
                release_date: row.release_date,
                released_year: row.release_date.year(),
                genres: genres.flags,
                directors_encoded,
            });
        }
        report.rows_kept = encoded.len();

        info!(
            "Encoded {} of {} rows ({} dropped, {} unknown genre tokens)",
            report.rows_kept,
            report.rows_read,
            report.total_dropped(),
            report.unknown_genres.len()
        );

        Ok(EncodedBatch {
            vocabulary: self.vocabulary.clone(),
            records: encoded,
            report,
        })
    }
}

/// Classify one upload row
fn check_row(record: &RawRatingRecord) -> Result<CompleteRow, DropReason> {
    if !record.is_movie() {
        return Err(DropReason::NotAMovie);
    }

    let date_rated = parse_date_cell(record.date_rated.as_deref())?;
    let release_date = parse_date_cell(record.release_date.as_deref())?;

    let complete = || -> Option<CompleteRow> {
        Some(CompleteRow {
            your_rating: record.your_rating?,
            date_rated: date_rated?,
            title: record.title.clone()?,
            imdb_rating: record.imdb_rating?,
            runtime_mins: record.runtime_mins?,
            year: record.year?,
            num_votes: record.num_votes?,
            release_date: release_date?,
            genres: record.genres.clone()?,
            directors: record.directors.clone()?,
        })
    };
    complete().ok_or(DropReason::MissingValue)
}

/// `Ok(None)` for an empty cell, `Err` for text that is not a date
fn parse_date_cell(cell: Option<&str>) -> Result<Option<NaiveDate>, DropReason> {
    match cell {
        None => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .ok_or(DropReason::UnparseableDate),
    }
}
