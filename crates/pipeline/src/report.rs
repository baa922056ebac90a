//! Structured outcome of an ingestion run.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a row was left out of the encoded table.
///
/// Variant order is the order reasons are checked in; a row is counted once,
/// under the first reason that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// "Title Type" is not exactly "Movie"
    NotAMovie,
    /// "Date Rated" or "Release Date" is present but not `YYYY-MM-DD`
    UnparseableDate,
    /// Some other kept column is empty or not a number
    MissingValue,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DropReason::NotAMovie => "not a movie",
            DropReason::UnparseableDate => "unparseable date",
            DropReason::MissingValue => "missing value",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped: BTreeMap<DropReason, usize>,
    /// Genre tokens outside the vocabulary, with occurrence counts
    pub unknown_genres: BTreeMap<String, usize>,
    pub vocabulary_version: u32,
}

impl IngestReport {
    pub fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }

    pub fn record_unknown_genre(&mut self, genre: &str) {
        *self.unknown_genres.entry(genre.to_string()).or_insert(0) += 1;
    }

    pub fn dropped_for(&self, reason: DropReason) -> usize {
        self.dropped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }
}
