//! Explicit, versioned genre vocabulary.
//!
//! Genre columns are derived from a declared vocabulary instead of whatever
//! tokens a single upload happens to contain, so every encoded profile has
//! the same genre columns in the same order. The vocabulary version travels
//! with each ingest report.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Separator between genre tokens in the "Genres" cell
pub const GENRE_SEPARATOR: &str = ", ";

/// The IMDb title genres
const IMDB_GENRES: [&str; 28] = [
    "Action",
    "Adult",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film-Noir",
    "Game-Show",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "News",
    "Reality-TV",
    "Romance",
    "Sci-Fi",
    "Short",
    "Sport",
    "Talk-Show",
    "Thriller",
    "War",
    "Western",
];

/// Ordered set of genre names, one encoded column each
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreVocabulary {
    version: u32,
    genres: Vec<String>,
}

impl Default for GenreVocabulary {
    fn default() -> Self {
        Self {
            version: 1,
            genres: IMDB_GENRES.iter().map(|g| g.to_string()).collect(),
        }
    }
}

impl GenreVocabulary {
    /// Build a vocabulary; genres are sorted and deduplicated
    pub fn new(version: u32, genres: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let mut genres: Vec<String> = genres.into_iter().map(Into::into).collect();
        if let Some(bad) = genres
            .iter()
            .find(|g| g.trim().is_empty() || g.contains(GENRE_SEPARATOR))
        {
            bail!("Invalid genre name in vocabulary: {:?}", bad);
        }
        genres.sort();
        genres.dedup();
        Ok(Self { version, genres })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: GenreVocabulary =
            serde_json::from_str(json).context("Failed to parse genre vocabulary")?;
        Self::new(parsed.version, parsed.genres)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read genre vocabulary {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn position(&self, genre: &str) -> Option<usize> {
        self.genres.binary_search_by(|g| g.as_str().cmp(genre)).ok()
    }
}

/// Flags for one "Genres" cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedGenres {
    /// One flag per vocabulary entry, in vocabulary order
    pub flags: Vec<bool>,
    /// Tokens the vocabulary does not know
    pub unknown: Vec<String>,
}

/// One-hot encode a "Genres" cell against `vocabulary`.
///
/// Empty text gives all-zero flags.
pub fn encode_genres(text: &str, vocabulary: &GenreVocabulary) -> EncodedGenres {
    let mut encoded = EncodedGenres {
        flags: vec![false; vocabulary.len()],
        unknown: Vec::new(),
    };
    if text.is_empty() {
        return encoded;
    }

    for token in text.split(GENRE_SEPARATOR) {
        match vocabulary.position(token) {
            Some(i) => encoded.flags[i] = true,
            None => encoded.unknown.push(token.to_string()),
        }
    }
    encoded
}
