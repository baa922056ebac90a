//! Ingestion and post-filtering around the similarity search.
//!
//! This crate provides:
//! - FeatureEncoder turning an uploaded ratings export into an encoded profile
//! - GenreVocabulary, the versioned genre column set
//! - Smoothed director scores
//! - IngestReport counting dropped rows per reason
//! - Filter trait and implementations for candidate post-filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! Upload path:
//! 1. FeatureEncoder validates the columns and encodes the rows
//! 2. The encoded table is stored under the profile id
//!
//! Recommendation path:
//! 1. SimilaritySource retrieves neighbours of every rated movie
//! 2. Filters remove rated titles, repeated titles and low ratings
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FeatureEncoder, FilterPipeline};
//!
//! let batch = FeatureEncoder::new().encode(&upload)?;
//! store.save_profile(&profile_id, &batch.to_table())?;
//!
//! let filtered = FilterPipeline::recommendation_filters().apply(candidates, &context)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod genres;
pub mod directors;
pub mod report;
pub mod features;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use genres::{GenreVocabulary, encode_genres};
pub use directors::smoothed_director_scores;
pub use report::{DropReason, IngestReport};
pub use features::{EncodedBatch, FeatureEncoder};
