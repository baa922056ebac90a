//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_rated;
pub mod duplicate_title;
pub mod minimum_rating;

// Re-export for convenience
pub use already_rated::AlreadyRatedFilter;
pub use duplicate_title::DuplicateTitleFilter;
pub use minimum_rating::MinimumRatingFilter;
