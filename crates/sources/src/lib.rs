//! # Sources Crate
//!
//! This crate implements candidate generation for movie recommendations.
//!
//! ## Components
//!
//! ### Similarity Source
//! k-nearest-neighbour search from each of the user's rated movies into the
//! reference catalog:
//! - Catalog restricted to well-known titles (>700 votes, after 1930)
//! - Features standardised with statistics from the user's own ratings
//! - IMDb rating emphasised, catalog release year compressed
//! - 20 neighbours per rated movie
//!
//! ### Building Blocks
//! - **feature_space**: Shared numeric columns of profile and catalog
//! - **scaler**: Standard scaler (population std, zero variance kept at 1.0)
//! - **neighbors**: Exhaustive Euclidean neighbour index over `ndarray` rows,
//!   parallel over queries
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{SimilaritySource, user_context::build_user_context};
//! use data_loader::{ProfileId, ProfileStore};
//!
//! let store = ProfileStore::open("data/processed")?;
//! let profile = store.load_profile(&ProfileId::default())?;
//! let catalog = store.load_catalog()?;
//!
//! let context = build_user_context(ProfileId::default(), &profile)?;
//! let candidates = SimilaritySource::new().get_candidates(&profile, &catalog)?;
//! ```

// Public modules
pub mod types;
pub mod user_context;
pub mod feature_space;
pub mod scaler;
pub mod neighbors;
pub mod similarity;

// Re-export commonly used types
pub use types::{Candidate, UserContext};
pub use feature_space::FeatureSpace;
pub use neighbors::{NearestNeighbors, Neighbor};
pub use scaler::StandardScaler;
pub use similarity::SimilaritySource;
