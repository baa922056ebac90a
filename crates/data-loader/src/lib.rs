//! # Data Loader Crate
//!
//! This crate handles reading and persisting the tables the recommender works on:
//! IMDb rating exports uploaded by a user, the encoded per-profile tables,
//! and the reference movie catalog.
//!
//! ## Main Components
//!
//! - **types**: Column names, `ProfileId`, raw and encoded rating records
//! - **table**: Header-addressed CSV table with lenient typed column access
//! - **parser**: CSV I/O, required-column validation, date parsing
//! - **store**: Keyed profile store plus the read-only catalog
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{ProfileId, ProfileStore};
//!
//! let store = ProfileStore::open("data/processed")?;
//! let catalog = store.load_catalog()?;
//! let profile = store.load_profile(&ProfileId::default())?;
//!
//! println!("{} rated movies against {} catalog rows", profile.len(), catalog.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod table;
pub mod parser;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use store::ProfileStore;
pub use table::Table;
pub use types::{
    EncodedRatingRecord,
    ProfileId,
    RawRatingRecord,
    REQUIRED_COLUMNS,
};
