//! On-disk layout of the processed-data directory.
//!
//! ```text
//! <data_dir>/
//!     imdb_movies.csv          catalog feature table, supplied externally
//!     profiles/<profile>.csv   encoded ratings, one file per profile
//! ```
//!
//! Each profile file is replaced wholesale on upload. Writes go to a named
//! temporary file in the same directory that is persisted over the target,
//! so a reader sees either the old table or the new one. A write or persist
//! that fails drops the temporary file. Concurrent uploads to the same
//! profile are last-writer-wins.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::table::Table;
use crate::types::ProfileId;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::{debug, info};

pub const CATALOG_FILE: &str = "imdb_movies.csv";
pub const PROFILES_DIR: &str = "profiles";

/// Keyed store of encoded profile tables plus the read-only catalog
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    /// Open a store rooted at `data_dir`, creating directories if absent
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let root = data_dir.into();
        fs::create_dir_all(root.join(PROFILES_DIR))?;
        debug!("Opened profile store at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    pub fn profile_path(&self, id: &ProfileId) -> PathBuf {
        self.root
            .join(PROFILES_DIR)
            .join(format!("{}.csv", id.as_str()))
    }

    /// Replace the stored table for `id`
    pub fn save_profile(&self, id: &ProfileId, table: &Table) -> Result<()> {
        let target = self.profile_path(id);
        let prefix = format!(".{}.", id.as_str());
        let mut tmp = Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(self.root.join(PROFILES_DIR))?;

        parser::write_table(BufWriter::new(&mut tmp), table)?;
        tmp.persist(&target)
            .map_err(|e| DataLoadError::IoError(e.error))?;

        info!(
            "Stored {} rows for profile '{}' at {:?}",
            table.len(),
            id,
            target
        );
        Ok(())
    }

    /// Load the stored table for `id`
    pub fn load_profile(&self, id: &ProfileId) -> Result<Table> {
        let path = self.profile_path(id);
        match parser::read_table_from_path(&path) {
            Err(DataLoadError::FileNotFound { .. }) => {
                Err(DataLoadError::ProfileNotFound(id.to_string()))
            }
            other => other,
        }
    }

    pub fn has_profile(&self, id: &ProfileId) -> bool {
        self.profile_path(id).is_file()
    }

    /// Load the catalog feature table
    pub fn load_catalog(&self) -> Result<Table> {
        let path = self.catalog_path();
        match parser::read_table_from_path(&path) {
            Err(DataLoadError::FileNotFound { .. }) => Err(DataLoadError::CatalogNotFound {
                path: path.display().to_string(),
            }),
            other => other,
        }
    }

    /// Ids of every stored profile, sorted
    pub fn list_profiles(&self) -> Result<Vec<ProfileId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.root.join(PROFILES_DIR))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            // Names that are not valid ids were not written by this store
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| ProfileId::new(s).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}
