//! # Recommendation Orchestrator
//!
//! This module coordinates the two surfaces of the recommender.
//!
//! Upload:
//! 1. Validate the submitted file
//! 2. Encode it into a profile table
//! 3. Replace the stored table for the profile
//!
//! Recommend:
//! 1. Load the stored profile and the catalog from disk
//! 2. Build the user context (rated titles)
//! 3. Generate similarity candidates
//! 4. Apply the post-filters
//! 5. Project to (Movie Title, Year, IMDb Rating)
//!
//! Every call re-reads its inputs; nothing is cached between requests.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument};

use data_loader::{ProfileId, ProfileStore, Table};
use pipeline::{FeatureEncoder, FilterPipeline};
use sources::{Candidate, SimilaritySource, UserContext};

use crate::upload::{UploadError, UploadRequest, UploadResponse};

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "Movie Title")]
    pub movie_title: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "IMDb Rating")]
    pub imdb_rating: f64,
}

impl From<Candidate> for Recommendation {
    fn from(candidate: Candidate) -> Self {
        Self {
            movie_title: candidate.title,
            year: candidate.year,
            imdb_rating: candidate.imdb_rating,
        }
    }
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    store: Arc<ProfileStore>,
    encoder: Arc<FeatureEncoder>,
    similarity: SimilaritySource,
    filter_pipeline: Arc<FilterPipeline>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over `store` with the default encoder,
    /// similarity source and post-filters
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store: Arc::new(store),
            encoder: Arc::new(FeatureEncoder::new()),
            similarity: SimilaritySource::new(),
            filter_pipeline: Arc::new(FilterPipeline::recommendation_filters()),
        }
    }

    /// Configure the feature encoder (e.g. a custom genre vocabulary)
    pub fn with_encoder(mut self, encoder: FeatureEncoder) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    /// Configure the similarity source
    pub fn with_similarity_source(mut self, similarity: SimilaritySource) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Handle an upload for `profile`
    #[instrument(skip_all, fields(profile = %profile))]
    pub fn upload(
        &self,
        profile: &ProfileId,
        request: &UploadRequest,
    ) -> Result<UploadResponse, UploadError> {
        let table = request.validate()?;

        let batch = self
            .encoder
            .encode(&table)
            .context("Failed to encode upload")?;
        self.store
            .save_profile(profile, &batch.to_table())
            .context("Failed to store profile")?;

        info!(
            "Profile '{}' replaced: {} rows kept of {}",
            profile, batch.report.rows_kept, batch.report.rows_read
        );
        Ok(UploadResponse {
            message: "File uploaded successfully".to_string(),
            profile: profile.to_string(),
            report: batch.report,
        })
    }

    /// Main entry point: Get recommendations for a profile
    ///
    /// Fails if the profile was never uploaded or the catalog is absent.
    /// An empty list is a valid result.
    #[instrument(skip_all, fields(profile = %profile))]
    pub fn get_recommendations(&self, profile: &ProfileId) -> Result<Vec<Recommendation>> {
        let start_time = Instant::now();

        let user = self
            .store
            .load_profile(profile)
            .with_context(|| format!("Failed to load profile '{}'", profile))?;
        let catalog = self.store.load_catalog().context("Failed to load catalog")?;
        info!(
            "Loaded {} profile rows and {} catalog rows",
            user.len(),
            catalog.len()
        );

        let context = self.build_user_context(profile, &user)?;

        let candidates = self.generate_candidates(&user, &catalog)?;
        info!("Generated {} similarity candidates", candidates.len());

        let filtered = self
            .filter_pipeline
            .apply(candidates, &context)
            .context("Failed to apply filters")?;

        let recommendations: Vec<Recommendation> =
            filtered.into_iter().map(Recommendation::from).collect();

        info!(
            "Returning {} recommendations for profile '{}' in {:.2?}",
            recommendations.len(),
            profile,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    pub fn list_profiles(&self) -> Result<Vec<ProfileId>> {
        Ok(self.store.list_profiles()?)
    }

    fn build_user_context(&self, profile: &ProfileId, user: &Table) -> Result<UserContext> {
        sources::user_context::build_user_context(profile.clone(), user)
            .context("Failed to build user context")
    }

    fn generate_candidates(&self, user: &Table, catalog: &Table) -> Result<Vec<Candidate>> {
        self.similarity
            .get_candidates(user, catalog)
            .context("Failed to generate similarity candidates")
    }
}
