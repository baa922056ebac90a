//! Server crate for the reel-match recommender.
//!
//! This crate contains the orchestrator behind the two surfaces, upload and
//! recommend, together with upload validation and output rendering.

pub mod orchestrator;
pub mod render;
pub mod upload;

pub use orchestrator::{Recommendation, RecommendationOrchestrator};
pub use render::{render_json, render_table};
pub use upload::{ErrorBody, UploadError, UploadRequest, UploadResponse};
