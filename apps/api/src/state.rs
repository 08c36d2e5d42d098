use std::sync::Arc;

use crate::config::Config;
use crate::cv::CvPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the engine, the optional AI extractor and the cache.
    pub pipeline: Arc<CvPipeline>,
    pub config: Config,
}
