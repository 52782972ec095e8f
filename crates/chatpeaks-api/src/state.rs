//! Application state.

use std::sync::Arc;

use chatpeaks_analysis::AnalysisConfig;
use chatpeaks_chat::CommentClient;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    /// Server-side analysis defaults; requests may narrow a subset of them
    pub analysis: AnalysisConfig,
    pub comments: Arc<CommentClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let comments = CommentClient::from_env()?;
        Ok(Self {
            config,
            analysis: AnalysisConfig::from_env(),
            comments: Arc::new(comments),
        })
    }
}
