//! JSON documents returned by the News API.

use nd_core::{Article, Source};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct HeadlinesResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SourcesResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub sources: Vec<Source>,
}

/// `{"status":"error","code":"apiKeyInvalid","message":"..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}
