use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nd_core::types::format_date;
use nd_core::{Article, Category, Error, FilterState, NewsApi, NewsConfig, Result, Source};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::wire::{ErrorResponse, HeadlinesResponse, SourcesResponse};

const TOP_HEADLINES: &str = "top-headlines";
const SOURCES: &str = "sources";

/// [`NewsApi`] backed by the remote News API over HTTP.
///
/// Every call is a single GET: no retry, no timeout.
#[derive(Clone)]
pub struct NewsApiClient {
    client: Arc<Client>,
    config: NewsConfig,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(config: NewsConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: NewsConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
        }
    }

    pub fn config(&self) -> &NewsConfig {
        &self.config
    }

    /// Query parameters for `/top-headlines`, in request order.
    pub fn headline_params(&self, filters: &FilterState) -> Vec<(&'static str, String)> {
        vec![
            ("country", self.config.country.clone()),
            ("category", filters.category.to_string()),
            ("q", filters.keyword.clone()),
            ("from", format_date(filters.from)),
            ("to", format_date(filters.to)),
            ("apiKey", self.config.api_key.clone()),
        ]
    }

    /// Query parameters for `/sources`, in request order.
    pub fn source_params(&self, category: Category) -> Vec<(&'static str, String)> {
        vec![
            ("apiKey", self.config.api_key.clone()),
            ("category", category.to_string()),
            ("language", self.config.language.clone()),
            ("country", self.config.country.clone()),
        ]
    }

    async fn get<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<R> {
        let url = self.config.endpoint(endpoint)?;
        debug!("GET {}", url);

        // reqwest errors carry the request URL, which includes the API key
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(status_error(status, body));
        }
        if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
            if error.is_error() {
                return Err(api_error(status, error));
            }
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn status_error(status: StatusCode, body: String) -> Error {
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error) if error.is_error() => api_error(status, error),
        _ => Error::Status { status, body },
    }
}

fn api_error(status: StatusCode, error: ErrorResponse) -> Error {
    Error::Api {
        status,
        code: error.code.unwrap_or_else(|| "unknown".to_string()),
        message: error.message.unwrap_or_default(),
    }
}

#[async_trait]
impl NewsApi for NewsApiClient {
    async fn top_headlines(&self, filters: &FilterState) -> Result<Vec<Article>> {
        let params = self.headline_params(filters);
        let response: HeadlinesResponse = self.get(TOP_HEADLINES, &params).await?;
        debug!(
            "Received {} headlines (status {:?})",
            response.articles.len(),
            response.status
        );
        Ok(response.articles)
    }

    async fn sources(&self, category: Category) -> Result<Vec<Source>> {
        let params = self.source_params(category);
        let response: SourcesResponse = self.get(SOURCES, &params).await?;
        debug!(
            "Received {} sources (status {:?})",
            response.sources.len(),
            response.status
        );
        Ok(response.sources)
    }
}
