//! Tavily-backed web searcher.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::http::{api_client, check_status, map_send_error, with_retry, RetryPolicy};
use crate::error::{ClientError, ClientResult};
use crate::security::ApiCredential;
use crate::traits::searcher::{SearchResult, WebSearcher};
use crate::types::config::AdmissionConfig;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

#[derive(Serialize)]
struct Request<'a> {
    query: &'a str,
    search_depth: &'static str,
    max_results: usize,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    url: String,
    title: Option<String>,
    content: Option<String>,
}

pub struct TavilyWebSearcher {
    credential: ApiCredential,
    client: reqwest::Client,
    timeout: Duration,
    retry: RetryPolicy,
    /// Default number of results to return.
    pub default_limit: usize,
}

impl TavilyWebSearcher {
    pub fn new(credential: ApiCredential, config: &AdmissionConfig) -> ClientResult<Self> {
        Ok(Self {
            credential,
            client: api_client(config.request_timeout)?,
            timeout: config.request_timeout,
            retry: RetryPolicy::from_config(config),
            default_limit: config.similarity_results,
        })
    }

    fn endpoint(&self) -> String {
        let base = self.credential.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{}/search", base.trim_end_matches('/'))
    }

    async fn search_once(&self, query: &str, limit: usize) -> ClientResult<Vec<SearchResult>> {
        let request = Request {
            query,
            search_depth: "basic",
            max_results: limit,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.credential.key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        let body: Response = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .filter_map(|r| {
                let mut result = SearchResult::new(Url::parse(&r.url).ok()?);
                if let Some(title) = r.title {
                    result = result.with_title(title);
                }
                if let Some(content) = r.content {
                    result = result.with_snippet(content);
                }
                Some(result)
            })
            .collect())
    }
}

#[async_trait]
impl WebSearcher for TavilyWebSearcher {
    async fn search(&self, query: &str) -> ClientResult<Vec<SearchResult>> {
        self.search_with_limit(query, self.default_limit).await
    }

    async fn search_with_limit(&self, query: &str, limit: usize) -> ClientResult<Vec<SearchResult>> {
        with_retry(self.retry, "tavily.search", || self.search_once(query, limit)).await
    }
}
