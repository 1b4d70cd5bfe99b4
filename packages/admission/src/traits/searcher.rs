//! Web searcher trait for the website similarity fallback.
//!
//! When none of the candidate domains answer, the prober asks a search engine
//! whether the company already has a site somewhere else. This trait
//! abstracts over search providers (Tavily, SerpAPI, ...).

use async_trait::async_trait;
use url::Url;

use crate::error::ClientResult;

/// One organic search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub url: Url,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

impl SearchResult {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            title: None,
            snippet: None,
        }
    }

    /// Create from a URL string.
    pub fn from_url(url: &str) -> Option<Self> {
        Url::parse(url).ok().map(Self::new)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Lowercased host without a leading `www.`.
    pub fn domain(&self) -> Option<String> {
        let host = self.url.host_str()?.to_lowercase();
        Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
    }
}

#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str) -> ClientResult<Vec<SearchResult>>;

    /// Search with a specific result limit.
    async fn search_with_limit(&self, query: &str, limit: usize) -> ClientResult<Vec<SearchResult>> {
        let mut results = self.search(query).await?;
        results.truncate(limit);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_strips_www() {
        let result = SearchResult::from_url("https://WWW.AcmeRobotics.co.uk/about").unwrap();
        assert_eq!(result.domain().as_deref(), Some("acmerobotics.co.uk"));
    }

    #[test]
    fn test_from_url_rejects_garbage() {
        assert!(SearchResult::from_url("not a url").is_none());
    }
}
