//! NewsAPI article search client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use super::http::{api_client, check_status, map_send_error, with_retry, RetryPolicy};
use crate::error::{ClientError, ClientResult};
use crate::security::ApiCredential;
use crate::traits::news::NewsSource;
use crate::types::config::AdmissionConfig;
use crate::types::sentiment::Article;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: String,
    published_at: Option<DateTime<Utc>>,
}

pub struct NewsApiSource {
    credential: ApiCredential,
    client: reqwest::Client,
    timeout: Duration,
    retry: RetryPolicy,
    language: String,
}

impl NewsApiSource {
    pub fn new(credential: ApiCredential, config: &AdmissionConfig) -> ClientResult<Self> {
        Ok(Self {
            credential,
            client: api_client(config.request_timeout)?,
            timeout: config.request_timeout,
            retry: RetryPolicy::from_config(config),
            language: "en".to_string(),
        })
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    async fn fetch_once(&self, query: &str, limit: usize) -> ClientResult<Vec<Article>> {
        let base = self.credential.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let quoted = format!("\"{}\"", query.replace('"', ""));
        let page_size = limit.clamp(1, 100).to_string();

        let response = self
            .client
            .get(format!("{}/v2/everything", base.trim_end_matches('/')))
            .query(&[
                ("q", quoted.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("language", self.language.as_str()),
            ])
            .header("X-Api-Key", self.credential.key.expose())
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        let body: EverythingResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        let mut articles: Vec<Article> = body
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title.filter(|t| !t.trim().is_empty())?;
                Some(Article {
                    title,
                    description: a.description,
                    url: a.url,
                    published_at: a.published_at,
                })
            })
            .collect();

        // NewsAPI already sorts by publishedAt; re-sort so undated items go last.
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit);
        Ok(articles)
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    async fn recent_articles(&self, query: &str, limit: usize) -> ClientResult<Vec<Article>> {
        with_retry(self.retry, "newsapi.everything", || self.fetch_once(query, limit)).await
    }
}
