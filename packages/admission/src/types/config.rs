//! Pipeline configuration.

use std::time::Duration;

use crate::error::{AdmissionError, Result};

/// Labels sent to the zero-shot classifier for every article.
pub const NEGATIVE_LABELS: &[&str] = &[
    "lawsuit",
    "fraud",
    "bankruptcy",
    "scandal",
    "regulatory fine",
    "data breach",
    "criminal charges",
    "product recall",
    "negative news",
];

/// Configuration for the admission pipeline.
///
/// Built once at process start and shared by `Arc` with every stage.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Label score at or above which an article counts as negative.
    ///
    /// Default: 0.60.
    pub negative_threshold: f32,

    /// Articles requested from the news source. Default: 20.
    pub max_articles_fetched: usize,

    /// Articles actually classified. Default: 10.
    pub max_articles_analyzed: usize,

    /// Characters of title + description sent to the classifier. Default: 500.
    pub article_text_limit: usize,

    /// Minimum spacing between classification calls. Default: 200ms.
    pub classify_interval: Duration,

    /// Timeout for each website existence probe. Default: 5s.
    pub probe_timeout: Duration,

    /// Timeout for registrar, registry, news and classifier calls. Default: 10s.
    pub request_timeout: Duration,

    /// Entities processed concurrently within one batch. Default: 8.
    pub max_concurrency: usize,

    /// Deadline for a whole callback batch. Default: 300s.
    pub batch_deadline: Duration,

    /// Maximum entities accepted per callback. Default: 1000.
    ///
    /// Values above [`MAX_CALLBACK_ENTITIES`](crate::types::callback::MAX_CALLBACK_ENTITIES)
    /// have no effect: parsing already rejects larger bodies.
    pub max_batch_size: usize,

    /// Retries per external call after the first attempt. Default: 1.
    pub max_retries: u32,

    /// Delay before a retry. Default: 250ms.
    pub retry_backoff: Duration,

    /// Search results inspected by the similarity fallback. Default: 5.
    pub similarity_results: usize,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            negative_threshold: 0.60,
            max_articles_fetched: 20,
            max_articles_analyzed: 10,
            article_text_limit: 500,
            classify_interval: Duration::from_millis(200),
            probe_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_concurrency: 8,
            batch_deadline: Duration::from_secs(300),
            max_batch_size: 1000,
            max_retries: 1,
            retry_backoff: Duration::from_millis(250),
            similarity_results: 5,
        }
    }
}

impl AdmissionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_negative_threshold(mut self, threshold: f32) -> Self {
        self.negative_threshold = threshold;
        self
    }

    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }

    pub fn with_batch_deadline(mut self, deadline: Duration) -> Self {
        self.batch_deadline = deadline;
        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.negative_threshold) {
            return Err(AdmissionError::Config(format!(
                "negative threshold must be between 0 and 1, got {}",
                self.negative_threshold
            )));
        }
        if self.max_batch_size == 0 {
            return Err(AdmissionError::Config("max batch size must be at least 1".into()));
        }
        if self.batch_deadline.is_zero() {
            return Err(AdmissionError::Config("batch deadline must be non-zero".into()));
        }
        Ok(())
    }

    pub fn with_max_batch_size(mut self, n: usize) -> Self {
        self.max_batch_size = n;
        self
    }

    pub fn with_classify_interval(mut self, interval: Duration) -> Self {
        self.classify_interval = interval;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AdmissionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_settings_are_config_errors() {
        let threshold = AdmissionConfig::default().with_negative_threshold(1.5);
        assert!(matches!(threshold.validate(), Err(AdmissionError::Config(_))));

        let batch = AdmissionConfig::default().with_max_batch_size(0);
        assert!(matches!(batch.validate(), Err(AdmissionError::Config(_))));

        let deadline = AdmissionConfig::default().with_batch_deadline(Duration::ZERO);
        assert!(matches!(deadline.validate(), Err(AdmissionError::Config(_))));
    }
}
