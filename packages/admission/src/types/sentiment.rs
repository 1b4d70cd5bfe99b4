//! Adverse media types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article returned by the news source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: url.into(),
            published_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Title and description joined, cut to `limit` characters.
    pub fn classification_text(&self, limit: usize) -> String {
        let joined = match self.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => format!("{} {}", self.title, desc),
            _ => self.title.clone(),
        };
        joined.chars().take(limit).collect()
    }
}

/// One classified article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentHit {
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub negative_score: f32,
    pub is_negative: bool,
}

/// Outcome of the adverse media analysis for one entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReport {
    pub has_negative_press: bool,
    pub hits: Vec<SentimentHit>,
    /// Set when the analysis could not run and passed by default.
    pub note: Option<String>,
}

impl SentimentReport {
    pub fn skipped(note: impl Into<String>) -> Self {
        Self {
            has_negative_press: false,
            hits: Vec::new(),
            note: Some(note.into()),
        }
    }

    pub fn from_hits(hits: Vec<SentimentHit>) -> Self {
        Self {
            has_negative_press: hits.iter().any(|h| h.is_negative),
            hits,
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_text_truncates_on_chars() {
        let article = Article::new("Überschrift", "https://news.example/1")
            .with_description("é".repeat(600));
        let text = article.classification_text(500);
        assert_eq!(text.chars().count(), 500);
        assert!(text.starts_with("Überschrift é"));
    }

    #[test]
    fn test_classification_text_without_description() {
        let article = Article::new("Acme wins award", "https://news.example/2");
        assert_eq!(article.classification_text(500), "Acme wins award");
    }
}
