//! Zero-shot text classification.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Scores arbitrary candidate labels against a text without task-specific training.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    async fn classify(&self, text: &str, labels: &[&str]) -> ClientResult<Vec<LabelScore>>;
}

#[async_trait]
impl<T: ZeroShotClassifier + ?Sized> ZeroShotClassifier for Arc<T> {
    async fn classify(&self, text: &str, labels: &[&str]) -> ClientResult<Vec<LabelScore>> {
        (**self).classify(text, labels).await
    }
}

/// Highest score across all labels, 0.0 when nothing was returned.
pub fn max_score(scores: &[LabelScore]) -> f32 {
    scores.iter().map(|s| s.score).fold(0.0, f32::max)
}
