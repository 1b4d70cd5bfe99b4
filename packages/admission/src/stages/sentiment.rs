//! Adverse media analyzer.
//!
//! Articles are classified one at a time. Call spacing is the classifier's
//! concern (see [`RateLimitedClassifier`](crate::clients::RateLimitedClassifier)),
//! so concurrent entities share one budget per API instead of serializing
//! the whole batch.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{RejectReason, StageOutcome};
use crate::traits::classifier::{max_score, ZeroShotClassifier};
use crate::traits::news::NewsSource;
use crate::types::config::{AdmissionConfig, NEGATIVE_LABELS};
use crate::types::sentiment::{SentimentHit, SentimentReport};

#[derive(Clone)]
pub struct AdverseMediaAnalyzer {
    news: Option<Arc<dyn NewsSource>>,
    classifier: Option<Arc<dyn ZeroShotClassifier>>,
    config: Arc<AdmissionConfig>,
}

impl AdverseMediaAnalyzer {
    pub fn new(
        news: Option<Arc<dyn NewsSource>>,
        classifier: Option<Arc<dyn ZeroShotClassifier>>,
        config: Arc<AdmissionConfig>,
    ) -> Self {
        Self {
            news,
            classifier,
            config,
        }
    }

    pub async fn analyze(&self, name: &str) -> SentimentReport {
        let (Some(news), Some(classifier)) = (&self.news, &self.classifier) else {
            return SentimentReport::skipped("news or classification API not configured");
        };

        let articles = match news
            .recent_articles(name, self.config.max_articles_fetched)
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                warn!(name, stage = "sentiment", error = %e, "News lookup failed");
                return SentimentReport::skipped(format!("news lookup failed ({})", e));
            }
        };

        let mut hits = Vec::new();
        for article in articles.iter().take(self.config.max_articles_analyzed) {
            let text = article.classification_text(self.config.article_text_limit);
            let scores = match classifier.classify(&text, NEGATIVE_LABELS).await {
                Ok(scores) => scores,
                Err(e) => {
                    warn!(
                        name,
                        stage = "sentiment",
                        url = %article.url,
                        error = %e,
                        "Article classification failed, skipping"
                    );
                    continue;
                }
            };

            let negative_score = max_score(&scores);
            hits.push(SentimentHit {
                title: article.title.clone(),
                url: article.url.clone(),
                published_at: article.published_at,
                negative_score,
                is_negative: negative_score >= self.config.negative_threshold,
            });
        }

        let report = SentimentReport::from_hits(hits);
        debug!(
            name,
            analyzed = report.hits.len(),
            negative = report.has_negative_press,
            "Adverse media analyzed"
        );
        report
    }

    pub fn gate(report: &SentimentReport) -> StageOutcome<()> {
        if report.has_negative_press {
            StageOutcome::Reject(RejectReason::NegativePress)
        } else {
            StageOutcome::Accept(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClassifier, MockNewsSource};
    use crate::types::sentiment::Article;

    fn articles(n: usize) -> Vec<Article> {
        (0..n)
            .map(|i| Article::new(format!("Story {}", i), format!("https://news.example/{}", i)))
            .collect()
    }

    fn analyzer(news: MockNewsSource, classifier: Arc<MockClassifier>) -> AdverseMediaAnalyzer {
        AdverseMediaAnalyzer::new(
            Some(Arc::new(news)),
            Some(classifier),
            Arc::new(AdmissionConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_unconfigured_passes() {
        let analyzer =
            AdverseMediaAnalyzer::new(None, None, Arc::new(AdmissionConfig::default()));
        let report = analyzer.analyze("Acme").await;
        assert!(!report.has_negative_press);
        assert!(report.note.is_some());
        assert!(AdverseMediaAnalyzer::gate(&report).is_accept());
    }

    #[tokio::test]
    async fn test_news_failure_passes() {
        let classifier = Arc::new(MockClassifier::new());
        let report = analyzer(MockNewsSource::new().failing(), classifier.clone())
            .analyze("Acme")
            .await;
        assert!(!report.has_negative_press);
        assert!(report.note.is_some());
        assert!(classifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_at_most_ten_articles_classified() {
        let classifier = Arc::new(MockClassifier::new());
        let report = analyzer(MockNewsSource::new().with_articles(articles(20)), classifier.clone())
            .analyze("Acme")
            .await;
        assert_eq!(classifier.calls().len(), 10);
        assert_eq!(report.hits.len(), 10);
        assert!(!report.has_negative_press);
    }

    #[tokio::test]
    async fn test_score_at_threshold_is_negative() {
        let classifier = Arc::new(MockClassifier::new().with_score("Story 1", 0.60));
        let report = analyzer(MockNewsSource::new().with_articles(articles(3)), classifier)
            .analyze("Acme")
            .await;
        assert!(report.has_negative_press);
        assert_eq!(report.hits.iter().filter(|h| h.is_negative).count(), 1);
        assert_eq!(
            AdverseMediaAnalyzer::gate(&report),
            StageOutcome::Reject(RejectReason::NegativePress)
        );
    }

    #[tokio::test]
    async fn test_failed_article_is_skipped() {
        let classifier = Arc::new(
            MockClassifier::new()
                .with_failure("Story 0")
                .with_score("Story 2", 0.3),
        );
        let report = analyzer(MockNewsSource::new().with_articles(articles(3)), classifier)
            .analyze("Acme")
            .await;
        assert_eq!(report.hits.len(), 2);
        assert_eq!(report.hits[0].title, "Story 1");
        assert!(!report.has_negative_press);
    }
}
