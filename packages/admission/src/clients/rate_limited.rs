//! Per-API rate limiting.
//!
//! Wraps the governor crate. One limiter is held per external API and shared
//! by every entity pipeline in flight, so concurrency across entities never
//! raises the call rate against a single provider.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ClientResult;
use crate::traits::classifier::{LabelScore, ZeroShotClassifier};

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// A shareable rate limiter for one external API.
#[derive(Clone)]
pub struct ApiLimiter {
    limiter: Arc<DirectRateLimiter>,
}

impl ApiLimiter {
    /// One permit per `interval`, no burst. `None` for a zero interval.
    pub fn every(interval: Duration) -> Option<Self> {
        Quota::with_period(interval).map(Self::from_quota)
    }

    /// `requests` permits per minute with bursts up to the same size.
    pub fn per_minute(requests: u32) -> Option<Self> {
        NonZeroU32::new(requests).map(|n| Self::from_quota(Quota::per_minute(n)))
    }

    pub fn from_quota(quota: Quota) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Wait until the next call is allowed.
    pub async fn until_ready(&self) {
        self.limiter.until_ready().await;
    }
}

/// A classifier wrapper that spaces calls at least `interval` apart.
pub struct RateLimitedClassifier<C: ZeroShotClassifier> {
    inner: C,
    limiter: Option<ApiLimiter>,
}

impl<C: ZeroShotClassifier> RateLimitedClassifier<C> {
    pub fn new(classifier: C, interval: Duration) -> Self {
        Self {
            inner: classifier,
            limiter: ApiLimiter::every(interval),
        }
    }

    pub fn with_limiter(classifier: C, limiter: ApiLimiter) -> Self {
        Self {
            inner: classifier,
            limiter: Some(limiter),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ZeroShotClassifier> ZeroShotClassifier for RateLimitedClassifier<C> {
    async fn classify(&self, text: &str, labels: &[&str]) -> ClientResult<Vec<LabelScore>> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        self.inner.classify(text, labels).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClassifier;
    use std::time::Instant;

    #[tokio::test]
    async fn test_calls_are_spaced() {
        let classifier = RateLimitedClassifier::new(MockClassifier::new(), Duration::from_millis(100));

        let start = Instant::now();
        for _ in 0..3 {
            classifier.classify("text", &["fraud"]).await.unwrap();
        }
        let elapsed = start.elapsed();

        // first call is immediate, the next two wait ~100ms each
        assert!(elapsed.as_millis() >= 150, "Rate limiting not working: {:?}", elapsed);
        assert_eq!(classifier.inner().calls().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_interval_disables_limiting() {
        let classifier = RateLimitedClassifier::new(MockClassifier::new(), Duration::ZERO);
        assert!(classifier.limiter.is_none());
        classifier.classify("text", &["fraud"]).await.unwrap();
    }

    #[tokio::test]
    async fn test_shared_limiter_spans_wrappers() {
        let limiter = ApiLimiter::every(Duration::from_millis(100)).unwrap();
        let a = RateLimitedClassifier::with_limiter(MockClassifier::new(), limiter.clone());
        let b = RateLimitedClassifier::with_limiter(MockClassifier::new(), limiter);

        let start = Instant::now();
        a.classify("one", &["fraud"]).await.unwrap();
        b.classify("two", &["fraud"]).await.unwrap();
        assert!(start.elapsed().as_millis() >= 80);
    }
}
