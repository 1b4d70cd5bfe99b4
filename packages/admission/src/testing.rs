//! Testing utilities including mock implementations.
//!
//! Every collaborator trait has a builder-style fake here that records its
//! calls, so pipeline logic can be exercised without network access.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ClientError, ClientResult};
use crate::traits::{
    classifier::{LabelScore, ZeroShotClassifier},
    news::NewsSource,
    prober::SiteProber,
    registrar::DomainRegistrar,
    registry::{CompanyRegistry, RegistryMatch},
    searcher::{SearchResult, WebSearcher},
};
use crate::types::sentiment::Article;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn unreachable_host() -> ClientError {
    ClientError::Timeout { ms: 5_000 }
}

fn mock_failure(what: &str) -> ClientError {
    ClientError::Api {
        status: 503,
        message: format!("mock {} failure", what),
    }
}

/// Website prober with fixed status codes per URL.
///
/// URLs with no configured status behave like hosts that never answer.
#[derive(Default)]
pub struct MockSiteProber {
    statuses: RwLock<HashMap<String, u16>>,
    failures: RwLock<HashSet<String>>,
    calls: RwLock<Vec<String>>,
}

impl MockSiteProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        write(&self.statuses).insert(url.into(), status);
        self
    }

    /// Make a URL fail with a connection-level error.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        write(&self.failures).insert(url.into());
        self
    }

    /// URLs probed, in call order.
    pub fn calls(&self) -> Vec<String> {
        read(&self.calls).clone()
    }
}

#[async_trait]
impl SiteProber for MockSiteProber {
    async fn probe(&self, url: &str) -> ClientResult<u16> {
        write(&self.calls).push(url.to_string());

        if read(&self.failures).contains(url) {
            return Err(mock_failure("probe"));
        }
        read(&self.statuses)
            .get(url)
            .copied()
            .ok_or_else(unreachable_host)
    }
}

/// Search engine with canned results per query.
#[derive(Default)]
pub struct MockWebSearcher {
    results: RwLock<HashMap<String, Vec<SearchResult>>>,
    fail: bool,
    queries: RwLock<Vec<String>>,
}

impl MockWebSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(self, query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        write(&self.results).insert(query.into(), results);
        self
    }

    /// Results built from bare URLs; unparseable entries are dropped.
    pub fn with_urls(self, query: impl Into<String>, urls: &[&str]) -> Self {
        let results = urls.iter().filter_map(|u| SearchResult::from_url(u)).collect();
        self.with_results(query, results)
    }

    /// Every search returns an error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        read(&self.queries).clone()
    }
}

#[async_trait]
impl WebSearcher for MockWebSearcher {
    async fn search(&self, query: &str) -> ClientResult<Vec<SearchResult>> {
        write(&self.queries).push(query.to_string());

        if self.fail {
            return Err(mock_failure("search"));
        }
        Ok(read(&self.results).get(query).cloned().unwrap_or_default())
    }
}

/// Domain registrar with per-domain answers and a fallback.
///
/// A fallback of `None` makes unlisted domains time out.
#[derive(Default)]
pub struct MockRegistrar {
    answers: RwLock<HashMap<String, bool>>,
    failures: RwLock<HashSet<String>>,
    fallback: Option<bool>,
    calls: RwLock<Vec<String>>,
}

impl MockRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `available` for every domain not configured otherwise.
    pub fn always(available: bool) -> Self {
        Self {
            fallback: Some(available),
            ..Default::default()
        }
    }

    pub fn with_availability(self, domain: impl Into<String>, available: bool) -> Self {
        write(&self.answers).insert(domain.into(), available);
        self
    }

    pub fn with_failure(self, domain: impl Into<String>) -> Self {
        write(&self.failures).insert(domain.into());
        self
    }

    /// Domains queried, in call order.
    pub fn calls(&self) -> Vec<String> {
        read(&self.calls).clone()
    }
}

#[async_trait]
impl DomainRegistrar for MockRegistrar {
    async fn is_available(&self, domain: &str) -> ClientResult<bool> {
        write(&self.calls).push(domain.to_string());

        if read(&self.failures).contains(domain) {
            return Err(mock_failure("registrar"));
        }
        read(&self.answers)
            .get(domain)
            .copied()
            .or(self.fallback)
            .ok_or_else(unreachable_host)
    }
}

/// Company registry with canned matches per searched name.
#[derive(Default)]
pub struct MockRegistry {
    matches: RwLock<HashMap<String, Vec<RegistryMatch>>>,
    fallback: Vec<RegistryMatch>,
    fail: bool,
    calls: RwLock<Vec<String>>,
}

impl MockRegistry {
    /// Returns no matches for any name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns one active match for any name.
    pub fn active() -> Self {
        Self {
            fallback: vec![RegistryMatch::new("MOCK COMPANY", Some("Active"))],
            ..Default::default()
        }
    }

    /// Returns one dissolved match for any name.
    pub fn inactive() -> Self {
        Self {
            fallback: vec![RegistryMatch::new("MOCK COMPANY", Some("Dissolved"))],
            ..Default::default()
        }
    }

    pub fn with_matches(self, name: impl Into<String>, matches: Vec<RegistryMatch>) -> Self {
        write(&self.matches).insert(name.into(), matches);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        read(&self.calls).clone()
    }
}

#[async_trait]
impl CompanyRegistry for MockRegistry {
    fn source(&self) -> &str {
        "mock-registry"
    }

    async fn search(&self, name: &str) -> ClientResult<Vec<RegistryMatch>> {
        write(&self.calls).push(name.to_string());

        if self.fail {
            return Err(mock_failure("registry"));
        }
        Ok(read(&self.matches)
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// News source returning the same articles for every query.
#[derive(Default)]
pub struct MockNewsSource {
    articles: Vec<Article>,
    fail: bool,
    queries: RwLock<Vec<String>>,
}

impl MockNewsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(mut self, articles: Vec<Article>) -> Self {
        self.articles = articles;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        read(&self.queries).clone()
    }
}

#[async_trait]
impl NewsSource for MockNewsSource {
    async fn recent_articles(&self, query: &str, limit: usize) -> ClientResult<Vec<Article>> {
        write(&self.queries).push(query.to_string());

        if self.fail {
            return Err(mock_failure("news"));
        }
        Ok(self.articles.iter().take(limit).cloned().collect())
    }
}

/// Score given to every label when no override matches.
pub const MOCK_BASELINE_SCORE: f32 = 0.05;

/// Zero-shot classifier keyed on text fragments.
///
/// A text containing a configured fragment gets that score on the first
/// label; everything else scores [`MOCK_BASELINE_SCORE`].
#[derive(Default)]
pub struct MockClassifier {
    scores: RwLock<Vec<(String, f32)>>,
    failures: RwLock<Vec<String>>,
    calls: RwLock<Vec<String>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(self, fragment: impl Into<String>, score: f32) -> Self {
        write(&self.scores).push((fragment.into(), score));
        self
    }

    pub fn with_failure(self, fragment: impl Into<String>) -> Self {
        write(&self.failures).push(fragment.into());
        self
    }

    /// Texts classified, in call order.
    pub fn calls(&self) -> Vec<String> {
        read(&self.calls).clone()
    }
}

#[async_trait]
impl ZeroShotClassifier for MockClassifier {
    async fn classify(&self, text: &str, labels: &[&str]) -> ClientResult<Vec<LabelScore>> {
        write(&self.calls).push(text.to_string());

        if read(&self.failures).iter().any(|f| text.contains(f.as_str())) {
            return Err(mock_failure("classifier"));
        }

        let top = read(&self.scores)
            .iter()
            .find(|(fragment, _)| text.contains(fragment.as_str()))
            .map(|(_, score)| *score)
            .unwrap_or(MOCK_BASELINE_SCORE);

        Ok(labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let score = if i == 0 { top } else { MOCK_BASELINE_SCORE };
                LabelScore::new(*label, score)
            })
            .collect())
    }
}
