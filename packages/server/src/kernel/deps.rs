//! Server dependencies (using traits for testability)
//!
//! Builds the admission pipeline from configuration. Each external API
//! client is created only when its credential is present; tests swap in
//! the mocks from `admission::testing` through [`ServerDeps::new`].

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;

use admission::{
    Admission, AdmissionConfig, Collaborators, GoDaddyRegistrar, HttpSiteProber,
    HuggingFaceClassifier, NewsApiSource, OpenCorporatesRegistry, TavilyWebSearcher,
};

use crate::config::Config;
use crate::domains::companies::PgAdmissionStore;

/// Which optional collaborators are wired in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollaboratorStatus {
    pub web_search: bool,
    pub registrar: bool,
    pub registry: bool,
    pub news: bool,
    pub classifier: bool,
}

impl CollaboratorStatus {
    pub fn of(collaborators: &Collaborators) -> Self {
        Self {
            web_search: collaborators.searcher.is_some(),
            registrar: collaborators.registrar.is_some(),
            registry: collaborators.registry.is_some(),
            news: collaborators.news.is_some(),
            classifier: collaborators.classifier.is_some(),
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by all request handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub admission: Arc<Admission>,
    pub collaborators: CollaboratorStatus,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        config: AdmissionConfig,
        collaborators: Collaborators,
    ) -> Self {
        let status = CollaboratorStatus::of(&collaborators);
        let store = Arc::new(PgAdmissionStore::new(db_pool.clone()));
        Self {
            db_pool,
            admission: Arc::new(Admission::new(config, collaborators, store)),
            collaborators: status,
        }
    }

    /// Wire real HTTP clients from configuration.
    pub fn from_config(config: &Config, db_pool: PgPool) -> Result<Self> {
        let admission_config = config.admission_config()?;
        let collaborators = build_collaborators(config, &admission_config)?;
        Ok(Self::new(db_pool, admission_config, collaborators))
    }
}

/// Create an HTTP client for every configured collaborator.
///
/// Missing credentials are logged, not fatal: the affected stage falls back
/// to its unverifiable default (which for the registrar means rejecting
/// every entity).
pub fn build_collaborators(config: &Config, admission: &AdmissionConfig) -> Result<Collaborators> {
    let prober =
        HttpSiteProber::from_config(admission).context("Failed to build website prober")?;
    let mut collaborators = Collaborators::new(Arc::new(prober));

    match &config.tavily {
        Some(credential) => {
            let searcher = TavilyWebSearcher::new(credential.clone(), admission)
                .context("Failed to build Tavily client")?;
            collaborators = collaborators.with_searcher(Arc::new(searcher));
        }
        None => tracing::warn!("TAVILY_API_KEY not set; lookalike website search disabled"),
    }

    match &config.godaddy {
        Some(credential) => {
            let registrar = GoDaddyRegistrar::new(credential.clone(), admission)
                .context("Failed to build GoDaddy client")?;
            collaborators = collaborators.with_registrar(Arc::new(registrar));
        }
        None => tracing::warn!(
            "GoDaddy credentials not set; every entity will be rejected as domain_unknown"
        ),
    }

    match &config.opencorporates {
        Some(credential) => {
            let registry = OpenCorporatesRegistry::new(credential.clone(), admission)
                .context("Failed to build OpenCorporates client")?;
            collaborators = collaborators.with_registry(Arc::new(registry));
        }
        None => tracing::warn!("OPENCORPORATES_API_TOKEN not set; legal status assumed active"),
    }

    match &config.newsapi {
        Some(credential) => {
            let news = NewsApiSource::new(credential.clone(), admission)
                .context("Failed to build NewsAPI client")?;
            collaborators = collaborators.with_news(Arc::new(news));
        }
        None => tracing::warn!("NEWSAPI_KEY not set; adverse media check skipped"),
    }

    match &config.huggingface {
        Some(credential) => {
            let classifier = HuggingFaceClassifier::new(credential.clone(), admission)
                .context("Failed to build Hugging Face client")?;
            collaborators = collaborators.with_classifier(Arc::new(classifier));
        }
        None => tracing::warn!("HUGGINGFACE_API_TOKEN not set; adverse media check skipped"),
    }

    Ok(collaborators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use admission::ApiCredential;

    fn config() -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            port: 8080,
            tavily: None,
            godaddy: None,
            opencorporates: None,
            newsapi: None,
            huggingface: None,
            negative_press_threshold: None,
            admission_concurrency: None,
            callback_deadline_secs: None,
            classify_interval_ms: None,
        }
    }

    #[test]
    fn test_missing_credentials_leave_collaborators_unset() {
        let collaborators = build_collaborators(&config(), &AdmissionConfig::default()).unwrap();
        assert_eq!(CollaboratorStatus::of(&collaborators), CollaboratorStatus::default());
    }

    #[test]
    fn test_configured_credentials_are_wired() {
        let config = Config {
            godaddy: Some(ApiCredential::new("key").with_secret("secret")),
            newsapi: Some(ApiCredential::new("news")),
            ..config()
        };
        let collaborators = build_collaborators(&config, &AdmissionConfig::default()).unwrap();
        let status = CollaboratorStatus::of(&collaborators);
        assert!(status.registrar);
        assert!(status.news);
        assert!(!status.classifier);
    }
}
