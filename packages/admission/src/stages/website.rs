//! Website presence prober.
//!
//! Probes every candidate domain; when none answers, asks a search engine
//! whether the company already has a site under some other name. Never
//! fails: network errors count as "not found" and a broken search yields no
//! similarity matches.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::{RejectReason, StageOutcome};
use crate::normalize::{fold, NormalizedName};
use crate::traits::prober::SiteProber;
use crate::traits::searcher::{SearchResult, WebSearcher};
use crate::types::config::AdmissionConfig;
use crate::types::probe::{ProbeResult, SimilarMatch, SimilarityReason};

/// Search query for the similarity fallback.
pub fn similarity_query(name: &str) -> String {
    format!(
        "\"{}\" site:.com (\"official\" OR \"home\" OR \"website\")",
        name.trim()
    )
}

/// Decide whether a search result looks like the company's own site.
///
/// A domain holding at least half (rounded up) of the name tokens wins over
/// a title/snippet mention of the first token.
pub fn similarity_reason(tokens: &[String], result: &SearchResult) -> Option<SimilarityReason> {
    let first = tokens.first()?;
    let domain = result.domain()?;

    let required = tokens.len().div_ceil(2);
    let hits = tokens.iter().filter(|t| domain.contains(t.as_str())).count();
    if hits >= required {
        return Some(SimilarityReason::DomainTokenMatch);
    }

    let mentions_first = [result.title.as_deref(), result.snippet.as_deref()]
        .into_iter()
        .flatten()
        .any(|text| fold(text).contains(first.as_str()));
    mentions_first.then_some(SimilarityReason::TitleSnippetMatch)
}

#[derive(Clone)]
pub struct WebsitePresenceProber {
    prober: Arc<dyn SiteProber>,
    searcher: Option<Arc<dyn WebSearcher>>,
    config: Arc<AdmissionConfig>,
}

impl WebsitePresenceProber {
    pub fn new(
        prober: Arc<dyn SiteProber>,
        searcher: Option<Arc<dyn WebSearcher>>,
        config: Arc<AdmissionConfig>,
    ) -> Self {
        Self {
            prober,
            searcher,
            config,
        }
    }

    pub async fn probe(&self, name: &NormalizedName) -> ProbeResult {
        let urls: Vec<String> = name
            .candidates
            .iter()
            .map(|domain| format!("https://{}", domain))
            .collect();

        let probes = urls.iter().map(|url| async move {
            match self.prober.probe(url).await {
                Ok(status) => (200..400).contains(&status).then(|| url.clone()),
                Err(e) => {
                    debug!(url = %url, error = %e, "Candidate did not answer");
                    None
                }
            }
        });
        let found: Vec<String> = join_all(probes).await.into_iter().flatten().collect();

        if !found.is_empty() {
            return ProbeResult::from_found(found);
        }

        let similar = self.search_similar(name).await;
        ProbeResult::from_found(Vec::new()).with_similar(similar)
    }

    async fn search_similar(&self, name: &NormalizedName) -> Vec<SimilarMatch> {
        let Some(searcher) = &self.searcher else {
            return Vec::new();
        };

        let query = similarity_query(&name.original);
        let results = match searcher
            .search_with_limit(&query, self.config.similarity_results)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(name = %name.original, stage = "website", error = %e, "Similarity search failed");
                return Vec::new();
            }
        };

        results
            .iter()
            .filter_map(|result| {
                similarity_reason(&name.tokens, result).map(|reason| SimilarMatch {
                    url: result.url.to_string(),
                    reason,
                })
            })
            .collect()
    }

    /// Any confirmed site or lookalike rejects the entity.
    pub fn gate(result: &ProbeResult) -> StageOutcome<()> {
        if result.has_presence() {
            StageOutcome::Reject(RejectReason::WebsitePresent)
        } else {
            StageOutcome::Accept(())
        }
    }
}
