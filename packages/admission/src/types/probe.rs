//! Website presence probe results.

use serde::{Deserialize, Serialize};

/// Why a search result was flagged as a likely existing website.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityReason {
    DomainTokenMatch,
    TitleSnippetMatch,
}

impl std::fmt::Display for SimilarityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimilarityReason::DomainTokenMatch => write!(f, "domain-token-match"),
            SimilarityReason::TitleSnippetMatch => write!(f, "title-snippet-match"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarMatch {
    pub url: String,
    pub reason: SimilarityReason,
}

/// What the prober could determine about an entity's existing web presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub found_any: bool,
    pub found: Vec<String>,
    pub similar_detected: bool,
    pub similar_matches: Vec<SimilarMatch>,
}

impl ProbeResult {
    pub fn from_found(found: Vec<String>) -> Self {
        Self {
            found_any: !found.is_empty(),
            found,
            ..Default::default()
        }
    }

    pub fn with_similar(mut self, matches: Vec<SimilarMatch>) -> Self {
        self.similar_detected = !matches.is_empty();
        self.similar_matches = matches;
        self
    }

    /// Either a candidate domain answered or search turned up a lookalike.
    pub fn has_presence(&self) -> bool {
        self.found_any || self.similar_detected
    }
}
