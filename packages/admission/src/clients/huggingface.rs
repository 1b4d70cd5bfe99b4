//! Hugging Face inference API zero-shot classifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::http::{api_client, check_status, map_send_error, with_retry, RetryPolicy};
use crate::error::{ClientError, ClientResult};
use crate::security::ApiCredential;
use crate::traits::classifier::{LabelScore, ZeroShotClassifier};
use crate::types::config::AdmissionConfig;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL: &str = "facebook/bart-large-mnli";

#[derive(Serialize)]
struct Request<'a> {
    inputs: &'a str,
    parameters: Parameters<'a>,
}

#[derive(Serialize)]
struct Parameters<'a> {
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

/// The legacy endpoint returns parallel arrays; the router returns a list of pairs.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Parallel { labels: Vec<String>, scores: Vec<f32> },
    Pairs(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn into_scores(self) -> ClientResult<Vec<LabelScore>> {
        match self {
            ClassificationResponse::Parallel { labels, scores } => {
                if labels.len() != scores.len() {
                    return Err(ClientError::Parse(format!(
                        "{} labels but {} scores",
                        labels.len(),
                        scores.len()
                    )));
                }
                Ok(labels
                    .into_iter()
                    .zip(scores)
                    .map(|(label, score)| LabelScore { label, score })
                    .collect())
            }
            ClassificationResponse::Pairs(pairs) => Ok(pairs),
        }
    }
}

pub struct HuggingFaceClassifier {
    credential: ApiCredential,
    client: reqwest::Client,
    timeout: Duration,
    retry: RetryPolicy,
    model: String,
}

impl HuggingFaceClassifier {
    pub fn new(credential: ApiCredential, config: &AdmissionConfig) -> ClientResult<Self> {
        Ok(Self {
            credential,
            client: api_client(config.request_timeout)?,
            timeout: config.request_timeout,
            retry: RetryPolicy::from_config(config),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn classify_once(&self, text: &str, labels: &[&str]) -> ClientResult<Vec<LabelScore>> {
        let base = self.credential.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let request = Request {
            inputs: text,
            parameters: Parameters {
                candidate_labels: labels,
                multi_label: true,
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{}", base.trim_end_matches('/'), self.model))
            .bearer_auth(self.credential.key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        check_status(response)
            .await?
            .json::<ClassificationResponse>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?
            .into_scores()
    }
}

#[async_trait]
impl ZeroShotClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str, labels: &[&str]) -> ClientResult<Vec<LabelScore>> {
        with_retry(self.retry, "huggingface.zero_shot", || self.classify_once(text, labels)).await
    }
}
