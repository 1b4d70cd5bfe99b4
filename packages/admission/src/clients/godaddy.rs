//! GoDaddy domain availability client.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http::{api_client, check_status, map_send_error, with_retry, RetryPolicy};
use super::rate_limited::ApiLimiter;
use crate::error::{ClientError, ClientResult};
use crate::security::ApiCredential;
use crate::traits::registrar::DomainRegistrar;
use crate::types::config::AdmissionConfig;

const DEFAULT_BASE_URL: &str = "https://api.godaddy.com";

/// GoDaddy allows 60 availability requests per minute per key.
const REQUESTS_PER_MINUTE: u32 = 60;

#[derive(Deserialize)]
struct AvailabilityResponse {
    available: bool,
}

pub struct GoDaddyRegistrar {
    credential: ApiCredential,
    client: reqwest::Client,
    timeout: Duration,
    retry: RetryPolicy,
    limiter: Option<ApiLimiter>,
}

impl GoDaddyRegistrar {
    pub fn new(credential: ApiCredential, config: &AdmissionConfig) -> ClientResult<Self> {
        Ok(Self {
            credential,
            client: api_client(config.request_timeout)?,
            timeout: config.request_timeout,
            retry: RetryPolicy::from_config(config),
            limiter: ApiLimiter::per_minute(REQUESTS_PER_MINUTE),
        })
    }

    pub fn with_limiter(mut self, limiter: Option<ApiLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    fn authorization(&self) -> String {
        match &self.credential.secret {
            Some(secret) => format!("sso-key {}:{}", self.credential.key.expose(), secret.expose()),
            None => format!("sso-key {}", self.credential.key.expose()),
        }
    }

    async fn check_once(&self, domain: &str) -> ClientResult<bool> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let base = self.credential.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let response = self
            .client
            .get(format!("{}/v1/domains/available", base.trim_end_matches('/')))
            .query(&[("domain", domain), ("checkType", "FAST")])
            .header("Authorization", self.authorization())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        let body: AvailabilityResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        debug!(domain, available = body.available, "Registrar answered");
        Ok(body.available)
    }
}

#[async_trait]
impl DomainRegistrar for GoDaddyRegistrar {
    async fn is_available(&self, domain: &str) -> ClientResult<bool> {
        with_retry(self.retry, "godaddy.available", || self.check_once(domain)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn registrar(server: &MockServer, config: &AdmissionConfig) -> GoDaddyRegistrar {
        GoDaddyRegistrar::new(
            ApiCredential::new("key")
                .with_secret("secret")
                .with_base_url(server.uri()),
            config,
        )
        .unwrap()
        .with_limiter(None)
    }

    #[tokio::test]
    async fn test_available_domain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/domains/available"))
            .and(query_param("domain", "acmerobotics.com"))
            .and(header("Authorization", "sso-key key:secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "available": true,
                "domain": "acmerobotics.com",
                "definitive": false
            })))
            .mount(&server)
            .await;

        let registrar = registrar(&server, &AdmissionConfig::default());
        assert!(registrar.is_available("acmerobotics.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_timeout_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"available": true}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = AdmissionConfig::default().with_retries(0, Duration::ZERO);
        config.request_timeout = Duration::from_millis(50);
        let registrar = registrar(&server, &config);

        let err = registrar.is_available("slow.com").await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
    }
}
