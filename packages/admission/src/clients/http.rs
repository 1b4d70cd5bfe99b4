//! Shared HTTP plumbing: client construction, status checks, bounded retry,
//! and the website existence prober.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::traits::prober::SiteProber;
use crate::types::config::AdmissionConfig;

pub(crate) const USER_AGENT: &str = "RegistryAdmissionBot/1.0";

/// How often a failed external call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    pub fn from_config(config: &AdmissionConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: config.retry_backoff,
        }
    }
}

/// Run `call`, retrying transient failures up to `policy.max_retries` times
/// with linear backoff. The last error is returned on exhaustion.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, operation: &str, mut call: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_retries && e.is_transient() => {
                attempt += 1;
                warn!(operation, attempt, error = %e, "External call failed, retrying");
                tokio::time::sleep(policy.backoff * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Build a JSON API client with an explicit timeout.
pub(crate) fn api_client(timeout: Duration) -> ClientResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Turn a non-2xx response into [`ClientError::Api`].
pub(crate) async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: message.chars().take(300).collect(),
    })
}

/// Map a reqwest timeout onto [`ClientError::Timeout`] so logs say what happened.
pub(crate) fn map_send_error(err: reqwest::Error, timeout: Duration) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout {
            ms: timeout.as_millis() as u64,
        }
    } else {
        ClientError::Http(err)
    }
}

/// Probes `https://{domain}` with HEAD, falling back to GET for servers that
/// refuse HEAD. Redirects are reported, not followed.
pub struct HttpSiteProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSiteProber {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &AdmissionConfig) -> ClientResult<Self> {
        Self::new(config.probe_timeout)
    }
}

#[async_trait]
impl SiteProber for HttpSiteProber {
    async fn probe(&self, url: &str) -> ClientResult<u16> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        let status = response.status();
        if status != StatusCode::METHOD_NOT_ALLOWED && status != StatusCode::NOT_IMPLEMENTED {
            debug!(url, status = status.as_u16(), "HEAD probe answered");
            return Ok(status.as_u16());
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;
        debug!(url, status = response.status().as_u16(), "GET probe answered");
        Ok(response.status().as_u16())
    }
}
