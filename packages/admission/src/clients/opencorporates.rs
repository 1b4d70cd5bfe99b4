//! OpenCorporates company search client.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::http::{api_client, check_status, map_send_error, with_retry, RetryPolicy};
use crate::error::{ClientError, ClientResult};
use crate::security::ApiCredential;
use crate::traits::registry::{CompanyRegistry, RegistryMatch};
use crate::types::config::AdmissionConfig;

const DEFAULT_BASE_URL: &str = "https://api.opencorporates.com";

#[derive(Deserialize)]
struct SearchResponse {
    results: SearchResults,
}

#[derive(Deserialize)]
struct SearchResults {
    #[serde(default)]
    companies: Vec<CompanyWrapper>,
}

#[derive(Deserialize)]
struct CompanyWrapper {
    company: Company,
}

#[derive(Deserialize)]
struct Company {
    name: String,
    company_number: Option<String>,
    jurisdiction_code: Option<String>,
    current_status: Option<String>,
    #[serde(default)]
    inactive: Option<bool>,
}

impl From<Company> for RegistryMatch {
    fn from(c: Company) -> Self {
        // Some jurisdictions only report the boolean flag.
        let status = c.current_status.or_else(|| {
            c.inactive
                .map(|inactive| if inactive { "Inactive" } else { "Active" }.to_string())
        });
        RegistryMatch {
            name: c.name,
            company_number: c.company_number,
            jurisdiction: c.jurisdiction_code,
            status,
        }
    }
}

pub struct OpenCorporatesRegistry {
    credential: ApiCredential,
    client: reqwest::Client,
    timeout: Duration,
    retry: RetryPolicy,
    per_page: usize,
}

impl OpenCorporatesRegistry {
    pub fn new(credential: ApiCredential, config: &AdmissionConfig) -> ClientResult<Self> {
        Ok(Self {
            credential,
            client: api_client(config.request_timeout)?,
            timeout: config.request_timeout,
            retry: RetryPolicy::from_config(config),
            per_page: 10,
        })
    }

    async fn search_once(&self, name: &str) -> ClientResult<Vec<RegistryMatch>> {
        let base = self.credential.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let per_page = self.per_page.to_string();
        let response = self
            .client
            .get(format!("{}/v0.4/companies/search", base.trim_end_matches('/')))
            .query(&[
                ("q", name),
                ("per_page", per_page.as_str()),
                ("api_token", self.credential.key.expose()),
            ])
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        let body: SearchResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        Ok(body
            .results
            .companies
            .into_iter()
            .map(|w| w.company.into())
            .collect())
    }
}

#[async_trait]
impl CompanyRegistry for OpenCorporatesRegistry {
    fn source(&self) -> &str {
        "opencorporates"
    }

    async fn search(&self, name: &str) -> ClientResult<Vec<RegistryMatch>> {
        with_retry(self.retry, "opencorporates.search", || self.search_once(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_maps_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0.4/companies/search"))
            .and(query_param("q", "Acme Robotics Ltd"))
            .and(query_param("api_token", "oc-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {
                    "companies": [
                        {"company": {"name": "ACME ROBOTICS LTD", "company_number": "12345678",
                                     "jurisdiction_code": "gb", "current_status": "Active"}},
                        {"company": {"name": "ACME ROBOTICS HOLDINGS", "company_number": "87654321",
                                     "jurisdiction_code": "gb", "current_status": null, "inactive": true}}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let registry = OpenCorporatesRegistry::new(
            ApiCredential::new("oc-token").with_base_url(server.uri()),
            &AdmissionConfig::default(),
        )
        .unwrap();

        let matches = registry.search("Acme Robotics Ltd").await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].is_active());
        assert_eq!(matches[1].status.as_deref(), Some("Inactive"));
        assert!(!matches[1].is_active());
    }

    #[tokio::test]
    async fn test_unexpected_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let registry = OpenCorporatesRegistry::new(
            ApiCredential::new("oc-token").with_base_url(server.uri()),
            &AdmissionConfig::default(),
        )
        .unwrap();

        let err = registry.search("Acme").await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }
}
