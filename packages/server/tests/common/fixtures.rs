//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use admission::testing::{MockRegistrar, MockRegistry, MockSiteProber};
use admission::{Collaborators, RawEntityRecord};
use server_core::domains::companies::ScrapeJob;

/// Collaborators under which every well-formed record is admitted:
/// no site answers, every domain is free, the registry reports active,
/// and the adverse media stage is unconfigured.
pub fn admitting_collaborators() -> Collaborators {
    Collaborators::new(Arc::new(MockSiteProber::new()))
        .with_registrar(Arc::new(MockRegistrar::always(true)))
        .with_registry(Arc::new(MockRegistry::active()))
}

/// Registry ID that no other test uses.
pub fn unique_registry_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// A minimal active company record.
pub fn company_record(legal_name: &str, registry_id: &str, source: &str) -> RawEntityRecord {
    RawEntityRecord::new(legal_name, registry_id, source)
        .with_country("GB")
        .with_status("active")
        .with_incorporation_date("2024-03-01")
        .with_company_type("ltd")
}

/// Create a pending scrape job, as the scrape trigger would.
pub async fn create_pending_job(pool: &PgPool, source: &str) -> Result<Uuid> {
    let job = ScrapeJob::create(Uuid::new_v4(), Some(source), pool).await?;
    Ok(job.id)
}

/// Completed-callback body carrying the given records.
pub fn completed_callback(job_id: Uuid, records: &[RawEntityRecord]) -> Value {
    json!({
        "jobId": job_id,
        "status": "completed",
        "entities": records,
        "totalCount": records.len(),
    })
}

/// POST a raw body to the callback route; returns status and JSON body.
pub async fn post_callback(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/scrape/callback")
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("Failed to build request");

    let response = app.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// POST a JSON value to the callback route.
pub async fn post_callback_json(app: Router, body: &Value) -> (StatusCode, Value) {
    post_callback(app, body.to_string()).await
}
