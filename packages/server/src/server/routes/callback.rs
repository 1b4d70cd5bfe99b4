//! Scraper callback endpoint.
//!
//! The scraper posts here when a scrape job finishes. The body is validated,
//! then the admission pipeline runs on its own task so a client disconnect
//! does not abort a half-evaluated batch. Only server shutdown cancels it.

use axum::{
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::task::JoinError;
use uuid::Uuid;

use admission::{AdmissionError, BatchReport, CallbackPayload, JobStatus, ValidationError};

use crate::server::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    pub success: bool,
    pub job_id: Uuid,
    pub status: JobStatus,
    pub records_fetched: usize,
    pub records_processed: usize,
}

impl From<&BatchReport> for CallbackResponse {
    fn from(report: &BatchReport) -> Self {
        Self {
            success: true,
            job_id: report.job_id,
            status: report.status,
            records_fetched: report.records_fetched,
            records_processed: report.records_processed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Callback failures. Details are logged; the caller only sees a generic message.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("invalid callback payload: {0}")]
    Invalid(#[from] ValidationError),

    #[error("admission failed: {0}")]
    Processing(#[from] AdmissionError),

    #[error("admission task failed: {0}")]
    Task(#[from] JoinError),
}

impl CallbackError {
    fn status_code(&self) -> StatusCode {
        match self {
            CallbackError::Invalid(_) | CallbackError::Processing(AdmissionError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::BAD_REQUEST {
            tracing::warn!(error = %self, "Rejected scrape callback");
            "Invalid request"
        } else {
            tracing::error!(error = %self, "Scrape callback failed");
            "Callback processing failed"
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// POST /api/scrape/callback
pub async fn scrape_callback_handler(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<CallbackResponse>, CallbackError> {
    let payload = CallbackPayload::parse(&body)?;
    let job_id = payload.job_id;

    let admission = state.deps.admission.clone();
    let cancel = state.shutdown.child_token();
    let report = tokio::spawn(async move { admission.process_callback(payload, cancel).await })
        .await??;

    tracing::info!(
        job_id = %job_id,
        status = %report.status,
        records_fetched = report.records_fetched,
        records_processed = report.records_processed,
        "Scrape callback handled"
    );

    Ok(Json(CallbackResponse::from(&report)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let err = CallbackError::Invalid(ValidationError::Malformed("missing field".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = CallbackError::Processing(AdmissionError::Validation(
            ValidationError::Malformed("missing field".into()),
        ));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_map_to_internal_error() {
        let err = CallbackError::Processing(AdmissionError::storage("connection reset"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_response_body_is_camel_case() {
        let response = CallbackResponse {
            success: true,
            job_id: Uuid::nil(),
            status: JobStatus::Completed,
            records_fetched: 3,
            records_processed: 1,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["recordsFetched"], 3);
        assert_eq!(json["recordsProcessed"], 1);
    }
}
