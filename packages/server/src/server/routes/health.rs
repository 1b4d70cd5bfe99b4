//! Liveness and dependency status.

use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::kernel::CollaboratorStatus;
use crate::server::app::AppState;

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: DatabaseHealth,
    pool: PoolStats,
    collaborators: CollaboratorStatus,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DatabaseHealth {
    fn ok() -> Self {
        Self {
            status: "ok",
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            status: "error",
            error: Some(error),
        }
    }
}

#[derive(Serialize)]
pub struct PoolStats {
    size: u32,
    idle: usize,
    max: u32,
}

/// GET /health
///
/// 503 when the database does not answer `SELECT 1` in time. Missing
/// collaborators are reported but do not make the service unhealthy.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let ping = sqlx::query("SELECT 1").execute(&state.db_pool);
    let database = match tokio::time::timeout(DB_CHECK_TIMEOUT, ping).await {
        Ok(Ok(_)) => DatabaseHealth::ok(),
        Ok(Err(e)) => DatabaseHealth::failed(format!("query failed: {}", e)),
        Err(_) => DatabaseHealth::failed(format!("no answer within {:?}", DB_CHECK_TIMEOUT)),
    };

    let pool = PoolStats {
        size: state.db_pool.size(),
        idle: state.db_pool.num_idle(),
        max: state.db_pool.options().get_max_connections(),
    };

    let healthy = database.error.is_none();
    if !healthy {
        tracing::warn!(error = ?database.error, "Health check failed");
    }

    let (code, status) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            pool,
            collaborators: state.deps.collaborators,
        }),
    )
}
