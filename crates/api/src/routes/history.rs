//! History Route

use axum::extract::{rejection::QueryRejection, Query, State};
use axum::Json;
use history::HistoryEntry;
use rule_engine::Severity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::{ApiError, AppState};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Query parameters for `GET /history`
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Only entries of this severity
    pub severity: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Newest entries first
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<HistoryEntry>,
    pub count: usize,
}

/// Read back recorded diagnoses
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let severity = query
        .severity
        .as_deref()
        .map(str::parse::<Severity>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let limit = query.limit.min(MAX_LIMIT);

    let Some(log) = &state.history else {
        return Ok(Json(HistoryResponse {
            data: Vec::new(),
            count: 0,
        }));
    };

    let log = Arc::clone(log);
    let data = tokio::task::spawn_blocking(move || log.recent(severity, limit))
        .await
        .map_err(|e| {
            error!("History task failed: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(|e| {
            error!("Failed to read history: {}", e);
            ApiError::Internal(e.to_string())
        })?;

    Ok(Json(HistoryResponse {
        count: data.len(),
        data,
    }))
}
