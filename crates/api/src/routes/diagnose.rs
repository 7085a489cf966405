//! Diagnosis Route

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use fact_store::FactStore;
use history::HistoryEntry;
use questionnaire::Category;
use rule_engine::Severity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{ApiError, AppState};

/// Body of `POST /diagnose`
#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    /// Questionnaire category slug
    #[serde(default)]
    pub category: Option<String>,
    /// Collected answers as fact name -> value
    #[serde(default)]
    pub answers: FactStore,
}

/// Successful diagnosis
#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    pub success: bool,
    pub diagnosis: String,
    pub solution: String,
    pub severity: Severity,
}

/// Resolve posted answers against the rule table
pub async fn diagnose(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DiagnoseRequest>, JsonRejection>,
) -> Result<Json<DiagnoseResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!("Rejected diagnose request: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    })?;

    let mut facts = request.answers;
    if let Some(slug) = request.category.as_deref() {
        apply_category(slug, &mut facts);
    }

    let resolution = state.rules.resolve_detailed(&facts);
    let payload = resolution.payload;
    info!(
        "Diagnosis '{}' ({}) from {} facts",
        payload.diagnosis,
        resolution.rule_id.unwrap_or("fallback"),
        facts.len()
    );

    metrics::counter!(
        "diagnoses_total",
        "severity" => payload.severity.as_str(),
        "fallback" => if resolution.is_fallback() { "true" } else { "false" }
    )
    .increment(1);

    if let Some(history) = state.history.clone() {
        let entry = HistoryEntry::now(payload, &facts);
        if let Err(e) = tokio::task::spawn_blocking(move || history.record(&entry)).await {
            warn!("History task failed: {}", e);
        }
    }

    Ok(Json(DiagnoseResponse {
        success: true,
        diagnosis: payload.diagnosis.clone(),
        solution: payload.solution.clone(),
        severity: payload.severity,
    }))
}

/// Fill in `issue_category` from the category slug when the answers omit it
fn apply_category(slug: &str, facts: &mut FactStore) {
    match Category::from_slug(slug) {
        Some(category) => {
            if let Some(value) = category.issue_category() {
                if !facts.contains_key("issue_category") {
                    facts.declare("issue_category", value);
                }
            }
        }
        None => debug!("Ignoring unknown category '{}'", slug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{send, test_state};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;

    fn post(body: &str) -> Request<Body> {
        Request::post("/diagnose")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_diagnose_psu_failure() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let body = json!({
            "category": "power_boot",
            "answers": {
                "power_status": "not_turning_on",
                "power_cable": "connected",
                "outlet_working": "yes",
                "lights": "none"
            }
        });

        let (status, response) = send(state.clone(), post(&body.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], true);
        assert_eq!(response["diagnosis"], "Power Supply Unit (PSU) Failure");
        assert_eq!(response["severity"], "high");

        let history = state.history.as_ref().unwrap().entries().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].facts.get("lights"), Some("none"));
    }

    #[tokio::test]
    async fn test_diagnose_empty_answers_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let (status, response) = send(test_state(&dir), post(r#"{"answers": {}}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["severity"], "low");
        assert!(response["diagnosis"]
            .as_str()
            .unwrap()
            .starts_with("General Computer Issue"));
    }

    #[tokio::test]
    async fn test_category_fills_issue_category() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"category": "bsod", "answers": {"error_code": "MEMORY_MANAGEMENT"}}"#;
        let (_, response) = send(test_state(&dir), post(body)).await;

        assert_eq!(response["diagnosis"], "Memory Management Error");
    }

    #[tokio::test]
    async fn test_explicit_issue_category_wins() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"category": "bsod", "answers": {"issue_category": "storage", "symptom": "disk_full"}}"#;
        let (_, response) = send(test_state(&dir), post(body)).await;

        assert_eq!(response["diagnosis"], "Disk Space Full");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let (status, response) = send(state.clone(), post(r#"{"answers": {"muted": false}}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["success"], false);
        assert!(response["error"].is_string());
        assert!(state.history.as_ref().unwrap().entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_diagnosis() {
        let dir = tempfile::tempdir().unwrap();
        let rules = Arc::new(knowledge_base::builtin().unwrap());
        let history = history::HistoryLog::new(dir.path().join("no_such_dir").join("h.json"));
        let state = Arc::new(AppState::new(rules, Some(history)));

        let body = r#"{"answers": {"issue_category": "security", "symptom": "ransomware"}}"#;
        let (status, response) = send(state, post(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["diagnosis"], "Ransomware Attack");
        assert_eq!(response["severity"], "critical");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_diagnoses_are_all_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let body = r#"{"answers": {"issue_category": "audio", "symptom": "no_sound"}}"#;

        let handles: Vec<_> = (0..8)
            .map(|_| tokio::spawn(send(state.clone(), post(body))))
            .collect();
        for handle in handles {
            let (status, _) = handle.await.unwrap();
            assert_eq!(status, StatusCode::OK);
        }

        assert_eq!(state.history.as_ref().unwrap().entries().unwrap().len(), 8);
    }

    #[test]
    fn test_apply_category() {
        let mut facts = FactStore::new();
        apply_category("power_boot", &mut facts);
        assert!(facts.is_empty());

        apply_category("nonsense", &mut facts);
        assert!(facts.is_empty());

        apply_category("audio", &mut facts);
        assert_eq!(facts.get("issue_category"), Some("audio"));
    }
}
