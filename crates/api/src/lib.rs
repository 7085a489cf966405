//! Computer Diagnosis API Server
//!
//! HTTP surface over the rule engine: resolves posted answers, serves the
//! diagnosis history, and exposes health and Prometheus metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rule_engine::RuleTable;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod routes;

pub use crate::config::{AppConfig, ConfigError, HistoryConfig, KnowledgeBaseConfig, LogConfig, ServerConfig};
pub use routes::diagnose::{DiagnoseRequest, DiagnoseResponse};
pub use routes::history::{HistoryQuery, HistoryResponse};

use history::HistoryLog;

/// Request-level failures, rendered as `{"success": false, "error": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

/// Failure body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Application state shared across handlers.
///
/// Read-only after startup: every request builds its own fact store.
pub struct AppState {
    /// Rule table
    pub rules: Arc<RuleTable>,
    /// History log, if persistence is enabled; file I/O runs on the blocking pool
    pub history: Option<Arc<HistoryLog>>,
    /// Prometheus handle, if a recorder was installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(rules: Arc<RuleTable>, history: Option<HistoryLog>) -> Self {
        Self {
            rules,
            history: history.map(Arc::new),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Build state from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, knowledge_base::KnowledgeBaseError> {
        let rules = Arc::new(load_rules(config)?);
        let history = config
            .history
            .enabled
            .then(|| HistoryLog::new(&config.history.path));
        Ok(Self::new(rules, history))
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub rule_count: usize,
    pub history_enabled: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/diagnose", post(routes::diagnose::diagnose))
        .route("/history", get(routes::history::get_history))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        rule_count: state.rules.len(),
        history_enabled: state.history.is_some(),
    })
}

/// Prometheus scrape handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Load the configured rule table, or the built-in one
pub fn load_rules(config: &AppConfig) -> Result<RuleTable, knowledge_base::KnowledgeBaseError> {
    match &config.knowledge_base.path {
        Some(path) => knowledge_base::load(path),
        None => knowledge_base::builtin(),
    }
}

/// Initialize logging to stderr; a no-op if a subscriber is already set
pub fn init_logging(config: &LogConfig) {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    }
}

/// Run the server until Ctrl-C
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let mut state = AppState::from_config(config)?;
    if let Some(handle) = install_metrics() {
        state = state.with_metrics(handle);
    }
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
