//! HTTP transport for askdb.
//!
//! Routes:
//! - `GET /`       → service info
//! - `GET /health` → liveness
//! - `POST /query` → ask a question, get the response envelope
//!
//! Failures leave as `{"detail": "..."}` with 400 (bad request) or 500
//! (generation/execution failed).

use crate::error::{ServiceError, ServiceResult};
use crate::models::{AskOutcome, QueryRequest};
use crate::service::AskService;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Error leaving the HTTP boundary as `{"detail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_client_error() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = %self.detail, "Request failed");
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Build the application router around a shared service.
pub fn router(service: Arc<AskService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/query", post(query))
        .with_state(service)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "askdb service is running!",
        "status": "healthy",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn query(
    State(service): State<Arc<AskService>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<AskOutcome>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        ServiceError::invalid_input(format!("Invalid request body: {}", e.body_text()))
    })?;

    if request.is_blank() {
        return Err(ServiceError::invalid_input("Question is required").into());
    }

    let outcome = service.ask(&request.question).await;
    if !outcome.is_success() {
        let detail = outcome.error().unwrap_or("Unknown error");
        return Err(ApiError::internal(detail));
    }

    Ok(Json(outcome))
}

/// HTTP server bound to a host and port.
pub struct HttpTransport {
    service: Arc<AskService>,
    host: String,
    port: u16,
}

impl HttpTransport {
    pub fn new(service: Arc<AskService>, host: impl Into<String>, port: u16) -> Self {
        Self {
            service,
            host: host.into(),
            port,
        }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run(&self) -> ServiceResult<()> {
        let bind_addr = self.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            ServiceError::internal(format!("Failed to bind to {}: {}", bind_addr, e))
        })?;
        info!(addr = %bind_addr, "HTTP server listening");

        // In-flight LLM calls carry no timeout; shutdown waits at most this long.
        const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

        let shutdown_notify = Arc::new(tokio::sync::Notify::new());
        let shutdown_notify_clone = shutdown_notify.clone();
        let shutdown_signal = async move {
            wait_for_signal().await;
            shutdown_notify_clone.notify_one();
        };

        let server = axum::serve(listener, router(self.service.clone()))
            .with_graceful_shutdown(shutdown_signal);

        tokio::select! {
            result = server => {
                match result {
                    Ok(()) => info!("HTTP server stopped"),
                    Err(e) => {
                        error!(error = %e, "HTTP server error");
                        return Err(ServiceError::internal(format!("HTTP server error: {}", e)));
                    }
                }
            }
            _ = async {
                shutdown_notify.notified().await;
                info!(
                    timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
                    "Waiting for in-flight requests (send signal again to force exit)..."
                );

                tokio::select! {
                    _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
                        warn!("Graceful shutdown timeout, forcing exit");
                    }
                    _ = wait_for_signal() => {
                        warn!("Received second signal, forcing immediate exit");
                    }
                }
            } => {}
        }

        Ok(())
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
