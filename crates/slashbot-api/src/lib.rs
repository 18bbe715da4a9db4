//! # Slashbot HTTP Service
//!
//! HTTP server for receiving GitHub webhooks and handing them to the
//! slashbot event router.
//!
//! This service provides:
//! - GitHub webhook endpoint with signature verification
//! - Liveness and health endpoints
//! - Comment parsing and status endpoints for operators
//!
//! Webhooks are verified and acknowledged synchronously; command processing
//! runs on a spawned task after the response is produced.

pub mod config;
pub mod errors;
pub mod responses;

pub use config::{GitHubConfig, LoggingConfig, ServerConfig, ServiceConfig};
pub use errors::{ConfigError, ServiceError, WebhookError};
pub use responses::*;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, HeaderValue},
    middleware,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use slashbot_core::{parse, EventProcessor, SUPPORTED_EVENTS};
use slashbot_github::webhook::{SignatureVerifier, WebhookEnvelope, EVENT_HEADER};
use std::{collections::HashMap, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: Arc<ServiceConfig>,

    /// Webhook signature verifier built from the configured secret
    pub verifier: Arc<SignatureVerifier>,

    /// Processor for verified events
    pub processor: Arc<dyn EventProcessor>,

    /// Names of the registered slash commands
    pub commands: Vec<String>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        processor: Arc<dyn EventProcessor>,
        commands: Vec<String>,
    ) -> Self {
        let verifier = SignatureVerifier::new(config.github.webhook_secret.clone());

        Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            processor,
            commands,
        }
    }
}

// ============================================================================
// Router and Server
// ============================================================================

/// Create the HTTP router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let webhook_routes = Router::new().route("/webhook", post(handle_webhook));

    let health_routes = Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health_check));

    let api_routes = Router::new()
        .route("/api/parse-comment", post(handle_parse_comment))
        .route("/api/status", get(handle_status));

    let max_body_size = state.config.server.max_body_size;
    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(webhook_routes)
        .merge(health_routes)
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(max_body_size))
                .layer(middleware::from_fn(request_logging_middleware))
                .into_inner(),
        )
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let Some(origins) = server.cors_origins() else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start HTTP server and run until SIGINT or SIGTERM
pub async fn start_server(state: AppState) -> Result<(), ServiceError> {
    let host = state.config.server.host.clone();
    let port = state.config.server.port;
    let shutdown_timeout =
        std::time::Duration::from_secs(state.config.server.shutdown_timeout_seconds);

    let app = create_router(state);

    let address = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(address.as_str())
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: address.clone(),
            message: e.to_string(),
        })?;

    info!(address = %address, "Starting HTTP server");

    let shutdown_signal = async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to install Ctrl+C signal handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    error!(error = %e, "Failed to install SIGTERM signal handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
            _ = terminate => {
                info!("Received SIGTERM, initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
            },
        }
    };

    // In-flight requests complete; new connections are refused once the signal fires.
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

    server.await.map_err(|e| ServiceError::ServerFailed {
        message: e.to_string(),
    })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Webhook Handler
// ============================================================================

/// Handle GitHub webhook requests
///
/// 1. Verify the HMAC signature over the raw body (401 on failure)
/// 2. Require the `X-GitHub-Event` header (400)
/// 3. Decode the body as JSON (400)
/// 4. Spawn event processing and return 200 immediately
#[instrument(skip(state, headers, body))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookError> {
    if !state.verifier.is_configured() {
        return Err(WebhookError::SecretNotConfigured);
    }

    let header_map: HashMap<String, String> = headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_lowercase(),
                v.to_str().unwrap_or("").to_string(),
            )
        })
        .collect();

    let envelope = WebhookEnvelope::from_headers(&header_map, body);

    if !state.verifier.verify(&envelope) {
        return Err(WebhookError::InvalidSignature);
    }

    let event_type = envelope
        .event_type()
        .map(str::to_string)
        .ok_or_else(|| WebhookError::MissingHeader {
            header: EVENT_HEADER.to_string(),
        })?;

    let payload: serde_json::Value =
        serde_json::from_slice(envelope.body()).map_err(|e| WebhookError::InvalidJson {
            message: e.to_string(),
        })?;

    let delivery_id = envelope.delivery_id().unwrap_or("unknown").to_string();

    info!(
        event_type = %event_type,
        delivery_id = %delivery_id,
        "Accepted webhook"
    );

    let processor = state.processor.clone();
    let spawned_event = event_type.clone();
    tokio::spawn(async move {
        match processor.process(&spawned_event, payload).await {
            Ok(outcome) => info!(
                event_type = %spawned_event,
                delivery_id = %delivery_id,
                outcome = ?outcome,
                "Webhook processed"
            ),
            Err(e) => error!(
                event_type = %spawned_event,
                delivery_id = %delivery_id,
                error = %e,
                transient = e.is_transient(),
                "Webhook processing failed"
            ),
        }
    });

    Ok(Json(WebhookResponse::accepted(event_type)))
}

// ============================================================================
// Health and API Handlers
// ============================================================================

async fn handle_root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok".to_string(),
        app: "slashbot".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        github_app_configured: state.config.github.app_id.is_some(),
        webhook_secret_configured: state.verifier.is_configured(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn handle_parse_comment(Json(request): Json<ParseCommentRequest>) -> Json<ParseCommentResponse> {
    let commands = parse(&request.comment);

    Json(ParseCommentResponse {
        success: true,
        count: commands.len(),
        commands,
    })
}

async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "operational".to_string(),
        app_id: state.config.github.app_id,
        features: FeatureSummary {
            commands: state.commands.clone(),
            events: SUPPORTED_EVENTS.iter().map(|e| e.to_string()).collect(),
        },
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Correlation-id propagation and per-request logging
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(correlation_id.clone());

    info!(
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert("x-correlation-id", header_value);
    }

    let status = response.status();

    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
