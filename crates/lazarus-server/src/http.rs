//! HTTP surface for recovery requests.
//!
//! | Route           | Purpose                                   |
//! |-----------------|-------------------------------------------|
//! | `GET /`         | Minimal share-entry form                  |
//! | `POST /recover` | Submit shares (JSON or urlencoded form)   |
//! | `GET /health`   | Liveness, no state                        |
//!
//! Rejections never say why a submission failed. Unparseable bodies are
//! handed to the validator as an empty share set so they take the same path
//! and the same time as any other malformed submission.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lazarus_recovery::{RecoveryOutcome, RecoveryValidator, RemediationStatus};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    validator: Arc<RecoveryValidator>,
    expose_remaining_attempts: bool,
}

impl AppState {
    /// Wrap a validator. Remaining-attempt exposure follows its config.
    #[must_use]
    pub fn new(validator: Arc<RecoveryValidator>) -> Self {
        let expose_remaining_attempts = validator.config().expose_remaining_attempts;
        Self {
            validator,
            expose_remaining_attempts,
        }
    }

    /// The validator behind the handlers.
    #[must_use]
    pub fn validator(&self) -> &Arc<RecoveryValidator> {
        &self.validator
    }
}

/// JSON request body for `POST /recover`.
#[derive(Deserialize)]
struct SubmissionBody {
    shares: Vec<String>,
}

/// Response body for every recovery outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBody {
    /// `granted`, `granted_remediation_failed`, `rejected` or `locked`.
    pub status: &'static str,
    /// Present only on rejections, and only when exposure is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
}

/// Build the router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/recover", post(recover))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured listen address.
///
/// # Errors
/// Returns [`ServerError::Bind`] if the address is unavailable.
pub async fn bind(addr: SocketAddr) -> ServerResult<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve until `shutdown` resolves.
///
/// # Errors
/// Returns an IO error if the server fails.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    config: &ServerConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> ServerResult<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "recovery endpoint listening");
    }
    axum::serve(listener, router(state, config))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn form_page(State(state): State<AppState>) -> Html<String> {
    let threshold = state.validator.config().threshold;
    let mut inputs = String::new();
    for i in 1..=threshold {
        inputs.push_str(&format!(
            "<label for=\"shard{i}\">Share #{i}</label>\n\
             <input type=\"password\" name=\"shard{i}\" id=\"shard{i}\" autocomplete=\"off\" required>\n"
        ));
    }
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>Lazarus</title></head>\n\
         <body>\n<h1>Lazarus recovery</h1>\n<p>Enter any {threshold} shares.</p>\n\
         <form method=\"post\" action=\"/recover\">\n{inputs}<button type=\"submit\">Recover</button>\n\
         </form>\n</body></html>\n"
    ))
}

async fn recover(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let submission = parse_submission(&headers, &body);

    // Run detached so a dropped connection cannot cancel the attempt.
    let validator = Arc::clone(&state.validator);
    let attempt =
        tokio::spawn(async move { validator.attempt_recovery(submission.as_slice()).await });

    match attempt.await {
        Ok(outcome) => respond(outcome, state.expose_remaining_attempts),
        Err(e) => {
            error!(error = %e, "recovery task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusBody {
                    status: "rejected",
                    remaining_attempts: None,
                }),
            )
                .into_response()
        }
    }
}

/// Map an outcome to status code and body.
#[must_use]
pub fn respond(outcome: RecoveryOutcome, expose_remaining_attempts: bool) -> Response {
    let (code, status, remaining_attempts) = match outcome {
        RecoveryOutcome::Granted {
            remediation: RemediationStatus::Completed,
        } => (StatusCode::OK, "granted", None),
        RecoveryOutcome::Granted {
            remediation: RemediationStatus::Failed,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "granted_remediation_failed",
            None,
        ),
        RecoveryOutcome::Rejected { remaining_attempts } => (
            StatusCode::UNAUTHORIZED,
            "rejected",
            expose_remaining_attempts.then_some(remaining_attempts),
        ),
        RecoveryOutcome::Locked => (StatusCode::FORBIDDEN, "locked", None),
    };
    (
        code,
        Json(StatusBody {
            status,
            remaining_attempts,
        }),
    )
        .into_response()
}

/// Extract share strings from a JSON or urlencoded body.
///
/// Anything unrecognised yields an empty list.
fn parse_submission(headers: &HeaderMap, body: &[u8]) -> Zeroizing<Vec<String>> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let shares = if content_type.starts_with("application/json") {
        serde_json::from_slice::<SubmissionBody>(body)
            .map(|b| b.shares)
            .unwrap_or_default()
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        url::form_urlencoded::parse(body)
            .filter(|(key, _)| key == "share" || key == "shares" || key.starts_with("shard"))
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    Zeroizing::new(shares)
}
