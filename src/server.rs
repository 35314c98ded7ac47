//! HTTP surface: the contact relay endpoint plus the host module and a
//! preview page for the section.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::config::NarrativeConfig;
use crate::contact::{relay, ContactSubmission, MailTransport, DEFAULT_FROM};
use crate::error::{ContactError, NarrativeError, Result};
use crate::runtime::{wrap_host_module, wrap_preview_page, DEFAULT_TAG, DEFAULT_WASM_URL};

/// Listener and relay settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Sender address on relayed mail.
    pub mail_from: String,
    /// Studio inbox that receives submissions.
    pub mail_to: String,
    pub tag_name: String,
    /// URL of the wasm-bindgen shim as seen by the browser.
    pub wasm_url: String,
    pub narrative: NarrativeConfig,
}

impl ServerConfig {
    pub fn new(port: u16, mail_to: impl Into<String>) -> Self {
        Self {
            port,
            mail_from: DEFAULT_FROM.to_string(),
            mail_to: mail_to.into(),
            tag_name: DEFAULT_TAG.to_string(),
            wasm_url: DEFAULT_WASM_URL.to_string(),
            narrative: NarrativeConfig::default(),
        }
    }
}

/// Shared handler state.
pub struct AppState<T> {
    transport: T,
    mail_from: String,
    mail_to: String,
    host_js: String,
    preview_html: String,
    narrative: NarrativeConfig,
}

impl<T: MailTransport> AppState<T> {
    pub fn new(config: &ServerConfig, transport: T) -> Self {
        Self {
            transport,
            mail_from: config.mail_from.clone(),
            mail_to: config.mail_to.clone(),
            host_js: wrap_host_module(&config.tag_name, &config.wasm_url),
            preview_html: wrap_preview_page(&config.tag_name, "/narrative.js", Some("/narrative/config.json")),
            narrative: config.narrative.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Build the router. Generic over the mail transport so tests can record.
pub fn router<T>(state: Arc<AppState<T>>) -> Router
where
    T: MailTransport + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(serve_preview::<T>))
        .route("/narrative.js", get(serve_host_module::<T>))
        .route("/narrative/config.json", get(serve_config::<T>))
        .route("/healthz", get(|| async { "ok" }))
        .route("/api/contact", post(serve_contact::<T>))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run_server<T>(config: ServerConfig, transport: T) -> Result<()>
where
    T: MailTransport + Send + Sync + 'static,
{
    let state = Arc::new(AppState::new(&config, transport));
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| NarrativeError::server(format!("bind {addr}: {e}")))?;
    log::info!("listening on http://{addr}");
    eprintln!("narrative server");
    eprintln!("  preview:  http://localhost:{}/", config.port);
    eprintln!("  module:   http://localhost:{}/narrative.js", config.port);
    eprintln!("  contact:  POST http://localhost:{}/api/contact", config.port);
    eprintln!("  relaying to {}", config.mail_to);

    axum::serve(listener, app)
        .await
        .map_err(|e| NarrativeError::server(e.to_string()))
}

// ── Static-ish routes ─────────────────────────────────────────────────

async fn serve_preview<T>(State(state): State<Arc<AppState<T>>>) -> Html<String> {
    Html(state.preview_html.clone())
}

async fn serve_host_module<T>(
    State(state): State<Arc<AppState<T>>>,
) -> ([(header::HeaderName, &'static str); 1], String) {
    ([(header::CONTENT_TYPE, "text/javascript")], state.host_js.clone())
}

async fn serve_config<T>(State(state): State<Arc<AppState<T>>>) -> Json<NarrativeConfig> {
    Json(state.narrative.clone())
}

// ── POST /api/contact ─────────────────────────────────────────────────

#[derive(Serialize)]
struct ContactAccepted {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct ContactFailure {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn failure(status: StatusCode, error: &'static str, details: Option<String>) -> Response {
    (status, Json(ContactFailure { error, details })).into_response()
}

async fn serve_contact<T>(
    State(state): State<Arc<AppState<T>>>,
    body: std::result::Result<Json<ContactSubmission>, JsonRejection>,
) -> Response
where
    T: MailTransport + Send + Sync + 'static,
{
    let submission = match body {
        Ok(Json(submission)) => submission,
        Err(e) => {
            log::warn!("unreadable contact request: {e}");
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process request",
                Some(e.body_text()),
            );
        }
    };

    match relay(&state.transport, &submission, &state.mail_from, &state.mail_to).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ContactAccepted {
                success: true,
                message: "Form submitted successfully",
            }),
        )
            .into_response(),
        Err(e @ ContactError::MissingField(_)) => {
            log::info!("contact request rejected: {e}");
            failure(StatusCode::BAD_REQUEST, "Missing required fields", None)
        }
        Err(e @ ContactError::Delivery(_)) => {
            log::error!("contact delivery failed: {e}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send email",
                Some(e.to_string()),
            )
        }
    }
}
