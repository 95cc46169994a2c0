//! HTTP surface: the embedded chat page and a small JSON API.
//!
//! One [`App`] is shared behind an async mutex, so rounds from concurrent
//! requests run one at a time against the same session.

use std::error::Error;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::core::app::App;
use crate::core::personality::Personality;
use crate::core::router::RoundReply;

const INDEX_HTML: &str = include_str!("index.html");
const HEALTH_MESSAGE: &str = "Chatbot server is running";
const DEFAULT_PERSONALITY: &str = "default";

#[derive(Clone)]
pub struct AppState {
    app: Arc<Mutex<App>>,
}

impl AppState {
    pub fn new(app: App) -> Self {
        Self {
            app: Arc::new(Mutex::new(app)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        message: HEALTH_MESSAGE,
    })
}

/// Unreadable bodies are treated as empty, so they fail the message check.
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable chat body");
            ChatRequest::default()
        }
    };

    let message = request.message.as_deref().map(str::trim).unwrap_or("");
    if message.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Message is required");
    }

    let mut app = state.app.lock().await;

    // Switching style from the page keeps the conversation going. A request
    // without a style asks for the default one.
    let label = request
        .personality
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(DEFAULT_PERSONALITY);
    match label.parse::<Personality>() {
        Ok(personality) if personality != app.session.personality() => {
            app.session.set_personality_keep_history(personality);
        }
        Ok(_) => {}
        Err(_) => debug!(personality = %label, "ignoring unknown personality"),
    }

    match app.send_message(message).await {
        Ok(replies) => reply_response(&replies),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

/// A lone reply is returned bare; several are labelled by speaker. The
/// request fails only when no speaker answered.
fn reply_response(replies: &[RoundReply]) -> Response {
    if replies.iter().all(RoundReply::is_error) {
        let reason = replies
            .iter()
            .filter_map(RoundReply::error)
            .map(|err| err.reason())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(%reason, "chat request failed");
        return error_response(StatusCode::SERVICE_UNAVAILABLE, reason);
    }

    let response = match replies {
        [single] => single.text().unwrap_or_default().trim().to_string(),
        many => many
            .iter()
            .map(RoundReply::render)
            .collect::<Vec<_>>()
            .join("\n\n"),
    };
    Json(ChatResponse { response }).into_response()
}

pub async fn run(mut app: App, host: &str, port: u16) -> Result<(), Box<dyn Error>> {
    for notice in app.take_notices() {
        eprintln!("{}", notice.render());
    }

    let listener = TcpListener::bind((host, port)).await?;
    let local = listener.local_addr()?;
    println!("Starting chatbot server...");
    println!("Open http://{local} in your browser.");
    info!(address = %local, "listening");

    axum::serve(listener, create_router(AppState::new(app)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
