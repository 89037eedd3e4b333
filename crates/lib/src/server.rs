//! HTTP host for the dispatcher (single port).
//!
//! Plays the hosting platform's part: `/invoke` takes a function event envelope,
//! `/webhook` takes the raw update Telegram POSTs. A failed invocation becomes a 500.

use crate::config::Config;
use crate::error::{DecodeError, HandlerError};
use crate::handler::{Dispatcher, HttpResponse, WebhookEvent};
use crate::runtime;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state for the server (config, dispatcher).
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Routes without a listener; used by `run_server` and handy for embedding.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health_http))
        .route("/invoke", post(invoke))
        .route("/webhook", post(webhook))
        .with_state(state)
}

/// Build the dispatcher, bind, and serve until SIGINT/SIGTERM.
pub async fn run_server(config: Config) -> Result<()> {
    let dispatcher = Arc::new(runtime::build_dispatcher(&config)?);
    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let state = ServerState {
        config: Arc::new(config),
        dispatcher,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("hello-bot listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited")?;
    log::info!("hello-bot stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
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
    log::info!("shutdown signal received, draining connections");
}

fn failed_invocation(e: HandlerError) -> Response {
    log::warn!("invocation failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

/// POST /invoke — body is a function event envelope; replies with the function's response JSON.
async fn invoke(State(state): State<ServerState>, body: Bytes) -> Response {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    match state.dispatcher.handle(&event).await {
        Ok(res) => (StatusCode::OK, Json(res)).into_response(),
        Err(e) => failed_invocation(e),
    }
}

/// POST /webhook — body is a raw Telegram update; replies with the function's status and body.
async fn webhook(State(state): State<ServerState>, body: Bytes) -> Response {
    let body = match String::from_utf8(body.to_vec()) {
        Ok(s) => s,
        Err(e) => return failed_invocation(HandlerError::Decode(DecodeError::Utf8(e))),
    };
    match state.dispatcher.handle(&WebhookEvent::from_body(body)).await {
        Ok(HttpResponse { status_code, body }) => {
            let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::OK);
            (status, body).into_response()
        }
        Err(e) => failed_invocation(e),
    }
}

/// GET /health returns a simple health JSON (for probes).
async fn health_http(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.server.port,
    }))
}
