//! HTTP + Server-Sent Events transport.
//!
//! `GET /sse` opens an event stream and becomes the one active session; a
//! newer stream replaces it. `POST /message` feeds JSON-RPC messages into the
//! active session, whose replies come back as `message` events.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::channel::mpsc::{self, UnboundedSender};
use futures::{Stream, StreamExt, stream};
use rmcp::ServiceExt;
use rmcp::model::{ClientJsonRpcMessage, ServerJsonRpcMessage};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use super::server::SkillServer;

const SSE_PATH: &str = "/sse";
const POST_PATH: &str = "/message";

struct Session {
    id: u64,
    inbound: UnboundedSender<ClientJsonRpcMessage>,
}

#[derive(Clone)]
struct SseState {
    server: SkillServer,
    session: Arc<Mutex<Option<Session>>>,
    next_id: Arc<AtomicU64>,
}

pub fn router(server: SkillServer) -> Router {
    let state = SseState {
        server,
        session: Arc::new(Mutex::new(None)),
        next_id: Arc::new(AtomicU64::new(1)),
    };
    Router::new()
        .route(SSE_PATH, get(open_stream))
        .route(POST_PATH, post(post_message))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(server: SkillServer, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind SSE endpoint at {addr}"))?;
    let local = listener
        .local_addr()
        .context("failed to resolve local SSE address")?;

    tracing::info!(
        skills = %server.skills_dir().display(),
        "AgCel MCP server running on SSE at http://localhost:{}{SSE_PATH}",
        local.port()
    );

    axum::serve(listener, router(server))
        .await
        .context("SSE server stopped")
}

async fn open_stream(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    let (inbound_tx, inbound_rx) = mpsc::unbounded::<ClientJsonRpcMessage>();
    let (outbound_tx, outbound_rx) = mpsc::unbounded::<ServerJsonRpcMessage>();

    let previous = state.session.lock().await.replace(Session {
        id,
        inbound: inbound_tx,
    });
    match previous {
        Some(previous) => {
            tracing::info!(session = id, replaced = previous.id, "SSE session replaced")
        }
        None => tracing::info!(session = id, "SSE session opened"),
    }

    let server = state.server.clone();
    tokio::spawn(async move {
        match server.serve((outbound_tx, inbound_rx)).await {
            Ok(running) => {
                if let Err(e) = running.waiting().await {
                    tracing::warn!(session = id, error = %e, "SSE session task failed");
                }
            }
            Err(e) => tracing::warn!(session = id, error = %e, "SSE session failed to initialize"),
        }
        tracing::debug!(session = id, "SSE session closed");
    });

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{POST_PATH}?sessionId={id}"));
    let messages = outbound_rx.map(move |message| match serde_json::to_string(&message) {
        Ok(data) => Event::default().event("message").data(data),
        Err(e) => {
            tracing::warn!(session = id, error = %e, "failed to encode outgoing message");
            Event::default().comment("dropped unencodable message")
        }
    });

    let events = stream::once(async move { endpoint })
        .chain(messages)
        .map(Ok);
    Sse::new(events).keep_alive(KeepAlive::default())
}

async fn post_message(
    State(state): State<SseState>,
    Json(message): Json<ClientJsonRpcMessage>,
) -> Response {
    let guard = state.session.lock().await;
    let Some(session) = guard.as_ref() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Session not found" })),
        )
            .into_response();
    };

    if session.inbound.unbounded_send(message).is_err() {
        return (
            StatusCode::GONE,
            Json(json!({ "error": "Session closed" })),
        )
            .into_response();
    }
    StatusCode::ACCEPTED.into_response()
}
