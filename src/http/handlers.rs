use super::state::AppState;
use crate::protocol::{ClientMessage, ServerEvent};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UploadContextRequest {
    /// Extracted resume text (document parsing happens upstream)
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct UploadContextResponse {
    pub message: String,
    pub resume_chars: usize,
    pub job_chars: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Anything shorter is not a usable resume extraction.
const MIN_RESUME_CHARS: usize = 50;

// ============================================================================
// Handlers
// ============================================================================

/// GET /
/// Service info
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Interview Coach API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "websocket": "/ws/audio",
            "context": "/api/context",
            "health": "/health",
        }
    }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// POST /api/context
/// Store resume and job-description text for upcoming sessions
pub async fn upload_context(
    State(state): State<AppState>,
    Json(req): Json<UploadContextRequest>,
) -> impl IntoResponse {
    if req.resume_text.trim().len() < MIN_RESUME_CHARS {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "Resume text too short; supply the full extracted document text"
                    .to_string(),
            }),
        )
            .into_response();
    }

    let resume_chars = req.resume_text.len();
    let job_chars = req.job_description.len();

    {
        let mut context = state.context.write().await;
        context.resume_text = req.resume_text;
        context.job_text = req.job_description;
    }

    info!(
        "Session context updated ({} resume chars, {} job chars)",
        resume_chars, job_chars
    );

    (
        StatusCode::OK,
        Json(UploadContextResponse {
            message: "Documents uploaded successfully".to_string(),
            resume_chars,
            job_chars,
        }),
    )
        .into_response()
}

/// GET /ws/audio
/// Upgrade to the bidirectional coaching channel
pub async fn ws_audio(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| coaching_channel(socket, state))
}

/// Bridge one WebSocket to one session: inbound frames become pipeline
/// calls, session events stream back out in order.
async fn coaching_channel(socket: WebSocket, state: AppState) {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<ServerEvent>();

    let context = state.context.read().await.clone();
    let mut session = state.manager.open(context, events_tx);
    let session_id = session.id().to_string();

    let (mut sink, mut stream) = socket.split();

    // Writer task: drain session events onto the socket in emission order.
    let writer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if sink.send(Message::Text(payload)).await.is_err() {
                // Peer gone; the read side will observe the close.
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(_) => break, // connection lost
        };

        match frame {
            Message::Text(text) => match ClientMessage::parse(&text) {
                Ok(message) => state.manager.on_control(&mut session, message).await,
                Err(error) => state.manager.on_invalid_message(&session, error),
            },
            Message::Close(_) => break,
            Message::Binary(_) => {
                warn!("Session {}: ignoring unexpected binary frame", session_id);
            }
            // axum answers WebSocket ping frames itself
            _ => {}
        }
    }

    state.manager.close(&mut session).await;

    // Dropping the session drops the last event sender; the writer drains
    // whatever was already emitted and exits.
    drop(session);
    let _ = writer.await;

    info!("Session {}: channel closed", session_id);
}
