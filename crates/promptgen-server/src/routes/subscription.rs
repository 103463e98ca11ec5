//! Live record changes over WebSocket
//!
//! Each text frame is one JSON `PromptChange` for a record the caller owns.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use promptgen::PromptChange;

use crate::auth::Caller;
use crate::AppState;

/// Subscribe to the caller's record changes
#[utoipa::path(
    get,
    path = "/prompts/subscribe",
    responses(
        (status = 101, description = "Switching to WebSocket"),
        (status = 501, description = "Store has no change feed")
    ),
    tag = "Prompt"
)]
pub async fn subscribe_prompts(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Response {
    let Some(changes) = state.prompt_service.repository().subscribe() else {
        return (
            StatusCode::NOT_IMPLEMENTED,
            "Change feed is not available for this store".to_string(),
        )
            .into_response();
    };

    ws.on_upgrade(move |socket| stream_changes(socket, changes, caller.sub))
}

async fn stream_changes(
    socket: WebSocket,
    mut changes: broadcast::Receiver<PromptChange>,
    owner: String,
) {
    tracing::info!(owner = %owner, "Subscriber connected");
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(change) if change.record.owner == owner => {
                    let text = match serde_json::to_string(&change) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("Failed to encode change: {}", e);
                            continue;
                        }
                    };
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        owner = %owner,
                        "Subscriber lagged, {} changes dropped",
                        skipped
                    );
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::debug!(owner = %owner, error = %e, "WebSocket receive error");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::info!(owner = %owner, "Subscriber disconnected");
}

pub fn router() -> Router<AppState> {
    Router::new().route("/prompts/subscribe", get(subscribe_prompts))
}
