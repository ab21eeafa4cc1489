//! Server status push channel.
//!
//! `GET /ws/server-info` upgrades to a WebSocket and sends one
//! [`StatusPayload`] per interval until the client goes away. Nothing the
//! client sends is interpreted; incoming frames are only watched for a close
//! or transport error.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use futures::{SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::state::AppState;

/// A single status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: String,
    /// UTC wall-clock time at production, RFC 3339
    pub datetime: String,
}

impl StatusPayload {
    pub fn now() -> Self {
        Self {
            status: "ok".to_string(),
            datetime: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

/// Endless status sequence: produce, yield, then sleep for `interval`.
///
/// Every payload is stamped when it is produced. A consumer that falls
/// behind does not cause extra payloads to be emitted afterwards.
pub fn status_stream(interval: Duration) -> impl Stream<Item = StatusPayload> {
    async_stream::stream! {
        loop {
            yield StatusPayload::now();
            tokio::time::sleep(interval).await;
        }
    }
}

/// GET /ws/server-info
pub async fn server_info(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let interval = state.config.status_interval;
    ws.on_upgrade(move |socket| push_status(socket, interval))
}

async fn push_status(socket: WebSocket, interval: Duration) {
    let (mut sender, mut receiver) = socket.split();
    let updates = status_stream(interval);
    tokio::pin!(updates);

    debug!("Status stream opened");

    loop {
        tokio::select! {
            payload = updates.next() => {
                let Some(payload) = payload else {
                    break;
                };
                let text = match serde_json::to_string(&payload) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to serialize status payload: {}", e);
                        break;
                    }
                };
                if sender.send(Message::Text(text.into())).await.is_err() {
                    debug!("Status send failed, client disconnected");
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Status client closed the connection");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!("Status connection dropped: {}", e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("Status stream closed");
}
