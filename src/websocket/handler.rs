use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::websocket::message::ClientMessage;
use crate::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one viewer connection: Connecting -> Active -> Closed
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let session_id = Uuid::new_v4();

    // Registering and queueing the snapshot under one lock keeps the snapshot
    // consistent with the edits that follow it on this channel.
    let session_count = {
        let mut hub = state.hub.write().await;
        if !hub.connect(session_id, tx) {
            return;
        }
        hub.session_count()
    };

    tracing::info!(
        "Viewer {} connected. Total viewers: {}",
        session_id,
        session_count
    );

    // Spawn task for sending outgoing messages
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    handle_text_message(&recv_state, session_id, &text).await;
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!("Viewer {} sent close frame", session_id);
                    break;
                }
                Ok(_) => {
                    // Ignore other message types (binary, ping, pong)
                }
                Err(e) => {
                    tracing::warn!("WebSocket error for viewer {}: {}", session_id, e);
                    break;
                }
            }
        }
    });

    // Whichever side ends first takes the other down with it
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    cleanup_session(&state, session_id).await;
}

/// Handle a text message from a viewer. Anything that is not a valid
/// edit intent is dropped without a reply.
async fn handle_text_message(state: &AppState, session_id: Uuid, text: &str) {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::PlacePixel(intent)) => {
            let mut hub = state.hub.write().await;
            match hub.place_pixel(&session_id, intent) {
                Some(edit) => tracing::trace!(
                    "Viewer {} set ({}, {}) to {}",
                    session_id,
                    edit.x,
                    edit.y,
                    edit.color
                ),
                None => tracing::debug!(
                    "Dropped edit from {} at ({}, {})",
                    session_id,
                    intent.x,
                    intent.y
                ),
            }
        }
        Err(e) => {
            tracing::warn!("Invalid message from {}: {}", session_id, e);
        }
    }
}

/// Remove a viewer from the broadcast set
async fn cleanup_session(state: &AppState, session_id: Uuid) {
    let mut hub = state.hub.write().await;
    if hub.disconnect(&session_id).is_some() {
        tracing::info!(
            "Viewer {} disconnected. Remaining viewers: {}",
            session_id,
            hub.session_count()
        );
    }
}
