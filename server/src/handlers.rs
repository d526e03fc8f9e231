use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::state::AppState;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection_id = Uuid::new_v4();

    state.hub.join(connection_id, tx).await;

    let send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if socket_sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = socket_receiver.next().await {
        match message {
            Message::Text(text) => {
                state.hub.relay(connection_id, text).await;
            }
            Message::Close(frame) => {
                if let Some(frame) = frame {
                    tracing::debug!(
                        conn = %connection_id,
                        code = frame.code,
                        reason = %frame.reason,
                        "close frame"
                    );
                }
                break;
            }
            _ => {}
        }
    }

    state.hub.leave(connection_id).await;
    send_task.abort();
}
