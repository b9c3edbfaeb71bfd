//! WebSocket side of the game: every connected client receives the game's
//! notifications, and every text frame a client sends is a pointer sample.

use crate::state::SharedState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use maze_session::{Handshake, SendError, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Fan-out of outbound frames to all connected clients
#[derive(Debug, Clone, Default)]
pub struct WsHub {
    clients: Arc<Mutex<HashMap<Uuid, UnboundedSender<String>>>>,
}

impl WsHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client; frames for it arrive on the returned receiver
    pub fn register(&self) -> (Uuid, UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = unbounded_channel();
        self.clients().insert(id, tx);
        (id, rx)
    }

    pub fn unregister(&self, id: Uuid) {
        self.clients().remove(&id);
    }

    pub fn client_count(&self) -> usize {
        self.clients().len()
    }

    fn clients(&self) -> MutexGuard<'_, HashMap<Uuid, UnboundedSender<String>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for WsHub {
    fn send(&self, payload: String) -> Result<(), SendError> {
        let mut clients = self.clients();
        if clients.is_empty() {
            return Err("no connected clients".into());
        }
        // a closed receiver means the connection is gone
        clients.retain(|_, tx| tx.send(payload.clone()).is_ok());
        Ok(())
    }
}

/// GET /ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sink, mut stream) = socket.split();
    let (id, mut outbound) = state.hub.register();
    tracing::info!("Client {} connected ({} total)", id, state.hub.client_count());

    let hello = match serde_json::to_string(&Handshake::Test) {
        Ok(hello) => hello,
        Err(e) => {
            tracing::error!("Failed to serialize handshake: {}", e);
            state.hub.unregister(id);
            return;
        }
    };
    if let Err(e) = sink.send(Message::Text(hello.into())).await {
        tracing::debug!("Client {} dropped before handshake: {}", id, e);
        state.hub.unregister(id);
        return;
    }

    let forward = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => state.handle_remote_frame(text.as_str()),
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => tracing::debug!("Ignoring binary frame from client {}", id),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("Client {} socket error: {}", id, e);
                break;
            }
        }
    }

    state.hub.unregister(id);
    forward.abort();
    tracing::info!("Client {} disconnected", id);
}
