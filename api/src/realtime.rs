//! WebSocket room relay for live task updates.
//!
//! Clients join a room per project and receive `task-updated` events sent by
//! other members of that room. The relay does not inspect or merge updates.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::AppState;

const ROOM_CAPACITY: usize = 64;
const OUTBOX_CAPACITY: usize = 64;

/// Room name for a project.
pub fn room_for(project_id: &str) -> String {
    format!("project-{}", project_id)
}

/// A message relayed to a room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomEvent {
    /// Connection that sent the event; it is not echoed back to it.
    pub sender: u64,
    pub payload: String,
}

/// Events a client may send.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinProject {
        #[serde(rename = "projectId")]
        project_id: String,
    },
    LeaveProject {
        #[serde(rename = "projectId")]
        project_id: String,
    },
    TaskUpdate {
        data: serde_json::Value,
    },
}

/// One broadcast channel per room, created on first join.
#[derive(Debug, Default)]
pub struct RealtimeHub {
    rooms: Mutex<HashMap<String, broadcast::Sender<RoomEvent>>>,
    next_connection: AtomicU64,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an id for a new connection.
    pub fn connect(&self) -> u64 {
        self.next_connection.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn subscribe(&self, room: &str) -> broadcast::Receiver<RoomEvent> {
        let mut rooms = self.rooms.lock();
        rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Sends an event to a room and returns how many subscribers it reached.
    /// Rooms nobody has joined drop the event.
    pub fn publish(&self, room: &str, event: RoomEvent) -> usize {
        let rooms = self.rooms.lock();
        rooms
            .get(room)
            .and_then(|sender| sender.send(event).ok())
            .unwrap_or(0)
    }

    /// Forgets a room once its last subscriber is gone.
    pub fn release(&self, room: &str) {
        let mut rooms = self.rooms.lock();
        if rooms.get(room).is_some_and(|sender| sender.receiver_count() == 0) {
            rooms.remove(room);
            debug!("REALTIME: closed empty room {}", room);
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().len()
    }
}

/// WebSocket endpoint
///
/// GET /api/realtime
pub async fn realtime_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    let hub = state.hub.clone();
    let connection = hub.connect();
    info!("REALTIME: client {} connected", connection);

    let (mut sink, mut stream) = socket.split();
    let (outbox, mut inbox) = mpsc::channel::<String>(OUTBOX_CAPACITY);

    let writer = tokio::spawn(async move {
        while let Some(text) = inbox.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let mut rooms: HashMap<String, JoinHandle<()>> = HashMap::new();

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(ClientEvent::JoinProject { project_id }) => {
                    let room = room_for(&project_id);
                    if rooms.contains_key(&room) {
                        continue;
                    }
                    let forwarder = forward_room(hub.subscribe(&room), connection, outbox.clone());
                    info!("REALTIME: client {} joined {}", connection, room);
                    rooms.insert(room, forwarder);
                }
                Ok(ClientEvent::LeaveProject { project_id }) => {
                    let room = room_for(&project_id);
                    if let Some(forwarder) = rooms.remove(&room) {
                        forwarder.abort();
                        let _ = forwarder.await;
                        hub.release(&room);
                        info!("REALTIME: client {} left {}", connection, room);
                    }
                }
                Ok(ClientEvent::TaskUpdate { data }) => {
                    let Some(project_id) = data.get("projectId").and_then(|v| v.as_str()) else {
                        warn!("REALTIME: task-update from {} without projectId", connection);
                        continue;
                    };
                    let room = room_for(project_id);
                    let payload = json!({ "event": "task-updated", "data": data }).to_string();
                    let reached = hub.publish(
                        &room,
                        RoomEvent {
                            sender: connection,
                            payload,
                        },
                    );
                    debug!("REALTIME: task-update relayed to {} ({} subscribers)", room, reached);
                }
                Err(e) => {
                    debug!("REALTIME: ignoring malformed event from {}: {}", connection, e);
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    for (room, forwarder) in rooms {
        forwarder.abort();
        let _ = forwarder.await;
        hub.release(&room);
    }
    writer.abort();
    info!("REALTIME: client {} disconnected", connection);
}

/// Copies room events from other connections into this connection's outbox.
fn forward_room(
    mut receiver: broadcast::Receiver<RoomEvent>,
    connection: u64,
    outbox: mpsc::Sender<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) if event.sender == connection => {}
                Ok(event) => {
                    if outbox.send(event.payload).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("REALTIME: client {} lagged, skipped {} events", connection, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
