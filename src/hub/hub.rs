use axum::extract::ws::Message;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::canvas::{EditIntent, Grid, PixelEdit};
use crate::hub::{CanvasStore, Session};
use crate::websocket::message::ServerMessage;

/// Authoritative canvas plus the set of viewers subscribed to its edits
pub struct Hub {
    store: CanvasStore,
    sessions: HashMap<Uuid, Session>,
}

impl Hub {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            store: CanvasStore::new(width, height),
            sessions: HashMap::new(),
        }
    }

    /// Register a viewer and queue the current snapshot for it.
    ///
    /// Returns false if the viewer's channel is already gone, in which
    /// case nothing is registered.
    pub fn connect(&mut self, id: Uuid, sender: UnboundedSender<Message>) -> bool {
        let mut session = Session::new(sender);

        let snapshot = ServerMessage::FullCanvas(self.store.snapshot());
        if !session.send(snapshot.to_ws_message()) {
            session.close();
            return false;
        }

        session.activate();
        self.sessions.insert(id, session);
        true
    }

    /// Remove a viewer from the broadcast set
    pub fn disconnect(&mut self, id: &Uuid) -> Option<Session> {
        let mut session = self.sessions.remove(id)?;
        session.close();
        Some(session)
    }

    /// Apply an edit intent from `id` and fan the committed edit out to every
    /// active session, the sender included.
    ///
    /// Intents from unknown or inactive sessions and out of range
    /// coordinates are dropped without any reply.
    pub fn place_pixel(&mut self, id: &Uuid, intent: EditIntent) -> Option<PixelEdit> {
        if !self.sessions.get(id).is_some_and(Session::is_active) {
            return None;
        }

        let edit = self.store.apply_edit(intent.x, intent.y, intent.color)?;
        self.broadcast(&ServerMessage::PixelUpdate(edit));
        Some(edit)
    }

    /// Send a message to all active sessions, pruning those whose channel is closed
    pub fn broadcast(&mut self, message: &ServerMessage) {
        let message = message.to_ws_message();

        let targets: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.is_active())
            .map(|(id, _)| *id)
            .collect();

        let mut failed = Vec::new();
        for id in targets {
            if let Some(session) = self.sessions.get(&id) {
                if !session.send(message.clone()) {
                    failed.push(id);
                }
            }
        }

        for id in failed {
            if self.disconnect(&id).is_some() {
                tracing::info!("Dropped unreachable session {}", id);
            }
        }
    }

    pub fn snapshot(&self) -> Grid {
        self.store.snapshot()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_connected(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.store.dimensions()
    }
}
