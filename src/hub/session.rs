use axum::extract::ws::Message;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Registered, snapshot not yet queued
    Connecting,
    /// Snapshot queued, receives every committed edit
    Active,
    Closed,
}

/// One connected viewer as seen by the hub
#[derive(Debug)]
pub struct Session {
    sender: UnboundedSender<Message>,
    state: SessionState,
}

impl Session {
    pub fn new(sender: UnboundedSender<Message>) -> Self {
        Self {
            sender,
            state: SessionState::Connecting,
        }
    }

    /// Queue a message for this viewer's send task
    pub fn send(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn activate(&mut self) {
        if self.state == SessionState::Connecting {
            self.state = SessionState::Active;
        }
    }

    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_lifecycle() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new(tx);
        assert_eq!(session.state(), SessionState::Connecting);

        session.activate();
        assert!(session.is_active());

        session.close();
        assert_eq!(session.state(), SessionState::Closed);

        // A closed session never comes back
        session.activate();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Session::new(tx);
        assert!(session.send(Message::Text("hi".into())));

        drop(rx);
        assert!(!session.send(Message::Text("hi".into())));
    }
}
