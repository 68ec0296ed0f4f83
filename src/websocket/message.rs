use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};

use crate::canvas::{EditIntent, Grid, PixelEdit};
use crate::error::PixelboardError;

/// Message types sent from hub to viewer, framed as `{"event": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Entire grid, `data[x][y]`. Sent once per connection.
    FullCanvas(Grid),
    /// One committed edit
    PixelUpdate(PixelEdit),
}

/// Message types sent from viewer to hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    PlacePixel(EditIntent),
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        // Only strings, integers and sequences: serialization cannot fail
        serde_json::to_string(self).expect("server message is always serializable")
    }

    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.to_json())
    }

    pub fn parse(text: &str) -> Result<Self, PixelboardError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl ClientMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("client message is always serializable")
    }

    pub fn parse(text: &str) -> Result<Self, PixelboardError> {
        Ok(serde_json::from_str(text)?)
    }
}
