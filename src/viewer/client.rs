use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::canvas::{Color, EditIntent};
use crate::error::PixelboardError;
use crate::viewer::Mirror;
use crate::websocket::message::{ClientMessage, ServerMessage};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A connection to a hub together with the local mirror it keeps up to date
pub struct ViewerClient {
    stream: WsStream,
    mirror: Mirror,
}

impl ViewerClient {
    /// Connect to a hub WebSocket endpoint, e.g. `ws://127.0.0.1:3000/ws`
    pub async fn connect(url: &str) -> Result<Self, PixelboardError> {
        let (stream, _) = connect_async(url).await?;
        Ok(Self {
            stream,
            mirror: Mirror::new(),
        })
    }

    /// Wait for the next hub message and apply it to the mirror.
    ///
    /// Frames that do not decode are skipped.
    pub async fn next_event(&mut self) -> Result<ServerMessage, PixelboardError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => match ServerMessage::parse(&text) {
                    Ok(message) => {
                        self.mirror.apply(&message);
                        return Ok(message);
                    }
                    Err(e) => tracing::warn!("Ignoring undecodable hub message: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => return Err(PixelboardError::ConnectionClosed),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Apply an edit locally and send it to the hub.
    ///
    /// Returns false without sending anything when the mirror has no
    /// snapshot yet or the coordinates are outside it.
    pub async fn place(&mut self, x: i64, y: i64, color: Color) -> Result<bool, PixelboardError> {
        match self.mirror.place_local(x, y, color) {
            Some(intent) => {
                self.send_intent(intent).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Send an edit intent as is, without touching the mirror
    pub async fn send_intent(&mut self, intent: EditIntent) -> Result<(), PixelboardError> {
        let text = ClientMessage::PlacePixel(intent).to_json();
        self.stream.send(Message::Text(text)).await?;
        Ok(())
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn mirror_mut(&mut self) -> &mut Mirror {
        &mut self.mirror
    }

    /// Close the connection; the mirror is discarded with the client
    pub async fn close(mut self) -> Result<(), PixelboardError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
