//! Token movement protocol
//!
//! Messages go out through an unbounded channel and are fire-and-forget: pointer
//! moves are not coalesced here, rate control belongs to the transport.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::core::geo::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlState {
    Start,
    Control,
    End,
    Blocked,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMoved {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub state: ControlState,
}

impl TokenMoved {
    pub fn new(id: impl Into<String>, position: Point, state: ControlState) -> Self {
        let (x, y) = position.truncate();
        Self {
            id: id.into(),
            x,
            y,
            state,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

/// Envelope as it travels over the session channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data")]
pub enum ProtocolMessage {
    #[serde(rename = "token-moved")]
    TokenMoved(TokenMoved),
}

impl ProtocolMessage {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<TokenMoved> for ProtocolMessage {
    fn from(moved: TokenMoved) -> Self {
        ProtocolMessage::TokenMoved(moved)
    }
}

/// Sending half handed to the map container
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: Sender<ProtocolMessage>,
}

impl Outbox {
    pub fn new(tx: Sender<ProtocolMessage>) -> Self {
        Self { tx }
    }

    /// Creates an outbox and the receiver the transport drains.
    pub fn channel() -> (Self, Receiver<ProtocolMessage>) {
        let (tx, rx) = unbounded();
        (Self::new(tx), rx)
    }

    pub fn send(&self, message: ProtocolMessage) {
        if let Err(e) = self.tx.send(message) {
            log::warn!("dropping protocol message, transport is gone: {:?}", e.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let message: ProtocolMessage =
            TokenMoved::new("goblin-1", Point::new(105.9, 35.2), ControlState::Start).into();
        let json: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "token-moved",
                "data": {"id": "goblin-1", "x": 105, "y": 35, "state": "start"}
            })
        );
    }

    #[test]
    fn test_parse_incoming_correction() {
        let message = ProtocolMessage::from_json(
            r#"{"name": "token-moved", "data": {"id": "a", "x": 1, "y": 2, "state": "blocked"}}"#,
        )
        .unwrap();
        let ProtocolMessage::TokenMoved(moved) = message;
        assert_eq!(moved.state, ControlState::Blocked);
        assert_eq!(moved.position(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_outbox_survives_dropped_receiver() {
        let (outbox, rx) = Outbox::channel();
        outbox.send(TokenMoved::new("a", Point::default(), ControlState::End).into());
        assert_eq!(rx.len(), 1);
        drop(rx);
        outbox.send(TokenMoved::new("a", Point::default(), ControlState::End).into());
    }
}
