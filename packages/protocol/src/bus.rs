//! # Message Link
//!
//! Asynchronous link between the host actor and a sandbox frame.
//!
//! - host → frame: [`FrameCommand`]s. `Load` replaces the whole document
//!   (the equivalent of assigning `srcdoc`), `Post` delivers one serialized
//!   protocol message.
//! - frame → host: raw JSON strings, decoded on receipt.
//!
//! Delivery is FIFO per direction. There is no handshake, no sequence
//! numbering and no acknowledgment timeout.

use crate::{decode, ProtocolError, ProtocolMessage};
use tokio::sync::mpsc;

/// Instruction from the host to the frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameCommand {
    /// Replace the frame document wholesale (full reload)
    Load(String),

    /// Deliver a serialized protocol message
    Post(String),
}

/// Host end of the link
pub struct HostLink {
    commands: mpsc::UnboundedSender<FrameCommand>,
    inbound: mpsc::UnboundedReceiver<String>,
}

/// Frame end of the link
pub struct FrameLink {
    commands: mpsc::UnboundedReceiver<FrameCommand>,
    outbound: mpsc::UnboundedSender<String>,
}

/// Cloneable handle for posting raw messages toward the host
#[derive(Clone)]
pub struct MessagePoster {
    tx: mpsc::UnboundedSender<String>,
}

/// Create a connected host/frame pair
pub fn link() -> (HostLink, FrameLink) {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

    let host = HostLink {
        commands: commands_tx,
        inbound: inbound_rx,
    };
    let frame = FrameLink {
        commands: commands_rx,
        outbound: inbound_tx,
    };

    (host, frame)
}

impl HostLink {
    /// Replace the frame document
    pub fn load(&self, document: String) -> Result<(), ProtocolError> {
        self.commands
            .send(FrameCommand::Load(document))
            .map_err(|_| ProtocolError::ChannelClosed)
    }

    /// Send a message to the frame
    pub fn post(&self, message: &ProtocolMessage) -> Result<(), ProtocolError> {
        let json = message.to_json()?;
        tracing::debug!(kind = message.kind(), "host → sandbox");
        self.commands
            .send(FrameCommand::Post(json))
            .map_err(|_| ProtocolError::ChannelClosed)
    }

    /// Next message from the frame, decoded
    ///
    /// `None` once every frame-side sender is gone. A message that fails
    /// validation is returned as `Some(Err(_))` so the caller can log it.
    pub async fn recv(&mut self) -> Option<Result<ProtocolMessage, ProtocolError>> {
        let raw = self.inbound.recv().await?;
        Some(decode(&raw))
    }
}

impl FrameLink {
    /// Next command from the host; `None` when the host is gone
    pub async fn next_command(&mut self) -> Option<FrameCommand> {
        self.commands.recv().await
    }

    pub fn post(&self, message: &ProtocolMessage) -> Result<(), ProtocolError> {
        tracing::debug!(kind = message.kind(), "sandbox → host");
        self.post_raw(message.to_json()?)
    }

    pub fn post_raw(&self, raw: String) -> Result<(), ProtocolError> {
        self.outbound
            .send(raw)
            .map_err(|_| ProtocolError::ChannelClosed)
    }

    /// Cloneable poster toward the host
    ///
    /// Used by transports that receive frame traffic out of band, such as
    /// an HTTP endpoint relaying a browser's `postMessage`.
    pub fn poster(&self) -> MessagePoster {
        MessagePoster {
            tx: self.outbound.clone(),
        }
    }
}

impl MessagePoster {
    pub fn post(&self, message: &ProtocolMessage) -> Result<(), ProtocolError> {
        self.post_raw(message.to_json()?)
    }

    pub fn post_raw(&self, raw: String) -> Result<(), ProtocolError> {
        self.tx.send(raw).map_err(|_| ProtocolError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementUpdate, SelectedElement};

    #[tokio::test]
    async fn test_host_to_frame_is_fifo() {
        let (host, mut frame) = link();

        host.load("<html></html>".to_string()).unwrap();
        host.post(&ProtocolMessage::UpdateElement(ElementUpdate::default()))
            .unwrap();

        assert_eq!(
            frame.next_command().await,
            Some(FrameCommand::Load("<html></html>".to_string()))
        );
        match frame.next_command().await {
            Some(FrameCommand::Post(raw)) => {
                assert!(matches!(
                    decode(&raw).unwrap(),
                    ProtocolMessage::UpdateElement(_)
                ));
            }
            other => panic!("Expected a post, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_frame_to_host_decodes() {
        let (mut host, frame) = link();

        frame
            .post(&ProtocolMessage::ElementSelected(SelectedElement {
                tag: "p".to_string(),
                ..Default::default()
            }))
            .unwrap();
        frame.post_raw(r#"{"type":"bogus"}"#.to_string()).unwrap();

        let first = host.recv().await.unwrap().unwrap();
        assert_eq!(first.kind(), "element-selected");

        let second = host.recv().await.unwrap();
        assert!(matches!(second, Err(ProtocolError::UnknownType(_))));
    }

    #[tokio::test]
    async fn test_poster_reaches_host() {
        let (mut host, frame) = link();
        let poster = frame.poster();
        drop(frame);

        poster.post(&ProtocolMessage::deselected()).unwrap();

        let message = host.recv().await.unwrap().unwrap();
        assert_eq!(message, ProtocolMessage::deselected());
    }

    #[test]
    fn test_load_after_frame_dropped() {
        let (host, frame) = link();
        drop(frame);

        assert!(matches!(
            host.load(String::new()),
            Err(ProtocolError::ChannelClosed)
        ));
    }
}
