//! # Preview Event Relay
//!
//! Fans the frame end of the link and the host status out to any number of
//! remote previews. A late subscriber first gets [`PreviewEvents::replay`]:
//! the last document loaded and the status in effect, then live events.
//!
//! Failed recompositions never reach the frame as a `Load`, so the status
//! stream is the only way a remote preview learns about them.

use crate::state::PreviewStatus;
use atelier_protocol::{FrameCommand, FrameLink};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;

const CAPACITY: usize = 64;

/// One event for a remote preview page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PreviewEvent {
    /// Replace the frame document
    Load { document: String },
    /// Deliver one serialized protocol message to the frame
    Post { message: String },
    /// Composition outcome changed
    Status { status: PreviewStatus },
}

impl PreviewEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Subscription side of a running relay
#[derive(Clone)]
pub struct PreviewEvents {
    sender: broadcast::Sender<PreviewEvent>,
    latest_load: Arc<RwLock<Option<String>>>,
    status: watch::Receiver<PreviewStatus>,
}

impl PreviewEvents {
    /// Live events from now on
    ///
    /// Subscribe before calling [`replay`](Self::replay) so nothing falls in
    /// between; a duplicate is harmless, a gap is not.
    pub fn subscribe(&self) -> broadcast::Receiver<PreviewEvent> {
        self.sender.subscribe()
    }

    /// Current state for a new subscriber
    pub async fn replay(&self) -> Vec<PreviewEvent> {
        let mut events = Vec::with_capacity(2);
        if let Some(document) = self.latest_load.read().await.clone() {
            events.push(PreviewEvent::Load { document });
        }
        events.push(PreviewEvent::Status {
            status: self.status.borrow().clone(),
        });
        events
    }
}

/// Start relaying frame commands and status changes
pub fn spawn_relay(
    frame: FrameLink,
    status: watch::Receiver<PreviewStatus>,
) -> (PreviewEvents, JoinHandle<()>) {
    let (sender, _) = broadcast::channel(CAPACITY);
    let events = PreviewEvents {
        sender: sender.clone(),
        latest_load: Arc::new(RwLock::new(None)),
        status: status.clone(),
    };
    let task = tokio::spawn(run(frame, status, sender, events.latest_load.clone()));
    (events, task)
}

async fn run(
    mut frame: FrameLink,
    mut status: watch::Receiver<PreviewStatus>,
    sender: broadcast::Sender<PreviewEvent>,
    latest_load: Arc<RwLock<Option<String>>>,
) {
    let mut status_open = true;

    loop {
        let event = tokio::select! {
            // A reload puts its Load on the link before its status changes
            biased;

            command = frame.next_command() => match command {
                Some(FrameCommand::Load(document)) => {
                    *latest_load.write().await = Some(document.clone());
                    PreviewEvent::Load { document }
                }
                Some(FrameCommand::Post(message)) => PreviewEvent::Post { message },
                None => break,
            },

            changed = status.changed(), if status_open => match changed {
                Ok(()) => PreviewEvent::Status {
                    status: status.borrow_and_update().clone(),
                },
                Err(_) => {
                    status_open = false;
                    continue;
                }
            },
        };

        // No subscribers is fine; replay covers late arrivals
        let _ = sender.send(event);
    }

    tracing::info!("host link closed, relay stopping");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let load = serde_json::to_value(PreviewEvent::Load {
            document: "<html></html>".into(),
        })
        .unwrap();
        assert_eq!(load["kind"], "load");
        assert_eq!(load["document"], "<html></html>");

        let status = serde_json::to_value(PreviewEvent::Status {
            status: PreviewStatus::failed("boom"),
        })
        .unwrap();
        assert_eq!(status["kind"], "status");
        assert_eq!(status["status"]["state"], "failed");
        assert_eq!(status["status"]["message"], "boom");
    }

    #[tokio::test]
    async fn test_replay_carries_latest_load_and_status() {
        let (host, frame) = atelier_protocol::link();
        let (status_tx, status_rx) = watch::channel(PreviewStatus::Idle);
        let (events, _task) = spawn_relay(frame, status_rx);
        let mut rx = events.subscribe();

        host.load("<p>one</p>".into()).unwrap();
        host.load("<p>two</p>".into()).unwrap();
        status_tx.send_replace(PreviewStatus::loaded(1));

        assert_eq!(
            rx.recv().await.unwrap(),
            PreviewEvent::Load { document: "<p>one</p>".into() }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            PreviewEvent::Load { document: "<p>two</p>".into() }
        );
        assert!(matches!(
            rx.recv().await.unwrap(),
            PreviewEvent::Status { status: PreviewStatus::Loaded { version: 1, .. } }
        ));

        let replay = events.replay().await;
        assert_eq!(replay.len(), 2);
        assert_eq!(replay[0], PreviewEvent::Load { document: "<p>two</p>".into() });
        assert!(matches!(
            replay[1],
            PreviewEvent::Status { status: PreviewStatus::Loaded { version: 1, .. } }
        ));
    }

    #[tokio::test]
    async fn test_relay_stops_with_host_link() {
        let (host, frame) = atelier_protocol::link();
        let (_status_tx, status_rx) = watch::channel(PreviewStatus::Idle);
        let (_events, task) = spawn_relay(frame, status_rx);

        drop(host);
        task.await.unwrap();
    }
}
