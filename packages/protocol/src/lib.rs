//! # Atelier Protocol
//!
//! Typed messages exchanged between the editor host and the preview sandbox,
//! plus the channel link that carries them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐   FrameCommand::Load / Post   ┌──────────────────────┐
//! │ host (editor state)  │ ────────────────────────────▶ │ sandbox (live DOM)   │
//! │                      │ ◀──────────────────────────── │                      │
//! └──────────────────────┘     raw JSON {type, data}     └──────────────────────┘
//! ```
//!
//! Both sides are independent actors. Nothing but serialized messages
//! crosses the link.
//!
//! ## Trust
//!
//! Message origin is not validated. Everything on the sandbox side is
//! user-authored content that is already isolated, and user scripts are
//! allowed to speak the protocol (`update-editor-code`). Any hardening of
//! this (origin allow-lists, per-load nonces) must be an explicit change to
//! this crate, not a silent filter in a receiver.
//!
//! The one transport-level filter lives in the `atelier-server` host page:
//! it forwards a `message` event only when `event.source` is the preview
//! iframe's window. That ties traffic to the frame, not to any origin, and
//! everything the frame's scripts post still gets through.

mod bus;
mod error;
mod messages;

pub use bus::{link, FrameCommand, FrameLink, HostLink, MessagePoster};
pub use error::ProtocolError;
pub use messages::{
    decode, Deselected, Direction, EditorCodeUpdate, ElementUpdate, InteractionMode,
    PropertyMap, ProtocolMessage, SelectedElement, UpdateResult,
};
