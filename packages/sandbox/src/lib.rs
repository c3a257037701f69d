//! # Atelier Sandbox
//!
//! In-process stand-in for the preview frame.
//!
//! A composed document is parsed with html5ever into an arena DOM, and the
//! behavior of the embedded runtime script is replayed natively on it:
//! hover and selection markers, `element-selected` and `element-deselected`
//! posts, and `update-element` handling.
//!
//! ```text
//! HostLink ──Load/Post──▶ FrameLink ──▶ SandboxRuntime (Dom)
//!    ▲                                      │
//!    └──────────── raw JSON posts ◀─────────┘
//! ```
//!
//! Nothing in this crate shares state with the host. The only way in or
//! out is the link.

mod actor;
pub mod dom;
mod error;
mod parser;
mod runtime;

pub use actor::{spawn_sandbox, SandboxHandle, SandboxSnapshot};
pub use dom::{Dom, ElementData, NodeData, NodeId};
pub use error::SandboxError;
pub use parser::{parse_html, set_inner_html};
pub use runtime::{PointerKind, SandboxRuntime, Target, HIGHLIGHT_CLASS, SELECTED_CLASS};
