//! # Atelier Workspace
//!
//! Editor-side orchestration: the preview host actor that owns the edit
//! session, the read-only element inspector, the project file watcher, and
//! the event relay that fans the frame link out to remote previews.
//!
//! The `atelier-server` binary wires these to a browser over HTTP.

mod config;
mod host;
pub mod inspector;
mod relay;
mod state;
mod watcher;

pub use config::{Config, ConfigError, ConfigResult, DEFAULT_CONFIG_NAME};
pub use host::{HostError, HostHandle, HostResult, PreviewHost};
pub use inspector::{inspect, Inspection, ScriptReferences};
pub use relay::{spawn_relay, PreviewEvent, PreviewEvents};
pub use state::{HostSnapshot, PreviewStatus};
pub use watcher::{ProjectWatcher, WatcherError, WatcherResult};
