//! Sandbox as an independent task.
//!
//! The task owns a [`SandboxRuntime`] and talks to the host only through
//! its [`FrameLink`]. Pointer input comes from a separate handle, standing
//! in for the user's mouse.

use crate::runtime::{PointerKind, SandboxRuntime, Target, HIGHLIGHT_CLASS, SELECTED_CLASS};
use crate::SandboxError;
use atelier_protocol::{decode, Direction, EditorCodeUpdate, FrameCommand, FrameLink, InteractionMode};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum SandboxRequest {
    Pointer { kind: PointerKind, target: Target },
    ScriptPost(EditorCodeUpdate),
    Snapshot(oneshot::Sender<SandboxSnapshot>),
}

/// Observable sandbox state at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxSnapshot {
    pub mode: Option<InteractionMode>,
    /// Documents loaded since the task started
    pub loads: u64,
    /// Outer HTML of the selected element
    pub selected: Option<String>,
    pub selected_markers: usize,
    pub highlight_markers: usize,
    pub body_html: String,
}

/// Input side of a running sandbox
#[derive(Clone)]
pub struct SandboxHandle {
    requests: mpsc::UnboundedSender<SandboxRequest>,
}

impl SandboxHandle {
    fn send(&self, request: SandboxRequest) -> Result<(), SandboxError> {
        self.requests.send(request).map_err(|_| SandboxError::Stopped)
    }

    pub fn hover(&self, target: Target) -> Result<(), SandboxError> {
        self.send(SandboxRequest::Pointer {
            kind: PointerKind::Over,
            target,
        })
    }

    pub fn leave(&self, target: Target) -> Result<(), SandboxError> {
        self.send(SandboxRequest::Pointer {
            kind: PointerKind::Out,
            target,
        })
    }

    pub fn click(&self, target: Target) -> Result<(), SandboxError> {
        self.send(SandboxRequest::Pointer {
            kind: PointerKind::Click,
            target,
        })
    }

    /// Simulate user code posting `update-editor-code`
    pub fn script_post(&self, update: EditorCodeUpdate) -> Result<(), SandboxError> {
        self.send(SandboxRequest::ScriptPost(update))
    }

    /// Resolves after every earlier request and frame command is handled
    pub async fn snapshot(&self) -> Result<SandboxSnapshot, SandboxError> {
        let (tx, rx) = oneshot::channel();
        self.send(SandboxRequest::Snapshot(tx))?;
        rx.await.map_err(|_| SandboxError::Stopped)
    }
}

/// Spawn the sandbox task on the current runtime
///
/// The task ends when the host end of the link is dropped.
pub fn spawn_sandbox(frame: FrameLink) -> (SandboxHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(frame, rx));
    (SandboxHandle { requests: tx }, task)
}

async fn run(mut frame: FrameLink, mut requests: mpsc::UnboundedReceiver<SandboxRequest>) {
    let mut runtime = SandboxRuntime::new();
    let mut loads = 0u64;
    let mut input_open = true;

    loop {
        tokio::select! {
            // Frame commands first, so a load queued before a request is seen by it
            biased;

            command = frame.next_command() => {
                let Some(command) = command else {
                    tracing::debug!("host link closed, sandbox stopping");
                    break;
                };
                match command {
                    FrameCommand::Load(document) => match runtime.load(&document) {
                        Ok(()) => loads += 1,
                        Err(e) => tracing::error!("Failed to load sandbox document: {}", e),
                    },
                    FrameCommand::Post(raw) => {
                        if let Err(e) = handle_post(&mut runtime, &frame, &raw) {
                            tracing::warn!("Dropped host message: {}", e);
                        }
                    }
                }
            }

            request = requests.recv(), if input_open => {
                let Some(request) = request else {
                    // No more pointer input; keep serving the host
                    input_open = false;
                    continue;
                };
                match request {
                    SandboxRequest::Pointer { kind, target } => {
                        let Some(node) = runtime.resolve(&target) else {
                            tracing::debug!(?target, "pointer target not found");
                            continue;
                        };
                        if let Some(message) = runtime.dispatch(kind, node) {
                            if frame.post(&message).is_err() {
                                break;
                            }
                        }
                    }
                    SandboxRequest::ScriptPost(update) => {
                        if frame.post(&runtime.script_post(update)).is_err() {
                            break;
                        }
                    }
                    SandboxRequest::Snapshot(reply) => {
                        let _ = reply.send(snapshot(&runtime, loads));
                    }
                }
            }
        }
    }
}

fn handle_post(
    runtime: &mut SandboxRuntime,
    frame: &FrameLink,
    raw: &str,
) -> Result<(), SandboxError> {
    let message = decode(raw)?;
    if message.direction() != Direction::HostToSandbox {
        tracing::debug!(kind = message.kind(), "sandbox ignores host-bound message");
        return Ok(());
    }

    if let Some(reply) = runtime.receive(&message)? {
        frame.post(&reply)?;
    }
    Ok(())
}

fn snapshot(runtime: &SandboxRuntime, loads: u64) -> SandboxSnapshot {
    let dom = runtime.dom();
    SandboxSnapshot {
        mode: runtime.mode(),
        loads,
        selected: runtime.selected().map(|node| dom.outer_html(node)),
        selected_markers: runtime.marked(SELECTED_CLASS).len(),
        highlight_markers: runtime.marked(HIGHLIGHT_CLASS).len(),
        body_html: dom.body().map(|body| dom.inner_html(body)).unwrap_or_default(),
    }
}
