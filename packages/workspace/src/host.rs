//! # Preview Host
//!
//! Single owner of the edit session. Runs as one task and serializes every
//! state change: commands from the editor side, and protocol messages from
//! the sandbox.
//!
//! ```text
//!  HostHandle ──HostCommand──▶ ┌──────────────┐ ──Load/Post──▶ sandbox
//!                              │ PreviewHost  │
//!  sandbox ──raw JSON────────▶ │ EditSession  │
//!                              └──────────────┘
//! ```
//!
//! Every effective edit recomposes and reloads the frame. There is no
//! debounce; a newer load simply replaces the previous one.

use crate::inspector::{inspect, Inspection};
use crate::state::{HostSnapshot, PreviewStatus};
use atelier_composer::{compose, ComposeError, ComposeOptions, CssFramework};
use atelier_editor::{
    EditResult, EditSession, EditorError, SelectionPatch, SourceEdit, SourceKind,
};
use atelier_protocol::{
    EditorCodeUpdate, ElementUpdate, HostLink, InteractionMode, ProtocolError, ProtocolMessage,
    SelectedElement,
};
use atelier_styles::TextualMatcher;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Composition failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Preview host has stopped")]
    Stopped,
}

pub type HostResult<T> = Result<T, HostError>;

enum HostCommand {
    Edit(SourceEdit, oneshot::Sender<EditResult>),
    ReplaceFromDisk(SourceKind, String, oneshot::Sender<EditResult>),
    SetMode(InteractionMode, oneshot::Sender<PreviewStatus>),
    SetFramework(CssFramework, oneshot::Sender<PreviewStatus>),
    InsertElement(String, oneshot::Sender<HostResult<SelectedElement>>),
    UpdateSelection(SelectionPatch, oneshot::Sender<bool>),
    SendElementUpdate(ElementUpdate, oneshot::Sender<HostResult<()>>),
    Refresh(oneshot::Sender<PreviewStatus>),
    Save(oneshot::Sender<HostResult<()>>),
    Snapshot(oneshot::Sender<HostSnapshot>),
    Inspect(oneshot::Sender<Option<Inspection>>),
}

/// Cloneable front end of a running [`PreviewHost`]
#[derive(Clone)]
pub struct HostHandle {
    commands: mpsc::UnboundedSender<HostCommand>,
    status: watch::Receiver<PreviewStatus>,
}

macro_rules! request {
    ($handle:expr, $variant:ident $(, $arg:expr)*) => {{
        let (tx, rx) = oneshot::channel();
        $handle
            .commands
            .send(HostCommand::$variant($($arg,)* tx))
            .map_err(|_| HostError::Stopped)?;
        rx.await.map_err(|_| HostError::Stopped)
    }};
}

impl HostHandle {
    pub async fn edit(&self, edit: SourceEdit) -> HostResult<EditResult> {
        request!(self, Edit, edit)
    }

    /// A project file changed on disk
    pub async fn replace_from_disk(&self, kind: SourceKind, text: String) -> HostResult<EditResult> {
        request!(self, ReplaceFromDisk, kind, text)
    }

    pub async fn set_mode(&self, mode: InteractionMode) -> HostResult<PreviewStatus> {
        request!(self, SetMode, mode)
    }

    pub async fn set_framework(&self, framework: CssFramework) -> HostResult<PreviewStatus> {
        request!(self, SetFramework, framework)
    }

    /// Insert a library element; returns the pre-selection now in effect
    pub async fn insert_element(&self, tag: impl Into<String>) -> HostResult<SelectedElement> {
        request!(self, InsertElement, tag.into())?
    }

    pub async fn update_selection(&self, patch: SelectionPatch) -> HostResult<bool> {
        request!(self, UpdateSelection, patch)
    }

    /// Push an `update-element` to the sandbox
    ///
    /// Part of the protocol surface only: the inspector is read-only and
    /// never calls this.
    pub async fn send_element_update(&self, update: ElementUpdate) -> HostResult<()> {
        request!(self, SendElementUpdate, update)?
    }

    /// Recompose and reload; doubles as the retry action after a failure
    pub async fn refresh(&self) -> HostResult<PreviewStatus> {
        request!(self, Refresh)
    }

    pub async fn save(&self) -> HostResult<()> {
        request!(self, Save)?
    }

    /// Resolves after every message the sandbox posted before this call
    pub async fn snapshot(&self) -> HostResult<HostSnapshot> {
        request!(self, Snapshot)
    }

    pub async fn inspect(&self) -> HostResult<Option<Inspection>> {
        request!(self, Inspect)
    }

    /// Every status change, including failed recompositions nobody asked for
    ///
    /// The receiver starts at the status in effect when the host was spawned.
    pub fn status_updates(&self) -> watch::Receiver<PreviewStatus> {
        self.status.clone()
    }
}

pub struct PreviewHost {
    session: EditSession,
    link: HostLink,
    options: ComposeOptions,
    status: watch::Sender<PreviewStatus>,
    loads: u64,
}

impl PreviewHost {
    pub fn new(session: EditSession, link: HostLink, options: ComposeOptions) -> Self {
        Self {
            session,
            link,
            options,
            status: watch::channel(PreviewStatus::Idle).0,
            loads: 0,
        }
    }

    /// Load the first document, then spawn the host task
    ///
    /// The first `Load` is on the link before this returns, so input sent
    /// to the frame afterwards always lands on a document.
    pub fn spawn(mut self) -> (HostHandle, JoinHandle<()>) {
        self.reload();

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = HostHandle {
            commands: tx,
            status: self.status.subscribe(),
        };
        let task = tokio::spawn(self.run(rx));
        (handle, task)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<HostCommand>) {
        let mut frame_open = true;

        loop {
            tokio::select! {
                // Sandbox traffic first, so a snapshot sees everything already posted
                biased;

                inbound = self.link.recv(), if frame_open => match inbound {
                    Some(Ok(message)) => self.handle_message(message),
                    Some(Err(e)) => tracing::debug!("Dropped sandbox message: {}", e),
                    None => {
                        tracing::info!("sandbox side closed");
                        frame_open = false;
                    }
                },

                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
            }
        }

        tracing::debug!("preview host stopped");
    }

    fn handle_message(&mut self, message: ProtocolMessage) {
        match message {
            ProtocolMessage::ElementSelected(element) => {
                self.session.set_selected_element(Some(element));
            }
            ProtocolMessage::ElementDeselected(_) => {
                self.session.set_selected_element(None);
            }
            ProtocolMessage::UpdateElementResult(result) => {
                tracing::debug!(success = result.success, "sandbox applied element update");
            }
            ProtocolMessage::UpdateEditorCode(update) => self.apply_editor_code(&update),
            ProtocolMessage::UpdateElement(_) => {
                tracing::warn!("update-element arrived from the sandbox, ignoring");
            }
        }
    }

    /// User code in the preview rewrote its own source
    fn apply_editor_code(&mut self, update: &EditorCodeUpdate) {
        let edits = SourceEdit::from_editor_code(update);
        if edits.is_empty() {
            tracing::debug!("update-editor-code carried no fields");
            return;
        }

        for edit in &edits {
            self.session.apply_edit(edit);
        }
        self.session.document_mut().mark_dirty();
        tracing::info!(buffers = edits.len(), "source rewritten by preview script");
        self.reload();
    }

    fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::Edit(edit, reply) => {
                let _ = reply.send(self.apply_and_reload(&edit));
            }
            HostCommand::ReplaceFromDisk(kind, text, reply) => {
                let result = self.apply_and_reload(&SourceEdit::Replace { kind, text });
                let _ = reply.send(result);
            }
            HostCommand::SetMode(mode, reply) => {
                if self.session.set_mode(mode) {
                    self.reload();
                }
                let _ = reply.send(self.current_status());
            }
            HostCommand::SetFramework(framework, reply) => {
                if self.options.framework != framework {
                    self.options.framework = framework;
                    self.reload();
                }
                let _ = reply.send(self.current_status());
            }
            HostCommand::InsertElement(tag, reply) => {
                let _ = reply.send(self.insert_element(&tag));
            }
            HostCommand::UpdateSelection(patch, reply) => {
                let _ = reply.send(self.session.update_selected_element(patch));
            }
            HostCommand::SendElementUpdate(update, reply) => {
                let result = self
                    .link
                    .post(&ProtocolMessage::UpdateElement(update))
                    .map_err(HostError::from);
                let _ = reply.send(result);
            }
            HostCommand::Refresh(reply) => {
                self.reload();
                let _ = reply.send(self.current_status());
            }
            HostCommand::Save(reply) => {
                let result = self.session.document_mut().save().map_err(HostError::from);
                let _ = reply.send(result);
            }
            HostCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            HostCommand::Inspect(reply) => {
                let document = self.session.document();
                let inspection = self.session.selected_element().map(|element| {
                    inspect(element, document.css(), document.javascript(), &TextualMatcher)
                });
                let _ = reply.send(inspection);
            }
        }
    }

    fn apply_and_reload(&mut self, edit: &SourceEdit) -> EditResult {
        let result = self.session.apply_edit(edit);
        if result.changed {
            self.reload();
        }
        result
    }

    fn insert_element(&mut self, tag: &str) -> HostResult<SelectedElement> {
        let insertion = self.session.insert_element(tag)?;
        self.reload();
        // The reload cleared the selection; the new element takes its place
        self.session
            .set_selected_element(Some(insertion.preselection.clone()));
        Ok(insertion.preselection)
    }

    /// Compose and load the current source
    ///
    /// A failure is kept as the status and leaves the frame untouched.
    fn reload(&mut self) {
        let document = self.session.document();
        let composed = compose(document.buffers(), self.session.mode(), &self.options);

        match composed {
            Ok(html) => {
                let version = document.version;
                if let Err(e) = self.link.load(html) {
                    tracing::error!("Failed to load preview: {}", e);
                    self.set_status(PreviewStatus::failed(e.to_string()));
                    return;
                }
                self.session.clear_for_reload();
                self.loads += 1;
                self.set_status(PreviewStatus::loaded(version));
                tracing::info!(version, mode = %self.session.mode(), "preview reloaded");
            }
            Err(e) => {
                tracing::error!("Failed to compose preview: {}", e);
                self.set_status(PreviewStatus::failed(e.to_string()));
            }
        }
    }

    fn set_status(&self, status: PreviewStatus) {
        self.status.send_replace(status);
    }

    fn current_status(&self) -> PreviewStatus {
        self.status.borrow().clone()
    }

    fn snapshot(&self) -> HostSnapshot {
        let document = self.session.document();
        HostSnapshot {
            version: document.version,
            dirty: document.is_dirty(),
            mode: self.session.mode(),
            framework: self.options.framework,
            status: self.current_status(),
            selection: self.session.selected_element().cloned(),
            loads: self.loads,
        }
    }
}
