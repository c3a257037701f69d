//! # Protocol Messages
//!
//! One variant per message kind, each with its own payload type.
//!
//! ## Wire shape
//!
//! ```text
//! { "type": "element-selected", "data": { "type": "span", "properties": {…}, "content": "…" } }
//! ```
//!
//! This is exactly what the sandbox runtime script hands to
//! `window.parent.postMessage({ type, data }, '*')`.
//!
//! ## Receipt
//!
//! Receivers go through [`decode`], which separates an unknown `type` from a
//! known `type` carrying a bad payload. Both are reported as errors and the
//! caller drops the message.

use crate::ProtocolError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Attribute or style name → value
pub type PropertyMap = BTreeMap<String, String>;

/// Messages exchanged between host and sandbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ProtocolMessage {
    /// sandbox → host: an element was clicked in selection mode
    ElementSelected(SelectedElement),

    /// sandbox → host: the body itself was clicked
    ElementDeselected(Deselected),

    /// host → sandbox: rewrite the currently selected element
    UpdateElement(ElementUpdate),

    /// sandbox → host: reply to `update-element`
    UpdateElementResult(UpdateResult),

    /// sandbox → host: a user script rewrites the project source
    UpdateEditorCode(EditorCodeUpdate),
}

/// Snapshot of a live sandbox node
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectedElement {
    /// Lower-case tag name
    #[serde(rename = "type")]
    pub tag: String,

    /// Every attribute on the node at selection time
    #[serde(default)]
    pub properties: PropertyMap,

    /// innerHTML at selection time
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deselected {}

/// Payload of `update-element`; absent fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<PropertyMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<PropertyMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub success: bool,
}

/// Payload of `update-editor-code`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditorCodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
}

/// Which way a message travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HostToSandbox,
    SandboxToHost,
}

const ELEMENT_SELECTED: &str = "element-selected";
const ELEMENT_DESELECTED: &str = "element-deselected";
const UPDATE_ELEMENT: &str = "update-element";
const UPDATE_ELEMENT_RESULT: &str = "update-element-result";
const UPDATE_EDITOR_CODE: &str = "update-editor-code";

impl ProtocolMessage {
    /// Wire name of this message
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolMessage::ElementSelected(_) => ELEMENT_SELECTED,
            ProtocolMessage::ElementDeselected(_) => ELEMENT_DESELECTED,
            ProtocolMessage::UpdateElement(_) => UPDATE_ELEMENT,
            ProtocolMessage::UpdateElementResult(_) => UPDATE_ELEMENT_RESULT,
            ProtocolMessage::UpdateEditorCode(_) => UPDATE_EDITOR_CODE,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            ProtocolMessage::UpdateElement(_) => Direction::HostToSandbox,
            _ => Direction::SandboxToHost,
        }
    }

    pub fn deselected() -> Self {
        ProtocolMessage::ElementDeselected(Deselected {})
    }

    pub fn update_succeeded() -> Self {
        ProtocolMessage::UpdateElementResult(UpdateResult { success: true })
    }

    /// Serialize to the `{type, data}` wire shape
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Decode and validate a raw message
pub fn decode(raw: &str) -> Result<ProtocolMessage, ProtocolError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    let kind = envelope.kind.ok_or(ProtocolError::MissingType)?;

    // `{}` payloads are often sent as a bare `{type}`
    let data = match envelope.data {
        Value::Null => Value::Object(Default::default()),
        data => data,
    };

    match kind.as_str() {
        ELEMENT_SELECTED => payload(ELEMENT_SELECTED, data).map(ProtocolMessage::ElementSelected),
        ELEMENT_DESELECTED => {
            payload(ELEMENT_DESELECTED, data).map(ProtocolMessage::ElementDeselected)
        }
        UPDATE_ELEMENT => payload(UPDATE_ELEMENT, data).map(ProtocolMessage::UpdateElement),
        UPDATE_ELEMENT_RESULT => {
            payload(UPDATE_ELEMENT_RESULT, data).map(ProtocolMessage::UpdateElementResult)
        }
        UPDATE_EDITOR_CODE => {
            payload(UPDATE_EDITOR_CODE, data).map(ProtocolMessage::UpdateEditorCode)
        }
        _ => Err(ProtocolError::UnknownType(kind)),
    }
}

fn payload<T: DeserializeOwned>(kind: &'static str, data: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(|source| ProtocolError::Malformed { kind, source })
}

/// Whether the sandbox intercepts pointer events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Pointer events pick elements instead of reaching the page
    #[default]
    Selection,
    /// The page behaves exactly as it would standalone
    Interaction,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMode::Selection => "selection",
            InteractionMode::Interaction => "interaction",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Selection => InteractionMode::Interaction,
            InteractionMode::Interaction => InteractionMode::Selection,
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionMode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selection" => Ok(InteractionMode::Selection),
            "interaction" => Ok(InteractionMode::Interaction),
            other => Err(ProtocolError::UnknownMode(other.to_string())),
        }
    }
}
