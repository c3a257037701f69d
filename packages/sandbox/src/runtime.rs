//! # Sandbox Runtime
//!
//! Native model of the runtime script embedded in every composed document.
//!
//! Listeners are attached once, when a document loads, and only in
//! selection mode. Events bubble from their target to the nearest element
//! that has a listener; an element created later (for example through
//! `update-element` content) has none of its own.
//!
//! ## Markers
//!
//! - `element-highlight`: at most one element, the last one hovered
//! - `element-selected`: at most one element, the last one clicked

use crate::dom::{Dom, NodeId};
use crate::parser::{parse_html, set_inner_html};
use crate::SandboxError;
use atelier_protocol::{
    EditorCodeUpdate, ElementUpdate, InteractionMode, ProtocolMessage, SelectedElement,
};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

pub const HIGHLIGHT_CLASS: &str = "element-highlight";
pub const SELECTED_CLASS: &str = "element-selected";

/// Attributes that survive an `update-element` attribute rewrite
const PRESERVED_ATTRIBUTES: [&str; 2] = ["id", "class"];

fn mode_literal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"const interactionMode = "([A-Za-z]+)";"#)
            .expect("interaction mode pattern is a valid regex")
    })
}

/// How a pointer event picks its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    /// Element with this `id` attribute
    Id(String),
    /// N-th element with this tag, in document order
    Tag { tag: String, index: usize },
    Body,
}

impl Target {
    pub fn tag(tag: impl Into<String>) -> Self {
        Target::Tag {
            tag: tag.into(),
            index: 0,
        }
    }

    pub fn id(id: impl Into<String>) -> Self {
        Target::Id(id.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Over,
    Out,
    Click,
}

/// Live document state inside the sandbox
#[derive(Debug, Default)]
pub struct SandboxRuntime {
    dom: Dom,
    /// Mode literal found in the loaded document; `None` without a runtime
    mode: Option<InteractionMode>,
    listening: BTreeSet<NodeId>,
    body_listener: bool,
    selected: Option<NodeId>,
}

impl SandboxRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole document; every transient state is lost
    pub fn load(&mut self, document: &str) -> Result<(), SandboxError> {
        let dom = parse_html(document)?;

        // The runtime script comes after user code, so its literal is the last one
        let mode = mode_literal()
            .captures_iter(document)
            .last()
            .and_then(|caps| caps[1].parse::<InteractionMode>().ok());

        let (listening, body_listener) = match (mode, dom.body()) {
            (Some(InteractionMode::Selection), Some(body)) => {
                (dom.element_descendants(body).into_iter().collect(), true)
            }
            _ => (BTreeSet::new(), false),
        };

        tracing::info!(
            mode = mode.map(|m| m.as_str()).unwrap_or("none"),
            listeners = listening.len(),
            "sandbox document loaded"
        );

        self.dom = dom;
        self.mode = mode;
        self.listening = listening;
        self.body_listener = body_listener;
        self.selected = None;
        Ok(())
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn mode(&self) -> Option<InteractionMode> {
        self.mode
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn has_listener(&self, node: NodeId) -> bool {
        self.listening.contains(&node)
    }

    /// Attached elements carrying `class`
    pub fn marked(&self, class: &str) -> Vec<NodeId> {
        self.dom.with_class(class)
    }

    pub fn resolve(&self, target: &Target) -> Option<NodeId> {
        match target {
            Target::Node(node) => self.dom.element(*node).map(|_| *node),
            Target::Id(id) => self.dom.get_element_by_id(id),
            Target::Tag { tag, index } => self.dom.find_tag(tag).get(*index).copied(),
            Target::Body => self.dom.body(),
        }
    }

    /// Dispatch a pointer event; returns the message the script would post
    pub fn dispatch(&mut self, kind: PointerKind, target: NodeId) -> Option<ProtocolMessage> {
        match kind {
            PointerKind::Over => {
                self.pointer_over(target);
                None
            }
            PointerKind::Out => {
                self.pointer_out(target);
                None
            }
            PointerKind::Click => self.click(target),
        }
    }

    /// First listening element on the bubble path
    fn handler_for(&self, target: NodeId) -> Option<NodeId> {
        self.dom
            .ancestors_inclusive(target)
            .find(|node| self.listening.contains(node))
    }

    pub fn pointer_over(&mut self, target: NodeId) {
        // The handler stops propagation, so only the innermost one runs
        let Some(handler) = self.handler_for(target) else {
            return;
        };

        for node in self.marked(HIGHLIGHT_CLASS) {
            if let Some(el) = self.dom.element_mut(node) {
                el.remove_class(HIGHLIGHT_CLASS);
            }
        }
        if let Some(el) = self.dom.element_mut(handler) {
            el.add_class(HIGHLIGHT_CLASS);
        }
    }

    pub fn pointer_out(&mut self, target: NodeId) {
        // mouseout is not stopped: every listening element on the path runs
        let path: Vec<NodeId> = self
            .dom
            .ancestors_inclusive(target)
            .filter(|node| self.listening.contains(node))
            .collect();

        for node in path {
            if let Some(el) = self.dom.element_mut(node) {
                el.remove_class(HIGHLIGHT_CLASS);
            }
        }
    }

    pub fn click(&mut self, target: NodeId) -> Option<ProtocolMessage> {
        if let Some(handler) = self.handler_for(target) {
            return Some(self.select(handler));
        }

        if self.body_listener && Some(target) == self.dom.body() {
            self.clear_selected_marker();
            self.selected = None;
            tracing::debug!("body clicked, selection cleared");
            return Some(ProtocolMessage::deselected());
        }

        None
    }

    fn clear_selected_marker(&mut self) {
        for node in self.marked(SELECTED_CLASS) {
            if let Some(el) = self.dom.element_mut(node) {
                el.remove_class(SELECTED_CLASS);
            }
        }
    }

    fn select(&mut self, node: NodeId) -> ProtocolMessage {
        self.clear_selected_marker();
        if let Some(el) = self.dom.element_mut(node) {
            el.add_class(SELECTED_CLASS);
        }
        self.selected = Some(node);

        // Attributes are read after marking, so `class` carries the markers
        let (tag, properties) = match self.dom.element(node) {
            Some(el) => (
                el.tag.to_ascii_lowercase(),
                el.attributes.iter().cloned().collect(),
            ),
            None => (String::new(), Default::default()),
        };

        ProtocolMessage::ElementSelected(SelectedElement {
            tag,
            properties,
            content: self.dom.inner_html(node),
        })
    }

    /// Handle a message posted into the sandbox
    pub fn receive(&mut self, message: &ProtocolMessage) -> Result<Option<ProtocolMessage>, SandboxError> {
        match message {
            ProtocolMessage::UpdateElement(update) => self.update_element(update),
            other => {
                tracing::debug!(kind = other.kind(), "sandbox ignores message");
                Ok(None)
            }
        }
    }

    fn update_element(&mut self, update: &ElementUpdate) -> Result<Option<ProtocolMessage>, SandboxError> {
        let Some(selected) = self.selected else {
            tracing::debug!("update-element without a selection ignored");
            return Ok(None);
        };

        if let Some(el) = self.dom.element_mut(selected) {
            if let Some(attributes) = &update.attributes {
                el.attributes
                    .retain(|(name, _)| PRESERVED_ATTRIBUTES.contains(&name.as_str()));
                for (name, value) in attributes {
                    el.set_attribute(name, value);
                }
            }

            if let Some(styles) = &update.styles {
                for (property, value) in styles {
                    el.set_style_property(property, value);
                }
            }
        }

        if let Some(content) = &update.content {
            set_inner_html(&mut self.dom, selected, content)?;
        }

        Ok(Some(ProtocolMessage::update_succeeded()))
    }

    /// A user script asking the host to rewrite its own source
    pub fn script_post(&self, update: EditorCodeUpdate) -> ProtocolMessage {
        ProtocolMessage::UpdateEditorCode(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(body: &str, mode: &str) -> SandboxRuntime {
        let document = format!(
            "<!DOCTYPE html><html><head></head><body>{body}<script>const interactionMode = \"{mode}\";</script></body></html>"
        );
        let mut runtime = SandboxRuntime::new();
        runtime.load(&document).unwrap();
        runtime
    }

    #[test]
    fn test_mode_is_read_from_document() {
        assert_eq!(loaded("", "selection").mode(), Some(InteractionMode::Selection));
        assert_eq!(loaded("", "interaction").mode(), Some(InteractionMode::Interaction));

        let mut bare = SandboxRuntime::new();
        bare.load("<p>no runtime</p>").unwrap();
        assert_eq!(bare.mode(), None);
    }

    #[test]
    fn test_user_script_literal_does_not_override_mode() {
        use atelier_composer::{compose, ComposeOptions};
        use atelier_editor::SourceBuffers;

        let buffers = SourceBuffers::new(
            "<h1 id=\"t\">Hi</h1>",
            "",
            "const interactionMode = \"interaction\";",
        );
        let document =
            compose(&buffers, InteractionMode::Selection, &ComposeOptions::default()).unwrap();

        let mut runtime = SandboxRuntime::new();
        runtime.load(&document).unwrap();
        assert_eq!(runtime.mode(), Some(InteractionMode::Selection));

        let heading = runtime.resolve(&Target::id("t")).unwrap();
        assert!(runtime.has_listener(heading));
    }

    #[test]
    fn test_interaction_mode_installs_no_listeners() {
        let mut runtime = loaded("<button id=\"b\">x</button>", "interaction");
        let button = runtime.resolve(&Target::id("b")).unwrap();

        assert!(!runtime.has_listener(button));
        assert_eq!(runtime.click(button), None);
        runtime.pointer_over(button);
        assert!(runtime.marked(HIGHLIGHT_CLASS).is_empty());
    }

    #[test]
    fn test_click_bubbles_to_listening_ancestor() {
        let mut runtime = loaded("<div id=\"card\"><em>x</em></div>", "selection");
        let card = runtime.resolve(&Target::id("card")).unwrap();

        // Content created after load has no listener of its own
        runtime.selected = Some(card);
        runtime
            .update_element(&ElementUpdate {
                content: Some("<b>new</b>".to_string()),
                ..Default::default()
            })
            .unwrap();
        let bold = runtime.resolve(&Target::tag("b")).unwrap();
        assert!(!runtime.has_listener(bold));

        match runtime.click(bold) {
            Some(ProtocolMessage::ElementSelected(el)) => assert_eq!(el.tag, "div"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(runtime.selected(), Some(card));
    }

    #[test]
    fn test_pointer_out_clears_bubble_path() {
        let mut runtime = loaded("<div id=\"outer\"><p id=\"inner\">x</p></div>", "selection");
        let inner = runtime.resolve(&Target::id("inner")).unwrap();

        runtime.pointer_over(inner);
        assert_eq!(runtime.marked(HIGHLIGHT_CLASS), vec![inner]);

        runtime.pointer_out(inner);
        assert!(runtime.marked(HIGHLIGHT_CLASS).is_empty());
    }

    #[test]
    fn test_click_outside_body_does_nothing() {
        let mut runtime = loaded("<p>x</p>", "selection");
        let html = runtime.resolve(&Target::tag("html")).unwrap();
        assert_eq!(runtime.click(html), None);
    }

    #[test]
    fn test_update_without_selection_has_no_reply() {
        let mut runtime = loaded("<p>x</p>", "selection");
        let reply = runtime
            .receive(&ProtocolMessage::UpdateElement(ElementUpdate::default()))
            .unwrap();
        assert_eq!(reply, None);
    }

    #[test]
    fn test_load_clears_selection() {
        let mut runtime = loaded("<p>x</p>", "selection");
        let p = runtime.resolve(&Target::tag("p")).unwrap();
        runtime.click(p);
        assert!(runtime.selected().is_some());

        runtime
            .load("<body><p>y</p><script>const interactionMode = \"selection\";</script></body>")
            .unwrap();
        assert_eq!(runtime.selected(), None);
        assert!(runtime.marked(SELECTED_CLASS).is_empty());
    }
}
