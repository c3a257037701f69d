//! # Edit Session
//!
//! Host-side state for one open project: the source buffers, the current
//! interaction mode, and the selected element.
//!
//! The session is an explicit state object owned by the host. Nothing about
//! it is global and nothing in it is shared with the sandbox.
//!
//! ## Selection
//!
//! At most one element is selected. The selection lives from an
//! `element-selected` message until `element-deselected`, a new selection,
//! or a preview reload.

use crate::document::SourceDocument;
use crate::edits::{EditResult, SourceEdit};
use crate::insertion::{InsertionStrategy, LastDivInsertion};
use crate::library;
use crate::EditorError;
use atelier_protocol::{InteractionMode, PropertyMap, SelectedElement};

/// Partial update of the selected element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionPatch {
    /// Merged key by key into the existing properties
    pub properties: PropertyMap,

    /// Replaces the content only when present
    pub content: Option<String>,
}

/// Result of inserting a library element
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    pub edit: EditResult,

    /// Selection to apply once the preview has reloaded
    pub preselection: SelectedElement,
}

pub struct EditSession {
    document: SourceDocument,
    selection: Option<SelectedElement>,
    mode: InteractionMode,
    strategy: Box<dyn InsertionStrategy>,
}

impl EditSession {
    pub fn new(document: SourceDocument) -> Self {
        Self::with_strategy(document, Box::new(LastDivInsertion))
    }

    pub fn with_strategy(document: SourceDocument, strategy: Box<dyn InsertionStrategy>) -> Self {
        Self {
            document,
            selection: None,
            mode: InteractionMode::default(),
            strategy,
        }
    }

    pub fn document(&self) -> &SourceDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut SourceDocument {
        &mut self.document
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Returns true if the mode changed
    pub fn set_mode(&mut self, mode: InteractionMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn selected_element(&self) -> Option<&SelectedElement> {
        self.selection.as_ref()
    }

    /// Replace the selection wholesale
    pub fn set_selected_element(&mut self, element: Option<SelectedElement>) {
        match &element {
            Some(el) => tracing::debug!(tag = %el.tag, "element selected"),
            None => tracing::debug!("selection cleared"),
        }
        self.selection = element;
    }

    /// Shallow-merge a patch into the selection
    ///
    /// Properties not named by the patch survive. Without a selection this
    /// does nothing and returns false.
    pub fn update_selected_element(&mut self, patch: SelectionPatch) -> bool {
        let Some(selected) = self.selection.as_mut() else {
            tracing::debug!("no selection to update");
            return false;
        };

        selected.properties.extend(patch.properties);
        if let Some(content) = patch.content {
            selected.content = content;
        }
        true
    }

    /// Apply a source edit through the session's insertion strategy
    pub fn apply_edit(&mut self, edit: &SourceEdit) -> EditResult {
        self.document.apply(edit, self.strategy.as_ref())
    }

    /// Splice a library element into the HTML buffer
    ///
    /// The caller reloads the preview (which clears the selection) and then
    /// applies the returned pre-selection.
    pub fn insert_element(&mut self, tag: &str) -> Result<Insertion, EditorError> {
        let definition =
            library::find(tag).ok_or_else(|| EditorError::UnknownElement(tag.to_string()))?;

        let edit = self.apply_edit(&SourceEdit::InsertElement {
            markup: definition.markup(),
        });

        Ok(Insertion {
            edit,
            preselection: definition.preselection(),
        })
    }

    /// A full reload drops the sandbox DOM, so the selection goes with it
    pub fn clear_for_reload(&mut self) {
        if self.selection.take().is_some() {
            tracing::debug!("selection cleared by reload");
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}
