//! # Source Edits
//!
//! Text-level operations on the project buffers.
//!
//! ## Edit Semantics
//!
//! ### Replace
//! - Atomic replacement of a whole buffer (not a character diff)
//! - Last write wins
//!
//! ### InsertElement
//! - Splices library markup into the HTML buffer through an
//!   [`InsertionStrategy`]; no structural validation

use crate::document::{SourceBuffers, SourceKind};
use crate::insertion::InsertionStrategy;
use atelier_protocol::EditorCodeUpdate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SourceEdit {
    /// Replace one buffer wholesale
    Replace { kind: SourceKind, text: String },

    /// Splice markup into the HTML buffer
    InsertElement { markup: String },
}

/// Outcome of applying an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditResult {
    pub version: u64,
    pub changed: bool,
}

impl SourceEdit {
    /// Apply to the buffers; returns whether any text changed
    pub fn apply(&self, buffers: &mut SourceBuffers, strategy: &dyn InsertionStrategy) -> bool {
        match self {
            SourceEdit::Replace { kind, text } => {
                let buffer = buffers.get_mut(*kind);
                if buffer == text {
                    return false;
                }
                *buffer = text.clone();
                true
            }

            SourceEdit::InsertElement { markup } => {
                let updated = strategy.insert(&buffers.html, markup);
                tracing::debug!(strategy = strategy.name(), "inserted element markup");
                if updated == buffers.html {
                    return false;
                }
                buffers.html = updated;
                true
            }
        }
    }

    /// Edits requested by a sandbox script through `update-editor-code`
    ///
    /// Empty strings are treated like absent fields, so a script cannot
    /// blank a buffer this way.
    pub fn from_editor_code(update: &EditorCodeUpdate) -> Vec<SourceEdit> {
        [
            (SourceKind::Html, &update.html),
            (SourceKind::Css, &update.css),
            (SourceKind::JavaScript, &update.js),
        ]
        .into_iter()
        .filter_map(|(kind, text)| match text {
            Some(text) if !text.is_empty() => Some(SourceEdit::Replace {
                kind,
                text: text.clone(),
            }),
            _ => None,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insertion::LastDivInsertion;

    #[test]
    fn test_replace_buffer() {
        let mut buffers = SourceBuffers::new("<p>A</p>", "", "");
        let edit = SourceEdit::Replace {
            kind: SourceKind::JavaScript,
            text: "console.log(1)".to_string(),
        };

        assert!(edit.apply(&mut buffers, &LastDivInsertion));
        assert_eq!(buffers.javascript, "console.log(1)");
        assert_eq!(buffers.html, "<p>A</p>");
    }

    #[test]
    fn test_insert_element_uses_strategy() {
        let mut buffers = SourceBuffers::new("<div>A</div>", "", "");
        let edit = SourceEdit::InsertElement {
            markup: "<p>B</p>".to_string(),
        };

        assert!(edit.apply(&mut buffers, &LastDivInsertion));
        assert_eq!(buffers.html, "<div>A  <p>B</p>\n</div>");
    }

    #[test]
    fn test_editor_code_skips_empty_and_absent_fields() {
        let update = EditorCodeUpdate {
            html: Some("<main></main>".to_string()),
            css: Some(String::new()),
            js: None,
        };

        let edits = SourceEdit::from_editor_code(&update);
        assert_eq!(
            edits,
            vec![SourceEdit::Replace {
                kind: SourceKind::Html,
                text: "<main></main>".to_string(),
            }]
        );
    }
}
