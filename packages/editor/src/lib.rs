//! # Atelier Editor
//!
//! Host-side editing state for a live-preview project.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: html / css / js buffers           │
//! │  - Load/save a project directory            │
//! │  - Versioned, dirty-tracked edits           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: explicit host state                │
//! │  - Selected element (at most one)           │
//! │  - Interaction mode                         │
//! │  - Library insertion via InsertionStrategy  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ composer: buffers → sandbox document        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use atelier_editor::{EditSession, SourceBuffers, SourceDocument};
//!
//! let doc = SourceDocument::from_buffers(SourceBuffers::new("<div>A</div>", "", ""));
//! let mut session = EditSession::new(doc);
//!
//! let insertion = session.insert_element("p").unwrap();
//! assert!(insertion.edit.changed);
//!
//! // After the preview reloads, show the new element as selected
//! session.clear_for_reload();
//! session.set_selected_element(Some(insertion.preselection));
//! assert_eq!(session.selected_element().unwrap().tag, "p");
//! ```

mod document;
mod edits;
mod errors;
mod insertion;
pub mod library;
mod session;

pub use document::{
    DocumentStorage, SourceBuffers, SourceDocument, SourceKind, CSS_FILE, HTML_FILE, JS_FILE,
};
pub use edits::{EditResult, SourceEdit};
pub use errors::EditorError;
pub use insertion::{InsertionStrategy, LastDivInsertion};
pub use library::{ElementCategory, ElementDefinition};
pub use session::{EditSession, Insertion, SelectionPatch};
