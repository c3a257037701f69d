//! # Source Document
//!
//! The three text buffers of a project and their editing state.
//!
//! A SourceDocument can be:
//! - **Memory-backed**: temporary, for tests or embedded hosts
//! - **Directory-backed**: `index.html`, `style.css` and `script.js` in one
//!   folder, saved back in place
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Compose → Save
//!   ↓      ↓       ↓        ↓
//! Files  Buffers  Preview  Files
//! ```

use crate::edits::{EditResult, SourceEdit};
use crate::insertion::InsertionStrategy;
use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const HTML_FILE: &str = "index.html";
pub const CSS_FILE: &str = "style.css";
pub const JS_FILE: &str = "script.js";

/// Which buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Html,
    Css,
    JavaScript,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Html, SourceKind::Css, SourceKind::JavaScript];

    pub fn file_name(&self) -> &'static str {
        match self {
            SourceKind::Html => HTML_FILE,
            SourceKind::Css => CSS_FILE,
            SourceKind::JavaScript => JS_FILE,
        }
    }

    /// Buffer a project file belongs to, by file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.file_name() == name)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Html => f.write_str("html"),
            SourceKind::Css => f.write_str("css"),
            SourceKind::JavaScript => f.write_str("javascript"),
        }
    }
}

/// Raw text of the three buffers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBuffers {
    pub html: String,
    pub css: String,
    pub javascript: String,
}

impl SourceBuffers {
    pub fn new(
        html: impl Into<String>,
        css: impl Into<String>,
        javascript: impl Into<String>,
    ) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            javascript: javascript.into(),
        }
    }

    pub fn get(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Html => &self.html,
            SourceKind::Css => &self.css,
            SourceKind::JavaScript => &self.javascript,
        }
    }

    pub fn get_mut(&mut self, kind: SourceKind) -> &mut String {
        match kind {
            SourceKind::Html => &mut self.html,
            SourceKind::Css => &mut self.css,
            SourceKind::JavaScript => &mut self.javascript,
        }
    }
}

/// Backing storage strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStorage {
    /// In-memory only
    Memory,

    /// Project directory holding the three files
    Directory(PathBuf),
}

/// Editable project source
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Current version number (increments on each effective edit)
    pub version: u64,

    buffers: SourceBuffers,
    storage: DocumentStorage,
    dirty: bool,
}

impl SourceDocument {
    /// Create a memory-backed document
    pub fn from_buffers(buffers: SourceBuffers) -> Self {
        Self {
            version: 0,
            buffers,
            storage: DocumentStorage::Memory,
            dirty: false,
        }
    }

    /// Load a project directory; missing files read as empty buffers
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, EditorError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(EditorError::NotADirectory(root.display().to_string()));
        }

        let mut buffers = SourceBuffers::default();
        for kind in SourceKind::ALL {
            *buffers.get_mut(kind) = read_optional(&root.join(kind.file_name()))?;
        }

        Ok(Self {
            version: 0,
            buffers,
            storage: DocumentStorage::Directory(root),
            dirty: false,
        })
    }

    pub fn buffers(&self) -> &SourceBuffers {
        &self.buffers
    }

    pub fn html(&self) -> &str {
        &self.buffers.html
    }

    pub fn css(&self) -> &str {
        &self.buffers.css
    }

    pub fn javascript(&self) -> &str {
        &self.buffers.javascript
    }

    pub fn storage(&self) -> &DocumentStorage {
        &self.storage
    }

    /// Apply an edit
    ///
    /// The version only moves when the text actually changed.
    pub fn apply(
        &mut self,
        edit: &SourceEdit,
        strategy: &dyn InsertionStrategy,
    ) -> EditResult {
        let changed = edit.apply(&mut self.buffers, strategy);

        if changed {
            self.version += 1;
            self.dirty = true;
        }

        EditResult {
            version: self.version,
            changed,
        }
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Save buffers to disk (if directory-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        match &self.storage {
            DocumentStorage::Directory(root) => {
                for kind in SourceKind::ALL {
                    std::fs::write(root.join(kind.file_name()), self.buffers.get(kind))?;
                }
                self.dirty = false;
                tracing::info!(root = %root.display(), version = self.version, "saved project");
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }
}

fn read_optional(path: &Path) -> Result<String, EditorError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}
