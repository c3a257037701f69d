//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document is not file-backed")]
    NotFileBacked,

    #[error("Unknown library element: {0}")]
    UnknownElement(String),

    #[error("Not a project directory: {0}")]
    NotADirectory(String),
}
