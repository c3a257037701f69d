use atelier_protocol::ProtocolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Node {0} is not an element")]
    NotAnElement(usize),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Sandbox task has stopped")]
    Stopped,
}
