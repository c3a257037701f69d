use atelier_composer::CssFramework;
use atelier_protocol::{InteractionMode, SelectedElement};
use serde::Serialize;

/// Outcome of the last composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PreviewStatus {
    /// Nothing composed yet
    Idle,
    /// Document for this source version is in the frame
    Loaded { version: u64, timestamp: i64 },
    /// Composition failed; the frame keeps its previous document
    Failed { message: String, timestamp: i64 },
}

impl PreviewStatus {
    pub fn loaded(version: u64) -> Self {
        PreviewStatus::Loaded {
            version,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        PreviewStatus::Failed {
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PreviewStatus::Failed { .. })
    }

    /// Error text for the inline error with its retry action
    pub fn error(&self) -> Option<&str> {
        match self {
            PreviewStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Host state as seen from outside the actor
#[derive(Debug, Clone, Serialize)]
pub struct HostSnapshot {
    pub version: u64,
    pub dirty: bool,
    pub mode: InteractionMode,
    pub framework: CssFramework,
    pub status: PreviewStatus,
    pub selection: Option<SelectedElement>,
    /// Documents sent to the frame so far
    pub loads: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(PreviewStatus::failed("boom")).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["message"], "boom");

        assert_eq!(
            serde_json::to_value(PreviewStatus::Idle).unwrap(),
            serde_json::json!({ "state": "idle" })
        );
    }

    #[test]
    fn test_error_text() {
        assert_eq!(PreviewStatus::failed("bad").error(), Some("bad"));
        assert_eq!(PreviewStatus::loaded(3).error(), None);
        assert!(!PreviewStatus::Idle.is_failed());
    }
}
