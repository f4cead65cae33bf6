//! Code review actions
//!
//! Host-invokable entry points wrapping the thread resolver, the dialogue
//! engine and persona validation.

mod auto_reply;
mod cleanup_orphans;
mod validate_personality;

pub use auto_reply::AutoReplyAction;
pub use cleanup_orphans::CleanupOrphansAction;
pub use validate_personality::ValidatePersonalityAction;

use serde::Serialize;
use serde_json::Value;

/// Action result structure
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    /// Whether the action succeeded
    pub success: bool,
    /// Response text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Structured payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ActionResult {
    pub(crate) fn ok(text: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
            data,
        }
    }

    pub(crate) fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error.into()),
            data: None,
        }
    }
}

/// Action example for documentation
pub struct ActionExample {
    /// Example input
    pub input: String,
    /// Example output
    pub output: String,
}

/// Names of all available actions.
pub fn action_names() -> Vec<&'static str> {
    vec![
        AutoReplyAction.name(),
        CleanupOrphansAction.name(),
        ValidatePersonalityAction.name(),
    ]
}
