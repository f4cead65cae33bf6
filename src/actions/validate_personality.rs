//! Validate-personality action
//!
//! Checks a persona script before the authoring UI saves it.

use serde_json::json;

use super::{ActionExample, ActionResult};
use crate::validation::{lint_personality, validate_personality_text};

/// Action validating persona script text.
pub struct ValidatePersonalityAction;

impl ValidatePersonalityAction {
    /// Returns the action name.
    pub fn name(&self) -> &'static str {
        "validate-personality"
    }

    /// Returns the action description.
    pub fn description(&self) -> &'static str {
        "Validate a persona dialogue script and report graph warnings."
    }

    /// Handles the action. Lint findings are returned as warnings and do
    /// not fail validation.
    pub fn handler(&self, script: &str) -> ActionResult {
        match validate_personality_text(script) {
            Ok(personality) => {
                let warnings = lint_personality(&personality)
                    .into_iter()
                    .map(|issue| format!("{issue:?}"))
                    .collect::<Vec<_>>();
                ActionResult::ok(
                    "Script is valid",
                    Some(json!({ "steps": personality.steps.len(), "warnings": warnings })),
                )
            }
            Err(e) => ActionResult::failure(format!("This script is invalid: {e}")),
        }
    }

    /// Returns action examples.
    pub fn examples(&self) -> Vec<ActionExample> {
        vec![ActionExample {
            input: r#"{"start": {"text": "Hi"}, "fallback": {"text": "?"}, "end": {"text": "Bye"}}"#
                .to_string(),
            output: "Script is valid".to_string(),
        }]
    }
}
