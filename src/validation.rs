//! Persona script validation.
//!
//! Structural checks run before a script is saved. They report the first
//! problem found and never repair the script.

use std::collections::HashSet;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CodeReviewError, Result};
use crate::types::Personality;

const REQUIRED_KEYS: [&str; 3] = ["start", "fallback", "end"];
const REQUIRED_STEP_FIELDS: [&str; 3] = ["match", "text", "options"];
const STRING_STEP_FIELDS: [&str; 2] = ["match", "text"];

/// Checks that `script` has the shape of a persona script.
///
/// A script that passes is guaranteed to deserialize into a [`Personality`].
pub fn validate_personality(script: &Value) -> Result<()> {
    personality_from_value(script).map(|_| ())
}

/// Validates `script` and deserializes it into a [`Personality`].
pub fn personality_from_value(script: &Value) -> Result<Personality> {
    check_shape(script)?;
    Personality::deserialize(script)
        .map_err(|e| CodeReviewError::invalid_field("personality", "script", e.to_string()))
}

/// Parses, validates and deserializes a persona script from JSON text.
pub fn validate_personality_text(text: &str) -> Result<Personality> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CodeReviewError::InvalidScript(e.to_string()))?;
    personality_from_value(&value)
}

fn check_shape(script: &Value) -> Result<()> {
    let Some(root) = script.as_object() else {
        return Err(CodeReviewError::invalid_field(
            "personality",
            "script",
            "expected an object",
        ));
    };

    for key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            return Err(CodeReviewError::missing_key(key, "personality"));
        }
    }

    let steps = match root.get("steps") {
        None => return Ok(()),
        Some(Value::Array(steps)) => steps,
        Some(_) => {
            return Err(CodeReviewError::invalid_field(
                "steps",
                "personality",
                "expected a list",
            ))
        }
    };

    for (index, step) in steps.iter().enumerate() {
        let location = format!("steps[{index}]");
        let Some(fields) = step.as_object() else {
            return Err(CodeReviewError::invalid_field(
                "steps",
                location,
                "expected an object",
            ));
        };
        for field in REQUIRED_STEP_FIELDS {
            if !fields.contains_key(field) {
                return Err(CodeReviewError::missing_key(field, location));
            }
        }
        for field in STRING_STEP_FIELDS {
            if !fields.get(field).is_some_and(Value::is_string) {
                return Err(CodeReviewError::invalid_field(
                    field,
                    location,
                    "expected a string",
                ));
            }
        }
        if !fields.get("options").is_some_and(Value::is_array) {
            return Err(CodeReviewError::invalid_field(
                "options",
                location,
                "expected a list",
            ));
        }
    }

    Ok(())
}

/// Non-fatal problems in an otherwise well-formed script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptIssue {
    /// No state refers to this step.
    Unreachable { step: String },
    /// A referer names a state that does not exist.
    UnknownReferer { step: String, referer: String },
    DuplicateStepId { step: String },
    /// The pattern does not compile and will never match.
    InvalidPattern { step: String, error: String },
}

/// Reports reachability and pattern problems in the dialogue graph.
pub fn lint_personality(personality: &Personality) -> Vec<ScriptIssue> {
    let mut issues = Vec::new();
    let mut known: HashSet<&str> = HashSet::from([personality.start.id.as_str()]);
    let mut seen_steps: HashSet<&str> = HashSet::new();

    for step in &personality.steps {
        if !seen_steps.insert(step.id.as_str()) {
            issues.push(ScriptIssue::DuplicateStepId {
                step: step.id.clone(),
            });
        }
        known.insert(step.id.as_str());
    }

    for step in &personality.steps {
        if step.referer.is_empty() {
            issues.push(ScriptIssue::Unreachable {
                step: step.id.clone(),
            });
        }
        for referer in &step.referer {
            if !known.contains(referer.as_str()) {
                issues.push(ScriptIssue::UnknownReferer {
                    step: step.id.clone(),
                    referer: referer.clone(),
                });
            }
        }
        if let Err(e) = Regex::new(&step.pattern) {
            issues.push(ScriptIssue::InvalidPattern {
                step: step.id.clone(),
                error: e.to_string(),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn valid_script() -> Value {
        json!({
            "start": {"id": "start", "text": "Hi!", "options": ["Hello"]},
            "steps": [
                {"id": "greet", "referer": ["start"], "match": "hello", "text": "Nice.", "options": []}
            ],
            "fallback": {"text": "Pardon?"},
            "end": {"text": "Bye."}
        })
    }

    #[test]
    fn test_valid_script_passes() {
        assert!(validate_personality(&valid_script()).is_ok());
    }

    #[test]
    fn test_missing_fallback() {
        let mut script = valid_script();
        script.as_object_mut().unwrap().remove("fallback");
        let err = validate_personality(&script).unwrap_err();
        assert_eq!(err.key(), Some("fallback"));
    }

    #[test]
    fn test_first_missing_key_reported() {
        let err = validate_personality(&json!({"steps": []})).unwrap_err();
        assert_eq!(err.key(), Some("start"));
    }

    #[test]
    fn test_step_missing_match() {
        let mut script = valid_script();
        script["steps"][0].as_object_mut().unwrap().remove("match");
        let err = validate_personality(&script).unwrap_err();
        assert_eq!(err.key(), Some("match"));
        assert!(err.to_string().contains("steps[0]"));
    }

    #[test]
    fn test_options_must_be_a_list() {
        let mut script = valid_script();
        script["steps"][0]["options"] = json!("yes, no");
        let err = validate_personality(&script).unwrap_err();
        assert_eq!(err.key(), Some("options"));
        assert!(matches!(err, CodeReviewError::InvalidField { .. }));
    }

    #[test]
    fn test_non_object_script() {
        let err = validate_personality(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, CodeReviewError::InvalidField { .. }));
    }

    #[test]
    fn test_null_steps_rejected() {
        let mut script = valid_script();
        script["steps"] = Value::Null;
        let err = validate_personality(&script).unwrap_err();
        assert_eq!(err.key(), Some("steps"));
        assert!(validate_personality_text(&script.to_string()).is_err());
    }

    #[test]
    fn test_null_match_rejected() {
        let mut script = valid_script();
        script["steps"][0]["match"] = Value::Null;
        let err = validate_personality(&script).unwrap_err();
        assert_eq!(err.key(), Some("match"));
        assert!(matches!(err, CodeReviewError::InvalidField { .. }));
        assert!(validate_personality_text(&script.to_string()).is_err());
    }

    #[test]
    fn test_wrongly_typed_nested_value_rejected() {
        let mut script = valid_script();
        script["start"]["options"] = json!("Hello");
        let err = validate_personality(&script).unwrap_err();
        assert_eq!(err.key(), Some("personality"));
        assert!(validate_personality_text(&script.to_string()).is_err());
    }

    #[test]
    fn test_value_and_text_forms_agree() {
        let script = valid_script();
        let from_value = personality_from_value(&script).unwrap();
        let from_text = validate_personality_text(&script.to_string()).unwrap();
        assert_eq!(from_value, from_text);
    }

    #[test]
    fn test_validate_text_round_trip() {
        let personality = validate_personality_text(&valid_script().to_string()).unwrap();
        assert_eq!(personality.steps[0].pattern, "hello");
        assert_eq!(personality.fallback.text, "Pardon?");
    }

    #[test]
    fn test_validate_text_rejects_garbage() {
        let err = validate_personality_text("start: {").unwrap_err();
        assert!(matches!(err, CodeReviewError::InvalidScript(_)));
    }

    #[test]
    fn test_lint_clean_script() {
        let personality = validate_personality_text(&valid_script().to_string()).unwrap();
        assert!(lint_personality(&personality).is_empty());
    }

    #[test]
    fn test_lint_reports_graph_problems() {
        let personality: Personality = serde_json::from_value(json!({
            "start": {"text": "Hi!"},
            "steps": [
                {"id": "a", "referer": ["nowhere"], "match": "(", "text": "A", "options": []},
                {"id": "a", "referer": [], "match": "b", "text": "B", "options": []}
            ],
            "fallback": {"text": "?"},
            "end": {"text": "."}
        }))
        .unwrap();
        let issues = lint_personality(&personality);
        assert!(issues.contains(&ScriptIssue::DuplicateStepId {
            step: "a".to_string()
        }));
        assert!(issues.contains(&ScriptIssue::UnknownReferer {
            step: "a".to_string(),
            referer: "nowhere".to_string()
        }));
        assert!(issues.contains(&ScriptIssue::Unreachable {
            step: "a".to_string()
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, ScriptIssue::InvalidPattern { .. })));
    }

    #[test]
    fn test_lint_flags_lookaround_and_backreferences() {
        let personality: Personality = serde_json::from_value(json!({
            "start": {"text": "Hi!"},
            "steps": [
                {"id": "ahead", "referer": ["start"], "match": "yes(?= please)", "text": "A", "options": []},
                {"id": "twice", "referer": ["start"], "match": "(a)\\1", "text": "B", "options": []}
            ],
            "fallback": {"text": "?"},
            "end": {"text": "."}
        }))
        .unwrap();
        let issues = lint_personality(&personality);
        let flagged: Vec<&str> = issues
            .iter()
            .filter_map(|i| match i {
                ScriptIssue::InvalidPattern { step, .. } => Some(step.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(flagged, vec!["ahead", "twice"]);
    }
}
