//! Cleanup-orphans action
//!
//! Reports the comment ids a cleanup must delete. Deletion itself belongs to
//! the storage layer.

use serde_json::json;

use super::{ActionExample, ActionResult};
use crate::threads::{cleanup_targets, get_orphans};
use crate::types::Comment;

/// Action listing broken sub-threads for deletion.
pub struct CleanupOrphansAction;

impl CleanupOrphansAction {
    /// Returns the action name.
    pub fn name(&self) -> &'static str {
        "cleanup-orphans"
    }

    /// Returns action aliases.
    pub fn similes(&self) -> Vec<&'static str> {
        vec!["CLEAN_THREADS", "DELETE_ORPHANS"]
    }

    /// Returns the action description.
    pub fn description(&self) -> &'static str {
        "List orphaned comments and the sub-threads below them for deletion."
    }

    /// Worth running only when the snapshot has orphans.
    pub fn validate(&self, comments: &[Comment]) -> bool {
        !get_orphans(comments).is_empty()
    }

    /// Handles the action.
    pub fn handler(&self, comments: &[Comment]) -> ActionResult {
        let orphans = get_orphans(comments).len();
        let ids = cleanup_targets(comments);
        ActionResult::ok(
            format!("{} orphaned comments, {} to delete", orphans, ids.len()),
            Some(json!({ "orphans": orphans, "ids": ids })),
        )
    }

    /// Returns action examples.
    pub fn examples(&self) -> Vec<ActionExample> {
        vec![ActionExample {
            input: "Clean up broken threads".to_string(),
            output: "1 orphaned comments, 2 to delete".to_string(),
        }]
    }
}
