//! # Code Review Plugin
//!
//! Core logic of an educational code review tool: inline comment threads
//! anchored to code lines, and scripted auto-bots that answer students by
//! walking a small dialogue graph.
//!
//! ## Features
//!
//! - Linear thread reconstruction from parent-linked comments
//! - Ancestor chains and orphan detection for thread cleanup
//! - Regex-driven persona dialogue with fallback and end-of-script replies
//! - Length-proportional "thinking" delay for bot replies
//! - Persona script validation and reachability lint
//!
//! ## Example
//!
//! ```rust
//! use elizaos_plugin_code_review::{build_thread, get_orphans, Comment};
//!
//! let comments = vec![
//!     Comment::root(1, "Why a loop here?").on_line(12),
//!     Comment::reply(2, 1, "It was simpler."),
//!     Comment::reply(3, 99, "Lost reply"),
//! ];
//! assert_eq!(build_thread(&comments[0], &comments).len(), 2);
//! assert_eq!(get_orphans(&comments).len(), 1);
//! ```

#![allow(missing_docs)]
#![deny(unsafe_code)]

pub mod actions;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod interop;
pub mod threads;
pub mod types;
pub mod validation;

pub use config::DialogueConfig;
pub use dialogue::{
    default_engine, handle_auto_response, opening_comment, DialogueEngine, DialoguePosition,
    InMemorySnapshot, ReviewSnapshot, Turn,
};
pub use error::{CodeReviewError, Result};
pub use threads::{
    build_thread, cleanup_targets, display_content, find_parent, get_ancestor_chain, get_orphans,
    thread_line, threads_for_line,
};
pub use types::{
    AuthorKind, BotReply, BotUser, Comment, CommentId, Message, Personality, StartState, Step,
};
pub use validation::{
    lint_personality, personality_from_value, validate_personality, validate_personality_text,
    ScriptIssue,
};

pub const PLUGIN_NAME: &str = "code-review";
pub const PLUGIN_DESCRIPTION: &str =
    "Code review comment threads with scripted auto-bot replies";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds a dialogue engine from `CODE_REVIEW_*` environment variables.
pub fn create_engine_from_env() -> Result<DialogueEngine> {
    let config = DialogueConfig::from_env()?;
    Ok(DialogueEngine::with_config(config))
}
