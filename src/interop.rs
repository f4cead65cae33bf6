#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::actions::action_names;
use crate::dialogue::{default_engine, DialogueEngine, InMemorySnapshot};
use crate::threads::{build_thread, cleanup_targets, find_parent, get_ancestor_chain, get_orphans};
use crate::types::{BotUser, Comment, CommentId};
use crate::validation::{lint_personality, personality_from_value, validate_personality_text};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManifest {
    pub name: String,
    pub description: String,
    pub version: String,
    pub language: String,
    pub interop_protocols: Vec<String>,
    pub actions: Vec<String>,
}

impl Default for PluginManifest {
    fn default() -> Self {
        Self {
            name: crate::PLUGIN_NAME.to_string(),
            description: crate::PLUGIN_DESCRIPTION.to_string(),
            version: crate::PLUGIN_VERSION.to_string(),
            language: "rust".to_string(),
            interop_protocols: vec!["ipc".to_string()],
            actions: action_names().into_iter().map(String::from).collect(),
        }
    }
}

pub fn get_manifest_json() -> String {
    serde_json::to_string(&PluginManifest::default())
        .unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IpcRequest {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IpcResponse {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IpcResponse {
    fn ok(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: u64, error: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentsParams {
    #[serde(default)]
    comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadParams {
    #[serde(default)]
    comments: Vec<Comment>,
    comment_id: CommentId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AutoResponseParams {
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    bots: Vec<BotUser>,
    prior_comment_id: CommentId,
    new_comment: Comment,
}

#[derive(Debug, Deserialize)]
struct ValidateParams {
    script: Value,
}

fn parse<T: serde::de::DeserializeOwned>(params: &Value) -> Result<T, String> {
    serde_json::from_value(params.clone()).map_err(|e| format!("Invalid params: {}", e))
}

fn dispatch(engine: &DialogueEngine, request: &IpcRequest) -> Result<Value, String> {
    match request.method.as_str() {
        "getManifest" => serde_json::to_value(PluginManifest::default()).map_err(|e| e.to_string()),
        "buildThread" => {
            let p: ThreadParams = parse(&request.params)?;
            let root = find_parent(&p.comments, &p.comment_id)
                .ok_or_else(|| format!("Comment not found: {}", p.comment_id))?;
            Ok(json!(build_thread(root, &p.comments)))
        }
        "ancestorChain" => {
            let p: ThreadParams = parse(&request.params)?;
            Ok(json!(get_ancestor_chain(&p.comments, &p.comment_id)))
        }
        "getOrphans" => {
            let p: CommentsParams = parse(&request.params)?;
            Ok(json!(get_orphans(&p.comments)))
        }
        "cleanupTargets" => {
            let p: CommentsParams = parse(&request.params)?;
            Ok(json!(cleanup_targets(&p.comments)))
        }
        "autoResponse" => {
            let p: AutoResponseParams = parse(&request.params)?;
            let snapshot = InMemorySnapshot::new(p.comments, p.bots);
            Ok(json!(engine.handle_auto_response(
                &p.prior_comment_id,
                &p.new_comment,
                &snapshot
            )))
        }
        "validatePersonality" => {
            let p: ValidateParams = parse(&request.params)?;
            let personality = match &p.script {
                Value::String(text) => validate_personality_text(text),
                other => personality_from_value(other),
            }
            .map_err(|e| format!("This script is invalid: {}", e))?;
            let warnings = lint_personality(&personality)
                .into_iter()
                .map(|issue| format!("{:?}", issue))
                .collect::<Vec<_>>();
            Ok(json!({ "valid": true, "warnings": warnings }))
        }
        other => Err(format!("Unknown method: {}", other)),
    }
}

/// Answers `request` with the shared, env-configured engine.
pub fn handle_ipc_request(request: &IpcRequest) -> IpcResponse {
    handle_ipc_request_with(default_engine(), request)
}

pub fn handle_ipc_request_with(engine: &DialogueEngine, request: &IpcRequest) -> IpcResponse {
    match dispatch(engine, request) {
        Ok(result) => IpcResponse::ok(request.id, result),
        Err(error) => {
            tracing::debug!(method = %request.method, %error, "IPC request failed");
            IpcResponse::err(request.id, error)
        }
    }
}
