//! Type definitions for comments, bot users and persona scripts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a comment, numeric or textual depending on the store.
///
/// Equality is exact: `Number(1)` and `Text("1")` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for CommentId {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<i64> for CommentId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CommentId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Who wrote a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorKind {
    #[default]
    Human,
    Bot,
}

/// A single review comment, either a thread root or a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier within a snapshot.
    pub id: CommentId,
    /// The comment this one replies to; `None` marks a thread root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    /// Code line the thread is anchored to. Only meaningful on roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default)]
    pub author_kind: AuthorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
    /// Persona that produced a bot comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    /// Dialogue state that produced a bot comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
    /// Quick replies offered by a bot comment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_end: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl Comment {
    /// Create a human-authored thread root.
    pub fn root(id: impl Into<CommentId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            line: None,
            author_kind: AuthorKind::Human,
            author_id: None,
            content: content.into(),
            bot_id: None,
            option_id: None,
            options: Vec::new(),
            is_end: false,
            deleted: false,
        }
    }

    /// Create a human-authored reply to `parent_id`.
    pub fn reply(
        id: impl Into<CommentId>,
        parent_id: impl Into<CommentId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::root(id, content)
        }
    }

    pub fn on_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn by_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Mark the comment as produced by `bot_id` from dialogue state `option_id`.
    pub fn from_bot(mut self, bot_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        let bot_id = bot_id.into();
        self.author_kind = AuthorKind::Bot;
        self.author_id = Some(bot_id.clone());
        self.bot_id = Some(bot_id);
        self.option_id = Some(option_id.into());
        self
    }

    pub fn mark_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_bot(&self) -> bool {
        self.author_kind == AuthorKind::Bot
    }
}

/// Initial state of a persona script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartState {
    #[serde(default = "default_start_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
}

fn default_start_id() -> String {
    "start".to_string()
}

/// One state of the dialogue graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub id: String,
    /// States from which this one can be selected.
    #[serde(default)]
    pub referer: Vec<String>,
    /// Case-insensitive pattern searched in the user's reply.
    #[serde(rename = "match")]
    pub pattern: String,
    pub text: String,
    /// Empty marks a dead end.
    pub options: Vec<String>,
}

impl Step {
    pub fn is_dead_end(&self) -> bool {
        self.options.is_empty()
    }
}

/// A fixed message such as the fallback or terminal reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: String,
}

/// The scripted dialogue a bot walks through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub start: StartState,
    #[serde(default)]
    pub steps: Vec<Step>,
    pub fallback: Message,
    pub end: Message,
}

impl Personality {
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Steps reachable from the state `from`, in script order.
    pub fn steps_from<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a Step> + 'a {
        self.steps
            .iter()
            .filter(move |s| s.referer.iter().any(|r| r == from))
    }
}

/// A bot user record as the persona management layer stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Whether the bot answers replies automatically.
    #[serde(default)]
    pub auto_bot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<Personality>,
}

impl BotUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            auto_bot: false,
            personality: None,
        }
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.auto_bot = true;
        self.personality = Some(personality);
        self
    }

    pub fn with_auto_bot(mut self, auto_bot: bool) -> Self {
        self.auto_bot = auto_bot;
        self
    }
}

/// A synthesized bot comment plus its advisory display delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotReply {
    pub comment: Comment,
    pub delay_ms: u64,
}
