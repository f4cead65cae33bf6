//! Scripted auto-bot dialogue engine.
//!
//! Given the bot comment a user replied to, the bot's persona script and the
//! reply text, computes the bot's next comment. Every turn is a pure function
//! of its inputs: the engine keeps no session state between calls.

use once_cell::sync::Lazy;
use regex::RegexBuilder;
use tracing::{debug, warn};

use crate::config::DialogueConfig;
use crate::threads::{find_parent, thread_line};
use crate::types::{AuthorKind, BotReply, BotUser, Comment, CommentId, Personality, Step};

/// Read access to the comment and bot collections at one point in time.
pub trait ReviewSnapshot {
    fn comments(&self) -> &[Comment];
    fn bot(&self, bot_id: &str) -> Option<&BotUser>;
}

/// Snapshot backed by owned vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshot {
    pub comments: Vec<Comment>,
    pub bots: Vec<BotUser>,
}

impl InMemorySnapshot {
    pub fn new(comments: Vec<Comment>, bots: Vec<BotUser>) -> Self {
        Self { comments, bots }
    }
}

impl ReviewSnapshot for InMemorySnapshot {
    fn comments(&self) -> &[Comment] {
        &self.comments
    }

    fn bot(&self, bot_id: &str) -> Option<&BotUser> {
        self.bots.iter().find(|b| b.id == bot_id)
    }
}

/// Where a conversation stands according to the last bot comment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialoguePosition<'a> {
    /// The last comment came from the start state, or carried no state.
    AtStart,
    AtStep(&'a Step),
    /// The state id is no longer part of the script.
    NotFound(&'a str),
}

impl<'a> DialoguePosition<'a> {
    pub fn resolve(personality: &'a Personality, option_id: Option<&'a str>) -> Self {
        match option_id {
            None => Self::AtStart,
            Some(id) if id == personality.start.id => Self::AtStart,
            Some(id) => personality
                .step(id)
                .map(Self::AtStep)
                .unwrap_or(Self::NotFound(id)),
        }
    }
}

/// Outcome of one dialogue turn before it is wrapped into a comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub content: String,
    pub option_id: String,
    pub options: Vec<String>,
    pub is_end: bool,
}

/// Computes scripted bot replies with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct DialogueEngine {
    config: DialogueConfig,
}

impl DialogueEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DialogueConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// Advances `personality` by one turn from the state recorded in `prior`.
    pub fn next_turn(&self, personality: &Personality, prior: &Comment, reply: &str) -> Turn {
        let position = DialoguePosition::resolve(personality, prior.option_id.as_deref());
        let current_id = prior
            .option_id
            .clone()
            .unwrap_or_else(|| personality.start.id.clone());

        if let DialoguePosition::AtStep(step) = position {
            if step.is_dead_end() {
                debug!(state = %step.id, "Dialogue reached its end");
                return Turn {
                    content: personality.end.text.clone(),
                    option_id: current_id,
                    options: Vec::new(),
                    is_end: true,
                };
            }
        }

        let selected = personality
            .steps_from(&current_id)
            .find(|step| self.matches(&step.pattern, reply));

        if let Some(step) = selected {
            debug!(from = %current_id, to = %step.id, "Dialogue transition");
            return Turn {
                content: step.text.clone(),
                option_id: step.id.clone(),
                options: step.options.clone(),
                is_end: false,
            };
        }

        let (text, options) = match position {
            DialoguePosition::AtStep(step) => (&step.text, &step.options),
            DialoguePosition::AtStart | DialoguePosition::NotFound(_) => {
                (&personality.start.text, &personality.start.options)
            }
        };
        if let DialoguePosition::NotFound(id) = position {
            warn!(state = %id, "Dialogue state missing from script, reminding with start text");
        }
        debug!(state = %current_id, "No transition matched, using fallback");

        Turn {
            content: format!(
                "{}{}{}",
                personality.fallback.text,
                self.config.fallback_separator(),
                self.format_text(text, options)
            ),
            option_id: current_id,
            options: options.clone(),
            is_end: false,
        }
    }

    /// Case-insensitive search of `pattern` anywhere in `reply`.
    ///
    /// A pattern that fails to compile never matches.
    pub fn matches(&self, pattern: &str, reply: &str) -> bool {
        match RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(self.config.regex_size_limit())
            .build()
        {
            Ok(re) => re.is_match(reply),
            Err(e) => {
                warn!(pattern, error = %e, "Invalid dialogue pattern treated as no match");
                false
            }
        }
    }

    /// State text followed by its quick-reply options, one per line.
    pub fn format_text(&self, text: &str, options: &[String]) -> String {
        if options.is_empty() {
            return text.to_string();
        }
        let listed = options
            .iter()
            .map(|o| format!("{}{}", self.config.option_prefix(), o))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}{}{}", text, self.config.options_separator(), listed)
    }

    /// Advisory "thinking" delay for a response of this text.
    pub fn response_delay_ms(&self, text: &str) -> u64 {
        let raw = (text.chars().count() as u64).saturating_mul(self.config.per_char_delay_ms());
        raw.clamp(self.config.min_delay_ms(), self.config.max_delay_ms())
    }

    /// Builds the bot's reply to `new_comment`, if one is due.
    ///
    /// Returns `None` when the prior comment is not an auto-bot comment,
    /// when the bot or its personality cannot be found, or when the reply
    /// itself came from a bot.
    pub fn respond(
        &self,
        prior: &Comment,
        bot: &BotUser,
        new_comment: &Comment,
    ) -> Option<BotReply> {
        if prior.author_kind != AuthorKind::Bot || new_comment.is_bot() || !bot.auto_bot {
            return None;
        }
        let Some(personality) = bot.personality.as_ref() else {
            warn!(bot = %bot.id, "Auto-bot has no personality");
            return None;
        };

        let turn = self.next_turn(personality, prior, &new_comment.content);
        let delay_ms = self.response_delay_ms(&turn.content);

        // id is assigned by the store on create
        let comment = Comment {
            id: CommentId::Text(String::new()),
            parent_id: Some(new_comment.id.clone()),
            line: prior.line,
            author_kind: AuthorKind::Bot,
            author_id: Some(bot.id.clone()),
            content: turn.content,
            bot_id: Some(bot.id.clone()),
            option_id: Some(turn.option_id),
            options: turn.options,
            is_end: turn.is_end,
            deleted: false,
        };

        Some(BotReply { comment, delay_ms })
    }

    /// Looks up the prior comment and its bot in `snapshot` and answers
    /// `new_comment`.
    pub fn handle_auto_response<S: ReviewSnapshot + ?Sized>(
        &self,
        prior_comment_id: &CommentId,
        new_comment: &Comment,
        snapshot: &S,
    ) -> Option<BotReply> {
        let prior = find_parent(snapshot.comments(), prior_comment_id)?;
        let bot_id = prior.bot_id.as_deref()?;
        let Some(bot) = snapshot.bot(bot_id) else {
            warn!(bot = bot_id, "Bot referenced by comment not found");
            return None;
        };
        let mut reply = self.respond(prior, bot, new_comment)?;
        if reply.comment.line.is_none() {
            reply.comment.line = thread_line(snapshot.comments(), prior_comment_id);
        }
        Some(reply)
    }
}

static DEFAULT_ENGINE: Lazy<DialogueEngine> = Lazy::new(|| match DialogueConfig::from_env() {
    Ok(config) => DialogueEngine::with_config(config),
    Err(e) => {
        warn!(error = %e, "Invalid CODE_REVIEW_* configuration, using defaults");
        DialogueEngine::new()
    }
});

/// The shared engine, configured from `CODE_REVIEW_*` on first use.
pub fn default_engine() -> &'static DialogueEngine {
    &DEFAULT_ENGINE
}

/// Answers `new_comment` using the shared engine.
pub fn handle_auto_response<S: ReviewSnapshot + ?Sized>(
    prior_comment_id: &CommentId,
    new_comment: &Comment,
    snapshot: &S,
) -> Option<BotReply> {
    DEFAULT_ENGINE.handle_auto_response(prior_comment_id, new_comment, snapshot)
}

/// The opening comment a bot posts on `line`, from the start state.
pub fn opening_comment(bot: &BotUser, line: Option<u32>, config: &DialogueConfig) -> Comment {
    let (content, option_id, options) = match &bot.personality {
        Some(p) => (p.start.text.clone(), p.start.id.clone(), p.start.options.clone()),
        None => (
            config.default_comment_content().to_string(),
            String::new(),
            Vec::new(),
        ),
    };
    Comment {
        id: CommentId::Text(String::new()),
        parent_id: None,
        line,
        author_kind: AuthorKind::Bot,
        author_id: Some(bot.id.clone()),
        content,
        bot_id: Some(bot.id.clone()),
        option_id: Some(option_id).filter(|id| !id.is_empty()),
        options,
        is_end: false,
        deleted: false,
    }
}
