#![allow(missing_docs)]

use crate::error::{CodeReviewError, Result};

pub const DEFAULT_COMMENT_CONTENT: &str = "";
pub const DELETED_PLACEHOLDER: &str = "_This comment has been deleted._";
pub const PER_CHAR_DELAY_MS: u64 = 30;
pub const MIN_DELAY_MS: u64 = 1000;
pub const MAX_DELAY_MS: u64 = 5000;
pub const FALLBACK_SEPARATOR: &str = "\n\n";
pub const OPTIONS_SEPARATOR: &str = "\n\n";
pub const OPTION_PREFIX: &str = "- ";
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Plain values the dialogue engine and renderers consume.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    default_comment_content: String,
    deleted_placeholder: String,
    per_char_delay_ms: u64,
    min_delay_ms: u64,
    max_delay_ms: u64,
    fallback_separator: String,
    options_separator: String,
    option_prefix: String,
    regex_size_limit: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueConfig {
    pub fn new() -> Self {
        Self {
            default_comment_content: DEFAULT_COMMENT_CONTENT.to_string(),
            deleted_placeholder: DELETED_PLACEHOLDER.to_string(),
            per_char_delay_ms: PER_CHAR_DELAY_MS,
            min_delay_ms: MIN_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            fallback_separator: FALLBACK_SEPARATOR.to_string(),
            options_separator: OPTIONS_SEPARATOR.to_string(),
            option_prefix: OPTION_PREFIX.to_string(),
            regex_size_limit: REGEX_SIZE_LIMIT,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `CODE_REVIEW_*` values supplied by `lookup`.
    ///
    /// Unparseable numbers keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::new();

        if let Some(v) = lookup("CODE_REVIEW_DEFAULT_COMMENT") {
            cfg.default_comment_content = v;
        }
        if let Some(v) = lookup("CODE_REVIEW_DELETED_PLACEHOLDER") {
            cfg.deleted_placeholder = v;
        }
        if let Some(v) = lookup("CODE_REVIEW_PER_CHAR_DELAY_MS") {
            cfg.per_char_delay_ms = v.parse().unwrap_or(PER_CHAR_DELAY_MS);
        }
        if let Some(v) = lookup("CODE_REVIEW_MIN_DELAY_MS") {
            cfg.min_delay_ms = v.parse().unwrap_or(MIN_DELAY_MS);
        }
        if let Some(v) = lookup("CODE_REVIEW_MAX_DELAY_MS") {
            cfg.max_delay_ms = v.parse().unwrap_or(MAX_DELAY_MS);
        }
        if let Some(v) = lookup("CODE_REVIEW_FALLBACK_SEPARATOR") {
            cfg.fallback_separator = v;
        }
        if let Some(v) = lookup("CODE_REVIEW_OPTIONS_SEPARATOR") {
            cfg.options_separator = v;
        }
        if let Some(v) = lookup("CODE_REVIEW_OPTION_PREFIX") {
            cfg.option_prefix = v;
        }
        if let Some(v) = lookup("CODE_REVIEW_REGEX_SIZE_LIMIT") {
            cfg.regex_size_limit = v.parse().unwrap_or(REGEX_SIZE_LIMIT);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects delay bounds that cannot be clamped against.
    pub fn validate(&self) -> Result<()> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(CodeReviewError::config(format!(
                "min delay {}ms exceeds max delay {}ms",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        if self.regex_size_limit == 0 {
            return Err(CodeReviewError::config("regex size limit must be positive"));
        }
        Ok(())
    }

    pub fn default_comment_content(&self) -> &str {
        &self.default_comment_content
    }
    pub fn deleted_placeholder(&self) -> &str {
        &self.deleted_placeholder
    }
    pub fn per_char_delay_ms(&self) -> u64 {
        self.per_char_delay_ms
    }
    pub fn min_delay_ms(&self) -> u64 {
        self.min_delay_ms
    }
    pub fn max_delay_ms(&self) -> u64 {
        self.max_delay_ms
    }
    pub fn fallback_separator(&self) -> &str {
        &self.fallback_separator
    }
    pub fn options_separator(&self) -> &str {
        &self.options_separator
    }
    pub fn option_prefix(&self) -> &str {
        &self.option_prefix
    }
    pub fn regex_size_limit(&self) -> usize {
        self.regex_size_limit
    }

    pub fn with_delays(mut self, per_char_ms: u64, min_ms: u64, max_ms: u64) -> Result<Self> {
        self.per_char_delay_ms = per_char_ms;
        self.min_delay_ms = min_ms;
        self.max_delay_ms = max_ms;
        self.validate()?;
        Ok(self)
    }

    pub fn with_default_comment_content(mut self, content: impl Into<String>) -> Self {
        self.default_comment_content = content.into();
        self
    }

    pub fn with_deleted_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.deleted_placeholder = placeholder.into();
        self
    }

    pub fn with_separators(
        mut self,
        fallback: impl Into<String>,
        options: impl Into<String>,
    ) -> Self {
        self.fallback_separator = fallback.into();
        self.options_separator = options.into();
        self
    }

    pub fn with_option_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.option_prefix = prefix.into();
        self
    }

    pub fn with_regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }
}
