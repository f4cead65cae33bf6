//! Auto-reply action
//!
//! Synthesizes the next scripted bot comment when a user answers an
//! auto-bot.

use super::{ActionExample, ActionResult};
use crate::dialogue::{handle_auto_response, ReviewSnapshot};
use crate::types::{Comment, CommentId};

/// Action producing a bot's scripted reply.
pub struct AutoReplyAction;

impl AutoReplyAction {
    /// Returns the action name.
    pub fn name(&self) -> &'static str {
        "auto-reply"
    }

    /// Returns action aliases.
    pub fn similes(&self) -> Vec<&'static str> {
        vec!["BOT_REPLY", "AUTO_BOT", "SCRIPTED_REPLY"]
    }

    /// Returns the action description.
    pub fn description(&self) -> &'static str {
        "Compute an auto-bot's next scripted comment in reply to a user."
    }

    /// Only replies to bot comments can trigger the action.
    pub fn validate<S: ReviewSnapshot + ?Sized>(&self, prior: &CommentId, snapshot: &S) -> bool {
        crate::threads::find_parent(snapshot.comments(), prior).is_some_and(Comment::is_bot)
    }

    /// Handles the action. A successful result carries the draft comment
    /// and delay in `data`; no reply due is still a success without data.
    pub fn handler<S: ReviewSnapshot + ?Sized>(
        &self,
        prior: &CommentId,
        new_comment: &Comment,
        snapshot: &S,
    ) -> ActionResult {
        if new_comment.content.trim().is_empty() {
            return ActionResult::failure("Reply has no content");
        }

        match handle_auto_response(prior, new_comment, snapshot) {
            Some(reply) => match serde_json::to_value(&reply) {
                Ok(data) => ActionResult::ok(reply.comment.content.clone(), Some(data)),
                Err(e) => ActionResult::failure(e.to_string()),
            },
            None => ActionResult::ok("", None),
        }
    }

    /// Returns action examples.
    pub fn examples(&self) -> Vec<ActionExample> {
        vec![ActionExample {
            input: "Yes, I wrote unit tests for it".to_string(),
            output: "Which cases did you cover?".to_string(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::InMemorySnapshot;
    use crate::types::{BotUser, Message, Personality, StartState, Step};

    fn snapshot() -> InMemorySnapshot {
        let personality = Personality {
            start: StartState {
                id: "start".to_string(),
                text: "Tested?".to_string(),
                options: vec!["Yes".to_string()],
            },
            steps: vec![Step {
                id: "yes".to_string(),
                referer: vec!["start".to_string()],
                pattern: "yes".to_string(),
                text: "Good.".to_string(),
                options: vec![],
            }],
            fallback: Message {
                text: "Hm?".to_string(),
            },
            end: Message {
                text: "Bye.".to_string(),
            },
        };
        InMemorySnapshot::new(
            vec![
                Comment::root(1, "Tested?").on_line(2).from_bot("bot", "start"),
                Comment::root(2, "human note").on_line(3),
            ],
            vec![BotUser::new("bot", "Tester").with_personality(personality)],
        )
    }

    #[test]
    fn test_action_metadata() {
        let action = AutoReplyAction;
        assert_eq!(action.name(), "auto-reply");
        assert!(action.similes().contains(&"BOT_REPLY"));
        assert_eq!(action.examples().len(), 1);
    }

    #[test]
    fn test_validate_only_bot_priors() {
        let snap = snapshot();
        assert!(AutoReplyAction.validate(&CommentId::from(1), &snap));
        assert!(!AutoReplyAction.validate(&CommentId::from(2), &snap));
        assert!(!AutoReplyAction.validate(&CommentId::from(9), &snap));
    }

    #[test]
    fn test_handler_returns_draft() {
        let snap = snapshot();
        let result = AutoReplyAction.handler(&CommentId::from(1), &Comment::reply(3, 1, "yes"), &snap);
        assert!(result.success);
        assert_eq!(result.text.as_deref(), Some("Good."));
        let data = result.data.unwrap();
        assert_eq!(data["comment"]["optionId"], "yes");
        assert_eq!(data["comment"]["parentId"], 3);
    }

    #[test]
    fn test_handler_no_reply_due() {
        let snap = snapshot();
        let result = AutoReplyAction.handler(&CommentId::from(2), &Comment::reply(3, 2, "yes"), &snap);
        assert!(result.success);
        assert!(result.data.is_none());
    }

    #[test]
    fn test_handler_empty_reply() {
        let snap = snapshot();
        let result = AutoReplyAction.handler(&CommentId::from(1), &Comment::reply(3, 1, "  "), &snap);
        assert!(!result.success);
    }
}
