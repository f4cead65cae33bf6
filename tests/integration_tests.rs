use elizaos_plugin_code_review::{
    build_thread, cleanup_targets, create_engine_from_env, find_parent, get_ancestor_chain,
    get_orphans, handle_auto_response, threads_for_line, validate_personality,
    validate_personality_text, BotUser, Comment, CommentId, DialogueConfig, DialogueEngine,
    InMemorySnapshot, Personality,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn review_bot() -> Personality {
    validate_personality_text(
        &json!({
            "start": {
                "id": "start",
                "text": "What does this function return on empty input?",
                "options": ["None", "An error"]
            },
            "steps": [
                {
                    "id": "none",
                    "referer": ["start"],
                    "match": "\\bnone\\b|nothing",
                    "text": "Is that documented for callers?",
                    "options": ["Yes", "No"]
                },
                {
                    "id": "error",
                    "referer": ["start"],
                    "match": "error|panic",
                    "text": "Which error type?",
                    "options": []
                },
                {
                    "id": "documented",
                    "referer": ["none"],
                    "match": "^yes",
                    "text": "Great, then this looks fine.",
                    "options": []
                },
                {
                    "id": "undocumented",
                    "referer": ["none"],
                    "match": "^no",
                    "text": "Please add a doc comment.",
                    "options": []
                }
            ],
            "fallback": {"text": "I did not understand that."},
            "end": {"text": "Thanks, that's all from me!"}
        })
        .to_string(),
    )
    .unwrap()
}

fn snapshot() -> InMemorySnapshot {
    InMemorySnapshot::new(
        vec![
            Comment::root(1, "What does this function return on empty input?")
                .on_line(8)
                .from_bot("reviewer", "start"),
            Comment::reply(2, 1, "It returns None").by_author("student"),
            Comment::reply(3, 2, "Is that documented for callers?").from_bot("reviewer", "none"),
            Comment::root(10, "Nice naming").on_line(8).by_author("instructor"),
        ],
        vec![BotUser::new("reviewer", "Reviewer").with_personality(review_bot())],
    )
}

#[test]
fn test_thread_layout_under_line() {
    let snap = snapshot();
    let threads = threads_for_line(&snap.comments, 8);
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0].len(), 3);
    assert_eq!(threads[0][0].id, CommentId::from(1));
    assert_eq!(threads[1].len(), 1);
}

#[test]
fn test_ancestor_chain_ends_at_root() {
    let snap = snapshot();
    let chain = get_ancestor_chain(&snap.comments, &CommentId::from(3));
    assert_eq!(
        chain,
        vec![CommentId::from(3), CommentId::from(2), CommentId::from(1)]
    );
    let top = find_parent(&snap.comments, chain.last().unwrap()).unwrap();
    assert!(top.is_root());
}

#[test]
fn test_orphan_example() {
    let comments = vec![
        Comment::root(1, "a"),
        Comment::reply(2, 1, "b"),
        Comment::reply(3, 99, "c"),
    ];
    let orphans = get_orphans(&comments);
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, CommentId::from(3));
    assert_eq!(cleanup_targets(&comments), vec![CommentId::from(3)]);
}

#[test]
fn test_build_thread_length_bound() {
    let comments: Vec<Comment> = (2..20).map(|i| Comment::reply(i, i - 1, "r")).collect();
    let root = Comment::root(1, "root");
    let thread = build_thread(&root, &comments);
    assert_eq!(thread[0].id, CommentId::from(1));
    assert_eq!(thread.len(), comments.len() + 1);
}

#[test]
fn test_full_conversation() {
    let mut snap = snapshot();

    let reply = Comment::reply(4, 3, "Yes, in the docstring");
    let bot = handle_auto_response(&CommentId::from(3), &reply, &snap).unwrap();
    assert_eq!(bot.comment.content, "Great, then this looks fine.");
    assert_eq!(bot.comment.option_id.as_deref(), Some("documented"));
    assert_eq!(bot.comment.parent_id, Some(CommentId::from(4)));
    assert_eq!(bot.comment.line, Some(8));
    assert!(!bot.comment.is_end);

    let mut posted = bot.comment.clone();
    posted.id = CommentId::from(5);
    snap.comments.push(reply);
    snap.comments.push(posted);

    let last = Comment::reply(6, 5, "cool");
    let end = handle_auto_response(&CommentId::from(5), &last, &snap).unwrap();
    assert!(end.comment.is_end);
    assert_eq!(end.comment.content, "Thanks, that's all from me!");
}

#[test]
fn test_turn_is_deterministic() {
    let snap = snapshot();
    let reply = Comment::reply(4, 3, "something else entirely");
    let first = handle_auto_response(&CommentId::from(3), &reply, &snap);
    let second = handle_auto_response(&CommentId::from(3), &reply, &snap);
    assert_eq!(first, second);
}

#[test]
fn test_fallback_keeps_option_id() {
    let snap = snapshot();
    let reply = Comment::reply(4, 3, "pineapple");
    let bot = handle_auto_response(&CommentId::from(3), &reply, &snap).unwrap();
    assert_eq!(bot.comment.option_id.as_deref(), Some("none"));
    assert!(bot.comment.content.contains("I did not understand that."));
    assert!(bot.comment.content.contains("Is that documented for callers?"));
    assert_eq!(bot.comment.options, vec!["Yes".to_string(), "No".to_string()]);
}

#[test]
fn test_no_reply_to_human_comment() {
    let snap = snapshot();
    let reply = Comment::reply(11, 10, "thanks");
    assert!(handle_auto_response(&CommentId::from(10), &reply, &snap).is_none());
}

#[test]
fn test_no_reply_when_auto_bot_disabled() {
    let mut snap = snapshot();
    snap.bots[0].auto_bot = false;
    let reply = Comment::reply(4, 3, "yes");
    assert!(handle_auto_response(&CommentId::from(3), &reply, &snap).is_none());
}

#[test]
fn test_delay_bounds() {
    let config = DialogueConfig::new().with_delays(20, 400, 2000).unwrap();
    let engine = DialogueEngine::with_config(config);
    assert_eq!(engine.response_delay_ms("short"), 400);
    assert_eq!(engine.response_delay_ms(&"x".repeat(30)), 600);
    assert_eq!(engine.response_delay_ms(&"x".repeat(1000)), 2000);
}

#[test]
fn test_validation_failures() {
    let missing_fallback = json!({"start": {"text": "Hi"}, "end": {"text": "Bye"}});
    let err = validate_personality(&missing_fallback).unwrap_err();
    assert_eq!(err.key(), Some("fallback"));

    let bad_options = json!({
        "start": {"text": "Hi"},
        "steps": [{"match": "x", "text": "y", "options": 3}],
        "fallback": {"text": "?"},
        "end": {"text": "Bye"}
    });
    let err = validate_personality(&bad_options).unwrap_err();
    assert_eq!(err.key(), Some("options"));
}

#[test]
fn test_validation_forms_agree_on_null_fields() {
    let null_steps = json!({
        "start": {"text": "Hi"},
        "steps": null,
        "fallback": {"text": "?"},
        "end": {"text": "Bye"}
    });
    assert!(validate_personality(&null_steps).is_err());
    assert!(validate_personality_text(&null_steps.to_string()).is_err());

    let null_match = json!({
        "start": {"text": "Hi"},
        "steps": [{"match": null, "text": "y", "options": []}],
        "fallback": {"text": "?"},
        "end": {"text": "Bye"}
    });
    assert_eq!(validate_personality(&null_match).unwrap_err().key(), Some("match"));
    assert!(validate_personality_text(&null_match.to_string()).is_err());
}

/// Test configuration loading from environment
#[test]
fn test_config_from_env() {
    std::env::set_var("CODE_REVIEW_MIN_DELAY_MS", "10");
    std::env::set_var("CODE_REVIEW_MAX_DELAY_MS", "20");
    std::env::set_var("CODE_REVIEW_OPTION_PREFIX", "* ");
    std::env::set_var("CODE_REVIEW_REGEX_SIZE_LIMIT", "65536");

    let config = DialogueConfig::from_env();
    let engine = create_engine_from_env();

    std::env::remove_var("CODE_REVIEW_MIN_DELAY_MS");
    std::env::remove_var("CODE_REVIEW_MAX_DELAY_MS");
    std::env::remove_var("CODE_REVIEW_OPTION_PREFIX");
    std::env::remove_var("CODE_REVIEW_REGEX_SIZE_LIMIT");

    let config = config.unwrap();
    assert_eq!(config.min_delay_ms(), 10);
    assert_eq!(config.max_delay_ms(), 20);
    assert_eq!(config.option_prefix(), "* ");
    assert_eq!(config.regex_size_limit(), 65536);

    let engine = engine.unwrap();
    assert_eq!(engine.response_delay_ms(&"x".repeat(500)), 20);
    assert_eq!(engine.format_text("Pick", &["a".to_string()]), "Pick\n\n* a");
}
