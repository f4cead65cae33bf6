//! Thread resolution over flat, parent-linked comment collections.
//!
//! Threads are linear: each comment is followed by the first reply found in
//! pool order. Sibling replies beyond the first are not part of the thread.

use std::collections::HashSet;

use crate::types::{Comment, CommentId};

/// Walks the first-found child chain starting at `root`.
///
/// The result always starts with `root` and holds at most
/// `comments.len() + 1` entries.
pub fn build_thread<'a>(root: &'a Comment, comments: &'a [Comment]) -> Vec<&'a Comment> {
    let mut thread = vec![root];
    let mut seen: HashSet<&CommentId> = HashSet::from([&root.id]);
    let mut current = root;

    while let Some(child) = comments
        .iter()
        .find(|c| c.parent_id.as_ref() == Some(&current.id))
    {
        // parent cycle in malformed data
        if !seen.insert(&child.id) {
            break;
        }
        thread.push(child);
        current = child;
    }

    thread
}

pub fn find_parent<'a>(comments: &'a [Comment], parent_id: &CommentId) -> Option<&'a Comment> {
    comments.iter().find(|c| &c.id == parent_id)
}

/// Ids from `comment_id` up to the last resolvable ancestor, leaf first.
pub fn get_ancestor_chain(comments: &[Comment], comment_id: &CommentId) -> Vec<CommentId> {
    let mut chain = vec![comment_id.clone()];
    let mut seen: HashSet<&CommentId> = HashSet::new();

    let mut current = find_parent(comments, comment_id);
    while let Some(comment) = current {
        if !seen.insert(&comment.id) {
            break;
        }
        let Some(parent_id) = comment.parent_id.as_ref() else {
            break;
        };
        match find_parent(comments, parent_id) {
            Some(parent) if !seen.contains(&parent.id) => {
                chain.push(parent.id.clone());
                current = Some(parent);
            }
            _ => break,
        }
    }

    chain
}

/// Non-root comments whose parent is missing from `comments`, in source order.
pub fn get_orphans(comments: &[Comment]) -> Vec<&Comment> {
    comments
        .iter()
        .filter(|c| match &c.parent_id {
            Some(parent_id) => find_parent(comments, parent_id).is_none(),
            None => false,
        })
        .collect()
}

/// Line of the thread root `comment_id` belongs to, if resolvable.
pub fn thread_line(comments: &[Comment], comment_id: &CommentId) -> Option<u32> {
    let chain = get_ancestor_chain(comments, comment_id);
    let top = find_parent(comments, chain.last()?)?;
    top.line
}

/// Every thread rooted on `line`, in source order.
pub fn threads_for_line(comments: &[Comment], line: u32) -> Vec<Vec<&Comment>> {
    comments
        .iter()
        .filter(|c| c.is_root() && c.line == Some(line))
        .map(|root| build_thread(root, comments))
        .collect()
}

/// Ids the orphan cleanup removes: each orphan's ancestor chain and the
/// sub-thread hanging below it, deduplicated in discovery order.
pub fn cleanup_targets(comments: &[Comment]) -> Vec<CommentId> {
    let mut targets: Vec<CommentId> = Vec::new();
    let mut seen: HashSet<CommentId> = HashSet::new();

    for orphan in get_orphans(comments) {
        let chain = get_ancestor_chain(comments, &orphan.id);
        let below = build_thread(orphan, comments).into_iter().map(|c| c.id.clone());
        for id in chain.into_iter().chain(below) {
            if seen.insert(id.clone()) {
                targets.push(id);
            }
        }
    }

    tracing::debug!(count = targets.len(), "Computed orphan cleanup targets");
    targets
}

/// Text to render for `comment`, hiding the body of deleted comments.
pub fn display_content<'a>(comment: &'a Comment, placeholder: &'a str) -> &'a str {
    if comment.deleted {
        placeholder
    } else {
        &comment.content
    }
}
