use std::collections::{HashMap, HashSet};

use crate::api::{Comment, CommentId};

/// Rendering cap; deeper replies are summarized, never dropped from the tree
pub const MAX_THREAD_DEPTH: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct ThreadNode {
    pub comment: Comment,
    pub replies: Vec<ThreadNode>,
}

impl ThreadNode {
    /// Total reply count below this node, the whole subtree
    pub fn descendants(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&ThreadNode> = self.replies.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.replies.iter());
        }
        count
    }
}

/// Rebuilds the nested reply hierarchy from a flat comment collection.
///
/// A comment whose `parent_id` does not resolve degrades to a root rather
/// than erroring, and a parent-reference cycle is broken by promoting its
/// oldest member to a root, so no comment ever drops out of the view.
/// Roots come newest-first; within a thread replies are chronological,
/// recursively. Ids tie-break equal timestamps, so two builds of the same
/// input are structurally identical.
pub fn build(comments: &[Comment]) -> Vec<ThreadNode> {
    let known: HashSet<CommentId> = comments.iter().map(|c| c.id).collect();
    let mut children: HashMap<CommentId, Vec<Comment>> = HashMap::new();
    let mut roots: Vec<Comment> = Vec::new();
    for c in comments {
        match c.parent_id {
            Some(p) if p != c.id && known.contains(&p) => {
                children.entry(p).or_insert_with(Vec::new).push(c.clone())
            }
            _ => roots.push(c.clone()),
        }
    }

    // ids are client-supplied, so mutual parent references can arrive
    // through the wire; every such comment is unreachable from any root
    // until its cycle is cut
    let mut reachable: HashSet<CommentId> = roots.iter().map(|c| c.id).collect();
    mark_reachable(&mut reachable, roots.iter().map(|c| c.id).collect(), &children);
    loop {
        let Some(promoted) = children
            .values()
            .flatten()
            .filter(|c| !reachable.contains(&c.id))
            .min_by_key(|c| (c.created_at, c.id))
            .cloned()
        else {
            break;
        };
        if let Some(parent) = promoted.parent_id {
            if let Some(siblings) = children.get_mut(&parent) {
                siblings.retain(|c| c.id != promoted.id);
            }
        }
        reachable.insert(promoted.id);
        mark_reachable(&mut reachable, vec![promoted.id], &children);
        roots.push(promoted);
    }

    roots.sort_by_key(|c| (c.created_at, c.id));
    roots.reverse();
    roots
        .into_iter()
        .map(|root| assemble(root, &mut children))
        .collect()
}

fn mark_reachable(
    reachable: &mut HashSet<CommentId>,
    mut frontier: Vec<CommentId>,
    children: &HashMap<CommentId, Vec<Comment>>,
) {
    while let Some(id) = frontier.pop() {
        for child in children.get(&id).into_iter().flatten() {
            if reachable.insert(child.id) {
                frontier.push(child.id);
            }
        }
    }
}

/// Stack-based assembly; reply nesting is user input, so no recursion here
fn assemble(root: Comment, children: &mut HashMap<CommentId, Vec<Comment>>) -> ThreadNode {
    struct Frame {
        node: ThreadNode,
        // reversed, so pop() yields replies in chronological order
        pending: Vec<Comment>,
    }
    let new_frame = |comment: Comment, children: &mut HashMap<CommentId, Vec<Comment>>| {
        let mut pending = children.remove(&comment.id).unwrap_or_default();
        pending.sort_by_key(|c| (c.created_at, c.id));
        pending.reverse();
        Frame {
            node: ThreadNode {
                comment,
                replies: Vec::new(),
            },
            pending,
        }
    };

    let mut stack = vec![new_frame(root, children)];
    loop {
        let top = stack.last_mut().expect("assembly stack empty");
        if let Some(next) = top.pending.pop() {
            let frame = new_frame(next, children);
            stack.push(frame);
        } else {
            let done = stack.pop().expect("assembly stack empty");
            match stack.last_mut() {
                Some(parent) => parent.node.replies.push(done.node),
                None => return done.node,
            }
        }
    }
}

/// One row of the rendered thread view
#[derive(Clone, Debug, PartialEq)]
pub enum ThreadRow<'a> {
    Comment { node: &'a ThreadNode, depth: usize },
    /// "thread continues with N more replies"; the replies stay walkable
    /// through the tree itself, this only caps what gets expanded
    Continuation {
        parent: CommentId,
        hidden: usize,
        depth: usize,
    },
}

/// Flattens the tree into render order, cutting expansion at `max_depth`
/// levels and summarizing whatever lies below the cut.
pub fn visible_rows<'a>(roots: &'a [ThreadNode], max_depth: usize) -> Vec<ThreadRow<'a>> {
    let mut rows = Vec::new();
    let mut stack: Vec<(&ThreadNode, usize)> = roots.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        rows.push(ThreadRow::Comment { node, depth });
        if node.replies.is_empty() {
            continue;
        }
        if depth + 1 >= max_depth {
            rows.push(ThreadRow::Continuation {
                parent: node.comment.id,
                hidden: node.descendants(),
                depth: depth + 1,
            });
        } else {
            stack.extend(node.replies.iter().rev().map(|n| (n, depth + 1)));
        }
    }
    rows
}
