use std::{collections::HashMap, sync::Arc};

use crate::api::{Actor, ArtifactId, Comment, CommentId};
use crate::{pin, thread, Pin, ThreadNode};

/// In-memory dump of one artifact's comments, replaced wholesale on every
/// successful fetch. Pins and threads are derived views over it, never
/// patched incrementally.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentSet {
    pub artifact: ArtifactId,
    pub actor: Actor,
    pub comments: Arc<HashMap<CommentId, Comment>>,
}

impl CommentSet {
    pub fn stub() -> CommentSet {
        CommentSet {
            artifact: ArtifactId::stub(),
            actor: Actor {
                user: crate::api::UserId::stub(),
                is_owner: false,
            },
            comments: Arc::new(HashMap::new()),
        }
    }

    pub fn new(artifact: ArtifactId, actor: Actor) -> CommentSet {
        CommentSet {
            artifact,
            actor,
            comments: Arc::new(HashMap::new()),
        }
    }

    /// Replaces the whole collection with the latest fetch result
    pub fn reset(&mut self, comments: Vec<Comment>) {
        self.comments = Arc::new(comments.into_iter().map(|c| (c.id, c)).collect());
    }

    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Current pin layer, in deterministic cell order
    pub fn pins(&self, cell_size: f64) -> Vec<Pin> {
        pin::cluster(self.comments.values(), cell_size)
    }

    /// Current thread view, newest discussion first
    pub fn threads(&self) -> Vec<ThreadNode> {
        let mut comments: Vec<Comment> = self.comments.values().cloned().collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        thread::build(&comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{anchored, at, comment, reply};
    use crate::DEFAULT_CELL_SIZE;

    #[test]
    fn reset_replaces_rather_than_merges() {
        let mut set = CommentSet::stub();
        set.reset(vec![comment(1, at(1)), comment(2, at(2))]);
        assert_eq!(set.comments.len(), 2);
        set.reset(vec![comment(3, at(3))]);
        assert_eq!(set.comments.len(), 1);
        assert!(set
            .comment(&crate::api::CommentId(crate::api::Uuid::from_u128(1)))
            .is_none());
    }

    #[test]
    fn derivations_agree_with_the_collection() {
        let mut set = CommentSet::stub();
        set.reset(vec![
            anchored(1, at(1), 50.0, 50.0),
            reply(2, at(2), 1),
            comment(3, at(3)),
        ]);
        // only the anchored root gets a pin, everything threads
        let pins = set.pins(DEFAULT_CELL_SIZE);
        assert_eq!(pins.len(), 1);
        assert_eq!((pins[0].x, pins[0].y), (45.0, 45.0));
        let threads = set.threads();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[1].replies.len(), 1);
    }
}
