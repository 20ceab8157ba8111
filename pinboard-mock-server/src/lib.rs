//! In-memory stand-in for the comment persistence API, mirroring the
//! list/create/update/delete surface the web client consumes. Tests drive
//! it directly; it enforces the same validation a real server would.

use std::collections::{btree_map, BTreeMap};

use pinboard_api::{
    Actor, ArtifactId, Attachment, AttachmentId, Comment, CommentId, CommentPatch, CommentState,
    Error, ModerationAction, NewComment, TrackEvent, Uuid,
};

pub struct MockServer {
    comments: BTreeMap<ArtifactId, BTreeMap<CommentId, Comment>>,
    tracked: Vec<TrackEvent>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            comments: BTreeMap::new(),
            tracked: Vec::new(),
        }
    }

    /// GET /comments?scope=<artifact>
    pub fn list_comments(&self, scope: ArtifactId) -> Vec<Comment> {
        self.comments
            .get(&scope)
            .map(|store| store.values().cloned().collect())
            .unwrap_or_default()
    }

    /// POST /comments (multipart)
    pub fn create_comment(
        &mut self,
        scope: ArtifactId,
        author: &Actor,
        author_name: String,
        new: NewComment,
    ) -> Result<Comment, Error> {
        new.validate()?;
        let store = self.comments.entry(scope).or_insert_with(BTreeMap::new);
        let comment = Comment {
            id: new.id,
            text: new.text,
            author_id: author.user,
            author_name,
            created_at: chrono::Utc::now(),
            // a dangling parent is not an error: the client degrades it to a root
            parent_id: new.parent_id,
            state: new.state,
            element_selector: new.element_selector,
            element_coordinates: new.element_coordinates,
            attachments: new
                .attachments
                .into_iter()
                .map(|a| {
                    let id = AttachmentId(Uuid::new_v4());
                    Attachment {
                        url: format!("/attachments/{}/{}", id.0, a.filename),
                        id,
                        filename: a.filename,
                        byte_size: a.byte_size,
                        content_type: a.content_type,
                    }
                })
                .collect(),
        };
        match store.entry(comment.id) {
            btree_map::Entry::Occupied(_) => Err(Error::UuidAlreadyUsed(comment.id.0)),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(comment.clone());
                Ok(comment)
            }
        }
    }

    /// PUT /comments/{id}
    pub fn update_comment(
        &mut self,
        scope: ArtifactId,
        actor: &Actor,
        id: CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, Error> {
        patch.validate()?;
        let comment = self
            .comments
            .get_mut(&scope)
            .and_then(|store| store.get_mut(&id))
            .ok_or(Error::UnknownComment(id.0))?;
        if let Some(state) = patch.state {
            let action = action_for(comment.state, state)?;
            // apply re-checks role and transition against the stored state
            let next = action.apply(comment, actor)?;
            comment.state = next;
        }
        if let Some(text) = patch.text {
            if !actor.can_edit(comment) {
                return Err(Error::PermissionDenied);
            }
            comment.text = text;
        }
        Ok(comment.clone())
    }

    /// DELETE /comments/{id}
    pub fn delete_comment(
        &mut self,
        scope: ArtifactId,
        actor: &Actor,
        id: CommentId,
    ) -> Result<(), Error> {
        let store = self
            .comments
            .get_mut(&scope)
            .ok_or(Error::UnknownComment(id.0))?;
        let comment = store.get(&id).ok_or(Error::UnknownComment(id.0))?;
        if !actor.can_delete(comment) {
            return Err(Error::PermissionDenied);
        }
        // attachments live and die with their parent
        store.remove(&id);
        Ok(())
    }

    /// POST /analytics/track — recorded so tests can assert emission
    pub fn track(&mut self, event: TrackEvent) {
        self.tracked.push(event);
    }

    pub fn tracked(&self) -> &[TrackEvent] {
        &self.tracked
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

/// Maps a requested state change onto the transition vocabulary; pairs
/// outside it (archived → anything included) are invalid
fn action_for(from: CommentState, to: CommentState) -> Result<ModerationAction, Error> {
    use CommentState::*;
    match (from, to) {
        (Draft, Published) => Ok(ModerationAction::Publish),
        (Published, Resolved) => Ok(ModerationAction::Resolve),
        (Resolved, Published) => Ok(ModerationAction::Reopen),
        (Draft | Published | Resolved, Archived) => Ok(ModerationAction::Archive),
        (from, to) => Err(Error::InvalidTransition {
            from,
            action: format!("set state to {}", to.as_str()),
        }),
    }
}
