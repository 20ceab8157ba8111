use crate::{Comment, CommentState, Error, UserId};

/// Who is acting: the identity fact supplied by the surrounding page
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Actor {
    pub user: UserId,
    /// True for the owner of the annotated artifact's thread
    pub is_owner: bool,
}

impl Actor {
    pub fn is_author_of(&self, comment: &Comment) -> bool {
        self.user == comment.author_id
    }

    pub fn can_edit(&self, comment: &Comment) -> bool {
        self.is_author_of(comment) || self.is_owner
    }

    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.is_author_of(comment) || self.is_owner
    }
}

/// Lifecycle transitions a comment may undergo. Deletion is not listed:
/// it is an irreversible removal, allowed from any state to author/owner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Publish,
    Resolve,
    Reopen,
    Archive,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Publish => "publish",
            ModerationAction::Resolve => "resolve",
            ModerationAction::Reopen => "reopen",
            ModerationAction::Archive => "archive",
        }
    }

    /// Checks the transition against the current state and the actor's
    /// role, returning the target state.
    ///
    /// Archived is terminal: nothing moves a comment out of it.
    pub fn apply(&self, comment: &Comment, actor: &Actor) -> Result<CommentState, Error> {
        use CommentState::*;
        let invalid = || Error::InvalidTransition {
            from: comment.state,
            action: self.as_str().to_string(),
        };
        let target = match (comment.state, self) {
            (Draft, ModerationAction::Publish) => Published,
            (Published, ModerationAction::Resolve) => Resolved,
            (Resolved, ModerationAction::Reopen) => Published,
            (Draft | Published | Resolved, ModerationAction::Archive) => Archived,
            _ => return Err(invalid()),
        };
        let allowed = match self {
            ModerationAction::Publish => actor.is_author_of(comment),
            ModerationAction::Resolve | ModerationAction::Reopen => {
                actor.is_author_of(comment) || actor.is_owner
            }
            ModerationAction::Archive => actor.is_owner,
        };
        if !allowed {
            return Err(Error::PermissionDenied);
        }
        Ok(target)
    }

    /// Permission-and-state check without applying, for gating UI buttons
    pub fn is_allowed(&self, comment: &Comment, actor: &Actor) -> bool {
        self.apply(comment, actor).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommentId, Locator, Point};
    use uuid::Uuid;

    fn comment_in(state: CommentState, author: UserId) -> Comment {
        Comment {
            id: CommentId(Uuid::new_v4()),
            text: String::from("some text"),
            author_id: author,
            author_name: String::from("author"),
            created_at: chrono::Utc::now(),
            parent_id: None,
            state,
            element_selector: Some(Locator(String::from("div.preview > p"))),
            element_coordinates: Some(Point { x: 10.0, y: 20.0 }),
            attachments: Vec::new(),
        }
    }

    fn author() -> Actor {
        Actor {
            user: UserId::stub(),
            is_owner: false,
        }
    }

    fn owner() -> Actor {
        Actor {
            user: UserId(Uuid::new_v4()),
            is_owner: true,
        }
    }

    fn stranger() -> Actor {
        Actor {
            user: UserId(Uuid::new_v4()),
            is_owner: false,
        }
    }

    #[test]
    fn publish_is_author_only() {
        let c = comment_in(CommentState::Draft, UserId::stub());
        assert_eq!(
            ModerationAction::Publish.apply(&c, &author()),
            Ok(CommentState::Published)
        );
        assert_eq!(
            ModerationAction::Publish.apply(&c, &owner()),
            Err(Error::PermissionDenied)
        );
    }

    #[test]
    fn resolve_and_reopen_take_author_or_owner() {
        let c = comment_in(CommentState::Published, UserId::stub());
        assert_eq!(
            ModerationAction::Resolve.apply(&c, &author()),
            Ok(CommentState::Resolved)
        );
        assert_eq!(
            ModerationAction::Resolve.apply(&c, &owner()),
            Ok(CommentState::Resolved)
        );
        assert_eq!(
            ModerationAction::Resolve.apply(&c, &stranger()),
            Err(Error::PermissionDenied)
        );

        let c = comment_in(CommentState::Resolved, UserId::stub());
        assert_eq!(
            ModerationAction::Reopen.apply(&c, &owner()),
            Ok(CommentState::Published)
        );
    }

    #[test]
    fn archive_is_owner_only_from_any_live_state() {
        for state in [
            CommentState::Draft,
            CommentState::Published,
            CommentState::Resolved,
        ] {
            let c = comment_in(state, UserId::stub());
            assert_eq!(
                ModerationAction::Archive.apply(&c, &owner()),
                Ok(CommentState::Archived)
            );
            assert_eq!(
                ModerationAction::Archive.apply(&c, &author()),
                Err(Error::PermissionDenied)
            );
        }
    }

    #[test]
    fn archived_is_terminal() {
        let c = comment_in(CommentState::Archived, UserId::stub());
        for action in [
            ModerationAction::Publish,
            ModerationAction::Resolve,
            ModerationAction::Reopen,
            ModerationAction::Archive,
        ] {
            assert_eq!(
                action.apply(&c, &owner()),
                Err(Error::InvalidTransition {
                    from: CommentState::Archived,
                    action: action.as_str().to_string(),
                })
            );
        }
        // deletion stays available even for archived comments
        assert!(owner().can_delete(&c));
        assert!(author().can_delete(&c));
        assert!(!stranger().can_delete(&c));
    }

    #[test]
    fn state_mismatch_reports_invalid_transition_before_permission() {
        // resolving a draft is a bad transition whoever asks
        let c = comment_in(CommentState::Draft, UserId::stub());
        assert_eq!(
            ModerationAction::Resolve.apply(&c, &stranger()),
            Err(Error::InvalidTransition {
                from: CommentState::Draft,
                action: String::from("resolve"),
            })
        );
    }
}
