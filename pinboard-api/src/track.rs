use serde_json::json;

use crate::{Comment, ModerationAction};

/// Analytics vocabulary: one entry per user-visible comment action.
/// Emission is always fire-and-forget; see the web crate's `api::track`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedAction {
    CommentCreated,
    ReplyCreated,
    CommentEdited,
    CommentPublished,
    CommentResolved,
    CommentReopened,
    CommentArchived,
    CommentDeleted,
}

impl From<ModerationAction> for TrackedAction {
    fn from(a: ModerationAction) -> TrackedAction {
        match a {
            ModerationAction::Publish => TrackedAction::CommentPublished,
            ModerationAction::Resolve => TrackedAction::CommentResolved,
            ModerationAction::Reopen => TrackedAction::CommentReopened,
            ModerationAction::Archive => TrackedAction::CommentArchived,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TrackEvent {
    pub event_type: TrackedAction,
    pub event_data: serde_json::Value,
}

impl TrackEvent {
    pub fn for_comment(event_type: TrackedAction, comment: &Comment) -> TrackEvent {
        TrackEvent {
            event_type,
            event_data: json!({
                "comment": comment.id.0,
                "state": comment.state,
                "anchored": comment.is_anchored(),
                "attachments": comment.attachments.len(),
            }),
        }
    }
}
