use uuid::Uuid;

use crate::{AttachmentId, CommentId, Error, NewAttachment, Time, UserId};

/// Lifecycle state of a comment; deletion is a separate irreversible
/// removal, not a state
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CommentState {
    Draft,
    Published,
    Resolved,
    Archived,
}

impl CommentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentState::Draft => "draft",
            CommentState::Published => "published",
            CommentState::Resolved => "resolved",
            CommentState::Archived => "archived",
        }
    }
}

/// Structural address of a node in the rendered artifact, eg.
/// `div.preview > section:nth-of-type(2) > p.note`
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Locator(pub String);

/// Viewer-relative pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub filename: String,
    pub byte_size: u64,
    pub content_type: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author_id: UserId,
    pub author_name: String,
    pub created_at: Time,

    /// Absent for a root comment; a dangling reference degrades to a root
    pub parent_id: Option<CommentId>,

    pub state: CommentState,

    pub element_selector: Option<Locator>,
    pub element_coordinates: Option<Point>,

    pub attachments: Vec<Attachment>,
}

impl Comment {
    pub fn is_anchored(&self) -> bool {
        self.element_coordinates.is_some()
    }
}

/// Creation request, sent as one multipart POST
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub id: CommentId,
    pub text: String,
    pub state: CommentState,
    pub parent_id: Option<CommentId>,
    pub element_selector: Option<Locator>,
    pub element_coordinates: Option<Point>,
    pub attachments: Vec<NewAttachment>,
}

impl NewComment {
    pub fn new(text: String, state: CommentState) -> NewComment {
        NewComment {
            id: CommentId(Uuid::new_v4()),
            text,
            state,
            parent_id: None,
            element_selector: None,
            element_coordinates: None,
            attachments: Vec::new(),
        }
    }

    // See comments on the other `validate` functions throughout pinboard-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_comment_text(&self.text)?;
        // resolved/archived are only reachable through moderation
        match self.state {
            CommentState::Draft | CommentState::Published => (),
            state => {
                return Err(Error::InvalidTransition {
                    from: state,
                    action: String::from("create"),
                })
            }
        }
        if let Some(l) = &self.element_selector {
            crate::validate_locator(l)?;
        }
        for a in &self.attachments {
            a.validate()?;
        }
        Ok(())
    }
}

/// Partial update: text edits and state transitions go through here
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CommentState>,
}

impl CommentPatch {
    pub fn set_text(text: String) -> CommentPatch {
        CommentPatch {
            text: Some(text),
            state: None,
        }
    }

    pub fn set_state(state: CommentState) -> CommentPatch {
        CommentPatch {
            text: None,
            state: Some(state),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(t) = &self.text {
            crate::validate_comment_text(t)?;
        }
        Ok(())
    }
}
