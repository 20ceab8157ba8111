use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

mod attachment;
pub use attachment::{
    validate_attachment, NewAttachment, ATTACHMENT_MAX_BYTES, ATTACHMENT_TYPES,
};

mod comment;
pub use comment::{Attachment, Comment, CommentPatch, CommentState, Locator, NewComment, Point};

mod error;
pub use error::Error;

mod moderation;
pub use moderation::{Actor, ModerationAction};

mod track;
pub use track::{TrackEvent, TrackedAction};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct AttachmentId(pub Uuid);

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ArtifactId(pub Uuid);

impl ArtifactId {
    pub fn stub() -> ArtifactId {
        ArtifactId(STUB_UUID)
    }
}

/// One authoritative cap on comment text, enforced on both sides of the wire
pub const MAX_COMMENT_TEXT_LEN: usize = 5000;

// See comments on the other `validate` functions throughout pinboard-api
pub fn validate_comment_text(text: &str) -> Result<(), Error> {
    if text.trim().is_empty() {
        return Err(Error::EmptyText);
    }
    if text.chars().count() > MAX_COMMENT_TEXT_LEN {
        return Err(Error::TextTooLong {
            len: text.chars().count(),
            limit: MAX_COMMENT_TEXT_LEN,
        });
    }
    if text.contains('\0') {
        return Err(Error::NullByteInString(text.to_string()));
    }
    Ok(())
}

pub fn validate_locator(locator: &Locator) -> Result<(), Error> {
    if locator.0.is_empty() {
        return Err(Error::InvalidLocator(String::new()));
    }
    if locator.0.contains('\0') {
        return Err(Error::NullByteInString(locator.0.clone()));
    }
    Ok(())
}
