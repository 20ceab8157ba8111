use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde_json::json;
use uuid::Uuid;

use crate::CommentState;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Unknown comment {0}")]
    UnknownComment(Uuid),

    #[error("Uuid already used {0}")]
    UuidAlreadyUsed(Uuid),

    #[error("Comment text is empty")]
    EmptyText,

    #[error("Comment text is {len} characters, above the limit of {limit}")]
    TextTooLong { len: usize, limit: usize },

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Invalid element locator {0:?}")]
    InvalidLocator(String),

    #[error("Invalid attachment filename {0:?}")]
    InvalidFilename(String),

    #[error("Attachment is {size} bytes, above the limit of {limit}")]
    AttachmentTooLarge { size: u64, limit: u64 },

    #[error("Attachment content type {0:?} is not allowed")]
    UnsupportedAttachmentType(String),

    #[error("Cannot {action} a comment in state {from:?}")]
    InvalidTransition { from: CommentState, action: String },
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::UnknownComment(_) => StatusCode::NOT_FOUND,
            Error::UuidAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::EmptyText => StatusCode::BAD_REQUEST,
            Error::TextTooLong { .. } => StatusCode::BAD_REQUEST,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::InvalidLocator(_) => StatusCode::BAD_REQUEST,
            Error::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            Error::AttachmentTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::UnsupportedAttachmentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::InvalidTransition { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::UnknownComment(u) => json!({
                "message": "unknown comment",
                "type": "unknown-comment",
                "uuid": u,
            }),
            Error::UuidAlreadyUsed(u) => json!({
                "message": "uuid conflict",
                "type": "conflict-uuid",
                "uuid": u,
            }),
            Error::EmptyText => json!({
                "message": "comment text is empty",
                "type": "empty-text",
            }),
            Error::TextTooLong { len, limit } => json!({
                "message": "comment text is too long",
                "type": "text-too-long",
                "len": len,
                "limit": limit,
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::InvalidLocator(l) => json!({
                "message": "element locator is invalid",
                "type": "invalid-locator",
                "locator": l,
            }),
            Error::InvalidFilename(f) => json!({
                "message": "attachment filename is invalid",
                "type": "invalid-filename",
                "filename": f,
            }),
            Error::AttachmentTooLarge { size, limit } => json!({
                "message": "attachment is too large",
                "type": "attachment-too-large",
                "size": size,
                "limit": limit,
            }),
            Error::UnsupportedAttachmentType(t) => json!({
                "message": "attachment content type is not allowed",
                "type": "unsupported-attachment-type",
                "content-type": t,
            }),
            Error::InvalidTransition { from, action } => json!({
                "message": "invalid state transition",
                "type": "invalid-transition",
                "from": from,
                "action": action,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let get_str = |field: &str| -> anyhow::Result<String> {
            Ok(String::from(
                data.get(field)
                    .and_then(|f| f.as_str())
                    .ok_or_else(|| anyhow!("error field {field:?} is not a string"))?,
            ))
        };
        let get_u64 = |field: &str| -> anyhow::Result<u64> {
            data.get(field)
                .and_then(|f| f.as_u64())
                .ok_or_else(|| anyhow!("error field {field:?} is not an integer"))
        };
        let get_uuid = || -> anyhow::Result<Uuid> {
            data.get("uuid")
                .and_then(|uuid| uuid.as_str())
                .and_then(|uuid| Uuid::from_str(uuid).ok())
                .ok_or_else(|| anyhow!("error does not carry a proper uuid"))
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(String::from(
                    data.get("message")
                        .and_then(|msg| msg.as_str())
                        .unwrap_or(""),
                )),
                "permission-denied" => Error::PermissionDenied,
                "unknown-comment" => Error::UnknownComment(get_uuid()?),
                "conflict-uuid" => Error::UuidAlreadyUsed(get_uuid()?),
                "empty-text" => Error::EmptyText,
                "text-too-long" => Error::TextTooLong {
                    len: get_u64("len")? as usize,
                    limit: get_u64("limit")? as usize,
                },
                "null-byte" => Error::NullByteInString(get_str("string")?),
                "invalid-locator" => Error::InvalidLocator(get_str("locator")?),
                "invalid-filename" => Error::InvalidFilename(get_str("filename")?),
                "attachment-too-large" => Error::AttachmentTooLarge {
                    size: get_u64("size")?,
                    limit: get_u64("limit")?,
                },
                "unsupported-attachment-type" => {
                    Error::UnsupportedAttachmentType(get_str("content-type")?)
                }
                "invalid-transition" => Error::InvalidTransition {
                    from: serde_json::from_value(
                        data.get("from")
                            .ok_or_else(|| anyhow!("error does not carry a from state"))?
                            .clone(),
                    )
                    .context("parsing from state")?,
                    action: get_str("action")?,
                },
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
