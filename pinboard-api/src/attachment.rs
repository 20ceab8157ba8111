use crate::Error;

pub const ATTACHMENT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Content-type allow-list for uploads
pub const ATTACHMENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "application/pdf",
    "text/plain",
];

/// Candidate file, checked before any bytes go on the wire
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewAttachment {
    pub filename: String,
    pub byte_size: u64,
    pub content_type: String,
}

impl NewAttachment {
    // See comments on the other `validate` functions throughout pinboard-api
    pub fn validate(&self) -> Result<(), Error> {
        validate_attachment(&self.filename, self.byte_size, &self.content_type)
    }
}

pub fn validate_attachment(
    filename: &str,
    byte_size: u64,
    content_type: &str,
) -> Result<(), Error> {
    if filename.is_empty() || filename.contains('\0') {
        return Err(Error::InvalidFilename(filename.to_string()));
    }
    if byte_size > ATTACHMENT_MAX_BYTES {
        return Err(Error::AttachmentTooLarge {
            size: byte_size,
            limit: ATTACHMENT_MAX_BYTES,
        });
    }
    if !ATTACHMENT_TYPES.contains(&content_type) {
        return Err(Error::UnsupportedAttachmentType(content_type.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_image() {
        assert_eq!(
            validate_attachment("shot.png", 9 * 1024 * 1024, "image/png"),
            Ok(())
        );
    }

    #[test]
    fn rejects_oversized_file() {
        let size = 11 * 1024 * 1024;
        assert_eq!(
            validate_attachment("video.pdf", size, "application/pdf"),
            Err(Error::AttachmentTooLarge {
                size,
                limit: ATTACHMENT_MAX_BYTES,
            })
        );
    }

    #[test]
    fn rejects_disallowed_type() {
        assert_eq!(
            validate_attachment("a.out", 1024, "application/x-executable"),
            Err(Error::UnsupportedAttachmentType(
                "application/x-executable".to_string()
            ))
        );
    }

    #[test]
    fn rejects_empty_filename() {
        assert_eq!(
            validate_attachment("", 1024, "image/png"),
            Err(Error::InvalidFilename(String::new()))
        );
    }
}
