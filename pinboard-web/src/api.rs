use anyhow::{anyhow, Context};
use pinboard_client::api::{
    self, Comment, CommentId, CommentPatch, NewAttachment, NewComment, TrackEvent,
};
use wasm_bindgen_futures::spawn_local;

use crate::Session;

/// Attachment candidate plus the bytes already read from the picked file
#[derive(Clone, Debug)]
pub struct AttachmentUpload {
    pub meta: NewAttachment,
    pub bytes: Vec<u8>,
}

#[derive(serde::Deserialize)]
struct CommentList {
    comments: Vec<Comment>,
}

async fn check(resp: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.bytes().await.context("reading error response")?;
    match api::Error::parse(&body) {
        Ok(e) => Err(anyhow!(e)),
        Err(_) => Err(anyhow!("server returned {status}")),
    }
}

pub async fn fetch_comments(session: &Session) -> anyhow::Result<Vec<Comment>> {
    let resp = crate::CLIENT
        .get(format!(
            "{}/comments?scope={}",
            session.host, session.artifact.0
        ))
        .send()
        .await
        .context("fetching comments")?;
    Ok(check(resp)
        .await?
        .json::<CommentList>()
        .await
        .context("parsing comment list")?
        .comments)
}

pub async fn create_comment(
    session: &Session,
    new: NewComment,
    uploads: Vec<AttachmentUpload>,
    subscribe: bool,
) -> anyhow::Result<Comment> {
    new.validate().map_err(|e| anyhow!(e))?;
    let mut form = reqwest::multipart::Form::new()
        .text("id", new.id.0.to_string())
        .text("text", new.text)
        .text("state", new.state.as_str().to_string())
        .text("subscribe", subscribe.to_string());
    if let Some(parent) = new.parent_id {
        form = form.text("parentId", parent.0.to_string());
    }
    if let Some(locator) = new.element_selector {
        form = form.text("elementSelector", locator.0);
    }
    if let Some(coords) = new.element_coordinates {
        form = form.text(
            "elementCoordinates",
            serde_json::to_string(&coords).context("serializing coordinates")?,
        );
    }
    for upload in uploads {
        form = form.part(
            "attachments[]",
            reqwest::multipart::Part::bytes(upload.bytes)
                .file_name(upload.meta.filename)
                .mime_str(&upload.meta.content_type)
                .context("setting attachment content type")?,
        );
    }
    let resp = crate::CLIENT
        .post(format!("{}/comments", session.host))
        .multipart(form)
        .send()
        .await
        .context("creating comment")?;
    check(resp)
        .await?
        .json()
        .await
        .context("parsing created comment")
}

pub async fn update_comment(
    session: &Session,
    id: CommentId,
    patch: CommentPatch,
) -> anyhow::Result<Comment> {
    patch.validate().map_err(|e| anyhow!(e))?;
    let resp = crate::CLIENT
        .put(format!("{}/comments/{}", session.host, id.0))
        .json(&patch)
        .send()
        .await
        .context("updating comment")?;
    check(resp)
        .await?
        .json()
        .await
        .context("parsing updated comment")
}

pub async fn delete_comment(session: &Session, id: CommentId) -> anyhow::Result<()> {
    let resp = crate::CLIENT
        .delete(format!("{}/comments/{}", session.host, id.0))
        .send()
        .await
        .context("deleting comment")?;
    check(resp).await?;
    Ok(())
}

/// Fire-and-forget: analytics must never block or fail the action it
/// describes, so failures are logged and dropped.
pub fn track(session: &Session, event: TrackEvent) {
    let url = format!("{}/analytics/track", session.host);
    spawn_local(async move {
        let resp = crate::CLIENT.post(url).json(&event).send().await;
        match resp {
            Err(e) => tracing::warn!("failed to emit analytics event: {e:?}"),
            Ok(resp) if !resp.status().is_success() => {
                tracing::warn!("analytics endpoint answered {}", resp.status())
            }
            Ok(_) => (),
        }
    });
}

/// Reads a picked file's bytes up front so validation errors surface
/// before submit while the bytes are ready when it happens
pub async fn read_file(file: web_sys::File) -> anyhow::Result<AttachmentUpload> {
    let meta = NewAttachment {
        filename: file.name(),
        byte_size: file.size() as u64,
        content_type: file.type_(),
    };
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| anyhow!("reading file: {e:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(AttachmentUpload { meta, bytes })
}
