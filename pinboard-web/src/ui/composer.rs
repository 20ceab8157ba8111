use pinboard_client::api::{
    Comment, CommentId, CommentState, NewComment, MAX_COMMENT_TEXT_LEN,
};
use yew::prelude::*;

use crate::{
    api::{self, AttachmentUpload},
    ui::Placement,
    Session,
};

#[derive(Clone, PartialEq, Properties)]
pub struct ComposerProps {
    pub session: Session,
    /// Set when composing a new anchored comment
    pub placement: Option<Placement>,
    /// Set when replying inside a thread
    pub parent_id: Option<CommentId>,
    pub on_posted: Callback<Comment>,
    pub on_close: Callback<()>,
}

pub enum ComposerMsg {
    SetText(String),
    ToggleDraft,
    ToggleSubscribe,
    FilesPicked(Vec<web_sys::File>),
    FileRead(Box<Result<AttachmentUpload, String>>),
    RemoveAttachment(usize),
    Submit,
    Posted(Box<Result<Comment, String>>),
}

struct Slot {
    upload: AttachmentUpload,
    /// Validation failure, shown inline; any set error blocks submission
    error: Option<String>,
}

/// Create/reply form. Validation failures and submission errors keep the
/// form contents intact; only a successful post clears it.
pub struct Composer {
    text: String,
    as_draft: bool,
    subscribe: bool,
    slots: Vec<Slot>,
    error: Option<String>,
    submitting: bool,
}

impl Composer {
    fn check_submittable(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err(String::from("Write some text before submitting"));
        }
        if self.text.chars().count() > MAX_COMMENT_TEXT_LEN {
            return Err(format!(
                "Comment is over the {MAX_COMMENT_TEXT_LEN} character limit"
            ));
        }
        if self.slots.iter().any(|s| s.error.is_some()) {
            return Err(String::from("Remove the invalid attachments first"));
        }
        Ok(())
    }
}

impl Component for Composer {
    type Message = ComposerMsg;
    type Properties = ComposerProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Composer {
            text: String::new(),
            as_draft: false,
            subscribe: false,
            slots: Vec::new(),
            error: None,
            submitting: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ComposerMsg::SetText(text) => self.text = text,
            ComposerMsg::ToggleDraft => self.as_draft = !self.as_draft,
            ComposerMsg::ToggleSubscribe => self.subscribe = !self.subscribe,
            ComposerMsg::FilesPicked(files) => {
                for file in files {
                    ctx.link().send_future(async move {
                        ComposerMsg::FileRead(Box::new(
                            api::read_file(file).await.map_err(|e| format!("{e:#}")),
                        ))
                    });
                }
            }
            ComposerMsg::FileRead(result) => match *result {
                Ok(upload) => {
                    let error = upload.meta.validate().err().map(|e| e.to_string());
                    self.slots.push(Slot { upload, error });
                }
                Err(e) => self.error = Some(e),
            },
            ComposerMsg::RemoveAttachment(i) => {
                if i < self.slots.len() {
                    self.slots.remove(i);
                }
            }
            ComposerMsg::Submit => {
                if self.submitting {
                    return false;
                }
                if let Err(e) = self.check_submittable() {
                    self.error = Some(e);
                    return true;
                }
                self.error = None;
                self.submitting = true;

                let state = match self.as_draft {
                    true => CommentState::Draft,
                    false => CommentState::Published,
                };
                let mut new = NewComment::new(self.text.clone(), state);
                new.parent_id = ctx.props().parent_id;
                if let Some(placement) = &ctx.props().placement {
                    new.element_selector = placement.locator.clone();
                    new.element_coordinates = Some(placement.coords);
                }
                for slot in &self.slots {
                    new.attachments.push(slot.upload.meta.clone());
                }
                let uploads: Vec<AttachmentUpload> =
                    self.slots.iter().map(|s| s.upload.clone()).collect();
                let session = ctx.props().session.clone();
                let subscribe = self.subscribe;
                ctx.link().send_future(async move {
                    ComposerMsg::Posted(Box::new(
                        api::create_comment(&session, new, uploads, subscribe)
                            .await
                            .map_err(|e| format!("{e:#}")),
                    ))
                });
            }
            ComposerMsg::Posted(result) => {
                self.submitting = false;
                match *result {
                    Ok(comment) => {
                        self.text = String::new();
                        self.slots.clear();
                        self.error = None;
                        ctx.props().on_posted.emit(comment);
                        ctx.props().on_close.emit(());
                    }
                    // keep everything the user typed; no automatic retry
                    Err(e) => self.error = Some(e),
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let on_text = ctx.link().callback(|e: web_sys::Event| {
            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            ComposerMsg::SetText(input.value())
        });
        let on_files = ctx.link().callback(|e: web_sys::Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let mut files = Vec::new();
            if let Some(list) = input.files() {
                for i in 0..list.length() {
                    if let Some(f) = list.item(i) {
                        files.push(f);
                    }
                }
            }
            input.set_value("");
            ComposerMsg::FilesPicked(files)
        });
        let remaining = MAX_COMMENT_TEXT_LEN.saturating_sub(self.text.chars().count());
        let kind = match ctx.props().parent_id {
            Some(_) => "pinboard-composer-reply",
            None => "pinboard-composer-new",
        };

        html! {
            <div class={ classes!("pinboard-ui", "pinboard-composer", kind) }>
                { for self.error.as_ref().map(|e| html! {
                    <div class="alert alert-danger" role="alert">{ e }</div>
                }) }
                <textarea
                    value={ self.text.clone() }
                    placeholder="Leave a comment"
                    onchange={ on_text }
                ></textarea>
                <div class="pinboard-composer-counter">
                    { format!("{remaining} characters left") }
                </div>
                <input type="file" multiple=true onchange={ on_files } />
                <ul class="pinboard-composer-attachments">
                    { for self.slots.iter().enumerate().map(|(i, slot)| html! {
                        <li class={ classes!(slot.error.is_some().then(|| "is-invalid")) }>
                            { &slot.upload.meta.filename }
                            { for slot.error.as_ref().map(|e| html! {
                                <span class="pinboard-attachment-error">{ e }</span>
                            }) }
                            <button
                                type="button"
                                class="btn btn-sm"
                                aria-label="Remove attachment"
                                onclick={ ctx.link().callback(move |_| ComposerMsg::RemoveAttachment(i)) }
                            >{ "x" }</button>
                        </li>
                    }) }
                </ul>
                <label>
                    <input
                        type="checkbox"
                        checked={ self.as_draft }
                        onchange={ ctx.link().callback(|_| ComposerMsg::ToggleDraft) }
                    />
                    { "Save as draft" }
                </label>
                <label>
                    <input
                        type="checkbox"
                        checked={ self.subscribe }
                        onchange={ ctx.link().callback(|_| ComposerMsg::ToggleSubscribe) }
                    />
                    { "Subscribe to updates" }
                </label>
                <div class="pinboard-composer-actions">
                    <button
                        type="button"
                        class="btn btn-primary"
                        disabled={ self.submitting }
                        onclick={ ctx.link().callback(|_| ComposerMsg::Submit) }
                    >
                        { if self.submitting { "Sending..." } else { "Send" } }
                    </button>
                    <button
                        type="button"
                        class="btn btn-light"
                        onclick={ ctx.props().on_close.reform(|_| ()) }
                    >
                        { "Cancel" }
                    </button>
                </div>
            </div>
        }
    }
}
