use std::rc::Rc;

use pinboard_client::{
    api::{Actor, Comment, CommentId, CommentState, ModerationAction},
    visible_rows, ThreadNode, ThreadRow, MAX_THREAD_DEPTH,
};
use yew::prelude::*;

use crate::{ui, Session};

#[derive(Clone, PartialEq, Properties)]
pub struct ThreadPanelProps {
    pub session: Session,
    pub threads: Rc<Vec<ThreadNode>>,
    pub actor: Actor,
    pub on_posted: Callback<Comment>,
    pub on_act: Callback<(CommentId, ModerationAction)>,
    pub on_edit: Callback<(CommentId, String)>,
    pub on_delete: Callback<CommentId>,
    pub on_close: Callback<()>,
}

/// Full-thread view with moderation controls. Renders the capped row
/// flattening of the reply trees; every action round-trips through the
/// store and a full re-fetch, so this holds no comment state of its own.
#[function_component(ThreadPanel)]
pub fn thread_panel(p: &ThreadPanelProps) -> Html {
    let rows = visible_rows(&p.threads, MAX_THREAD_DEPTH);
    html! {
        <div class="pinboard-ui pinboard-thread-panel">
            <div class="pinboard-thread-panel-header">
                <span>{ "Discussion" }</span>
                <button
                    type="button"
                    class="btn btn-light"
                    aria-label="Close"
                    onclick={ p.on_close.reform(|_| ()) }
                >{ "x" }</button>
            </div>
            { for rows.iter().map(|row| match row {
                ThreadRow::Comment { node, depth } => html! {
                    <CommentCard
                        key={ node.comment.id.0.to_string() }
                        comment={ node.comment.clone() }
                        depth={ *depth }
                        session={ p.session.clone() }
                        actor={ p.actor }
                        on_posted={ p.on_posted.clone() }
                        on_act={ p.on_act.clone() }
                        on_edit={ p.on_edit.clone() }
                        on_delete={ p.on_delete.clone() }
                    />
                },
                ThreadRow::Continuation { hidden, depth, .. } => html! {
                    <div
                        class="pinboard-thread-continuation"
                        style={ format!("margin-left: {}em;", depth) }
                    >
                        { format!("Thread continues with {hidden} more replies") }
                    </div>
                },
            }) }
            { for p.threads.is_empty().then(|| html! {
                <div class="pinboard-thread-empty">{ "No comments yet" }</div>
            }) }
        </div>
    }
}

#[derive(Clone, PartialEq, Properties)]
struct CommentCardProps {
    comment: Comment,
    depth: usize,
    session: Session,
    actor: Actor,
    on_posted: Callback<Comment>,
    on_act: Callback<(CommentId, ModerationAction)>,
    on_edit: Callback<(CommentId, String)>,
    on_delete: Callback<CommentId>,
}

#[function_component(CommentCard)]
fn comment_card(p: &CommentCardProps) -> Html {
    let reply_open = use_state(|| false);
    let edit = use_state(|| None::<String>);

    let state_badge = match p.comment.state {
        CommentState::Draft => "draft",
        CommentState::Published => "",
        CommentState::Resolved => "resolved",
        CommentState::Archived => "archived",
    };

    let moderation_buttons = [
        (ModerationAction::Publish, "Publish"),
        (ModerationAction::Resolve, "Resolve"),
        (ModerationAction::Reopen, "Reopen"),
        (ModerationAction::Archive, "Archive"),
    ]
    .into_iter()
    .filter(|(action, _)| action.is_allowed(&p.comment, &p.actor))
    .map(|(action, label)| {
        let id = p.comment.id;
        html! {
            <button
                type="button"
                class="btn btn-sm btn-light"
                onclick={ p.on_act.reform(move |_| (id, action)) }
            >{ label }</button>
        }
    })
    .collect::<Html>();

    let body = match (*edit).clone() {
        None => html! {
            <div
                class="pinboard-comment-text"
                ondblclick={
                    let can_edit = p.actor.can_edit(&p.comment);
                    let edit = edit.clone();
                    let text = p.comment.text.clone();
                    Callback::from(move |_| {
                        if can_edit {
                            edit.set(Some(text.clone()))
                        }
                    })
                }
            >
                { &p.comment.text }
            </div>
        },
        Some(text) => {
            let on_save = {
                let id = p.comment.id;
                let edit = edit.clone();
                let text = text.clone();
                p.on_edit.reform(move |_| {
                    edit.set(None);
                    (id, text.clone())
                })
            };
            let on_input = {
                let edit = edit.clone();
                Callback::from(move |e: web_sys::Event| {
                    let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                    edit.set(Some(input.value()));
                })
            };
            let on_cancel = {
                let edit = edit.clone();
                Callback::from(move |_| edit.set(None))
            };
            html! {
                <div class="pinboard-comment-edit">
                    <textarea value={ text } onchange={ on_input }></textarea>
                    <button type="button" class="btn btn-sm btn-primary" onclick={ on_save }>
                        { "Save" }
                    </button>
                    <button type="button" class="btn btn-sm btn-light" onclick={ on_cancel }>
                        { "Cancel" }
                    </button>
                </div>
            }
        }
    };

    html! {
        <div
            class="pinboard-comment"
            style={ format!("margin-left: {}em;", p.depth) }
        >
            <div class="pinboard-comment-meta">
                <span class="pinboard-comment-author">{ &p.comment.author_name }</span>
                <span class="pinboard-comment-date">
                    { p.comment.created_at.format("%Y-%m-%d %H:%M").to_string() }
                </span>
                { for (!state_badge.is_empty()).then(|| html! {
                    <span class="pinboard-comment-state">{ state_badge }</span>
                }) }
            </div>
            { body }
            { for (!p.comment.attachments.is_empty()).then(|| html! {
                <ul class="pinboard-comment-attachments">
                    { for p.comment.attachments.iter().map(|a| html! {
                        <li><a href={ a.url.clone() }>{ &a.filename }</a></li>
                    }) }
                </ul>
            }) }
            <div class="pinboard-comment-actions">
                <button
                    type="button"
                    class="btn btn-sm btn-light"
                    onclick={
                        let reply_open = reply_open.clone();
                        Callback::from(move |_| reply_open.set(true))
                    }
                >{ "Reply" }</button>
                { moderation_buttons }
                { for p.actor.can_delete(&p.comment).then(|| html! {
                    <button
                        type="button"
                        class="btn btn-sm btn-light"
                        onclick={
                            let id = p.comment.id;
                            p.on_delete.reform(move |_| id)
                        }
                    >{ "Delete" }</button>
                }) }
            </div>
            { for (*reply_open).then(|| html! {
                <ui::Composer
                    session={ p.session.clone() }
                    placement={ None::<ui::Placement> }
                    parent_id={ Some(p.comment.id) }
                    on_posted={ p.on_posted.clone() }
                    on_close={
                        let reply_open = reply_open.clone();
                        Callback::from(move |_| reply_open.set(false))
                    }
                />
            }) }
        </div>
    }
}
