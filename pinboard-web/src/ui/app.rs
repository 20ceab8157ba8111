use std::rc::Rc;

use pinboard_client::{
    api::{
        Actor, Comment, CommentId, CommentPatch, Locator, ModerationAction, Point, TrackEvent,
        TrackedAction,
    },
    CommentSet, RefreshGuard, DEFAULT_CELL_SIZE,
};
use yew::prelude::*;

use crate::{api, dom::DomTree, ui, Session};

#[derive(Clone, PartialEq, Properties)]
pub struct AppProps {
    pub session: Session,
}

/// Placement capture result: where the user clicked and what the click
/// landed on, if anything anchorable
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub coords: Point,
    pub locator: Option<Locator>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Idle,
    Placing,
}

pub enum AppMsg {
    ToggleMode,
    TogglePins,
    TogglePanel,
    PlacementCaptured(Placement),
    CloseComposer,
    SelectPin(String),

    CommentPosted(Comment),
    Act(CommentId, ModerationAction),
    EditText(CommentId, String),
    Delete(CommentId),
    MutationDone,
    MutationFailed(String),

    Reload,
    ReceivedComments {
        generation: u64,
        comments: Vec<Comment>,
    },
    RefreshFailed {
        generation: u64,
        error: String,
    },
    DismissError,
}

/// Owns the placement-mode toggle, the fetched comment collection and
/// everything derived from it. Every mutation is followed by a full
/// re-fetch; the refresh guard drops out-of-order responses.
pub struct App {
    set: CommentSet,
    guard: RefreshGuard,
    mode: Mode,
    show_pins: bool,
    panel_open: bool,
    selected_pin: Option<String>,
    placement: Option<Placement>,
    initial_load_completed: bool,
    last_error: Option<String>,
}

impl App {
    fn actor(&self, ctx: &Context<Self>) -> Actor {
        let session = &ctx.props().session;
        Actor {
            user: session.user,
            is_owner: session.is_owner,
        }
    }

    fn reload(&mut self, ctx: &Context<Self>) {
        let generation = self.guard.begin();
        let session = ctx.props().session.clone();
        ctx.link().send_future(async move {
            match api::fetch_comments(&session).await {
                Ok(comments) => AppMsg::ReceivedComments {
                    generation,
                    comments,
                },
                Err(e) => AppMsg::RefreshFailed {
                    generation,
                    error: format!("{e:#}"),
                },
            }
        });
    }

    /// Applies a moderation action remotely, emitting analytics on success
    fn moderate(&self, ctx: &Context<Self>, id: CommentId, action: ModerationAction) {
        let Some(comment) = self.set.comment(&id).cloned() else {
            return;
        };
        let target = match action.apply(&comment, &self.set.actor) {
            Ok(target) => target,
            Err(e) => {
                // the button should have been disabled
                tracing::warn!("rejected {} on {:?}: {e}", action.as_str(), id);
                return;
            }
        };
        let session = ctx.props().session.clone();
        ctx.link().send_future(async move {
            match api::update_comment(&session, id, CommentPatch::set_state(target)).await {
                Ok(updated) => {
                    api::track(
                        &session,
                        TrackEvent::for_comment(TrackedAction::from(action), &updated),
                    );
                    AppMsg::MutationDone
                }
                Err(e) => AppMsg::MutationFailed(format!("{e:#}")),
            }
        });
    }

    fn edit_text(&self, ctx: &Context<Self>, id: CommentId, text: String) {
        let session = ctx.props().session.clone();
        ctx.link().send_future(async move {
            match api::update_comment(&session, id, CommentPatch::set_text(text)).await {
                Ok(updated) => {
                    api::track(
                        &session,
                        TrackEvent::for_comment(TrackedAction::CommentEdited, &updated),
                    );
                    AppMsg::MutationDone
                }
                Err(e) => AppMsg::MutationFailed(format!("{e:#}")),
            }
        });
    }

    fn delete(&self, ctx: &Context<Self>, id: CommentId) {
        let Some(comment) = self.set.comment(&id).cloned() else {
            return;
        };
        if !self.set.actor.can_delete(&comment) {
            tracing::warn!("rejected delete on {id:?}: permission denied");
            return;
        }
        let session = ctx.props().session.clone();
        ctx.link().send_future(async move {
            match api::delete_comment(&session, id).await {
                Ok(()) => {
                    api::track(
                        &session,
                        TrackEvent::for_comment(TrackedAction::CommentDeleted, &comment),
                    );
                    AppMsg::MutationDone
                }
                Err(e) => AppMsg::MutationFailed(format!("{e:#}")),
            }
        });
    }
}

impl Component for App {
    type Message = AppMsg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let session = &ctx.props().session;
        let actor = Actor {
            user: session.user,
            is_owner: session.is_owner,
        };
        let mut this = App {
            set: CommentSet::new(session.artifact, actor),
            guard: RefreshGuard::new(),
            mode: Mode::Idle,
            show_pins: true,
            panel_open: false,
            selected_pin: None,
            placement: None,
            initial_load_completed: false,
            last_error: None,
        };
        this.reload(ctx);
        this
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::ToggleMode => {
                self.mode = match self.mode {
                    Mode::Idle => Mode::Placing,
                    Mode::Placing => Mode::Idle,
                };
            }
            AppMsg::TogglePins => self.show_pins = !self.show_pins,
            AppMsg::TogglePanel => self.panel_open = !self.panel_open,
            AppMsg::PlacementCaptured(placement) => {
                // single-shot: the user re-toggles to place another comment
                self.mode = Mode::Idle;
                self.placement = Some(placement);
            }
            AppMsg::CloseComposer => self.placement = None,
            AppMsg::SelectPin(id) => {
                self.selected_pin = Some(id);
                self.panel_open = true;
            }
            AppMsg::CommentPosted(comment) => {
                let event_type = match comment.parent_id {
                    Some(_) => TrackedAction::ReplyCreated,
                    None => TrackedAction::CommentCreated,
                };
                api::track(
                    &ctx.props().session,
                    TrackEvent::for_comment(event_type, &comment),
                );
                self.placement = None;
                self.reload(ctx);
            }
            AppMsg::Act(id, action) => self.moderate(ctx, id, action),
            AppMsg::EditText(id, text) => self.edit_text(ctx, id, text),
            AppMsg::Delete(id) => self.delete(ctx, id),
            AppMsg::MutationDone => self.reload(ctx),
            AppMsg::MutationFailed(error) => self.last_error = Some(error),
            AppMsg::Reload => self.reload(ctx),
            AppMsg::ReceivedComments {
                generation,
                comments,
            } => {
                if !self.guard.admit(generation) {
                    return false;
                }
                self.set.reset(comments);
                self.initial_load_completed = true;
            }
            AppMsg::RefreshFailed { generation, error } => {
                if !self.guard.admit(generation) {
                    return false;
                }
                // keep showing the last good state, just say why it is stale
                self.last_error = Some(error);
            }
            AppMsg::DismissError => self.last_error = None,
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let tree = DomTree::for_artifact();
        let mut pins = self.set.pins(DEFAULT_CELL_SIZE);
        // the hint is about pins existing at all, not being on screen
        let no_pins_yet = pins.is_empty();
        if let Some(tree) = &tree {
            pins.retain(|p| p.is_visible(tree));
        }
        let pins = Rc::new(pins);
        let threads = Rc::new(self.set.threads());
        let actor = self.actor(ctx);

        let loading_banner = (!self.initial_load_completed)
            .then(|| html! { <div class="pinboard-ui pinboard-loading">{ "Loading comments..." }</div> });
        let error_banner = self.last_error.as_ref().map(|e| {
            html! {
                <div class="pinboard-ui pinboard-error alert alert-danger" role="alert">
                    { e }
                    <button
                        type="button"
                        class="btn-close"
                        aria-label="Dismiss"
                        onclick={ ctx.link().callback(|_| AppMsg::DismissError) }
                    ></button>
                </div>
            }
        });

        html! {
            <div class="pinboard-root">
                <ui::Toolbar
                    placing={ self.mode == Mode::Placing }
                    show_pins={ self.show_pins }
                    panel_open={ self.panel_open }
                    on_toggle_mode={ ctx.link().callback(|_| AppMsg::ToggleMode) }
                    on_toggle_pins={ ctx.link().callback(|_| AppMsg::TogglePins) }
                    on_toggle_panel={ ctx.link().callback(|_| AppMsg::TogglePanel) }
                />
                { for loading_banner }
                { for error_banner }
                { for (self.mode == Mode::Placing).then(|| html! {
                    <ui::CaptureSurface
                        show_hint={ no_pins_yet }
                        on_place={ ctx.link().callback(AppMsg::PlacementCaptured) }
                    />
                }) }
                { for self.show_pins.then(|| html! {
                    <ui::PinLayer
                        pins={ pins.clone() }
                        selected={ self.selected_pin.clone() }
                        on_select={ ctx.link().callback(AppMsg::SelectPin) }
                    />
                }) }
                { for self.placement.clone().map(|placement| html! {
                    <ui::Composer
                        session={ ctx.props().session.clone() }
                        placement={ Some(placement) }
                        parent_id={ None::<CommentId> }
                        on_posted={ ctx.link().callback(AppMsg::CommentPosted) }
                        on_close={ ctx.link().callback(|_| AppMsg::CloseComposer) }
                    />
                }) }
                { for self.panel_open.then(|| html! {
                    <ui::ThreadPanel
                        session={ ctx.props().session.clone() }
                        threads={ threads.clone() }
                        { actor }
                        on_posted={ ctx.link().callback(AppMsg::CommentPosted) }
                        on_act={ ctx.link().callback(|(id, action)| AppMsg::Act(id, action)) }
                        on_edit={ ctx.link().callback(|(id, text)| AppMsg::EditText(id, text)) }
                        on_delete={ ctx.link().callback(AppMsg::Delete) }
                        on_close={ ctx.link().callback(|_| AppMsg::TogglePanel) }
                    />
                }) }
            </div>
        }
    }
}
