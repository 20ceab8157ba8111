use std::rc::Rc;

use pinboard_client::Pin;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct PinLayerProps {
    pub pins: Rc<Vec<Pin>>,
    pub selected: Option<String>,
    pub on_select: Callback<String>,
}

#[function_component(PinLayer)]
pub fn pin_layer(p: &PinLayerProps) -> Html {
    html! {
        <div class="pinboard-ui pinboard-pin-layer">
            { for p.pins.iter().map(|pin| {
                let selected = p.selected.as_deref() == Some(&pin.id);
                html! {
                    <PinMarker
                        key={ pin.id.clone() }
                        pin={ pin.clone() }
                        { selected }
                        on_select={ p.on_select.clone() }
                    />
                }
            }) }
        </div>
    }
}

#[derive(Clone, PartialEq, Properties)]
struct PinMarkerProps {
    pin: Pin,
    selected: bool,
    on_select: Callback<String>,
}

/// One marker; hover state stays strictly local to it
#[function_component(PinMarker)]
fn pin_marker(p: &PinMarkerProps) -> Html {
    let hovered = use_state(|| false);
    let onmouseenter = {
        let hovered = hovered.clone();
        Callback::from(move |_| hovered.set(true))
    };
    let onmouseleave = {
        let hovered = hovered.clone();
        Callback::from(move |_| hovered.set(false))
    };
    let onclick = {
        let id = p.pin.id.clone();
        p.on_select.reform(move |_| id.clone())
    };
    let style = format!("left: {}px; top: {}px;", p.pin.x, p.pin.y);
    let state_class = match p.pin.is_resolved {
        true => "pinboard-pin-resolved",
        false => "pinboard-pin-open",
    };
    let tooltip = hovered.then(|| {
        html! {
            <div class="pinboard-pin-tooltip">
                { format!("{} comment(s), last activity {}",
                    p.pin.comments.len(),
                    p.pin.last_activity.format("%Y-%m-%d %H:%M")) }
            </div>
        }
    });
    html! {
        <button
            type="button"
            class={ classes!(
                "pinboard-pin", state_class,
                p.selected.then(|| "pinboard-pin-selected")
            ) }
            { style }
            aria-label={ format!("{} comments here", p.pin.comments.len()) }
            {onclick} {onmouseenter} {onmouseleave}
        >
            <span class="pinboard-pin-count">{ p.pin.comments.len() }</span>
            { for tooltip }
        </button>
    }
}
