use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ToolbarProps {
    pub placing: bool,
    pub show_pins: bool,
    pub panel_open: bool,
    pub on_toggle_mode: Callback<()>,
    pub on_toggle_pins: Callback<()>,
    pub on_toggle_panel: Callback<()>,
}

#[function_component(Toolbar)]
pub fn toolbar(p: &ToolbarProps) -> Html {
    html! {
        <div class="pinboard-ui pinboard-toolbar">
            <button
                type="button"
                class={ classes!("btn", "btn-light", p.placing.then(|| "active")) }
                title={ match p.placing {
                    true => "Cancel placing",
                    false => "Add a comment",
                } }
                onclick={ p.on_toggle_mode.reform(|_| ()) }
            >
                { "Comment" }
            </button>
            <button
                type="button"
                class={ classes!("btn", "btn-light", p.show_pins.then(|| "active")) }
                title="Show or hide pins"
                onclick={ p.on_toggle_pins.reform(|_| ()) }
            >
                { "Pins" }
            </button>
            <button
                type="button"
                class={ classes!("btn", "btn-light", p.panel_open.then(|| "active")) }
                title="Show or hide the discussion panel"
                onclick={ p.on_toggle_panel.reform(|_| ()) }
            >
                { "Discussion" }
            </button>
        </div>
    }
}
