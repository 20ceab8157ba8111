use pinboard_client::api::Point;
use yew::prelude::*;

use crate::dom::DomTree;
use crate::ui::Placement;

#[derive(Clone, PartialEq, Properties)]
pub struct CaptureSurfaceProps {
    /// Brief instructional hint, shown only while no pins exist yet
    pub show_hint: bool,
    pub on_place: Callback<Placement>,
}

/// Transparent surface over the artifact while placement mode is active.
/// A click is turned into viewer-relative coordinates plus a structural
/// locator for the artifact node underneath; clicks landing on annotation
/// UI are ignored.
#[function_component(CaptureSurface)]
pub fn capture_surface(p: &CaptureSurfaceProps) -> Html {
    let overlay_ref = use_node_ref();
    let onclick = {
        let overlay_ref = overlay_ref.clone();
        let on_place = p.on_place.clone();
        Callback::from(move |e: web_sys::MouseEvent| {
            if let Some(target) = e.target_dyn_into::<web_sys::Element>() {
                if matches!(target.closest(".pinboard-ui"), Ok(Some(_))) {
                    return;
                }
            }
            let Some(tree) = DomTree::for_artifact() else {
                tracing::warn!("placement click with no artifact container in page");
                return;
            };
            let Some(overlay) = overlay_ref.cast::<web_sys::HtmlElement>() else {
                return;
            };
            let (client_x, client_y) = (e.client_x() as f64, e.client_y() as f64);
            let (x, y) = tree.to_viewer_coords(client_x, client_y);
            let locator = tree
                .node_under_overlay(&overlay, client_x, client_y)
                .map(|node| pinboard_client::generate(&tree, &node));
            on_place.emit(Placement {
                coords: Point { x, y },
                locator,
            });
        })
    };

    html! {
        <div ref={ overlay_ref } class="pinboard-capture-surface" {onclick}>
            { for p.show_hint.then(|| html! {
                <div class="pinboard-ui pinboard-hint">
                    { "Click anywhere on the preview to leave a comment" }
                </div>
            }) }
        </div>
    }
}
