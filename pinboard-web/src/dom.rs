use pinboard_client::{Rect, RenderedTree};

/// Well-known id the host page gives the element wrapping the rendered
/// artifact; everything we locate or hit-test lives under it.
pub const ARTIFACT_CONTAINER_ID: &str = "pinboard-artifact";

/// `RenderedTree` over the live DOM, scoped to the artifact container.
/// All coordinates are viewer-relative: the container's top-left is (0,0).
pub struct DomTree {
    container: web_sys::Element,
}

impl DomTree {
    pub fn for_artifact() -> Option<DomTree> {
        let container = web_sys::window()?
            .document()?
            .get_element_by_id(ARTIFACT_CONTAINER_ID)?;
        Some(DomTree { container })
    }

    pub fn container(&self) -> &web_sys::Element {
        &self.container
    }

    fn origin(&self) -> (f64, f64) {
        let rect = self.container.get_bounding_client_rect();
        (rect.left(), rect.top())
    }

    /// Converts client (event) coordinates into viewer-relative ones
    pub fn to_viewer_coords(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let (left, top) = self.origin();
        (client_x - left, client_y - top)
    }

    /// Hit-tests the artifact underneath the capture surface: the overlay
    /// is made transparent to hit-testing for the duration of the query.
    pub fn node_under_overlay(
        &self,
        overlay: &web_sys::HtmlElement,
        client_x: f64,
        client_y: f64,
    ) -> Option<web_sys::Element> {
        let style = overlay.style();
        let saved = style.get_property_value("pointer-events").ok();
        if style.set_property("pointer-events", "none").is_err() {
            return None;
        }
        let document = web_sys::window()?.document()?;
        let hit = document.element_from_point(client_x as f32, client_y as f32);
        match saved.filter(|s| !s.is_empty()) {
            Some(saved) => {
                let _ = style.set_property("pointer-events", &saved);
            }
            None => {
                let _ = style.remove_property("pointer-events");
            }
        }
        // only nodes inside the artifact are anchorable
        hit.filter(|n| self.container.contains(Some(n.as_ref())))
    }
}

impl RenderedTree for DomTree {
    type Node = web_sys::Element;

    fn root(&self) -> web_sys::Element {
        self.container.clone()
    }

    fn parent(&self, node: &web_sys::Element) -> Option<web_sys::Element> {
        node.parent_element()
    }

    fn children(&self, node: &web_sys::Element) -> Vec<web_sys::Element> {
        let collection = node.children();
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn tag(&self, node: &web_sys::Element) -> String {
        node.tag_name().to_lowercase()
    }

    fn stable_id(&self, node: &web_sys::Element) -> Option<String> {
        Some(node.id()).filter(|id| !id.is_empty())
    }

    fn classes(&self, node: &web_sys::Element) -> Vec<String> {
        let list = node.class_list();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn node_at_point(&self, x: f64, y: f64) -> Option<web_sys::Element> {
        let (left, top) = self.origin();
        let document = web_sys::window()?.document()?;
        document
            .element_from_point((x + left) as f32, (y + top) as f32)
            .filter(|n| self.container.contains(Some(n.as_ref())))
    }

    fn bounding_box(&self, node: &web_sys::Element) -> Option<Rect> {
        let (left, top) = self.origin();
        let rect = node.get_bounding_client_rect();
        Some(Rect::new(
            rect.left() - left,
            rect.top() - top,
            rect.width(),
            rect.height(),
        ))
    }

    fn viewport(&self) -> Rect {
        let rect = self.container.get_bounding_client_rect();
        Rect::new(0.0, 0.0, rect.width(), rect.height())
    }
}
