use crate::api::Locator;

/// Box in viewer-relative pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// True iff `other` lies entirely within self. Partial overlap does
    /// not count, so pins never point at half-scrolled-out content.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Minimal capability interface over the rendered artifact, so locator
/// logic runs identically against the live DOM and a fake tree in tests.
pub trait RenderedTree {
    type Node: Clone + PartialEq;

    fn root(&self) -> Self::Node;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Lowercased element name
    fn tag(&self, node: &Self::Node) -> String;
    /// Stable identifier attribute, if the node carries one
    fn stable_id(&self, node: &Self::Node) -> Option<String>;
    /// Class-like tokens in document order
    fn classes(&self, node: &Self::Node) -> Vec<String>;

    fn node_at_point(&self, x: f64, y: f64) -> Option<Self::Node>;
    fn bounding_box(&self, node: &Self::Node) -> Option<Rect>;
    fn viewport(&self) -> Rect;
}

const SEPARATOR: &str = " > ";
const MAX_CLASS_TOKENS: usize = 2;

/// Builds a structural locator for `node` by walking its ancestor chain
/// up to (but excluding) the tree root.
///
/// An id segment is treated as globally unique and terminates the walk.
/// This never fails: an ordinal disambiguator is always available for
/// featureless nodes, it just makes for a longer path.
pub fn generate<T: RenderedTree>(tree: &T, node: &T::Node) -> Locator {
    let root = tree.root();
    let mut segments = Vec::new();
    let mut current = node.clone();
    loop {
        if current == root {
            break;
        }
        let tag = tree.tag(&current);
        if let Some(id) = tree.stable_id(&current) {
            segments.push(format!("{tag}#{id}"));
            break;
        }
        let mut segment = tag.clone();
        for class in tree.classes(&current).iter().take(MAX_CLASS_TOKENS) {
            segment.push('.');
            segment.push_str(class);
        }
        if let Some(parent) = tree.parent(&current) {
            let same_tag: Vec<_> = tree
                .children(&parent)
                .into_iter()
                .filter(|sib| tree.tag(sib) == tag)
                .collect();
            if same_tag.len() > 1 {
                let nth = same_tag
                    .iter()
                    .position(|sib| *sib == current)
                    .map(|i| i + 1)
                    .unwrap_or(1);
                segment.push_str(&format!(":nth-of-type({nth})"));
            }
            segments.push(segment);
            current = parent;
        } else {
            segments.push(segment);
            break;
        }
    }
    segments.reverse();
    Locator(segments.join(SEPARATOR))
}

/// Re-queries the tree for the node a locator was generated from.
/// Tolerant of structural drift: any segment mismatch yields `None`.
pub fn resolve<T: RenderedTree>(tree: &T, locator: &Locator) -> Option<T::Node> {
    let segments: Vec<Segment> = locator
        .0
        .split(SEPARATOR)
        .map(Segment::parse)
        .collect::<Option<Vec<_>>>()?;
    let (first, rest) = segments.split_first()?;

    let mut current = match &first.id {
        // id segments were cut loose from the root, so search the whole tree
        Some(_) => find_by_id(tree, first)?,
        None => {
            let root = tree.root();
            find_child(tree, &root, first)?
        }
    };
    for segment in rest {
        current = find_child(tree, &current, segment)?;
    }
    Some(current)
}

/// Whether the locator's node is currently fully on screen.
/// Unresolved locators count as not visible.
pub fn is_visible<T: RenderedTree>(tree: &T, locator: &Locator) -> bool {
    let Some(node) = resolve(tree, locator) else {
        return false;
    };
    match tree.bounding_box(&node) {
        Some(rect) => tree.viewport().contains_rect(&rect),
        None => false,
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Segment {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    nth: Option<usize>,
}

impl Segment {
    fn parse(s: &str) -> Option<Segment> {
        let mut s = s.trim();
        if s.is_empty() {
            return None;
        }
        let mut nth = None;
        if let Some(start) = s.find(":nth-of-type(") {
            let inner = &s[start + ":nth-of-type(".len()..];
            let end = inner.find(')')?;
            nth = Some(inner[..end].parse::<usize>().ok()?);
            s = &s[..start];
        }
        let mut id = None;
        let mut classes = Vec::new();
        let tag_end = s.find(['#', '.']).unwrap_or(s.len());
        let tag = s[..tag_end].to_string();
        if tag.is_empty() {
            return None;
        }
        let mut rest = &s[tag_end..];
        if let Some(r) = rest.strip_prefix('#') {
            let id_end = r.find('.').unwrap_or(r.len());
            id = Some(r[..id_end].to_string());
            rest = &r[id_end..];
        }
        for class in rest.split('.').filter(|c| !c.is_empty()) {
            classes.push(class.to_string());
        }
        Some(Segment {
            tag,
            id,
            classes,
            nth,
        })
    }

    fn matches<T: RenderedTree>(&self, tree: &T, node: &T::Node) -> bool {
        if tree.tag(node) != self.tag {
            return false;
        }
        if let Some(id) = &self.id {
            if tree.stable_id(node).as_ref() != Some(id) {
                return false;
            }
        }
        let node_classes = tree.classes(node);
        if !self.classes.iter().all(|c| node_classes.contains(c)) {
            return false;
        }
        if let Some(nth) = self.nth {
            match tree.parent(node) {
                None => return false,
                Some(parent) => {
                    let position = tree
                        .children(&parent)
                        .into_iter()
                        .filter(|sib| tree.tag(sib) == self.tag)
                        .position(|sib| sib == *node);
                    if position.map(|i| i + 1) != Some(nth) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

fn find_child<T: RenderedTree>(tree: &T, parent: &T::Node, segment: &Segment) -> Option<T::Node> {
    tree.children(parent)
        .into_iter()
        .find(|child| segment.matches(tree, child))
}

fn find_by_id<T: RenderedTree>(tree: &T, segment: &Segment) -> Option<T::Node> {
    // depth-first in document order, first match wins
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        if segment.matches(tree, &node) {
            return Some(node);
        }
        let mut children = tree.children(&node);
        children.reverse();
        stack.extend(children);
    }
    None
}


#[cfg(test)]
mod tests {
    use super::fake::FakeTree;
    use super::*;

    fn r(x: f64, y: f64) -> Rect {
        Rect::new(x, y, 50.0, 20.0)
    }

    /// body > div > section x2 > p x3, no ids or classes anywhere
    fn featureless_tree() -> (FakeTree, usize) {
        let mut t = FakeTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let div = t.add(0, "div", None, &[], r(0.0, 0.0));
        let _s1 = t.add(div, "section", None, &[], r(0.0, 0.0));
        let s2 = t.add(div, "section", None, &[], r(0.0, 100.0));
        let _p1 = t.add(s2, "p", None, &[], r(0.0, 100.0));
        let p2 = t.add(s2, "p", None, &[], r(0.0, 130.0));
        let _p3 = t.add(s2, "p", None, &[], r(0.0, 160.0));
        (t, p2)
    }

    #[test]
    fn featureless_node_gets_ordinal_path() {
        let (t, p2) = featureless_tree();
        let loc = generate(&t, &p2);
        assert_eq!(
            loc.0,
            "div > section:nth-of-type(2) > p:nth-of-type(2)"
        );
        assert_eq!(loc.0.split(" > ").count(), 3);
        assert_eq!(resolve(&t, &loc), Some(p2));
    }

    #[test]
    fn id_terminates_ascent() {
        let mut t = FakeTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let outer = t.add(0, "div", None, &[], r(0.0, 0.0));
        let main = t.add(outer, "main", Some("preview"), &[], r(0.0, 0.0));
        let p = t.add(main, "p", None, &["note", "muted", "extra"], r(0.0, 10.0));
        let loc = generate(&t, &p);
        // only the first two class tokens are kept
        assert_eq!(loc.0, "main#preview > p.note.muted");
        assert_eq!(resolve(&t, &loc), Some(p));
    }

    #[test]
    fn sibling_without_same_tag_needs_no_ordinal() {
        let mut t = FakeTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let div = t.add(0, "div", None, &["wrap"], r(0.0, 0.0));
        let _h = t.add(div, "h1", None, &[], r(0.0, 0.0));
        let p = t.add(div, "p", None, &[], r(0.0, 30.0));
        let loc = generate(&t, &p);
        assert_eq!(loc.0, "div.wrap > p");
        assert_eq!(resolve(&t, &loc), Some(p));
    }

    #[test]
    fn structural_drift_resolves_to_none() {
        let (t, p2) = featureless_tree();
        let loc = generate(&t, &p2);

        // same document shape minus the middle paragraph
        let mut drifted = FakeTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let div = drifted.add(0, "div", None, &[], r(0.0, 0.0));
        let s = drifted.add(div, "section", None, &[], r(0.0, 0.0));
        let _p = drifted.add(s, "p", None, &[], r(0.0, 0.0));
        assert_eq!(resolve(&drifted, &loc), None);

        let bogus = Locator(String::from("article > h2"));
        assert_eq!(resolve(&t, &bogus), None);
    }

    #[test]
    fn visibility_is_strict_containment() {
        let mut t = FakeTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let div = t.add(0, "div", None, &[], Rect::new(0.0, 0.0, 800.0, 600.0));
        let inside = t.add(div, "p", None, &["in"], Rect::new(10.0, 10.0, 100.0, 20.0));
        let straddling = t.add(
            div,
            "p",
            None,
            &["out"],
            Rect::new(750.0, 590.0, 100.0, 20.0),
        );
        assert!(is_visible(&t, &generate(&t, &inside)));
        assert!(!is_visible(&t, &generate(&t, &straddling)));
        assert!(!is_visible(&t, &Locator(String::from("nav > a"))));
    }

    #[test]
    fn hit_test_returns_deepest_node() {
        let (t, p2) = featureless_tree();
        assert_eq!(t.node_at_point(5.0, 135.0), Some(p2));
    }
}
