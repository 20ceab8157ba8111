use std::collections::BTreeMap;

use crate::api::{Comment, CommentState, Locator, Time};
use crate::{locator, RenderedTree};

pub const DEFAULT_CELL_SIZE: f64 = 15.0;

/// Derived on-screen marker for the comments sharing one clustering cell.
/// Recomputed in full on every refresh; its only identity across refreshes
/// is the quantized coordinate key.
#[derive(Clone, Debug, PartialEq)]
pub struct Pin {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub comments: Vec<Comment>,
    pub is_resolved: bool,
    pub last_activity: Time,
    pub anchor: Option<Locator>,
}

impl Pin {
    /// Delegates to the bound locator; a pin with no locator is visible
    pub fn is_visible<T: RenderedTree>(&self, tree: &T) -> bool {
        match &self.anchor {
            Some(anchor) => locator::is_visible(tree, anchor),
            None => true,
        }
    }
}

/// Groups anchored comments into pins by quantized proximity.
///
/// Quantization rounds each coordinate to the nearest multiple of
/// `cell_size`, independently per axis. Pure function of its inputs:
/// output order is cell-key order, members are ordered by creation time
/// (id as tie-break), so an unchanged comment set reclusters identically.
pub fn cluster<'a, I>(comments: I, cell_size: f64) -> Vec<Pin>
where
    I: IntoIterator<Item = &'a Comment>,
{
    let mut cells: BTreeMap<(i64, i64), Vec<Comment>> = BTreeMap::new();
    for comment in comments {
        let Some(coords) = comment.element_coordinates else {
            // unanchored comments get no pin but stay in the thread list
            continue;
        };
        let key = (quantize(coords.x, cell_size), quantize(coords.y, cell_size));
        cells.entry(key).or_insert_with(Vec::new).push(comment.clone());
    }

    cells
        .into_iter()
        .map(|((qx, qy), mut members)| {
            members.sort_by_key(|c| (c.created_at, c.id));
            let last_activity = members
                .last()
                .map(|c| c.created_at)
                .expect("cluster cell with no members");
            Pin {
                id: format!("pin-{qx}-{qy}"),
                x: qx as f64,
                y: qy as f64,
                is_resolved: members.iter().all(|c| c.state == CommentState::Resolved),
                anchor: members.iter().find_map(|c| c.element_selector.clone()),
                last_activity,
                comments: members,
            }
        })
        .collect()
}

fn quantize(v: f64, cell_size: f64) -> i64 {
    ((v / cell_size).round() * cell_size) as i64
}
