mod locator;
pub use locator::{generate, is_visible, resolve, Rect, RenderedTree};

mod pin;
pub use pin::{cluster, Pin, DEFAULT_CELL_SIZE};

mod refresh;
pub use refresh::RefreshGuard;

mod set;
pub use set::CommentSet;

mod thread;
pub use thread::{build, visible_rows, ThreadNode, ThreadRow, MAX_THREAD_DEPTH};

pub mod api {
    pub use pinboard_api::*;
}
