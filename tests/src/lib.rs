//! Shared fixtures for the cross-crate integration tests.

use pinboard_api::{
    Actor, ArtifactId, CommentState, Locator, NewComment, Point, UserId, Uuid,
};

pub const ARTIFACT: ArtifactId = ArtifactId(pinboard_api::STUB_UUID);

pub fn owner() -> Actor {
    Actor {
        user: UserId(Uuid::from_u128(1)),
        is_owner: true,
    }
}

pub fn visitor() -> Actor {
    Actor {
        user: UserId(Uuid::from_u128(2)),
        is_owner: false,
    }
}

pub fn anchored_comment(text: &str, x: f64, y: f64) -> NewComment {
    let mut new = NewComment::new(String::from(text), CommentState::Published);
    new.element_selector = Some(Locator(String::from("main#preview > p:nth-of-type(1)")));
    new.element_coordinates = Some(Point { x, y });
    new
}

pub fn reply_to(text: &str, parent: pinboard_api::CommentId) -> NewComment {
    let mut new = NewComment::new(String::from(text), CommentState::Published);
    new.parent_id = Some(parent);
    new
}
