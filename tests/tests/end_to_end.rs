use pinboard_api::{
    CommentPatch, CommentState, Error, TrackEvent, TrackedAction,
};
use pinboard_client::{cluster, CommentSet, RefreshGuard, DEFAULT_CELL_SIZE};
use pinboard_mock_server::MockServer;
use tests::{anchored_comment, owner, reply_to, visitor, ARTIFACT};

#[test]
fn created_comment_comes_back_as_a_pin() {
    let mut server = MockServer::new();
    let author = visitor();
    server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            anchored_comment("the margin looks off here", 50.0, 50.0),
        )
        .unwrap();

    let comments = server.list_comments(ARTIFACT);
    let pins = cluster(&comments, DEFAULT_CELL_SIZE);
    assert_eq!(pins.len(), 1);
    assert_eq!((pins[0].x, pins[0].y), (45.0, 45.0));
    assert_eq!(pins[0].comments.len(), 1);
    assert_eq!(pins[0].comments[0].state, CommentState::Published);
    assert!(!pins[0].is_resolved);
}

#[test]
fn resolving_and_reopening_flips_the_pin() {
    let mut server = MockServer::new();
    let author = visitor();
    let moderator = owner();
    let comment = server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            anchored_comment("done?", 10.0, 10.0),
        )
        .unwrap();

    server
        .update_comment(
            ARTIFACT,
            &moderator,
            comment.id,
            CommentPatch::set_state(CommentState::Resolved),
        )
        .unwrap();
    let pins = cluster(&server.list_comments(ARTIFACT), DEFAULT_CELL_SIZE);
    assert!(pins[0].is_resolved);

    server
        .update_comment(
            ARTIFACT,
            &moderator,
            comment.id,
            CommentPatch::set_state(CommentState::Published),
        )
        .unwrap();
    let pins = cluster(&server.list_comments(ARTIFACT), DEFAULT_CELL_SIZE);
    assert!(!pins[0].is_resolved);
}

#[test]
fn archived_comments_accept_no_further_transitions() {
    let mut server = MockServer::new();
    let moderator = owner();
    let comment = server
        .create_comment(
            ARTIFACT,
            &moderator,
            String::from("bob"),
            anchored_comment("stale discussion", 0.0, 0.0),
        )
        .unwrap();
    server
        .update_comment(
            ARTIFACT,
            &moderator,
            comment.id,
            CommentPatch::set_state(CommentState::Archived),
        )
        .unwrap();

    let err = server
        .update_comment(
            ARTIFACT,
            &moderator,
            comment.id,
            CommentPatch::set_state(CommentState::Published),
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { .. }));
}

#[test]
fn only_the_owner_archives_and_only_the_author_edits() {
    let mut server = MockServer::new();
    let author = visitor();
    let comment = server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            anchored_comment("typo in the title", 0.0, 0.0),
        )
        .unwrap();

    let err = server
        .update_comment(
            ARTIFACT,
            &author,
            comment.id,
            CommentPatch::set_state(CommentState::Archived),
        )
        .unwrap_err();
    assert_eq!(err, Error::PermissionDenied);

    let err = server
        .update_comment(
            ARTIFACT,
            &owner(),
            comment.id,
            CommentPatch::set_text(String::from("rewritten by someone else")),
        )
        .unwrap_err();
    assert_eq!(err, Error::PermissionDenied);

    let edited = server
        .update_comment(
            ARTIFACT,
            &author,
            comment.id,
            CommentPatch::set_text(String::from("typo in the heading")),
        )
        .unwrap();
    assert_eq!(edited.text, "typo in the heading");
}

#[test]
fn replies_come_back_threaded_under_their_root() {
    let mut server = MockServer::new();
    let author = visitor();
    let root = server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            anchored_comment("what font is this?", 20.0, 20.0),
        )
        .unwrap();
    server
        .create_comment(
            ARTIFACT,
            &owner(),
            String::from("bob"),
            reply_to("Inter, 16px", root.id),
        )
        .unwrap();
    server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            reply_to("thanks!", root.id),
        )
        .unwrap();

    let mut set = CommentSet::new(ARTIFACT, author);
    set.reset(server.list_comments(ARTIFACT));
    let threads = set.threads();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].comment.id, root.id);
    let reply_texts: Vec<&str> = threads[0]
        .replies
        .iter()
        .map(|n| n.comment.text.as_str())
        .collect();
    assert_eq!(reply_texts, vec!["Inter, 16px", "thanks!"]);

    // the reply has no coordinates of its own and rides its root's pin
    let pins = set.pins(DEFAULT_CELL_SIZE);
    assert_eq!(pins.len(), 1);
}

#[test]
fn mutual_parent_references_stay_in_the_thread_view() {
    let mut server = MockServer::new();
    let author = visitor();
    // ids are client-supplied, so the second create turns the first one's
    // dangling parent into a mutual reference
    let mut first = anchored_comment("which shade of blue?", 30.0, 30.0);
    let mut second = anchored_comment("the darker one", 31.0, 29.0);
    first.parent_id = Some(second.id);
    second.parent_id = Some(first.id);
    server
        .create_comment(ARTIFACT, &author, String::from("alice"), first)
        .unwrap();
    server
        .create_comment(ARTIFACT, &author, String::from("alice"), second)
        .unwrap();

    let mut set = CommentSet::new(ARTIFACT, author);
    set.reset(server.list_comments(ARTIFACT));
    let threads = set.threads();
    let total: usize = threads.iter().map(|n| 1 + n.descendants()).sum();
    assert_eq!(total, 2);
    assert_eq!(threads.len(), 1);
    assert!(!set.pins(DEFAULT_CELL_SIZE).is_empty());
}

#[test]
fn deleting_a_comment_needs_delete_rights() {
    let mut server = MockServer::new();
    let author = visitor();
    let comment = server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            anchored_comment("please remove", 0.0, 0.0),
        )
        .unwrap();

    let mut intruder = visitor();
    intruder.user = pinboard_api::UserId(pinboard_api::Uuid::from_u128(99));
    assert_eq!(
        server.delete_comment(ARTIFACT, &intruder, comment.id),
        Err(Error::PermissionDenied)
    );

    server.delete_comment(ARTIFACT, &author, comment.id).unwrap();
    assert!(server.list_comments(ARTIFACT).is_empty());
}

#[test]
fn creation_only_accepts_draft_or_published() {
    let mut server = MockServer::new();
    for state in [CommentState::Resolved, CommentState::Archived] {
        let mut new = anchored_comment("already settled", 0.0, 0.0);
        new.state = state;
        let err = server
            .create_comment(ARTIFACT, &visitor(), String::from("alice"), new)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }
    assert!(server.list_comments(ARTIFACT).is_empty());
}

#[test]
fn tracked_events_are_recorded_in_order() {
    let mut server = MockServer::new();
    let author = visitor();
    let comment = server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            anchored_comment("first", 0.0, 0.0),
        )
        .unwrap();
    server.track(TrackEvent::for_comment(
        TrackedAction::CommentCreated,
        &comment,
    ));
    let reply = server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            reply_to("second", comment.id),
        )
        .unwrap();
    server.track(TrackEvent::for_comment(TrackedAction::ReplyCreated, &reply));

    let types: Vec<_> = server.tracked().iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        vec![TrackedAction::CommentCreated, TrackedAction::ReplyCreated]
    );
    assert_eq!(
        server.tracked()[0].event_data["comment"],
        serde_json::json!(comment.id.0)
    );
}

#[test]
fn stale_refresh_responses_are_dropped() {
    let mut server = MockServer::new();
    let author = visitor();
    server
        .create_comment(
            ARTIFACT,
            &author,
            String::from("alice"),
            anchored_comment("only one", 0.0, 0.0),
        )
        .unwrap();

    let mut guard = RefreshGuard::new();
    let first = guard.begin();
    let second = guard.begin();

    // the response for the superseded fetch arrives late and is ignored
    assert!(!guard.admit(first));

    let mut set = CommentSet::new(ARTIFACT, author);
    assert!(guard.admit(second));
    set.reset(server.list_comments(ARTIFACT));
    assert!(!set.is_empty());
}
