use super::*;
use chatroom::{ConnectionStatus, HistoryPage, Message, User};

const WHOAMI_ALICE: &str = r#"{"id":"u1","name":"alice"}"#;

fn frame(user_id: &str, name: &str, body: &str) -> String {
    serde_json::json!({
        "user": { "id": user_id, "name": name },
        "time": "2024-01-01T12:00:00Z",
        "body": body,
    })
    .to_string()
}

fn message(user_id: &str, name: &str, body: &str) -> Message {
    Message {
        user: User { id: user_id.to_owned(), name: name.to_owned() },
        time: "2024-01-01T11:00:00Z".to_owned(),
        body: body.to_owned(),
    }
}

fn connected() -> (ChatState, u64) {
    let mut state = ChatState::default();
    let generation = state.start("T1".to_owned(), "alice".to_owned());
    assert_eq!(state.opened(generation), Some(false));
    (state, generation)
}

// =============================================================
// Generations
// =============================================================

#[test]
fn start_bumps_generation_and_resets_session() {
    let mut state = ChatState::default();
    let first = state.start("T1".to_owned(), "alice".to_owned());
    let second = state.start("T2".to_owned(), "alice".to_owned());
    assert!(second > first);
    assert!(!state.is_current(first));
    assert_eq!(state.session.token(), Some("T2"));
    assert_eq!(state.session.status(), ConnectionStatus::Connecting);
}

#[test]
fn dial_target_requires_current_generation_and_token() {
    let (mut state, generation) = connected();
    assert_eq!(state.dial_target(generation), Some(("T1".to_owned(), "alice".to_owned())));
    assert_eq!(state.dial_target(generation + 1), None);

    assert_eq!(state.stop().as_deref(), Some("T1"));
    assert_eq!(state.dial_target(generation), None);
}

#[test]
fn stale_task_cannot_touch_new_session() {
    let (mut state, old) = connected();
    let new = state.start("T2".to_owned(), "alice".to_owned());

    assert!(state.receive(old, &frame("u2", "bob", "late")).is_none());
    assert!(state.closed(old, Some(1006), &ReconnectPolicy::Never).is_none());
    assert_eq!(state.opened(old), None);
    assert!(!state.redial(old));
    state.begin_close(old);

    assert!(state.session.messages().is_empty());
    assert_eq!(state.session.token(), Some("T2"));
    assert_eq!(state.session.status(), ConnectionStatus::Connecting);
    assert_eq!(state.opened(new), Some(false));
}

// =============================================================
// Frames
// =============================================================

#[test]
fn whoami_then_message_shows_one_entry() {
    let (mut state, generation) = connected();
    state.receive(generation, WHOAMI_ALICE);
    state.receive(generation, &frame("u1", "alice", "hi"));
    let lines: Vec<String> = state.session.messages().iter().map(ToString::to_string).collect();
    assert_eq!(lines, ["alice: hi"]);
}

#[test]
fn own_message_after_submit_requests_scroll_once() {
    let (mut state, generation) = connected();
    state.receive(generation, WHOAMI_ALICE);
    state.receive(generation, &frame("u2", "bob", "hey"));
    assert_eq!(state.scroll_seq(), 0);

    state.session.compose("hi").expect("connected session accepts a body");
    state.receive(generation, &frame("u2", "bob", "interleaved"));
    assert_eq!(state.scroll_seq(), 0);
    state.receive(generation, &frame("u1", "alice", "hi"));
    assert_eq!(state.scroll_seq(), 1);
    state.receive(generation, &frame("u1", "alice", "from another tab"));
    assert_eq!(state.scroll_seq(), 1);
}

#[test]
fn identity_mismatch_surfaces_event() {
    let (mut state, generation) = connected();
    let event = state.receive(generation, r#"{"id":"u9","name":"mallory"}"#);
    assert!(matches!(event, Some(SessionEvent::IdentityMismatch { .. })));
    assert_eq!(state.session.status(), ConnectionStatus::Closing);
}

#[test]
fn close_clears_messages_and_token() {
    let (mut state, generation) = connected();
    state.receive(generation, &frame("u2", "bob", "hey"));
    let outcome = state.closed(generation, Some(1000), &ReconnectPolicy::Never).expect("current generation");
    assert_eq!(outcome.cleared_messages, 1);
    assert_eq!(outcome.reconnect_in, None);
    assert!(state.session.messages().is_empty());
    assert!(state.session.token().is_none());
}

// =============================================================
// History
// =============================================================

#[test]
fn history_round_trip_bumps_history_seq() {
    let (mut state, generation) = connected();
    let (fetch_generation, token, page) = state.begin_history().expect("first fetch");
    assert_eq!((fetch_generation, token.as_str(), page), (generation, "T1", -1));
    assert!(state.begin_history().is_none(), "second fetch waits for the first");

    let page = HistoryPage { page: 2, messages: vec![message("u2", "bob", "old")] };
    assert!(state.apply_history(generation, &token, page));
    assert_eq!(state.history_seq(), 1);
    assert_eq!(state.begin_history().map(|(_, _, p)| p), Some(1));
}

#[test]
fn history_for_stale_generation_is_dropped() {
    let (mut state, generation) = connected();
    let (_, token, _) = state.begin_history().expect("first fetch");
    state.stop();
    let page = HistoryPage { page: 2, messages: vec![message("u2", "bob", "old")] };
    assert!(!state.apply_history(generation, &token, page));
    assert_eq!(state.history_seq(), 0);
    assert!(state.session.messages().is_empty());
}

#[test]
fn failed_history_releases_guard() {
    let (mut state, generation) = connected();
    let (_, token, page) = state.begin_history().expect("first fetch");
    state.fail_history(generation, &token);
    assert_eq!(state.begin_history().map(|(_, _, p)| p), Some(page));
}
