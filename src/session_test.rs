use super::*;

const WHOAMI_ALICE: &str = r#"{"id":"u1","name":"alice"}"#;

fn msg_frame(user_id: &str, name: &str, body: &str) -> String {
    serde_json::json!({
        "user": { "id": user_id, "name": name },
        "time": "12:00:00",
        "body": body,
    })
    .to_string()
}

fn message(user_id: &str, name: &str, body: &str) -> Message {
    Message {
        user: User { id: user_id.to_owned(), name: name.to_owned() },
        time: "12:00:00".to_owned(),
        body: body.to_owned(),
    }
}

fn connected_session() -> ChatSession {
    let mut session = ChatSession::new("T1", "alice");
    session.on_open();
    session
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn new_session_is_connecting_with_token() {
    let session = ChatSession::new("T1", "alice");
    assert_eq!(session.status(), ConnectionStatus::Connecting);
    assert_eq!(session.token(), Some("T1"));
    assert_eq!(session.expected_name(), "alice");
    assert!(session.identity().is_none());
    assert!(session.messages().is_empty());
}

#[test]
fn default_session_is_disconnected() {
    let session = ChatSession::default();
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
    assert!(session.token().is_none());
}

#[test]
fn on_open_marks_connected() {
    let session = connected_session();
    assert!(session.is_connected());
}

// =============================================================
// Inbound frames
// =============================================================

#[test]
fn matching_whoami_sets_identity() {
    let mut session = connected_session();
    let event = session.on_text(WHOAMI_ALICE);
    assert!(matches!(event, SessionEvent::Identity(ref u) if u.id == "u1"));
    assert_eq!(session.identity().map(|u| u.id.as_str()), Some("u1"));
    assert!(session.is_connected());
}

#[test]
fn mismatched_whoami_forces_teardown() {
    let mut session = connected_session();
    let event = session.on_text(r#"{"id":"u9","name":"mallory"}"#);
    let SessionEvent::IdentityMismatch { expected, actual } = event else {
        panic!("expected identity mismatch");
    };
    assert_eq!(expected, "alice");
    assert_eq!(actual, "mallory");
    assert_eq!(session.status(), ConnectionStatus::Closing);
    assert!(session.identity().is_none());

    let outcome = session.on_close(Some(1000), &ReconnectPolicy::legacy());
    assert_eq!(outcome.reconnect_in, None);
    assert!(session.token().is_none());
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
}

#[test]
fn frames_after_mismatch_are_ignored() {
    let mut session = connected_session();
    session.on_text(r#"{"id":"u9","name":"mallory"}"#);
    let event = session.on_text(&msg_frame("u9", "mallory", "hello"));
    assert!(matches!(event, SessionEvent::Ignored));
    assert!(session.messages().is_empty());
}

#[test]
fn whoami_then_message_shows_one_entry() {
    let mut session = connected_session();
    session.on_text(WHOAMI_ALICE);
    session.on_text(&msg_frame("u1", "alice", "hi"));
    let lines: Vec<String> = session.messages().iter().map(ToString::to_string).collect();
    assert_eq!(lines, ["alice: hi"]);
}

#[test]
fn interleaved_frames_keep_arrival_order() {
    let mut session = connected_session();
    session.on_text(&msg_frame("u2", "bob", "one"));
    session.on_text(WHOAMI_ALICE);
    session.on_text(&msg_frame("u1", "alice", "two"));
    session.on_text(WHOAMI_ALICE);
    session.on_text(&msg_frame("u2", "bob", "three"));
    let bodies: Vec<&str> = session.messages().iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, ["one", "two", "three"]);
}

#[test]
fn unrecognized_frame_is_discarded_without_closing() {
    let mut session = connected_session();
    let event = session.on_text(r#"{"err":"oops"}"#);
    assert!(matches!(event, SessionEvent::Discarded(FrameError::Unrecognized(_))));
    let event = session.on_text("not json");
    assert!(matches!(event, SessionEvent::Discarded(FrameError::Malformed(_))));
    assert!(session.is_connected());
    assert!(session.messages().is_empty());
}

#[test]
fn binary_frames_are_rejected() {
    let session = connected_session();
    assert!(matches!(session.on_binary(), SessionEvent::Rejected));
}

// =============================================================
// Close + reconnect
// =============================================================

#[test]
fn close_without_reconnect_clears_everything() {
    let mut session = connected_session();
    session.on_text(WHOAMI_ALICE);
    session.on_text(&msg_frame("u1", "alice", "hi"));
    let outcome = session.on_close(Some(1006), &ReconnectPolicy::Never);
    assert_eq!(outcome, CloseOutcome { code: Some(1006), reconnect_in: None, cleared_messages: 1 });
    assert!(session.messages().is_empty());
    assert!(session.identity().is_none());
    assert!(session.token().is_none());
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
}

#[test]
fn close_with_legacy_policy_keeps_token_for_redial() {
    let mut session = connected_session();
    session.on_text(WHOAMI_ALICE);
    session.on_text(&msg_frame("u1", "alice", "hi"));
    let outcome = session.on_close(Some(1006), &ReconnectPolicy::legacy());
    assert_eq!(outcome.reconnect_in, Some(Duration::from_secs(1)));
    assert_eq!(session.status(), ConnectionStatus::Reconnecting);
    assert_eq!(session.token(), Some("T1"));
    assert!(session.messages().is_empty());
    assert!(session.identity().is_none());

    session.on_redial();
    assert_eq!(session.status(), ConnectionStatus::Connecting);
    assert!(session.on_open(), "open after a redial is a resumed connection");
    assert!(session.is_connected());
}

#[test]
fn first_open_is_not_resumed() {
    let mut session = ChatSession::new("T1", "alice");
    assert!(!session.on_open());

    session.on_close(Some(1006), &ReconnectPolicy::legacy());
    session.on_redial();
    assert!(session.on_open());
    session.on_close(Some(1006), &ReconnectPolicy::legacy());
    session.on_redial();
    assert!(session.on_open());
    assert!(!session.on_open(), "attempt counter resets once connected");
}

#[test]
fn going_away_close_ends_legacy_session() {
    let mut session = connected_session();
    let outcome = session.on_close(Some(1001), &ReconnectPolicy::legacy());
    assert_eq!(outcome.reconnect_in, None);
    assert!(session.token().is_none());
}

#[test]
fn client_initiated_close_does_not_reconnect() {
    let mut session = connected_session();
    session.begin_close();
    let outcome = session.on_close(Some(1006), &ReconnectPolicy::legacy());
    assert_eq!(outcome.reconnect_in, None);
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
}

#[test]
fn reconnect_attempts_count_until_open() {
    let policy = ReconnectPolicy::Fixed {
        delay: Duration::from_millis(10),
        exempt_codes: Vec::new(),
        max_attempts: Some(2),
    };
    let mut session = ChatSession::new("T1", "alice");
    assert!(session.on_close(None, &policy).reconnect_in.is_some());
    session.on_redial();
    assert!(session.on_close(None, &policy).reconnect_in.is_some());
    session.on_redial();
    assert!(session.on_close(None, &policy).reconnect_in.is_none());
    assert!(session.token().is_none());
}

// =============================================================
// Sending
// =============================================================

#[test]
fn compose_rejects_empty_body() {
    let mut session = connected_session();
    assert!(matches!(session.compose(""), Err(ClientError::EmptyMessage)));
}

#[test]
fn compose_sends_whitespace_only_body_as_typed() {
    let mut session = connected_session();
    assert_eq!(session.compose("   ").unwrap(), "   ");
}

#[test]
fn compose_rejects_when_not_connected() {
    let mut session = ChatSession::new("T1", "alice");
    assert!(matches!(session.compose("hi"), Err(ClientError::SendOnClosed)));
    session.on_open();
    session.on_close(Some(1006), &ReconnectPolicy::Never);
    assert!(matches!(session.compose("hi"), Err(ClientError::SendOnClosed)));
}

#[test]
fn compose_returns_body_verbatim() {
    let mut session = connected_session();
    assert_eq!(session.compose("  hi there ").unwrap(), "  hi there ");
}

#[test]
fn scroll_request_fires_once_for_own_message_after_submit() {
    let mut session = connected_session();
    session.on_text(WHOAMI_ALICE);
    let theirs = message("u2", "bob", "x");
    let mine = message("u1", "alice", "y");

    assert!(!session.take_scroll_request(&mine));
    session.compose("y").unwrap();
    assert!(!session.take_scroll_request(&theirs));
    assert!(session.take_scroll_request(&mine));
    assert!(!session.take_scroll_request(&mine));
}

// =============================================================
// History
// =============================================================

#[test]
fn history_prepends_older_pages() {
    let mut session = connected_session();
    session.on_text(&msg_frame("u2", "bob", "live"));

    let (token, page) = session.begin_history().unwrap();
    assert_eq!((token.as_str(), page), ("T1", -1));
    assert!(session.begin_history().is_none());

    let applied = session.apply_history(
        &token,
        HistoryPage { page: 3, messages: vec![message("u2", "bob", "old1"), message("u1", "alice", "old2")] },
    );
    assert!(applied);
    let bodies: Vec<&str> = session.messages().iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, ["old1", "old2", "live"]);
    assert_eq!(session.begin_history().map(|(_, p)| p), Some(2));
}

#[test]
fn history_skips_messages_already_received_live() {
    let mut session = connected_session();
    session.on_text(&msg_frame("u2", "bob", "live"));
    let (token, _) = session.begin_history().unwrap();
    session.apply_history(
        &token,
        HistoryPage { page: 0, messages: vec![message("u2", "bob", "old"), message("u2", "bob", "live")] },
    );
    let bodies: Vec<&str> = session.messages().iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, ["old", "live"]);
}

#[test]
fn history_page_zero_suppresses_further_fetches() {
    let mut session = connected_session();
    let (token, page) = session.begin_history().unwrap();
    assert_eq!(page, -1);
    session.apply_history(&token, HistoryPage { page: 0, messages: Vec::new() });
    assert!(session.history().is_exhausted());
    assert!(session.begin_history().is_none());
}

#[test]
fn history_arriving_after_logout_is_ignored() {
    let mut session = connected_session();
    let (token, _) = session.begin_history().unwrap();
    assert_eq!(session.logout().as_deref(), Some("T1"));
    let applied = session.apply_history(&token, HistoryPage { page: 2, messages: vec![message("u2", "bob", "x")] });
    assert!(!applied);
    assert!(session.messages().is_empty());
    assert!(session.begin_history().is_none());
}

#[test]
fn failed_history_fetch_can_be_retried() {
    let mut session = connected_session();
    let (token, page) = session.begin_history().unwrap();
    session.fail_history(&token);
    assert_eq!(session.begin_history().map(|(_, p)| p), Some(page));
}

#[test]
fn logout_clears_state() {
    let mut session = connected_session();
    session.on_text(WHOAMI_ALICE);
    session.on_text(&msg_frame("u1", "alice", "hi"));
    assert_eq!(session.logout().as_deref(), Some("T1"));
    assert!(session.token().is_none());
    assert!(session.messages().is_empty());
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
    assert!(session.logout().is_none());
}
