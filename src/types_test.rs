use super::*;

fn message(name: &str, time: &str, body: &str) -> Message {
    Message {
        user: User { id: "u1".to_owned(), name: name.to_owned() },
        time: time.to_owned(),
        body: body.to_owned(),
    }
}

// =============================================================
// Message
// =============================================================

#[test]
fn message_displays_as_name_and_body() {
    let msg = message("alice", "12:00:00", "hi");
    assert_eq!(msg.to_string(), "alice: hi");
}

#[test]
fn time_label_formats_rfc3339_timestamp() {
    let msg = message("alice", "2024-03-01T12:34:56.789Z", "hi");
    assert_eq!(msg.time_label(), "12:34:56");
}

#[test]
fn time_label_keeps_offset_wall_clock() {
    let msg = message("alice", "2024-03-01T08:05:09-05:00", "hi");
    assert_eq!(msg.time_label(), "08:05:09");
}

#[test]
fn time_label_falls_back_to_raw_string() {
    let msg = message("alice", "12:00:00", "hi");
    assert_eq!(msg.time_label(), "12:00:00");
}

#[test]
fn is_from_compares_user_id() {
    let msg = message("alice", "t", "hi");
    assert!(msg.is_from("u1"));
    assert!(!msg.is_from("u2"));
}

#[test]
fn message_accepts_capitalised_legacy_fields() {
    let msg: Message = serde_json::from_str(
        r#"{"User":{"Id":"u9","Name":"bob"},"Time":"2024-01-01T00:00:00Z","Body":"yo"}"#,
    )
    .expect("legacy message should parse");
    assert_eq!(msg.user.name, "bob");
    assert_eq!(msg.body, "yo");
}

// =============================================================
// HistoryPage
// =============================================================

#[test]
fn history_page_without_messages_field_is_empty() {
    let page: HistoryPage = serde_json::from_str(r#"{"page":3}"#).expect("page should parse");
    assert_eq!(page.page, 3);
    assert!(page.messages.is_empty());
}

#[test]
fn history_page_parses_messages_in_order() {
    let page: HistoryPage = serde_json::from_str(
        r#"{"page":0,"messages":[
            {"user":{"id":"u1","name":"alice"},"time":"t1","body":"one"},
            {"user":{"id":"u2","name":"bob"},"time":"t2","body":"two"}
        ]}"#,
    )
    .expect("page should parse");
    let bodies: Vec<_> = page.messages.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, ["one", "two"]);
}

#[test]
fn login_request_serialises_user_and_password() {
    let req = LoginRequest { user: "alice".to_owned(), password: "pw1".to_owned() };
    let value = serde_json::to_value(&req).expect("serialise");
    assert_eq!(value, serde_json::json!({ "user": "alice", "password": "pw1" }));
}
