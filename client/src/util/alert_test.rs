use super::*;
use chatroom::HttpError;

#[test]
fn report_text_names_context_and_error_kind() {
    let err = ClientError::from(HttpError::Unauthorized);
    assert_eq!(report_text("Login failed", &err), "Login failed: Unauthorized");
}

#[test]
fn report_text_keeps_transport_detail() {
    let err = ClientError::Transport("connection refused".to_owned());
    assert!(report_text("History failed", &err).ends_with("connection refused"));
}
