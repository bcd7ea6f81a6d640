use super::*;

#[test]
fn empty_input_is_not_a_failure() {
    assert_eq!(failure_reason(&ClientError::EmptyMessage), None);
}

#[test]
fn closed_socket_is_reported() {
    assert_eq!(failure_reason(&ClientError::SendOnClosed).as_deref(), Some("socket is not open"));
}
