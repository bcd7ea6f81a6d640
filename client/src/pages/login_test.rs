use super::*;

#[test]
fn validate_login_input_trims_user() {
    assert_eq!(
        validate_login_input("  alice ", "pw"),
        Some(("alice".to_owned(), "pw".to_owned()))
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "pw"), None);
    assert_eq!(validate_login_input("alice", ""), None);
}

#[test]
fn validate_login_input_keeps_password_verbatim() {
    assert_eq!(
        validate_login_input("alice", " p w "),
        Some(("alice".to_owned(), " p w ".to_owned()))
    );
}
