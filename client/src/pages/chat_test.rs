use super::*;

#[test]
fn status_labels_cover_every_state() {
    assert_eq!(status_label(ConnectionStatus::Disconnected), "Offline");
    assert_eq!(status_label(ConnectionStatus::Connecting), "Connecting");
    assert_eq!(status_label(ConnectionStatus::Connected), "Online");
    assert_eq!(status_label(ConnectionStatus::Closing), "Closing");
    assert_eq!(status_label(ConnectionStatus::Reconnecting), "Reconnecting");
}
