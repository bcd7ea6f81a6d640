use super::*;

#[test]
fn push_appends_in_order_with_increasing_seq() {
    let mut log = NoticeLog::default();
    log.info("connected");
    log.error("dial failed");
    let entries: Vec<(u64, NoticeLevel, &str)> = log.entries().map(|n| (n.seq, n.level, n.text.as_str())).collect();
    assert_eq!(
        entries,
        [(0, NoticeLevel::Info, "connected"), (1, NoticeLevel::Error, "dial failed")]
    );
}

#[test]
fn log_is_bounded_and_evicts_oldest() {
    let mut log = NoticeLog::default();
    for i in 0..(MAX_NOTICES + 5) {
        log.info(format!("n{i}"));
    }
    assert_eq!(log.len(), MAX_NOTICES);
    assert_eq!(log.entries().next().map(|n| n.text.as_str()), Some("n5"));
    assert_eq!(log.entries().last().map(|n| n.seq), Some(204));
}

#[test]
fn publish_failed_is_an_error_entry() {
    let mut log = NoticeLog::default();
    log.publish_failed("socket is not open");
    let notice = log.entries().next().cloned();
    assert_eq!(
        notice,
        Some(Notice { seq: 0, level: NoticeLevel::Error, text: "Publish failed: socket is not open".to_owned() })
    );
}

#[test]
fn clear_keeps_sequence_moving() {
    let mut log = NoticeLog::default();
    log.info("a");
    log.clear();
    assert!(log.is_empty());
    log.info("b");
    assert_eq!(log.entries().next().map(|n| n.seq), Some(1));
}
