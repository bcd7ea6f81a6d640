use super::*;

#[test]
fn own_rows_get_modifier_class() {
    assert_eq!(row_class(true), "message message--own");
    assert_eq!(row_class(false), "message");
}

#[test]
fn fetch_only_at_top_edge_when_idle() {
    assert!(should_fetch_older(0, false, false));
    assert!(!should_fetch_older(1, false, false));
    assert!(!should_fetch_older(0, true, false));
    assert!(!should_fetch_older(0, false, true));
}

#[test]
fn overscroll_counts_as_top() {
    assert!(should_fetch_older(-4, false, false));
}

#[test]
fn preserved_scroll_offsets_by_inserted_height() {
    assert_eq!(preserved_scroll_top(500, 900, 0), 400);
    assert_eq!(preserved_scroll_top(500, 900, 10), 410);
    assert_eq!(preserved_scroll_top(500, 500, 0), 0);
}
