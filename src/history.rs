//! History paging cursor.
//!
//! The server stores messages in numbered pages and answers `page=-1` with
//! the newest one. Each response names the page it actually returned; the
//! next older page is that number minus one, and page `0` is the oldest.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

/// Page number the server treats as "newest page".
pub const LATEST_PAGE: i64 = -1;

/// Position of the next history fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryCursor {
    /// Next page to request.
    Page(i64),
    /// Page 0 has been loaded; no older history remains.
    Exhausted,
}

impl Default for HistoryCursor {
    fn default() -> Self {
        Self::Page(LATEST_PAGE)
    }
}

/// Cursor plus an in-flight guard so scroll events cannot stack fetches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryPager {
    cursor: HistoryCursor,
    in_flight: Option<i64>,
}

impl HistoryPager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cursor(&self) -> HistoryCursor {
        self.cursor
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor == HistoryCursor::Exhausted
    }

    /// Claim the next fetch.
    ///
    /// Returns the page to request, or `None` while a fetch is outstanding or
    /// once history is exhausted.
    pub fn begin(&mut self) -> Option<i64> {
        if self.in_flight.is_some() {
            return None;
        }
        let HistoryCursor::Page(page) = self.cursor else {
            return None;
        };
        self.in_flight = Some(page);
        Some(page)
    }

    /// Record a successful fetch of `returned_page`.
    pub fn complete(&mut self, returned_page: i64) {
        self.in_flight = None;
        self.cursor = if returned_page <= 0 {
            HistoryCursor::Exhausted
        } else {
            HistoryCursor::Page(returned_page - 1)
        };
    }

    /// Record a failed fetch. The same page is requested next time.
    pub fn fail(&mut self) {
        self.in_flight = None;
    }
}
