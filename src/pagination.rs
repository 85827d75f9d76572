//! 1-based page cursor for the listing results.

use std::ops::Range;

/// Maximum number of page buttons shown at once.
pub const WINDOW_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current: usize,
    total_items: usize,
    page_size: usize,
}

impl Paginator {
    pub fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            current: 1,
            total_items,
            page_size: page_size.max(1),
        }
    }

    /// There is always at least one (possibly empty) page.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn go_to(&mut self, page: usize) {
        self.current = page.clamp(1, self.total_pages());
    }

    pub fn next(&mut self) {
        self.go_to(self.current + 1);
    }

    pub fn previous(&mut self) {
        self.go_to(self.current.saturating_sub(1));
    }

    /// Updates the item count after a filter change and pulls the cursor back
    /// inside the new page range.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.go_to(self.current);
    }

    /// Index range of the items shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// Whether any navigation should be drawn at all.
    pub fn is_visible(&self) -> bool {
        self.total_pages() > 1
    }

    /// Page numbers to draw as buttons. The window always starts at page 1 and
    /// does not slide with the current page, so pages past the fifth are only
    /// reachable with next/previous.
    pub fn window(&self) -> Vec<usize> {
        if !self.is_visible() {
            return Vec::new();
        }
        (1..=self.total_pages().min(WINDOW_SIZE)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn single_page_draws_nothing() {
        let pager = Paginator::new(4, 6);
        assert_eq!(pager.total_pages(), 1);
        assert!(!pager.is_visible());
        assert!(pager.window().is_empty());

        let empty = Paginator::new(0, 6);
        assert_eq!(empty.total_pages(), 1);
        assert!(empty.window().is_empty());
        assert_eq!(empty.page_range(), 0..0);
    }

    #[test]
    fn go_to_clamps() {
        let mut pager = Paginator::new(25, 5);
        pager.go_to(0);
        assert_eq!(pager.current_page(), 1);
        pager.go_to(99);
        assert_eq!(pager.current_page(), 5);
        pager.next();
        assert_eq!(pager.current_page(), 5);
        pager.go_to(1);
        pager.previous();
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn window_is_anchored_at_first_page() {
        let mut pager = Paginator::new(100, 10);
        pager.go_to(8);
        assert_eq!(pager.window(), vec![1, 2, 3, 4, 5]);

        let short = Paginator::new(12, 5);
        assert_eq!(short.window(), vec![1, 2, 3]);
    }

    #[test]
    fn page_range_covers_partial_last_page() {
        let mut pager = Paginator::new(12, 5);
        assert_eq!(pager.page_range(), 0..5);
        pager.go_to(3);
        assert_eq!(pager.page_range(), 10..12);
    }

    #[test]
    fn shrinking_results_pulls_cursor_back() {
        let mut pager = Paginator::new(50, 5);
        pager.go_to(10);
        pager.set_total_items(7);
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.page_range(), 5..7);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let pager = Paginator::new(3, 0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.total_pages(), 3);
    }

    proptest! {
        #[test]
        fn prop_cursor_stays_in_range(items in 0usize..500, size in 1usize..20, target in 0usize..1000) {
            let mut pager = Paginator::new(items, size);
            pager.go_to(target);
            prop_assert!(pager.current_page() >= 1);
            prop_assert!(pager.current_page() <= pager.total_pages());
            let range = pager.page_range();
            prop_assert!(range.end <= items);
            prop_assert!(range.len() <= size);
            prop_assert!(pager.window().len() <= WINDOW_SIZE);
        }
    }
}
