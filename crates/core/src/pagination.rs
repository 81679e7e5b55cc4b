//! Client-side pagination over the in-memory collection

use std::ops::RangeInclusive;

/// Rows shown per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Page buttons shown around the current page
pub const DEFAULT_WINDOW: usize = 5;

/// Number of pages for `count` items; never less than one
pub fn total_pages(count: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    count.div_ceil(page_size).max(1)
}

/// Items on a 1-based `page`, clamped into range
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let page = page.clamp(1, total_pages(items.len(), page_size));
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    &items[start.min(items.len())..end]
}

/// Page numbers to render as buttons around `page`
///
/// Shows at most `width` consecutive pages, centred on the current page where
/// possible and shifted to stay inside `[1, total]`.
pub fn page_window(page: usize, total: usize, width: usize) -> RangeInclusive<usize> {
    let total = total.max(1);
    let width = width.max(1);
    if total <= width {
        return 1..=total;
    }
    let page = page.clamp(1, total);
    let half = width / 2;
    let start = page.saturating_sub(half).max(1);
    let end = (start + width - 1).min(total);
    let start = (end + 1).saturating_sub(width).max(1);
    start..=end
}

/// 1-based inclusive bounds of the rows on `page`, or `None` when empty
pub fn visible_range(page: usize, count: usize, page_size: usize) -> Option<(usize, usize)> {
    if count == 0 {
        return None;
    }
    let page_size = page_size.max(1);
    let page = page.clamp(1, total_pages(count, page_size));
    let first = (page - 1) * page_size + 1;
    let last = (page * page_size).min(count);
    Some((first, last))
}

/// Current-page cursor for a paged view
///
/// Tracks the collection revision it last saw and jumps back to page 1
/// whenever the collection is replaced.
#[derive(Debug, Clone)]
pub struct Pager {
    page: usize,
    page_size: usize,
    window: usize,
    seen_revision: u64,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            window: DEFAULT_WINDOW,
            seen_revision: 0,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Reset to the first page if the collection changed since last seen
    pub fn observe(&mut self, revision: u64) {
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.page = 1;
        }
    }

    pub fn go_to(&mut self, page: usize, count: usize) {
        self.page = page.clamp(1, total_pages(count, self.page_size));
    }

    pub fn next(&mut self, count: usize) {
        self.go_to(self.page + 1, count);
    }

    pub fn prev(&mut self, count: usize) {
        self.go_to(self.page.saturating_sub(1), count);
    }

    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.page_size)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        page_slice(items, self.page, self.page_size)
    }

    pub fn window(&self, count: usize) -> RangeInclusive<usize> {
        page_window(self.page, self.total_pages(count), self.window)
    }

    pub fn visible_range(&self, count: usize) -> Option<(usize, usize)> {
        visible_range(self.page, count, self.page_size)
    }

    /// Pager controls are only needed past a single page
    pub fn needs_controls(&self, count: usize) -> bool {
        count > self.page_size
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
