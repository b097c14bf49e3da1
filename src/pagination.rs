use std::num::NonZeroUsize;

/// Number of pages needed to show `len` items, `page_size` at a time.
pub fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// One entry of the page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageIndicator {
    /// 1-based page number
    pub number: usize,
    pub active: bool,
}

/// Windowed view over a result list
///
/// Switching pages only moves the window; the list itself is never refetched.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: NonZeroUsize,
    active: usize,
}

impl<'a, T> Paginator<'a, T> {
    /// Start on page 1.
    pub fn new(items: &'a [T], page_size: NonZeroUsize) -> Self {
        Self {
            items,
            page_size,
            active: 1,
        }
    }

    pub fn page_count(&self) -> usize {
        page_count(self.items.len(), self.page_size)
    }

    pub fn active_page(&self) -> usize {
        self.active
    }

    /// Items of page `number` (1-based), `None` outside `1..=page_count`.
    pub fn page(&self, number: usize) -> Option<&'a [T]> {
        if number == 0 || number > self.page_count() {
            return None;
        }
        let start = (number - 1) * self.page_size.get();
        let end = (start + self.page_size.get()).min(self.items.len());
        Some(&self.items[start..end])
    }

    /// Items in the active window. Empty when there are no items.
    pub fn current(&self) -> &'a [T] {
        self.page(self.active).unwrap_or_default()
    }

    /// Switch to page `number`. Out-of-range numbers leave the window as is.
    pub fn select(&mut self, number: usize) -> bool {
        if self.page(number).is_none() {
            return false;
        }
        self.active = number;
        true
    }

    pub fn indicators(&self) -> Vec<PageIndicator> {
        (1..=self.page_count())
            .map(|number| PageIndicator {
                number,
                active: number == self.active,
            })
            .collect()
    }
}
