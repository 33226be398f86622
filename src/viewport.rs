//! Clamped scrolling over an owned sequence of lines.
//!
//! Every mutation keeps `0 <= offset <= max(0, total - page_size)`; nothing
//! here panics or errors on an out-of-range delta.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    pub offset: usize,
    pub page_size: usize,
    pub total_lines: usize,
}

impl ViewportState {
    pub fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.page_size)
    }
}

#[derive(Debug, Clone)]
pub struct Scroller<T> {
    items: Vec<T>,
    offset: usize,
    page_size: usize,
}

impl<T> Default for Scroller<T> {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<T> Scroller<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    /// Replaces the content. New content always starts at the top.
    pub fn bind(&mut self, items: Vec<T>) {
        self.items = items;
        self.offset = 0;
    }

    pub fn clear(&mut self) {
        self.bind(Vec::new());
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: isize) -> usize {
        let target = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        self.offset = target.min(self.max_offset());
        self.offset
    }

    pub fn scroll_to_top(&mut self) -> usize {
        self.offset = 0;
        self.offset
    }

    pub fn scroll_to_bottom(&mut self) -> usize {
        self.offset = self.max_offset();
        self.offset
    }

    pub fn page_up(&mut self) -> usize {
        self.scroll_by(-page_delta(self.page_size))
    }

    pub fn page_down(&mut self) -> usize {
        self.scroll_by(page_delta(self.page_size))
    }

    pub fn visible_slice(&self) -> &[T] {
        let end = self
            .offset
            .saturating_add(self.page_size)
            .min(self.items.len());
        &self.items[self.offset.min(end)..end]
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_lines(&self) -> usize {
        self.items.len()
    }

    pub fn max_offset(&self) -> usize {
        self.state().max_offset()
    }

    pub fn is_scrollable(&self) -> bool {
        self.items.len() > self.page_size
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            offset: self.offset,
            page_size: self.page_size,
            total_lines: self.items.len(),
        }
    }
}

fn page_delta(page_size: usize) -> isize {
    isize::try_from(page_size).unwrap_or(isize::MAX)
}
