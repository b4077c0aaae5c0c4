//! Page navigation over [`PageState`].
//!
//! Pure state machine: it decides which page is current and which offset shows
//! it, but never touches the document. The reader applies the returned offsets.

use crate::model::{PageState, ViewportHeight};
use tracing::debug;

/// Which end of the document blocked a page turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    /// Already on page 0.
    First,
    /// Already on the last page.
    Last,
}

/// Outcome of a page-turn request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// Moved to the given page; the caller scrolls.
    Advanced(usize),
    /// Nothing moved; the caller notifies and must not scroll.
    Blocked(Boundary),
}

/// Tracks the current page and computes scroll targets.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationController {
    state: PageState,
}

impl PaginationController {
    /// Controller starting at page 0 of 1.
    pub fn new(state: PageState) -> Self {
        Self { state }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Advance one page unless already on the last one.
    pub fn next_page(&mut self) -> PageStep {
        let current = self.state.current_page();
        if current < self.state.last_page() {
            self.state.set_current_page(current + 1);
            debug!(page = current + 1, total = self.state.total_pages(), "Next page");
            PageStep::Advanced(current + 1)
        } else {
            PageStep::Blocked(Boundary::Last)
        }
    }

    /// Go back one page unless already on page 0.
    pub fn previous_page(&mut self) -> PageStep {
        let current = self.state.current_page();
        if current > 0 {
            self.state.set_current_page(current - 1);
            debug!(page = current - 1, total = self.state.total_pages(), "Previous page");
            PageStep::Advanced(current - 1)
        } else {
            PageStep::Blocked(Boundary::First)
        }
    }

    /// Recompute the page count for `content_height`, clamping the current page.
    ///
    /// Returns the new total.
    pub fn recompute(&mut self, content_height: f64) -> usize {
        let total = self.state.page_count_for(content_height);
        self.state.set_total_pages(total);
        debug!(
            content_height,
            total,
            current = self.state.current_page(),
            "Recomputed page count"
        );
        total
    }

    /// Replace the page count directly, clamping the current page.
    pub fn set_total_pages(&mut self, total: usize) {
        self.state.set_total_pages(total);
    }

    /// Replace the viewport height. Callers recompute afterwards.
    pub fn set_viewport_height(&mut self, viewport_height: ViewportHeight) {
        self.state.set_viewport_height(viewport_height);
    }

    /// Derive the current page from the window scroll offset.
    pub fn resync_from_scroll(&mut self, scroll_y: f64) -> usize {
        let page = self.state.page_at_offset(scroll_y);
        self.state.set_current_page(page);
        page
    }

    /// Offset that shows the current page of `content_height` pixels.
    pub fn scroll_target(&self, content_height: f64) -> f64 {
        self.state.scroll_offset_for(content_height)
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
