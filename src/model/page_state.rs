//! Page geometry and the current/total page pair.

use serde::Serialize;

/// Fraction of the viewport reserved as top and bottom margin.
///
/// # Invariants
/// - Finite and within `[0, 0.5)`, so the effective viewport is always positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Margins(f64);

/// Error returned when margins fall outside `[0, 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Margins must be within [0, 0.5) (got {0})")]
pub struct InvalidMargins(pub f64);

impl Margins {
    /// Margins used when no configuration overrides them.
    pub const DEFAULT: Self = Self(0.1);

    /// Smart constructor that validates the range.
    pub fn new(fraction: f64) -> Result<Self, InvalidMargins> {
        if fraction.is_finite() && (0.0..0.5).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(InvalidMargins(fraction))
        }
    }

    /// Get the raw fraction.
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Viewport height in CSS pixels. Always > 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ViewportHeight(f64);

/// Error returned when a viewport height is zero, negative or not finite.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Viewport height must be > 0 (got {0})")]
pub struct InvalidViewportHeight(pub f64);

impl ViewportHeight {
    /// Smart constructor that rejects non-positive heights.
    pub fn new(pixels: f64) -> Result<Self, InvalidViewportHeight> {
        if pixels.is_finite() && pixels > 0.0 {
            Ok(Self(pixels))
        } else {
            Err(InvalidViewportHeight(pixels))
        }
    }

    /// Get the raw pixel value.
    pub fn get(&self) -> f64 {
        self.0
    }
}

/// Pagination state: which page is showing and how many exist.
///
/// # Invariants
/// - `total_pages >= 1`
/// - `current_page <= total_pages - 1` after every mutation. Out-of-range
///   requests are clamped, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageState {
    current_page: usize,
    total_pages: usize,
    margins: Margins,
    viewport_height: ViewportHeight,
}

impl PageState {
    /// Create a single-page state at page 0.
    pub fn new(margins: Margins, viewport_height: ViewportHeight) -> Self {
        Self {
            current_page: 0,
            total_pages: 1,
            margins,
            viewport_height,
        }
    }

    /// Current 0-based page index.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Total number of pages. Always >= 1.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Index of the last valid page.
    pub fn last_page(&self) -> usize {
        self.total_pages - 1
    }

    /// Configured margins.
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Current viewport height.
    pub fn viewport_height(&self) -> ViewportHeight {
        self.viewport_height
    }

    /// Viewport height after subtracting top and bottom margins.
    ///
    /// This is the height of one page: `viewport_height * (1 - 2 * margins)`.
    pub fn effective_viewport_height(&self) -> f64 {
        self.viewport_height.get() * (1.0 - 2.0 * self.margins.get())
    }

    /// Number of pages needed for `content_height` pixels of content.
    ///
    /// `max(1, ceil(content_height / effective_viewport_height))`. Non-positive
    /// or non-finite heights yield a single page.
    pub fn page_count_for(&self, content_height: f64) -> usize {
        if !content_height.is_finite() || content_height <= 0.0 {
            return 1;
        }
        let pages = (content_height / self.effective_viewport_height()).ceil();
        (pages as usize).max(1)
    }

    /// Scroll offset that shows the current page.
    ///
    /// `min(current_page * effective, max(0, content_height - effective))`, so
    /// the last page is bottom-aligned instead of scrolling past the content.
    pub fn scroll_offset_for(&self, content_height: f64) -> f64 {
        let effective = self.effective_viewport_height();
        let wanted = self.current_page as f64 * effective;
        let max_offset = (content_height - effective).max(0.0);
        wanted.min(max_offset)
    }

    /// Page index containing scroll offset `offset`, clamped to the valid range.
    pub fn page_at_offset(&self, offset: f64) -> usize {
        if !offset.is_finite() || offset <= 0.0 {
            return 0;
        }
        let page = (offset / self.effective_viewport_height()).floor() as usize;
        page.min(self.last_page())
    }

    /// Replace the page count, clamping the current page into range.
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total_pages = total_pages.max(1);
        self.current_page = self.current_page.min(self.last_page());
    }

    /// Move to `page`, clamped to `[0, total_pages - 1]`.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page.min(self.last_page());
    }

    /// Replace the viewport height (page count is recomputed by the caller).
    pub fn set_viewport_height(&mut self, viewport_height: ViewportHeight) {
        self.viewport_height = viewport_height;
    }
}
