//! Pixel viewport for a scrollable pane.
//!
//! The [`PaneViewport`] struct tracks the visible area of a pane and
//! clamps every scroll write the way a browser scroll container does.

use std::cell::RefCell;
use std::rc::Rc;

use super::ScrollPane;

/// Manages the visible portion of a pane's content.
///
/// The viewport tracks:
/// - Visible height (`client_height`)
/// - Content height (`scroll_height`)
/// - Current scroll offset, always within `[0, max_scroll]`
/// - Where the pane sits in the window (`viewport_top`)
///
/// # Example
///
/// ```
/// use panesync::pane::{PaneViewport, ScrollPane};
///
/// let mut vp = PaneViewport::new(200.0, 1000.0);
/// vp.set_scroll_top(5000.0);
/// assert_eq!(vp.scroll_top(), 800.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PaneViewport {
    client_height: f64,
    scroll_height: f64,
    scroll_top: f64,
    viewport_top: f64,
}

impl PaneViewport {
    /// Create a new viewport scrolled to the top.
    ///
    /// # Arguments
    ///
    /// * `client_height` - Visible height in pixels
    /// * `scroll_height` - Total content height in pixels
    pub const fn new(client_height: f64, scroll_height: f64) -> Self {
        Self {
            client_height,
            scroll_height,
            scroll_top: 0.0,
            viewport_top: 0.0,
        }
    }

    /// Place the pane's visible area at `top` in window coordinates.
    #[must_use]
    pub const fn with_viewport_top(mut self, top: f64) -> Self {
        self.viewport_top = top;
        self
    }

    /// Get the scroll percentage (0-100).
    pub fn scroll_percent(&self) -> u8 {
        let max = self.max_scroll();
        if max <= 0.0 {
            return 100;
        }
        // Percentage value always 0-100
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            ((self.scroll_top / max) * 100.0).round() as u8
        }
    }

    /// Resize the visible area.
    pub fn resize(&mut self, client_height: f64) {
        self.client_height = client_height.max(0.0);
        self.clamp_offset();
    }

    /// Update the content height (e.g., after the document changed).
    pub fn set_scroll_height(&mut self, scroll_height: f64) {
        self.scroll_height = scroll_height.max(0.0);
        self.clamp_offset();
    }

    fn clamp_offset(&mut self) {
        self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
    }
}

impl ScrollPane for PaneViewport {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn set_scroll_top(&mut self, top: f64) {
        let top = if top.is_finite() { top } else { 0.0 };
        self.scroll_top = top.clamp(0.0, self.max_scroll());
    }

    fn viewport_top(&self) -> f64 {
        self.viewport_top
    }
}

/// A viewport shared between the host, the sync core and a rendering
/// engine that needs to report viewport-relative coordinates.
///
/// Clones point at the same viewport.
#[derive(Debug, Clone)]
pub struct SharedViewport(Rc<RefCell<PaneViewport>>);

impl SharedViewport {
    pub fn new(viewport: PaneViewport) -> Self {
        Self(Rc::new(RefCell::new(viewport)))
    }

    /// Run `f` with mutable access to the underlying viewport.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut PaneViewport) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Copy of the current viewport state.
    pub fn snapshot(&self) -> PaneViewport {
        self.0.borrow().clone()
    }
}

impl ScrollPane for SharedViewport {
    fn scroll_top(&self) -> f64 {
        self.0.borrow().scroll_top()
    }

    fn scroll_height(&self) -> f64 {
        self.0.borrow().scroll_height()
    }

    fn client_height(&self) -> f64 {
        self.0.borrow().client_height()
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.0.borrow_mut().set_scroll_top(top);
    }

    fn viewport_top(&self) -> f64 {
        self.0.borrow().viewport_top()
    }
}
