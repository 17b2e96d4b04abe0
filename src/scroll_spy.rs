//! Active-section tracking for a rendered table of contents.
//!
//! The page feeds [`ScrollSpy::update`] the viewport-relative boxes of the
//! post's headings (what an intersection observer reports) and highlights
//! [`ScrollSpy::active`]. Everything here is plain arithmetic, so it runs the
//! same under a WASM front-end or in tests.
//!
//! The observed region is the viewport with 20% cut from the top and 35% cut
//! from the bottom:
//!
//! ```text
//! 0.00 ┬──────────────┐
//!      │   (ignored)  │
//! 0.20 ┼──────────────┤ ← root top
//!      │   observed   │
//! 0.65 ┼──────────────┤ ← root bottom
//!      │   (ignored)  │
//! 1.00 ┴──────────────┘
//! ```

/// Viewport-relative vertical extent of one heading.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingBox {
    pub id: String,
    pub top: f64,
    pub bottom: f64,
}

impl HeadingBox {
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> Self {
        Self {
            id: id.into(),
            top,
            bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpyOptions {
    /// Fraction of the viewport height excluded at the top.
    pub top_margin: f64,
    /// Fraction of the viewport height excluded at the bottom.
    pub bottom_margin: f64,
    /// When nothing intersects, headings above this fraction count as passed.
    pub fallback_fraction: f64,
}

impl Default for ScrollSpyOptions {
    fn default() -> Self {
        Self {
            top_margin: 0.20,
            bottom_margin: 0.35,
            fallback_fraction: 0.20,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollSpy {
    options: ScrollSpyOptions,
    active: Option<String>,
}

impl ScrollSpy {
    pub fn new(options: ScrollSpyOptions) -> Self {
        Self {
            options,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Recompute the active heading. Returns `true` if it changed.
    ///
    /// `headings` must be in document order.
    pub fn update(&mut self, headings: &[HeadingBox], viewport_height: f64) -> bool {
        let next = self.select(headings, viewport_height);
        match next {
            Some(id) if self.active.as_deref() != Some(id) => {
                self.active = Some(id.to_string());
                true
            }
            _ => false,
        }
    }

    fn select<'a>(&self, headings: &'a [HeadingBox], viewport_height: f64) -> Option<&'a str> {
        let root_top = viewport_height * self.options.top_margin;
        let root_bottom = viewport_height * (1.0 - self.options.bottom_margin);

        let topmost = headings
            .iter()
            .filter(|h| h.top < root_bottom && h.bottom > root_top)
            .min_by(|a, b| a.top.total_cmp(&b.top));
        if let Some(h) = topmost {
            return Some(&h.id);
        }

        let line = viewport_height * self.options.fallback_fraction;
        headings
            .iter()
            .rev()
            .find(|h| h.top < line)
            .map(|h| h.id.as_str())
    }
}

/// Visibility of the TOC, driven by whether the "back to blog" link is on
/// screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocVisibility {
    pub show: bool,
    pub sticky: bool,
}

impl TocVisibility {
    /// `None` means visibility cannot be observed; the TOC then stays shown.
    pub fn from_back_link(back_link_visible: Option<bool>) -> Self {
        let hidden = !back_link_visible.unwrap_or(false);
        Self {
            show: hidden,
            sticky: hidden,
        }
    }
}

pub const DEFAULT_SCROLL_OFFSET: f64 = 80.0;
pub const DEFAULT_SCROLL_DURATION_MS: f64 = 800.0;

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
    }
}

/// Offset kept above a scroll target. A header pinned at the top of the
/// viewport (`top == 0`) widens it to its height plus 20px.
pub fn scroll_offset(pinned_header_height: Option<f64>) -> f64 {
    match pinned_header_height {
        Some(height) => DEFAULT_SCROLL_OFFSET.max(height + 20.0),
        None => DEFAULT_SCROLL_OFFSET,
    }
}

/// Document position to scroll to for an element at `element_top`.
pub fn scroll_target(element_top: f64, offset: f64) -> f64 {
    element_top - offset
}

/// A smooth scroll from `start` to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub start: f64,
    pub target: f64,
    pub duration_ms: f64,
    pub reduced_motion: bool,
}

impl ScrollAnimation {
    pub fn new(start: f64, target: f64) -> Self {
        Self {
            start,
            target,
            duration_ms: DEFAULT_SCROLL_DURATION_MS,
            reduced_motion: false,
        }
    }

    /// Scroll position `elapsed_ms` after the animation began.
    pub fn position_at(&self, elapsed_ms: f64) -> f64 {
        if self.reduced_motion || self.duration_ms <= 0.0 {
            return self.target;
        }
        let progress = (elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        self.start + (self.target - self.start) * ease_in_out_cubic(progress)
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.reduced_motion || elapsed_ms >= self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f64 = 1000.0;

    fn spy() -> ScrollSpy {
        ScrollSpy::new(ScrollSpyOptions::default())
    }

    #[test]
    fn topmost_intersecting_heading_wins() {
        let mut s = spy();
        let headings = vec![
            HeadingBox::new("a", -400.0, -370.0),
            HeadingBox::new("b", 450.0, 480.0),
            HeadingBox::new("c", 300.0, 330.0),
        ];
        assert!(s.update(&headings, VH));
        assert_eq!(s.active(), Some("c"));
    }

    #[test]
    fn heading_in_margins_does_not_intersect() {
        let mut s = spy();
        // Root region is 200..650.
        let headings = vec![
            HeadingBox::new("top", 100.0, 150.0),
            HeadingBox::new("bottom", 700.0, 730.0),
        ];
        s.update(&headings, VH);
        // Falls back to the last heading above 20% of the viewport.
        assert_eq!(s.active(), Some("top"));
    }

    #[test]
    fn falls_back_to_last_heading_above_line() {
        let mut s = spy();
        let headings = vec![
            HeadingBox::new("one", -900.0, -870.0),
            HeadingBox::new("two", -300.0, -270.0),
            HeadingBox::new("three", 900.0, 930.0),
        ];
        s.update(&headings, VH);
        assert_eq!(s.active(), Some("two"));
    }

    #[test]
    fn keeps_previous_when_nothing_qualifies() {
        let mut s = spy();
        s.update(&[HeadingBox::new("intro", 300.0, 330.0)], VH);
        assert_eq!(s.active(), Some("intro"));

        let changed = s.update(&[HeadingBox::new("intro", 800.0, 830.0)], VH);
        assert!(!changed);
        assert_eq!(s.active(), Some("intro"));
    }

    #[test]
    fn unchanged_selection_reports_no_change() {
        let mut s = spy();
        let headings = [HeadingBox::new("a", 300.0, 330.0)];
        assert!(s.update(&headings, VH));
        assert!(!s.update(&headings, VH));
    }

    #[test]
    fn empty_heading_list_keeps_none() {
        let mut s = spy();
        assert!(!s.update(&[], VH));
        assert_eq!(s.active(), None);
    }

    #[test]
    fn back_link_visibility() {
        assert_eq!(
            TocVisibility::from_back_link(Some(true)),
            TocVisibility {
                show: false,
                sticky: false
            }
        );
        assert!(TocVisibility::from_back_link(Some(false)).show);
        let unknown = TocVisibility::from_back_link(None);
        assert!(unknown.show && unknown.sticky);
    }

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }

    #[test]
    fn animation_interpolates_and_clamps() {
        let anim = ScrollAnimation::new(0.0, 1000.0);
        assert_eq!(anim.position_at(0.0), 0.0);
        assert_eq!(anim.position_at(400.0), 500.0);
        assert_eq!(anim.position_at(5000.0), 1000.0);
        assert!(anim.is_finished(800.0));
        assert!(!anim.is_finished(799.0));
    }

    #[test]
    fn reduced_motion_jumps() {
        let anim = ScrollAnimation {
            reduced_motion: true,
            ..ScrollAnimation::new(0.0, 420.0)
        };
        assert_eq!(anim.position_at(0.0), 420.0);
        assert!(anim.is_finished(0.0));
    }

    #[test]
    fn scroll_target_uses_offset() {
        assert_eq!(scroll_target(1200.0, scroll_offset(None)), 1120.0);
        assert_eq!(scroll_offset(Some(40.0)), 80.0);
        assert_eq!(scroll_offset(Some(100.0)), 120.0);
    }
}
