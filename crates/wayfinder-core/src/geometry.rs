#![forbid(unsafe_code)]

//! Geometric primitives for element highlighting.
//!
//! Two coordinate spaces are involved:
//!
//! - **client** space: floating-point, relative to the visible viewport, as
//!   reported by the host for a live element ([`ClientRect`]).
//! - **page** space: integral, relative to the document origin
//!   ([`PageRect`]). A client rectangle becomes a page rectangle by adding the
//!   current scroll offset and rounding each component.
//!
//! # Invariants
//!
//! 1. `PageRect::right == left + width` and `PageRect::bottom == top + height`
//!    for every rectangle built with [`PageRect::new`].
//! 2. The four [`OverlayBands`] around a rectangle never overlap it.
//! 3. Band extents resolved against a viewport are never negative.

/// Round to the nearest integer, with halves rounded towards positive
/// infinity (`-2.5 -> -2`, `2.5 -> 3`).
#[inline]
pub fn round_half_up(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

/// Viewport-relative bounding box of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    /// Left edge relative to the viewport.
    pub x: f64,
    /// Top edge relative to the viewport.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    /// Create a new client rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Document scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the visible viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSize {
    pub width: i32,
    pub height: i32,
}

impl ViewportSize {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Page-coordinate bounding box of a highlighted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRect {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl PageRect {
    /// Create a page rectangle from its origin and size.
    #[inline]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            top,
            left,
            width,
            height,
            right: left.saturating_add(width),
            bottom: top.saturating_add(height),
        }
    }

    /// Convert a viewport-relative rectangle into page coordinates.
    ///
    /// Every edge is rounded independently, so `right` is the rounded page
    /// right edge rather than `left + width` when both carry fractions.
    pub fn from_client(rect: ClientRect, scroll: ScrollOffset) -> Self {
        Self {
            top: round_half_up(rect.y + scroll.y),
            left: round_half_up(rect.x + scroll.x),
            width: round_half_up(rect.width),
            height: round_half_up(rect.height),
            right: round_half_up(rect.right() + scroll.x),
            bottom: round_half_up(rect.bottom() + scroll.y),
        }
    }
}

/// Length of one side of an overlay band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// A fixed length in pixels.
    Px(i32),
    /// Stretch to the corresponding viewport edge.
    ToEdge,
}

impl Extent {
    fn resolve(self, origin: i32, limit: i32) -> i32 {
        match self {
            Self::Px(px) => px.max(0),
            Self::ToEdge => limit.saturating_sub(origin).max(0),
        }
    }
}

/// One dimmed region surrounding the highlighted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBand {
    pub x: i32,
    pub y: i32,
    pub width: Extent,
    pub height: Extent,
}

impl OverlayBand {
    /// Resolve edge-relative extents against a concrete viewport.
    pub fn resolve(&self, viewport: ViewportSize) -> PageRect {
        PageRect::new(
            self.x,
            self.y,
            self.width.resolve(self.x, viewport.width),
            self.height.resolve(self.y, viewport.height),
        )
    }
}

/// The four axis-aligned bands covering everything except the target.
///
/// ```text
/// +-------------------------------+
/// |              top              |
/// +------+---------------+--------+
/// | left |    target     | right  |
/// +------+---------------+--------+
/// |            bottom             |
/// +-------------------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBands {
    pub top: OverlayBand,
    pub left: OverlayBand,
    pub right: OverlayBand,
    pub bottom: OverlayBand,
}

impl OverlayBands {
    /// Subtract `target` from the page, producing four bands.
    pub fn around(target: PageRect) -> Self {
        let target_right = target.left.saturating_add(target.width);
        let target_bottom = target.top.saturating_add(target.height);
        Self {
            top: OverlayBand {
                x: 0,
                y: 0,
                width: Extent::ToEdge,
                height: Extent::Px(target.top),
            },
            left: OverlayBand {
                x: 0,
                y: target.top,
                width: Extent::Px(target.left),
                height: Extent::Px(target.height),
            },
            right: OverlayBand {
                x: target_right,
                y: target.top,
                width: Extent::ToEdge,
                height: Extent::Px(target.height),
            },
            bottom: OverlayBand {
                x: 0,
                y: target_bottom,
                width: Extent::ToEdge,
                height: Extent::ToEdge,
            },
        }
    }

    /// Bands in paint order: top, left, right, bottom.
    pub fn iter(&self) -> impl Iterator<Item = &OverlayBand> {
        [&self.top, &self.left, &self.right, &self.bottom].into_iter()
    }
}

/// Everything a renderer needs to draw one highlight: the dimming bands and
/// the rectangle the focus ring is drawn around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightFrame {
    pub bands: OverlayBands,
    pub ring: PageRect,
}

impl HighlightFrame {
    pub fn around(target: PageRect) -> Self {
        Self {
            bands: OverlayBands::around(target),
            ring: target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_up_matches_browser_rounding() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(f64::NAN), 0);
    }

    #[test]
    fn page_rect_adds_scroll_offset() {
        let rect = PageRect::from_client(
            ClientRect::new(10.4, 20.5, 100.0, 40.0),
            ScrollOffset::new(0.0, 300.0),
        );
        assert_eq!(rect.left, 10);
        assert_eq!(rect.top, 321);
        assert_eq!(rect.width, 100);
        assert_eq!(rect.height, 40);
        assert_eq!(rect.right, 110);
        assert_eq!(rect.bottom, 361);
    }

    #[test]
    fn page_rect_new_derives_edges() {
        let rect = PageRect::new(50, 100, 200, 80);
        assert_eq!(rect.right, 250);
        assert_eq!(rect.bottom, 180);
    }

    #[test]
    fn bands_surround_target() {
        let bands = OverlayBands::around(PageRect::new(50, 100, 200, 80));

        assert_eq!(bands.top.height, Extent::Px(100));
        assert_eq!(bands.top.width, Extent::ToEdge);

        assert_eq!(bands.left.width, Extent::Px(50));
        assert_eq!(bands.left.y, 100);
        assert_eq!(bands.left.height, Extent::Px(80));

        assert_eq!(bands.right.x, 250);
        assert_eq!(bands.right.y, 100);

        assert_eq!(bands.bottom.y, 180);
        assert_eq!(bands.bottom.height, Extent::ToEdge);
    }

    #[test]
    fn bands_resolve_against_viewport() {
        let bands = OverlayBands::around(PageRect::new(50, 100, 200, 80));
        let viewport = ViewportSize::new(1024, 768);

        assert_eq!(bands.top.resolve(viewport), PageRect::new(0, 0, 1024, 100));
        assert_eq!(bands.left.resolve(viewport), PageRect::new(0, 100, 50, 80));
        assert_eq!(
            bands.right.resolve(viewport),
            PageRect::new(250, 100, 774, 80)
        );
        assert_eq!(
            bands.bottom.resolve(viewport),
            PageRect::new(0, 180, 1024, 588)
        );
    }

    #[test]
    fn bands_clamp_when_target_leaves_viewport() {
        let bands = OverlayBands::around(PageRect::new(900, 700, 300, 200));
        let viewport = ViewportSize::new(1024, 768);
        for band in bands.iter() {
            let rect = band.resolve(viewport);
            assert!(rect.width >= 0);
            assert!(rect.height >= 0);
        }
        assert_eq!(bands.right.resolve(viewport).width, 0);
        assert_eq!(bands.bottom.resolve(viewport).height, 0);
    }

    #[test]
    fn frame_ring_is_target() {
        let target = PageRect::new(1, 2, 3, 4);
        let frame = HighlightFrame::around(target);
        assert_eq!(frame.ring, target);
        assert_eq!(frame.bands, OverlayBands::around(target));
    }
}
