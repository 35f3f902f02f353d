#![forbid(unsafe_code)]

//! Automatic popup placement next to a highlighted element.
//!
//! Candidate positions are tried in order (below, above, right, left). The
//! first one that fits entirely inside the visible area wins; if none fits
//! the popup goes below. The result is then clamped into the visible area,
//! keeping the left/top edges visible when the popup is larger than it.

use wayfinder_core::{PageRect, ScrollOffset, ViewportSize, round_half_up};

/// Side of the target the popup ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Below,
    Above,
    Right,
    Left,
}

/// Resolved popup origin in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub left: i32,
    pub top: i32,
    pub side: Side,
}

/// Visible part of the page for the given scroll offset and viewport size.
#[must_use]
pub fn visible_area(scroll: ScrollOffset, viewport: ViewportSize) -> PageRect {
    PageRect::new(
        round_half_up(scroll.x),
        round_half_up(scroll.y),
        viewport.width,
        viewport.height,
    )
}

/// Place a `width` x `height` popup `gap` pixels away from `target`.
#[must_use]
pub fn place_beside(
    target: PageRect,
    width: i32,
    height: i32,
    gap: i32,
    visible: PageRect,
) -> Placement {
    let fits = |x: i32, y: i32| {
        x >= visible.left
            && y >= visible.top
            && x.saturating_add(width) <= visible.right
            && y.saturating_add(height) <= visible.bottom
    };

    let below = (target.left, target.bottom.saturating_add(gap), Side::Below);
    let candidates = [
        below,
        (
            target.left,
            target.top.saturating_sub(height).saturating_sub(gap),
            Side::Above,
        ),
        (target.right.saturating_add(gap), target.top, Side::Right),
        (
            target.left.saturating_sub(width).saturating_sub(gap),
            target.top,
            Side::Left,
        ),
    ];

    let (x, y, side) = candidates
        .into_iter()
        .find(|&(x, y, _)| fits(x, y))
        .unwrap_or(below);

    Placement {
        left: x.min(visible.right.saturating_sub(width)).max(visible.left),
        top: y.min(visible.bottom.saturating_sub(height)).max(visible.top),
        side,
    }
}
