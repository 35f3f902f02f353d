#![forbid(unsafe_code)]

//! Property tests for highlight band geometry.
//!
//! Run:
//!   cargo test -p wayfinder-core --test proptest_geometry_invariants

use proptest::prelude::*;
use wayfinder_core::{ClientRect, OverlayBands, PageRect, ScrollOffset, ViewportSize};

fn target() -> impl Strategy<Value = PageRect> {
    (0i32..2000, 0i32..2000, 1i32..800, 1i32..800)
        .prop_map(|(left, top, width, height)| PageRect::new(left, top, width, height))
}

fn viewport() -> impl Strategy<Value = ViewportSize> {
    (1i32..4000, 1i32..4000).prop_map(|(w, h)| ViewportSize::new(w, h))
}

proptest! {
    #[test]
    fn bands_never_overlap_target(target in target(), viewport in viewport()) {
        let bands = OverlayBands::around(target);
        for band in bands.iter() {
            let rect = band.resolve(viewport);
            let overlap_w = rect.right.min(target.right) - rect.left.max(target.left);
            let overlap_h = rect.bottom.min(target.bottom) - rect.top.max(target.top);
            prop_assert!(
                overlap_w <= 0 || overlap_h <= 0,
                "band {rect:?} overlaps target {target:?}"
            );
        }
    }

    #[test]
    fn bands_have_non_negative_extents(target in target(), viewport in viewport()) {
        for band in OverlayBands::around(target).iter() {
            let rect = band.resolve(viewport);
            prop_assert!(rect.width >= 0);
            prop_assert!(rect.height >= 0);
        }
    }

    #[test]
    fn side_bands_share_target_row(target in target()) {
        let bands = OverlayBands::around(target);
        prop_assert_eq!(bands.left.y, target.top);
        prop_assert_eq!(bands.right.y, target.top);
        prop_assert_eq!(bands.right.x, target.left + target.width);
        prop_assert_eq!(bands.bottom.y, target.top + target.height);
    }

    #[test]
    fn integral_client_rects_convert_exactly(
        x in -500i32..2000,
        y in -500i32..2000,
        w in 0i32..800,
        h in 0i32..800,
        sx in 0i32..5000,
        sy in 0i32..5000,
    ) {
        let rect = PageRect::from_client(
            ClientRect::new(x as f64, y as f64, w as f64, h as f64),
            ScrollOffset::new(sx as f64, sy as f64),
        );
        prop_assert_eq!(rect, PageRect::new(x + sx, y + sy, w, h));
    }
}
