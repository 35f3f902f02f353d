#![forbid(unsafe_code)]

//! Highlight chrome: the render layers around a highlighted element.
//!
//! [`HighlightChrome::layers`] turns a [`HighlightFrame`] into an ordered
//! list of [`Layer`]s. Each layer carries inline CSS declarations; the host
//! renderer maps roles to elements and applies the declarations verbatim.
//!
//! Paint order:
//!
//! 1. `Wrapper` - stacking context around the target
//! 2. `Content` - the target itself, lifted above the dim layer
//! 3. `Backdrop` - fixed full-viewport container for the bands
//! 4. `Band(Top | Left | Right | Bottom)`
//! 5. `Ring` - focus ring drawn on the target rectangle

use std::fmt;

use wayfinder_core::{Extent, HighlightFrame, OverlayBand};
use wayfinder_runtime::{Highlighter, TourConfig};

/// Which overlay band a layer paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandSide {
    Top,
    Left,
    Right,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRole {
    Wrapper,
    Content,
    Backdrop,
    Band(BandSide),
    Ring,
}

/// Ordered list of CSS property/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations(Vec<(&'static str, String)>);

impl Declarations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, property: &'static str, value: impl fmt::Display) -> Self {
        self.0.push((property, value.to_string()));
        self
    }

    /// Value of `property`, if set.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

impl fmt::Display for Declarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}: {value};")?;
        }
        Ok(())
    }
}

/// One element to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub role: LayerRole,
    pub style: Declarations,
}

/// Builds highlight layers from configured style tokens.
#[derive(Debug, Clone, Default)]
pub struct HighlightChrome {
    config: TourConfig,
}

impl HighlightChrome {
    pub fn new(config: TourConfig) -> Self {
        Self { config }
    }

    /// Wrapper style when no highlight is shown. Keeps the target measurable
    /// without altering its stacking.
    #[must_use]
    pub fn plain() -> Declarations {
        Declarations::new()
            .with("width", "fit-content")
            .with("height", "fit-content")
    }

    /// Layers for the highlighter's current frame, or `None` when it has
    /// nothing to show.
    #[must_use]
    pub fn for_highlighter(&self, highlighter: &Highlighter) -> Option<Vec<Layer>> {
        highlighter.frame().map(|frame| self.layers(&frame))
    }

    /// All layers for `frame`, in paint order.
    #[must_use]
    pub fn layers(&self, frame: &HighlightFrame) -> Vec<Layer> {
        let target = &self.config.target;
        let overlay = &self.config.overlay;
        let ring = &self.config.ring;

        let mut layers = vec![
            Layer {
                role: LayerRole::Wrapper,
                style: Self::plain()
                    .with("position", "relative")
                    .with("z-index", target.wrapper_z_index),
            },
            Layer {
                role: LayerRole::Content,
                style: Declarations::new()
                    .with("position", "relative")
                    .with("z-index", target.content_z_index),
            },
            Layer {
                role: LayerRole::Backdrop,
                style: Declarations::new()
                    .with("position", "fixed")
                    .with("inset", 0)
                    .with("z-index", overlay.z_index)
                    .with("pointer-events", "auto"),
            },
        ];

        let bands = &frame.bands;
        for (side, band) in [
            (BandSide::Top, &bands.top),
            (BandSide::Left, &bands.left),
            (BandSide::Right, &bands.right),
            (BandSide::Bottom, &bands.bottom),
        ] {
            layers.push(Layer {
                role: LayerRole::Band(side),
                style: band_style(band).with("background", &overlay.color),
            });
        }

        let rect = frame.ring;
        layers.push(Layer {
            role: LayerRole::Ring,
            style: Declarations::new()
                .with("position", "fixed")
                .with("top", px(rect.top))
                .with("left", px(rect.left))
                .with("width", px(rect.width))
                .with("height", px(rect.height))
                .with("box-shadow", format!("0 0 0 {}px {}", ring.width, ring.color))
                .with("border-radius", px(ring.radius))
                .with("pointer-events", "none")
                .with("z-index", ring.z_index),
        });
        layers
    }
}

fn px(value: impl fmt::Display) -> String {
    format!("{value}px")
}

fn band_style(band: &OverlayBand) -> Declarations {
    let style = Declarations::new()
        .with("position", "absolute")
        .with("left", px(band.x))
        .with("top", px(band.y));
    let style = match band.width {
        Extent::Px(width) => style.with("width", px(width)),
        Extent::ToEdge => style.with("right", px(0)),
    };
    match band.height {
        Extent::Px(height) => style.with("height", px(height)),
        Extent::ToEdge => style.with("bottom", px(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wayfinder_core::PageRect;

    fn layers() -> Vec<Layer> {
        let frame = HighlightFrame::around(PageRect::new(50, 100, 200, 80));
        HighlightChrome::default().layers(&frame)
    }

    fn style_of(layers: &[Layer], role: LayerRole) -> String {
        layers
            .iter()
            .find(|layer| layer.role == role)
            .map(|layer| layer.style.to_string())
            .expect("layer present")
    }

    #[test]
    fn paint_order() {
        let roles: Vec<_> = layers().into_iter().map(|layer| layer.role).collect();
        assert_eq!(
            roles,
            vec![
                LayerRole::Wrapper,
                LayerRole::Content,
                LayerRole::Backdrop,
                LayerRole::Band(BandSide::Top),
                LayerRole::Band(BandSide::Left),
                LayerRole::Band(BandSide::Right),
                LayerRole::Band(BandSide::Bottom),
                LayerRole::Ring,
            ]
        );
    }

    #[test]
    fn bands_carry_cutout_geometry() {
        let layers = layers();
        assert_eq!(
            style_of(&layers, LayerRole::Band(BandSide::Top)),
            "position: absolute; left: 0px; top: 0px; right: 0px; height: 100px; \
             background: rgba(0, 0, 0, 0.6);"
        );
        assert_eq!(
            style_of(&layers, LayerRole::Band(BandSide::Left)),
            "position: absolute; left: 0px; top: 100px; width: 50px; height: 80px; \
             background: rgba(0, 0, 0, 0.6);"
        );
        assert_eq!(
            style_of(&layers, LayerRole::Band(BandSide::Right)),
            "position: absolute; left: 250px; top: 100px; right: 0px; height: 80px; \
             background: rgba(0, 0, 0, 0.6);"
        );
        assert_eq!(
            style_of(&layers, LayerRole::Band(BandSide::Bottom)),
            "position: absolute; left: 0px; top: 180px; right: 0px; bottom: 0px; \
             background: rgba(0, 0, 0, 0.6);"
        );
    }

    #[test]
    fn ring_and_stacking_use_config() {
        let layers = layers();
        assert_eq!(
            style_of(&layers, LayerRole::Ring),
            "position: fixed; top: 100px; left: 50px; width: 200px; height: 80px; \
             box-shadow: 0 0 0 3px rgba(255, 255, 255, 0.9); border-radius: 6px; \
             pointer-events: none; z-index: 72;"
        );
        let wrapper = &layers[0].style;
        assert_eq!(wrapper.get("z-index"), Some("70"));
        assert_eq!(layers[1].style.get("z-index"), Some("71"));
        assert_eq!(layers[2].style.get("z-index"), Some("60"));
    }

    #[test]
    fn custom_config_flows_through() {
        let mut config = TourConfig::default();
        config.overlay.color = "black".to_owned();
        config.ring.width = 1;
        let frame = HighlightFrame::around(PageRect::new(0, 0, 10, 10));
        let layers = HighlightChrome::new(config).layers(&frame);
        assert!(
            layers
                .iter()
                .filter(|l| matches!(l.role, LayerRole::Band(_)))
                .all(|l| l.style.get("background") == Some("black"))
        );
        let ring = layers.last().expect("ring");
        assert_eq!(
            ring.style.get("box-shadow"),
            Some("0 0 0 1px rgba(255, 255, 255, 0.9)")
        );
    }

    #[test]
    fn plain_wrapper_is_fit_content() {
        assert_eq!(
            HighlightChrome::plain().to_string(),
            "width: fit-content; height: fit-content;"
        );
    }
}
