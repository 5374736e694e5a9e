//! Floating contextual toolbar anchoring.
//!
//! The toolbar follows the active element: its anchor is horizontally centred
//! on the element and sits a fixed gap above it, or below it in the compact
//! layout so it never covers the element on small screens.

use serde::{Deserialize, Serialize};

use crate::config::ToolbarConfig;
use crate::geometry::{Point, Rect, SlideScale};

/// Which side of the element the toolbar sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarLayout {
    /// Toolbar above the element.
    #[default]
    Standard,
    /// Toolbar below the element (constrained displays).
    Compact,
}

/// Screen-space anchor of the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolbarAnchor {
    /// Anchor point in screen pixels.
    pub position: Point,
    /// Layout the anchor was computed for.
    pub layout: ToolbarLayout,
}

/// Compute the toolbar anchor for an element rectangle in logical units.
#[must_use]
pub fn anchor_for(element: Rect, scale: &SlideScale, config: &ToolbarConfig) -> ToolbarAnchor {
    let screen = scale.rect_to_screen(element);
    let y = match config.layout {
        ToolbarLayout::Standard => screen.y - config.offset_px,
        ToolbarLayout::Compact => screen.bottom() + config.offset_px,
    };
    ToolbarAnchor {
        position: Point::new(screen.center().x, y),
        layout: config.layout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_anchor_sits_above_center() {
        let config = ToolbarConfig::default();
        let anchor = anchor_for(
            Rect::new(100.0, 200.0, 200.0, 100.0),
            &SlideScale::default(),
            &config,
        );
        assert_eq!(anchor.position, Point::new(200.0, 200.0 - config.offset_px));
        assert_eq!(anchor.layout, ToolbarLayout::Standard);
    }

    #[test]
    fn test_compact_anchor_sits_below() {
        let config = ToolbarConfig {
            offset_px: 10.0,
            layout: ToolbarLayout::Compact,
        };
        let scale = SlideScale::new(0.5, Point::new(8.0, 0.0));
        let anchor = anchor_for(Rect::new(100.0, 100.0, 200.0, 100.0), &scale, &config);
        // Screen rect: x 58..158, y 50..100.
        assert_eq!(anchor.position, Point::new(108.0, 110.0));
    }
}
