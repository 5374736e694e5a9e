//! Declarative render output.
//!
//! Renderers map an element to a [`RenderNode`] in screen pixels. Hosts turn
//! nodes into whatever their drawing surface needs; the exporter turns them
//! into SVG.

use std::sync::Arc;

use slide_core::{ElementId, Point, Rect, SlideScale, TextAlign};

use crate::chart::ChartLayout;

/// Per-element rendering inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// The element is the current selection.
    pub selected: bool,
    /// The element is being edited.
    pub editing: bool,
    /// Display scale.
    pub scale: SlideScale,
}

impl RenderContext {
    /// Unselected, not editing, at the given scale.
    #[must_use]
    pub const fn new(scale: SlideScale) -> Self {
        Self {
            selected: false,
            editing: false,
            scale,
        }
    }

    /// Set the selection flag.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set the editing flag.
    #[must_use]
    pub const fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(SlideScale::default())
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// Regular (400).
    Normal,
    /// Bold (700).
    Bold,
}

impl FontWeight {
    /// CSS numeric weight.
    #[must_use]
    pub const fn css_value(self) -> u16 {
        match self {
            Self::Normal => 400,
            Self::Bold => 700,
        }
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    /// Upright.
    Normal,
    /// Italic.
    Italic,
}

/// Resolved text styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Weight.
    pub font_weight: FontWeight,
    /// Slant.
    pub font_style: FontStyle,
    /// Underline decoration.
    pub underline: bool,
    /// Font size in screen pixels.
    pub font_size_px: f64,
    /// Text colour.
    pub color: String,
    /// Alignment.
    pub align: TextAlign,
    /// Line height multiplier.
    pub line_height: f64,
    /// Font family.
    pub font_family: String,
}

/// A text region.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    /// Box in screen pixels.
    pub frame: Rect,
    /// Styling.
    pub style: TextStyle,
    /// Committed text.
    pub content: String,
    /// Whether the host should show an editable region.
    pub editable: bool,
}

/// Optional outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    /// Width in screen pixels.
    pub width: f64,
    /// Colour.
    pub color: String,
}

/// Resolved image styling.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStyle {
    /// Corner rounding as a percentage of the box.
    pub corner_radius_percent: f64,
    /// Opacity from 0 to 1.
    pub opacity: f64,
    /// Border, when enabled.
    pub border: Option<Border>,
}

/// An image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    /// Box in screen pixels.
    pub frame: Rect,
    /// Source URL or data URI.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Styling.
    pub style: ImageStyle,
    /// Whether the image content takes pointer input itself. Always false:
    /// the owning element slot handles drags.
    pub intercepts_pointer: bool,
}

/// Outline of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// A box with elliptical corner radii; a circle is a box rounded by half
    /// its size.
    Rounded {
        /// Horizontal corner radius in screen pixels.
        rx: f64,
        /// Vertical corner radius in screen pixels.
        ry: f64,
    },
    /// A closed polygon with points relative to the frame's top-left corner.
    Polygon(Vec<Point>),
}

/// A shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    /// Box in screen pixels.
    pub frame: Rect,
    /// Outline.
    pub geometry: ShapeGeometry,
    /// Fill colour.
    pub fill: String,
    /// Stroke colour.
    pub stroke: String,
    /// Stroke width in screen pixels.
    pub stroke_width: f64,
}

/// A chart drawn onto a raster surface.
#[derive(Debug, Clone)]
pub struct ChartNode {
    /// Box in screen pixels.
    pub frame: Rect,
    /// Geometry in element-local logical units.
    pub layout: ChartLayout,
    /// Raster surface sized to the frame.
    pub surface: Arc<tiny_skia::Pixmap>,
}

/// Output of an element renderer.
#[derive(Debug, Clone)]
pub enum RenderNode {
    /// Text region.
    Text(TextNode),
    /// Image.
    Image(ImageNode),
    /// Shape.
    Shape(ShapeNode),
    /// Chart.
    Chart(ChartNode),
}

impl RenderNode {
    /// Box in screen pixels.
    #[must_use]
    pub const fn frame(&self) -> Rect {
        match self {
            Self::Text(n) => n.frame,
            Self::Image(n) => n.frame,
            Self::Shape(n) => n.frame,
            Self::Chart(n) => n.frame,
        }
    }
}

/// A rendered element with its identity and selection state.
#[derive(Debug, Clone)]
pub struct RenderedElement {
    /// Element id.
    pub id: ElementId,
    /// Stacking order.
    pub z_index: i32,
    /// Whether selection chrome (handles, outline) should be drawn.
    pub selected: bool,
    /// Visual output.
    pub node: RenderNode,
}
