//! Slide elements - the building blocks of a slide.
//!
//! An element is a positioned, sized box with a z-order and a variant-specific
//! property bag. On the wire the bag is a free-form `properties` object keyed
//! by camelCase names and the variant is selected by a `type` string; in memory
//! it is the closed [`ElementKind`] enum so every consumer matches exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};
use crate::SlideError;

/// Default z-order for elements that do not specify one.
pub const DEFAULT_Z_INDEX: i32 = 1;

/// Where newly created elements are placed.
pub const DEFAULT_INSERT_POSITION: Point = Point::new(100.0, 100.0);

/// Identifier of an element, unique within its slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The wire-level `type` discriminator of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Text box.
    Text,
    /// Raster or vector image.
    Image,
    /// Geometric shape.
    Shape,
    /// Procedurally drawn chart.
    Chart,
}

impl ElementType {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Shape => "shape",
            Self::Chart => "chart",
        }
    }
}

impl FromStr for ElementType {
    type Err = SlideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "shape" => Ok(Self::Shape),
            "chart" => Ok(Self::Chart),
            other => Err(SlideError::InvalidElement(format!(
                "unknown element type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centred.
    Center,
    /// Flush right.
    Right,
    /// Justified.
    Justify,
}

/// Properties of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    /// Text content.
    pub text: String,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Underline decoration.
    pub underline: bool,
    /// Font size in logical units.
    pub font_size: f64,
    /// Text colour (CSS colour string).
    pub color: String,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Line height multiplier.
    pub line_height: f64,
    /// Font family name.
    pub font_family: String,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text: "Click to edit text".to_string(),
            bold: false,
            italic: false,
            underline: false,
            font_size: 24.0,
            color: "#000000".to_string(),
            align: TextAlign::Left,
            line_height: 1.5,
            font_family: "Arial".to_string(),
        }
    }
}

/// Properties of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProps {
    /// Image URL or data URI.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Corner rounding as a percentage of the box.
    pub border_radius: f64,
    /// Opacity from 0 to 100.
    pub opacity: f64,
    /// Whether a border is drawn.
    pub border: bool,
    /// Border width in logical units.
    pub border_width: f64,
    /// Border colour.
    pub border_color: String,
}

impl Default for ImageProps {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: "Image".to_string(),
            border_radius: 0.0,
            opacity: 100.0,
            border: false,
            border_width: 2.0,
            border_color: "#000000".to_string(),
        }
    }
}

/// Geometric shape variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    /// Axis-aligned rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the box.
    Circle,
    /// Isosceles triangle with its apex at the top centre.
    Triangle,
}

impl ShapeType {
    /// Whether `p` lies inside this shape drawn in `rect`.
    #[must_use]
    pub fn contains(self, rect: Rect, p: Point) -> bool {
        if !rect.contains(p) {
            return false;
        }
        match self {
            Self::Rectangle => true,
            Self::Circle => {
                let c = rect.center();
                let (rx, ry) = (rect.width / 2.0, rect.height / 2.0);
                let (dx, dy) = ((p.x - c.x) / rx, (p.y - c.y) / ry);
                dx * dx + dy * dy <= 1.0
            }
            Self::Triangle => {
                let [a, b, c] = triangle_points(rect.width, rect.height);
                let local = p.offset_from(rect.origin());
                let side = |p1: Point, p2: Point| {
                    (p2.x - p1.x) * (local.y - p1.y) - (p2.y - p1.y) * (local.x - p1.x)
                };
                let (d1, d2, d3) = (side(a, b), side(b, c), side(c, a));
                let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
                let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
                !(has_neg && has_pos)
            }
        }
    }
}

/// Triangle vertices for a `width` x `height` box, relative to its top-left.
#[must_use]
pub fn triangle_points(width: f64, height: f64) -> [Point; 3] {
    [
        Point::new(width / 2.0, 0.0),
        Point::new(width, height),
        Point::new(0.0, height),
    ]
}

/// Properties of a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeProps {
    /// Which shape is drawn.
    pub shape_type: ShapeType,
    /// Fill colour.
    pub fill: String,
    /// Stroke colour.
    pub stroke: String,
    /// Stroke width in logical units.
    pub stroke_width: f64,
    /// Corner rounding for rectangles, in logical units.
    pub border_radius: f64,
}

impl Default for ShapeProps {
    fn default() -> Self {
        Self {
            shape_type: ShapeType::Rectangle,
            fill: "#3b82f6".to_string(),
            stroke: "#1e40af".to_string(),
            stroke_width: 2.0,
            border_radius: 0.0,
        }
    }
}

/// Chart variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Vertical bars.
    #[default]
    Bar,
    /// Connected points.
    Line,
    /// Circular slices.
    Pie,
}

impl ChartType {
    /// Wire name of the chart type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
        }
    }
}

/// Properties of a chart element.
///
/// `data` and `labels` stay as the raw comma-separated strings the user typed;
/// they are parsed at draw time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartProps {
    /// Which chart is drawn.
    pub chart_type: ChartType,
    /// Comma-separated numeric values.
    pub data: String,
    /// Comma-separated labels, paired with `data` by index.
    pub labels: String,
}

impl Default for ChartProps {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Bar,
            data: "10,20,30,40".to_string(),
            labels: "Q1,Q2,Q3,Q4".to_string(),
        }
    }
}

/// The variant of an element together with its properties.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A text box.
    Text(TextProps),
    /// An image.
    Image(ImageProps),
    /// A geometric shape.
    Shape(ShapeProps),
    /// A chart.
    Chart(ChartProps),
}

impl ElementKind {
    /// The wire-level type of this variant.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::Image(_) => ElementType::Image,
            Self::Shape(_) => ElementType::Shape,
            Self::Chart(_) => ElementType::Chart,
        }
    }

    /// Variant with default properties.
    #[must_use]
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Text => Self::Text(TextProps::default()),
            ElementType::Image => Self::Image(ImageProps::default()),
            ElementType::Shape => Self::Shape(ShapeProps::default()),
            ElementType::Chart => Self::Chart(ChartProps::default()),
        }
    }

    /// Size given to freshly inserted elements of this variant.
    #[must_use]
    pub const fn default_size(&self) -> Size {
        match self {
            Self::Text(_) => Size::new(300.0, 60.0),
            Self::Image(_) => Size::new(200.0, 150.0),
            Self::Shape(_) => Size::new(150.0, 150.0),
            Self::Chart(_) => Size::new(400.0, 300.0),
        }
    }

    fn properties(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Text(p) => serde_json::to_value(p),
            Self::Image(p) => serde_json::to_value(p),
            Self::Shape(p) => serde_json::to_value(p),
            Self::Chart(p) => serde_json::to_value(p),
        }
    }

    fn from_properties(
        element_type: ElementType,
        properties: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let properties = if properties.is_null() {
            serde_json::json!({})
        } else {
            properties
        };
        Ok(match element_type {
            ElementType::Text => Self::Text(serde_json::from_value(properties)?),
            ElementType::Image => Self::Image(serde_json::from_value(properties)?),
            ElementType::Shape => Self::Shape(serde_json::from_value(properties)?),
            ElementType::Chart => Self::Chart(serde_json::from_value(properties)?),
        })
    }
}

/// A slide element with geometry, z-order and typed properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElementRecord", into = "ElementRecord")]
pub struct Element {
    /// Unique identifier within the slide.
    pub id: ElementId,
    /// Variant and properties.
    pub kind: ElementKind,
    /// Top-left corner in logical units.
    pub position: Point,
    /// Extent in logical units.
    pub size: Size,
    /// Stacking order; higher values render on top.
    pub z_index: i32,
}

impl Element {
    /// Create an element at the default insertion point with its variant's default size.
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        let size = kind.default_size();
        Self {
            id: id.into(),
            kind,
            position: DEFAULT_INSERT_POSITION,
            size,
            z_index: DEFAULT_Z_INDEX,
        }
    }

    /// Set the position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Set the size.
    #[must_use]
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Set the z-order.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The wire-level type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Bounding rectangle in logical units.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Replace position and size from a rectangle.
    pub fn set_rect(&mut self, rect: Rect) {
        self.position = rect.origin();
        self.size = rect.size();
    }

    /// Check if a logical point lies on the element: the outline for shapes,
    /// the bounding box for everything else.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        match &self.kind {
            ElementKind::Shape(props) => props.shape_type.contains(self.rect(), p),
            _ => self.rect().contains(p),
        }
    }

    /// Text content, for text elements.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text(props) => Some(&props.text),
            _ => None,
        }
    }

    /// Replace the text content. Returns `false` for non-text elements.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.kind {
            ElementKind::Text(props) => {
                props.text = text.into();
                true
            }
            _ => false,
        }
    }

    /// Whether position and size match another element's.
    #[must_use]
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.position == other.position && self.size == other.size
    }
}

/// Wire form of an element: `type` string plus a free-form `properties` bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementRecord {
    id: ElementId,
    #[serde(rename = "type")]
    element_type: String,
    position: Point,
    size: Size,
    #[serde(default = "default_z_index")]
    z_index: i32,
    #[serde(default)]
    properties: serde_json::Value,
}

const fn default_z_index() -> i32 {
    DEFAULT_Z_INDEX
}

impl TryFrom<ElementRecord> for Element {
    type Error = SlideError;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let element_type: ElementType = record.element_type.parse()?;
        let kind = ElementKind::from_properties(element_type, record.properties).map_err(|e| {
            SlideError::InvalidElement(format!("{} ({element_type}): {e}", record.id))
        })?;
        Ok(Self {
            id: record.id,
            kind,
            position: record.position,
            size: record.size,
            z_index: record.z_index,
        })
    }
}

impl From<Element> for ElementRecord {
    fn from(element: Element) -> Self {
        let properties = element.kind.properties().unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize properties of {}: {e}", element.id);
            serde_json::Value::Null
        });
        Self {
            id: element.id,
            element_type: element.kind.element_type().as_str().to_string(),
            position: element.position,
            size: element.size,
            z_index: element.z_index,
            properties,
        }
    }
}
