//! Logical slide space and its mapping to screen pixels.
//!
//! Every element is laid out in a fixed 960×540 logical space. The host shows
//! the slide at some scale factor `s`; pointer coordinates are mapped back with
//! `(screen - origin) / s` before any geometry math happens, and element
//! rectangles are mapped forward with `logical * s + origin` for display.

use serde::{Deserialize, Serialize};

/// Logical slide width.
pub const SLIDE_WIDTH: f64 = 960.0;

/// Logical slide height.
pub const SLIDE_HEIGHT: f64 = 540.0;

/// Smallest width or height an element can be resized to.
pub const MIN_ELEMENT_SIZE: f64 = 50.0;

/// A point in logical or screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn offset_from(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extent.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from a position and size.
    #[must_use]
    pub const fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Extent.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether the rectangle lies inside the slide and respects the size floor.
    #[must_use]
    pub fn is_within_slide(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= SLIDE_WIDTH
            && self.bottom() <= SLIDE_HEIGHT
            && self.width >= MIN_ELEMENT_SIZE
            && self.height >= MIN_ELEMENT_SIZE
    }
}

/// Clamp a top-left position so a box of `size` stays on the slide.
#[must_use]
pub fn clamp_position(position: Point, size: Size) -> Point {
    Point::new(
        position.x.clamp(0.0, (SLIDE_WIDTH - size.width).max(0.0)),
        position.y.clamp(0.0, (SLIDE_HEIGHT - size.height).max(0.0)),
    )
}

/// Force a rectangle onto the slide: size floor, size cap, then position clamp.
#[must_use]
pub fn clamp_rect(rect: Rect) -> Rect {
    let size = Size::new(
        rect.width.clamp(MIN_ELEMENT_SIZE, SLIDE_WIDTH),
        rect.height.clamp(MIN_ELEMENT_SIZE, SLIDE_HEIGHT),
    );
    Rect::from_parts(clamp_position(rect.origin(), size), size)
}

/// How the scale factor is derived from the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Externally supplied factor (desktop layouts, explicit zoom).
    Fixed {
        /// Scale factor.
        factor: f64,
    },
    /// Fit the slide into the available width, never enlarging past 1.
    ///
    /// The available width is a measurement, not configuration: it arrives
    /// with each [`SlideScale::resolve`] call (from
    /// [`crate::CanvasEvent::ViewportResized`] on a canvas).
    FitWidth {
        /// Horizontal padding subtracted from the measured width.
        padding: f64,
    },
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self::Fixed { factor: 1.0 }
    }
}

/// Mapping between logical slide units and screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideScale {
    /// Pixels per logical unit.
    pub factor: f64,
    /// Screen position of the slide's logical origin.
    pub origin: Point,
}

impl Default for SlideScale {
    fn default() -> Self {
        Self {
            factor: 1.0,
            origin: Point::default(),
        }
    }
}

impl SlideScale {
    /// Create a scale with the given factor and screen origin.
    ///
    /// Non-positive or non-finite factors fall back to `1.0`.
    #[must_use]
    pub fn new(factor: f64, origin: Point) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            1.0
        };
        Self { factor, origin }
    }

    /// Recompute the factor for a measured viewport width.
    ///
    /// A missing measurement (zero, negative or NaN width) keeps the current
    /// factor, so an unmounted container never collapses the slide.
    #[must_use]
    pub fn resolve(self, policy: ScalePolicy, available_width: Option<f64>) -> Self {
        let factor = match policy {
            ScalePolicy::Fixed { factor } => factor,
            ScalePolicy::FitWidth { padding } => match available_width {
                Some(w) if w.is_finite() && w > padding => ((w - padding) / SLIDE_WIDTH).min(1.0),
                _ => return self,
            },
        };
        Self::new(factor, self.origin)
    }

    /// Convert a screen point into logical slide units.
    #[must_use]
    pub fn to_logical(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.origin.x) / self.factor,
            (screen.y - self.origin.y) / self.factor,
        )
    }

    /// Convert a logical point into screen pixels.
    #[must_use]
    pub fn to_screen(&self, logical: Point) -> Point {
        Point::new(
            logical.x * self.factor + self.origin.x,
            logical.y * self.factor + self.origin.y,
        )
    }

    /// Convert a logical rectangle into screen pixels.
    #[must_use]
    pub fn rect_to_screen(&self, logical: Rect) -> Rect {
        let origin = self.to_screen(logical.origin());
        Rect::new(
            origin.x,
            origin.y,
            logical.width * self.factor,
            logical.height * self.factor,
        )
    }

    /// Convert a screen distance into logical units.
    #[must_use]
    pub fn distance_to_logical(&self, pixels: f64) -> f64 {
        pixels / self.factor
    }
}
