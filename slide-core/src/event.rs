//! Input events delivered to the slide canvas.
//!
//! Coordinates are screen pixels; the canvas converts them to logical units
//! with its current [`crate::SlideScale`]. Timestamps are milliseconds from any
//! monotonic origin chosen by the host and act as the canvas clock.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl Modifiers {
    /// Only shift held.
    #[must_use]
    pub const fn shift() -> Self {
        Self {
            shift: true,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled by the platform.
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in screen pixels.
    pub x: f64,
    /// Y position in screen pixels.
    pub y: f64,
}

impl TouchPoint {
    /// Position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// Single-finger event at a screen position.
    #[must_use]
    pub fn single(phase: TouchPhase, x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::new(phase, vec![TouchPoint { id: 0, x, y }], timestamp_ms)
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// All input events the canvas can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// Primary mouse button pressed.
    PointerDown {
        /// Screen position.
        position: Point,
        /// Modifiers held.
        modifiers: Modifiers,
        /// Timestamp in milliseconds.
        timestamp_ms: u64,
    },
    /// Pointer moved.
    PointerMove {
        /// Screen position.
        position: Point,
        /// Timestamp in milliseconds.
        timestamp_ms: u64,
    },
    /// Primary mouse button released.
    PointerUp {
        /// Screen position.
        position: Point,
        /// Timestamp in milliseconds.
        timestamp_ms: u64,
    },
    /// Pointer left the canvas; treated as an implicit release.
    PointerLeave {
        /// Timestamp in milliseconds.
        timestamp_ms: u64,
    },
    /// Raw touch event.
    Touch(TouchEvent),
    /// Clock advance, used to expire the click-arm window.
    Tick {
        /// Current time in milliseconds.
        now_ms: u64,
    },
    /// The host viewport was resized or re-measured.
    ViewportResized {
        /// Measured container width in pixels, if known.
        width: Option<f64>,
        /// Screen position of the slide's top-left corner.
        origin: Point,
    },
}

impl CanvasEvent {
    /// Mouse press at a screen position.
    #[must_use]
    pub const fn pointer_down(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::PointerDown {
            position: Point::new(x, y),
            modifiers: Modifiers {
                shift: false,
                ctrl: false,
                alt: false,
                meta: false,
            },
            timestamp_ms,
        }
    }

    /// Mouse move to a screen position.
    #[must_use]
    pub const fn pointer_move(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::PointerMove {
            position: Point::new(x, y),
            timestamp_ms,
        }
    }

    /// Mouse release at a screen position.
    #[must_use]
    pub const fn pointer_up(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::PointerUp {
            position: Point::new(x, y),
            timestamp_ms,
        }
    }

    /// Timestamp carried by the event, if any.
    #[must_use]
    pub fn timestamp_ms(&self) -> Option<u64> {
        match self {
            Self::PointerDown { timestamp_ms, .. }
            | Self::PointerMove { timestamp_ms, .. }
            | Self::PointerUp { timestamp_ms, .. }
            | Self::PointerLeave { timestamp_ms } => Some(*timestamp_ms),
            Self::Touch(touch) => Some(touch.timestamp_ms),
            Self::Tick { now_ms } => Some(*now_ms),
            Self::ViewportResized { .. } => None,
        }
    }
}
