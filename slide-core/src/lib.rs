//! # Slide Core
//!
//! Core logic for a fixed-canvas slide editor: the element model, scale-aware
//! geometry, the gesture state machine, toolbar anchoring and templates.
//! Rendering lives in `slide-renderer`; this crate has no drawing dependencies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 SlideCanvas                 │
//! ├─────────────────────────────────────────────┤
//! │  Slide           │  Gesture Machine         │
//! │  - Elements      │  - Click arming          │
//! │  - Z-order       │  - Drag / resize drafts  │
//! │  - Hit testing   │  - Touch long-press      │
//! ├─────────────────────────────────────────────┤
//! │  Geometry/Scale  │  Toolbar  │  Templates   │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod slide;
pub mod template;
pub mod toolbar;

pub use canvas::{CanvasMode, SlideCanvas};
pub use config::{CanvasConfig, GestureConfig, ToolbarConfig};
pub use element::{
    triangle_points, ChartProps, ChartType, Element, ElementId, ElementKind, ElementType,
    ImageProps, ShapeProps, ShapeType, TextAlign, TextProps,
};
pub use error::{SlideError, SlideResult};
pub use event::{CanvasEvent, Modifiers, TouchEvent, TouchPhase, TouchPoint};
pub use geometry::{
    clamp_position, clamp_rect, Point, Rect, ScalePolicy, Size, SlideScale, MIN_ELEMENT_SIZE,
    SLIDE_HEIGHT, SLIDE_WIDTH,
};
pub use gesture::{
    resize_rect, transition, Effect, GestureContext, GestureInput, GestureState, ResizeHandle,
};
pub use host::{PresentationHost, SessionState};
pub use slide::Slide;
pub use template::{
    builtin_templates, find_template, IdGenerator, SequentialIdGenerator, Template,
    TimestampIdGenerator,
};
pub use toolbar::{anchor_for, ToolbarAnchor, ToolbarLayout};

/// Slide core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
