//! # Saorsa Slides Renderer
//!
//! Turns slide elements into declarative render nodes in screen pixels.
//!
//! ## Element Renderers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  SlideRenderer                      │
//! ├────────────┬────────────┬────────────┬──────────────┤
//! │ Text       │ Image      │ Shape      │ Chart        │
//! │ (style)    │ (style)    │ (geometry) │ (tiny-skia)  │
//! └────────────┴────────────┴────────────┴──────────────┘
//!                            │
//!                  SlideExporter (SVG → PNG/JPEG)
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chart;
pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod image;
pub mod node;
pub mod shape;
pub mod style;
pub mod text;

pub use chart::{layout_chart, parse_series, ChartLayout, ChartRenderer, ChartSeries};
pub use error::{RenderError, RenderResult};
#[cfg(feature = "export")]
pub use export::{ExportConfig, ExportFormat, SlideExporter};
pub use image::ImageRenderer;
pub use node::{RenderContext, RenderNode, RenderedElement};
pub use shape::ShapeRenderer;
pub use text::TextRenderer;

use slide_core::{
    Element, ElementId, ElementKind, Point, PresentationHost, Size, Slide, SlideCanvas, SlideScale,
};

/// Renders one element type.
///
/// `render` takes `&mut self` so implementations may keep per-element caches
/// between frames.
pub trait ElementRenderer {
    /// Produce the visual output for an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is of the wrong type or its surface
    /// cannot be created.
    fn render(&mut self, element: &Element, ctx: &RenderContext) -> RenderResult<RenderNode>;

    /// Whether a logical point lies on the element.
    fn hit_test(&self, element: &Element, point: Point) -> bool {
        element.contains_point(point)
    }

    /// Size given to a freshly inserted element of this type.
    fn default_size(&self) -> Size;
}

/// Dispatches elements to the renderer for their type.
#[derive(Default)]
pub struct SlideRenderer {
    text: TextRenderer,
    image: ImageRenderer,
    shape: ShapeRenderer,
    chart: ChartRenderer,
}

impl SlideRenderer {
    /// Create a renderer with empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The renderer responsible for an element kind.
    pub fn renderer_for(&mut self, kind: &ElementKind) -> &mut dyn ElementRenderer {
        match kind {
            ElementKind::Text(_) => &mut self.text,
            ElementKind::Image(_) => &mut self.image,
            ElementKind::Shape(_) => &mut self.shape,
            ElementKind::Chart(_) => &mut self.chart,
        }
    }

    /// Chart cache counters.
    #[must_use]
    pub const fn chart_stats(&self) -> chart::CacheStats {
        self.chart.stats()
    }

    /// Render elements in the order given.
    ///
    /// `flags` reports `(selected, editing)` per element. Elements that fail
    /// to render are logged and skipped.
    pub fn render_elements<'a>(
        &mut self,
        elements: impl IntoIterator<Item = &'a Element>,
        scale: SlideScale,
        flags: impl Fn(&ElementId) -> (bool, bool),
    ) -> Vec<RenderedElement> {
        let mut rendered = Vec::new();
        for element in elements {
            let (selected, editing) = flags(&element.id);
            let ctx = RenderContext::new(scale).selected(selected).editing(editing);
            match self.renderer_for(&element.kind).render(element, &ctx) {
                Ok(node) => rendered.push(RenderedElement {
                    id: element.id.clone(),
                    z_index: element.z_index,
                    selected,
                    node,
                }),
                Err(e) => tracing::warn!("Skipping element {}: {}", element.id, e),
            }
        }
        rendered
    }

    /// Render a whole slide in stacking order.
    pub fn render_slide(
        &mut self,
        slide: &Slide,
        scale: SlideScale,
        flags: impl Fn(&ElementId) -> (bool, bool),
    ) -> Vec<RenderedElement> {
        self.chart.retain(|id| slide.contains(id));
        self.render_elements(slide.render_order(), scale, flags)
    }

    /// Render what a canvas currently shows, including any in-flight draft.
    pub fn render_canvas<H: PresentationHost>(
        &mut self,
        canvas: &SlideCanvas<H>,
    ) -> Vec<RenderedElement> {
        let slide = canvas.slide();
        self.chart.retain(|id| slide.contains(id));
        let rendered = self.render_elements(canvas.visible_elements(), canvas.scale(), |id| {
            (canvas.is_selected(id), canvas.is_editing(id))
        });
        tracing::trace!("Rendered {} elements for slide {}", rendered.len(), slide.id);
        rendered
    }

    /// The top-most element under a logical point, using each type's own
    /// hit test.
    #[must_use]
    pub fn hit_test(&self, slide: &Slide, point: Point) -> Option<ElementId> {
        slide
            .render_order()
            .into_iter()
            .rev()
            .find(|element| match &element.kind {
                ElementKind::Text(_) => self.text.hit_test(element, point),
                ElementKind::Image(_) => self.image.hit_test(element, point),
                ElementKind::Shape(_) => self.shape.hit_test(element, point),
                ElementKind::Chart(_) => self.chart.hit_test(element, point),
            })
            .map(|element| element.id.clone())
    }
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
