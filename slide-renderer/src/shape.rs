//! Shape element rendering.
//!
//! Rectangles and circles are styled boxes; a circle is a box rounded by half
//! its size. Triangles need a real polygon. Hit testing follows the outline
//! through [`Element::contains_point`].

use slide_core::{triangle_points, Element, ElementKind, Rect, ShapeProps, ShapeType, Size};

use crate::error::{RenderError, RenderResult};
use crate::node::{RenderContext, RenderNode, ShapeGeometry, ShapeNode};
use crate::ElementRenderer;

/// Renders shape elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeRenderer;

impl ShapeRenderer {
    fn geometry(props: &ShapeProps, frame: Rect, factor: f64) -> ShapeGeometry {
        match props.shape_type {
            ShapeType::Rectangle => {
                let r = props.border_radius * factor;
                ShapeGeometry::Rounded { rx: r, ry: r }
            }
            ShapeType::Circle => ShapeGeometry::Rounded {
                rx: frame.width / 2.0,
                ry: frame.height / 2.0,
            },
            ShapeType::Triangle => {
                ShapeGeometry::Polygon(triangle_points(frame.width, frame.height).to_vec())
            }
        }
    }
}

impl ElementRenderer for ShapeRenderer {
    fn render(&mut self, element: &Element, ctx: &RenderContext) -> RenderResult<RenderNode> {
        let ElementKind::Shape(props) = &element.kind else {
            return Err(RenderError::Unsupported(format!(
                "shape renderer cannot draw {} element {}",
                element.element_type(),
                element.id
            )));
        };
        let frame = ctx.scale.rect_to_screen(element.rect());
        Ok(RenderNode::Shape(ShapeNode {
            frame,
            geometry: Self::geometry(props, frame, ctx.scale.factor),
            fill: props.fill.clone(),
            stroke: props.stroke.clone(),
            stroke_width: props.stroke_width * ctx.scale.factor,
        }))
    }

    fn default_size(&self) -> Size {
        ElementKind::Shape(ShapeProps::default()).default_size()
    }
}
