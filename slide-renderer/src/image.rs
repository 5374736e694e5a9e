//! Image element rendering.
//!
//! A purely presentational mapping from properties to style. The image never
//! takes pointer input itself; dragging is handled by the element slot.

use slide_core::{Element, ElementKind, ImageProps, Size};

use crate::error::{RenderError, RenderResult};
use crate::node::{Border, ImageNode, ImageStyle, RenderContext, RenderNode};
use crate::ElementRenderer;

/// Resolve image properties into a style at the given scale factor.
#[must_use]
pub fn image_style(props: &ImageProps, factor: f64) -> ImageStyle {
    ImageStyle {
        corner_radius_percent: props.border_radius.clamp(0.0, 50.0),
        opacity: (props.opacity / 100.0).clamp(0.0, 1.0),
        border: props.border.then(|| Border {
            width: props.border_width * factor,
            color: props.border_color.clone(),
        }),
    }
}

/// Renders image elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRenderer;

impl ElementRenderer for ImageRenderer {
    fn render(&mut self, element: &Element, ctx: &RenderContext) -> RenderResult<RenderNode> {
        let ElementKind::Image(props) = &element.kind else {
            return Err(RenderError::Unsupported(format!(
                "image renderer cannot draw {} element {}",
                element.element_type(),
                element.id
            )));
        };
        Ok(RenderNode::Image(ImageNode {
            frame: ctx.scale.rect_to_screen(element.rect()),
            src: props.src.clone(),
            alt: props.alt.clone(),
            style: image_style(props, ctx.scale.factor),
            intercepts_pointer: false,
        }))
    }

    fn default_size(&self) -> Size {
        ElementKind::Image(ImageProps::default()).default_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_mapping() {
        let props = ImageProps {
            border_radius: 80.0,
            opacity: 40.0,
            border: true,
            border_width: 3.0,
            border_color: "#ff0000".to_string(),
            ..ImageProps::default()
        };
        let style = image_style(&props, 2.0);
        assert!((style.corner_radius_percent - 50.0).abs() < f64::EPSILON);
        assert!((style.opacity - 0.4).abs() < 1e-12);
        assert_eq!(
            style.border,
            Some(Border {
                width: 6.0,
                color: "#ff0000".to_string()
            })
        );
    }

    #[test]
    fn test_no_border_by_default_and_never_intercepts() {
        let element = Element::new("img", ElementKind::Image(ImageProps::default()));
        let RenderNode::Image(node) = ImageRenderer
            .render(&element, &RenderContext::default().selected(true))
            .expect("render")
        else {
            panic!("expected image node");
        };
        assert!(node.style.border.is_none());
        assert!((node.style.opacity - 1.0).abs() < f64::EPSILON);
        assert!(!node.intercepts_pointer);
        assert_eq!(node.alt, "Image");
    }
}
