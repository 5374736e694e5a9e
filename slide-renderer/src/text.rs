//! Text element rendering.

use slide_core::{Element, ElementKind, Size, TextProps};

use crate::error::{RenderError, RenderResult};
use crate::node::{FontStyle, FontWeight, RenderContext, RenderNode, TextNode, TextStyle};
use crate::ElementRenderer;

/// Resolve text properties into a style at the given scale factor.
#[must_use]
pub fn text_style(props: &TextProps, factor: f64) -> TextStyle {
    TextStyle {
        font_weight: if props.bold {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        },
        font_style: if props.italic {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        },
        underline: props.underline,
        font_size_px: props.font_size * factor,
        color: props.color.clone(),
        align: props.align,
        line_height: props.line_height,
        font_family: props.font_family.clone(),
    }
}

/// Renders text elements. The region is editable only while its element is
/// selected and being edited.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl ElementRenderer for TextRenderer {
    fn render(&mut self, element: &Element, ctx: &RenderContext) -> RenderResult<RenderNode> {
        let ElementKind::Text(props) = &element.kind else {
            return Err(RenderError::Unsupported(format!(
                "text renderer cannot draw {} element {}",
                element.element_type(),
                element.id
            )));
        };
        Ok(RenderNode::Text(TextNode {
            frame: ctx.scale.rect_to_screen(element.rect()),
            style: text_style(props, ctx.scale.factor),
            content: props.text.clone(),
            editable: ctx.selected && ctx.editing,
        }))
    }

    fn default_size(&self) -> Size {
        ElementKind::Text(TextProps::default()).default_size()
    }
}
