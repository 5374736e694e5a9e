//! Slide export to image formats.
//!
//! Renders a [`Slide`] to SVG, PNG or JPEG. Elements go through the same
//! renderers as the live canvas at scale 1, so the SVG is in logical units;
//! the output size is set by [`ExportConfig::scale`]. Raster formats use the
//! resvg/tiny-skia pipeline.

use std::fmt::Write;

use image::ImageEncoder;
use slide_core::{Slide, SlideScale, TextAlign, SLIDE_HEIGHT, SLIDE_WIDTH};

use crate::chart::chart_svg;
use crate::error::{RenderError, RenderResult};
use crate::node::{FontStyle, ImageNode, RenderNode, ShapeGeometry, ShapeNode, TextNode};
use crate::style::{escape_xml, parse_color};
use crate::SlideRenderer;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
}

impl ExportFormat {
    /// Guess the format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
        }
    }
}

/// Configuration for slide export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output pixels per logical unit (e.g. 2.0 for retina).
    pub scale: f32,
    /// Background colour overriding the slide's own.
    pub background: Option<String>,
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 85,
        }
    }
}

/// Exports a [`Slide`] to image formats.
pub struct SlideExporter {
    config: ExportConfig,
}

impl SlideExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Export a slide to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide cannot be rendered or encoded.
    pub fn export(&self, slide: &Slide, format: ExportFormat) -> RenderResult<Vec<u8>> {
        match format {
            ExportFormat::Png => self.render_to_png(slide),
            ExportFormat::Jpeg => self.render_to_jpeg(slide),
            ExportFormat::Svg => Ok(self.render_to_svg(slide)?.into_bytes()),
        }
    }

    /// Export the slide to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, slide: &Slide) -> RenderResult<Vec<u8>> {
        let pixmap = Self::rasterize_svg(&self.render_to_svg(slide)?)?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the slide to JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_jpeg(&self, slide: &Slide) -> RenderResult<Vec<u8>> {
        let pixmap = Self::rasterize_svg(&self.render_to_svg(slide)?)?;
        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = parse_color(self.background(slide))
            .unwrap_or(tiny_skia::Color::WHITE)
            .to_color_u8();

        // Pixmap data is premultiplied RGBA; composite over the background.
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        for pixel in pixmap.data().chunks_exact(4) {
            let inv = 1.0 - f32::from(pixel[3]) / 255.0;
            rgb_data.push(f32::from(bg.red()).mul_add(inv, f32::from(pixel[0])) as u8);
            rgb_data.push(f32::from(bg.green()).mul_add(inv, f32::from(pixel[1])) as u8);
            rgb_data.push(f32::from(bg.blue()).mul_add(inv, f32::from(pixel[2])) as u8);
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the slide to an SVG string.
    ///
    /// # Errors
    ///
    /// Currently infallible; elements that fail to render are skipped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_svg(&self, slide: &Slide) -> RenderResult<String> {
        let scale = f64::from(self.config.scale.max(0.01));
        let out_w = (SLIDE_WIDTH * scale).round().max(1.0) as u32;
        let out_h = (SLIDE_HEIGHT * scale).round().max(1.0) as u32;

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {SLIDE_WIDTH} {SLIDE_HEIGHT}\">",
        );
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(self.background(slide)),
        );

        let mut renderer = SlideRenderer::new();
        let rendered = renderer.render_slide(slide, SlideScale::default(), |_| (false, false));
        for (index, element) in rendered.iter().enumerate() {
            match &element.node {
                RenderNode::Text(node) => text_svg(&mut svg, node),
                RenderNode::Image(node) => image_svg(&mut svg, node, index),
                RenderNode::Shape(node) => shape_svg(&mut svg, node),
                RenderNode::Chart(node) => {
                    svg.push_str(&chart_svg(&node.layout, node.frame.origin()));
                }
            }
        }

        svg.push_str("</svg>");
        tracing::debug!("Exported slide {} ({} elements) to SVG", slide.id, rendered.len());
        Ok(svg)
    }

    fn background<'a>(&'a self, slide: &'a Slide) -> &'a str {
        self.config.background.as_deref().unwrap_or(&slide.background)
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(svg_string: &str) -> RenderResult<tiny_skia::Pixmap> {
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_string, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

fn text_svg(svg: &mut String, node: &TextNode) {
    let style = &node.style;
    let (x, anchor) = match style.align {
        TextAlign::Left | TextAlign::Justify => (node.frame.x, "start"),
        TextAlign::Center => (node.frame.center().x, "middle"),
        TextAlign::Right => (node.frame.right(), "end"),
    };
    let line_step = style.font_size_px * style.line_height;
    let _ = write!(
        svg,
        "<text font-size=\"{}\" font-weight=\"{}\" font-family=\"{}\" fill=\"{}\" text-anchor=\"{anchor}\"",
        style.font_size_px,
        style.font_weight.css_value(),
        escape_xml(&style.font_family),
        escape_xml(&style.color),
    );
    if style.font_style == FontStyle::Italic {
        svg.push_str(" font-style=\"italic\"");
    }
    if style.underline {
        svg.push_str(" text-decoration=\"underline\"");
    }
    svg.push('>');
    for (i, line) in node.content.lines().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = node.frame.y + style.font_size_px + line_step * i as f64;
        let _ = write!(svg, "<tspan x=\"{x}\" y=\"{y}\">{}</tspan>", escape_xml(line));
    }
    svg.push_str("</text>");
}

fn image_svg(svg: &mut String, node: &ImageNode, index: usize) {
    let f = node.frame;
    let rx = f.width * node.style.corner_radius_percent / 100.0;
    let ry = f.height * node.style.corner_radius_percent / 100.0;
    if node.src.is_empty() {
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{rx}\" ry=\"{ry}\" fill=\"#f3f4f6\" stroke=\"#d1d5db\" stroke-width=\"1\"/>",
            f.x, f.y, f.width, f.height,
        );
        let c = f.center();
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"#6b7280\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>",
            c.x,
            c.y,
            escape_xml(&node.alt),
        );
    } else {
        let _ = write!(
            svg,
            "<clipPath id=\"img-clip-{index}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{rx}\" ry=\"{ry}\"/></clipPath>",
            f.x, f.y, f.width, f.height,
        );
        let _ = write!(
            svg,
            "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"{}\" opacity=\"{}\" clip-path=\"url(#img-clip-{index})\" preserveAspectRatio=\"xMidYMid slice\"/>",
            f.x,
            f.y,
            f.width,
            f.height,
            escape_xml(&node.src),
            node.style.opacity,
        );
    }
    if let Some(border) = &node.style.border {
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{rx}\" ry=\"{ry}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            f.x,
            f.y,
            f.width,
            f.height,
            escape_xml(&border.color),
            border.width,
        );
    }
}

fn shape_svg(svg: &mut String, node: &ShapeNode) {
    let f = node.frame;
    let paint = format!(
        "fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
        escape_xml(&node.fill),
        escape_xml(&node.stroke),
        node.stroke_width,
    );
    match &node.geometry {
        ShapeGeometry::Rounded { rx, ry } => {
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{rx}\" ry=\"{ry}\" {paint}/>",
                f.x, f.y, f.width, f.height,
            );
        }
        ShapeGeometry::Polygon(points) => {
            let coords: Vec<String> = points
                .iter()
                .map(|p| format!("{},{}", f.x + p.x, f.y + p.y))
                .collect();
            let _ = write!(svg, "<polygon points=\"{}\" {paint}/>", coords.join(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_core::{
        ChartProps, ChartType, Element, ElementKind, ShapeProps, ShapeType, TextProps,
    };

    fn text_element(text: &str) -> Element {
        Element::new(
            "t",
            ElementKind::Text(TextProps {
                text: text.to_string(),
                font_size: 16.0,
                ..TextProps::default()
            }),
        )
        .at(10.0, 20.0)
    }

    #[test]
    fn test_svg_export_empty_slide() {
        let svg = SlideExporter::with_defaults()
            .render_to_svg(&Slide::new("s", ""))
            .expect("svg export");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"960\""));
        assert!(svg.contains("height=\"540\""));
        assert!(svg.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_svg_export_with_multiline_text() {
        let slide = Slide::new("s", "").with_element(text_element("Hello\nWorld"));
        let svg = SlideExporter::with_defaults()
            .render_to_svg(&slide)
            .expect("svg export");
        assert!(svg.contains(">Hello</tspan>"));
        assert!(svg.contains(">World</tspan>"));
        assert!(svg.contains("font-size=\"16\""));
    }

    #[test]
    fn test_xml_escaping() {
        let slide = Slide::new("s", "").with_element(text_element("A < B & C > D"));
        let svg = SlideExporter::with_defaults()
            .render_to_svg(&slide)
            .expect("svg");
        assert!(svg.contains("A &lt; B &amp; C &gt; D"));
    }

    #[test]
    fn test_triangle_and_chart_export() {
        let slide = Slide::new("s", "")
            .with_element(
                Element::new(
                    "tri",
                    ElementKind::Shape(ShapeProps {
                        shape_type: ShapeType::Triangle,
                        ..ShapeProps::default()
                    }),
                )
                .at(0.0, 0.0)
                .sized(100.0, 80.0),
            )
            .with_element(
                Element::new(
                    "pie",
                    ElementKind::Chart(ChartProps {
                        chart_type: ChartType::Pie,
                        data: "60,40".to_string(),
                        labels: "A,B".to_string(),
                    }),
                )
                .at(400.0, 100.0),
            );
        let svg = SlideExporter::with_defaults()
            .render_to_svg(&slide)
            .expect("svg");
        assert!(svg.contains("<polygon points=\"50,0 100,80 0,80\""));
        assert!(svg.contains("translate(400,100)"));
        assert!(svg.contains("<path d=\"M"));
    }

    #[test]
    fn test_chart_labels_share_xml_escaping() {
        let slide = Slide::new("s", "").with_element(Element::new(
            "bar",
            ElementKind::Chart(ChartProps {
                chart_type: ChartType::Bar,
                data: "1,2".to_string(),
                labels: "R&D,<Ops>".to_string(),
            }),
        ));
        let svg = SlideExporter::with_defaults()
            .render_to_svg(&slide)
            .expect("svg");
        assert!(svg.contains(">R&amp;D</text>"));
        assert!(svg.contains(">&lt;Ops&gt;</text>"));
    }

    #[test]
    fn test_scale_factor() {
        let exporter = SlideExporter::new(ExportConfig {
            scale: 0.5,
            ..ExportConfig::default()
        });
        let svg = exporter.render_to_svg(&Slide::new("s", "")).expect("svg");
        assert!(svg.contains("width=\"480\""));
        assert!(svg.contains("height=\"270\""));
        assert!(svg.contains("viewBox=\"0 0 960 540\""));
    }

    #[test]
    fn test_png_export_produces_valid_bytes() {
        let slide = Slide::new("s", "").with_element(text_element("Test"));
        let png = SlideExporter::with_defaults()
            .render_to_png(&slide)
            .expect("png export");
        assert!(png.len() > 8);
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_jpeg_export_produces_valid_bytes() {
        let slide = Slide::new("s", "").with_background("#101010");
        let jpeg = SlideExporter::with_defaults()
            .render_to_jpeg(&slide)
            .expect("jpeg export");
        assert!(jpeg.len() > 2);
        assert_eq!(jpeg[0], 0xFF);
        assert_eq!(jpeg[1], 0xD8);
    }

    #[test]
    fn test_background_override() {
        let exporter = SlideExporter::new(ExportConfig {
            background: Some("#000000".to_string()),
            ..ExportConfig::default()
        });
        let svg = exporter
            .render_to_svg(&Slide::new("s", "").with_background("#abcdef"))
            .expect("svg");
        assert!(svg.contains("fill=\"#000000\""));
        assert!(!svg.contains("#abcdef"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("JPEG"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("svg"), Some(ExportFormat::Svg));
        assert_eq!(ExportFormat::from_extension("gif"), None);
        assert_eq!(ExportFormat::Png.extension(), "png");
    }
}
