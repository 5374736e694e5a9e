//! Procedural chart drawing.
//!
//! A chart element stores its data as the raw comma-separated strings the user
//! typed. Drawing happens in three steps:
//!
//! 1. [`parse_series`] turns the strings into values and labels. Tokens that
//!    are not numbers become `NaN` rather than being rejected.
//! 2. [`layout_chart`] computes bar rectangles, line points or pie slices in
//!    element-local logical units.
//! 3. [`rasterize`] fills a `tiny-skia` surface sized to the element box, and
//!    [`chart_svg`] emits the same geometry plus labels as an SVG fragment.
//!
//! Geometry derived from `NaN` values is skipped at draw time while the
//! corresponding labels still draw. A single-point line chart centres its
//! point; a pie whose values sum to zero draws no slices.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::fmt::Write;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use slide_core::{ChartProps, ChartType, Element, ElementId, ElementKind, Point, Rect, Size};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::{RenderError, RenderResult};
use crate::node::{ChartNode, RenderContext, RenderNode};
use crate::style::{escape_xml, parse_color};
use crate::ElementRenderer;

/// Margin between the element box and the plot area, in logical units.
pub const CHART_PADDING: f64 = 40.0;

/// Horizontal gap between bars, in logical units.
pub const BAR_GUTTER: f64 = 10.0;

/// Series colours, cycled by index.
pub const PALETTE: [&str; 10] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
    "#6366f1", "#84cc16",
];

/// Fraction of the radius at which pie labels sit.
pub const PIE_LABEL_RADIUS: f64 = 0.7;

const AXIS_COLOR: &str = "#374151";
const LABEL_COLOR: &str = "#374151";
const PIE_LABEL_COLOR: &str = "#ffffff";
const DOT_RADIUS: f64 = 4.0;

/// Palette colour for a series index.
#[must_use]
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Parsed chart data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Values; unparseable tokens are `NaN`.
    pub values: Vec<f64>,
    /// Labels paired with values by index.
    pub labels: Vec<String>,
}

impl ChartSeries {
    /// Label for a value index, if one was given.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Largest finite value.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}

/// Split a comma-separated list; an empty string yields no entries.
fn split_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .map(str::trim)
        .filter(move |_| !raw.trim().is_empty())
}

/// Parse the raw `data` and `labels` strings.
#[must_use]
pub fn parse_series(props: &ChartProps) -> ChartSeries {
    ChartSeries {
        values: split_tokens(&props.data)
            .map(|t| t.parse::<f64>().unwrap_or(f64::NAN))
            .collect(),
        labels: split_tokens(&props.labels).map(str::to_string).collect(),
    }
}

/// One bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Bar box; `NaN` components mean the bar is not drawn.
    pub rect: Rect,
    /// Source value.
    pub value: f64,
    /// Label drawn under the axis.
    pub label: Option<String>,
    /// Fill colour.
    pub color: &'static str,
}

/// One line-chart point.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    /// Position; a `NaN` y means the point is not drawn.
    pub position: Point,
    /// Source value.
    pub value: f64,
    /// Label drawn under the axis.
    pub label: Option<String>,
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    /// Start angle in radians, clockwise from the positive x axis.
    pub start_angle: f64,
    /// Sweep in radians.
    pub sweep: f64,
    /// Source value.
    pub value: f64,
    /// Label drawn at the slice's mid-angle.
    pub label: Option<String>,
    /// Where the label is centred.
    pub label_position: Point,
    /// Fill colour.
    pub color: &'static str,
}

/// Chart geometry in element-local logical units.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartLayout {
    /// Vertical bars over two axes.
    Bar {
        /// Plot area inside the padding.
        plot: Rect,
        /// Bars in data order.
        bars: Vec<Bar>,
    },
    /// Connected points over two axes.
    Line {
        /// Plot area inside the padding.
        plot: Rect,
        /// Points in data order.
        points: Vec<LinePoint>,
        /// Line and dot colour.
        color: &'static str,
    },
    /// Slices around a centre.
    Pie {
        /// Circle centre.
        center: Point,
        /// Circle radius.
        radius: f64,
        /// Slices in data order.
        slices: Vec<Slice>,
    },
}

/// Plot area for a box of `size`: the box minus the padding on every side.
#[must_use]
pub fn plot_area(size: Size) -> Rect {
    Rect::new(
        CHART_PADDING,
        CHART_PADDING,
        (size.width - 2.0 * CHART_PADDING).max(0.0),
        (size.height - 2.0 * CHART_PADDING).max(0.0),
    )
}

/// Compute chart geometry for a box of `size`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout_chart(props: &ChartProps, size: Size) -> ChartLayout {
    let series = parse_series(props);
    let plot = plot_area(size);
    let count = series.values.len();
    // A non-positive max makes every height NaN or negative; those bars are skipped.
    let max = series.max_value().unwrap_or(f64::NAN);
    let scaled_height = |value: f64| value / max * plot.height;

    match props.chart_type {
        ChartType::Bar => {
            let slot = plot.width / count.max(1) as f64;
            let width = (slot - BAR_GUTTER).max(0.0);
            let bars = series
                .values
                .iter()
                .enumerate()
                .map(|(i, &value)| {
                    let height = scaled_height(value);
                    Bar {
                        rect: Rect::new(
                            plot.x + i as f64 * slot + BAR_GUTTER / 2.0,
                            plot.bottom() - height,
                            width,
                            height,
                        ),
                        value,
                        label: series.label(i).map(str::to_string),
                        color: palette_color(i),
                    }
                })
                .collect();
            ChartLayout::Bar { plot, bars }
        }
        ChartType::Line => {
            let points = series
                .values
                .iter()
                .enumerate()
                .map(|(i, &value)| {
                    let x = if count > 1 {
                        plot.x + i as f64 * plot.width / (count - 1) as f64
                    } else {
                        plot.center().x
                    };
                    LinePoint {
                        position: Point::new(x, plot.bottom() - scaled_height(value)),
                        value,
                        label: series.label(i).map(str::to_string),
                    }
                })
                .collect();
            ChartLayout::Line {
                plot,
                points,
                color: palette_color(0),
            }
        }
        ChartType::Pie => layout_pie(&series, size),
    }
}

fn layout_pie(series: &ChartSeries, size: Size) -> ChartLayout {
    let center = Point::new(size.width / 2.0, size.height / 2.0);
    let radius = (size.width.min(size.height) / 2.0 - CHART_PADDING).max(0.0);
    let total: f64 = series.values.iter().filter(|v| v.is_finite()).sum();

    let mut slices = Vec::new();
    if total != 0.0 {
        let mut angle = 0.0_f64;
        for (i, &value) in series.values.iter().enumerate() {
            let sweep = value / total * TAU;
            let mid = angle + sweep / 2.0;
            slices.push(Slice {
                start_angle: angle,
                sweep,
                value,
                label: series.label(i).map(str::to_string),
                label_position: Point::new(
                    center.x + radius * PIE_LABEL_RADIUS * mid.cos(),
                    center.y + radius * PIE_LABEL_RADIUS * mid.sin(),
                ),
                color: palette_color(i),
            });
            if sweep.is_finite() {
                angle += sweep;
            }
        }
    }
    ChartLayout::Pie {
        center,
        radius,
        slices,
    }
}

fn is_finite_rect(r: Rect) -> bool {
    r.x.is_finite() && r.y.is_finite() && r.width.is_finite() && r.height.is_finite()
}

fn paint_for(css: &str) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(parse_color(css).unwrap_or(tiny_skia::Color::BLACK));
    paint.anti_alias = true;
    paint
}

/// Number of straight segments used to approximate a full circle.
const ARC_SEGMENTS: f64 = 96.0;

#[allow(clippy::cast_possible_truncation)]
fn wedge_path(center: Point, radius: f64, start: f64, sweep: f64) -> Option<tiny_skia::Path> {
    let steps = ((sweep.abs() / TAU) * ARC_SEGMENTS).ceil().max(1.0);
    let mut pb = PathBuilder::new();
    pb.move_to(center.x as f32, center.y as f32);
    let mut step = 0.0;
    while step <= steps {
        let a = start + sweep * step / steps;
        pb.line_to(
            (center.x + radius * a.cos()) as f32,
            (center.y + radius * a.sin()) as f32,
        );
        step += 1.0;
    }
    pb.close();
    pb.finish()
}

#[allow(clippy::cast_possible_truncation)]
fn axes_path(plot: Rect) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(plot.x as f32, plot.y as f32);
    pb.line_to(plot.x as f32, plot.bottom() as f32);
    pb.line_to(plot.right() as f32, plot.bottom() as f32);
    pb.finish()
}

/// Draw chart geometry onto a transparent surface of `size` logical units at
/// `scale` pixels per unit. Text is not drawn on the raster surface.
///
/// # Errors
///
/// Returns [`RenderError::Surface`] if the surface cannot be allocated.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines
)]
pub fn rasterize(layout: &ChartLayout, size: Size, scale: f64) -> RenderResult<Pixmap> {
    let px_w = (size.width * scale).ceil().max(1.0) as u32;
    let px_h = (size.height * scale).ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(px_w, px_h)
        .ok_or_else(|| RenderError::Surface(format!("cannot allocate {px_w}x{px_h} surface")))?;
    let transform = Transform::from_scale(scale as f32, scale as f32);
    let axis_stroke = Stroke {
        width: 2.0,
        ..Stroke::default()
    };

    match layout {
        ChartLayout::Bar { plot, bars } => {
            if let Some(axes) = axes_path(*plot) {
                pixmap.stroke_path(&axes, &paint_for(AXIS_COLOR), &axis_stroke, transform, None);
            }
            for bar in bars {
                if !is_finite_rect(bar.rect) {
                    continue;
                }
                if let Some(rect) = tiny_skia::Rect::from_xywh(
                    bar.rect.x as f32,
                    bar.rect.y as f32,
                    bar.rect.width as f32,
                    bar.rect.height as f32,
                ) {
                    pixmap.fill_rect(rect, &paint_for(bar.color), transform, None);
                }
            }
        }
        ChartLayout::Line {
            plot,
            points,
            color,
        } => {
            if let Some(axes) = axes_path(*plot) {
                pixmap.stroke_path(&axes, &paint_for(AXIS_COLOR), &axis_stroke, transform, None);
            }
            let paint = paint_for(color);
            let visible: Vec<Point> = points
                .iter()
                .map(|p| p.position)
                .filter(|p| p.x.is_finite() && p.y.is_finite())
                .collect();
            if visible.len() > 1 {
                let mut pb = PathBuilder::new();
                pb.move_to(visible[0].x as f32, visible[0].y as f32);
                for p in &visible[1..] {
                    pb.line_to(p.x as f32, p.y as f32);
                }
                if let Some(path) = pb.finish() {
                    let stroke = Stroke {
                        width: 2.0,
                        ..Stroke::default()
                    };
                    pixmap.stroke_path(&path, &paint, &stroke, transform, None);
                }
            }
            for p in &visible {
                let dot = PathBuilder::from_circle(p.x as f32, p.y as f32, DOT_RADIUS as f32);
                if let Some(dot) = dot {
                    pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
                }
            }
        }
        ChartLayout::Pie {
            center,
            radius,
            slices,
        } => {
            for slice in slices {
                if !slice.sweep.is_finite() || slice.sweep == 0.0 {
                    continue;
                }
                if let Some(path) = wedge_path(*center, *radius, slice.start_angle, slice.sweep) {
                    pixmap.fill_path(
                        &path,
                        &paint_for(slice.color),
                        FillRule::Winding,
                        transform,
                        None,
                    );
                }
            }
        }
    }
    Ok(pixmap)
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value}")
    }
}

fn svg_axes(svg: &mut String, plot: Rect) {
    let _ = write!(
        svg,
        "<path d=\"M{},{} L{},{} L{},{}\" fill=\"none\" stroke=\"{AXIS_COLOR}\" stroke-width=\"2\"/>",
        plot.x,
        plot.y,
        plot.x,
        plot.bottom(),
        plot.right(),
        plot.bottom(),
    );
}

fn svg_text(svg: &mut String, x: f64, y: f64, fill: &str, text: &str) {
    if !x.is_finite() || !y.is_finite() {
        return;
    }
    let _ = write!(
        svg,
        "<text x=\"{x}\" y=\"{y}\" font-size=\"12\" fill=\"{fill}\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>",
        escape_xml(text),
    );
}

/// Render a chart as an SVG group translated to `origin` (logical units).
#[must_use]
pub fn chart_svg(layout: &ChartLayout, origin: Point) -> String {
    let mut svg = String::with_capacity(1024);
    let _ = write!(svg, "<g transform=\"translate({},{})\">", origin.x, origin.y);

    match layout {
        ChartLayout::Bar { plot, bars } => {
            svg_axes(&mut svg, *plot);
            for bar in bars {
                let cx = bar.rect.x + bar.rect.width / 2.0;
                if is_finite_rect(bar.rect) {
                    let _ = write!(
                        svg,
                        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                        bar.rect.x, bar.rect.y, bar.rect.width, bar.rect.height, bar.color,
                    );
                    svg_text(&mut svg, cx, bar.rect.y - 5.0, LABEL_COLOR, &format_value(bar.value));
                }
                if let Some(label) = &bar.label {
                    svg_text(&mut svg, cx, plot.bottom() + 20.0, LABEL_COLOR, label);
                }
            }
        }
        ChartLayout::Line {
            plot,
            points,
            color,
        } => {
            svg_axes(&mut svg, *plot);
            let coords: Vec<String> = points
                .iter()
                .filter(|p| p.position.x.is_finite() && p.position.y.is_finite())
                .map(|p| format!("{},{}", p.position.x, p.position.y))
                .collect();
            if coords.len() > 1 {
                let _ = write!(
                    svg,
                    "<polyline points=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\"/>",
                    coords.join(" "),
                );
            }
            for point in points {
                let p = point.position;
                if p.y.is_finite() {
                    let _ = write!(
                        svg,
                        "<circle cx=\"{}\" cy=\"{}\" r=\"{DOT_RADIUS}\" fill=\"{color}\"/>",
                        p.x, p.y,
                    );
                    svg_text(&mut svg, p.x, p.y - 10.0, LABEL_COLOR, &format_value(point.value));
                }
                if let Some(label) = &point.label {
                    svg_text(&mut svg, p.x, plot.bottom() + 20.0, LABEL_COLOR, label);
                }
            }
        }
        ChartLayout::Pie {
            center,
            radius,
            slices,
        } => {
            for slice in slices {
                if !slice.sweep.is_finite() || slice.sweep == 0.0 {
                    continue;
                }
                svg_wedge(&mut svg, *center, *radius, slice);
                if let Some(label) = &slice.label {
                    svg_text(
                        &mut svg,
                        slice.label_position.x,
                        slice.label_position.y,
                        PIE_LABEL_COLOR,
                        label,
                    );
                }
            }
        }
    }

    svg.push_str("</g>");
    svg
}

fn svg_wedge(svg: &mut String, center: Point, radius: f64, slice: &Slice) {
    let (cx, cy) = (center.x, center.y);
    let end = slice.start_angle + slice.sweep;
    if (slice.sweep - TAU).abs() < 1e-9 {
        let _ = write!(
            svg,
            "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"{}\"/>",
            slice.color,
        );
        return;
    }
    let x1 = cx + radius * slice.start_angle.cos();
    let y1 = cy + radius * slice.start_angle.sin();
    let x2 = cx + radius * end.cos();
    let y2 = cy + radius * end.sin();
    let large_arc = i32::from(slice.sweep > std::f64::consts::PI);
    let _ = write!(
        svg,
        "<path d=\"M{cx},{cy} L{x1},{y1} A{radius},{radius} 0 {large_arc},1 {x2},{y2} Z\" fill=\"{}\"/>",
        slice.color,
    );
}

/// Inputs that change a chart's pixels.
fn fingerprint(props: &ChartProps, size: Size, scale: f64) -> u64 {
    let mut hasher = DefaultHasher::new();
    props.chart_type.as_str().hash(&mut hasher);
    props.data.hash(&mut hasher);
    props.labels.hash(&mut hasher);
    size.width.to_bits().hash(&mut hasher);
    size.height.to_bits().hash(&mut hasher);
    scale.to_bits().hash(&mut hasher);
    hasher.finish()
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Renders served from the cache.
    pub hits: u64,
    /// Full redraws.
    pub misses: u64,
}

struct CachedChart {
    fingerprint: u64,
    layout: ChartLayout,
    surface: Arc<Pixmap>,
}

/// Renders chart elements, redrawing only when their properties, size or
/// scale change.
#[derive(Default)]
pub struct ChartRenderer {
    cache: HashMap<ElementId, CachedChart>,
    stats: CacheStats,
}

impl ChartRenderer {
    /// Create a renderer with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache counters.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Forget cached surfaces for elements no longer present.
    pub fn retain(&mut self, keep: impl Fn(&ElementId) -> bool) {
        self.cache.retain(|id, _| keep(id));
    }
}

impl ElementRenderer for ChartRenderer {
    fn render(&mut self, element: &Element, ctx: &RenderContext) -> RenderResult<RenderNode> {
        let ElementKind::Chart(props) = &element.kind else {
            return Err(RenderError::Unsupported(format!(
                "chart renderer cannot draw {} element {}",
                element.element_type(),
                element.id
            )));
        };
        let frame = ctx.scale.rect_to_screen(element.rect());
        let fp = fingerprint(props, element.size, ctx.scale.factor);

        if let Some(cached) = self.cache.get(&element.id) {
            if cached.fingerprint == fp {
                self.stats.hits += 1;
                return Ok(RenderNode::Chart(ChartNode {
                    frame,
                    layout: cached.layout.clone(),
                    surface: Arc::clone(&cached.surface),
                }));
            }
        }

        self.stats.misses += 1;
        tracing::trace!("Redrawing {} chart {}", props.chart_type.as_str(), element.id);
        let layout = layout_chart(props, element.size);
        let surface = Arc::new(rasterize(&layout, element.size, ctx.scale.factor)?);
        self.cache.insert(
            element.id.clone(),
            CachedChart {
                fingerprint: fp,
                layout: layout.clone(),
                surface: Arc::clone(&surface),
            },
        );
        Ok(RenderNode::Chart(ChartNode {
            frame,
            layout,
            surface,
        }))
    }

    fn default_size(&self) -> Size {
        ElementKind::Chart(ChartProps::default()).default_size()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    fn props(chart_type: ChartType, data: &str, labels: &str) -> ChartProps {
        ChartProps {
            chart_type,
            data: data.to_string(),
            labels: labels.to_string(),
        }
    }

    #[test]
    fn test_parse_series_keeps_bad_tokens_as_nan() {
        let series = parse_series(&props(ChartType::Bar, "1, x ,3", "a,b"));
        assert_eq!(series.values.len(), 3);
        assert!(series.values[1].is_nan());
        assert_eq!(series.label(1), Some("b"));
        assert_eq!(series.label(2), None);
        assert_eq!(series.max_value(), Some(3.0));
    }

    #[test]
    fn test_parse_empty_data() {
        let series = parse_series(&props(ChartType::Bar, "", ""));
        assert!(series.values.is_empty());
        assert!(series.labels.is_empty());
    }

    #[test]
    fn test_tallest_bar_fills_plot_height() {
        let layout = layout_chart(
            &props(ChartType::Bar, "10,20,30", "A,B,C"),
            Size::new(400.0, 300.0),
        );
        let ChartLayout::Bar { plot, bars } = layout else {
            panic!("expected bar layout");
        };
        assert_eq!(plot.height, 220.0);
        let tallest = bars
            .iter()
            .max_by(|a, b| a.rect.height.total_cmp(&b.rect.height))
            .expect("bars");
        assert_eq!(tallest.value, 30.0);
        assert_eq!(tallest.rect.height, plot.height);
        assert_eq!(tallest.rect.y, plot.y);
        assert_eq!(tallest.label.as_deref(), Some("C"));
        // Width: 320 / 3 - 10.
        assert!((bars[0].rect.width - (320.0 / 3.0 - BAR_GUTTER)).abs() < 1e-9);
        assert_eq!(bars[1].color, PALETTE[1]);
    }

    #[test]
    fn test_pie_sweeps_cover_full_turn() {
        let layout = layout_chart(&props(ChartType::Pie, "25,75", "a,b"), Size::new(400.0, 300.0));
        let ChartLayout::Pie { slices, radius, .. } = layout else {
            panic!("expected pie layout");
        };
        assert_eq!(radius, 110.0);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].sweep - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(slices[0].start_angle, 0.0);
        let total: f64 = slices.iter().map(|s| s.sweep).sum();
        assert!((total - 2.0 * PI).abs() < 1e-12);
        assert!((slices[1].start_angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_sum_pie_has_no_slices() {
        let layout = layout_chart(&props(ChartType::Pie, "0,0", ""), Size::new(200.0, 200.0));
        assert!(matches!(layout, ChartLayout::Pie { ref slices, .. } if slices.is_empty()));
    }

    #[test]
    fn test_single_point_line_is_centred() {
        let layout = layout_chart(&props(ChartType::Line, "5", "only"), Size::new(300.0, 200.0));
        let ChartLayout::Line { plot, points, .. } = layout else {
            panic!("expected line layout");
        };
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].position, Point::new(plot.center().x, plot.y));
    }

    #[test]
    fn test_line_points_span_plot_width() {
        let layout = layout_chart(&props(ChartType::Line, "1,2,4", ""), Size::new(280.0, 200.0));
        let ChartLayout::Line { plot, points, .. } = layout else {
            panic!("expected line layout");
        };
        assert_eq!(points[0].position.x, plot.x);
        assert_eq!(points[2].position.x, plot.right());
        assert_eq!(points[2].position.y, plot.y);
        assert_eq!(points[0].position.y, plot.bottom() - plot.height / 4.0);
    }

    #[test]
    fn test_nan_bar_is_skipped_but_labelled() {
        let malformed = props(ChartType::Bar, "10,oops", "A,B");
        let layout = layout_chart(&malformed, Size::new(400.0, 300.0));
        let svg = chart_svg(&layout, Point::default());
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains(">B</text>"));
        assert!(rasterize(&layout, Size::new(400.0, 300.0), 1.0).is_ok());
    }

    #[test]
    fn test_raster_surface_matches_box_and_draws_bars() {
        let size = Size::new(400.0, 300.0);
        let layout = layout_chart(&props(ChartType::Bar, "10,20,30", "A,B,C"), size);
        let pixmap = rasterize(&layout, size, 0.5).expect("surface");
        assert_eq!((pixmap.width(), pixmap.height()), (200, 150));

        // Centre of the tallest bar, in logical units (x ~ 280, y ~ 150).
        let ChartLayout::Bar { bars, .. } = &layout else {
            panic!("expected bar layout");
        };
        let c = bars[2].rect.center();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pixel = pixmap
            .pixel((c.x * 0.5) as u32, (c.y * 0.5) as u32)
            .expect("pixel in range");
        assert_eq!(pixel.alpha(), 255);
        // Background stays transparent.
        assert_eq!(pixmap.pixel(1, 1).map(|p| p.alpha()), Some(0));
    }

    #[test]
    fn test_renderer_caches_until_properties_change() {
        let mut renderer = ChartRenderer::new();
        let mut element = Element::new(
            "c1",
            ElementKind::Chart(props(ChartType::Bar, "1,2", "a,b")),
        );
        let ctx = RenderContext::default();

        renderer.render(&element, &ctx).expect("first render");
        renderer.render(&element, &ctx).expect("cached render");
        assert_eq!(renderer.stats(), CacheStats { hits: 1, misses: 1 });

        if let ElementKind::Chart(p) = &mut element.kind {
            p.chart_type = ChartType::Pie;
        }
        renderer.render(&element, &ctx).expect("redraw");
        assert_eq!(renderer.stats().misses, 2);
    }

    #[test]
    fn test_renderer_rejects_other_variants() {
        let mut renderer = ChartRenderer::new();
        let element = Element::new("t", ElementKind::default_for(slide_core::ElementType::Text));
        assert!(matches!(
            renderer.render(&element, &RenderContext::default()),
            Err(RenderError::Unsupported(_))
        ));
    }
}
