//! Slide templates and fresh-identity instantiation.
//!
//! A template is a slide-shaped value with a fixed element list. Instantiating
//! it yields a structurally identical slide where the slide and every element
//! get a newly generated identifier, so two copies of the same template never
//! share ids within a session.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::{ChartProps, ChartType, ElementKind, ShapeProps, TextAlign, TextProps};
use crate::{Element, ElementId, Slide, SlideError, SlideResult};

/// Source of fresh identifiers.
pub trait IdGenerator {
    /// Produce a new identifier with the given prefix.
    fn next_id(&mut self, prefix: &str) -> String;

    /// Produce a new element identifier.
    fn next_element_id(&mut self) -> ElementId {
        ElementId::new(self.next_id("el"))
    }
}

/// `<prefix>-<unix millis>-<random>` identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIdGenerator;

impl TimestampIdGenerator {
    /// Create a generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&mut self, prefix: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        let random = Uuid::new_v4().simple().to_string();
        format!("{prefix}-{millis}-{}", &random[..9])
    }
}

/// Deterministic `<prefix>-<salt>-<n>` identifiers.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    salt: String,
    counter: u64,
}

impl SequentialIdGenerator {
    /// Create a generator whose ids carry `salt`.
    #[must_use]
    pub fn new(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            counter: 0,
        }
    }

    /// Number of ids issued so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.counter
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{}-{}", self.salt, self.counter)
    }
}

/// A reusable slide layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The slide copied on instantiation.
    pub slide: Slide,
}

impl Template {
    /// Create a template from a prototype slide.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, slide: Slide) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slide,
        }
    }

    /// Produce a new slide with fresh slide and element identifiers.
    #[must_use]
    pub fn instantiate(&self, ids: &mut dyn IdGenerator) -> Slide {
        let elements: Vec<Element> = self
            .slide
            .elements
            .iter()
            .map(|element| Element {
                id: ids.next_element_id(),
                ..element.clone()
            })
            .collect();
        let slide = Slide {
            id: ids.next_id("slide"),
            elements,
            ..self.slide.clone()
        };
        tracing::debug!(
            "Instantiated template {} as slide {} ({} elements)",
            self.id,
            slide.id,
            slide.element_count()
        );
        slide
    }
}

fn heading(text: &str, font_size: f64) -> ElementKind {
    ElementKind::Text(TextProps {
        text: text.to_string(),
        bold: true,
        font_size,
        align: TextAlign::Center,
        ..TextProps::default()
    })
}

fn body(text: &str) -> ElementKind {
    ElementKind::Text(TextProps {
        text: text.to_string(),
        font_size: 20.0,
        ..TextProps::default()
    })
}

/// The built-in template library.
#[must_use]
pub fn builtin_templates() -> Vec<Template> {
    let title = Slide::new("title", "Title")
        .with_element(
            Element::new("title-heading", heading("Presentation Title", 48.0))
                .at(130.0, 180.0)
                .sized(700.0, 90.0),
        )
        .with_element(
            Element::new(
                "title-subtitle",
                ElementKind::Text(TextProps {
                    text: "Subtitle".to_string(),
                    font_size: 28.0,
                    color: "#4b5563".to_string(),
                    align: TextAlign::Center,
                    ..TextProps::default()
                }),
            )
            .at(230.0, 290.0)
            .sized(500.0, 60.0),
        );

    let title_and_content = Slide::new("title-and-content", "Title and Content")
        .with_element(
            Element::new("tc-heading", heading("Slide Title", 36.0))
                .at(60.0, 40.0)
                .sized(840.0, 70.0),
        )
        .with_element(
            Element::new("tc-body", body("Add your content here"))
                .at(60.0, 140.0)
                .sized(840.0, 340.0)
                .with_z_index(2),
        );

    let chart = Slide::new("chart", "Chart")
        .with_element(
            Element::new("chart-heading", heading("Results", 36.0))
                .at(60.0, 30.0)
                .sized(840.0, 70.0),
        )
        .with_element(
            Element::new(
                "chart-body",
                ElementKind::Chart(ChartProps {
                    chart_type: ChartType::Bar,
                    ..ChartProps::default()
                }),
            )
            .at(180.0, 120.0)
            .sized(600.0, 380.0)
            .with_z_index(2),
        );

    let two_column = Slide::new("two-column", "Two Columns")
        .with_element(
            Element::new("two-heading", heading("Comparison", 36.0))
                .at(60.0, 30.0)
                .sized(840.0, 70.0),
        )
        .with_element(
            Element::new("two-left", body("Left column"))
                .at(60.0, 130.0)
                .sized(400.0, 360.0),
        )
        .with_element(
            Element::new("two-right", body("Right column"))
                .at(500.0, 130.0)
                .sized(400.0, 360.0),
        )
        .with_element(
            Element::new(
                "two-divider",
                ElementKind::Shape(ShapeProps {
                    fill: "#e5e7eb".to_string(),
                    stroke: "#e5e7eb".to_string(),
                    stroke_width: 0.0,
                    ..ShapeProps::default()
                }),
            )
            .at(455.0, 130.0)
            .sized(50.0, 360.0)
            .with_z_index(0),
        );

    vec![
        Template::new("blank", "Blank", Slide::new("blank", "")),
        Template::new("title", "Title", title),
        Template::new("title-and-content", "Title and Content", title_and_content),
        Template::new("chart", "Chart", chart),
        Template::new("two-column", "Two Columns", two_column),
    ]
}

/// Look up a built-in template by id.
///
/// # Errors
///
/// Returns [`SlideError::UnknownTemplate`] if no built-in template has that id.
pub fn find_template(id: &str) -> SlideResult<Template> {
    builtin_templates()
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| SlideError::UnknownTemplate(id.to_string()))
}
