//! A slide: background plus an ordered collection of elements.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::Point;
use crate::{Element, ElementId, SlideError, SlideResult};

/// Default slide background colour.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// A slide owned by the host application.
///
/// The element vector order is only a render tie-break; `z_index` decides
/// stacking. The canvas mutates a slide only through explicit commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide identifier.
    pub id: String,
    /// Slide title.
    #[serde(default)]
    pub title: String,
    /// Background colour.
    #[serde(default = "default_background")]
    pub background: String,
    /// Elements in insertion order.
    #[serde(default, deserialize_with = "deserialize_elements")]
    pub elements: Vec<Element>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

/// Keep every element that parses; skip the rest with a warning.
fn deserialize_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Element>(value) {
            Ok(element) => Some(element),
            Err(e) => {
                tracing::warn!("Skipping element {index}: {e}");
                None
            }
        })
        .collect())
}

impl Slide {
    /// Create an empty slide.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            background: default_background(),
            elements: Vec::new(),
        }
    }

    /// Set the background colour.
    #[must_use]
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Append an element.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Append an element, returning its id.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id.clone();
        self.elements.push(element);
        id
    }

    /// Remove an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove_element(&mut self, id: &ElementId) -> SlideResult<Element> {
        let index = self
            .elements
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| SlideError::ElementNotFound(id.to_string()))?;
        Ok(self.elements.remove(index))
    }

    /// Get an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Get a mutable reference to an element by id.
    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// Check whether an element exists.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Replace the element with the same id, keeping its place in the order.
    ///
    /// # Errors
    ///
    /// Returns an error if no element has that id.
    pub fn replace_element(&mut self, element: Element) -> SlideResult<()> {
        let slot = self
            .element_mut(&element.id)
            .ok_or_else(|| SlideError::ElementNotFound(element.id.to_string()))?;
        *slot = element;
        Ok(())
    }

    /// Elements in render order: ascending z-index, insertion order breaking ties.
    #[must_use]
    pub fn render_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    /// The top-most element containing a logical point.
    #[must_use]
    pub fn element_at(&self, p: Point) -> Option<&Element> {
        self.render_order()
            .into_iter()
            .rev()
            .find(|e| e.contains_point(p))
    }

    /// Number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the slide is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the slide to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SlideResult<String> {
        serde_json::to_string(self).map_err(SlideError::Serialization)
    }

    /// Deserialize a slide from JSON. Malformed elements are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the slide itself is malformed.
    pub fn from_json(json: &str) -> SlideResult<Self> {
        serde_json::from_str(json).map_err(SlideError::Serialization)
    }
}
