//! The presentation-state collaborator the canvas talks to.
//!
//! Selection, the editing flag and element locks are owned by the host
//! application. The canvas reads and writes them through [`PresentationHost`]
//! and reports committed changes back through its two commit callbacks.

use std::collections::HashSet;

use crate::{Element, ElementId, Slide};

/// Host-side presentation state and commit sink.
pub trait PresentationHost {
    /// Currently selected element.
    fn selected_element_id(&self) -> Option<ElementId>;

    /// Change the selection.
    fn set_selected_element_id(&mut self, id: Option<ElementId>);

    /// Whether an element is being edited.
    fn is_editing(&self) -> bool;

    /// Set the editing flag.
    fn set_editing(&mut self, editing: bool);

    /// Whether an element is locked against gesture mutation.
    fn is_element_locked(&self, id: &ElementId) -> bool;

    /// A single element's properties or geometry changed.
    fn on_element_update(&mut self, element: &Element);

    /// The element list changed after a drag or resize.
    fn on_elements_commit(&mut self, slide: &Slide);
}

/// In-memory host that records every callback.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    selected: Option<ElementId>,
    editing: bool,
    locked: HashSet<ElementId>,
    updates: Vec<Element>,
    commits: Vec<Slide>,
}

impl SessionState {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock an element.
    pub fn lock(&mut self, id: impl Into<ElementId>) {
        self.locked.insert(id.into());
    }

    /// Unlock an element.
    pub fn unlock(&mut self, id: &ElementId) {
        self.locked.remove(id);
    }

    /// Elements reported through `on_element_update`, oldest first.
    #[must_use]
    pub fn updates(&self) -> &[Element] {
        &self.updates
    }

    /// Slides reported through `on_elements_commit`, oldest first.
    #[must_use]
    pub fn commits(&self) -> &[Slide] {
        &self.commits
    }

    /// The most recently committed slide.
    #[must_use]
    pub fn last_commit(&self) -> Option<&Slide> {
        self.commits.last()
    }
}

impl PresentationHost for SessionState {
    fn selected_element_id(&self) -> Option<ElementId> {
        self.selected.clone()
    }

    fn set_selected_element_id(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    fn is_element_locked(&self, id: &ElementId) -> bool {
        self.locked.contains(id)
    }

    fn on_element_update(&mut self, element: &Element) {
        self.updates.push(element.clone());
    }

    fn on_elements_commit(&mut self, slide: &Slide) {
        self.commits.push(slide.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_and_unlock() {
        let mut host = SessionState::new();
        let id = ElementId::from("a");
        host.lock("a");
        assert!(host.is_element_locked(&id));
        host.unlock(&id);
        assert!(!host.is_element_locked(&id));
    }

    #[test]
    fn test_callbacks_are_recorded() {
        let mut host = SessionState::new();
        let slide = Slide::new("s", "");
        host.on_elements_commit(&slide);
        assert_eq!(host.commits().len(), 1);
        assert_eq!(host.last_commit().map(|s| s.id.as_str()), Some("s"));
        assert!(host.updates().is_empty());
    }
}
