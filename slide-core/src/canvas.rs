//! The slide canvas: composition root for one editable slide.
//!
//! [`SlideCanvas`] owns the committed slide, the active gesture, the display
//! scale and the toolbar anchor. Hosts feed it [`CanvasEvent`]s (or call the
//! per-element entry points directly); the canvas hit-tests, converts to
//! logical units, runs the gesture transition and applies the resulting
//! effects to the slide and the [`PresentationHost`].

use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::event::{CanvasEvent, TouchEvent, TouchPhase};
use crate::geometry::{Point, SlideScale};
use crate::gesture::{
    transition, Effect, GestureContext, GestureInput, GestureState, ResizeHandle, Transition,
};
use crate::host::PresentationHost;
use crate::toolbar::{anchor_for, ToolbarAnchor};
use crate::{Element, ElementId, Slide};

/// What the canvas is being used for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasMode {
    /// Interactive editing.
    #[default]
    Edit,
    /// Presentation playback; read-only.
    Presentation,
    /// Thumbnail rendering; read-only.
    Thumbnail,
}

impl CanvasMode {
    /// Whether gestures may start in this mode.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::Edit)
    }
}

/// An editable slide bound to a presentation host.
pub struct SlideCanvas<H: PresentationHost> {
    slide: Slide,
    host: H,
    config: CanvasConfig,
    mode: CanvasMode,
    scale: SlideScale,
    gesture: GestureState,
    now_ms: u64,
    pending_tick: Option<u64>,
    toolbar: Option<ToolbarAnchor>,
}

impl<H: PresentationHost> SlideCanvas<H> {
    /// Create a canvas in edit mode at scale 1.
    #[must_use]
    pub fn new(slide: Slide, host: H, config: CanvasConfig) -> Self {
        let scale = SlideScale::default().resolve(config.scale, None);
        let mut canvas = Self {
            slide,
            host,
            config,
            mode: CanvasMode::Edit,
            scale,
            gesture: GestureState::Idle,
            now_ms: 0,
            pending_tick: None,
            toolbar: None,
        };
        canvas.sync_toolbar();
        canvas
    }

    /// The committed slide.
    #[must_use]
    pub const fn slide(&self) -> &Slide {
        &self.slide
    }

    /// The presentation host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host. Call [`Self::refresh_guards`] after
    /// changing locks or selection behind the canvas's back.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the canvas, returning the slide and host.
    #[must_use]
    pub fn into_parts(self) -> (Slide, H) {
        (self.slide, self.host)
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> CanvasMode {
        self.mode
    }

    /// Current display scale.
    #[must_use]
    pub const fn scale(&self) -> SlideScale {
        self.scale
    }

    /// The active gesture.
    #[must_use]
    pub const fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Deadline at which the host should deliver a [`CanvasEvent::Tick`].
    #[must_use]
    pub const fn pending_tick(&self) -> Option<u64> {
        self.pending_tick
    }

    /// Where the floating toolbar should be drawn, if at all.
    #[must_use]
    pub const fn toolbar_anchor(&self) -> Option<ToolbarAnchor> {
        self.toolbar
    }

    /// Whether an element is the current selection.
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.host.selected_element_id().as_ref() == Some(id)
    }

    /// Whether an element is being edited.
    #[must_use]
    pub fn is_editing(&self, id: &ElementId) -> bool {
        matches!(&self.gesture, GestureState::Editing { element, .. } if element == id)
    }

    /// Elements in render order, with the live draft in place of its
    /// committed element while a drag or resize is in flight.
    #[must_use]
    pub fn visible_elements(&self) -> Vec<&Element> {
        let draft = self.gesture.draft();
        self.slide
            .render_order()
            .into_iter()
            .map(|element| match draft {
                Some(d) if d.id == element.id => d,
                _ => element,
            })
            .collect()
    }

    /// A copy of the slide as currently displayed (draft applied).
    #[must_use]
    pub fn visible_slide(&self) -> Slide {
        let mut slide = self.slide.clone();
        if let Some(draft) = self.gesture.draft() {
            if let Some(slot) = slide.element_mut(&draft.id) {
                slot.set_rect(draft.rect());
            }
        }
        slide
    }

    /// Process an input event.
    pub fn dispatch(&mut self, event: CanvasEvent) {
        if let Some(ts) = event.timestamp_ms() {
            self.now_ms = self.now_ms.max(ts);
        }
        match event {
            CanvasEvent::PointerDown {
                position,
                modifiers,
                ..
            } => {
                let input = self.resolve_press(self.scale.to_logical(position), modifiers.shift);
                self.apply(input);
            }
            CanvasEvent::PointerMove { position, .. } => {
                let pointer = self.scale.to_logical(position);
                self.apply(GestureInput::Move { pointer });
            }
            CanvasEvent::PointerUp { .. } | CanvasEvent::PointerLeave { .. } => {
                self.apply(GestureInput::Release);
            }
            CanvasEvent::Touch(touch) => self.dispatch_touch(&touch),
            CanvasEvent::Tick { .. } => self.apply(GestureInput::Tick),
            CanvasEvent::ViewportResized { width, origin } => self.resize_viewport(width, origin),
        }
    }

    fn dispatch_touch(&mut self, touch: &TouchEvent) {
        let pointer = touch
            .primary_touch()
            .map(|t| self.scale.to_logical(t.position()));
        match (touch.phase, pointer) {
            (TouchPhase::Start, Some(pointer)) => {
                let target = self.slide.element_at(pointer).map(|e| e.id.clone());
                self.apply(GestureInput::TouchStart { target, pointer });
            }
            (TouchPhase::Move, Some(pointer)) => self.apply(GestureInput::TouchMove { pointer }),
            // A platform cancel releases like a lifted finger so no gesture sticks.
            (TouchPhase::End | TouchPhase::Cancel, _) => self.apply(GestureInput::TouchEnd),
            (TouchPhase::Start | TouchPhase::Move, None) => {}
        }
    }

    /// Handles of the selected element first, then the top-most element.
    fn resolve_press(&self, pointer: Point, shift: bool) -> GestureInput {
        if let Some((id, handle)) = self.handle_at(pointer) {
            return GestureInput::PressHandle {
                id,
                handle,
                pointer,
                shift,
            };
        }
        match self.slide.element_at(pointer) {
            Some(element) => GestureInput::PressElement {
                id: element.id.clone(),
                pointer,
            },
            None => GestureInput::PressBackground,
        }
    }

    /// The resize handle of the selected element under a logical point.
    fn handle_at(&self, pointer: Point) -> Option<(ElementId, ResizeHandle)> {
        if !self.mode.is_interactive() || self.gesture.is_editing() {
            return None;
        }
        let id = self.host.selected_element_id()?;
        if self.host.is_element_locked(&id) {
            return None;
        }
        let rect = self.slide.element(&id)?.rect();
        let radius = self.scale.distance_to_logical(self.config.handle_radius_px);
        ResizeHandle::ALL
            .into_iter()
            .find(|handle| {
                let anchor = handle.anchor(rect);
                (pointer.x - anchor.x).hypot(pointer.y - anchor.y) <= radius
            })
            .map(|handle| (id, handle))
    }

    /// Select an element without arming a drag.
    pub fn select(&mut self, id: &ElementId) {
        if !self.mode.is_interactive() || !self.slide.contains(id) {
            return;
        }
        if self.gesture.is_editing() && !self.is_editing(id) {
            self.apply(GestureInput::EndEdit);
        }
        self.host.set_selected_element_id(Some(id.clone()));
        self.sync_toolbar();
    }

    /// Pointer-down on an element body at a screen position.
    ///
    /// The first call selects and arms; a second call on the same element
    /// inside the arm window starts dragging.
    pub fn begin_drag(&mut self, id: &ElementId, screen: Point, timestamp_ms: u64) {
        self.now_ms = self.now_ms.max(timestamp_ms);
        let pointer = self.scale.to_logical(screen);
        self.apply(GestureInput::PressElement {
            id: id.clone(),
            pointer,
        });
    }

    /// Pointer-down on a corner handle at a screen position.
    pub fn begin_resize(
        &mut self,
        id: &ElementId,
        handle: ResizeHandle,
        screen: Point,
        shift: bool,
        timestamp_ms: u64,
    ) {
        self.now_ms = self.now_ms.max(timestamp_ms);
        let pointer = self.scale.to_logical(screen);
        self.apply(GestureInput::PressHandle {
            id: id.clone(),
            handle,
            pointer,
            shift,
        });
    }

    /// Start editing the selected element. Ignored for any other element.
    pub fn begin_edit(&mut self, id: &ElementId) {
        if !self.is_selected(id) {
            tracing::debug!("Ignoring edit request for unselected element {id}");
            return;
        }
        self.apply(GestureInput::BeginEdit { id: id.clone() });
    }

    /// Replace the buffered text of the element being edited.
    pub fn edit_text(&mut self, text: impl Into<String>) {
        self.apply(GestureInput::EditInput { text: text.into() });
    }

    /// Finish editing (blur).
    pub fn end_edit(&mut self) {
        self.apply(GestureInput::EndEdit);
    }

    /// Drop the active gesture without committing.
    pub fn cancel(&mut self) {
        self.apply(GestureInput::Cancel);
    }

    /// Switch mode. Read-only modes cancel any gesture.
    pub fn set_mode(&mut self, mode: CanvasMode) {
        if mode == self.mode {
            return;
        }
        tracing::debug!("Canvas mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.refresh_guards();
    }

    /// Replace the slide (external edit or navigation).
    pub fn set_slide(&mut self, slide: Slide) {
        self.slide = slide;
        if let Some(selected) = self.host.selected_element_id() {
            if !self.slide.contains(&selected) {
                self.host.set_selected_element_id(None);
            }
        }
        self.refresh_guards();
    }

    /// Cancel the active gesture if its target was locked, deleted, or the
    /// canvas left edit mode.
    pub fn refresh_guards(&mut self) {
        let violated = self.gesture.target().is_some_and(|target| {
            !self.mode.is_interactive()
                || !self.slide.contains(target)
                || self.host.is_element_locked(target)
        });
        if violated {
            tracing::debug!("Guard violated during {}, cancelling", self.gesture.name());
            self.apply(GestureInput::Cancel);
        } else {
            self.sync_toolbar();
        }
    }

    fn resize_viewport(&mut self, width: Option<f64>, origin: Point) {
        let resolved = self.scale.resolve(self.config.scale, width);
        self.scale = SlideScale::new(resolved.factor, origin);
        tracing::trace!("Scale now {:.3} at {:?}", self.scale.factor, origin);
        self.sync_toolbar();
    }

    fn apply(&mut self, input: GestureInput) {
        let state = std::mem::take(&mut self.gesture);
        let from = state.name();
        let host = &self.host;
        let is_locked = |id: &ElementId| host.is_element_locked(id);
        let ctx = GestureContext {
            slide: &self.slide,
            now_ms: self.now_ms,
            config: self.config.gesture,
            interactive: self.mode.is_interactive(),
            is_locked: &is_locked,
        };
        let Transition { state, effects } = transition(state, input, &ctx);
        if state.name() != from {
            tracing::debug!("Gesture {from} -> {}", state.name());
        }
        self.gesture = state;
        for effect in effects {
            self.apply_effect(effect);
        }
        if !matches!(self.gesture, GestureState::ArmedSingleClick { .. }) {
            self.pending_tick = None;
        }
        self.sync_toolbar();
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Select(id) => {
                if !self.is_selected(&id) {
                    tracing::debug!("Selected {id}");
                }
                self.host.set_selected_element_id(Some(id));
            }
            Effect::Deselect => {
                self.host.set_selected_element_id(None);
                self.host.set_editing(false);
            }
            Effect::SetEditing(editing) => self.host.set_editing(editing),
            Effect::ScheduleTick { at_ms } => self.pending_tick = Some(at_ms),
            Effect::DraftUpdated(draft) => {
                tracing::trace!("Draft {} at {:?} {:?}", draft.id, draft.position, draft.size);
            }
            Effect::CommitGeometry(draft) => {
                let Some(slot) = self.slide.element_mut(&draft.id) else {
                    tracing::warn!("Dropping commit for missing element {}", draft.id);
                    return;
                };
                slot.set_rect(draft.rect());
                tracing::debug!("Committed {} at {:?} {:?}", draft.id, draft.position, draft.size);
                self.host.on_elements_commit(&self.slide);
            }
            Effect::CommitText { id, text } => {
                let Some(element) = self.slide.element_mut(&id) else {
                    tracing::warn!("Dropping text commit for missing element {id}");
                    return;
                };
                if element.set_text(text) {
                    tracing::debug!("Committed text for {id}");
                    self.host.on_element_update(element);
                }
            }
        }
    }

    fn sync_toolbar(&mut self) {
        self.toolbar = self.compute_toolbar();
    }

    fn compute_toolbar(&self) -> Option<ToolbarAnchor> {
        if !self.mode.is_interactive() || self.gesture.is_editing() || self.host.is_editing() {
            return None;
        }
        let id = self.host.selected_element_id()?;
        let rect = match self.gesture.draft() {
            Some(draft) if draft.id == id => draft.rect(),
            _ => self.slide.element(&id)?.rect(),
        };
        Some(anchor_for(rect, &self.scale, &self.config.toolbar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ShapeProps, ShapeType, TextProps};
    use crate::event::Modifiers;
    use crate::host::SessionState;

    fn canvas() -> SlideCanvas<SessionState> {
        let slide = Slide::new("s", "")
            .with_element(
                Element::new("box", ElementKind::Shape(ShapeProps::default()))
                    .at(100.0, 100.0)
                    .sized(200.0, 100.0),
            )
            .with_element(
                Element::new("label", ElementKind::Text(TextProps::default()))
                    .at(500.0, 300.0)
                    .sized(300.0, 60.0),
            );
        SlideCanvas::new(slide, SessionState::new(), CanvasConfig::default())
    }

    fn id(s: &str) -> ElementId {
        ElementId::from(s)
    }

    #[test]
    fn test_click_selects_and_anchors_toolbar() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 0));
        assert!(canvas.is_selected(&id("box")));
        assert_eq!(canvas.pending_tick(), Some(300));
        let anchor = canvas.toolbar_anchor().expect("toolbar shown");
        assert_eq!(anchor.position, Point::new(200.0, 40.0));
    }

    #[test]
    fn test_double_click_drag_updates_draft_then_commits() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 0));
        canvas.dispatch(CanvasEvent::pointer_up(150.0, 150.0, 50));
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 120));
        canvas.dispatch(CanvasEvent::pointer_move(250.0, 200.0, 140));

        // Draft is visible but not committed.
        let visible = canvas.visible_elements();
        let dragged = visible.iter().find(|e| e.id == id("box")).expect("box");
        assert_eq!(dragged.position, Point::new(200.0, 150.0));
        assert_eq!(
            canvas.slide().element(&id("box")).map(|e| e.position),
            Some(Point::new(100.0, 100.0))
        );
        assert_eq!(
            canvas.toolbar_anchor().map(|a| a.position),
            Some(Point::new(300.0, 90.0))
        );

        canvas.dispatch(CanvasEvent::PointerLeave { timestamp_ms: 160 });
        assert!(canvas.gesture().is_idle());
        assert_eq!(
            canvas.slide().element(&id("box")).map(|e| e.position),
            Some(Point::new(200.0, 150.0))
        );
        assert_eq!(canvas.host().commits().len(), 1);
    }

    #[test]
    fn test_shift_on_handle_drags_from_corner() {
        let mut canvas = canvas();
        canvas.select(&id("box"));
        canvas.dispatch(CanvasEvent::PointerDown {
            position: Point::new(302.0, 199.0),
            modifiers: Modifiers::shift(),
            timestamp_ms: 0,
        });
        assert!(matches!(canvas.gesture(), GestureState::Dragging { .. }));
        canvas.dispatch(CanvasEvent::pointer_move(400.0, 300.0, 10));
        canvas.dispatch(CanvasEvent::pointer_up(400.0, 300.0, 20));
        assert_eq!(
            canvas.slide().element(&id("box")).map(|e| e.position),
            Some(Point::new(200.0, 200.0))
        );
    }

    #[test]
    fn test_handle_resize_respects_scale() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::ViewportResized {
            width: None,
            origin: Point::new(10.0, 10.0),
        });
        canvas.select(&id("box"));
        // Bottom-right corner on screen: (310, 210).
        canvas.dispatch(CanvasEvent::pointer_down(310.0, 210.0, 0));
        assert!(matches!(
            canvas.gesture(),
            GestureState::Resizing {
                handle: ResizeHandle::BottomRight,
                ..
            }
        ));
        canvas.dispatch(CanvasEvent::pointer_move(360.0, 230.0, 10));
        canvas.dispatch(CanvasEvent::pointer_up(360.0, 230.0, 20));
        assert_eq!(
            canvas.slide().element(&id("box")).map(|e| (e.size.width, e.size.height)),
            Some((250.0, 120.0))
        );
    }

    #[test]
    fn test_background_click_clears_selection_and_editing() {
        let mut canvas = canvas();
        canvas.select(&id("label"));
        canvas.begin_edit(&id("label"));
        assert!(canvas.host().is_editing());
        assert!(canvas.toolbar_anchor().is_none());

        canvas.dispatch(CanvasEvent::pointer_down(20.0, 20.0, 0));
        assert!(!canvas.host().is_editing());
        assert!(canvas.host().selected_element_id().is_none());
        assert!(canvas.toolbar_anchor().is_none());
    }

    #[test]
    fn test_edit_commits_on_blur_through_host() {
        let mut canvas = canvas();
        canvas.select(&id("label"));
        canvas.begin_edit(&id("label"));
        assert!(canvas.is_editing(&id("label")));
        canvas.edit_text("Hello");
        canvas.end_edit();
        assert_eq!(
            canvas.slide().element(&id("label")).and_then(Element::text),
            Some("Hello")
        );
        assert_eq!(canvas.host().updates().len(), 1);
        assert!(canvas.toolbar_anchor().is_some());
    }

    #[test]
    fn test_begin_edit_requires_selection() {
        let mut canvas = canvas();
        canvas.begin_edit(&id("label"));
        assert!(canvas.gesture().is_idle());
    }

    #[test]
    fn test_locking_mid_drag_cancels_without_commit() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 0));
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 100));
        canvas.dispatch(CanvasEvent::pointer_move(300.0, 300.0, 110));
        canvas.host_mut().lock("box");
        canvas.refresh_guards();
        assert!(canvas.gesture().is_idle());
        canvas.dispatch(CanvasEvent::pointer_up(300.0, 300.0, 120));
        assert_eq!(
            canvas.slide().element(&id("box")).map(|e| e.position),
            Some(Point::new(100.0, 100.0))
        );
        assert!(canvas.host().commits().is_empty());
    }

    #[test]
    fn test_presentation_mode_is_read_only() {
        let mut canvas = canvas();
        canvas.select(&id("box"));
        canvas.set_mode(CanvasMode::Presentation);
        assert!(canvas.toolbar_anchor().is_none());
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 0));
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 50));
        assert!(canvas.gesture().is_idle());
    }

    #[test]
    fn test_deleting_target_cancels_gesture() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 0));
        canvas.dispatch(CanvasEvent::pointer_down(150.0, 150.0, 100));
        let mut slide = canvas.slide().clone();
        slide.remove_element(&id("box")).expect("remove");
        canvas.set_slide(slide);
        assert!(canvas.gesture().is_idle());
        assert!(canvas.host().selected_element_id().is_none());
    }

    #[test]
    fn test_press_outside_circle_outline_falls_through() {
        let circle = ShapeProps {
            shape_type: ShapeType::Circle,
            ..ShapeProps::default()
        };
        let slide = Slide::new("s", "")
            .with_element(
                Element::new("under", ElementKind::Shape(ShapeProps::default()))
                    .at(50.0, 50.0)
                    .sized(100.0, 100.0),
            )
            .with_element(
                Element::new("ring", ElementKind::Shape(circle))
                    .at(100.0, 100.0)
                    .sized(200.0, 200.0),
            );
        let mut canvas = SlideCanvas::new(slide, SessionState::new(), CanvasConfig::default());

        // Bounding-box corner of the circle, over the rectangle beneath it.
        canvas.dispatch(CanvasEvent::pointer_down(110.0, 110.0, 0));
        assert!(canvas.is_selected(&id("under")));

        // Corner with nothing beneath is background.
        canvas.dispatch(CanvasEvent::pointer_down(290.0, 290.0, 1_000));
        assert!(canvas.host().selected_element_id().is_none());

        canvas.dispatch(CanvasEvent::pointer_down(200.0, 200.0, 2_000));
        assert!(canvas.is_selected(&id("ring")));
    }

    #[test]
    fn test_fit_width_viewport_keeps_last_scale_when_unmeasured() {
        let slide = Slide::new("s", "");
        let mut canvas = SlideCanvas::new(slide, SessionState::new(), CanvasConfig::compact(0.0));
        canvas.dispatch(CanvasEvent::ViewportResized {
            width: Some(480.0),
            origin: Point::default(),
        });
        assert!((canvas.scale().factor - 0.5).abs() < f64::EPSILON);
        canvas.dispatch(CanvasEvent::ViewportResized {
            width: None,
            origin: Point::default(),
        });
        assert!((canvas.scale().factor - 0.5).abs() < f64::EPSILON);
    }
}
