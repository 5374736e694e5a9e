//! Gesture state machine.
//!
//! Disambiguates click-to-select, double-click or shift-handle drag, corner
//! resize, text editing, and touch long-press drag. The machine is a pure
//! function [`transition`] of `(state, input, context)` returning the next
//! state and a list of [`Effect`]s; it never touches the slide itself. Time is
//! injected through [`GestureContext::now_ms`], so the click-arm and long-press
//! windows are testable without real timers.
//!
//! ```text
//!              press(el)                 press(same el) < window
//!   Idle ──────────────────▶ Armed ─────────────────────────────▶ Dragging
//!    ▲  ▲                      │ tick ≥ window                       │
//!    │  └──────────────────────┘                                     │ release/leave
//!    │                                                               ▼
//!    ├──── press(handle) ────▶ Resizing ──── release ────────────▶ commit
//!    ├──── touch(el) ────────▶ TouchPressed ── move ≥ long press ──▶ Dragging
//!    └──── begin edit ───────▶ Editing ───── blur ───────────────▶ commit text
//! ```

use crate::config::GestureConfig;
use crate::geometry::{
    clamp_position, clamp_rect, Point, Rect, MIN_ELEMENT_SIZE, SLIDE_HEIGHT, SLIDE_WIDTH,
};
use crate::{Element, ElementId, Slide};

/// Corner resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl ResizeHandle {
    /// All four handles.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub const fn moves_left_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub const fn moves_top_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    /// Centre of the handle: the corner of `rect` it sits on.
    #[must_use]
    pub fn anchor(self, rect: Rect) -> Point {
        let x = if self.moves_left_edge() {
            rect.x
        } else {
            rect.right()
        };
        let y = if self.moves_top_edge() {
            rect.y
        } else {
            rect.bottom()
        };
        Point::new(x, y)
    }
}

/// Resize `initial` by a pointer delta applied to `handle`.
///
/// The edge opposite the handle stays pinned. Each moving edge stops at the
/// minimum size and at the slide boundary it travels towards.
#[must_use]
pub fn resize_rect(initial: Rect, handle: ResizeHandle, delta: Point) -> Rect {
    let (x, width) = if handle.moves_left_edge() {
        let width = (initial.width - delta.x)
            .max(MIN_ELEMENT_SIZE)
            .min(initial.right().max(MIN_ELEMENT_SIZE));
        (initial.x + (initial.width - width), width)
    } else {
        let width = (initial.width + delta.x)
            .max(MIN_ELEMENT_SIZE)
            .min((SLIDE_WIDTH - initial.x).max(MIN_ELEMENT_SIZE));
        (initial.x, width)
    };
    let (y, height) = if handle.moves_top_edge() {
        let height = (initial.height - delta.y)
            .max(MIN_ELEMENT_SIZE)
            .min(initial.bottom().max(MIN_ELEMENT_SIZE));
        (initial.y + (initial.height - height), height)
    } else {
        let height = (initial.height + delta.y)
            .max(MIN_ELEMENT_SIZE)
            .min((SLIDE_HEIGHT - initial.y).max(MIN_ELEMENT_SIZE));
        (initial.y, height)
    };
    clamp_rect(Rect::new(x, y, width, height))
}

/// Text being edited, buffered until blur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    /// Text committed on the element when editing began.
    pub original: String,
    /// Current buffered text.
    pub current: String,
}

impl EditBuffer {
    /// Start buffering from the committed text.
    #[must_use]
    pub fn new(original: &str) -> Self {
        Self {
            original: original.to_string(),
            current: original.to_string(),
        }
    }

    /// Whether the buffer differs from the committed text.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.original != self.current
    }
}

/// The active gesture. Exactly one at a time; never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// One click registered; a second click on the same element within the
    /// arm window starts a drag.
    ArmedSingleClick {
        /// Element that was clicked.
        element: ElementId,
        /// When the first click happened.
        armed_at_ms: u64,
    },
    /// Moving an element.
    Dragging {
        /// Uncommitted copy of the element with its live position.
        draft: Element,
        /// Pointer position relative to the element's top-left corner.
        pointer_offset: Point,
    },
    /// Resizing an element from a corner handle.
    Resizing {
        /// Uncommitted copy of the element with its live geometry.
        draft: Element,
        /// Which corner is being dragged.
        handle: ResizeHandle,
        /// Geometry when the resize started.
        initial: Rect,
        /// Logical pointer position when the resize started.
        initial_pointer: Point,
    },
    /// Editing an element's content.
    Editing {
        /// Element being edited.
        element: ElementId,
        /// Buffered text for text elements.
        buffer: Option<EditBuffer>,
    },
    /// Finger down on an element, waiting for the long-press window.
    TouchPressed {
        /// Element under the finger.
        element: ElementId,
        /// When the touch started.
        started_at_ms: u64,
        /// Touch position relative to the element's top-left corner.
        pointer_offset: Point,
    },
}

impl GestureState {
    /// Short state name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ArmedSingleClick { .. } => "armed",
            Self::Dragging { .. } => "dragging",
            Self::Resizing { .. } => "resizing",
            Self::Editing { .. } => "editing",
            Self::TouchPressed { .. } => "touch_pressed",
        }
    }

    /// Check if no gesture is active.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if an element is being edited.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// The live draft during a drag or resize.
    #[must_use]
    pub const fn draft(&self) -> Option<&Element> {
        match self {
            Self::Dragging { draft, .. } | Self::Resizing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// The element this gesture targets, if any.
    #[must_use]
    pub fn target(&self) -> Option<&ElementId> {
        match self {
            Self::Idle => None,
            Self::ArmedSingleClick { element, .. }
            | Self::Editing { element, .. }
            | Self::TouchPressed { element, .. } => Some(element),
            Self::Dragging { draft, .. } | Self::Resizing { draft, .. } => Some(&draft.id),
        }
    }
}

/// Resolved input to the state machine, in logical units.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureInput {
    /// Mouse press on the slide background.
    PressBackground,
    /// Mouse press on an element body.
    PressElement {
        /// Element pressed.
        id: ElementId,
        /// Logical pointer position.
        pointer: Point,
    },
    /// Mouse press on a corner resize handle.
    PressHandle {
        /// Element owning the handle.
        id: ElementId,
        /// Which handle.
        handle: ResizeHandle,
        /// Logical pointer position.
        pointer: Point,
        /// Shift held: drag instead of resize.
        shift: bool,
    },
    /// Pointer moved.
    Move {
        /// Logical pointer position.
        pointer: Point,
    },
    /// Pointer released or left the canvas.
    Release,
    /// Finger down.
    TouchStart {
        /// Element under the finger, `None` for background.
        target: Option<ElementId>,
        /// Logical touch position.
        pointer: Point,
    },
    /// Finger moved (first touch point).
    TouchMove {
        /// Logical touch position.
        pointer: Point,
    },
    /// Finger lifted or touch cancelled.
    TouchEnd,
    /// Clock advanced.
    Tick,
    /// External edit trigger for an element.
    BeginEdit {
        /// Element to edit.
        id: ElementId,
    },
    /// New buffered text while editing.
    EditInput {
        /// Full replacement text.
        text: String,
    },
    /// Editor lost focus.
    EndEdit,
    /// A guard was violated (lock, mode change, deletion); drop the gesture.
    Cancel,
}

/// Side effects requested by a transition. The canvas applies them in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Select an element.
    Select(ElementId),
    /// Clear the selection.
    Deselect,
    /// Set the host's editing flag.
    SetEditing(bool),
    /// Deliver a tick at or after this time to expire the arm window.
    ScheduleTick {
        /// Deadline in milliseconds.
        at_ms: u64,
    },
    /// The live draft changed.
    DraftUpdated(Element),
    /// Merge the draft's geometry into the slide.
    CommitGeometry(Element),
    /// Write edited text into the element's properties.
    CommitText {
        /// Edited element.
        id: ElementId,
        /// New text.
        text: String,
    },
}

/// Next state plus effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State after the input.
    pub state: GestureState,
    /// Effects to apply, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: GestureState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: GestureState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

/// Everything the transition function may read besides the state.
pub struct GestureContext<'a> {
    /// The committed slide.
    pub slide: &'a Slide,
    /// Current time in milliseconds.
    pub now_ms: u64,
    /// Timing windows.
    pub config: GestureConfig,
    /// False in presentation or thumbnail mode.
    pub interactive: bool,
    /// Lock query.
    pub is_locked: &'a dyn Fn(&ElementId) -> bool,
}

impl GestureContext<'_> {
    /// The element, if it exists and a gesture may start on it.
    fn startable(&self, id: &ElementId) -> Option<&Element> {
        if !self.interactive || (self.is_locked)(id) {
            return None;
        }
        self.slide.element(id)
    }

    /// Whether an in-flight gesture on `id` may continue.
    fn still_valid(&self, id: &ElementId) -> bool {
        self.startable(id).is_some()
    }
}

/// Advance the state machine by one input.
#[must_use]
pub fn transition(
    state: GestureState,
    input: GestureInput,
    ctx: &GestureContext<'_>,
) -> Transition {
    match state {
        GestureState::Editing { element, buffer } => editing(element, buffer, input, ctx),
        GestureState::Dragging {
            draft,
            pointer_offset,
        } => dragging(draft, pointer_offset, input, ctx),
        GestureState::Resizing {
            draft,
            handle,
            initial,
            initial_pointer,
        } => resizing(draft, handle, initial, initial_pointer, input, ctx),
        GestureState::TouchPressed {
            element,
            started_at_ms,
            pointer_offset,
        } => touch_pressed(element, started_at_ms, pointer_offset, input, ctx),
        idle_or_armed => resting(idle_or_armed, input, ctx),
    }
}

/// `Idle` and `ArmedSingleClick`: no element is moving yet.
fn resting(state: GestureState, input: GestureInput, ctx: &GestureContext<'_>) -> Transition {
    match input {
        GestureInput::PressBackground => {
            Transition::with(GestureState::Idle, vec![Effect::Deselect])
        }
        GestureInput::PressElement { id, pointer } => press_element(state, id, pointer, ctx),
        GestureInput::PressHandle {
            id,
            handle,
            pointer,
            shift,
        } => press_handle(state, id, handle, pointer, shift, ctx),
        GestureInput::TouchStart { target, pointer } => touch_start(state, target, pointer, ctx),
        GestureInput::Tick => match state {
            GestureState::ArmedSingleClick { armed_at_ms, .. }
                if arm_expired(armed_at_ms, ctx) =>
            {
                Transition::to(GestureState::Idle)
            }
            other => Transition::to(other),
        },
        GestureInput::BeginEdit { id } => begin_edit(state, id, ctx),
        GestureInput::Cancel => Transition::to(GestureState::Idle),
        GestureInput::Move { .. }
        | GestureInput::Release
        | GestureInput::TouchMove { .. }
        | GestureInput::TouchEnd
        | GestureInput::EditInput { .. }
        | GestureInput::EndEdit => Transition::to(state),
    }
}

fn arm_expired(armed_at_ms: u64, ctx: &GestureContext<'_>) -> bool {
    ctx.now_ms.saturating_sub(armed_at_ms) >= ctx.config.click_arm_window_ms
}

fn press_element(
    state: GestureState,
    id: ElementId,
    pointer: Point,
    ctx: &GestureContext<'_>,
) -> Transition {
    if !ctx.interactive || !ctx.slide.contains(&id) {
        return Transition::to(state);
    }
    if (ctx.is_locked)(&id) {
        return Transition::with(GestureState::Idle, vec![Effect::Select(id)]);
    }
    let Some(element) = ctx.slide.element(&id) else {
        return Transition::to(state);
    };

    if let GestureState::ArmedSingleClick {
        element: armed,
        armed_at_ms,
    } = &state
    {
        if *armed == id && !arm_expired(*armed_at_ms, ctx) {
            let draft = element.clone();
            return Transition::to(GestureState::Dragging {
                pointer_offset: pointer.offset_from(draft.position),
                draft,
            });
        }
    }

    Transition::with(
        GestureState::ArmedSingleClick {
            element: id.clone(),
            armed_at_ms: ctx.now_ms,
        },
        vec![
            Effect::Select(id),
            Effect::ScheduleTick {
                at_ms: ctx.now_ms + ctx.config.click_arm_window_ms,
            },
        ],
    )
}

fn press_handle(
    state: GestureState,
    id: ElementId,
    handle: ResizeHandle,
    pointer: Point,
    shift: bool,
    ctx: &GestureContext<'_>,
) -> Transition {
    let Some(element) = ctx.startable(&id) else {
        return Transition::to(state);
    };
    let draft = element.clone();
    let next = if shift {
        GestureState::Dragging {
            pointer_offset: handle.anchor(draft.rect()).offset_from(draft.position),
            draft,
        }
    } else {
        GestureState::Resizing {
            initial: draft.rect(),
            draft,
            handle,
            initial_pointer: pointer,
        }
    };
    Transition::with(next, vec![Effect::Select(id)])
}

fn touch_start(
    state: GestureState,
    target: Option<ElementId>,
    pointer: Point,
    ctx: &GestureContext<'_>,
) -> Transition {
    let Some(id) = target else {
        return Transition::with(GestureState::Idle, vec![Effect::Deselect]);
    };
    if !ctx.interactive || !ctx.slide.contains(&id) {
        return Transition::to(state);
    }
    match ctx.startable(&id) {
        Some(element) => Transition::with(
            GestureState::TouchPressed {
                element: id.clone(),
                started_at_ms: ctx.now_ms,
                pointer_offset: pointer.offset_from(element.position),
            },
            vec![Effect::Select(id)],
        ),
        None => Transition::with(GestureState::Idle, vec![Effect::Select(id)]),
    }
}

fn begin_edit(state: GestureState, id: ElementId, ctx: &GestureContext<'_>) -> Transition {
    let Some(element) = ctx.startable(&id) else {
        return Transition::to(state);
    };
    let buffer = element.text().map(EditBuffer::new);
    Transition::with(
        GestureState::Editing {
            element: id,
            buffer,
        },
        vec![Effect::SetEditing(true)],
    )
}

fn editing(
    element: ElementId,
    mut buffer: Option<EditBuffer>,
    input: GestureInput,
    ctx: &GestureContext<'_>,
) -> Transition {
    match input {
        GestureInput::EditInput { text } => {
            if let Some(buffer) = buffer.as_mut() {
                buffer.current = text;
            }
            Transition::to(GestureState::Editing { element, buffer })
        }
        GestureInput::EndEdit => {
            Transition::with(GestureState::Idle, finish_edit(element, buffer, ctx))
        }
        GestureInput::PressBackground
        | GestureInput::TouchStart { target: None, .. } => {
            let mut effects = finish_edit(element, buffer, ctx);
            effects.push(Effect::Deselect);
            Transition::with(GestureState::Idle, effects)
        }
        GestureInput::PressElement { id, .. }
        | GestureInput::TouchStart {
            target: Some(id), ..
        } if id != element && ctx.slide.contains(&id) => {
            let mut effects = finish_edit(element, buffer, ctx);
            effects.push(Effect::Select(id));
            Transition::with(GestureState::Idle, effects)
        }
        GestureInput::Cancel => {
            Transition::with(GestureState::Idle, vec![Effect::SetEditing(false)])
        }
        _ => Transition::to(GestureState::Editing { element, buffer }),
    }
}

/// Blur: commit the buffer only if it changed and the element is still editable.
fn finish_edit(
    element: ElementId,
    buffer: Option<EditBuffer>,
    ctx: &GestureContext<'_>,
) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(buffer) = buffer {
        if buffer.is_dirty() && ctx.still_valid(&element) {
            effects.push(Effect::CommitText {
                id: element,
                text: buffer.current,
            });
        }
    }
    effects.push(Effect::SetEditing(false));
    effects
}

fn dragging(
    mut draft: Element,
    pointer_offset: Point,
    input: GestureInput,
    ctx: &GestureContext<'_>,
) -> Transition {
    match input {
        GestureInput::Cancel => Transition::to(GestureState::Idle),
        GestureInput::Move { pointer } | GestureInput::TouchMove { pointer } => {
            if !ctx.still_valid(&draft.id) {
                return Transition::to(GestureState::Idle);
            }
            draft.position = clamp_position(pointer.offset_from(pointer_offset), draft.size);
            Transition::with(
                GestureState::Dragging {
                    draft: draft.clone(),
                    pointer_offset,
                },
                vec![Effect::DraftUpdated(draft)],
            )
        }
        GestureInput::Release | GestureInput::TouchEnd => commit(draft, ctx),
        _ => Transition::to(GestureState::Dragging {
            draft,
            pointer_offset,
        }),
    }
}

fn resizing(
    mut draft: Element,
    handle: ResizeHandle,
    initial: Rect,
    initial_pointer: Point,
    input: GestureInput,
    ctx: &GestureContext<'_>,
) -> Transition {
    match input {
        GestureInput::Cancel => Transition::to(GestureState::Idle),
        GestureInput::Move { pointer } | GestureInput::TouchMove { pointer } => {
            if !ctx.still_valid(&draft.id) {
                return Transition::to(GestureState::Idle);
            }
            draft.set_rect(resize_rect(initial, handle, pointer.offset_from(initial_pointer)));
            Transition::with(
                GestureState::Resizing {
                    draft: draft.clone(),
                    handle,
                    initial,
                    initial_pointer,
                },
                vec![Effect::DraftUpdated(draft)],
            )
        }
        GestureInput::Release | GestureInput::TouchEnd => commit(draft, ctx),
        _ => Transition::to(GestureState::Resizing {
            draft,
            handle,
            initial,
            initial_pointer,
        }),
    }
}

fn touch_pressed(
    element: ElementId,
    started_at_ms: u64,
    pointer_offset: Point,
    input: GestureInput,
    ctx: &GestureContext<'_>,
) -> Transition {
    let pressed = |element| GestureState::TouchPressed {
        element,
        started_at_ms,
        pointer_offset,
    };
    match input {
        GestureInput::TouchMove { pointer } => {
            let held = ctx.now_ms.saturating_sub(started_at_ms);
            if held < ctx.config.long_press_ms {
                // Scroll-through: the page scrolls, the element stays put.
                return Transition::to(pressed(element));
            }
            let Some(source) = ctx.startable(&element) else {
                return Transition::to(GestureState::Idle);
            };
            let mut draft = source.clone();
            draft.position = clamp_position(pointer.offset_from(pointer_offset), draft.size);
            Transition::with(
                GestureState::Dragging {
                    draft: draft.clone(),
                    pointer_offset,
                },
                vec![Effect::DraftUpdated(draft)],
            )
        }
        GestureInput::TouchEnd | GestureInput::Cancel => Transition::to(GestureState::Idle),
        // The finger is still down: clock and mouse-channel noise leave the hold intact.
        GestureInput::Tick
        | GestureInput::Move { .. }
        | GestureInput::Release
        | GestureInput::EditInput { .. }
        | GestureInput::EndEdit => Transition::to(pressed(element)),
        press @ (GestureInput::PressBackground
        | GestureInput::PressElement { .. }
        | GestureInput::PressHandle { .. }
        | GestureInput::TouchStart { .. }
        | GestureInput::BeginEdit { .. }) => resting(GestureState::Idle, press, ctx),
    }
}

/// Terminal event of a drag or resize.
fn commit(draft: Element, ctx: &GestureContext<'_>) -> Transition {
    if !ctx.still_valid(&draft.id) {
        return Transition::to(GestureState::Idle);
    }
    let mut draft = draft;
    draft.set_rect(clamp_rect(draft.rect()));
    Transition::with(GestureState::Idle, vec![Effect::CommitGeometry(draft)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ShapeProps, TextProps};

    fn slide() -> Slide {
        Slide::new("s", "")
            .with_element(
                Element::new("box", ElementKind::Shape(ShapeProps::default()))
                    .at(100.0, 100.0)
                    .sized(200.0, 100.0),
            )
            .with_element(
                Element::new("label", ElementKind::Text(TextProps::default()))
                    .at(400.0, 300.0)
                    .sized(300.0, 60.0),
            )
    }

    fn unlocked(_: &ElementId) -> bool {
        false
    }

    fn ctx<'a>(slide: &'a Slide, now_ms: u64) -> GestureContext<'a> {
        GestureContext {
            slide,
            now_ms,
            config: GestureConfig::default(),
            interactive: true,
            is_locked: &unlocked,
        }
    }

    fn press(id: &str, x: f64, y: f64) -> GestureInput {
        GestureInput::PressElement {
            id: ElementId::from(id),
            pointer: Point::new(x, y),
        }
    }

    #[test]
    fn test_first_click_selects_and_arms() {
        let slide = slide();
        let t = transition(GestureState::Idle, press("box", 150.0, 150.0), &ctx(&slide, 1_000));
        assert_eq!(
            t.state,
            GestureState::ArmedSingleClick {
                element: ElementId::from("box"),
                armed_at_ms: 1_000
            }
        );
        assert_eq!(
            t.effects,
            vec![
                Effect::Select(ElementId::from("box")),
                Effect::ScheduleTick { at_ms: 1_300 }
            ]
        );
    }

    #[test]
    fn test_second_click_within_window_starts_drag() {
        let slide = slide();
        let first = press("box", 150.0, 150.0);
        let armed = transition(GestureState::Idle, first, &ctx(&slide, 0)).state;
        let t = transition(armed, press("box", 160.0, 130.0), &ctx(&slide, 200));
        match t.state {
            GestureState::Dragging {
                pointer_offset,
                draft,
            } => {
                assert_eq!(pointer_offset, Point::new(60.0, 30.0));
                assert_eq!(draft.position, Point::new(100.0, 100.0));
            }
            other => panic!("expected drag, got {other:?}"),
        }
    }

    #[test]
    fn test_second_click_after_window_rearms() {
        let slide = slide();
        let first = press("box", 150.0, 150.0);
        let armed = transition(GestureState::Idle, first, &ctx(&slide, 0)).state;
        let t = transition(armed, press("box", 150.0, 150.0), &ctx(&slide, 300));
        assert!(matches!(
            t.state,
            GestureState::ArmedSingleClick {
                armed_at_ms: 300,
                ..
            }
        ));
    }

    #[test]
    fn test_click_on_other_element_rearms_there() {
        let slide = slide();
        let first = press("box", 150.0, 150.0);
        let armed = transition(GestureState::Idle, first, &ctx(&slide, 0)).state;
        let t = transition(armed, press("label", 450.0, 320.0), &ctx(&slide, 100));
        assert_eq!(
            t.state,
            GestureState::ArmedSingleClick {
                element: ElementId::from("label"),
                armed_at_ms: 100
            }
        );
    }

    #[test]
    fn test_tick_expires_arm() {
        let slide = slide();
        let first = press("box", 150.0, 150.0);
        let armed = transition(GestureState::Idle, first, &ctx(&slide, 0)).state;
        let early = transition(armed, GestureInput::Tick, &ctx(&slide, 299));
        assert!(matches!(early.state, GestureState::ArmedSingleClick { .. }));
        let late = transition(early.state, GestureInput::Tick, &ctx(&slide, 300));
        assert_eq!(late.state, GestureState::Idle);
        assert!(late.effects.is_empty());
    }

    #[test]
    fn test_drag_move_is_clamped_and_committed_on_release() {
        let slide = slide();
        let state = GestureState::Dragging {
            draft: slide.element(&ElementId::from("box")).cloned().expect("box"),
            pointer_offset: Point::new(10.0, 10.0),
        };
        let moved = transition(
            state,
            GestureInput::Move {
                pointer: Point::new(2_000.0, -50.0),
            },
            &ctx(&slide, 0),
        );
        let draft = moved.state.draft().cloned().expect("draft");
        assert_eq!(draft.position, Point::new(760.0, 0.0));

        let released = transition(moved.state, GestureInput::Release, &ctx(&slide, 0));
        assert_eq!(released.state, GestureState::Idle);
        assert_eq!(released.effects, vec![Effect::CommitGeometry(draft)]);
    }

    #[test]
    fn test_plain_handle_press_resizes_shift_press_drags() {
        let slide = slide();
        let resize = transition(
            GestureState::Idle,
            GestureInput::PressHandle {
                id: ElementId::from("box"),
                handle: ResizeHandle::BottomRight,
                pointer: Point::new(300.0, 200.0),
                shift: false,
            },
            &ctx(&slide, 0),
        );
        assert!(matches!(resize.state, GestureState::Resizing { .. }));

        let drag = transition(
            GestureState::Idle,
            GestureInput::PressHandle {
                id: ElementId::from("box"),
                handle: ResizeHandle::BottomRight,
                pointer: Point::new(300.0, 200.0),
                shift: true,
            },
            &ctx(&slide, 0),
        );
        match drag.state {
            GestureState::Dragging { pointer_offset, .. } => {
                assert_eq!(pointer_offset, Point::new(200.0, 100.0));
            }
            other => panic!("expected drag, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_right_edge_grows_width_only() {
        let r = resize_rect(
            Rect::new(100.0, 100.0, 200.0, 100.0),
            ResizeHandle::BottomRight,
            Point::new(40.0, -80.0),
        );
        assert_eq!(r, Rect::new(100.0, 100.0, 240.0, 50.0));
    }

    #[test]
    fn test_resize_left_edge_pins_right_edge() {
        let r = resize_rect(
            Rect::new(100.0, 100.0, 200.0, 100.0),
            ResizeHandle::TopLeft,
            Point::new(-30.0, 20.0),
        );
        assert_eq!(r, Rect::new(70.0, 120.0, 230.0, 80.0));
    }

    #[test]
    fn test_resize_left_edge_stops_at_slide_edge() {
        let r = resize_rect(
            Rect::new(100.0, 100.0, 200.0, 100.0),
            ResizeHandle::BottomLeft,
            Point::new(-500.0, 0.0),
        );
        assert_eq!(r, Rect::new(0.0, 100.0, 300.0, 100.0));
    }

    #[test]
    fn test_resize_floor() {
        let r = resize_rect(
            Rect::new(100.0, 100.0, 200.0, 100.0),
            ResizeHandle::TopRight,
            Point::new(-1_000.0, 1_000.0),
        );
        assert_eq!(r, Rect::new(100.0, 150.0, 50.0, 50.0));
    }

    #[test]
    fn test_locked_element_is_selected_but_never_armed() {
        let slide = slide();
        let locked = |_: &ElementId| true;
        let ctx = GestureContext {
            is_locked: &locked,
            ..ctx(&slide, 0)
        };
        let t = transition(GestureState::Idle, press("box", 150.0, 150.0), &ctx);
        assert_eq!(t.state, GestureState::Idle);
        assert_eq!(t.effects, vec![Effect::Select(ElementId::from("box"))]);

        let handle = transition(
            GestureState::Idle,
            GestureInput::PressHandle {
                id: ElementId::from("box"),
                handle: ResizeHandle::TopLeft,
                pointer: Point::new(100.0, 100.0),
                shift: false,
            },
            &ctx,
        );
        assert_eq!(handle.state, GestureState::Idle);
        assert!(handle.effects.is_empty());
    }

    #[test]
    fn test_non_interactive_mode_ignores_presses() {
        let slide = slide();
        let ctx = GestureContext {
            interactive: false,
            ..ctx(&slide, 0)
        };
        let t = transition(GestureState::Idle, press("box", 150.0, 150.0), &ctx);
        assert_eq!(t.state, GestureState::Idle);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_edit_commits_only_changed_text() {
        let slide = slide();
        let c = ctx(&slide, 0);
        let editing = transition(
            GestureState::Idle,
            GestureInput::BeginEdit {
                id: ElementId::from("label"),
            },
            &c,
        );
        assert_eq!(editing.effects, vec![Effect::SetEditing(true)]);

        let unchanged = transition(editing.state.clone(), GestureInput::EndEdit, &c);
        assert_eq!(unchanged.effects, vec![Effect::SetEditing(false)]);

        let typed = transition(
            editing.state,
            GestureInput::EditInput {
                text: "Quarterly results".to_string(),
            },
            &c,
        );
        let blurred = transition(typed.state, GestureInput::PressBackground, &c);
        assert_eq!(blurred.state, GestureState::Idle);
        assert_eq!(
            blurred.effects,
            vec![
                Effect::CommitText {
                    id: ElementId::from("label"),
                    text: "Quarterly results".to_string()
                },
                Effect::SetEditing(false),
                Effect::Deselect
            ]
        );
    }

    #[test]
    fn test_no_gesture_starts_while_editing() {
        let slide = slide();
        let state = GestureState::Editing {
            element: ElementId::from("label"),
            buffer: Some(EditBuffer::new("x")),
        };
        let t = transition(
            state.clone(),
            GestureInput::PressHandle {
                id: ElementId::from("label"),
                handle: ResizeHandle::TopLeft,
                pointer: Point::new(400.0, 300.0),
                shift: false,
            },
            &ctx(&slide, 0),
        );
        assert_eq!(t.state, state);
        let t = transition(state.clone(), press("label", 410.0, 310.0), &ctx(&slide, 0));
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_touch_scroll_through_then_long_press_drag() {
        let slide = slide();
        let pressed = transition(
            GestureState::Idle,
            GestureInput::TouchStart {
                target: Some(ElementId::from("box")),
                pointer: Point::new(150.0, 150.0),
            },
            &ctx(&slide, 0),
        );
        assert_eq!(pressed.effects, vec![Effect::Select(ElementId::from("box"))]);

        let early = transition(
            pressed.state,
            GestureInput::TouchMove {
                pointer: Point::new(150.0, 250.0),
            },
            &ctx(&slide, 100),
        );
        assert!(matches!(early.state, GestureState::TouchPressed { .. }));
        assert!(early.effects.is_empty());

        let late = transition(
            early.state,
            GestureInput::TouchMove {
                pointer: Point::new(170.0, 160.0),
            },
            &ctx(&slide, 350),
        );
        assert_eq!(
            late.state.draft().map(|d| d.position),
            Some(Point::new(120.0, 110.0))
        );

        let end = transition(late.state, GestureInput::TouchEnd, &ctx(&slide, 400));
        assert!(matches!(end.effects.as_slice(), [Effect::CommitGeometry(_)]));
    }

    #[test]
    fn test_touch_hold_survives_ticks_and_mouse_noise() {
        let slide = slide();
        let held = GestureState::TouchPressed {
            element: ElementId::from("box"),
            started_at_ms: 0,
            pointer_offset: Point::new(50.0, 50.0),
        };
        let noise = [
            GestureInput::Tick,
            GestureInput::Move {
                pointer: Point::new(500.0, 500.0),
            },
            GestureInput::Release,
            GestureInput::EndEdit,
        ];
        for input in noise {
            let t = transition(held.clone(), input, &ctx(&slide, 100));
            assert_eq!(t.state, held);
            assert!(t.effects.is_empty());
        }

        let lifted = transition(held.clone(), GestureInput::TouchEnd, &ctx(&slide, 100));
        assert_eq!(lifted.state, GestureState::Idle);
        let cancelled = transition(held.clone(), GestureInput::Cancel, &ctx(&slide, 100));
        assert_eq!(cancelled.state, GestureState::Idle);
    }

    #[test]
    fn test_mouse_press_during_touch_hold_takes_over() {
        let slide = slide();
        let held = GestureState::TouchPressed {
            element: ElementId::from("box"),
            started_at_ms: 0,
            pointer_offset: Point::new(50.0, 50.0),
        };
        let t = transition(held, press("label", 410.0, 310.0), &ctx(&slide, 100));
        assert!(matches!(
            t.state,
            GestureState::ArmedSingleClick { ref element, .. } if element.as_str() == "label"
        ));
        assert_eq!(t.effects[0], Effect::Select(ElementId::from("label")));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let slide = slide();
        let state = GestureState::Dragging {
            draft: slide.element(&ElementId::from("box")).cloned().expect("box"),
            pointer_offset: Point::default(),
        };
        let t = transition(state, GestureInput::Cancel, &ctx(&slide, 0));
        assert_eq!(t.state, GestureState::Idle);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_release_after_deletion_does_not_commit() {
        let slide = slide();
        let state = GestureState::Dragging {
            draft: Element::new("ghost", ElementKind::Shape(ShapeProps::default())),
            pointer_offset: Point::default(),
        };
        let t = transition(state, GestureInput::Release, &ctx(&slide, 0));
        assert_eq!(t.state, GestureState::Idle);
        assert!(t.effects.is_empty());
    }
}
