//! The control node.
//!
//! A [`Control`] pairs the engine-owned [`ControlBase`] (declared layout,
//! measured boxes, transforms, animators, interaction memory, listeners)
//! with a boxed [`Widget`] that supplies the control-specific hooks:
//! content measurement, child placement, default input handling and content
//! drawing. Children are owned by the widget and exposed through
//! `children()` / `children_mut()` in draw order.
//!
//! Declared sizes keep their sizing keyword; resolved pixel values only
//! live in the measured boxes.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use trellis_core::error::{check_non_negative, check_unit};
use trellis_core::*;
use web_time::Instant;

use crate::draw::DrawContext;
use crate::events::{ControlEvents, KeyEventArgs, MouseEvent, MouseEventKind};
use crate::interaction::InteractionContext;
use crate::runtime::PassContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub u64);

static NEXT_CONTROL_ID: AtomicU64 = AtomicU64::new(1);

impl ControlId {
    /// Allocates a process-wide unique id.
    pub fn next() -> Self {
        ControlId(NEXT_CONTROL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Sizing keyword for one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Dimension {
    Fixed(f32),
    #[default]
    WrapContent,
    MatchParent,
}

impl Dimension {
    fn validate(self, name: &'static str) -> Result<Self> {
        if let Dimension::Fixed(v) = self {
            check_non_negative(name, v)?;
        }
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DimensionSize {
    pub width: Dimension,
    pub height: Dimension,
}

impl DimensionSize {
    pub const WRAP: DimensionSize = DimensionSize::new(Dimension::WrapContent, Dimension::WrapContent);
    pub const MATCH_PARENT: DimensionSize =
        DimensionSize::new(Dimension::MatchParent, Dimension::MatchParent);

    pub const fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }

    pub const fn fixed(width: f32, height: f32) -> Self {
        Self::new(Dimension::Fixed(width), Dimension::Fixed(height))
    }

    fn validate(self, name: &'static str) -> Result<Self> {
        self.width.validate(name)?;
        self.height.validate(name)?;
        Ok(self)
    }
}

/// Which background visual is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisualState {
    #[default]
    Normal,
    Hovered,
    Active,
    Disabled,
}

/// Background sub-trees per visual state. Missing states fall back to
/// `normal`.
///
/// With `show` or `hide` set, a state change cross-fades: the incoming
/// background plays `show` while the outgoing one stays drawn, playing
/// `hide`, until that animation ends. Only the matrix and opacity channels
/// of these animators are used.
#[derive(Default)]
pub struct Backgrounds {
    pub normal: Option<Box<Control>>,
    pub hovered: Option<Box<Control>>,
    pub active: Option<Box<Control>>,
    pub disabled: Option<Box<Control>>,
    pub show: Option<Animator>,
    pub hide: Option<Animator>,
    outgoing: Option<VisualState>,
    restart_pending: bool,
}

impl Backgrounds {
    fn slot(&self, state: VisualState) -> &Option<Box<Control>> {
        match state {
            VisualState::Normal => &self.normal,
            VisualState::Hovered => &self.hovered,
            VisualState::Active => &self.active,
            VisualState::Disabled => &self.disabled,
        }
    }

    fn slot_mut(&mut self, state: VisualState) -> &mut Option<Box<Control>> {
        match state {
            VisualState::Normal => &mut self.normal,
            VisualState::Hovered => &mut self.hovered,
            VisualState::Active => &mut self.active,
            VisualState::Disabled => &mut self.disabled,
        }
    }

    pub fn set(&mut self, state: VisualState, background: Option<Control>) {
        *self.slot_mut(state) = background.map(Box::new);
    }

    pub fn fade_in(spec: AnimationSpec) -> Animator {
        Animator::with_states(
            spec,
            AnimatorState {
                opacity: 0.0,
                ..AnimatorState::default()
            },
            AnimatorState::default(),
        )
    }

    pub fn fade_out(spec: AnimationSpec) -> Animator {
        Animator::with_states(
            spec,
            AnimatorState::default(),
            AnimatorState {
                opacity: 0.0,
                ..AnimatorState::default()
            },
        )
    }

    /// The state whose slot serves `state`.
    fn resolve(&self, state: VisualState) -> VisualState {
        if self.slot(state).is_some() {
            state
        } else {
            VisualState::Normal
        }
    }

    /// Records a visual state change. Animations start at the next measure.
    pub(crate) fn transition(&mut self, from: VisualState, to: VisualState) {
        if self.show.is_none() && self.hide.is_none() {
            return;
        }
        let (from, to) = (self.resolve(from), self.resolve(to));
        if from == to {
            return;
        }
        self.outgoing = self.hide.is_some().then_some(from);
        self.restart_pending = true;
    }

    /// Advances the transition. Returns whether it is still running.
    pub(crate) fn update(&mut self, now: Instant) -> bool {
        if std::mem::take(&mut self.restart_pending) {
            for anim in [&mut self.show, &mut self.hide].into_iter().flatten() {
                anim.restart(now);
            }
        }
        let showing = self.show.as_mut().is_some_and(|a| a.update(now));
        let hiding = self.hide.as_mut().is_some_and(|a| a.update(now));
        if !hiding {
            self.outgoing = None;
        }
        showing || hiding
    }

    fn sample(&self, anim: Option<&Animator>) -> AnimatorState {
        match anim {
            Some(a) if self.restart_pending => *a.before(),
            Some(a) => *a.current(),
            None => AnimatorState::default(),
        }
    }

    pub(crate) fn incoming(&self) -> AnimatorState {
        self.sample(self.show.as_ref())
    }

    pub(crate) fn outgoing(&self) -> AnimatorState {
        self.sample(self.hide.as_ref())
    }

    /// The background being faded out, while `hide` runs.
    pub(crate) fn outgoing_mut(&mut self, state: VisualState) -> Option<&mut Control> {
        let from = self.outgoing.filter(|s| *s != self.resolve(state))?;
        self.slot_mut(from).as_deref_mut()
    }

    pub fn for_state(&self, state: VisualState) -> Option<&Control> {
        self.slot(state).as_deref().or(self.normal.as_deref())
    }

    pub fn for_state_mut(&mut self, state: VisualState) -> Option<&mut Control> {
        let own = self.slot(state).is_some();
        let slot = if own {
            self.slot_mut(state)
        } else {
            &mut self.normal
        };
        slot.as_deref_mut()
    }
}

/// The four animators a control may carry.
///
/// For `show` and `hide`, `box_adjust` is a fraction of the boundary size
/// (`-0.25` on each edge halves the box on that axis).
#[derive(Clone, Debug, Default)]
pub struct ControlAnimators {
    pub show: Option<Animator>,
    pub hide: Option<Animator>,
    pub movement: Option<Animator>,
    pub transform: Option<Animator>,
}

impl ControlAnimators {
    pub fn show(spec: AnimationSpec) -> Animator {
        Animator::with_states(
            spec,
            AnimatorState {
                box_adjust: Insets::uniform(-0.25),
                opacity: 0.0,
                ..AnimatorState::default()
            },
            AnimatorState::default(),
        )
    }

    pub fn hide(spec: AnimationSpec) -> Animator {
        Animator::with_states(
            spec,
            AnimatorState::default(),
            AnimatorState {
                box_adjust: Insets::uniform(-0.25),
                opacity: 0.0,
                ..AnimatorState::default()
            },
        )
    }

    /// All four animators with the same timing.
    pub fn all(spec: AnimationSpec) -> Self {
        Self {
            show: Some(Self::show(spec)),
            hide: Some(Self::hide(spec)),
            movement: Some(Animator::new(spec)),
            transform: Some(Animator::new(spec)),
        }
    }

    pub(crate) fn on_visibility_toggled(&mut self, visible: bool, now: Instant) {
        let (starting, stopping) = if visible {
            (&mut self.show, &mut self.hide)
        } else {
            (&mut self.hide, &mut self.show)
        };
        if let Some(a) = stopping {
            a.stop();
        }
        if let Some(a) = starting {
            a.restart(now);
        }
    }

    pub(crate) fn visibility_running(&self) -> Option<&Animator> {
        [self.show.as_ref(), self.hide.as_ref()]
            .into_iter()
            .flatten()
            .find(|a| a.is_running())
    }

    pub(crate) fn visibility_running_mut(&mut self) -> Option<&mut Animator> {
        [self.show.as_mut(), self.hide.as_mut()]
            .into_iter()
            .flatten()
            .find(|a| a.is_running())
    }

    pub fn any_running(&self) -> bool {
        [&self.show, &self.hide, &self.movement, &self.transform]
            .into_iter()
            .flatten()
            .any(|a| a.is_running())
    }
}

/// Interaction memory, the only per-control state that carries meaning from
/// one frame to the next.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
    pub held: MouseButtons,
    pub hovered: bool,
    pub focused: bool,
    /// Last pointer position in box space.
    pub last_pointer: Option<Vec2>,
    pub last_click: [Option<Instant>; 3],
    pub click_count: [u32; 3],
}

/// `outside ⊇ boundary ⊇ interactive ⊇ content`, recomputed by each measure.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeasuredBoxes {
    pub outside: BoxRect,
    pub boundary: BoxRect,
    pub interactive: BoxRect,
    pub content: BoxRect,
}

impl MeasuredBoxes {
    pub fn map(self, f: impl Fn(BoxRect) -> BoxRect) -> Self {
        Self {
            outside: f(self.outside),
            boundary: f(self.boundary),
            interactive: f(self.interactive),
            content: f(self.content),
        }
    }

    pub fn is_nested(&self) -> bool {
        self.outside.contains_rect(&self.boundary)
            && self.boundary.contains_rect(&self.interactive)
            && self.interactive.contains_rect(&self.content)
    }
}

fn validate_insets(name: &'static str, v: Insets) -> Result<Insets> {
    for edge in [v.left, v.top, v.right, v.bottom] {
        check_non_negative(name, edge)?;
    }
    Ok(v)
}

pub struct ControlBase {
    id: ControlId,
    pub name: String,
    enabled: Observed<ControlBase, bool>,
    visible: Observed<ControlBase, bool>,
    pub focusable: bool,
    pub clip_children: bool,
    /// Take exclusive capture of a button pressed over this control.
    pub capture_on_press: bool,
    pub wheel_intercept: WheelIntercept,
    size: Observed<ControlBase, DimensionSize>,
    min_size: DimensionSize,
    max_size: DimensionSize,
    margin: Observed<ControlBase, Insets>,
    padding: Observed<ControlBase, Insets>,
    extend_outside: Insets,
    scale: Observed<ControlBase, f32>,
    transform: Observed<ControlBase, Matrix>,
    inner_origin: Vec2,
    pub backgrounds: Backgrounds,
    pub animators: ControlAnimators,
    pub events: ControlEvents,

    pub(crate) interaction: InteractionState,
    pub(crate) visual_state: VisualState,
    pub(crate) boxes: MeasuredBoxes,
    pub(crate) local_transform: Matrix,
    pub(crate) full_transform: Matrix,
    pub(crate) last_parent_local: Option<Matrix>,
    pub(crate) last_move: Matrix,
    pub(crate) last_user_transform: Matrix,
    pub(crate) suppress_next_animation: bool,
    pub(crate) measure_requested: bool,
    pub(crate) last_offered: Option<Size>,
    pub(crate) last_visible: Option<bool>,
}

impl Default for ControlBase {
    fn default() -> Self {
        Self {
            id: ControlId::next(),
            name: String::new(),
            enabled: Observed::new("enabled", true),
            visible: Observed::new("visible", true),
            focusable: false,
            clip_children: false,
            capture_on_press: true,
            wheel_intercept: WheelIntercept::empty(),
            size: Observed::new("size", DimensionSize::WRAP),
            min_size: DimensionSize::fixed(0.0, 0.0),
            max_size: DimensionSize::WRAP,
            margin: Observed::new("margin", Insets::ZERO),
            padding: Observed::new("padding", Insets::ZERO),
            extend_outside: Insets::ZERO,
            scale: Observed::new("scale", 1.0),
            transform: Observed::new("transform", Matrix::IDENTITY),
            inner_origin: Vec2::new(0.5, 0.5),
            backgrounds: Backgrounds::default(),
            animators: ControlAnimators::default(),
            events: ControlEvents::default(),
            interaction: InteractionState::default(),
            visual_state: VisualState::Normal,
            boxes: MeasuredBoxes::default(),
            local_transform: Matrix::IDENTITY,
            full_transform: Matrix::IDENTITY,
            last_parent_local: None,
            last_move: Matrix::IDENTITY,
            last_user_transform: Matrix::IDENTITY,
            suppress_next_animation: false,
            measure_requested: true,
            last_offered: None,
            last_visible: None,
        }
    }
}

impl ControlBase {
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// Asks for a measure pass on the next frame.
    pub fn request_measure(&mut self) {
        self.measure_requested = true;
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.get()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled.set(enabled) {
            self.request_measure();
        }
    }

    pub fn on_enabled_change(&mut self, f: impl FnMut(&mut PropertyChange<bool>) + 'static) {
        self.enabled.on_change(f);
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.get()
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible.set(visible) {
            self.request_measure();
        }
    }

    pub fn on_visible_change(&mut self, f: impl FnMut(&mut PropertyChange<bool>) + 'static) {
        self.visible.on_change(f);
    }

    pub fn size(&self) -> DimensionSize {
        *self.size.get()
    }

    pub fn set_size(&mut self, size: DimensionSize) -> Result<()> {
        if self.size.set(size.validate("size")?) {
            self.request_measure();
        }
        Ok(())
    }

    /// For keyword sizes chosen by widget constructors, which cannot fail
    /// validation.
    pub(crate) fn init_size(&mut self, size: DimensionSize) {
        self.size.set(size);
        self.request_measure();
    }

    pub fn on_size_change(&mut self, f: impl FnMut(&mut PropertyChange<DimensionSize>) + 'static) {
        self.size.on_change(f);
    }

    pub fn min_size(&self) -> DimensionSize {
        self.min_size
    }

    pub fn set_min_size(&mut self, size: DimensionSize) -> Result<()> {
        let size = size.validate("min_size")?;
        if size != self.min_size {
            self.min_size = size;
            self.request_measure();
        }
        Ok(())
    }

    pub fn max_size(&self) -> DimensionSize {
        self.max_size
    }

    pub fn set_max_size(&mut self, size: DimensionSize) -> Result<()> {
        let size = size.validate("max_size")?;
        if size != self.max_size {
            self.max_size = size;
            self.request_measure();
        }
        Ok(())
    }

    pub fn margin(&self) -> Insets {
        *self.margin.get()
    }

    pub fn set_margin(&mut self, margin: Insets) -> Result<()> {
        if self.margin.set(validate_insets("margin", margin)?) {
            self.request_measure();
        }
        Ok(())
    }

    pub fn on_margin_change(&mut self, f: impl FnMut(&mut PropertyChange<Insets>) + 'static) {
        self.margin.on_change(f);
    }

    pub fn padding(&self) -> Insets {
        *self.padding.get()
    }

    pub fn set_padding(&mut self, padding: Insets) -> Result<()> {
        if self.padding.set(validate_insets("padding", padding)?) {
            self.request_measure();
        }
        Ok(())
    }

    pub(crate) fn init_padding(&mut self, padding: Insets) {
        self.padding.set(padding);
        self.request_measure();
    }

    pub fn on_padding_change(&mut self, f: impl FnMut(&mut PropertyChange<Insets>) + 'static) {
        self.padding.on_change(f);
    }

    pub fn extend_outside(&self) -> Insets {
        self.extend_outside
    }

    pub fn set_extend_outside(&mut self, extend: Insets) -> Result<()> {
        let extend = validate_insets("extend_outside", extend)?;
        if extend != self.extend_outside {
            self.extend_outside = extend;
            self.request_measure();
        }
        Ok(())
    }

    pub fn scale(&self) -> f32 {
        *self.scale.get()
    }

    /// Zero is accepted and yields an empty, non-interactive control.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        if self.scale.set(check_non_negative("scale", scale)?) {
            self.request_measure();
        }
        Ok(())
    }

    pub fn on_scale_change(&mut self, f: impl FnMut(&mut PropertyChange<f32>) + 'static) {
        self.scale.on_change(f);
    }

    /// Converts parent units into this control's units; 0 when `scale` is 0.
    pub fn render_scale(&self) -> f32 {
        let s = self.scale();
        if s > 0.0 { 1.0 / s } else { 0.0 }
    }

    pub fn transform(&self) -> Matrix {
        *self.transform.get()
    }

    pub fn set_transform(&mut self, transform: Matrix) -> Result<()> {
        if !transform.is_finite() {
            return Err(ControlError::invalid("transform", "matrix has non-finite entries"));
        }
        if self.transform.set(transform) {
            self.request_measure();
        }
        Ok(())
    }

    pub fn on_transform_change(&mut self, f: impl FnMut(&mut PropertyChange<Matrix>) + 'static) {
        self.transform.on_change(f);
    }

    pub fn inner_origin(&self) -> Vec2 {
        self.inner_origin
    }

    /// Pivot for scale and user transform, as a fraction of the boundary box.
    pub fn set_inner_origin(&mut self, origin: Vec2) -> Result<()> {
        let origin = Vec2::new(
            check_unit("inner_origin.x", origin.x)?,
            check_unit("inner_origin.y", origin.y)?,
        );
        if origin != self.inner_origin {
            self.inner_origin = origin;
            self.request_measure();
        }
        Ok(())
    }

    pub fn boxes(&self) -> &MeasuredBoxes {
        &self.boxes
    }

    pub fn outside_box(&self) -> BoxRect {
        self.boxes.outside
    }

    pub fn boundary(&self) -> BoxRect {
        self.boxes.boundary
    }

    pub fn interactive_box(&self) -> BoxRect {
        self.boxes.interactive
    }

    pub fn content_box(&self) -> BoxRect {
        self.boxes.content
    }

    /// Box space to parent space.
    pub fn local_transform(&self) -> Matrix {
        self.local_transform
    }

    /// Box space to screen space.
    pub fn full_transform(&self) -> Matrix {
        self.full_transform
    }

    pub fn visual_state(&self) -> VisualState {
        self.visual_state
    }

    pub(crate) fn set_visual_state(&mut self, state: VisualState) {
        if self.visual_state != state {
            log::trace!("{:?} visual state {:?} -> {:?}", self.id, self.visual_state, state);
            self.backgrounds.transition(self.visual_state, state);
            self.visual_state = state;
            self.request_measure();
        }
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn is_hovered(&self) -> bool {
        self.interaction.hovered
    }

    pub fn is_focused(&self) -> bool {
        self.interaction.focused
    }

    pub fn held_buttons(&self) -> MouseButtons {
        self.interaction.held
    }
}

/// Control-specific behavior plugged into the engine passes.
///
/// Every hook has a default so leaf widgets only implement what they need.
pub trait Widget: Any {
    fn type_name(&self) -> &'static str;

    /// Returns the content rectangle for `offered` (an infinite axis means
    /// wrap to content). The default fills whatever finite space is offered.
    fn measure_content(&mut self, _base: &ControlBase, offered: Size, _cx: &PassContext) -> BoxRect {
        let finite_or_zero = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        BoxRect::new(0.0, 0.0, finite_or_zero(offered.width), finite_or_zero(offered.height))
    }

    /// Widget-side state that invalidates the last measure.
    fn needs_measure(&self) -> bool {
        false
    }

    /// Places children; `base` already holds this frame's transforms.
    fn place_children(&mut self, _base: &ControlBase, _cx: &PassContext) {}

    /// Per-frame timers, run after placement and before interaction.
    fn tick(&mut self, _base: &mut ControlBase, _cx: &PassContext) {}

    /// Default handling, skipped once the event is handled.
    fn on_mouse(&mut self, _base: &mut ControlBase, _event: &mut MouseEvent, _cx: &mut InteractionContext) {}

    fn on_key(&mut self, _base: &mut ControlBase, _event: &mut KeyEventArgs, _cx: &mut InteractionContext) {}

    /// Draws content and children in box space.
    fn draw_content(&mut self, _base: &ControlBase, _list: &mut DrawList, _cx: &mut DrawContext) {}

    fn children(&self) -> SmallVec<[&Control; 4]> {
        SmallVec::new()
    }

    fn children_mut(&mut self) -> SmallVec<[&mut Control; 4]> {
        SmallVec::new()
    }
}

/// Leaf widget with no content of its own.
pub struct Empty;

impl Widget for Empty {
    fn type_name(&self) -> &'static str {
        "Empty"
    }
}

pub struct Control {
    pub base: ControlBase,
    widget: Box<dyn Widget>,
}

impl Control {
    pub fn new(widget: impl Widget) -> Self {
        Self {
            base: ControlBase::default(),
            widget: Box::new(widget),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.base.name = name.into();
        self
    }

    pub fn id(&self) -> ControlId {
        self.base.id
    }

    pub fn type_name(&self) -> &'static str {
        self.widget.type_name()
    }

    pub fn widget<W: Widget>(&self) -> Option<&W> {
        let any: &dyn Any = self.widget.as_ref();
        any.downcast_ref()
    }

    pub fn widget_mut<W: Widget>(&mut self) -> Option<&mut W> {
        let any: &mut dyn Any = self.widget.as_mut();
        any.downcast_mut()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut ControlBase, &mut dyn Widget) {
        (&mut self.base, self.widget.as_mut())
    }

    pub fn children(&self) -> SmallVec<[&Control; 4]> {
        self.widget.children()
    }

    pub fn children_mut(&mut self) -> SmallVec<[&mut Control; 4]> {
        self.widget.children_mut()
    }

    /// Whether this control, its current background, or any descendant
    /// asked to be measured again.
    pub fn needs_measure(&self) -> bool {
        self.base.measure_requested
            || self.widget.needs_measure()
            || self
                .base
                .backgrounds
                .for_state(self.base.visual_state)
                .is_some_and(|bg| bg.needs_measure())
            || self.children().iter().any(|c| c.needs_measure())
    }

    /// Makes the next parent-supplied transform apply without a move
    /// animation, for this control and its whole subtree.
    pub fn suppress_next_animation(&mut self) {
        self.base.suppress_next_animation = true;
        for child in self.children_mut() {
            child.suppress_next_animation();
        }
    }

    pub fn find(&self, id: ControlId) -> Option<&Control> {
        if self.id() == id {
            return Some(self);
        }
        self.widget
            .children()
            .into_iter()
            .find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        if self.id() == id {
            return Some(self);
        }
        self.widget
            .children_mut()
            .into_iter()
            .find_map(|c| c.find_mut(id))
    }

    /// Pre-order walk with depth.
    pub fn visit(&self, f: &mut dyn FnMut(&Control, usize)) {
        self.visit_at(0, f);
    }

    fn visit_at(&self, depth: usize, f: &mut dyn FnMut(&Control, usize)) {
        f(self, depth);
        for child in self.children() {
            child.visit_at(depth + 1, f);
        }
    }

    pub fn on_mouse(&mut self, f: impl FnMut(&mut MouseEvent) + 'static) {
        self.base.events.mouse.add(f);
    }

    /// Listener for completed clicks, from the mouse or from Enter.
    pub fn on_click(&mut self, mut f: impl FnMut(&mut MouseEvent) + 'static) {
        self.base.events.mouse.add(move |e| {
            if e.kind == MouseEventKind::Click {
                f(e);
            }
        });
    }

    pub fn on_key(&mut self, f: impl FnMut(&mut KeyEventArgs) + 'static) {
        self.base.events.key.add(f);
    }

    /// Whether `p`, given in the parent's space, falls inside the
    /// interactive box.
    pub fn hit_test_parent_point(&self, p: Vec2) -> bool {
        self.base.is_visible()
            && self
                .base
                .local_transform
                .invert()
                .is_some_and(|inv| self.base.boxes.interactive.contains(inv.transform_point(p)))
    }

    /// Screen space to box space; `None` while the transform is singular.
    pub fn screen_to_local(&self, p: Vec2) -> Option<Vec2> {
        self.base.full_transform.invert().map(|m| m.transform_point(p))
    }
}

impl std::fmt::Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Control")
            .field("id", &self.base.id)
            .field("type", &self.type_name())
            .field("name", &self.base.name)
            .field("boundary", &self.base.boxes.boundary)
            .finish()
    }
}
