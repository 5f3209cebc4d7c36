//! Vertical scroll bar built from three child controls: a decrement button,
//! an increment button and a thumb riding on the track between them.
//!
//! Pressing a button scrolls one line and keeps repeating while held, first
//! after the platform's repeat delay, then once per repeat interval. Pressing
//! the track pages towards the pointer until the thumb passes it. Dragging
//! the thumb maps the pointer onto the value range. Every change goes out as
//! a [`ScrollEvent`] first; listeners may veto it before the bar applies it.

use std::str::FromStr;

use smallvec::SmallVec;
use trellis_core::*;
use web_time::Instant;

use crate::control::{Control, ControlBase, Dimension, DimensionSize, VisualState, Widget};
use crate::draw::DrawContext;
use crate::events::{MouseEvent, MouseEventKind};
use crate::interaction::InteractionContext;
use crate::runtime::PassContext;
use crate::widgets::shape::{Shape, ShapeKind, ShapeWidget, StateColors, TriangleDirection};

pub const THICKNESS: f32 = 16.0;
pub const LENGTH: f32 = 64.0;
pub const MIN_THUMB_SIZE: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LinearDirection {
    LeftToRight = 0,
    RightToLeft = 1,
    TopToBottom = 2,
    BottomToTop = 3,
}

impl LinearDirection {
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::TopToBottom | Self::BottomToTop)
    }

    /// Values grow towards the left or the top.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomToTop)
    }
}

impl TryFrom<u8> for LinearDirection {
    type Error = ControlError;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(Self::LeftToRight),
            1 => Ok(Self::RightToLeft),
            2 => Ok(Self::TopToBottom),
            3 => Ok(Self::BottomToTop),
            _ => Err(ControlError::invalid(
                "direction",
                format!("unknown direction code {v}"),
            )),
        }
    }
}

impl FromStr for LinearDirection {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left-to-right" => Ok(Self::LeftToRight),
            "right-to-left" => Ok(Self::RightToLeft),
            "top-to-bottom" => Ok(Self::TopToBottom),
            "bottom-to-top" => Ok(Self::BottomToTop),
            _ => Err(ControlError::invalid(
                "direction",
                format!("unknown direction `{s}`"),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollAction {
    #[default]
    None,
    LineDecrement,
    LineIncrement,
    PageDecrement,
    PageIncrement,
    ThumbTrack,
}

impl ScrollAction {
    fn is_repeating(self) -> bool {
        !matches!(self, Self::None | Self::ThumbTrack)
    }

    fn sign(self) -> f32 {
        match self {
            Self::LineDecrement | Self::PageDecrement => -1.0,
            _ => 1.0,
        }
    }
}

/// A proposed value change. Set `suppress` to keep the bar from applying
/// `new_value` itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub action: ScrollAction,
    pub old_value: f32,
    /// Already clamped to the value range.
    pub new_value: f32,
    /// Change for a single repeat, before rounding and clamping.
    pub unbound_delta: f32,
    /// How many times `unbound_delta` applies. Fractional for fine wheel
    /// deltas.
    pub repeat_count: f32,
    pub suppress: bool,
}

pub struct ScrollBarWidget {
    direction: LinearDirection,
    value: Observed<ScrollBarWidget, f32>,
    min_value: f32,
    max_value: f32,
    line_size: f32,
    page_size: f32,
    align_value: f32,
    pub auto_update: bool,
    decrement: Option<Control>,
    increment: Option<Control>,
    thumb: Option<Control>,
    pub events: Listeners<ScrollEvent>,

    action: ScrollAction,
    repeat_next: Option<Instant>,
    /// Pointer span, in box space, that maps onto the whole value range.
    drag: Option<(f32, f32)>,
    page_pointer: f32,
    bar_offset: f32,
    bar_size: f32,
    thumb_offset: f32,
    thumb_size: f32,
    dirty: bool,
}

impl ScrollBarWidget {
    fn new(direction: LinearDirection) -> Result<Self> {
        let mut bar = Self {
            direction: LinearDirection::TopToBottom,
            value: Observed::new("value", 0.0),
            min_value: 0.0,
            max_value: 1.0,
            line_size: 1.0 / 32.0,
            page_size: 1.0 / 8.0,
            align_value: 0.0,
            auto_update: true,
            decrement: Some(arrow(TriangleDirection::Up)),
            increment: Some(arrow(TriangleDirection::Down)),
            thumb: Some(thumb()),
            events: Listeners::new(),
            action: ScrollAction::None,
            repeat_next: None,
            drag: None,
            page_pointer: 0.0,
            bar_offset: 0.0,
            bar_size: 0.0,
            thumb_offset: 0.0,
            thumb_size: 0.0,
            dirty: true,
        };
        bar.set_direction(direction)?;
        Ok(bar)
    }

    pub fn direction(&self) -> LinearDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: LinearDirection) -> Result<()> {
        if !direction.is_vertical() {
            return Err(ControlError::NotImplemented("horizontal scroll bar"));
        }
        if direction != self.direction {
            self.direction = direction;
            self.dirty = true;
        }
        let (dec, inc) = if direction.is_reversed() {
            (TriangleDirection::Down, TriangleDirection::Up)
        } else {
            (TriangleDirection::Up, TriangleDirection::Down)
        };
        for (slot, pointing) in [(&mut self.decrement, dec), (&mut self.increment, inc)] {
            if let Some(shape) = slot.as_mut().and_then(|c| c.widget_mut::<ShapeWidget>()) {
                shape.kind = ShapeKind::Triangle {
                    direction: pointing,
                };
            }
        }
        Ok(())
    }

    pub fn value(&self) -> f32 {
        *self.value.get()
    }

    /// Clamped into the value range; NaN becomes the minimum.
    pub fn set_value(&mut self, value: f32) {
        let value = self.clamp_value(value);
        if self.value.set(value) {
            self.dirty = true;
        }
    }

    pub fn on_value_change(&mut self, f: impl FnMut(&mut PropertyChange<f32>) + 'static) {
        self.value.on_change(f);
    }

    pub fn on_scroll(&mut self, f: impl FnMut(&mut ScrollEvent) + 'static) {
        self.events.add(f);
    }

    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    pub fn set_range(&mut self, min: f32, max: f32) -> Result<()> {
        self.min_value = error::check_finite("min_value", min)?;
        self.max_value = error::check_finite("max_value", max)?;
        let value = self.value();
        self.set_value(value);
        self.dirty = true;
        Ok(())
    }

    /// `max(max - min, 0)`.
    pub fn effective_range(&self) -> f32 {
        (self.max_value - self.min_value).max(0.0)
    }

    pub fn line_size(&self) -> f32 {
        self.line_size
    }

    /// Line step as a fraction of the range.
    pub fn set_line_size(&mut self, proportion: f32) -> Result<()> {
        self.line_size = error::check_unit("line_size", proportion)?;
        Ok(())
    }

    pub fn page_size(&self) -> f32 {
        self.page_size
    }

    /// Page step and thumb length as a fraction of the range.
    pub fn set_page_size(&mut self, proportion: f32) -> Result<()> {
        self.page_size = error::check_unit("page_size", proportion)?;
        self.dirty = true;
        Ok(())
    }

    pub fn align_value(&self) -> f32 {
        self.align_value
    }

    /// Snaps emitted values to multiples of `align`; 0 disables snapping.
    pub fn set_align_value(&mut self, align: f32) -> Result<()> {
        self.align_value = error::check_non_negative("align_value", align)?;
        Ok(())
    }

    pub fn set_decrement(&mut self, button: Option<Control>) {
        self.decrement = button.map(slot_child);
        self.dirty = true;
    }

    pub fn set_increment(&mut self, button: Option<Control>) {
        self.increment = button.map(slot_child);
        self.dirty = true;
    }

    pub fn set_thumb(&mut self, thumb: Option<Control>) {
        self.thumb = thumb.map(slot_child);
        self.dirty = true;
    }

    pub fn decrement(&self) -> Option<&Control> {
        self.decrement.as_ref()
    }

    pub fn increment(&self) -> Option<&Control> {
        self.increment.as_ref()
    }

    pub fn thumb(&self) -> Option<&Control> {
        self.thumb.as_ref()
    }

    pub fn action(&self) -> ScrollAction {
        self.action
    }

    pub fn bar_size(&self) -> f32 {
        self.bar_size
    }

    pub fn thumb_offset(&self) -> f32 {
        self.thumb_offset
    }

    pub fn thumb_size(&self) -> f32 {
        self.thumb_size
    }

    fn clamp_value(&self, v: f32) -> f32 {
        if v.is_nan() {
            return self.min_value;
        }
        v.clamp(self.min_value, self.min_value.max(self.max_value))
    }

    fn normalized(&self) -> f32 {
        let range = self.effective_range();
        if range > 0.0 {
            ((self.value() - self.min_value) / range).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Fraction of the free track that lies before the thumb.
    fn gravity(&self, normalized: f32) -> f32 {
        if self.direction.is_reversed() {
            1.0 - normalized
        } else {
            normalized
        }
    }

    /// `None` when the span is empty, which makes dragging a no-op.
    fn pointer_to_value(&self, y: f32, (start, end): (f32, f32)) -> Option<f32> {
        if end - start <= 0.0 {
            return None;
        }
        let t = ((y - start) / (end - start)).clamp(0.0, 1.0);
        let t = if self.direction.is_reversed() { 1.0 - t } else { t };
        Some(self.min_value + t * self.effective_range())
    }

    fn page_span(&self, base: &ControlBase) -> (f32, f32) {
        let start = base.content_box().top + self.bar_offset + self.thumb_size / 2.0;
        (start, start + (self.bar_size - self.thumb_size))
    }

    /// Repeats left once paging is held back from overshooting the pointer.
    /// Zero when the thumb already passed it.
    fn page_repeats(&self, base: &ControlBase, step: f32, mut count: u32) -> u32 {
        let sign = match self.action {
            ScrollAction::PageIncrement => 1.0,
            ScrollAction::PageDecrement => -1.0,
            _ => return count,
        };
        let Some(target) = self.pointer_to_value(self.page_pointer, self.page_span(base)) else {
            return 0;
        };
        let value = self.value();
        let passed = |v: f32| (v - target) * sign >= 0.0;
        if passed(value) {
            return 0;
        }
        while count >= 2 && passed(value + step * count as f32) {
            count -= 1;
        }
        count
    }

    fn step_for(&self, action: ScrollAction) -> f32 {
        let proportion = match action {
            ScrollAction::LineDecrement | ScrollAction::LineIncrement => self.line_size,
            ScrollAction::PageDecrement | ScrollAction::PageIncrement => self.page_size,
            _ => 0.0,
        };
        action.sign() * proportion * self.effective_range()
    }

    /// Proposes `value + unbound_delta * repeat_count`; a no-op while the
    /// range is empty.
    fn emit(&mut self, action: ScrollAction, unbound_delta: f32, repeat_count: f32) {
        if self.effective_range() <= 0.0 {
            return;
        }
        let old_value = self.value();
        let mut new_value = old_value + unbound_delta * repeat_count;
        if self.align_value > 0.0 {
            new_value = (new_value / self.align_value).round() * self.align_value;
        }
        let mut event = ScrollEvent {
            action,
            old_value,
            new_value: self.clamp_value(new_value),
            unbound_delta,
            repeat_count,
            suppress: false,
        };
        self.events.emit(&mut event);
        log::debug!(
            "scroll {:?} x{}: {} -> {}{}",
            action,
            repeat_count,
            old_value,
            event.new_value,
            if event.suppress { " (suppressed)" } else { "" }
        );
        if self.auto_update && !event.suppress {
            self.set_value(event.new_value);
        }
    }

    fn emit_repeat(&mut self, base: &ControlBase, count: u32) {
        let action = self.action;
        let step = self.step_for(action);
        let count = self.page_repeats(base, step, count);
        if count == 0 {
            self.repeat_next = None;
            return;
        }
        self.emit(action, step, count as f32);
    }

    fn press(&mut self, base: &ControlBase, p: Vec2, cx: &InteractionContext) {
        if self.effective_range() <= 0.0 {
            return;
        }
        let hit = |slot: &Option<Control>| slot.as_ref().is_some_and(|c| c.hit_test_parent_point(p));
        let reversed = self.direction.is_reversed();

        if hit(&self.thumb) {
            self.action = ScrollAction::ThumbTrack;
            let r = self.bar_size - self.thumb_size;
            let start = p.y - r * self.gravity(self.normalized());
            self.drag = Some((start, start + r));
            return;
        }

        self.action = if hit(&self.increment) {
            ScrollAction::LineIncrement
        } else if hit(&self.decrement) {
            ScrollAction::LineDecrement
        } else {
            let thumb_top = base.content_box().top + self.bar_offset + self.thumb_offset;
            let before_thumb = p.y < thumb_top;
            match (before_thumb, reversed) {
                (true, false) | (false, true) => ScrollAction::PageDecrement,
                _ => ScrollAction::PageIncrement,
            }
        };
        self.page_pointer = p.y;
        self.emit_repeat(base, 1);
        if self.action.is_repeating() {
            self.repeat_next = Some(cx.now + cx.input.timings.key_repeat_delay);
        }
    }

    fn release(&mut self) {
        self.action = ScrollAction::None;
        self.repeat_next = None;
        self.drag = None;
    }

    fn update_thumb_state(&mut self) {
        let tracking = self.action == ScrollAction::ThumbTrack;
        let Some(thumb) = self.thumb.as_mut() else {
            return;
        };
        let state = if tracking {
            VisualState::Active
        } else if thumb.base.is_hovered() {
            VisualState::Hovered
        } else {
            VisualState::Normal
        };
        if let Some(shape) = thumb.widget_mut::<ShapeWidget>() {
            shape.displayed = Some(state);
        }
    }
}

impl Widget for ScrollBarWidget {
    fn type_name(&self) -> &'static str {
        "ScrollBar"
    }

    fn measure_content(&mut self, _base: &ControlBase, offered: Size, cx: &PassContext) -> BoxRect {
        self.dirty = false;
        let width = if offered.width.is_finite() { offered.width } else { THICKNESS };
        let length = if offered.height.is_finite() { offered.height } else { LENGTH };

        let buttons = measure_button(&mut self.decrement, width, cx)
            + measure_button(&mut self.increment, width, cx);
        self.bar_size = (length - buttons).max(0.0);

        if self.effective_range() > 0.0 {
            let bar = self.bar_size;
            let thumb = (bar * self.page_size.clamp(0.0, 1.0)).max(MIN_THUMB_SIZE.min(bar / 2.0));
            self.thumb_size = thumb.min(bar);
            self.thumb_offset = self.gravity(self.normalized()) * (bar - self.thumb_size);
        } else {
            self.thumb_size = 0.0;
            self.thumb_offset = 0.0;
        }
        if let Some(thumb) = self.thumb.as_mut() {
            thumb.measure(Size::new(width, self.thumb_size), cx);
        }
        BoxRect::new(0.0, 0.0, width, length)
    }

    fn needs_measure(&self) -> bool {
        self.dirty
    }

    fn place_children(&mut self, base: &ControlBase, cx: &PassContext) {
        let content = base.content_box();
        let full = base.full_transform();
        let height = |slot: &Option<Control>| {
            slot.as_ref()
                .filter(|c| c.base.is_visible())
                .map_or(0.0, |c| c.base.boundary().height())
        };
        let (top, bottom) = if self.direction.is_reversed() {
            (&mut self.increment, &mut self.decrement)
        } else {
            (&mut self.decrement, &mut self.increment)
        };
        let top_height = height(top);
        let bottom_height = height(bottom);
        if let Some(c) = top {
            c.place(Matrix::translation(content.left_top()), &full, cx);
        }
        if let Some(c) = bottom {
            let at = Vec2::new(content.left, content.bottom - bottom_height);
            c.place(Matrix::translation(at), &full, cx);
        }
        self.bar_offset = top_height;
        if let Some(thumb) = self.thumb.as_mut() {
            let at = Vec2::new(content.left, content.top + self.bar_offset + self.thumb_offset);
            thumb.place(Matrix::translation(at), &full, cx);
        }
    }

    fn tick(&mut self, base: &mut ControlBase, cx: &PassContext) {
        base.wheel_intercept = if self.effective_range() > 0.0 {
            WheelIntercept::UP | WheelIntercept::DOWN
        } else {
            WheelIntercept::empty()
        };
        self.update_thumb_state();

        if !self.action.is_repeating() {
            return;
        }
        let Some(next) = self.repeat_next else {
            return;
        };
        if cx.now < next {
            return;
        }
        let interval = cx.timings.key_repeat_interval;
        let count = if interval.is_zero() {
            1
        } else {
            1 + (cx.now.saturating_duration_since(next).as_secs_f64() / interval.as_secs_f64())
                .floor() as u32
        };
        self.repeat_next = Some(next + interval * count);
        self.emit_repeat(base, count);
    }

    fn on_mouse(&mut self, base: &mut ControlBase, event: &mut MouseEvent, cx: &mut InteractionContext) {
        match event.kind {
            MouseEventKind::Down if event.button == MouseButtons::LEFT => {
                self.press(base, event.local, cx);
                event.handled = true;
            }
            MouseEventKind::Move => match self.action {
                ScrollAction::ThumbTrack => {
                    let target = self.drag.and_then(|span| self.pointer_to_value(event.local.y, span));
                    if let Some(target) = target
                        && target != self.value()
                    {
                        self.emit(ScrollAction::ThumbTrack, target - self.value(), 1.0);
                    }
                }
                ScrollAction::PageDecrement | ScrollAction::PageIncrement => {
                    self.page_pointer = event.local.y;
                }
                _ => {}
            },
            MouseEventKind::Up if event.button == MouseButtons::LEFT => self.release(),
            MouseEventKind::Wheel if !event.intercepted => {
                let mut repeats = -(event.wheel.x + event.wheel.y);
                if self.direction.is_reversed() {
                    repeats = -repeats;
                }
                if repeats == 0.0 || !repeats.is_finite() {
                    return;
                }
                if self.effective_range() <= 0.0 || self.line_size <= 0.0 {
                    return;
                }
                let action = if repeats > 0.0 {
                    ScrollAction::LineIncrement
                } else {
                    ScrollAction::LineDecrement
                };
                self.emit(action, self.step_for(action), repeats.abs());
                event.handled = true;
            }
            _ => {}
        }
    }

    fn draw_content(&mut self, _base: &ControlBase, list: &mut DrawList, cx: &mut DrawContext) {
        for child in [&mut self.decrement, &mut self.increment, &mut self.thumb]
            .into_iter()
            .flatten()
        {
            child.draw(list, cx);
        }
    }

    fn children(&self) -> SmallVec<[&Control; 4]> {
        [&self.decrement, &self.increment, &self.thumb]
            .into_iter()
            .flatten()
            .collect()
    }

    fn children_mut(&mut self) -> SmallVec<[&mut Control; 4]> {
        [&mut self.decrement, &mut self.increment, &mut self.thumb]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn measure_button(slot: &mut Option<Control>, width: f32, cx: &PassContext) -> f32 {
    match slot {
        Some(c) if c.base.is_visible() => c.measure(Size::new(width, width), cx).height(),
        _ => 0.0,
    }
}

/// Child slots route presses to the bar, which owns capture and focus.
fn slot_child(mut child: Control) -> Control {
    child.base.capture_on_press = false;
    child.base.focusable = false;
    child
}

fn arrow(direction: TriangleDirection) -> Control {
    let mut c = slot_child(Shape(
        ShapeKind::Triangle { direction },
        Color::from_hex("#9A9A9A"),
    ));
    c.base.init_padding(Insets::uniform(4.0));
    c
}

fn thumb() -> Control {
    let mut c = slot_child(Shape(ShapeKind::Rect, Color::from_hex("#6A6A6A")));
    if let Some(shape) = c.widget_mut::<ShapeWidget>() {
        shape.colors = StateColors {
            normal: Color::from_hex("#6A6A6A"),
            hovered: Some(Color::from_hex("#8A8A8A")),
            active: Some(Color::from_hex("#B0B0B0")),
            disabled: Some(Color::from_hex("#3A3A3A")),
        };
    }
    c
}

/// Scroll bar in `direction`. Only vertical directions are supported;
/// horizontal ones fail with [`ControlError::NotImplemented`].
pub fn ScrollBar(direction: LinearDirection) -> Result<Control> {
    let mut control = Control::new(ScrollBarWidget::new(direction)?);
    control.base.init_size(DimensionSize::new(
        Dimension::Fixed(THICKNESS),
        Dimension::WrapContent,
    ));
    control.base.backgrounds.set(
        VisualState::Normal,
        Some(Shape(ShapeKind::Rect, Color::from_hex("#202020"))),
    );
    Ok(control)
}
