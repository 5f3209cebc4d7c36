//! Hit-testing and input routing.
//!
//! Controls are visited children first, topmost (last drawn) child first, so
//! a parent always sees the finished results of its subtree. Visit order is
//! tracked with a sequence number: everything visited between the start of a
//! control's turn and the control itself is one of its descendants. That is
//! how hover exclusivity and capture are resolved without parent pointers:
//!
//! - hover goes to the first control that contains the pointer; after that,
//!   only that control's ancestors may also report hover;
//! - while a control holds capture of any button, no control outside its
//!   ancestor chain is hovered.

use smallvec::SmallVec;
use trellis_core::*;
use web_time::Instant;

use crate::control::{Control, ControlBase, ControlId, VisualState, Widget};
use crate::events::{FocusEvent, KeyEventArgs, KeyInput, MouseEvent, MouseEventKind};

/// Routing state that survives between frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionMemory {
    pub captures: [Option<ControlId>; 3],
    pub focus: Option<ControlId>,
    pub buttons: MouseButtons,
    pub pointer: Option<Vec2>,
    pub hovered: Option<ControlId>,
}

#[derive(Clone, Copy, Debug)]
struct KeySlot {
    input: KeyInput,
    handled: bool,
}

pub struct InteractionContext<'a> {
    pub now: Instant,
    pub input: &'a InputSnapshot,
    /// Buttons that went down this frame.
    pub pressed: MouseButtons,
    /// Buttons that went up this frame.
    pub released: MouseButtons,
    pub pointer_moved: bool,
    captures: [Option<ControlId>; 3],
    capture_seen: [Option<u64>; 3],
    focus: Option<ControlId>,
    focus_claimed: bool,
    hover: Option<(ControlId, u64)>,
    wheel_intercepted: WheelIntercept,
    wheel_handled: bool,
    down_handled: MouseButtons,
    up_handled: MouseButtons,
    click_handled: MouseButtons,
    keys: SmallVec<[KeySlot; 4]>,
    seq: u64,
}

impl<'a> InteractionContext<'a> {
    pub fn new(now: Instant, input: &'a InputSnapshot, memory: &InteractionMemory) -> Self {
        let keys = input
            .keys
            .iter()
            .map(|k| KeyInput::Key(*k))
            .chain(input.text.iter().map(|c| KeyInput::Char(*c)))
            .map(|input| KeySlot {
                input,
                handled: false,
            })
            .collect();
        Self {
            now,
            input,
            pressed: input.buttons - memory.buttons,
            released: memory.buttons - input.buttons,
            pointer_moved: input.pointer != memory.pointer,
            captures: memory.captures,
            capture_seen: [None; 3],
            focus: memory.focus,
            focus_claimed: false,
            hover: None,
            wheel_intercepted: WheelIntercept::empty(),
            wheel_handled: false,
            down_handled: MouseButtons::empty(),
            up_handled: MouseButtons::empty(),
            click_handled: MouseButtons::empty(),
            keys,
            seq: 0,
        }
    }

    pub fn capture_owner(&self, button: MouseButtons) -> Option<ControlId> {
        self.captures[button.index()]
    }

    pub fn focus(&self) -> Option<ControlId> {
        self.focus
    }

    /// Wheel directions absorbed so far this frame.
    pub fn wheel_intercepted(&self) -> WheelIntercept {
        self.wheel_intercepted
    }

    /// Whether a capture held outside the subtree that started at `start`
    /// (the control's own turn) blocks `me`.
    fn blocked_by_capture(&self, me: ControlId, start: u64) -> bool {
        self.captures
            .iter()
            .zip(self.capture_seen.iter())
            .any(|(owner, seen)| match owner {
                Some(owner) if *owner != me => !seen.is_some_and(|s| s >= start),
                _ => false,
            })
    }

    fn holds_capture(&self, me: ControlId) -> bool {
        self.captures.contains(&Some(me))
    }

    /// Settles end-of-frame bookkeeping and returns what the next frame needs.
    pub fn finish(mut self) -> InteractionMemory {
        for (owner, seen) in self.captures.iter_mut().zip(self.capture_seen) {
            if let Some(id) = *owner
                && seen.is_none()
            {
                log::debug!("revoking capture held by {id:?}, no longer in the tree");
                *owner = None;
            }
        }
        if !self.pressed.is_empty() && !self.focus_claimed && self.focus.is_some() {
            log::debug!("focus cleared by a press outside focusable controls");
            self.focus = None;
        }
        InteractionMemory {
            captures: self.captures,
            focus: self.focus,
            buttons: self.input.buttons,
            pointer: self.input.pointer,
            hovered: self.hover.map(|(id, _)| id),
        }
    }
}

/// Listeners first, then the widget's default handling unless handled.
fn dispatch(
    base: &mut ControlBase,
    widget: &mut dyn Widget,
    event: &mut MouseEvent,
    cx: &mut InteractionContext,
) {
    base.events.mouse.emit(event);
    if !event.handled {
        widget.on_mouse(base, event, cx);
    }
}

/// A `Move` event at the current pointer, plus the pointer in `base`'s
/// local space when it can be mapped there.
fn pointer_event(base: &ControlBase, cx: &InteractionContext) -> (MouseEvent, Option<Vec2>) {
    let screen = cx.input.pointer;
    let local = screen.and_then(|p| base.full_transform.invert().map(|m| m.transform_point(p)));
    let event = MouseEvent {
        kind: MouseEventKind::Move,
        control: base.id(),
        button: MouseButtons::empty(),
        local: local.unwrap_or_default(),
        screen: screen.unwrap_or_default(),
        wheel: Vec2::ZERO,
        clicks: 0,
        from_keyboard: false,
        intercepted: false,
        handled: false,
    };
    (event, local)
}

/// Drops hover, held buttons and captures of a control that can no longer
/// take input.
fn release(
    base: &mut ControlBase,
    widget: &mut dyn Widget,
    template: &MouseEvent,
    cx: &mut InteractionContext,
) {
    let me = base.id();
    if base.interaction.hovered {
        base.interaction.hovered = false;
        let mut leave = MouseEvent {
            kind: MouseEventKind::Leave,
            ..*template
        };
        dispatch(base, widget, &mut leave, cx);
    }
    base.interaction.held = MouseButtons::empty();
    for owner in cx.captures.iter_mut() {
        if *owner == Some(me) {
            log::debug!("{me:?} lost capture: hidden or disabled");
            *owner = None;
        }
    }
}

impl Control {
    /// Resolves hover, press, capture, click, wheel and keyboard input for
    /// this subtree and raises the resulting events.
    pub fn handle_interaction(&mut self, cx: &mut InteractionContext) {
        if !self.base.is_visible() {
            self.release_interaction(cx);
            return;
        }
        let start = cx.seq;
        for child in self.children_mut().into_iter().rev() {
            child.handle_interaction(cx);
        }
        let seq = cx.seq;
        cx.seq += 1;

        let (base, widget) = self.parts_mut();
        let me = base.id();
        for (owner, seen) in cx.captures.iter().zip(cx.capture_seen.iter_mut()) {
            if *owner == Some(me) {
                *seen = Some(seq);
            }
        }

        let (template, local) = pointer_event(base, cx);

        if !base.is_enabled() {
            release(base, widget, &template, cx);
            base.set_visual_state(VisualState::Disabled);
            return;
        }

        let in_box = local.is_some_and(|p| base.boxes.interactive.contains(p));
        let blocked = cx.blocked_by_capture(me, start);
        let hover_free = cx.hover.is_none_or(|(_, s)| s >= start);
        let hovered = in_box && !blocked && hover_free;
        if hovered && cx.hover.is_none() {
            cx.hover = Some((me, seq));
        }

        if hovered != base.interaction.hovered {
            base.interaction.hovered = hovered;
            let kind = if hovered {
                MouseEventKind::Enter
            } else {
                MouseEventKind::Leave
            };
            let mut ev = MouseEvent { kind, ..template };
            dispatch(base, widget, &mut ev, cx);
        }

        let wheel = cx.input.wheel;
        if hovered && (wheel.x != 0.0 || wheel.y != 0.0) {
            let dirs = WheelIntercept::from_delta(wheel);
            let mut ev = MouseEvent {
                kind: MouseEventKind::Wheel,
                wheel,
                intercepted: cx.wheel_intercepted.intersects(dirs),
                handled: cx.wheel_handled,
                ..template
            };
            dispatch(base, widget, &mut ev, cx);
            cx.wheel_handled |= ev.handled;
            cx.wheel_intercepted |= base.wheel_intercept & dirs;
        }

        if cx.pointer_moved && (hovered || !base.interaction.held.is_empty()) {
            let mut ev = template;
            dispatch(base, widget, &mut ev, cx);
        }
        base.interaction.last_pointer = local;

        for (i, button) in MouseButtons::EACH.into_iter().enumerate() {
            let captured_here = !base.interaction.held.is_empty() && cx.holds_capture(me);
            if cx.pressed.contains(button) && (hovered || captured_here) {
                base.interaction.held |= button;
                let mut ev = MouseEvent {
                    kind: MouseEventKind::Down,
                    button,
                    handled: cx.down_handled.contains(button),
                    ..template
                };
                dispatch(base, widget, &mut ev, cx);
                if ev.handled {
                    cx.down_handled |= button;
                }
                if base.focusable && !cx.focus_claimed {
                    cx.focus_claimed = true;
                    if cx.focus != Some(me) {
                        log::debug!("focus -> {me:?}");
                    }
                    cx.focus = Some(me);
                }
                if base.capture_on_press && cx.captures[i].is_none() {
                    log::debug!("{button:?} captured by {me:?}");
                    cx.captures[i] = Some(me);
                    cx.capture_seen[i] = Some(seq);
                }
            }

            let up = cx.released.contains(button) || !cx.input.buttons.contains(button);
            if up && base.interaction.held.contains(button) {
                base.interaction.held -= button;
                let mut ev = MouseEvent {
                    kind: MouseEventKind::Up,
                    button,
                    handled: cx.up_handled.contains(button),
                    ..template
                };
                dispatch(base, widget, &mut ev, cx);
                if ev.handled {
                    cx.up_handled |= button;
                }

                if in_box && !blocked {
                    let state = &mut base.interaction;
                    let repeat = state.last_click[i].is_some_and(|t| {
                        cx.now.saturating_duration_since(t) <= cx.input.timings.double_click
                    });
                    state.click_count[i] = if repeat { state.click_count[i] + 1 } else { 1 };
                    state.last_click[i] = Some(cx.now);
                    let mut ev = MouseEvent {
                        kind: MouseEventKind::Click,
                        button,
                        clicks: state.click_count[i],
                        handled: cx.click_handled.contains(button),
                        ..template
                    };
                    dispatch(base, widget, &mut ev, cx);
                    if ev.handled {
                        cx.click_handled |= button;
                    }
                } else {
                    base.interaction.click_count[i] = 0;
                    base.interaction.last_click[i] = None;
                }

                if cx.captures[i] == Some(me) {
                    log::debug!("{button:?} released by {me:?}");
                    cx.captures[i] = None;
                }
            }
        }

        if cx.focus == Some(me) && base.focusable {
            for i in 0..cx.keys.len() {
                let slot = cx.keys[i];
                let mut args = KeyEventArgs {
                    control: me,
                    input: slot.input,
                    handled: slot.handled,
                };
                base.events.key.emit(&mut args);
                if !args.handled {
                    widget.on_key(base, &mut args, cx);
                }
                let enter = matches!(
                    slot.input,
                    KeyInput::Key(KeyEvent {
                        key: Key::Enter,
                        state: KeyState::Down,
                        ..
                    })
                );
                if enter && !args.handled {
                    let mut click = MouseEvent {
                        kind: MouseEventKind::Click,
                        button: MouseButtons::LEFT,
                        clicks: 1,
                        from_keyboard: true,
                        ..template
                    };
                    dispatch(base, widget, &mut click, cx);
                    args.handled = true;
                }
                cx.keys[i].handled |= args.handled;
            }
        }

        let state = if hovered && base.interaction.held.contains(MouseButtons::LEFT) {
            VisualState::Active
        } else if hovered {
            VisualState::Hovered
        } else {
            VisualState::Normal
        };
        base.set_visual_state(state);
    }

    /// Releases input state across a hidden subtree. Hidden controls and
    /// their descendants are neither hovered nor hit.
    fn release_interaction(&mut self, cx: &mut InteractionContext) {
        for child in self.children_mut() {
            child.release_interaction(cx);
        }
        let (base, widget) = self.parts_mut();
        let (template, _) = pointer_event(base, cx);
        release(base, widget, &template, cx);
        base.set_visual_state(VisualState::Normal);
    }

    /// Brings every control's focus flag in line with `focus`, raising
    /// focus events on changes.
    pub fn sync_focus(&mut self, focus: Option<ControlId>) {
        for child in self.children_mut() {
            child.sync_focus(focus);
        }
        let base = &mut self.base;
        let focused = focus == Some(base.id());
        if focused != base.interaction.focused {
            base.interaction.focused = focused;
            let mut ev = FocusEvent {
                control: base.id(),
                focused,
            };
            base.events.focus.emit(&mut ev);
        }
    }
}
