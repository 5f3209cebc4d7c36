use trellis_core::*;

use crate::control::ControlId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    Enter,
    Leave,
    Move,
    Down,
    Up,
    Click,
    Wheel,
}

/// Mouse notification passed by `&mut` to listeners and then to the widget's
/// default handling.
///
/// `handled` arrives already set when a descendant handled the same input in
/// this frame; the widget's default handling only runs while it is unset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub control: ControlId,
    /// Empty for enter, leave, move and wheel.
    pub button: MouseButtons,
    /// Pointer in the control's own box space.
    pub local: Vec2,
    pub screen: Vec2,
    pub wheel: Vec2,
    pub clicks: u32,
    /// Click synthesized from Enter on a focused control.
    pub from_keyboard: bool,
    /// A descendant absorbed this wheel direction; do not scroll on it.
    pub intercepted: bool,
    pub handled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Key(KeyEvent),
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEventArgs {
    pub control: ControlId,
    pub input: KeyInput,
    pub handled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusEvent {
    pub control: ControlId,
    pub focused: bool,
}

#[derive(Debug, Default)]
pub struct ControlEvents {
    pub mouse: Listeners<MouseEvent>,
    pub key: Listeners<KeyEventArgs>,
    pub focus: Listeners<FocusEvent>,
}
