use bitflags::bitflags;
use web_time::Duration;

use crate::Vec2;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        const LEFT = 1;
        const RIGHT = 2;
        const MIDDLE = 4;
    }
}

impl MouseButtons {
    /// Individual buttons, in dispatch order.
    pub const EACH: [MouseButtons; 3] = [Self::LEFT, Self::RIGHT, Self::MIDDLE];

    pub fn index(self) -> usize {
        if self.contains(Self::LEFT) {
            0
        } else if self.contains(Self::RIGHT) {
            1
        } else {
            2
        }
    }
}

bitflags! {
    /// Wheel directions a control absorbs while hovered.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WheelIntercept: u8 {
        const UP = 1;
        const DOWN = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

impl WheelIntercept {
    /// Directions present in a wheel delta. Positive `y` scrolls up.
    pub fn from_delta(delta: Vec2) -> WheelIntercept {
        let mut dirs = WheelIntercept::empty();
        if delta.y > 0.0 {
            dirs |= WheelIntercept::UP;
        } else if delta.y < 0.0 {
            dirs |= WheelIntercept::DOWN;
        }
        if delta.x > 0.0 {
            dirs |= WheelIntercept::RIGHT;
        } else if delta.x < 0.0 {
            dirs |= WheelIntercept::LEFT;
        }
        dirs
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Down,
            modifiers: Modifiers::default(),
            is_repeat: false,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            state: KeyState::Up,
            ..Self::down(key)
        }
    }
}

/// Platform-provided input timings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformTimings {
    pub double_click: Duration,
    pub key_repeat_delay: Duration,
    pub key_repeat_interval: Duration,
}

impl Default for PlatformTimings {
    fn default() -> Self {
        Self {
            double_click: Duration::from_millis(500),
            key_repeat_delay: Duration::from_millis(500),
            key_repeat_interval: Duration::from_millis(33),
        }
    }
}

/// Input state as seen at the start of one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// `None` while the pointer is outside the surface.
    pub pointer: Option<Vec2>,
    pub buttons: MouseButtons,
    pub wheel: Vec2,
    pub keys: Vec<KeyEvent>,
    pub text: Vec<char>,
    pub timings: PlatformTimings,
}

impl InputSnapshot {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pointer: Some(Vec2::new(x, y)),
            ..Self::default()
        }
    }

    pub fn with_buttons(mut self, buttons: MouseButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_wheel(mut self, dx: f32, dy: f32) -> Self {
        self.wheel = Vec2::new(dx, dy);
        self
    }

    pub fn with_key(mut self, key: KeyEvent) -> Self {
        self.keys.push(key);
        self
    }

    pub fn with_text(mut self, c: char) -> Self {
        self.text.push(c);
        self
    }

    pub fn with_timings(mut self, timings: PlatformTimings) -> Self {
        self.timings = timings;
        self
    }
}

/// Host side of input: produces one snapshot per frame.
pub trait InputSource {
    fn snapshot(&mut self) -> InputSnapshot;
}
