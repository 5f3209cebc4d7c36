//! # Trellis controls
//!
//! A retained tree of [`Control`]s driven once per frame by [`Ui::frame`]:
//!
//! 1. **measure** resolves the declared sizing keywords into four nested
//!    boxes (`outside ⊇ boundary ⊇ interactive ⊇ content`);
//! 2. **place** composes each control's transform from its parent placement,
//!    scale, user transform and animators;
//! 3. **tick** runs widget timers such as scroll-bar repeat;
//! 4. **interaction** resolves hover, press, capture, click, wheel and
//!    keyboard input, children first;
//! 5. **draw** emits backgrounds and content into the backend's draw lists,
//!    going through an offscreen target where children are clipped.
//!
//! Work requested during a pass (a visual state swap, an animator still
//! running) is picked up by the next frame, never re-entrantly.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use trellis_core::*;
//! use trellis_ui::*;
//!
//! let clicks = Rc::new(Cell::new(0));
//! let counter = clicks.clone();
//! let button = Button("OK", move || counter.set(counter.get() + 1));
//!
//! let mut ui = Ui::new(button, UiConfig::default(), ManualClock::default());
//! let mut backend = HeadlessBackend::new();
//! let viewport = Size::new(200.0, 100.0);
//!
//! ui.frame(viewport, &InputSnapshot::default(), &mut backend);
//! let press = InputSnapshot::at(10.0, 10.0).with_buttons(MouseButtons::LEFT);
//! ui.frame(viewport, &press, &mut backend);
//! ui.frame(viewport, &InputSnapshot::at(10.0, 10.0), &mut backend);
//! assert_eq!(clicks.get(), 1);
//! ```

pub mod control;
pub mod draw;
pub mod events;
pub mod interaction;
mod measure;
mod place;
pub mod runtime;
pub mod tests;
pub mod widgets;

pub use control::*;
pub use draw::{DrawContext, UNIT_UV};
pub use events::*;
pub use interaction::{InteractionContext, InteractionMemory};
pub use runtime::*;
pub use widgets::*;
