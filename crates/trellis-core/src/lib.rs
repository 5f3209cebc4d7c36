//! # Trellis core
//!
//! Value types shared by every Trellis crate. Nothing in here knows about the
//! control tree; `trellis-ui` builds the measure, place, interaction and draw
//! passes on top of these pieces:
//!
//! - `geometry`: `Vec2`, `Size`, `Insets`, the edge-based `BoxRect` every
//!   measured box uses, and the affine `Matrix`.
//! - `animation`: easing, `Animator` (before/after state driven by a frame
//!   instant) and the injectable `Clock`.
//! - `input`: per-frame `InputSnapshot`, mouse button flags, key events and
//!   platform timings.
//! - `property` / `event`: compare-and-notify properties and ordered
//!   listener lists.
//! - `render_api`: the `DrawList` command batch and the `RenderBackend`
//!   contract, plus a recording `HeadlessBackend`.
//!
//! ```rust
//! use trellis_core::*;
//!
//! let content = BoxRect::from_size(Size::new(80.0, 20.0));
//! let boundary = content.expand(Insets::uniform(4.0));
//! assert_eq!(boundary.size(), Size::new(88.0, 28.0));
//! ```

pub mod animation;
pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod property;
pub mod render_api;
pub mod tests;

pub use animation::*;
pub use color::*;
pub use error::{ControlError, Result};
pub use event::*;
pub use geometry::*;
pub use input::*;
pub use property::*;
pub use render_api::*;
