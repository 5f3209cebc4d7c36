//! Frame driver.
//!
//! One call to [`Ui::frame`] runs, in order: measure, place, tick,
//! interaction, draw and present. Every pass reads the same frame instant
//! from the injected [`Clock`], so animations are deterministic under a
//! [`ManualClock`].

use trellis_core::*;
use web_time::Instant;

use crate::control::{Control, ControlId};
use crate::draw::DrawContext;
use crate::interaction::{InteractionContext, InteractionMemory};

#[derive(Clone, Debug, PartialEq)]
pub struct UiConfig {
    /// Outline every boundary box and the focused control.
    pub debug_draw: bool,
    /// Tint alpha applied to the content of disabled controls.
    pub disabled_opacity: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debug_draw: false,
            disabled_opacity: 0.5,
        }
    }
}

impl UiConfig {
    /// Reads `TRELLIS_DEBUG_DRAW` (`1`/`true`) on top of the defaults.
    pub fn from_env() -> Self {
        let debug_draw = std::env::var("TRELLIS_DEBUG_DRAW")
            .map(|v| matches!(v.as_str(), "1" | "true"))
            .unwrap_or(false);
        Self {
            debug_draw,
            ..Self::default()
        }
    }
}

/// Per-pass frame information handed to widget hooks.
#[derive(Clone, Copy, Debug)]
pub struct PassContext {
    pub now: Instant,
    pub timings: PlatformTimings,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    /// Whether the measure pass did work this frame.
    pub measured: bool,
    /// Whether any animator in the tree is still running.
    pub animating: bool,
    pub controls: usize,
    pub draw_commands: usize,
    pub textures: usize,
}

#[derive(Debug)]
pub struct FrameOutput {
    pub draw_list: DrawList,
    pub stats: FrameStats,
}

pub struct Ui {
    root: Control,
    config: UiConfig,
    clock: Box<dyn Clock>,
    memory: InteractionMemory,
    frame: u64,
}

impl Ui {
    pub fn new(root: Control, config: UiConfig, clock: impl Clock) -> Self {
        Self {
            root,
            config,
            clock: Box::new(clock),
            memory: InteractionMemory::default(),
            frame: 0,
        }
    }

    pub fn root(&self) -> &Control {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Control {
        &mut self.root
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut UiConfig {
        &mut self.config
    }

    pub fn find(&self, id: ControlId) -> Option<&Control> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.root.find_mut(id)
    }

    pub fn focused(&self) -> Option<ControlId> {
        self.memory.focus
    }

    /// Topmost control under the pointer after the last frame.
    pub fn hovered(&self) -> Option<ControlId> {
        self.memory.hovered
    }

    pub fn capturing(&self, button: MouseButtons) -> Option<ControlId> {
        self.memory.captures[button.index()]
    }

    /// Moves keyboard focus. Ids that are missing or not focusable clear it.
    pub fn focus(&mut self, id: Option<ControlId>) {
        let target = id.filter(|id| {
            self.root
                .find(*id)
                .is_some_and(|c| c.base.focusable && c.base.is_enabled())
        });
        self.memory.focus = target;
        self.root.sync_focus(target);
    }

    /// Skips move animations for the whole tree on the next frame.
    pub fn suppress_next_animation(&mut self) {
        self.root.suppress_next_animation();
    }

    /// Runs one frame for a surface of `viewport` size.
    pub fn frame(
        &mut self,
        viewport: Size,
        input: &InputSnapshot,
        backend: &mut dyn RenderBackend,
    ) -> FrameOutput {
        self.frame += 1;
        let now = self.clock.now();
        let pass = PassContext {
            now,
            timings: input.timings,
        };

        let measured = self.root.needs_measure() || self.root.base.last_offered != Some(viewport);
        self.root.measure(viewport, &pass);
        self.root.place(Matrix::IDENTITY, &Matrix::IDENTITY, &pass);
        self.root.tick(&pass);

        let mut icx = InteractionContext::new(now, input, &self.memory);
        self.root.handle_interaction(&mut icx);
        let mut memory = icx.finish();
        if let Some(focus) = memory.focus
            && self.root.find(focus).is_none()
        {
            log::debug!("focused control {focus:?} left the tree");
            memory.focus = None;
        }
        self.root.sync_focus(memory.focus);
        self.memory = memory;

        let mut draw_list = backend.rent_draw_list();
        let rented = {
            let mut dcx = DrawContext::new(backend, &self.config);
            self.root.draw(&mut draw_list, &mut dcx);
            dcx.into_rented()
        };
        backend.present(&draw_list);
        let textures = rented.len();
        for texture in rented {
            backend.return_texture(texture);
        }

        let mut controls = 0;
        let mut animating = false;
        self.root.visit(&mut |c, _| {
            controls += 1;
            animating |= c.base.animators.any_running();
        });

        let stats = FrameStats {
            frame: self.frame,
            measured,
            animating,
            controls,
            draw_commands: draw_list.len(),
            textures,
        };
        log::trace!("frame {stats:?}");
        FrameOutput { draw_list, stats }
    }

    /// Pulls one snapshot from `source` and runs a frame with it.
    pub fn pump(
        &mut self,
        viewport: Size,
        source: &mut dyn InputSource,
        backend: &mut dyn RenderBackend,
    ) -> FrameOutput {
        let input = source.snapshot();
        self.frame(viewport, &input, backend)
    }
}
