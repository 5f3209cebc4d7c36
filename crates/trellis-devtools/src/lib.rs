//! Frame HUD and control-tree inspector.

use std::fmt::Write as _;

use web_time::Instant;

use trellis_core::{BoxRect, Color, DrawList, Vec2};
use trellis_ui::{Control, FrameOutput, FrameStats, Ui};

pub mod tests;

pub struct Hud {
    pub inspector_enabled: bool,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub metrics: Option<FrameStats>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            inspector_enabled: false,
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            metrics: None,
        }
    }

    pub fn toggle_inspector(&mut self) {
        self.inspector_enabled = !self.inspector_enabled;
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Counts a frame presented at `now`.
    pub fn record(&mut self, now: Instant, stats: FrameStats) {
        self.frame_count += 1;
        self.metrics = Some(stats);
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = now.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
    }

    pub fn text(&self) -> String {
        let mut lines = vec![
            format!("frame: {}", self.frame_count),
            format!("fps: {:.1}", self.fps_smooth),
        ];
        if let Some(m) = &self.metrics {
            lines.push(format!("controls: {}", m.controls));
            lines.push(format!("commands: {}", m.draw_commands));
            lines.push(format!("textures: {}", m.textures));
            if m.animating {
                lines.push("animating".to_string());
            }
        }
        lines.join("  |  ")
    }

    pub fn overlay(&self, list: &mut DrawList) {
        list.add_text(Vec2::new(8.0, 8.0), self.text(), Color::from_hex("#AAAAAA"), 14.0);
    }
}

/// Screen-space bounds of a control's boundary box.
pub fn screen_bounds(control: &Control) -> BoxRect {
    let base = &control.base;
    base.full_transform()
        .transform_corners(&base.boundary())
        .into_iter()
        .fold(BoxRect::INVERTED_EXTREMA, |acc, p| {
            acc.union(BoxRect::new(p.x, p.y, p.x, p.y))
        })
        .normalize()
}

/// One line per control: type, name, id, boundary and state.
pub fn dump(root: &Control) -> String {
    let mut out = String::new();
    root.visit(&mut |c, depth| {
        let b = c.base.boundary();
        let _ = write!(out, "{:indent$}{}", "", c.type_name(), indent = depth * 2);
        if !c.base.name.is_empty() {
            let _ = write!(out, " \"{}\"", c.base.name);
        }
        let _ = write!(
            out,
            " #{} [{:.1}, {:.1}, {:.1}, {:.1}] {:?}",
            c.id().0,
            b.left,
            b.top,
            b.right,
            b.bottom,
            c.base.visual_state()
        );
        if !c.base.is_visible() {
            out.push_str(" hidden");
        }
        if c.base.is_focused() {
            out.push_str(" focused");
        }
        out.push('\n');
    });
    out
}

pub struct Inspector {
    pub hud: Hud,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self { hud: Hud::new() }
    }

    /// Records the frame and, when enabled, draws the HUD and an outline
    /// around the hovered control on top of `output`.
    pub fn frame(&mut self, ui: &Ui, output: &mut FrameOutput, now: Instant) {
        self.hud.record(now, output.stats);
        if !self.hud.inspector_enabled {
            return;
        }
        self.hud.overlay(&mut output.draw_list);
        if let Some(hovered) = ui.hovered().and_then(|id| ui.find(id)) {
            output.draw_list.add_rect_outline(
                screen_bounds(hovered),
                Color::from_hex("#44AAFF"),
                2.0,
            );
            log::trace!("inspecting {} #{}", hovered.type_name(), hovered.id().0);
        }
    }
}
