use trellis_core::*;

use crate::control::Control;
use crate::runtime::UiConfig;

/// Texture coordinates matching [`BoxRect::corners`] order.
pub const UNIT_UV: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

pub struct DrawContext<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub config: &'a UiConfig,
    rented: Vec<TextureId>,
}

impl<'a> DrawContext<'a> {
    pub fn new(backend: &'a mut dyn RenderBackend, config: &'a UiConfig) -> Self {
        Self {
            backend,
            config,
            rented: Vec::new(),
        }
    }

    /// Offscreen targets referenced by this frame's commands. They must stay
    /// alive until the frame is presented.
    pub fn into_rented(self) -> Vec<TextureId> {
        self.rented
    }
}

impl Control {
    /// Draws this subtree into `target`, which is in the parent's space.
    ///
    /// Background first, then content (children included) tinted when
    /// disabled. With `clip_children` the result goes through an offscreen
    /// target clipped to the interactive box.
    pub fn draw(&mut self, target: &mut DrawList, cx: &mut DrawContext) {
        let hiding = self.base.animators.visibility_running().is_some();
        if !self.base.is_visible() && !hiding {
            return;
        }
        let (base, widget) = self.parts_mut();
        let state = base.visual_state;

        let mut list = cx.backend.rent_draw_list();
        let fading = base.backgrounds.outgoing().opacity;
        if let Some(bg) = base.backgrounds.outgoing_mut(state) {
            draw_faded(bg, fading, &mut list, cx);
        }
        let opacity = base.backgrounds.incoming().opacity;
        if let Some(bg) = base.backgrounds.for_state_mut(state) {
            draw_faded(bg, opacity, &mut list, cx);
        }

        let mut content = cx.backend.rent_draw_list();
        widget.draw_content(base, &mut content, cx);
        let content_tint = if base.is_enabled() {
            Color::WHITE
        } else {
            Color::opacity_tint(cx.config.disabled_opacity)
        };
        content.copy_to(&mut list, &Matrix::IDENTITY, content_tint);
        cx.backend.return_draw_list(content);

        if cx.config.debug_draw {
            list.add_rect_outline(base.boundary(), Color::from_hex("#FFFFFF20"), 1.0);
            if base.is_focused() {
                list.add_rect_outline(base.interactive_box(), Color::from_hex("#33BB3360"), 2.0);
            }
        }

        let opacity = base
            .animators
            .visibility_running()
            .map_or(1.0, |a| a.current().opacity);
        let tint = Color::opacity_tint(opacity);

        if base.clip_children {
            let clip = base.interactive_box();
            if let Some(texture) = cx.backend.rent_texture(&list, clip) {
                let points = base.local_transform.transform_corners(&clip);
                target.add_image_quad(texture, points, UNIT_UV, tint);
                cx.rented.push(texture);
            }
        } else {
            list.copy_to(target, &base.local_transform, tint);
        }
        cx.backend.return_draw_list(list);
    }
}

fn draw_faded(control: &mut Control, opacity: f32, target: &mut DrawList, cx: &mut DrawContext) {
    if opacity >= 1.0 {
        control.draw(target, cx);
        return;
    }
    let mut list = cx.backend.rent_draw_list();
    control.draw(&mut list, cx);
    list.copy_to(target, &Matrix::IDENTITY, Color::opacity_tint(opacity));
    cx.backend.return_draw_list(list);
}
