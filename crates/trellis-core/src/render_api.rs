use slotmap::SlotMap;

use crate::{BoxRect, Color, Matrix, Size, Vec2};

slotmap::new_key_type! {
    /// Handle to an offscreen target rented from a [`RenderBackend`].
    pub struct TextureId;
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled when `stroke` is `None`, outlined with that thickness otherwise.
    Quad {
        points: [Vec2; 4],
        color: Color,
        stroke: Option<f32>,
    },
    Triangle {
        points: [Vec2; 3],
        color: Color,
    },
    Text {
        origin: Vec2,
        text: String,
        color: Color,
        size: f32,
    },
    Image {
        texture: TextureId,
        points: [Vec2; 4],
        uv: [Vec2; 4],
        tint: Color,
    },
}

impl DrawCommand {
    fn transformed(&self, m: &Matrix, tint: Color) -> DrawCommand {
        let tp = |p: &Vec2| m.transform_point(*p);
        match self {
            DrawCommand::Quad {
                points,
                color,
                stroke,
            } => DrawCommand::Quad {
                points: points.each_ref().map(tp),
                color: color.modulate(tint),
                stroke: *stroke,
            },
            DrawCommand::Triangle { points, color } => DrawCommand::Triangle {
                points: points.each_ref().map(tp),
                color: color.modulate(tint),
            },
            DrawCommand::Text {
                origin,
                text,
                color,
                size,
            } => DrawCommand::Text {
                origin: tp(origin),
                text: text.clone(),
                color: color.modulate(tint),
                size: size * m.mean_scale(),
            },
            DrawCommand::Image {
                texture,
                points,
                uv,
                tint: own,
            } => DrawCommand::Image {
                texture: *texture,
                points: points.each_ref().map(tp),
                uv: *uv,
                tint: own.modulate(tint),
            },
        }
    }

    fn points(&self) -> &[Vec2] {
        match self {
            DrawCommand::Quad { points, .. } | DrawCommand::Image { points, .. } => &points[..],
            DrawCommand::Triangle { points, .. } => &points[..],
            DrawCommand::Text { origin, .. } => std::slice::from_ref(origin),
        }
    }
}

/// Ordered batch of draw commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rect(&mut self, rect: BoxRect, color: Color) {
        if color.is_transparent() || rect.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Quad {
            points: rect.corners(),
            color,
            stroke: None,
        });
    }

    pub fn add_rect_outline(&mut self, rect: BoxRect, color: Color, thickness: f32) {
        if color.is_transparent() || thickness <= 0.0 {
            return;
        }
        self.commands.push(DrawCommand::Quad {
            points: rect.corners(),
            color,
            stroke: Some(thickness),
        });
    }

    pub fn add_triangle(&mut self, points: [Vec2; 3], color: Color) {
        if color.is_transparent() {
            return;
        }
        self.commands.push(DrawCommand::Triangle { points, color });
    }

    pub fn add_text(&mut self, origin: Vec2, text: impl Into<String>, color: Color, size: f32) {
        if color.is_transparent() {
            return;
        }
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.into(),
            color,
            size,
        });
    }

    pub fn add_image_quad(
        &mut self,
        texture: TextureId,
        points: [Vec2; 4],
        uv: [Vec2; 4],
        tint: Color,
    ) {
        if tint.is_transparent() {
            return;
        }
        self.commands.push(DrawCommand::Image {
            texture,
            points,
            uv,
            tint,
        });
    }

    /// Appends every command to `target`, mapped through `transform` and
    /// modulated by `tint`.
    pub fn copy_to(&self, target: &mut DrawList, transform: &Matrix, tint: Color) {
        if tint.is_transparent() {
            return;
        }
        target
            .commands
            .extend(self.commands.iter().map(|c| c.transformed(transform, tint)));
    }

    /// Union of every point referenced by the list.
    pub fn bounds(&self) -> BoxRect {
        self.commands
            .iter()
            .flat_map(|c| c.points().iter())
            .fold(BoxRect::INVERTED_EXTREMA, |acc, p| {
                acc.union(BoxRect::new(p.x, p.y, p.x, p.y))
            })
            .normalize()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Drawing surface the render pass composites into.
pub trait RenderBackend {
    fn rent_draw_list(&mut self) -> DrawList {
        DrawList::new()
    }

    fn return_draw_list(&mut self, list: DrawList) {
        drop(list);
    }

    /// Renders `source` (local coordinates) into an offscreen target covering
    /// `clip`. The target stays valid until returned.
    fn rent_texture(&mut self, source: &DrawList, clip: BoxRect) -> Option<TextureId>;

    fn return_texture(&mut self, texture: TextureId);

    fn present(&mut self, list: &DrawList);
}

/// Offscreen target recorded by [`HeadlessBackend`].
#[derive(Clone, Debug)]
pub struct OffscreenTarget {
    pub size: Size,
    pub clip: BoxRect,
    pub contents: DrawList,
}

/// Backend that records instead of rasterizing. Used by tests and headless
/// hosts.
#[derive(Default)]
pub struct HeadlessBackend {
    targets: SlotMap<TextureId, OffscreenTarget>,
    pool: Vec<DrawList>,
    presented: Option<DrawList>,
    pub frames: u64,
    pub textures_rented: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self, id: TextureId) -> Option<&OffscreenTarget> {
        self.targets.get(id)
    }

    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }

    pub fn presented(&self) -> Option<&DrawList> {
        self.presented.as_ref()
    }
}

impl RenderBackend for HeadlessBackend {
    fn rent_draw_list(&mut self) -> DrawList {
        self.pool.pop().unwrap_or_default()
    }

    fn return_draw_list(&mut self, mut list: DrawList) {
        list.clear();
        self.pool.push(list);
    }

    fn rent_texture(&mut self, source: &DrawList, clip: BoxRect) -> Option<TextureId> {
        let clip = clip.normalize();
        if clip.is_empty() {
            return None;
        }
        self.textures_rented += 1;
        let mut contents = DrawList::new();
        source.copy_to(
            &mut contents,
            &Matrix::translation(-clip.left_top()),
            Color::WHITE,
        );
        Some(self.targets.insert(OffscreenTarget {
            size: clip.size(),
            clip,
            contents,
        }))
    }

    fn return_texture(&mut self, texture: TextureId) {
        if self.targets.remove(texture).is_none() {
            log::warn!("returned unknown texture {texture:?}");
        }
    }

    fn present(&mut self, list: &DrawList) {
        self.frames += 1;
        self.presented = Some(list.clone());
    }
}
