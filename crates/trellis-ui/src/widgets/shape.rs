use trellis_core::*;

use crate::control::{Control, ControlBase, DimensionSize, VisualState, Widget};
use crate::draw::DrawContext;
use crate::runtime::PassContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriangleDirection {
    Up,
    Down,
    Left,
    Right,
}

bitflags::bitflags! {
    /// Edges a [`ShapeKind::Border`] draws.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BorderEdges: u8 {
        const LEFT = 1 << 0;
        const TOP = 1 << 1;
        const RIGHT = 1 << 2;
        const BOTTOM = 1 << 3;
        const ALL = Self::LEFT.bits() | Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeKind {
    Rect,
    RectOutline { thickness: f32 },
    /// Strips of `thickness` along the chosen edges, inside the content box.
    Border { thickness: f32, edges: BorderEdges },
    Triangle { direction: TriangleDirection },
}

/// Fill colour per displayed state; unset states use `normal`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateColors {
    pub normal: Color,
    pub hovered: Option<Color>,
    pub active: Option<Color>,
    pub disabled: Option<Color>,
}

impl StateColors {
    pub fn new(normal: Color) -> Self {
        Self {
            normal,
            ..Self::default()
        }
    }

    pub fn for_state(&self, state: VisualState) -> Color {
        match state {
            VisualState::Normal => None,
            VisualState::Hovered => self.hovered,
            VisualState::Active => self.active,
            VisualState::Disabled => self.disabled,
        }
        .unwrap_or(self.normal)
    }
}

pub struct ShapeWidget {
    pub kind: ShapeKind,
    pub colors: StateColors,
    /// Size used when an axis is left to wrap.
    pub intrinsic: Size,
    /// State chosen by the owner; falls back to the control's own state.
    pub displayed: Option<VisualState>,
}

impl ShapeWidget {
    fn color(&self, base: &ControlBase) -> Color {
        let state = self.displayed.unwrap_or(base.visual_state());
        let state = if base.is_enabled() {
            state
        } else {
            VisualState::Disabled
        };
        self.colors.for_state(state)
    }
}

impl Widget for ShapeWidget {
    fn type_name(&self) -> &'static str {
        "Shape"
    }

    fn measure_content(&mut self, _base: &ControlBase, offered: Size, _cx: &PassContext) -> BoxRect {
        let axis = |v: f32, intrinsic: f32| if v.is_finite() { v } else { intrinsic };
        BoxRect::new(
            0.0,
            0.0,
            axis(offered.width, self.intrinsic.width),
            axis(offered.height, self.intrinsic.height),
        )
    }

    fn draw_content(&mut self, base: &ControlBase, list: &mut DrawList, _cx: &mut DrawContext) {
        let rect = base.content_box();
        let color = self.color(base);
        match self.kind {
            ShapeKind::Rect => list.add_rect(rect, color),
            ShapeKind::RectOutline { thickness } => list.add_rect_outline(rect, color, thickness),
            ShapeKind::Border { thickness, edges } => {
                if rect.is_empty() || !rect.width().is_finite() || !rect.height().is_finite() {
                    return;
                }
                let x = thickness.clamp(0.0, rect.width());
                let y = thickness.clamp(0.0, rect.height());
                let BoxRect { left, top, right, bottom } = rect;
                let strips = [
                    (BorderEdges::LEFT, BoxRect::new(left, top, left + x, bottom)),
                    (BorderEdges::TOP, BoxRect::new(left, top, right, top + y)),
                    (BorderEdges::RIGHT, BoxRect::new(right - x, top, right, bottom)),
                    (BorderEdges::BOTTOM, BoxRect::new(left, bottom - y, right, bottom)),
                ];
                for (edge, strip) in strips {
                    if edges.contains(edge) {
                        list.add_rect(strip, color);
                    }
                }
            }
            ShapeKind::Triangle { direction } => {
                if rect.is_empty() {
                    return;
                }
                let c = rect.center();
                let points = match direction {
                    TriangleDirection::Up => [
                        Vec2::new(c.x, rect.top),
                        Vec2::new(rect.right, rect.bottom),
                        Vec2::new(rect.left, rect.bottom),
                    ],
                    TriangleDirection::Down => [
                        Vec2::new(rect.left, rect.top),
                        Vec2::new(rect.right, rect.top),
                        Vec2::new(c.x, rect.bottom),
                    ],
                    TriangleDirection::Left => [
                        Vec2::new(rect.right, rect.top),
                        Vec2::new(rect.right, rect.bottom),
                        Vec2::new(rect.left, c.y),
                    ],
                    TriangleDirection::Right => [
                        Vec2::new(rect.left, rect.top),
                        Vec2::new(rect.right, c.y),
                        Vec2::new(rect.left, rect.bottom),
                    ],
                };
                list.add_triangle(points, color);
            }
        }
    }
}

/// A shape filling whatever its parent offers.
pub fn Shape(kind: ShapeKind, color: Color) -> Control {
    let mut control = Control::new(ShapeWidget {
        kind,
        colors: StateColors::new(color),
        intrinsic: Size::ZERO,
        displayed: None,
    });
    control.base.init_size(DimensionSize::MATCH_PARENT);
    control
}
