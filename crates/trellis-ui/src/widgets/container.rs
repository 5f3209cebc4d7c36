use smallvec::SmallVec;
use trellis_core::*;
use web_time::{Duration, Instant};

use crate::control::{Control, ControlBase, Widget};
use crate::draw::DrawContext;
use crate::events::{MouseEvent, MouseEventKind};
use crate::interaction::InteractionContext;
use crate::runtime::PassContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContainerLayout {
    /// Every child at the content origin.
    #[default]
    Overlay,
    /// Children stacked top to bottom.
    Column,
}

pub struct ContainerWidget {
    children: Vec<Control>,
    pub layout: ContainerLayout,
    /// Pixels scrolled per wheel unit.
    pub wheel_step: f32,
    /// Scroll on wheel input and derive the scroll range from overflow.
    pub default_scroll: bool,
    scroll: AnimatedValue<Vec2>,
    scroll_max: Vec2,
    /// Child offsets from the content origin, before scrolling.
    offsets: Vec<Vec2>,
    extent: Size,
    scroll_moved: bool,
    dirty: bool,
}

impl ContainerWidget {
    pub fn children_list(&self) -> &[Control] {
        &self.children
    }

    pub fn push(&mut self, child: Control) {
        self.children.push(child);
        self.dirty = true;
    }

    pub fn remove(&mut self, index: usize) -> Option<Control> {
        let removed = (index < self.children.len()).then(|| self.children.remove(index));
        self.dirty |= removed.is_some();
        removed
    }

    /// Current scroll offset.
    pub fn scroll(&self) -> Vec2 {
        *self.scroll.get()
    }

    /// Largest offset the current overflow allows.
    pub fn scroll_max(&self) -> Vec2 {
        self.scroll_max
    }

    /// Scroll range used while `default_scroll` is off.
    pub fn set_scroll_max(&mut self, max: Vec2) {
        let axis = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.scroll_max = Vec2::new(axis(max.x), axis(max.y));
    }

    /// Children's combined extent measured in the last pass.
    pub fn extent(&self) -> Size {
        self.extent
    }

    fn clamp_scroll(&self, v: Vec2) -> Vec2 {
        let axis = |v: f32, max: f32| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
        Vec2::new(axis(v.x, self.scroll_max.x), axis(v.y, self.scroll_max.y))
    }

    /// Jumps to `offset`, clamped to the scroll range.
    pub fn scroll_to(&mut self, offset: Vec2) {
        let offset = self.clamp_scroll(offset);
        if offset != self.scroll() {
            self.scroll.snap(offset);
            self.scroll_moved = true;
        }
    }

    /// Eases towards `offset`, clamped to the scroll range.
    pub fn smooth_scroll_to(&mut self, offset: Vec2, now: Instant) {
        let offset = self.clamp_scroll(offset);
        if offset != *self.scroll.target() {
            self.scroll.set_target(offset, now);
        }
    }

    /// Wheel directions that would still move the content. A positive
    /// delta scrolls back towards the origin.
    fn can_scroll(&self) -> WheelIntercept {
        let s = self.scroll();
        let mut dirs = WheelIntercept::empty();
        dirs.set(WheelIntercept::UP, s.y > 0.0);
        dirs.set(WheelIntercept::DOWN, s.y < self.scroll_max.y);
        dirs.set(WheelIntercept::RIGHT, s.x > 0.0);
        dirs.set(WheelIntercept::LEFT, s.x < self.scroll_max.x);
        dirs
    }
}

impl Widget for ContainerWidget {
    fn type_name(&self) -> &'static str {
        "Container"
    }

    fn measure_content(&mut self, _base: &ControlBase, offered: Size, cx: &PassContext) -> BoxRect {
        self.dirty = false;
        self.offsets.clear();
        let mut extent = BoxRect::ZERO;
        let mut cursor = 0.0;
        for child in &mut self.children {
            let child_offer = match self.layout {
                ContainerLayout::Overlay => offered,
                ContainerLayout::Column => Size::new(offered.width, f32::INFINITY),
            };
            let b = child.measure(child_offer, cx);
            let offset = match self.layout {
                ContainerLayout::Overlay => Vec2::ZERO,
                ContainerLayout::Column => Vec2::new(0.0, cursor),
            };
            if child.base.is_visible() {
                cursor += b.height();
                extent = extent.union(b.translate(offset));
            }
            self.offsets.push(offset);
        }
        let extent = extent.normalize();
        self.extent = Size::new(extent.right, extent.bottom);

        let axis = |o: f32, e: f32| if o.is_finite() { o } else { e };
        BoxRect::new(
            0.0,
            0.0,
            axis(offered.width, self.extent.width),
            axis(offered.height, self.extent.height),
        )
    }

    fn needs_measure(&self) -> bool {
        self.dirty
    }

    fn place_children(&mut self, base: &ControlBase, cx: &PassContext) {
        let content = base.content_box();
        if self.default_scroll {
            self.scroll_max = Vec2::new(
                (self.extent.width - content.width()).max(0.0),
                (self.extent.height - content.height()).max(0.0),
            );
        }
        let clamped = self.clamp_scroll(*self.scroll.target());
        if clamped != *self.scroll.target() {
            self.scroll.snap(clamped);
            self.scroll_moved = true;
        }
        if std::mem::take(&mut self.scroll_moved) {
            for child in &mut self.children {
                child.suppress_next_animation();
            }
        }

        let origin = content.left_top() - self.scroll();
        let full = base.full_transform();
        for (child, offset) in self.children.iter_mut().zip(self.offsets.iter()) {
            child.place(Matrix::translation(origin + *offset), &full, cx);
        }
    }

    fn tick(&mut self, base: &mut ControlBase, cx: &PassContext) {
        let before = self.scroll();
        self.scroll.update(cx.now);
        if self.scroll() != before {
            self.scroll_moved = true;
        }
        if self.default_scroll {
            base.wheel_intercept = self.can_scroll();
        }
    }

    fn on_mouse(&mut self, _base: &mut ControlBase, event: &mut MouseEvent, cx: &mut InteractionContext) {
        if event.kind != MouseEventKind::Wheel || event.intercepted || !self.default_scroll {
            return;
        }
        let target = *self.scroll.target() - event.wheel * self.wheel_step;
        let before = *self.scroll.target();
        self.smooth_scroll_to(target, cx.now);
        if *self.scroll.target() != before {
            event.handled = true;
        }
    }

    fn draw_content(&mut self, _base: &ControlBase, list: &mut DrawList, cx: &mut DrawContext) {
        for child in &mut self.children {
            child.draw(list, cx);
        }
    }

    fn children(&self) -> SmallVec<[&Control; 4]> {
        self.children.iter().collect()
    }

    fn children_mut(&mut self) -> SmallVec<[&mut Control; 4]> {
        self.children.iter_mut().collect()
    }
}

/// Clipping, scrollable group of children.
pub fn Container(children: Vec<Control>) -> Control {
    let mut control = Control::new(ContainerWidget {
        children,
        layout: ContainerLayout::Overlay,
        wheel_step: 40.0,
        default_scroll: true,
        scroll: AnimatedValue::new(
            Vec2::ZERO,
            AnimationSpec::tween(Duration::from_millis(120), Easing::EaseOut),
        ),
        scroll_max: Vec2::ZERO,
        offsets: Vec::new(),
        extent: Size::ZERO,
        scroll_moved: false,
        dirty: true,
    });
    control.base.clip_children = true;
    control
}
