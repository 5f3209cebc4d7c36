use smallvec::{SmallVec, smallvec};
use trellis_core::*;

use crate::control::{Control, ControlBase, VisualState, Widget};
use crate::draw::DrawContext;
use crate::events::{MouseEvent, MouseEventKind};
use crate::interaction::InteractionContext;
use crate::runtime::PassContext;
use crate::widgets::label::Label;
use crate::widgets::shape::{Shape, ShapeKind};

pub struct ButtonWidget {
    content: Control,
    alignment: Vec2,
    on_click: Box<dyn FnMut()>,
}

impl ButtonWidget {
    pub fn content(&self) -> &Control {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Control {
        &mut self.content
    }

    pub fn set_content(&mut self, content: Control) {
        self.content = content;
    }

    pub fn alignment(&self) -> Vec2 {
        self.alignment
    }

    /// Where the content sits in the free space: `(0, 0)` left-top,
    /// `(1, 1)` right-bottom.
    pub fn set_alignment(&mut self, alignment: Vec2) -> Result<()> {
        self.alignment = Vec2::new(
            error::check_unit("alignment.x", alignment.x)?,
            error::check_unit("alignment.y", alignment.y)?,
        );
        Ok(())
    }
}

impl Widget for ButtonWidget {
    fn type_name(&self) -> &'static str {
        "Button"
    }

    fn measure_content(&mut self, _base: &ControlBase, offered: Size, cx: &PassContext) -> BoxRect {
        let inner = self.content.measure(offered, cx);
        let axis = |o: f32, c: f32| if o.is_finite() { o.max(c) } else { c };
        BoxRect::new(
            0.0,
            0.0,
            axis(offered.width, inner.width()),
            axis(offered.height, inner.height()),
        )
    }

    fn place_children(&mut self, base: &ControlBase, cx: &PassContext) {
        let content = base.content_box();
        let child = self.content.base.boundary();
        let free = Vec2::new(
            (content.width() - child.width()).max(0.0),
            (content.height() - child.height()).max(0.0),
        );
        let at = content.left_top() + free.mul_elem(self.alignment) - child.left_top();
        self.content
            .place(Matrix::translation(at), &base.full_transform(), cx);
    }

    fn on_mouse(&mut self, _base: &mut ControlBase, event: &mut MouseEvent, _cx: &mut InteractionContext) {
        if event.kind == MouseEventKind::Click
            && (event.button == MouseButtons::LEFT || event.from_keyboard)
        {
            (self.on_click)();
            event.handled = true;
        }
    }

    fn draw_content(&mut self, _base: &ControlBase, list: &mut DrawList, cx: &mut DrawContext) {
        self.content.draw(list, cx);
    }

    fn children(&self) -> SmallVec<[&Control; 4]> {
        smallvec![&self.content]
    }

    fn children_mut(&mut self) -> SmallVec<[&mut Control; 4]> {
        smallvec![&mut self.content]
    }
}

/// Focusable push button with a centred text label.
pub fn Button(text: impl Into<String>, on_click: impl FnMut() + 'static) -> Control {
    let mut label = Label(text);
    label.base.capture_on_press = false;
    let mut control = Control::new(ButtonWidget {
        content: label,
        alignment: Vec2::new(0.5, 0.5),
        on_click: Box::new(on_click),
    });
    control.base.focusable = true;
    control.base.init_padding(Insets::symmetric(8.0, 4.0));
    let bg = |hex: &str| Some(Shape(ShapeKind::Rect, Color::from_hex(hex)));
    let backgrounds = &mut control.base.backgrounds;
    backgrounds.set(VisualState::Normal, bg("#3A3A3A"));
    backgrounds.set(VisualState::Hovered, bg("#4A4A4A"));
    backgrounds.set(VisualState::Active, bg("#2A6AD0"));
    backgrounds.set(VisualState::Disabled, bg("#2A2A2A"));
    control
}
