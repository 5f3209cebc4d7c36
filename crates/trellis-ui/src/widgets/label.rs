use trellis_core::*;

use crate::control::{Control, ControlBase, Widget};
use crate::draw::DrawContext;
use crate::runtime::PassContext;

/// Text measurement supplied by the host's text stack.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> Size;
}

/// Fixed-advance approximation: every glyph is half the font size wide and a
/// line is 1.25 font sizes tall.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonospaceMeasurer;

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let lines = text.lines().count().max(1);
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            widest as f32 * font_size * 0.5,
            lines as f32 * font_size * 1.25,
        )
    }
}

pub struct LabelWidget {
    text: String,
    font_size: f32,
    pub color: Color,
    measurer: Box<dyn TextMeasurer>,
    dirty: bool,
}

impl LabelWidget {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f32) -> Result<()> {
        let size = error::check_non_negative("font_size", size)?;
        if size != self.font_size {
            self.font_size = size;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn set_measurer(&mut self, measurer: impl TextMeasurer + 'static) {
        self.measurer = Box::new(measurer);
        self.dirty = true;
    }
}

impl Widget for LabelWidget {
    fn type_name(&self) -> &'static str {
        "Label"
    }

    fn measure_content(&mut self, _base: &ControlBase, _offered: Size, _cx: &PassContext) -> BoxRect {
        self.dirty = false;
        BoxRect::from_size(self.measurer.measure(&self.text, self.font_size))
    }

    fn needs_measure(&self) -> bool {
        self.dirty
    }

    fn draw_content(&mut self, base: &ControlBase, list: &mut DrawList, _cx: &mut DrawContext) {
        if self.text.is_empty() {
            return;
        }
        list.add_text(base.content_box().left_top(), self.text.as_str(), self.color, self.font_size);
    }
}

pub fn Label(text: impl Into<String>) -> Control {
    Control::new(LabelWidget {
        text: text.into(),
        font_size: 16.0,
        color: Color::WHITE,
        measurer: Box::new(MonospaceMeasurer),
        dirty: true,
    })
}
