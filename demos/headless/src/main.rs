use std::cell::Cell;
use std::rc::Rc;

use trellis_core::*;
use trellis_devtools::{Inspector, dump};
use trellis_ui::*;
use web_time::Duration;

/// Replays a fixed list of snapshots, then idles at the last pointer.
struct Script {
    frames: std::vec::IntoIter<InputSnapshot>,
    last: InputSnapshot,
}

impl Script {
    fn new(frames: Vec<InputSnapshot>) -> Self {
        Self {
            frames: frames.into_iter(),
            last: InputSnapshot::default(),
        }
    }
}

impl InputSource for Script {
    fn snapshot(&mut self) -> InputSnapshot {
        match self.frames.next() {
            Some(s) => {
                self.last = InputSnapshot {
                    pointer: s.pointer,
                    ..InputSnapshot::default()
                };
                s
            }
            None => self.last.clone(),
        }
    }
}

fn app(count: Rc<Cell<i32>>) -> anyhow::Result<(Control, ControlId, ControlId)> {
    let label = Label("Count: 0");
    let label_id = label.id();

    let mut bar = ScrollBar(LinearDirection::TopToBottom)?;
    let bar_id = bar.id();
    if let Some(w) = bar.widget_mut::<ScrollBarWidget>() {
        w.set_range(0.0, 10.0)?;
        w.set_page_size(0.25)?;
        w.set_line_size(0.1)?;
        w.on_scroll(|e| log::info!("scroll {:?}: {} -> {}", e.action, e.old_value, e.new_value));
    }

    let mut button = Button("Increment", move || count.set(count.get() + 1));
    let fade = AnimationSpec::tween(Duration::from_millis(120), Easing::Linear);
    button.base.backgrounds.show = Some(Backgrounds::fade_in(fade));
    button.base.backgrounds.hide = Some(Backgrounds::fade_out(fade));

    let mut root = Container(vec![button, label, bar]);
    root.base.name = "root".into();
    let frame = ShapeKind::Border {
        thickness: 1.0,
        edges: BorderEdges::ALL,
    };
    root.base
        .backgrounds
        .set(VisualState::Normal, Some(Shape(frame, Color::from_hex("#404040"))));
    if let Some(w) = root.widget_mut::<ContainerWidget>() {
        w.layout = ContainerLayout::Column;
    }
    Ok((root, label_id, bar_id))
}

fn script() -> Vec<InputSnapshot> {
    let mut frames = vec![InputSnapshot::at(10.0, 10.0)];
    for _ in 0..2 {
        frames.push(InputSnapshot::at(10.0, 10.0).with_buttons(MouseButtons::LEFT));
        frames.push(InputSnapshot::at(10.0, 10.0));
    }
    // Hold the increment arrow at the bottom of the bar.
    frames.push(InputSnapshot::at(8.0, 104.0));
    frames.extend(
        std::iter::repeat_n(InputSnapshot::at(8.0, 104.0).with_buttons(MouseButtons::LEFT), 60),
    );
    frames.push(InputSnapshot::at(8.0, 104.0));
    frames.push(InputSnapshot::at(8.0, 80.0).with_wheel(0.0, 2.0));
    frames
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let count = Rc::new(Cell::new(0));
    let (root, label_id, bar_id) = app(count.clone())?;
    let clock = ManualClock::default();
    let mut ui = Ui::new(root, UiConfig::from_env(), clock.clone());
    let mut backend = HeadlessBackend::new();
    let mut input = Script::new(script());
    let mut inspector = Inspector::new();
    inspector.hud.toggle_inspector();

    let viewport = Size::new(320.0, 240.0);
    let mut shown = 0;
    for _ in 0..90 {
        clock.advance(Duration::from_millis(16));
        let mut out = ui.pump(viewport, &mut input, &mut backend);
        inspector.frame(&ui, &mut out, clock.now());

        if count.get() != shown {
            shown = count.get();
            if let Some(w) = ui
                .find_mut(label_id)
                .and_then(|c| c.widget_mut::<LabelWidget>())
            {
                w.set_text(format!("Count: {shown}"));
            }
        }
    }

    let value = ui
        .find(bar_id)
        .and_then(|c| c.widget::<ScrollBarWidget>())
        .map(|w| w.value())
        .unwrap_or_default();
    println!("{}", dump(ui.root()));
    println!("{}", inspector.hud.text());
    println!("clicks: {shown}, scroll value: {value:.2}");
    println!(
        "frames presented: {}, textures rented: {}",
        backend.frames, backend.textures_rented
    );
    Ok(())
}
