#[cfg(test)]
mod tests {
    use trellis_core::*;
    use trellis_ui::*;
    use web_time::{Duration, Instant};

    use crate::{Hud, Inspector, dump, screen_bounds};

    #[test]
    fn test_fps_smoothing() {
        let mut hud = Hud::new();
        let t0 = Instant::now();
        hud.record(t0, FrameStats::default());
        assert_eq!(hud.fps(), 0.0);

        hud.record(t0 + Duration::from_millis(10), FrameStats::default());
        assert!((hud.fps() - 100.0).abs() < 0.1);

        hud.record(t0 + Duration::from_millis(30), FrameStats::default());
        assert!((hud.fps() - 90.0).abs() < 0.1);
        assert_eq!(hud.frame_count(), 3);
        assert!(hud.text().starts_with("frame: 3"));
    }

    #[test]
    fn test_dump_lists_tree_with_depth() {
        let mut label = Label("hi");
        label.base.name = "greeting".into();
        let mut root = Container(vec![label]);
        root.measure(
            Size::new(100.0, 50.0),
            &PassContext {
                now: Instant::now(),
                timings: PlatformTimings::default(),
            },
        );
        let text = dump(&root);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Container #"));
        assert!(lines[0].contains("[0.0, 0.0, 16.0, 20.0]"));
        assert!(lines[1].starts_with("  Label \"greeting\""));
    }

    #[test]
    fn test_inspector_outlines_hovered_control() {
        let mut root = Label("hover me");
        root.base.set_margin(Insets::uniform(2.0)).unwrap();
        let clock = ManualClock::default();
        let mut ui = Ui::new(root, UiConfig::default(), clock.clone());
        let mut backend = HeadlessBackend::new();
        let mut inspector = Inspector::new();

        let mut out = ui.frame(Size::new(200.0, 100.0), &InputSnapshot::at(5.0, 5.0), &mut backend);
        inspector.frame(&ui, &mut out, clock.now());
        let plain = out.draw_list.len();

        inspector.hud.toggle_inspector();
        clock.advance(Duration::from_millis(16));
        let mut out = ui.frame(Size::new(200.0, 100.0), &InputSnapshot::at(5.0, 5.0), &mut backend);
        inspector.frame(&ui, &mut out, clock.now());
        assert_eq!(out.draw_list.len(), plain + 2);

        let expected = screen_bounds(ui.root());
        assert_eq!(expected, BoxRect::new(0.0, 0.0, 68.0, 24.0));
        let outlined = out.draw_list.commands.iter().any(|c| {
            matches!(c, DrawCommand::Quad { stroke: Some(w), color, .. }
                if *w == 2.0 && *color == Color::from_hex("#44AAFF"))
        });
        assert!(outlined);
    }
}
