#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use trellis_core::*;
    use web_time::{Duration, Instant};

    use crate::*;

    struct Block {
        size: Size,
        color: Color,
    }

    impl Widget for Block {
        fn type_name(&self) -> &'static str {
            "Block"
        }

        fn measure_content(&mut self, _base: &ControlBase, _offered: Size, _cx: &PassContext) -> BoxRect {
            BoxRect::from_size(self.size)
        }

        fn draw_content(&mut self, base: &ControlBase, list: &mut DrawList, _cx: &mut DrawContext) {
            list.add_rect(base.content_box(), self.color);
        }
    }

    fn block(w: f32, h: f32) -> Control {
        Control::new(Block {
            size: Size::new(w, h),
            color: Color::from_rgb(255, 0, 0),
        })
    }

    fn pass() -> PassContext {
        PassContext {
            now: Instant::now(),
            timings: PlatformTimings::default(),
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn at(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot::at(x, y)
    }

    fn pressed(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot::at(x, y).with_buttons(MouseButtons::LEFT)
    }

    struct Harness {
        ui: Ui,
        clock: ManualClock,
        backend: HeadlessBackend,
        viewport: Size,
    }

    impl Harness {
        fn new(root: Control) -> Self {
            let clock = ManualClock::default();
            Self {
                ui: Ui::new(root, UiConfig::default(), clock.clone()),
                clock,
                backend: HeadlessBackend::new(),
                viewport: Size::new(200.0, 200.0),
            }
        }

        fn frame(&mut self, input: InputSnapshot) -> FrameOutput {
            self.ui.frame(self.viewport, &input, &mut self.backend)
        }

        fn step(&mut self, ms: u64, input: InputSnapshot) -> FrameOutput {
            self.clock.advance(Duration::from_millis(ms));
            self.frame(input)
        }
    }

    fn record_mouse(control: &mut Control) -> Rc<RefCell<Vec<MouseEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        control.on_mouse(move |e| sink.borrow_mut().push(*e));
        log
    }

    fn kinds(log: &Rc<RefCell<Vec<MouseEvent>>>) -> Vec<MouseEventKind> {
        log.borrow().iter().map(|e| e.kind).collect()
    }

    fn quad_alphas(list: &DrawList) -> Vec<u8> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Quad { color, .. } => Some(color.3),
                _ => None,
            })
            .collect()
    }

    // Measurement

    #[test]
    fn test_wrap_and_fixed_with_margin() {
        let mut c = block(80.0, 20.0);
        c.base
            .set_size(DimensionSize::new(Dimension::WrapContent, Dimension::Fixed(40.0)))
            .unwrap();
        c.base.set_margin(Insets::uniform(4.0)).unwrap();

        let boundary = c.measure(Size::new(200.0, 200.0), &pass());
        assert_eq!(boundary, BoxRect::new(0.0, 0.0, 88.0, 28.0));
        assert_eq!(c.base.content_box(), BoxRect::new(4.0, 4.0, 84.0, 24.0));
        assert_eq!(c.base.interactive_box(), c.base.content_box());
        assert_eq!(c.base.outside_box(), boundary);
    }

    #[test]
    fn test_boxes_nested_for_every_sizing() {
        let dims = [Dimension::Fixed(50.0), Dimension::WrapContent, Dimension::MatchParent];
        let offers = [Size::new(100.0, 100.0), Size::UNBOUNDED, Size::ZERO];
        for w in dims {
            for h in dims {
                for offer in offers {
                    let mut c = block(80.0, 20.0);
                    c.base.set_size(DimensionSize::new(w, h)).unwrap();
                    c.base.set_margin(Insets::uniform(3.0)).unwrap();
                    c.base.set_padding(Insets::new(2.0, 1.0, 2.0, 1.0)).unwrap();
                    c.base.set_extend_outside(Insets::uniform(1.0)).unwrap();
                    c.measure(offer, &pass());
                    let boxes = c.base.boxes();
                    assert!(boxes.is_nested(), "{w:?} x {h:?} in {offer:?}: {boxes:?}");
                    assert!(boxes.outside.left.is_finite() && boxes.outside.bottom.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_match_parent_fills_offer() {
        let mut c = Control::new(Empty);
        c.base.set_size(DimensionSize::MATCH_PARENT).unwrap();
        c.base.set_padding(Insets::uniform(5.0)).unwrap();
        c.measure(Size::new(120.0, 60.0), &pass());
        assert_eq!(c.base.boundary(), BoxRect::new(0.0, 0.0, 120.0, 60.0));
        assert_eq!(c.base.content_box(), BoxRect::new(5.0, 5.0, 115.0, 55.0));
    }

    #[test]
    fn test_min_and_max_size_limit_content() {
        let mut c = block(80.0, 20.0);
        c.base.set_max_size(DimensionSize::fixed(50.0, 100.0)).unwrap();
        c.base.set_min_size(DimensionSize::fixed(0.0, 30.0)).unwrap();
        c.measure(Size::new(200.0, 200.0), &pass());
        assert_eq!(c.base.boundary().size(), Size::new(50.0, 30.0));
    }

    #[test]
    fn test_measure_is_idempotent() {
        let mut c = block(80.0, 20.0);
        c.base.set_size(DimensionSize::new(Dimension::MatchParent, Dimension::WrapContent)).unwrap();
        c.base.set_margin(Insets::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        let cx = pass();
        c.measure(Size::new(150.0, 90.0), &cx);
        let first = *c.base.boxes();

        assert!(!c.needs_measure());
        c.measure(Size::new(150.0, 90.0), &cx);
        assert_eq!(*c.base.boxes(), first);

        c.base.request_measure();
        c.measure(Size::new(150.0, 90.0), &cx);
        assert_eq!(*c.base.boxes(), first);
    }

    #[test]
    fn test_degenerate_inputs_collapse_instead_of_failing() {
        let mut zero = block(80.0, 20.0);
        zero.base.set_scale(0.0).unwrap();
        zero.measure(Size::new(100.0, 100.0), &pass());
        assert_eq!(*zero.base.boxes(), MeasuredBoxes::default());

        let mut nan = Control::new(Empty);
        nan.base.set_size(DimensionSize::MATCH_PARENT).unwrap();
        nan.measure(Size::new(f32::NAN, f32::NEG_INFINITY), &pass());
        assert_eq!(nan.base.boundary(), BoxRect::ZERO);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let mut c = Control::new(Empty);
        assert!(matches!(
            c.base.set_size(DimensionSize::fixed(-5.0, 10.0)),
            Err(ControlError::InvalidArgument { name: "size", .. })
        ));
        assert!(c.base.set_margin(Insets::uniform(f32::NAN)).is_err());
        assert!(c.base.set_scale(-1.0).is_err());
        assert!(c.base.set_inner_origin(Vec2::new(1.5, 0.0)).is_err());
        let m = Matrix::translation(Vec2::new(f32::INFINITY, 0.0));
        assert!(c.base.set_transform(m).is_err());
        assert_eq!(c.base.size(), DimensionSize::WRAP);
    }

    #[test]
    fn test_property_change_can_be_vetoed() {
        let mut c = Control::new(Empty);
        c.base.on_margin_change(|change| {
            if change.next.left > 10.0 {
                change.cancel = true;
            }
        });
        c.base.set_margin(Insets::uniform(20.0)).unwrap();
        assert_eq!(c.base.margin(), Insets::ZERO);
        c.base.set_margin(Insets::uniform(5.0)).unwrap();
        assert_eq!(c.base.margin(), Insets::uniform(5.0));
    }

    #[test]
    fn test_label_measures_through_measurer() {
        let mut label = Label("Hello");
        label.measure(Size::UNBOUNDED, &pass());
        assert_eq!(label.base.boundary().size(), Size::new(40.0, 20.0));

        if let Some(w) = label.widget_mut::<LabelWidget>() {
            w.set_text("Hi");
        }
        assert!(label.needs_measure());
        label.measure(Size::UNBOUNDED, &pass());
        assert_eq!(label.base.boundary().size(), Size::new(16.0, 20.0));
    }

    // Placement and animation

    #[test]
    fn test_scale_pivots_on_inner_origin() {
        let mut root = block(80.0, 20.0);
        root.base.set_scale(2.0).unwrap();
        root.base.set_inner_origin(Vec2::ZERO).unwrap();
        let id = root.id();
        let mut h = Harness::new(root);

        h.frame(at(150.0, 30.0));
        assert_eq!(h.ui.hovered(), Some(id));
        let full = h.ui.root().base.full_transform();
        assert_eq!(full.transform_point(Vec2::new(40.0, 10.0)), Vec2::new(80.0, 20.0));

        h.step(10, at(170.0, 30.0));
        assert_eq!(h.ui.hovered(), None);
    }

    #[test]
    fn test_zero_scale_is_not_interactive() {
        let mut root = block(80.0, 20.0);
        root.base.set_scale(0.0).unwrap();
        let log = record_mouse(&mut root);
        let mut h = Harness::new(root);
        h.frame(at(0.0, 0.0));
        h.step(10, pressed(0.0, 0.0));
        h.step(10, at(0.0, 0.0));
        assert!(log.borrow().is_empty());
    }

    fn column_with_animated_second() -> (Control, ControlId) {
        let a = block(80.0, 20.0);
        let mut b = block(80.0, 20.0);
        b.base.animators.movement = Some(Animator::new(AnimationSpec::tween(
            Duration::from_millis(100),
            Easing::Linear,
        )));
        let b_id = b.id();
        let mut root = Container(vec![a, b]);
        if let Some(w) = root.widget_mut::<ContainerWidget>() {
            w.layout = ContainerLayout::Column;
        }
        (root, b_id)
    }

    fn remove_first(h: &mut Harness) {
        let removed = h
            .ui
            .root_mut()
            .widget_mut::<ContainerWidget>()
            .and_then(|w| w.remove(0));
        assert!(removed.is_some());
    }

    fn y_of(h: &Harness, id: ControlId) -> f32 {
        h.ui.find(id).unwrap().base.local_transform().translation_part().y
    }

    #[test]
    fn test_move_animator_eases_to_new_placement() {
        let (root, b) = column_with_animated_second();
        let mut h = Harness::new(root);
        h.frame(InputSnapshot::default());
        assert_eq!(y_of(&h, b), 20.0);

        remove_first(&mut h);
        h.frame(InputSnapshot::default());
        assert!(approx(y_of(&h, b), 20.0));

        h.step(50, InputSnapshot::default());
        assert!((y_of(&h, b) - 10.0).abs() < 0.5, "{}", y_of(&h, b));

        let out = h.step(100, InputSnapshot::default());
        assert_eq!(y_of(&h, b), 0.0);
        assert!(!out.stats.animating);
    }

    #[test]
    fn test_suppressed_move_snaps() {
        let (root, b) = column_with_animated_second();
        let mut h = Harness::new(root);
        h.frame(InputSnapshot::default());

        remove_first(&mut h);
        h.ui.suppress_next_animation();
        h.frame(InputSnapshot::default());
        assert_eq!(y_of(&h, b), 0.0);
    }

    #[test]
    fn test_transform_animator_blends_user_transform() {
        let mut root = block(80.0, 20.0);
        root.base.animators.transform = Some(Animator::new(AnimationSpec::tween(
            Duration::from_millis(100),
            Easing::Linear,
        )));
        let mut h = Harness::new(root);
        h.frame(InputSnapshot::default());

        h.ui.root_mut()
            .base
            .set_transform(Matrix::translation(Vec2::new(10.0, 0.0)))
            .unwrap();
        h.frame(InputSnapshot::default());
        let x = |h: &Harness| h.ui.root().base.local_transform().translation_part().x;
        assert!(approx(x(&h), 0.0));

        h.step(50, InputSnapshot::default());
        assert!((x(&h) - 5.0).abs() < 0.5);

        h.step(100, InputSnapshot::default());
        assert!(approx(x(&h), 10.0));
    }

    #[test]
    fn test_hide_animation_shrinks_and_fades() {
        let mut root = block(80.0, 20.0);
        root.base.animators.hide = Some(ControlAnimators::hide(AnimationSpec::tween(
            Duration::from_millis(100),
            Easing::Linear,
        )));
        let mut h = Harness::new(root);
        h.frame(InputSnapshot::default());

        h.ui.root_mut().base.set_visible(false);
        let out = h.frame(InputSnapshot::default());
        assert_eq!(quad_alphas(&out.draw_list), vec![255]);

        let out = h.step(50, InputSnapshot::default());
        let boundary = h.ui.root().base.boundary();
        assert!((boundary.width() - 60.0).abs() < 0.5, "{boundary:?}");
        assert!(h.ui.root().base.boxes().is_nested());
        let alphas = quad_alphas(&out.draw_list);
        assert_eq!(alphas.len(), 1);
        assert!((120..=135).contains(&alphas[0]), "{alphas:?}");

        let out = h.step(100, InputSnapshot::default());
        assert!(out.draw_list.is_empty());
    }

    // Interaction

    #[test]
    fn test_hover_enter_leave_and_visual_state() {
        let mut root = block(80.0, 20.0);
        root.base.set_margin(Insets::uniform(10.0)).unwrap();
        let log = record_mouse(&mut root);
        let mut h = Harness::new(root);

        h.frame(at(5.0, 5.0));
        assert!(!h.ui.root().base.is_hovered());

        h.step(10, at(50.0, 20.0));
        assert!(h.ui.root().base.is_hovered());
        assert_eq!(h.ui.root().base.visual_state(), VisualState::Hovered);

        let out = h.step(10, at(50.0, 20.0));
        assert!(out.stats.measured);
        let out = h.step(10, at(50.0, 20.0));
        assert!(!out.stats.measured);

        h.step(10, at(95.0, 20.0));
        assert_eq!(
            kinds(&log),
            vec![MouseEventKind::Enter, MouseEventKind::Move, MouseEventKind::Leave]
        );
        assert_eq!(h.ui.root().base.visual_state(), VisualState::Normal);
    }

    #[test]
    fn test_topmost_child_wins_hover() {
        let a = block(80.0, 20.0);
        let b = block(80.0, 20.0);
        let (a_id, b_id) = (a.id(), b.id());
        let root = Container(vec![a, b]);
        let root_id = root.id();
        let mut h = Harness::new(root);

        h.frame(at(10.0, 10.0));
        assert_eq!(h.ui.hovered(), Some(b_id));
        assert!(!h.ui.find(a_id).unwrap().base.is_hovered());
        assert!(h.ui.find(b_id).unwrap().base.is_hovered());
        assert!(h.ui.find(root_id).unwrap().base.is_hovered());
    }

    #[test]
    fn test_click_counts_and_double_click_window() {
        let mut root = block(80.0, 20.0);
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = clicks.clone();
        root.on_click(move |e| sink.borrow_mut().push(e.clicks));
        let mut h = Harness::new(root);

        h.frame(at(40.0, 10.0));
        h.step(10, pressed(40.0, 10.0));
        assert_eq!(h.ui.root().base.visual_state(), VisualState::Active);
        h.step(10, at(40.0, 10.0));
        h.step(100, pressed(40.0, 10.0));
        h.step(10, at(40.0, 10.0));
        h.step(600, pressed(40.0, 10.0));
        h.step(10, at(40.0, 10.0));

        assert_eq!(*clicks.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn test_release_outside_does_not_click() {
        let mut root = block(80.0, 20.0);
        let log = record_mouse(&mut root);
        let mut h = Harness::new(root);

        h.frame(at(40.0, 10.0));
        h.step(10, pressed(40.0, 10.0));
        h.step(10, pressed(150.0, 150.0));
        h.step(10, at(150.0, 150.0));
        let k = kinds(&log);
        assert!(k.contains(&MouseEventKind::Up));
        assert!(!k.contains(&MouseEventKind::Click));
        assert_eq!(h.ui.root().base.interaction().click_count[0], 0);
    }

    #[test]
    fn test_capture_blocks_other_controls() {
        let mut a = block(100.0, 40.0);
        let mut b = block(100.0, 40.0);
        let (a_id, b_id) = (a.id(), b.id());
        let a_log = record_mouse(&mut a);
        let b_log = record_mouse(&mut b);
        let mut root = Container(vec![a, b]);
        if let Some(w) = root.widget_mut::<ContainerWidget>() {
            w.layout = ContainerLayout::Column;
        }
        let mut h = Harness::new(root);

        h.frame(at(50.0, 20.0));
        h.step(10, pressed(50.0, 20.0));
        assert_eq!(h.ui.capturing(MouseButtons::LEFT), Some(a_id));

        h.step(10, pressed(50.0, 60.0));
        assert!(!h.ui.find(b_id).unwrap().base.is_hovered());
        assert!(b_log.borrow().is_empty());
        assert_eq!(kinds(&a_log).last(), Some(&MouseEventKind::Move));

        h.step(10, at(50.0, 60.0));
        assert_eq!(h.ui.capturing(MouseButtons::LEFT), None);
        assert!(!kinds(&a_log).contains(&MouseEventKind::Click));

        h.step(10, at(50.0, 61.0));
        assert!(h.ui.find(b_id).unwrap().base.is_hovered());
        assert_eq!(kinds(&b_log).first(), Some(&MouseEventKind::Enter));
    }

    #[test]
    fn test_capture_released_when_owner_leaves_tree() {
        let a = block(100.0, 40.0);
        let a_id = a.id();
        let root = Container(vec![a]);
        let mut h = Harness::new(root);

        h.frame(at(50.0, 20.0));
        h.step(10, pressed(50.0, 20.0));
        assert_eq!(h.ui.capturing(MouseButtons::LEFT), Some(a_id));

        let removed = h
            .ui
            .root_mut()
            .widget_mut::<ContainerWidget>()
            .and_then(|w| w.remove(0));
        assert!(removed.is_some());
        h.step(10, pressed(50.0, 20.0));
        assert_eq!(h.ui.capturing(MouseButtons::LEFT), None);
    }

    #[test]
    fn test_hidden_container_hides_children_from_input() {
        let mut child = block(80.0, 20.0);
        let clicks = Rc::new(RefCell::new(0));
        let sink = clicks.clone();
        child.on_click(move |_| *sink.borrow_mut() += 1);
        let child_log = record_mouse(&mut child);
        let mut inner = Container(vec![child]);
        inner.base.set_visible(false);
        let mut outer = Container(vec![inner]);
        outer.base.set_size(DimensionSize::fixed(100.0, 100.0)).unwrap();
        let outer_id = outer.id();
        let mut h = Harness::new(outer);

        h.frame(at(10.0, 10.0));
        h.step(10, pressed(10.0, 10.0));
        h.step(10, at(10.0, 10.0));
        assert_eq!(*clicks.borrow(), 0);
        assert!(child_log.borrow().is_empty());
        assert_eq!(h.ui.hovered(), Some(outer_id));
        assert_eq!(h.ui.capturing(MouseButtons::LEFT), None);
    }

    #[test]
    fn test_hiding_parent_mid_drag_releases_child() {
        let mut child = block(80.0, 20.0);
        let child_id = child.id();
        let log = record_mouse(&mut child);
        let inner = Container(vec![child]);
        let inner_id = inner.id();
        let mut outer = Container(vec![inner]);
        outer.base.set_size(DimensionSize::fixed(100.0, 100.0)).unwrap();
        let mut h = Harness::new(outer);

        h.frame(at(10.0, 10.0));
        h.step(10, pressed(10.0, 10.0));
        assert_eq!(h.ui.capturing(MouseButtons::LEFT), Some(child_id));

        h.ui.find_mut(inner_id).unwrap().base.set_visible(false);
        h.step(10, pressed(12.0, 10.0));
        assert_eq!(h.ui.capturing(MouseButtons::LEFT), None);
        let child = h.ui.find(child_id).unwrap();
        assert!(!child.base.is_hovered());
        assert!(child.base.interaction().held.is_empty());
        assert_eq!(kinds(&log).last(), Some(&MouseEventKind::Leave));

        h.step(10, at(12.0, 10.0));
        assert_eq!(kinds(&log).last(), Some(&MouseEventKind::Leave));
        assert!(!kinds(&log).contains(&MouseEventKind::Click));
    }

    #[test]
    fn test_disabled_control_ignores_input_and_is_tinted() {
        let mut root = block(80.0, 20.0);
        root.base.set_enabled(false);
        let log = record_mouse(&mut root);
        let mut h = Harness::new(root);

        h.frame(at(10.0, 10.0));
        h.step(10, pressed(10.0, 10.0));
        let out = h.step(10, at(10.0, 10.0));
        assert!(log.borrow().is_empty());
        assert_eq!(h.ui.root().base.visual_state(), VisualState::Disabled);
        assert_eq!(quad_alphas(&out.draw_list), vec![128]);
    }

    #[test]
    fn test_button_takes_focus_and_clicks_on_enter() {
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let mut button = Button("OK", move || *sink.borrow_mut() += 1);
        let focus_log = Rc::new(RefCell::new(Vec::new()));
        let focus_sink = focus_log.clone();
        button.base.events.focus.add(move |e| focus_sink.borrow_mut().push(e.focused));
        let id = button.id();
        let mut h = Harness::new(button);

        h.frame(at(10.0, 10.0));
        h.step(10, pressed(10.0, 10.0));
        assert_eq!(h.ui.focused(), Some(id));
        h.step(10, at(10.0, 10.0));
        assert_eq!(*count.borrow(), 1);

        h.step(10, at(10.0, 10.0).with_key(KeyEvent::down(Key::Enter)));
        assert_eq!(*count.borrow(), 2);

        h.step(10, at(10.0, 10.0).with_key(KeyEvent::up(Key::Enter)));
        assert_eq!(*count.borrow(), 2);

        h.step(10, pressed(150.0, 150.0));
        assert_eq!(h.ui.focused(), None);
        assert_eq!(*focus_log.borrow(), vec![true, false]);
    }

    #[test]
    fn test_handled_enter_does_not_click() {
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let mut button = Button("OK", move || *sink.borrow_mut() += 1);
        button.on_key(|k| {
            if matches!(k.input, KeyInput::Key(KeyEvent { key: Key::Enter, .. })) {
                k.handled = true;
            }
        });
        let id = button.id();
        let mut h = Harness::new(button);
        h.frame(InputSnapshot::default());
        h.ui.focus(Some(id));
        assert!(h.ui.root().base.is_focused());

        h.step(10, InputSnapshot::default().with_key(KeyEvent::down(Key::Enter)));
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_button_rejects_alignment_outside_unit_square() {
        let mut button = Button("OK", || {});
        let w = button.widget_mut::<ButtonWidget>().unwrap();
        assert!(w.set_alignment(Vec2::new(1.2, 0.5)).is_err());
        assert!(w.set_alignment(Vec2::new(0.0, 1.0)).is_ok());
        assert_eq!(w.alignment(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_wheel_intercepted_by_inner_scroller() {
        let mut inner = Container(vec![block(100.0, 200.0)]);
        inner.base.set_size(DimensionSize::fixed(100.0, 50.0)).unwrap();
        let inner_id = inner.id();
        let mut outer = Container(vec![inner, block(100.0, 200.0)]);
        outer.base.set_size(DimensionSize::fixed(100.0, 100.0)).unwrap();
        if let Some(w) = outer.widget_mut::<ContainerWidget>() {
            w.layout = ContainerLayout::Column;
        }
        let mut h = Harness::new(outer);
        let scroll_of = |h: &Harness, id: Option<ControlId>| {
            let c = id.map_or(h.ui.root(), |id| h.ui.find(id).unwrap());
            c.widget::<ContainerWidget>().unwrap().scroll()
        };

        h.frame(at(50.0, 25.0));
        assert_eq!(
            h.ui.root().widget::<ContainerWidget>().unwrap().scroll_max(),
            Vec2::new(0.0, 150.0)
        );

        h.step(10, at(50.0, 25.0).with_wheel(0.0, -1.0));
        h.step(200, at(50.0, 25.0));
        assert_eq!(scroll_of(&h, Some(inner_id)), Vec2::new(0.0, 40.0));
        assert_eq!(scroll_of(&h, None), Vec2::ZERO);

        if let Some(w) = h
            .ui
            .find_mut(inner_id)
            .and_then(|c| c.widget_mut::<ContainerWidget>())
        {
            w.scroll_to(Vec2::new(0.0, 150.0));
        }
        h.step(10, at(50.0, 25.0));
        h.step(10, at(50.0, 25.0).with_wheel(0.0, -1.0));
        h.step(200, at(50.0, 25.0));
        assert_eq!(scroll_of(&h, Some(inner_id)), Vec2::new(0.0, 150.0));
        assert_eq!(scroll_of(&h, None), Vec2::new(0.0, 40.0));
    }

    // Drawing

    #[test]
    fn test_clipped_container_composites_through_texture() {
        let root = Container(vec![block(80.0, 20.0)]);
        let mut h = Harness::new(root);
        let out = h.frame(InputSnapshot::default());

        let images: Vec<_> = out
            .draw_list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { points, uv, .. } => Some((*points, *uv)),
                _ => None,
            })
            .collect();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].0, BoxRect::new(0.0, 0.0, 80.0, 20.0).corners());
        assert_eq!(images[0].1, UNIT_UV);
        assert_eq!(out.stats.textures, 1);
        assert_eq!(h.backend.textures_rented, 1);
        assert_eq!(h.backend.live_targets(), 0);
        assert_eq!(h.backend.frames, 1);
    }

    #[test]
    fn test_unclipped_content_lands_in_screen_space() {
        let mut root = Container(vec![block(80.0, 20.0)]);
        root.base.clip_children = false;
        root.base.set_padding(Insets::uniform(5.0)).unwrap();
        let mut h = Harness::new(root);
        let out = h.frame(InputSnapshot::default());
        assert_eq!(out.draw_list.bounds(), BoxRect::new(5.0, 5.0, 85.0, 25.0));
    }

    #[test]
    fn test_debug_draw_outlines_boundary() {
        let root = block(80.0, 20.0);
        let clock = ManualClock::default();
        let config = UiConfig {
            debug_draw: true,
            ..UiConfig::default()
        };
        let mut ui = Ui::new(root, config, clock);
        let mut backend = HeadlessBackend::new();
        let out = ui.frame(Size::new(100.0, 100.0), &InputSnapshot::default(), &mut backend);
        let outlined = out.draw_list.commands.iter().any(|c| {
            matches!(c, DrawCommand::Quad { stroke: Some(t), color, .. } if *t == 1.0 && *color == Color::from_hex("#FFFFFF20"))
        });
        assert!(outlined);
    }

    #[test]
    fn test_background_cross_fades_between_states() {
        let green = Color::from_rgb(0, 255, 0);
        let blue = Color::from_rgb(0, 0, 255);
        let mut root = block(80.0, 20.0);
        let bgs = &mut root.base.backgrounds;
        bgs.set(VisualState::Normal, Some(Shape(ShapeKind::Rect, green)));
        bgs.set(VisualState::Hovered, Some(Shape(ShapeKind::Rect, blue)));
        let spec = AnimationSpec::tween(Duration::from_millis(100), Easing::Linear);
        bgs.show = Some(Backgrounds::fade_in(spec));
        bgs.hide = Some(Backgrounds::fade_out(spec));
        let mut h = Harness::new(root);

        let quads = |out: &FrameOutput| -> Vec<Color> {
            out.draw_list
                .commands
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Quad { color, .. } => Some(*color),
                    _ => None,
                })
                .collect()
        };

        let out = h.frame(at(150.0, 150.0));
        assert_eq!(quads(&out)[0], green);

        // The frame that changes state still shows the old background.
        let out = h.step(10, at(40.0, 10.0));
        assert_eq!(h.ui.root().base.visual_state(), VisualState::Hovered);
        assert_eq!(quads(&out)[0], green);
        assert_eq!(quads(&out).len(), 2);

        h.step(10, at(40.0, 10.0));
        let out = h.step(50, at(40.0, 10.0));
        let colors = quads(&out);
        assert_eq!(colors.len(), 3);
        assert_eq!((colors[0].1, colors[1].2), (255, 255));
        for faded in &colors[..2] {
            assert!((120..=135).contains(&faded.3), "{colors:?}");
        }

        let out = h.step(100, at(40.0, 10.0));
        let colors = quads(&out);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0], blue);
        let out = h.step(10, at(40.0, 10.0));
        assert!(!out.stats.measured);
    }

    #[test]
    fn test_background_swaps_instantly_without_animators() {
        let mut root = block(80.0, 20.0);
        let blue = Color::from_rgb(0, 0, 255);
        root.base
            .backgrounds
            .set(VisualState::Normal, Some(Shape(ShapeKind::Rect, Color::from_rgb(0, 255, 0))));
        root.base.backgrounds.set(VisualState::Hovered, Some(Shape(ShapeKind::Rect, blue)));
        let mut h = Harness::new(root);
        h.frame(at(150.0, 150.0));
        h.step(10, at(40.0, 10.0));
        let out = h.step(10, at(40.0, 10.0));
        let first = out.draw_list.commands.iter().find_map(|c| match c {
            DrawCommand::Quad { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(first, Some(blue));
        assert_eq!(quad_alphas(&out.draw_list), vec![255, 255]);
    }

    #[test]
    fn test_border_draws_selected_edges_inside_content() {
        let mut c = Shape(
            ShapeKind::Border {
                thickness: 2.0,
                edges: BorderEdges::LEFT | BorderEdges::BOTTOM,
            },
            Color::WHITE,
        );
        c.base.set_margin(Insets::uniform(5.0)).unwrap();
        let mut h = Harness::new(c);
        h.viewport = Size::new(50.0, 30.0);
        let out = h.frame(InputSnapshot::default());
        let rects: Vec<BoxRect> = out
            .draw_list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Quad { points, stroke: None, .. } => {
                    Some(BoxRect::new(points[0].x, points[0].y, points[2].x, points[2].y))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            rects,
            vec![BoxRect::new(5.0, 5.0, 7.0, 25.0), BoxRect::new(5.0, 23.0, 45.0, 25.0)]
        );
    }

    #[test]
    fn test_border_thicker_than_box_is_clamped() {
        let mut c = Shape(
            ShapeKind::Border {
                thickness: 50.0,
                edges: BorderEdges::ALL,
            },
            Color::WHITE,
        );
        c.measure(Size::new(10.0, 4.0), &pass());
        c.place(Matrix::IDENTITY, &Matrix::IDENTITY, &pass());
        let mut backend = HeadlessBackend::new();
        let config = UiConfig::default();
        let mut cx = DrawContext::new(&mut backend, &config);
        let mut list = DrawList::new();
        c.draw(&mut list, &mut cx);
        assert_eq!(list.len(), 4);
        assert_eq!(list.bounds(), BoxRect::new(0.0, 0.0, 10.0, 4.0));
    }

    // Scroll bar

    fn scroll_bar(min: f32, max: f32, buttons: bool) -> (Control, Rc<RefCell<Vec<ScrollEvent>>>) {
        let mut c = ScrollBar(LinearDirection::TopToBottom).unwrap();
        c.base.set_size(DimensionSize::fixed(16.0, 200.0)).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let w = c.widget_mut::<ScrollBarWidget>().unwrap();
        w.set_range(min, max).unwrap();
        w.set_page_size(0.1).unwrap();
        if !buttons {
            w.set_decrement(None);
            w.set_increment(None);
        }
        w.on_scroll(move |e| sink.borrow_mut().push(*e));
        (c, log)
    }

    fn bar(h: &Harness) -> &ScrollBarWidget {
        h.ui.root().widget::<ScrollBarWidget>().unwrap()
    }

    #[test]
    fn test_thumb_size_and_offset() {
        let (mut c, _) = scroll_bar(0.0, 100.0, false);
        c.widget_mut::<ScrollBarWidget>().unwrap().set_value(50.0);
        c.measure(Size::new(16.0, 200.0), &pass());
        let w = c.widget::<ScrollBarWidget>().unwrap();
        assert!(approx(w.bar_size(), 200.0));
        assert!(approx(w.thumb_size(), 20.0));
        assert!(approx(w.thumb_offset(), 90.0));
    }

    #[test]
    fn test_reversed_bar_puts_minimum_at_bottom() {
        let mut c = ScrollBar(LinearDirection::BottomToTop).unwrap();
        c.base.set_size(DimensionSize::fixed(16.0, 100.0)).unwrap();
        let w = c.widget_mut::<ScrollBarWidget>().unwrap();
        w.set_decrement(None);
        w.set_increment(None);
        w.set_range(0.0, 10.0).unwrap();
        w.set_page_size(0.2).unwrap();
        c.measure(Size::new(16.0, 100.0), &pass());
        let w = c.widget::<ScrollBarWidget>().unwrap();
        assert!(approx(w.thumb_size(), 20.0));
        assert!(approx(w.thumb_offset(), 80.0));
    }

    #[test]
    fn test_thumb_stays_inside_bar() {
        for height in [10.0, 40.0, 64.0, 200.0] {
            for page in [0.0, 0.05, 0.5, 1.0] {
                for step in 0..=10 {
                    let (mut c, _) = scroll_bar(0.0, 100.0, true);
                    c.base.set_size(DimensionSize::fixed(16.0, height)).unwrap();
                    let w = c.widget_mut::<ScrollBarWidget>().unwrap();
                    w.set_page_size(page).unwrap();
                    w.set_value(step as f32 * 10.0);
                    c.measure(Size::new(16.0, height), &pass());
                    let w = c.widget::<ScrollBarWidget>().unwrap();
                    assert!(w.thumb_offset() >= 0.0);
                    assert!(
                        w.thumb_offset() + w.thumb_size() <= w.bar_size() + 1e-3,
                        "height {height} page {page} value {}",
                        w.value()
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_range_never_scrolls() {
        let (c, log) = scroll_bar(5.0, 5.0, true);
        let mut h = Harness::new(c);
        h.frame(at(8.0, 100.0));
        assert_eq!(bar(&h).thumb_size(), 0.0);

        h.step(10, pressed(8.0, 100.0));
        h.step(700, pressed(8.0, 100.0));
        h.step(10, at(8.0, 192.0));
        h.step(10, pressed(8.0, 192.0));
        h.step(700, pressed(8.0, 192.0));
        h.step(10, at(8.0, 100.0).with_wheel(0.0, -3.0));
        assert!(log.borrow().is_empty());
        assert_eq!(bar(&h).value(), 5.0);
    }

    #[test]
    fn test_holding_increment_repeats() {
        let (c, log) = scroll_bar(0.0, 100.0, true);
        let mut h = Harness::new(c);
        h.frame(at(8.0, 192.0));

        h.step(10, pressed(8.0, 192.0));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(bar(&h).action(), ScrollAction::LineIncrement);

        let timings = PlatformTimings::default();
        let hold = timings.key_repeat_delay + timings.key_repeat_interval * 2 + Duration::from_millis(10);
        let mut held = Duration::ZERO;
        while held <= hold {
            h.step(10, pressed(8.0, 192.0));
            held += Duration::from_millis(10);
        }
        let increments = log
            .borrow()
            .iter()
            .filter(|e| e.action == ScrollAction::LineIncrement)
            .count();
        assert!(increments >= 3, "only {increments} events");

        h.step(10, at(8.0, 192.0));
        assert_eq!(bar(&h).action(), ScrollAction::None);
        let after = log.borrow().len();
        h.step(600, at(8.0, 192.0));
        h.step(600, at(8.0, 192.0));
        assert_eq!(log.borrow().len(), after);

        let first = log.borrow()[0];
        assert_eq!(first.old_value, 0.0);
        assert!(approx(first.unbound_delta, 100.0 / 32.0));
        assert_eq!(first.repeat_count, 1.0);
        assert!(log.borrow().iter().all(|e| approx(e.unbound_delta, 100.0 / 32.0)));
    }

    #[test]
    fn test_decrement_at_minimum_clamps() {
        let (c, log) = scroll_bar(0.0, 100.0, true);
        let mut h = Harness::new(c);
        h.frame(at(8.0, 8.0));
        h.step(10, pressed(8.0, 8.0));
        let e = log.borrow()[0];
        assert_eq!(e.action, ScrollAction::LineDecrement);
        assert_eq!(e.new_value, 0.0);
        assert!(e.unbound_delta < 0.0);
    }

    #[test]
    fn test_thumb_drag_maps_pointer_to_value() {
        let (c, log) = scroll_bar(0.0, 100.0, false);
        let mut h = Harness::new(c);
        h.frame(at(8.0, 10.0));
        h.step(10, pressed(8.0, 10.0));
        assert_eq!(bar(&h).action(), ScrollAction::ThumbTrack);
        assert_eq!(h.ui.capturing(MouseButtons::LEFT), Some(h.ui.root().id()));

        h.step(10, pressed(8.0, 100.0));
        assert!(approx(bar(&h).value(), 50.0));
        let e = *log.borrow().last().unwrap();
        assert_eq!(e.action, ScrollAction::ThumbTrack);
        assert!(approx(e.unbound_delta, 50.0));

        h.step(10, pressed(8.0, 400.0));
        assert!(approx(bar(&h).value(), 100.0));
        let thumb_state = bar(&h)
            .thumb()
            .and_then(|t| t.widget::<ShapeWidget>())
            .and_then(|s| s.displayed);
        assert_eq!(thumb_state, Some(VisualState::Active));

        h.step(10, at(8.0, 400.0));
        assert_eq!(bar(&h).action(), ScrollAction::None);
        let count = log.borrow().len();
        h.step(10, at(8.0, 50.0));
        assert_eq!(log.borrow().len(), count);
    }

    #[test]
    fn test_full_page_thumb_drag_is_a_no_op() {
        let (mut c, log) = scroll_bar(0.0, 100.0, false);
        c.widget_mut::<ScrollBarWidget>().unwrap().set_page_size(1.0).unwrap();
        let mut h = Harness::new(c);
        h.frame(at(8.0, 100.0));
        assert!(approx(bar(&h).thumb_size(), bar(&h).bar_size()));

        h.step(10, pressed(8.0, 100.0));
        h.step(10, pressed(8.0, 150.0));
        h.step(10, pressed(8.0, 20.0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_track_press_pages_until_thumb_passes_pointer() {
        let (c, log) = scroll_bar(0.0, 100.0, false);
        let mut h = Harness::new(c);
        h.frame(at(8.0, 150.0));
        h.step(10, pressed(8.0, 150.0));
        assert_eq!(bar(&h).action(), ScrollAction::PageIncrement);
        assert!(approx(bar(&h).value(), 10.0));

        for _ in 0..300 {
            h.step(10, pressed(8.0, 150.0));
        }
        assert!(approx(bar(&h).value(), 80.0), "{}", bar(&h).value());
        assert!(log.borrow().iter().all(|e| e.action == ScrollAction::PageIncrement));
    }

    #[test]
    fn test_late_page_repeats_stop_short_of_pointer() {
        let (c, log) = scroll_bar(0.0, 100.0, false);
        let mut h = Harness::new(c);
        h.frame(at(8.0, 150.0));
        h.step(10, pressed(8.0, 150.0));
        assert!(approx(bar(&h).value(), 10.0));

        // Sixteen repeats are due; only six fit before the pointer at ~77.8.
        h.step(1000, pressed(8.0, 150.0));
        let e = *log.borrow().last().unwrap();
        assert_eq!(e.repeat_count, 6.0);
        assert!(approx(e.unbound_delta, 10.0));
        assert!(approx(bar(&h).value(), 70.0), "{}", bar(&h).value());

        for _ in 0..20 {
            h.step(10, pressed(8.0, 150.0));
        }
        assert!(approx(bar(&h).value(), 80.0), "{}", bar(&h).value());
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_suppressed_event_leaves_value() {
        let (mut c, log) = scroll_bar(0.0, 100.0, false);
        c.widget_mut::<ScrollBarWidget>()
            .unwrap()
            .on_scroll(|e| e.suppress = true);
        let mut h = Harness::new(c);
        h.frame(at(8.0, 150.0));
        h.step(10, pressed(8.0, 150.0));
        assert_eq!(log.borrow().len(), 1);
        assert!(approx(log.borrow()[0].new_value, 10.0));
        assert_eq!(bar(&h).value(), 0.0);
    }

    #[test]
    fn test_wheel_scrolls_lines_and_aligns() {
        let (mut c, log) = scroll_bar(0.0, 100.0, true);
        let w = c.widget_mut::<ScrollBarWidget>().unwrap();
        w.set_line_size(0.06).unwrap();
        w.set_align_value(10.0).unwrap();
        let mut h = Harness::new(c);
        h.frame(at(8.0, 100.0));

        h.step(10, at(8.0, 100.0).with_wheel(0.0, -1.0));
        assert!(approx(bar(&h).value(), 10.0));

        h.step(10, at(8.0, 100.0).with_wheel(0.0, -2.5));
        let e = *log.borrow().last().unwrap();
        assert_eq!(e.action, ScrollAction::LineIncrement);
        assert_eq!(e.repeat_count, 2.5);
        assert!(approx(e.unbound_delta, 6.0));
        assert!(approx(bar(&h).value(), 30.0));

        h.step(10, at(8.0, 100.0).with_wheel(0.0, 1.0));
        assert_eq!(log.borrow().last().unwrap().action, ScrollAction::LineDecrement);
        assert!(approx(bar(&h).value(), 20.0));
    }

    #[test]
    fn test_wheel_delta_is_per_notch() {
        let (c, log) = scroll_bar(0.0, 100.0, true);
        let mut h = Harness::new(c);
        h.frame(at(8.0, 100.0));

        h.step(10, at(8.0, 100.0).with_wheel(0.0, -3.0));
        let e = *log.borrow().last().unwrap();
        assert!(approx(e.unbound_delta, 3.125));
        assert_eq!(e.repeat_count, 3.0);
        assert!(approx(bar(&h).value(), 9.375));

        h.step(10, at(8.0, 100.0).with_wheel(0.0, 0.5));
        let e = *log.borrow().last().unwrap();
        assert!(approx(e.unbound_delta, -3.125));
        assert_eq!(e.repeat_count, 0.5);
        assert!(approx(bar(&h).value(), 7.8125));
    }

    #[test]
    fn test_nan_value_becomes_minimum() {
        let (mut c, _) = scroll_bar(10.0, 20.0, true);
        let w = c.widget_mut::<ScrollBarWidget>().unwrap();
        w.set_value(15.0);
        w.set_value(f32::NAN);
        assert_eq!(w.value(), 10.0);
        w.set_value(99.0);
        assert_eq!(w.value(), 20.0);
    }

    #[test]
    fn test_horizontal_scroll_bar_is_not_implemented() {
        assert!(matches!(
            ScrollBar(LinearDirection::LeftToRight),
            Err(ControlError::NotImplemented(_))
        ));
        let mut c = ScrollBar(LinearDirection::TopToBottom).unwrap();
        let w = c.widget_mut::<ScrollBarWidget>().unwrap();
        assert!(matches!(
            w.set_direction(LinearDirection::RightToLeft),
            Err(ControlError::NotImplemented(_))
        ));
        assert_eq!(w.direction(), LinearDirection::TopToBottom);
    }

    #[test]
    fn test_direction_codes() {
        assert_eq!(LinearDirection::try_from(3u8), Ok(LinearDirection::BottomToTop));
        assert!(matches!(
            LinearDirection::try_from(9u8),
            Err(ControlError::InvalidArgument { name: "direction", .. })
        ));
        assert_eq!("top-to-bottom".parse::<LinearDirection>(), Ok(LinearDirection::TopToBottom));
        assert!("diagonal".parse::<LinearDirection>().is_err());
    }
}
