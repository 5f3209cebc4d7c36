#[cfg(test)]
mod tests {
    use crate::animation::*;
    use crate::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use web_time::{Duration, Instant};

    #[test]
    fn test_normalize_collapses_unbounded_edges() {
        let r = BoxRect::new(5.0, 2.0, f32::INFINITY, f32::INFINITY).normalize();
        assert_eq!(r, BoxRect::new(5.0, 2.0, 5.0, 2.0));

        let swapped = BoxRect::new(10.0, 10.0, 0.0, 4.0).normalize();
        assert_eq!(swapped, BoxRect::new(0.0, 4.0, 10.0, 10.0));

        let nan = BoxRect::new(f32::NAN, 0.0, 3.0, f32::NAN).normalize();
        assert_eq!(nan, BoxRect::new(0.0, 0.0, 3.0, 0.0));

        assert_eq!(BoxRect::INVERTED_EXTREMA.normalize(), BoxRect::ZERO);
    }

    #[test]
    fn test_expand_and_contains() {
        let content = BoxRect::from_size(Size::new(80.0, 20.0)).translate(Vec2::new(4.0, 4.0));
        let boundary = content.expand(Insets::uniform(4.0));
        assert_eq!(boundary, BoxRect::new(0.0, 0.0, 88.0, 28.0));
        assert!(boundary.contains_rect(&content));
        assert!(boundary.contains(Vec2::new(1.0, 1.0)));
        assert!(!content.contains(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_matrix_compose_and_invert() {
        let m = Matrix::uniform_scale(2.0).then(&Matrix::translation(Vec2::new(10.0, 5.0)));
        let p = m.transform_point(Vec2::new(1.0, 1.0));
        assert_eq!(p, Vec2::new(12.0, 7.0));

        let inv = m.invert().expect("invertible");
        let back = inv.transform_point(p);
        assert!((back.x - 1.0).abs() < 1e-5 && (back.y - 1.0).abs() < 1e-5);

        assert!(Matrix::uniform_scale(0.0).invert().is_none());
        assert_eq!(Matrix::IDENTITY * Matrix::IDENTITY, Matrix::IDENTITY);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let m = Matrix::rotation(std::f32::consts::FRAC_PI_2);
        let p = m.transform_point(Vec2::new(1.0, 0.0));
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_animator_endpoints_and_monotonic() {
        let start = Instant::now();
        let before = AnimatorState {
            opacity: 0.0,
            ..AnimatorState::with_matrix(Matrix::translation(Vec2::new(0.0, 0.0)))
        };
        let after = AnimatorState::with_matrix(Matrix::translation(Vec2::new(100.0, 0.0)));
        let mut anim = Animator::with_states(
            AnimationSpec::tween(Duration::from_millis(100), Easing::Linear),
            before,
            after,
        );

        anim.restart(start);
        assert!(anim.is_running());
        assert_eq!(*anim.current(), before);

        let mut last = -1.0;
        for ms in [10u64, 25, 50, 75, 99] {
            assert!(anim.update(start + Duration::from_millis(ms)));
            let x = anim.current().matrix.m31;
            assert!(x > last, "not monotonic at {ms}ms");
            last = x;
        }

        assert!(!anim.update(start + Duration::from_millis(100)));
        assert!(!anim.is_running());
        assert_eq!(anim.progress(), 1.0);
        assert_eq!(*anim.current(), after);

        // Stays at the final value once inert.
        anim.update(start + Duration::from_millis(500));
        assert_eq!(*anim.current(), after);
    }

    #[test]
    fn test_animator_zero_duration_and_delay() {
        let start = Instant::now();
        let mut anim = Animator::with_states(
            AnimationSpec::instant().with_delay(Duration::from_millis(20)),
            AnimatorState::default(),
            AnimatorState {
                opacity: 0.0,
                ..AnimatorState::default()
            },
        );
        anim.restart(start);
        assert!(anim.update(start + Duration::from_millis(10)));
        assert_eq!(anim.current().opacity, 1.0);
        assert!(!anim.update(start + Duration::from_millis(20)));
        assert_eq!(anim.current().opacity, 0.0);
    }

    #[test]
    fn test_animated_value_with_manual_clock() {
        let clock = ManualClock::new(Instant::now());
        let mut v = AnimatedValue::new(0.0f32, AnimationSpec::tween(Duration::from_millis(100), Easing::Linear));
        v.set_target(10.0, clock.now());
        assert!(v.is_animating());

        clock.advance(Duration::from_millis(50));
        assert!(v.update(clock.now()));
        assert!((*v.get() - 5.0).abs() < 0.01);

        clock.advance(Duration::from_millis(60));
        assert!(!v.update(clock.now()));
        assert_eq!(*v.get(), 10.0);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let a = ManualClock::default();
        let b = a.clone();
        let t0 = a.now();
        b.advance(Duration::from_millis(16));
        assert_eq!(a.now() - t0, Duration::from_millis(16));
    }

    #[test]
    fn test_observed_compare_and_notify() {
        struct Owner;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut p: Observed<Owner, f32> = Observed::new("value", 1.0);
        {
            let seen = seen.clone();
            p.on_change(move |c| seen.borrow_mut().push((c.previous, c.next)));
        }

        assert!(!p.set(1.0));
        assert!(p.set(2.0));
        assert_eq!(*p.get(), 2.0);
        assert_eq!(p.generation(), 1);
        assert_eq!(*seen.borrow(), vec![(1.0, 2.0)]);
    }

    #[test]
    fn test_observed_veto() {
        let mut p: Observed<(), i32> = Observed::new("count", 0);
        p.on_change(|c| {
            if c.next < 0 {
                c.cancel = true;
            }
        });
        assert!(!p.set(-1));
        assert_eq!(*p.get(), 0);
        assert!(p.set(3));
        assert_eq!(*p.get(), 3);
    }

    #[test]
    fn test_listeners_run_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut l: Listeners<u32> = Listeners::new();
        for i in 0..3 {
            let order = order.clone();
            l.add(move |v| {
                order.borrow_mut().push(i);
                *v += 1;
            });
        }
        let mut arg = 0;
        l.emit(&mut arg);
        assert_eq!(arg, 3);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_copy_to_applies_transform_and_tint() {
        let mut src = DrawList::new();
        src.add_rect(BoxRect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        let mut dst = DrawList::new();
        src.copy_to(
            &mut dst,
            &Matrix::translation(Vec2::new(5.0, 5.0)),
            Color::opacity_tint(0.5),
        );
        match &dst.commands[0] {
            DrawCommand::Quad { points, color, .. } => {
                assert_eq!(points[0], Vec2::new(5.0, 5.0));
                assert_eq!(points[2], Vec2::new(15.0, 15.0));
                assert_eq!(color.3, 128);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(dst.bounds(), BoxRect::new(5.0, 5.0, 15.0, 15.0));
    }

    #[test]
    fn test_headless_backend_rent_and_return() {
        let mut backend = HeadlessBackend::new();
        let mut list = backend.rent_draw_list();
        list.add_rect(BoxRect::new(10.0, 10.0, 20.0, 20.0), Color::BLACK);

        let tex = backend
            .rent_texture(&list, BoxRect::new(10.0, 10.0, 30.0, 30.0))
            .expect("texture");
        let target = backend.target(tex).expect("live");
        assert_eq!(target.size, Size::new(20.0, 20.0));
        assert_eq!(target.contents.bounds(), BoxRect::new(0.0, 0.0, 10.0, 10.0));

        backend.return_texture(tex);
        assert_eq!(backend.live_targets(), 0);
        assert!(backend.rent_texture(&list, BoxRect::ZERO).is_none());
        backend.return_draw_list(list);
        assert!(backend.rent_draw_list().is_empty());
    }

    #[test]
    fn test_error_checks() {
        assert!(error::check_unit("alignment", 0.5).is_ok());
        assert!(matches!(
            error::check_unit("alignment", 1.5),
            Err(ControlError::InvalidArgument { name: "alignment", .. })
        ));
        assert!(error::check_non_negative("margin", f32::NAN).is_err());
        assert!(error::check_non_negative("margin", -1.0).is_err());
    }

    #[test]
    fn test_wheel_directions() {
        assert_eq!(WheelIntercept::from_delta(Vec2::new(0.0, -1.0)), WheelIntercept::DOWN);
        assert_eq!(
            WheelIntercept::from_delta(Vec2::new(1.0, 1.0)),
            WheelIntercept::UP | WheelIntercept::RIGHT
        );
        assert!(WheelIntercept::from_delta(Vec2::ZERO).is_empty());
    }

    #[test]
    fn test_color_hex_and_modulate() {
        assert_eq!(Color::from_hex("#FFFFFF20"), Color(255, 255, 255, 0x20));
        assert_eq!(Color::from_hex("#33BB33"), Color(0x33, 0xBB, 0x33, 255));
        assert_eq!(Color::WHITE.modulate(Color::opacity_tint(0.0)).3, 0);
        assert_eq!(Color(200, 100, 50, 255).modulate(Color::WHITE), Color(200, 100, 50, 255));
    }
}
