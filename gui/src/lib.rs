pub mod core;
pub mod interfaces;

#[cfg(test)]
mod effects_tests {
    use crate::core::effects::{get_body_point, Effects};
    use approx::assert_abs_diff_eq;
    use helpers::geometry::Point2d;
    use racegame::core::car::EffectEvent;

    #[test]
    fn test_effects_body_point() {
        let p = get_body_point(&Point2d::new(0.0, 0.0), 0.0, 10.0, 5.0);
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 5.0, epsilon = 1e-12);
    }
    #[test]
    fn test_effects_skid_marks_fade_out() {
        let mut effects = Effects::default();
        effects.add_events(&[EffectEvent::SkidMark {
            pos: Point2d::new(0.0, 0.0),
            angle: 0.0,
        }]);
        assert_eq!(effects.skid_marks.len(), 2);

        effects.update();
        assert!(effects
            .skid_marks
            .iter()
            .all(|m| (m.alpha - 0.3996).abs() < 1e-12));

        for _ in 0..2100 {
            effects.update();
        }
        assert!(effects.skid_marks.is_empty());
    }
    #[test]
    fn test_effects_skid_marks_capped() {
        let mut effects = Effects::default();
        let events = vec![
            EffectEvent::SkidMark {
                pos: Point2d::new(0.0, 0.0),
                angle: 0.0,
            };
            300
        ];
        effects.add_events(&events);
        assert_eq!(effects.skid_marks.len(), 500);
    }
    #[test]
    fn test_effects_crash_burst() {
        let mut effects = Effects::default();
        effects.add_events(&[EffectEvent::CrashBurst {
            pos: Point2d::new(5.0, 5.0),
        }]);
        assert_eq!(effects.particles.len(), 30);

        for _ in 0..34 {
            effects.update();
        }
        assert!(effects.particles.is_empty());
    }
    #[test]
    fn test_effects_clear() {
        let mut effects = Effects::default();
        effects.add_events(&[
            EffectEvent::TireSmoke {
                pos: Point2d::new(0.0, 0.0),
                angle: 1.0,
            },
            EffectEvent::SpeedLine {
                pos: Point2d::new(0.0, 0.0),
                angle: 1.0,
            },
        ]);
        assert_eq!(effects.particles.len(), 2);
        assert_eq!(effects.speed_lines.len(), 1);

        effects.clear();
        assert!(effects.particles.is_empty());
        assert!(effects.speed_lines.is_empty());
    }
}

#[cfg(test)]
mod gui_tests {
    use crate::core::gui::{get_axes_expansion, get_hud_speed, get_stripes};
    use approx::assert_abs_diff_eq;
    use helpers::geometry::Point2d;

    #[test]
    fn test_gui_axes_expansion_square() {
        let axes = get_axes_expansion(&[Point2d::new(0.0, 0.0), Point2d::new(100.0, 50.0)], 10.0);

        assert_abs_diff_eq!(axes[0], -10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(axes[1], 110.0, epsilon = 1e-12);
        assert_abs_diff_eq!(axes[2], -35.0, epsilon = 1e-12);
        assert_abs_diff_eq!(axes[3], 85.0, epsilon = 1e-12);
    }
    #[test]
    fn test_gui_stripes() {
        let square = [
            Point2d::new(0.0, 0.0),
            Point2d::new(100.0, 0.0),
            Point2d::new(100.0, 100.0),
            Point2d::new(0.0, 100.0),
        ];
        let stripes = get_stripes(&square, 15.0);

        assert_eq!(stripes.len(), 24);
        assert_abs_diff_eq!(stripes[0].p2.x, 100.0 / 6.0, epsilon = 1e-9);
        assert_eq!(stripes[23].p2, Point2d::new(0.0, 0.0));
    }
    #[test]
    fn test_gui_hud_speed() {
        assert_eq!(get_hud_speed(7.0, 7.0), 320);
        assert_eq!(get_hud_speed(3.5, 7.0), 160);
        assert_eq!(get_hud_speed(1.0, 0.0), 0);
    }
}
