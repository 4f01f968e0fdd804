//! Arc direction, ellipses, and tangent arcs.

use super::common::*;
use rstest::rstest;
use skcanvas_context2d::arc_sweep;
use std::f32::consts::{FRAC_PI_2, TAU};

fn half_circle(anticlockwise: bool) -> ArcParams {
    ArcParams {
        x: 50.0,
        y: 50.0,
        radius: 30.0,
        start_angle: 0.0,
        end_angle: PI,
        anticlockwise,
    }
}

#[rstest]
#[case::clockwise_full_turn(0.0, 2.5 * PI, false, TAU)]
#[case::clockwise_partial(0.5, 1.5, false, 1.0)]
#[case::clockwise_wraps(1.5, 0.5, false, TAU - 1.0)]
#[case::anticlockwise_full_turn(2.5 * PI, 0.0, true, -TAU)]
#[case::anticlockwise_partial(1.5, 0.5, true, -1.0)]
#[case::anticlockwise_wraps(0.5, 1.5, true, -(TAU - 1.0))]
fn test_sweep_decision_table(
    #[case] start: f32,
    #[case] end: f32,
    #[case] anticlockwise: bool,
    #[case] expected: f32,
) {
    let sweep = arc_sweep(start, end, anticlockwise);
    assert!((sweep - expected).abs() < 1e-5, "{sweep} != {expected}");
}

#[test]
fn test_clockwise_half_circle_covers_lower_half() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.arc(&half_circle(false));
    ctx.fill();
    assert_eq!(rgba(&ctx, 50, 70), [0, 0, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 50, 30)));
}

#[test]
fn test_anticlockwise_half_circle_covers_upper_half() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.arc(&half_circle(true));
    ctx.fill();
    assert_eq!(rgba(&ctx, 50, 30), [0, 0, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 50, 70)));
}

#[test]
fn test_full_circle_fill() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.set_fill_style(RED);
    ctx.arc(&ArcParams {
        x: 50.0,
        y: 50.0,
        radius: 40.0,
        start_angle: 0.0,
        end_angle: TAU,
        anticlockwise: false,
    });
    ctx.fill();

    assert_eq!(rgba(&ctx, 50, 50), [255, 0, 0, 255]);
    assert_eq!(rgba(&ctx, 50, 12), [255, 0, 0, 255]);
    // Corners lie outside the circle.
    assert!(is_transparent(rgba(&ctx, 10, 10)));
    assert!(is_transparent(rgba(&ctx, 88, 88)));
}

#[test]
fn test_arc_under_non_uniform_scale_is_elliptical() {
    let mut ctx = Context2d::new(200, 100).unwrap();
    ctx.scale(2.0, 1.0);
    ctx.arc(&ArcParams {
        x: 50.0,
        y: 50.0,
        radius: 40.0,
        start_angle: 0.0,
        end_angle: TAU,
        anticlockwise: false,
    });
    // Device ellipse centered at (100, 50) with radii 80 and 40.
    assert!(ctx.is_point_in_path(25.0, 50.0));
    assert!(!ctx.is_point_in_path(15.0, 50.0));
    assert!(ctx.is_point_in_path(100.0, 12.0));
    assert!(!ctx.is_point_in_path(100.0, 5.0));
}

#[test]
fn test_rotated_ellipse_extent() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.ellipse(&EllipseParams {
        x: 50.0,
        y: 50.0,
        radius_x: 40.0,
        radius_y: 10.0,
        rotation: FRAC_PI_2,
        start_angle: 0.0,
        end_angle: TAU,
        anticlockwise: false,
    });
    // A quarter turn makes the long axis vertical.
    assert!(ctx.is_point_in_path(50.0, 12.0));
    assert!(!ctx.is_point_in_path(50.0, 5.0));
    assert!(ctx.is_point_in_path(57.0, 50.0));
    assert!(!ctx.is_point_in_path(63.0, 50.0));
}

#[test]
fn test_negative_ellipse_radius_ignored() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.ellipse(&EllipseParams {
        x: 50.0,
        y: 50.0,
        radius_x: -5.0,
        radius_y: 10.0,
        rotation: 0.0,
        start_angle: 0.0,
        end_angle: TAU,
        anticlockwise: false,
    });
    assert_eq!(ctx.path_state(), PathState::Empty);
}

#[test]
fn test_arc_to_rounds_corner() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.set_line_width(2.0);
    ctx.move_to(10.0, 10.0);
    ctx.arc_to(&ArcToParams {
        x1: 90.0,
        y1: 10.0,
        x2: 90.0,
        y2: 90.0,
        radius: 30.0,
    });
    ctx.line_to(90.0, 90.0);
    ctx.stroke();

    // The sharp corner is cut off.
    assert!(is_transparent(rgba(&ctx, 89, 11)));
    // The arc passes through center + r * (cos 45, sin 45) off the corner.
    let d = 30.0 * (1.0 - std::f32::consts::FRAC_1_SQRT_2);
    let (x, y) = ((90.0 - d) as u32, (10.0 + d) as u32);
    assert!(rgba(&ctx, x, y)[3] > 0);
}

#[test]
fn test_arc_to_collinear_draws_line() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.move_to(10.0, 50.0);
    ctx.arc_to(&ArcToParams {
        x1: 50.0,
        y1: 50.0,
        x2: 90.0,
        y2: 50.0,
        radius: 20.0,
    });
    assert_eq!(ctx.current_point(), Some((50.0, 50.0)));
}
