//! Linear and radial gradient brushes.

use super::common::*;

fn red_to_blue() -> [GradientStop; 2] {
    [GradientStop::new(0.0, RED), GradientStop::new(1.0, BLUE)]
}

fn horizontal(x0: f32, x1: f32) -> LinearGradientParams {
    LinearGradientParams {
        x0,
        y0: 0.0,
        x1,
        y1: 0.0,
    }
}

#[test]
fn test_linear_gradient_interpolates() {
    let mut ctx = Context2d::new(100, 10).unwrap();
    assert!(ctx.set_linear_gradient_shader(&horizontal(0.0, 100.0), &red_to_blue()));
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 100.0, 10.0));

    let left = rgba(&ctx, 0, 5);
    let mid = rgba(&ctx, 50, 5);
    let right = rgba(&ctx, 99, 5);
    assert!(left[0] > 240 && left[2] < 15, "{left:?}");
    assert!(right[2] > 240 && right[0] < 15, "{right:?}");
    assert_rgba_near(mid, [127, 0, 128, 255], 4);
}

#[test]
fn test_linear_gradient_repeats_past_end() {
    let mut ctx = Context2d::new(200, 10).unwrap();
    ctx.set_linear_gradient_shader(&horizontal(0.0, 100.0), &red_to_blue());
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 200.0, 10.0));

    // 110 wraps to 10, which is still mostly red.
    let wrapped = rgba(&ctx, 110, 5);
    assert!(wrapped[0] > 200, "{wrapped:?}");
}

#[test]
fn test_gradient_follows_transform_at_paint_time() {
    let mut ctx = Context2d::new(200, 10).unwrap();
    ctx.set_linear_gradient_shader(&horizontal(0.0, 100.0), &red_to_blue());
    ctx.translate(100.0, 0.0);
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 100.0, 10.0));

    let start = rgba(&ctx, 101, 5);
    assert!(start[0] > 240, "{start:?}");
    assert!(is_transparent(rgba(&ctx, 50, 5)));
}

#[test]
fn test_unsorted_stops_are_sorted() {
    let mut ctx = Context2d::new(100, 10).unwrap();
    let stops = [GradientStop::new(1.0, BLUE), GradientStop::new(0.0, RED)];
    ctx.set_linear_gradient_shader(&horizontal(0.0, 100.0), &stops);
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 100.0, 10.0));
    assert!(rgba(&ctx, 1, 5)[0] > 240);
}

#[test]
fn test_single_stop_leaves_fill_unchanged() {
    let mut ctx = Context2d::new(20, 20).unwrap();
    ctx.set_fill_style(RED);
    assert!(!ctx.set_linear_gradient_shader(&horizontal(0.0, 10.0), &[GradientStop::new(0.5, BLUE)]));
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 20.0, 20.0));
    assert_eq!(rgba(&ctx, 10, 10), [255, 0, 0, 255]);
}

#[test]
fn test_radial_gradient_center_to_edge() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    let stops = [GradientStop::new(0.0, BLACK), GradientStop::new(1.0, WHITE)];
    assert!(ctx.set_radial_gradient_shader(
        &RadialGradientParams {
            x0: 50.0,
            y0: 50.0,
            r0: 0.0,
            x1: 50.0,
            y1: 50.0,
            r1: 40.0,
        },
        &stops,
    ));
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 100.0, 100.0));

    assert!(rgba(&ctx, 50, 50)[0] < 10);
    let half = rgba(&ctx, 70, 50)[0];
    assert!((110..150).contains(&half), "{half}");
    // Clamped past r1.
    assert!(rgba(&ctx, 95, 50)[0] > 245);
}

#[test]
fn test_radial_inner_radius_holds_first_stop() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    let stops = [GradientStop::new(0.0, BLACK), GradientStop::new(1.0, WHITE)];
    ctx.set_radial_gradient_shader(
        &RadialGradientParams {
            x0: 50.0,
            y0: 50.0,
            r0: 20.0,
            x1: 50.0,
            y1: 50.0,
            r1: 40.0,
        },
        &stops,
    );
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 100.0, 100.0));

    // Inside r0 the first stop color holds.
    assert!(rgba(&ctx, 60, 50)[0] < 10);
    // Halfway between r0 and r1.
    let mid = rgba(&ctx, 80, 50)[0];
    assert!((110..150).contains(&mid), "{mid}");
}

#[test]
fn test_radial_rejects_non_positive_outer_radius() {
    let mut ctx = Context2d::new(10, 10).unwrap();
    let stops = [GradientStop::new(0.0, BLACK), GradientStop::new(1.0, WHITE)];
    assert!(!ctx.set_radial_gradient_shader(
        &RadialGradientParams {
            x0: 5.0,
            y0: 5.0,
            r0: 0.0,
            x1: 5.0,
            y1: 5.0,
            r1: 0.0,
        },
        &stops,
    ));
}

#[test]
fn test_gradient_with_global_alpha() {
    let mut ctx = Context2d::new(100, 10).unwrap();
    ctx.set_global_alpha(0.5);
    ctx.set_linear_gradient_shader(&horizontal(0.0, 100.0), &red_to_blue());
    ctx.rect(&RectParams::new(0.0, 0.0, 100.0, 10.0));
    ctx.fill();
    let alpha = rgba(&ctx, 50, 5)[3];
    assert!(alpha.abs_diff(128) <= 1, "{alpha}");
}
