//! Transforms apply when geometry is appended, not when it is drawn.

use super::common::*;

#[test]
fn test_line_points_bake_with_active_transform() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.move_to(0.0, 0.0);
    ctx.line_to(10.0, 0.0);
    ctx.scale(2.0, 2.0);
    ctx.line_to(20.0, 0.0);

    // First two points at 1x, the third at 2x.
    assert_eq!(ctx.current_point(), Some((40.0, 0.0)));
    assert_eq!(ctx.path_bounds(), Some([0.0, 0.0, 40.0, 0.0]));
}

#[test]
fn test_fill_after_transform_change_uses_baked_geometry() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.set_fill_style(RED);
    ctx.rect(&RectParams::new(10.0, 10.0, 20.0, 20.0));
    ctx.scale(3.0, 3.0);
    ctx.fill();

    assert_eq!(rgba(&ctx, 20, 20), [255, 0, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 70, 70)));
}

#[test]
fn test_restore_does_not_move_existing_path() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.save();
    ctx.translate(50.0, 50.0);
    ctx.rect(&RectParams::new(0.0, 0.0, 10.0, 10.0));
    ctx.restore();
    ctx.fill();

    assert_eq!(rgba(&ctx, 55, 55), [0, 0, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 5, 5)));
}

#[test]
fn test_fill_rect_uses_current_transform() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.translate(50.0, 0.0);
    ctx.rotate(PI / 2.0);
    // Rotated a quarter turn, +x user points down and +y points left.
    ctx.fill_rect(&RectParams::new(10.0, 0.0, 20.0, 10.0));

    assert_eq!(rgba(&ctx, 45, 20), [0, 0, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 55, 20)));
}

#[test]
fn test_reset_matrix_keeps_stack() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.translate(5.0, 5.0);
    ctx.save();
    ctx.scale(2.0, 2.0);
    ctx.reset_matrix();
    ctx.move_to(1.0, 1.0);
    assert_eq!(ctx.current_point(), Some((1.0, 1.0)));

    ctx.restore();
    ctx.move_to(1.0, 1.0);
    assert_eq!(ctx.current_point(), Some((6.0, 6.0)));
}

#[test]
fn test_restore_on_fresh_context() {
    let mut ctx = Context2d::new(10, 10).unwrap();
    ctx.restore();
    ctx.restore();
    assert_eq!(ctx.get_transform(), skcanvas_context2d::DOMMatrix::identity());
}

#[test]
fn test_stroke_width_follows_transform_at_stroke_time() {
    let mut ctx = Context2d::new(100, 100).unwrap();
    ctx.set_line_width(2.0);
    ctx.move_to(10.0, 50.0);
    ctx.line_to(90.0, 50.0);
    ctx.scale(5.0, 5.0);
    ctx.stroke();

    // 2 user units at 5x is a 10px line centered on y = 50.
    assert_eq!(rgba(&ctx, 50, 46)[3], 255);
    assert!(is_transparent(rgba(&ctx, 50, 57)));
}
