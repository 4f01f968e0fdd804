//! Global alpha, composite operations, and clipping.

use super::common::*;

#[test]
fn test_global_alpha_applied_once() {
    let mut ctx = filled_context(20, 20, RED);
    ctx.set_global_alpha(0.5);
    ctx.set_fill_style(BLUE);
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 10.0, 10.0));

    assert_rgba_near(rgba(&ctx, 5, 5), [128, 0, 127, 255], 1);
    assert_eq!(rgba(&ctx, 15, 15), [255, 0, 0, 255]);
}

#[test]
fn test_global_alpha_applied_once_with_shadow() {
    let mut ctx = filled_context(40, 40, RED);
    ctx.set_global_alpha(0.5);
    ctx.set_shadow_color(BLACK);
    ctx.set_shadow_offset_x(20.0);
    ctx.set_fill_style(BLUE);
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 10.0, 10.0));

    // The primary still lands at half strength.
    assert_rgba_near(rgba(&ctx, 5, 5), [128, 0, 127, 255], 1);
    // So does its shadow.
    assert_rgba_near(rgba(&ctx, 25, 5), [128, 0, 0, 255], 1);
}

#[test]
fn test_global_alpha_on_path_fill() {
    let mut ctx = filled_context(20, 20, WHITE);
    ctx.set_global_alpha(0.5);
    ctx.set_fill_style(BLACK);
    ctx.rect(&RectParams::new(0.0, 0.0, 10.0, 10.0));
    ctx.fill();

    assert_rgba_near(rgba(&ctx, 5, 5), [128, 128, 128, 255], 1);
}

#[test]
fn test_destination_over_draws_behind() {
    let mut ctx = Context2d::new(20, 20).unwrap();
    ctx.set_fill_style(RED);
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 10.0, 10.0));
    ctx.set_global_composite_operation(CompositeOperation::DestinationOver);
    ctx.set_fill_style(BLUE);
    ctx.fill_rect(&RectParams::new(5.0, 5.0, 10.0, 10.0));

    assert_eq!(rgba(&ctx, 7, 7), [255, 0, 0, 255]);
    assert_eq!(rgba(&ctx, 12, 12), [0, 0, 255, 255]);
}

#[test]
fn test_destination_in_clears_outside_source() {
    let mut ctx = filled_context(20, 20, RED);
    ctx.set_global_composite_operation(CompositeOperation::DestinationIn);
    ctx.fill_rect(&RectParams::new(5.0, 5.0, 10.0, 10.0));

    assert_eq!(rgba(&ctx, 10, 10), [255, 0, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 2, 2)));
    assert!(is_transparent(rgba(&ctx, 17, 17)));
}

#[test]
fn test_source_in_on_path_fill_keeps_outside() {
    // Path fills resolve the operator per pixel of the path only.
    let mut ctx = filled_context(20, 20, RED);
    ctx.set_global_composite_operation(CompositeOperation::SourceIn);
    ctx.set_fill_style(BLUE);
    ctx.rect(&RectParams::new(5.0, 5.0, 10.0, 10.0));
    ctx.fill();

    assert_eq!(rgba(&ctx, 10, 10), [0, 0, 255, 255]);
    assert_eq!(rgba(&ctx, 2, 2), [255, 0, 0, 255]);
}

#[test]
fn test_lighter_adds_colors() {
    let mut ctx = filled_context(10, 10, RED);
    ctx.set_global_composite_operation(CompositeOperation::Lighter);
    ctx.set_fill_style(BLUE);
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(rgba(&ctx, 5, 5), [255, 0, 255, 255]);
}

#[test]
fn test_composite_name_round_trip() {
    let op: CompositeOperation = "multiply".parse().unwrap();
    let mut ctx = Context2d::new(10, 10).unwrap();
    ctx.set_global_composite_operation(op);
    assert_eq!(ctx.get_global_composite_operation().to_string(), "multiply");
    assert!("plus-lighter".parse::<CompositeOperation>().is_err());
}

#[test]
fn test_nested_clips_intersect() {
    let mut ctx = Context2d::new(40, 40).unwrap();
    ctx.rect(&RectParams::new(0.0, 0.0, 20.0, 40.0));
    ctx.clip();
    ctx.begin_path();
    ctx.rect(&RectParams::new(0.0, 0.0, 40.0, 20.0));
    ctx.clip();
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 40.0, 40.0));

    assert_eq!(rgba(&ctx, 10, 10), [0, 0, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 30, 10)));
    assert!(is_transparent(rgba(&ctx, 10, 30)));
}

#[test]
fn test_clip_restored_with_state() {
    let mut ctx = Context2d::new(40, 40).unwrap();
    ctx.save();
    ctx.rect(&RectParams::new(0.0, 0.0, 10.0, 10.0));
    ctx.clip();
    ctx.restore();
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 40.0, 40.0));
    assert_eq!(rgba(&ctx, 30, 30), [0, 0, 0, 255]);
}

#[test]
fn test_even_odd_clip() {
    let mut ctx = Context2d::new(40, 40).unwrap();
    ctx.rect(&RectParams::new(0.0, 0.0, 40.0, 40.0));
    ctx.rect(&RectParams::new(10.0, 10.0, 20.0, 20.0));
    ctx.clip_with_rule(CanvasFillRule::EvenOdd);
    ctx.fill_rect(&RectParams::new(0.0, 0.0, 40.0, 40.0));

    assert_eq!(rgba(&ctx, 5, 5), [0, 0, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 20, 20)));
}

#[test]
fn test_clear_rect_respects_clip() {
    let mut ctx = filled_context(40, 40, RED);
    ctx.rect(&RectParams::new(0.0, 0.0, 20.0, 40.0));
    ctx.clip();
    ctx.clear_rect(&RectParams::new(0.0, 0.0, 40.0, 40.0));

    assert!(is_transparent(rgba(&ctx, 10, 10)));
    assert_eq!(rgba(&ctx, 30, 10), [255, 0, 0, 255]);
}
