//! Pixel readback, raw writes, and image buffer drawing.

use super::common::*;

fn checker_2x2() -> ImageData {
    #[rustfmt::skip]
    let data = vec![
        255, 0, 0, 255,   0, 255, 0, 255,
        0, 0, 255, 255,   255, 255, 255, 255,
    ];
    ImageData::new(2, 2, data).unwrap()
}

#[test]
fn test_get_image_data_intersects_surface() {
    let ctx = Context2d::new(100, 100).unwrap();
    let data = ctx.get_image_data(90, 90, 50, 50).unwrap();
    assert_eq!((data.width, data.height), (10, 10));
    assert_eq!(data.data.len(), 10 * 10 * 4);
}

#[test]
fn test_get_image_data_outside_is_none() {
    let ctx = Context2d::new(100, 100).unwrap();
    assert!(ctx.get_image_data(100, 0, 10, 10).is_none());
    assert!(ctx.get_image_data(-10, -10, 10, 10).is_none());
    assert!(ctx.get_image_data(0, 0, 0, 10).is_none());
}

#[test]
fn test_put_then_get_round_trip() {
    let mut ctx = Context2d::new(10, 10).unwrap();
    let image = checker_2x2();
    ctx.put_image_data(&image, 4, 4);
    assert_eq!(ctx.get_image_data(4, 4, 2, 2).unwrap(), image);
}

#[test]
fn test_put_image_data_partially_offscreen() {
    let mut ctx = Context2d::new(10, 10).unwrap();
    ctx.put_image_data(&checker_2x2(), -1, 9);
    // Only the top-right source pixel lands, at (0, 9).
    assert_eq!(rgba(&ctx, 0, 9), [0, 255, 0, 255]);
    assert!(is_transparent(rgba(&ctx, 1, 9)));
}

#[test]
fn test_put_image_data_clamps_to_alpha() {
    let mut ctx = Context2d::new(4, 4).unwrap();
    let image = ImageData::new(1, 1, vec![255, 200, 10, 100]).unwrap();
    ctx.put_image_data(&image, 0, 0);
    assert_eq!(rgba(&ctx, 0, 0), [100, 100, 10, 100]);
}

#[test]
fn test_put_image_data_negative_dirty_extent() {
    let mut ctx = Context2d::new(10, 10).unwrap();
    let dirty = DirtyRect {
        x: 2,
        y: 2,
        width: -1,
        height: -1,
    };
    ctx.put_image_data_dirty(&checker_2x2(), 0, 0, &dirty);
    // Normalizes to the single pixel at (1, 1).
    assert_eq!(rgba(&ctx, 1, 1), [255, 255, 255, 255]);
    assert!(is_transparent(rgba(&ctx, 0, 0)));
}

#[test]
fn test_get_pixel_unpremultiplies() {
    let mut ctx = Context2d::new(4, 4).unwrap();
    let image = ImageData::new(1, 1, vec![64, 0, 0, 128]).unwrap();
    ctx.put_image_data(&image, 2, 2);
    let pixel = ctx.get_pixel(2, 2).unwrap();
    assert!(pixel.r.abs_diff(128) <= 1);
    assert_eq!(pixel.a, 128);
}

#[test]
fn test_draw_image_buffer_nearest_upscale() {
    let mut ctx = Context2d::new(20, 20).unwrap();
    ctx.set_image_smoothing_enabled(false);
    let image = checker_2x2();
    ctx.draw_image_buffer(
        &image.as_image_ref(),
        &ImageCropParams {
            sx: 0.0,
            sy: 0.0,
            sw: 2.0,
            sh: 2.0,
            dx: 0.0,
            dy: 0.0,
            dw: 20.0,
            dh: 20.0,
        },
    );
    assert_eq!(rgba(&ctx, 5, 5), [255, 0, 0, 255]);
    assert_eq!(rgba(&ctx, 15, 5), [0, 255, 0, 255]);
    assert_eq!(rgba(&ctx, 5, 15), [0, 0, 255, 255]);
    assert_eq!(rgba(&ctx, 15, 15), [255, 255, 255, 255]);
}

#[test]
fn test_draw_image_buffer_crops_source() {
    let mut ctx = Context2d::new(20, 20).unwrap();
    ctx.set_image_smoothing_enabled(false);
    let image = checker_2x2();
    // Only the bottom-right pixel, stretched over a 10x10 area.
    ctx.draw_image_buffer(
        &image.as_image_ref(),
        &ImageCropParams {
            sx: 1.0,
            sy: 1.0,
            sw: 1.0,
            sh: 1.0,
            dx: 5.0,
            dy: 5.0,
            dw: 10.0,
            dh: 10.0,
        },
    );
    assert_eq!(rgba(&ctx, 10, 10), [255, 255, 255, 255]);
    assert!(is_transparent(rgba(&ctx, 3, 3)));
    assert!(is_transparent(rgba(&ctx, 16, 16)));
}

#[test]
fn test_draw_image_buffer_global_alpha_and_transform() {
    let mut ctx = Context2d::new(40, 40).unwrap();
    ctx.set_global_alpha(0.5);
    ctx.translate(20.0, 20.0);
    let image = ImageData::new(1, 1, vec![0, 0, 255, 255]).unwrap();
    ctx.draw_image_buffer(
        &image.as_image_ref(),
        &ImageCropParams {
            sx: 0.0,
            sy: 0.0,
            sw: 1.0,
            sh: 1.0,
            dx: 0.0,
            dy: 0.0,
            dw: 10.0,
            dh: 10.0,
        },
    );
    assert!(is_transparent(rgba(&ctx, 10, 10)));
    let pixel = rgba(&ctx, 25, 25);
    assert!(pixel[3].abs_diff(128) <= 1, "{pixel:?}");
    assert_eq!(pixel[2], pixel[3]);
}
