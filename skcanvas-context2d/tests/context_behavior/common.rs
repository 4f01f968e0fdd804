//! Shared helpers for context behavior tests.

pub use skcanvas_context2d::{
    ArcParams, ArcToParams, CanvasColor, CanvasFillRule, CompositeOperation, Context2d,
    DirtyRect, EllipseParams, GradientStop, ImageCropParams, ImageData, LinearGradientParams,
    PathState, RadialGradientParams, RectParams,
};
pub use std::f32::consts::PI;

pub const RED: CanvasColor = CanvasColor::from_rgba8(255, 0, 0, 255);
pub const BLUE: CanvasColor = CanvasColor::from_rgba8(0, 0, 255, 255);
pub const BLACK: CanvasColor = CanvasColor::BLACK;
pub const WHITE: CanvasColor = CanvasColor::from_rgba8(255, 255, 255, 255);

/// Premultiplied RGBA at `(x, y)`.
pub fn rgba(ctx: &Context2d, x: u32, y: u32) -> [u8; 4] {
    let data = ctx.to_buffer();
    let idx = ((y * ctx.width() + x) * 4) as usize;
    [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
}

/// Assert every channel of `actual` is within `tolerance` of `expected`.
#[track_caller]
pub fn assert_rgba_near(actual: [u8; 4], expected: [u8; 4], tolerance: u8) {
    let close = actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance);
    assert!(
        close,
        "pixel {:?} differs from {:?} by more than {}",
        actual, expected, tolerance
    );
}

/// A context with an opaque background color.
pub fn filled_context(width: u32, height: u32, color: CanvasColor) -> Context2d {
    let mut ctx = Context2d::new(width, height).unwrap();
    ctx.set_fill_style(color);
    ctx.fill_rect(&RectParams::new(0.0, 0.0, width as f32, height as f32));
    ctx
}

pub fn is_transparent(pixel: [u8; 4]) -> bool {
    pixel[3] == 0
}
