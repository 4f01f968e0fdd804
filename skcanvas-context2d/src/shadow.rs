//! Shadow rasterization: coverage capture, colorization, and gaussian blur.

use crate::drawing_state::ShadowState;
use tiny_skia::{IntRect, Pixmap, PremultipliedColorU8, Rect, Transform};

/// A rendered shadow ready to be composited at `(x, y)` in device space.
pub(crate) struct ShadowImage {
    pub pixmap: Pixmap,
    pub x: f32,
    pub y: f32,
}

/// Device-space area a shadow occupies for geometry covering `bounds`.
pub(crate) fn shadow_bounds(shadow: &ShadowState, bounds: Rect) -> Option<Rect> {
    let extent = shadow.blur_extent();
    Rect::from_ltrb(
        bounds.left() + shadow.offset_x - extent,
        bounds.top() + shadow.offset_y - extent,
        bounds.right() + shadow.offset_x + extent,
        bounds.bottom() + shadow.offset_y + extent,
    )
}

/// Render the shadow of whatever `draw` paints.
///
/// `bounds` is the device-space area of the source geometry and `visible` the
/// device area the shadow may land in. `draw` receives a scratch pixmap and
/// the transform mapping device space into it. Returns `None` when the
/// shadow falls entirely outside `visible` or allocation fails.
pub(crate) fn render_shadow(
    shadow: &ShadowState,
    bounds: Rect,
    visible: IntRect,
    draw: impl FnOnce(&mut Pixmap, Transform),
) -> Option<ShadowImage> {
    let extent = shadow.blur_extent();
    // Source area whose shadow can reach `visible`, plus blur margin.
    let reach = Rect::from_ltrb(
        visible.left() as f32 - shadow.offset_x - extent,
        visible.top() as f32 - shadow.offset_y - extent,
        visible.right() as f32 - shadow.offset_x + extent,
        visible.bottom() as f32 - shadow.offset_y + extent,
    )?;
    let source = Rect::from_ltrb(
        bounds.left() - extent,
        bounds.top() - extent,
        bounds.right() + extent,
        bounds.bottom() + extent,
    )?;
    let area = source.intersect(&reach)?.round_out()?;

    let Some(mut pixmap) = Pixmap::new(area.width(), area.height()) else {
        log::error!(target: "canvas", "failed to allocate {}x{} shadow buffer", area.width(), area.height());
        return None;
    };
    draw(
        &mut pixmap,
        Transform::from_translate(-area.x() as f32, -area.y() as f32),
    );
    colorize_coverage(&mut pixmap, shadow);

    Some(ShadowImage {
        pixmap,
        x: area.x() as f32 + shadow.offset_x,
        y: area.y() as f32 + shadow.offset_y,
    })
}

/// Replace each pixel with the shadow color scaled by the blurred coverage.
fn colorize_coverage(pixmap: &mut Pixmap, shadow: &ShadowState) {
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let mut coverage: Vec<f32> = pixmap
        .pixels()
        .iter()
        .map(|p| p.alpha() as f32 / 255.0)
        .collect();

    let sigma = shadow.sigma();
    if sigma > 0.0 {
        let kernel = gaussian_kernel(sigma);
        gaussian_blur(&mut coverage, width, height, &kernel);
    }

    let color = shadow.color;
    let color_alpha = color.a as f32 / 255.0;
    for (pixel, cov) in pixmap.pixels_mut().iter_mut().zip(coverage) {
        let a = (cov * color_alpha).clamp(0.0, 1.0);
        let a8 = (a * 255.0).round() as u8;
        let premul = |c: u8| ((c as f32 * a).round() as u8).min(a8);
        *pixel = PremultipliedColorU8::from_rgba(premul(color.r), premul(color.g), premul(color.b), a8)
            .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }
}

/// Normalized 1D gaussian kernel of radius `ceil(3 * sigma)`.
pub(crate) fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| {
            let x = i as f32;
            (-(x * x) / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    if sum > 0.0 {
        kernel.iter_mut().for_each(|w| *w /= sum);
    }
    kernel
}

/// Separable blur over a single channel. Samples outside the buffer are zero.
pub(crate) fn gaussian_blur(values: &mut [f32], width: usize, height: usize, kernel: &[f32]) {
    let radius = (kernel.len() / 2) as isize;
    let mut scratch = vec![0.0f32; values.len()];

    // Horizontal pass
    for y in 0..height {
        let row = &values[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let sx = x as isize + k as isize - radius;
                if sx >= 0 && (sx as usize) < width {
                    acc += row[sx as usize] * w;
                }
            }
            scratch[y * width + x] = acc;
        }
    }

    // Vertical pass
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let sy = y as isize + k as isize - radius;
                if sy >= 0 && (sy as usize) < height {
                    acc += scratch[sy as usize * width + x] * w;
                }
            }
            values[y * width + x] = acc;
        }
    }
}
