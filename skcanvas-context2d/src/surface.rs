//! Raster surface adapter over a tiny-skia pixmap.
//!
//! Everything here works in device space. The context resolves transforms,
//! paints, and layer bounds before calling in.

use crate::drawing_state::ClipRegion;
use crate::error::{Context2dError, Context2dResult};
use crate::geometry::{CanvasColor, DirtyRect, ImageData};
use crate::shadow::ShadowImage;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, IntRect, Mask, Paint, Path, Pixmap, PixmapPaint, Stroke,
    Transform,
};

/// The context's backing pixel buffer.
#[derive(Debug, Clone)]
pub(crate) struct RasterSurface {
    pixmap: Pixmap,
    bounds: IntRect,
}

/// An offscreen transparency layer covering `bounds` in device space.
pub(crate) struct Layer {
    pub pixmap: Pixmap,
    pub bounds: IntRect,
}

impl Layer {
    /// Transform mapping device space into this layer.
    pub fn device_transform(&self) -> Transform {
        Transform::from_translate(-self.bounds.x() as f32, -self.bounds.y() as f32)
    }
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Context2dResult<Self> {
        let bounds = IntRect::from_xywh(0, 0, width, height)
            .ok_or(Context2dError::InvalidDimensions { width, height })?;
        let pixmap = Pixmap::new(width, height)
            .ok_or(Context2dError::AllocationFailed { width, height })?;
        Ok(Self { pixmap, bounds })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn bounds(&self) -> IntRect {
        self.bounds
    }

    /// Raw premultiplied RGBA8888 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Rasterize the clip stack into a coverage mask. `None` means unclipped.
    pub fn clip_mask(&self, clip: &[ClipRegion], anti_alias: bool) -> Option<Mask> {
        let (first, rest) = clip.split_first()?;
        let Some(mut mask) = Mask::new(self.width(), self.height()) else {
            log::error!(target: "canvas", "failed to allocate clip mask");
            return None;
        };
        if let Some(path) = &first.path {
            mask.fill_path(path, first.fill_rule.into(), anti_alias, Transform::identity());
        }
        for region in rest {
            let Some(mut next) = Mask::new(self.width(), self.height()) else {
                log::error!(target: "canvas", "failed to allocate clip mask");
                return None;
            };
            if let Some(path) = &region.path {
                next.fill_path(path, region.fill_rule.into(), anti_alias, Transform::identity());
            }
            for (dst, src) in mask.data_mut().iter_mut().zip(next.data()) {
                *dst = ((*dst as u16 * *src as u16 + 127) / 255) as u8;
            }
        }
        Some(mask)
    }

    pub fn fill_path(&mut self, path: &Path, paint: &Paint, rule: FillRule, mask: Option<&Mask>) {
        self.pixmap
            .fill_path(path, paint, rule, Transform::identity(), mask);
    }

    pub fn stroke_path(&mut self, path: &Path, paint: &Paint, stroke: &Stroke, mask: Option<&Mask>) {
        self.pixmap
            .stroke_path(path, paint, stroke, Transform::identity(), mask);
    }

    /// Set the area covered by `path` to transparent black.
    pub fn clear_path(&mut self, path: &Path, anti_alias: bool, mask: Option<&Mask>) {
        let paint = Paint {
            blend_mode: BlendMode::Clear,
            anti_alias,
            ..Default::default()
        };
        self.fill_path(path, &paint, FillRule::Winding, mask);
    }

    /// Allocate a transparent layer covering `bounds`.
    pub fn begin_layer(&self, bounds: IntRect) -> Option<Layer> {
        let Some(pixmap) = Pixmap::new(bounds.width(), bounds.height()) else {
            log::error!(target: "canvas", "failed to allocate {}x{} layer", bounds.width(), bounds.height());
            return None;
        };
        Some(Layer { pixmap, bounds })
    }

    /// Composite a finished layer once with the given opacity and blend mode.
    pub fn composite_layer(
        &mut self,
        layer: &Layer,
        opacity: f32,
        blend_mode: BlendMode,
        mask: Option<&Mask>,
    ) {
        let paint = PixmapPaint {
            opacity,
            blend_mode,
            quality: FilterQuality::Nearest,
        };
        self.pixmap.draw_pixmap(
            layer.bounds.x(),
            layer.bounds.y(),
            layer.pixmap.as_ref(),
            &paint,
            Transform::identity(),
            mask,
        );
    }

    /// Draw a rendered shadow onto the surface.
    pub fn draw_shadow(&mut self, shadow: &ShadowImage, blend_mode: BlendMode, mask: Option<&Mask>) {
        draw_shadow_onto(&mut self.pixmap, shadow, blend_mode, Transform::identity(), mask);
    }

    /// Copy a region out of the surface, intersected with its bounds.
    pub fn read_pixels(&self, x: i32, y: i32, width: u32, height: u32) -> Option<ImageData> {
        let (left, right) = clamp_span(x as i64, x as i64 + width as i64, self.width() as i64)?;
        let (top, bottom) = clamp_span(y as i64, y as i64 + height as i64, self.height() as i64)?;
        let stride = self.width() as usize * 4;
        let row_len = (right - left) * 4;
        let mut data = Vec::with_capacity(row_len * (bottom - top));
        for row in top..bottom {
            let start = row * stride + left * 4;
            data.extend_from_slice(&self.pixmap.data()[start..start + row_len]);
        }
        Some(ImageData {
            width: (right - left) as u32,
            height: (bottom - top) as u32,
            data,
        })
    }

    /// Write the `dirty` region of `image` so its origin lands at `(dx, dy)`.
    ///
    /// Bypasses compositing. The copy extent is clamped to both the source
    /// and the surface, and color channels are clamped to alpha so the
    /// surface stays validly premultiplied.
    pub fn write_pixels(&mut self, image: &ImageData, dx: i32, dy: i32, dirty: &DirtyRect) {
        let expected = image.width as usize * image.height as usize * 4;
        if image.data.len() != expected {
            log::warn!(
                target: "canvas",
                "putImageData: {} bytes is not a {}x{} image",
                image.data.len(),
                image.width,
                image.height
            );
            return;
        }

        // Source-space span covered by the dirty rect, the image, and the
        // surface shifted back by the destination origin.
        let (dx, dy) = (dx as i64, dy as i64);
        let (x0, x1) = normalize_span(dirty.x, dirty.width);
        let (y0, y1) = normalize_span(dirty.y, dirty.height);
        let x0 = x0.max(0).max(-dx);
        let y0 = y0.max(0).max(-dy);
        let x1 = x1.min(image.width as i64).min(self.width() as i64 - dx);
        let y1 = y1.min(image.height as i64).min(self.height() as i64 - dy);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width() as usize * 4;
        let src_stride = image.width as usize * 4;
        let data = self.pixmap.data_mut();
        for sy in y0..y1 {
            let ty = (sy + dy) as usize;
            for sx in x0..x1 {
                let tx = (sx + dx) as usize;
                let src = sy as usize * src_stride + sx as usize * 4;
                let dst = ty * stride + tx * 4;
                let a = image.data[src + 3];
                data[dst] = image.data[src].min(a);
                data[dst + 1] = image.data[src + 1].min(a);
                data[dst + 2] = image.data[src + 2].min(a);
                data[dst + 3] = a;
            }
        }
    }

    /// Straight-alpha color at `(x, y)`.
    pub fn pixel(&self, x: i32, y: i32) -> Option<CanvasColor> {
        if x < 0 || y < 0 {
            return None;
        }
        let c = self.pixmap.pixel(x as u32, y as u32)?.demultiply();
        Some(CanvasColor::from_rgba8(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Encode as PNG with straight alpha and a pHYs chunk for `ppi`.
    pub fn encode_png(&self, ppi: f32) -> Context2dResult<Vec<u8>> {
        let straight: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Pixel density in pixels per meter
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            writer.write_image_data(&straight)?;
        }
        Ok(buf)
    }
}

/// Intersect `[start, end)` with `[0, limit)` as usize bounds; `None` if empty.
fn clamp_span(start: i64, end: i64, limit: i64) -> Option<(usize, usize)> {
    let (start, end) = (start.max(0), end.min(limit));
    (start < end).then_some((start as usize, end as usize))
}

/// `[x, x + len)` with a negative `len` flipped to extend left of `x`.
fn normalize_span(x: i32, len: i32) -> (i64, i64) {
    let (x, len) = (x as i64, len as i64);
    if len < 0 {
        (x + len, x)
    } else {
        (x, x + len)
    }
}

/// Composite a rendered shadow into `target`, mapping device space with `ts`.
pub(crate) fn draw_shadow_onto(
    target: &mut Pixmap,
    shadow: &ShadowImage,
    blend_mode: BlendMode,
    ts: Transform,
    mask: Option<&Mask>,
) {
    let paint = PixmapPaint {
        opacity: 1.0,
        blend_mode,
        quality: FilterQuality::Bilinear,
    };
    target.draw_pixmap(
        0,
        0,
        shadow.pixmap.as_ref(),
        &paint,
        ts.pre_translate(shadow.x, shadow.y),
        mask,
    );
}

/// Whether device point `(x, y)` lies inside `path`, sampled at the pixel
/// center without anti-aliasing.
pub(crate) fn hit_test(path: &Path, rule: FillRule, x: f32, y: f32) -> bool {
    if !(x.is_finite() && y.is_finite()) {
        return false;
    }
    let Some(mut probe) = Mask::new(1, 1) else {
        return false;
    };
    probe.fill_path(path, rule, false, Transform::from_translate(0.5 - x, 0.5 - y));
    probe.data()[0] > 0
}
