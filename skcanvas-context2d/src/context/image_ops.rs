//! Pixel I/O and image drawing operations for Context2d.

use super::path_ops::map_point;
use super::Context2d;
use crate::error::Context2dResult;
use crate::geometry::{CanvasColor, CanvasImageDataRef, DirtyRect, ImageCropParams, ImageData};
use tiny_skia::{FilterQuality, Paint, Pattern, PixmapRef, Rect, SpreadMode, Transform};

impl Context2d {
    /// Create a zeroed image buffer.
    pub fn create_image_data(&self, width: u32, height: u32) -> ImageData {
        log::debug!(target: "canvas", "createImageData {}x{}", width, height);
        ImageData::zeroed(width, height)
    }

    /// Copy a region of premultiplied pixels out of the surface.
    ///
    /// The region is intersected with the surface; an empty intersection
    /// yields `None`.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Option<ImageData> {
        log::debug!(target: "canvas", "getImageData {} {} {} {}", x, y, width, height);
        self.surface.read_pixels(x, y, width, height)
    }

    /// Write premultiplied pixels with their origin at `(dx, dy)`.
    ///
    /// Bypasses alpha, compositing, clip, and transform.
    pub fn put_image_data(&mut self, image: &ImageData, dx: i32, dy: i32) {
        let dirty = DirtyRect {
            x: 0,
            y: 0,
            width: image.width as i32,
            height: image.height as i32,
        };
        self.put_image_data_dirty(image, dx, dy, &dirty);
    }

    /// Write only the `dirty` region of `image`, positioned as if the whole
    /// image were placed at `(dx, dy)`.
    pub fn put_image_data_dirty(&mut self, image: &ImageData, dx: i32, dy: i32, dirty: &DirtyRect) {
        log::debug!(
            target: "canvas",
            "putImageData {}x{} at {} {} dirty {:?}",
            image.width,
            image.height,
            dx,
            dy,
            dirty
        );
        self.surface.write_pixels(image, dx, dy, dirty);
    }

    /// Draw the `src` rectangle of a premultiplied buffer into the `dest`
    /// rectangle under the current transform.
    ///
    /// A source rectangle reaching past the image is clipped, and the
    /// destination shrinks by the same proportion.
    pub fn draw_image_buffer(&mut self, image: &CanvasImageDataRef<'_>, params: &ImageCropParams) {
        log::debug!(target: "canvas", "drawImageBuffer {}x{} {:?}", image.width, image.height, params);
        let Some(source) = PixmapRef::from_bytes(image.data, image.width, image.height) else {
            log::warn!(
                target: "canvas",
                "drawImageBuffer: {} bytes is not a {}x{} image",
                image.data.len(),
                image.width,
                image.height
            );
            return;
        };
        let ImageCropParams {
            sx,
            sy,
            sw,
            sh,
            dx,
            dy,
            dw,
            dh,
        } = *params;
        if ![sx, sy, sw, sh, dx, dy, dw, dh].iter().all(|v| v.is_finite())
            || sw <= 0.0
            || sh <= 0.0
            || dw <= 0.0
            || dh <= 0.0
        {
            return;
        }

        // Clip the source rectangle to the image, carrying the change into
        // the destination.
        let (scale_x, scale_y) = (dw / sw, dh / sh);
        let left = sx.max(0.0);
        let top = sy.max(0.0);
        let right = (sx + sw).min(image.width as f32);
        let bottom = (sy + sh).min(image.height as f32);
        if right <= left || bottom <= top {
            return;
        }
        let dest_x = dx + (left - sx) * scale_x;
        let dest_y = dy + (top - sy) * scale_y;
        let Some(src_rect) = Rect::from_ltrb(left, top, right, bottom) else {
            return;
        };

        // Image space to device space.
        let image_transform = self
            .state
            .transform
            .pre_translate(dest_x, dest_y)
            .pre_scale(scale_x, scale_y)
            .pre_translate(-left, -top);

        let corners = [(left, top), (right, top), (right, bottom), (left, bottom)]
            .map(|(x, y)| map_point(&image_transform, x, y));
        let Some(bounds) = Rect::from_ltrb(
            corners.iter().map(|p| p.x).fold(f32::INFINITY, f32::min),
            corners.iter().map(|p| p.y).fold(f32::INFINITY, f32::min),
            corners.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max),
            corners.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max),
        ) else {
            return;
        };

        let quality = if self.state.image_smoothing_enabled {
            FilterQuality::Bilinear
        } else {
            FilterQuality::Nearest
        };
        let paint = Paint {
            anti_alias: self.config.anti_alias,
            shader: Pattern::new(source, SpreadMode::Pad, quality, 1.0, Transform::identity()),
            ..Default::default()
        };
        self.draw_layered(bounds, |pixmap, ts| {
            pixmap.fill_rect(src_rect, &paint, ts.pre_concat(image_transform), None);
        });
    }

    /// Raw premultiplied RGBA8888 copy of the whole surface.
    pub fn to_buffer(&self) -> Vec<u8> {
        self.surface.data().to_vec()
    }

    /// Encode the surface as PNG.
    ///
    /// `ppi` sets the pixel density chunk; `None` uses the configured default.
    pub fn to_png(&self, ppi: Option<f32>) -> Context2dResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(self.config.default_ppi);
        log::debug!(target: "canvas", "toPng ppi={}", ppi);
        self.surface.encode_png(ppi)
    }

    /// Straight-alpha color at `(x, y)`, or `None` outside the surface.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<CanvasColor> {
        self.surface.pixel(x, y)
    }
}
