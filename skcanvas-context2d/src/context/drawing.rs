//! Fill, stroke, clip, and paint helper operations for Context2d.

use super::Context2d;
use crate::drawing_state::ClipRegion;
use crate::geometry::RectParams;
use crate::shadow::{self, shadow_bounds};
use crate::style::{CanvasFillRule, FillStyle, LineCap, LineJoin};
use crate::surface::{self, draw_shadow_onto};
use std::f32::consts::SQRT_2;
use tiny_skia::{BlendMode, FillRule, IntRect, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Transform};

/// Grow `rect` by `d` on every side.
fn outset(rect: Rect, d: f32) -> Option<Rect> {
    Rect::from_ltrb(
        rect.left() - d,
        rect.top() - d,
        rect.right() + d,
        rect.bottom() + d,
    )
}

fn union(a: Rect, b: Rect) -> Option<Rect> {
    Rect::from_ltrb(
        a.left().min(b.left()),
        a.top().min(b.top()),
        a.right().max(b.right()),
        a.bottom().max(b.bottom()),
    )
}

impl Context2d {
    // --- Clipping ---

    /// Intersect the clip with the current path using the non-zero winding rule.
    pub fn clip(&mut self) {
        self.clip_with_rule(CanvasFillRule::NonZero);
    }

    /// Intersect the clip with the current path.
    ///
    /// The path is kept. Clipping with an empty path leaves nothing drawable
    /// until the state is restored.
    pub fn clip_with_rule(&mut self, fill_rule: CanvasFillRule) {
        log::debug!(target: "canvas", "clip {:?}", fill_rule);
        self.state.clip.push(ClipRegion {
            path: self.path.to_path(),
            fill_rule,
        });
    }

    pub(crate) fn clip_mask(&self) -> Option<Mask> {
        self.surface
            .clip_mask(&self.state.clip, self.config.anti_alias)
    }

    /// Whether the device-space point `(x, y)` is inside the current path.
    pub fn is_point_in_path(&self, x: f32, y: f32) -> bool {
        self.is_point_in_path_with_rule(x, y, CanvasFillRule::NonZero)
    }

    /// Whether the device-space point `(x, y)` is inside the current path
    /// under the given fill rule.
    pub fn is_point_in_path_with_rule(&self, x: f32, y: f32, fill_rule: CanvasFillRule) -> bool {
        match self.path.to_path() {
            Some(path) => surface::hit_test(&path, fill_rule.into(), x, y),
            None => false,
        }
    }

    // --- Path drawing ---

    /// Fill the current path using the non-zero winding rule.
    pub fn fill(&mut self) {
        self.fill_with_rule(CanvasFillRule::NonZero);
    }

    /// Fill the current path with the specified fill rule. The path is kept.
    pub fn fill_with_rule(&mut self, fill_rule: CanvasFillRule) {
        log::debug!(target: "canvas", "fill {:?}", fill_rule);
        let Some(path) = self.path.to_path() else {
            return;
        };
        let paint = self.paint_for(
            &self.state.fill_style,
            self.state.global_alpha,
            self.state.global_composite_operation.into(),
        );
        let rule: FillRule = fill_rule.into();
        let clip_mask = self.clip_mask();

        let shadow_paint = Paint {
            blend_mode: BlendMode::SourceOver,
            ..paint.clone()
        };
        self.draw_path_shadow(path.bounds(), clip_mask.as_ref(), |pixmap, ts| {
            pixmap.fill_path(&path, &shadow_paint, rule, ts, None);
        });
        self.surface
            .fill_path(&path, &paint, rule, clip_mask.as_ref());
    }

    /// Stroke the current path. The path is kept.
    pub fn stroke(&mut self) {
        log::debug!(target: "canvas", "stroke");
        let Some(path) = self.path.to_path() else {
            return;
        };
        let stroke = self.device_stroke();
        let paint = self.paint_for(
            &self.state.stroke_style,
            self.state.global_alpha,
            self.state.global_composite_operation.into(),
        );
        let clip_mask = self.clip_mask();

        if let Some(bounds) = outset(path.bounds(), self.stroke_outset(&stroke)) {
            let shadow_paint = Paint {
                blend_mode: BlendMode::SourceOver,
                ..paint.clone()
            };
            self.draw_path_shadow(bounds, clip_mask.as_ref(), |pixmap, ts| {
                pixmap.stroke_path(&path, &shadow_paint, &stroke, ts, None);
            });
        }
        self.surface
            .stroke_path(&path, &paint, &stroke, clip_mask.as_ref());
    }

    // --- Rectangle operations ---

    /// Fill a rectangle without touching the current path.
    pub fn fill_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "fillRect {:?}", params);
        let Some(path) = self.device_rect(params) else {
            return;
        };
        let paint = self.paint_for(&self.state.fill_style, 1.0, BlendMode::SourceOver);
        self.draw_layered(path.bounds(), |pixmap, ts| {
            pixmap.fill_path(&path, &paint, FillRule::Winding, ts, None);
        });
    }

    /// Stroke a rectangle without touching the current path.
    pub fn stroke_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "strokeRect {:?}", params);
        let Some(path) = self.device_rect(params) else {
            return;
        };
        let stroke = self.device_stroke();
        let paint = self.paint_for(&self.state.stroke_style, 1.0, BlendMode::SourceOver);
        let Some(bounds) = outset(path.bounds(), self.stroke_outset(&stroke)) else {
            return;
        };
        self.draw_layered(bounds, |pixmap, ts| {
            pixmap.stroke_path(&path, &paint, &stroke, ts, None);
        });
    }

    /// Clear a rectangle to transparent black, respecting only the clip.
    pub fn clear_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "clearRect {:?}", params);
        let Some(path) = self.device_rect(params) else {
            return;
        };
        let clip_mask = self.clip_mask();
        self.surface
            .clear_path(&path, self.config.anti_alias, clip_mask.as_ref());
    }

    /// Rectangle as a closed device-space path.
    fn device_rect(&self, params: &RectParams) -> Option<Path> {
        if !params.is_finite() {
            return None;
        }
        let [p0, p1, p2, p3] = params.corners().map(|(x, y)| self.transform_point(x, y));
        let mut pb = PathBuilder::new();
        pb.move_to(p0.x, p0.y);
        pb.line_to(p1.x, p1.y);
        pb.line_to(p2.x, p2.y);
        pb.line_to(p3.x, p3.y);
        pb.close();
        pb.finish()
    }

    // --- Paint helpers ---

    /// Build a device-space paint for `style`.
    ///
    /// Solid colors have `opacity` folded into their alpha; gradients get it
    /// applied to the shader.
    pub(crate) fn paint_for(
        &self,
        style: &FillStyle,
        opacity: f32,
        blend_mode: BlendMode,
    ) -> Paint<'static> {
        let mut paint = Paint {
            anti_alias: self.config.anti_alias,
            blend_mode,
            ..Default::default()
        };
        match style {
            FillStyle::Color(c) => {
                let mut color: tiny_skia::Color = (*c).into();
                color.set_alpha((color.alpha() * opacity).clamp(0.0, 1.0));
                paint.set_color(color);
            }
            FillStyle::Gradient(gradient) => {
                paint.shader = gradient.to_device(self.state.transform, opacity);
            }
        }
        paint
    }

    /// Stroke parameters with width and dashes scaled into device space.
    pub(crate) fn device_stroke(&self) -> tiny_skia::Stroke {
        let scale = self.state.average_scale();
        tiny_skia::Stroke {
            width: self.state.line_width * scale,
            line_cap: self.state.line_cap.into(),
            line_join: self.state.line_join.into(),
            miter_limit: self.state.miter_limit,
            dash: if self.state.line_dash.is_empty() {
                None
            } else {
                let scaled: Vec<f32> = self.state.line_dash.iter().map(|d| d * scale).collect();
                tiny_skia::StrokeDash::new(scaled, self.state.line_dash_offset * scale)
            },
        }
    }

    /// Conservative distance a stroke reaches past its path.
    fn stroke_outset(&self, stroke: &tiny_skia::Stroke) -> f32 {
        let join = if self.state.line_join == LineJoin::Miter {
            self.state.miter_limit.max(1.0)
        } else {
            1.0
        };
        let cap = if self.state.line_cap == LineCap::Square {
            SQRT_2
        } else {
            1.0
        };
        stroke.width / 2.0 * join.max(cap) + 1.0
    }

    // --- Shadows and layers ---

    /// Draw the shadow of a path operation directly onto the surface.
    fn draw_path_shadow(
        &mut self,
        bounds: Rect,
        clip_mask: Option<&Mask>,
        draw: impl FnOnce(&mut Pixmap, Transform),
    ) {
        let shadow = self.state.shadow;
        if !shadow.is_visible() {
            return;
        }
        if let Some(image) = shadow::render_shadow(&shadow, bounds, self.surface.bounds(), draw) {
            self.surface.draw_shadow(
                &image,
                self.state.global_composite_operation.into(),
                clip_mask,
            );
        }
    }

    /// Device area a layered draw must cover.
    fn layer_area(&self, source: Rect) -> Option<IntRect> {
        let surface_bounds = self.surface.bounds();
        if self.state.global_composite_operation.affects_outside_source() {
            return Some(surface_bounds);
        }
        let shadow = &self.state.shadow;
        let covered = match shadow_bounds(shadow, source) {
            Some(s) if shadow.is_visible() => union(source, s)?,
            _ => source,
        };
        outset(covered, 1.0)?
            .round_out()?
            .intersect(&surface_bounds)
    }

    /// Render shadow and primary into a transparent layer, then composite the
    /// layer once with the global alpha, composite operation, and clip.
    ///
    /// `draw` paints with source-over at full opacity; it receives the target
    /// pixmap and the transform from device space into it.
    pub(crate) fn draw_layered(&mut self, source: Rect, draw: impl Fn(&mut Pixmap, Transform)) {
        let Some(area) = self.layer_area(source) else {
            return;
        };
        let Some(mut layer) = self.surface.begin_layer(area) else {
            return;
        };
        let to_layer = layer.device_transform();

        let shadow = self.state.shadow;
        if shadow.is_visible() {
            if let Some(image) = shadow::render_shadow(&shadow, source, area, &draw) {
                draw_shadow_onto(&mut layer.pixmap, &image, BlendMode::SourceOver, to_layer, None);
            }
        }
        draw(&mut layer.pixmap, to_layer);

        let clip_mask = self.clip_mask();
        self.surface.composite_layer(
            &layer,
            self.state.global_alpha,
            self.state.global_composite_operation.into(),
            clip_mask.as_ref(),
        );
    }
}
