//! Gradient shader construction.
//!
//! Stops are consumed when the shader is built; only the immutable
//! `tiny_skia::Shader` is kept in the paint state.

use crate::geometry::{CanvasColor, LinearGradientParams, RadialGradientParams};
use tiny_skia::{Point, Shader, SpreadMode, Transform};

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Offset position, clamped to 0.0..=1.0 when the shader is built.
    pub offset: f32,
    /// Color at this stop.
    pub color: CanvasColor,
}

impl GradientStop {
    pub fn new(offset: f32, color: CanvasColor) -> Self {
        Self { offset, color }
    }
}

/// Type of gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
}

/// An immutable gradient shader in user space.
#[derive(Debug, Clone)]
pub struct GradientShader {
    kind: GradientKind,
    shader: Shader<'static>,
}

impl GradientShader {
    /// Build a repeating linear gradient. Returns `None` for fewer than two
    /// usable stops or degenerate geometry.
    pub fn linear(params: &LinearGradientParams, stops: &[GradientStop]) -> Option<Self> {
        let stops = prepare_stops(stops, |offset| offset)?;
        let shader = tiny_skia::LinearGradient::new(
            Point::from_xy(params.x0, params.y0),
            Point::from_xy(params.x1, params.y1),
            stops,
            SpreadMode::Repeat,
            Transform::identity(),
        )?;
        Some(Self {
            kind: GradientKind::Linear,
            shader,
        })
    }

    /// Build a clamped radial gradient.
    ///
    /// The rasterizer's two-point conical gradient starts from a zero radius,
    /// so a non-zero inner radius is expressed by remapping stop offsets onto
    /// `[r0 / r1, 1]`.
    pub fn radial(params: &RadialGradientParams, stops: &[GradientStop]) -> Option<Self> {
        let RadialGradientParams {
            x0,
            y0,
            r0,
            x1,
            y1,
            r1,
        } = *params;
        if !(r0.is_finite() && r1.is_finite()) || r0 < 0.0 || r1 <= 0.0 {
            return None;
        }
        let inner = (r0 / r1).min(1.0);
        let stops = prepare_stops(stops, |offset| inner + offset * (1.0 - inner))?;
        let shader = tiny_skia::RadialGradient::new(
            Point::from_xy(x0, y0),
            Point::from_xy(x1, y1),
            r1,
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        )?;
        Some(Self {
            kind: GradientKind::Radial,
            shader,
        })
    }

    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    /// The shader mapped into device space and faded by `opacity`.
    pub(crate) fn to_device(&self, transform: Transform, opacity: f32) -> Shader<'static> {
        let mut shader = self.shader.clone();
        shader.transform(transform);
        if opacity < 1.0 {
            shader.apply_opacity(opacity);
        }
        shader
    }
}

fn prepare_stops(
    stops: &[GradientStop],
    remap: impl Fn(f32) -> f32,
) -> Option<Vec<tiny_skia::GradientStop>> {
    let mut sorted: Vec<GradientStop> = stops
        .iter()
        .filter(|stop| stop.offset.is_finite())
        .copied()
        .collect();
    if sorted.len() < 2 {
        log::debug!(target: "canvas", "gradient needs at least 2 stops, got {}", sorted.len());
        return None;
    }
    // Stable, so equal offsets keep insertion order (hard color edges).
    sorted.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    Some(
        sorted
            .into_iter()
            .map(|stop| {
                tiny_skia::GradientStop::new(remap(stop.offset.clamp(0.0, 1.0)), stop.color.into())
            })
            .collect(),
    )
}
