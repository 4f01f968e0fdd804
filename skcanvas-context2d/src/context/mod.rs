//! Stateful 2D rendering context implementation.

mod drawing;
mod image_ops;
mod path_ops;
mod transform;

use crate::drawing_state::{DrawingState, ShadowState};
use crate::error::{Context2dError, Context2dResult};
use crate::geometry::{CanvasColor, LinearGradientParams, RadialGradientParams};
use crate::gradient::{GradientShader, GradientStop};
use crate::path::CanvasPath;
use crate::style::{CompositeOperation, FillStyle, LineCap, LineJoin};
use crate::surface::RasterSurface;
use std::fmt::Write as _;

/// Maximum surface dimension (same as Chrome).
pub const MAX_DIMENSION: u32 = 32767;

/// Context-wide settings fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextConfig {
    /// Anti-alias path edges, clips, and hit tests.
    pub anti_alias: bool,
    /// Largest accepted width or height.
    pub max_dimension: u32,
    /// Pixel density written by `to_png(None)`.
    pub default_ppi: f32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            anti_alias: true,
            max_dimension: MAX_DIMENSION,
            default_ppi: 72.0,
        }
    }
}

/// Builder for [`Context2d`].
#[derive(Debug, Clone)]
pub struct Context2dBuilder {
    width: u32,
    height: u32,
    config: ContextConfig,
}

impl Context2dBuilder {
    /// Create a new builder with specified dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            config: ContextConfig::default(),
        }
    }

    pub fn anti_alias(mut self, enabled: bool) -> Self {
        self.config.anti_alias = enabled;
        self
    }

    pub fn max_dimension(mut self, max: u32) -> Self {
        self.config.max_dimension = max;
        self
    }

    pub fn default_ppi(mut self, ppi: f32) -> Self {
        self.config.default_ppi = ppi;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the context.
    pub fn build(self) -> Context2dResult<Context2d> {
        Context2d::with_config(self.width, self.height, self.config)
    }
}

/// A stateful 2D rendering context over a raster surface.
///
/// Path points are transformed into device space as they are appended, so
/// later transform changes never move geometry already in the path.
pub struct Context2d {
    /// Backing pixel buffer.
    pub(crate) surface: RasterSurface,
    pub(crate) config: ContextConfig,
    /// Current drawing state.
    pub(crate) state: DrawingState,
    /// Stack of saved drawing states.
    state_stack: Vec<DrawingState>,
    /// Current path, in device space.
    pub(crate) path: CanvasPath,
}

impl Context2d {
    /// Create a new context with the default configuration.
    pub fn new(width: u32, height: u32) -> Context2dResult<Self> {
        Self::with_config(width, height, ContextConfig::default())
    }

    /// Create a new builder for more configuration options.
    pub fn builder(width: u32, height: u32) -> Context2dBuilder {
        Context2dBuilder::new(width, height)
    }

    fn with_config(width: u32, height: u32, config: ContextConfig) -> Context2dResult<Self> {
        log::debug!(target: "canvas", "new {}x{}", width, height);
        Self::check_dimensions(width, height, &config)?;
        Ok(Self {
            surface: RasterSurface::new(width, height)?,
            config,
            state: DrawingState::default(),
            state_stack: Vec::new(),
            path: CanvasPath::new(),
        })
    }

    fn check_dimensions(width: u32, height: u32, config: &ContextConfig) -> Context2dResult<()> {
        if width == 0 || height == 0 || width > config.max_dimension || height > config.max_dimension
        {
            return Err(Context2dError::InvalidDimensions { width, height });
        }
        Ok(())
    }

    /// Get surface width.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Get surface height.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Replace the surface with a freshly allocated one.
    ///
    /// Prior pixels are discarded and the context returns to its initial
    /// state: default drawing state, empty save stack, empty path. On error
    /// the existing surface and state are left untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Context2dResult<()> {
        log::debug!(target: "canvas", "resize {}x{}", width, height);
        Self::check_dimensions(width, height, &self.config)?;
        let surface = RasterSurface::new(width, height)?;
        self.surface = surface;
        self.reset_state();
        Ok(())
    }

    /// Save the current drawing state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    /// Restore the previously saved drawing state. No-op on an empty stack.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    /// Number of saved states.
    pub fn save_depth(&self) -> usize {
        self.state_stack.len()
    }

    /// Reset the context to its default state.
    ///
    /// This clears the surface to transparent, resets all drawing state,
    /// empties the state stack, and discards the path.
    pub fn reset(&mut self) {
        log::debug!(target: "canvas", "reset");
        self.surface.clear();
        self.reset_state();
    }

    fn reset_state(&mut self) {
        self.state = DrawingState::default();
        self.state_stack.clear();
        self.path.clear();
    }

    /// Human-readable summary of the transform, save stack, and path.
    pub fn dump_state(&self) -> String {
        let t = &self.state.transform;
        let mut out = String::new();
        let _ = writeln!(out, "surface: {}x{}", self.width(), self.height());
        let _ = writeln!(
            out,
            "transform: [{}, {}, {}, {}, {}, {}]",
            t.sx, t.ky, t.kx, t.sy, t.tx, t.ty
        );
        let _ = writeln!(out, "save depth: {}", self.state_stack.len());
        let _ = writeln!(out, "path: {}", self.path);
        let _ = writeln!(out, "clip regions: {}", self.state.clip.len());
        let _ = writeln!(
            out,
            "global alpha: {}, composite: {}",
            self.state.global_alpha, self.state.global_composite_operation
        );
        let fill = match &self.state.fill_style {
            FillStyle::Color(c) => format!("color({}, {}, {}, {})", c.r, c.g, c.b, c.a),
            FillStyle::Gradient(g) => format!("{:?} gradient", g.kind()),
        };
        let _ = write!(out, "fill: {}", fill);
        log::debug!(target: "canvas", "dumpState\n{}", out);
        out
    }

    // --- Style setters ---

    /// Set a solid fill color, dropping any installed gradient.
    pub fn set_fill_style(&mut self, color: CanvasColor) {
        log::debug!(target: "canvas", "setFillStyle {:?}", color);
        self.state.fill_style = FillStyle::Color(color);
    }

    pub fn get_fill_style(&self) -> &FillStyle {
        &self.state.fill_style
    }

    /// Set a solid stroke color.
    pub fn set_stroke_style(&mut self, color: CanvasColor) {
        log::debug!(target: "canvas", "setStrokeStyle {:?}", color);
        self.state.stroke_style = FillStyle::Color(color);
    }

    pub fn get_stroke_style(&self) -> &FillStyle {
        &self.state.stroke_style
    }

    /// Install a repeating linear gradient as the fill brush.
    ///
    /// Returns `false`, leaving the fill unchanged, when fewer than two stops
    /// are given or the geometry is degenerate.
    pub fn set_linear_gradient_shader(
        &mut self,
        params: &LinearGradientParams,
        stops: &[GradientStop],
    ) -> bool {
        log::debug!(target: "canvas", "setLinearGradientShader {:?} ({} stops)", params, stops.len());
        self.install_gradient(GradientShader::linear(params, stops))
    }

    /// Install a clamped radial gradient as the fill brush.
    ///
    /// Returns `false`, leaving the fill unchanged, when fewer than two stops
    /// are given or `r1 <= 0`.
    pub fn set_radial_gradient_shader(
        &mut self,
        params: &RadialGradientParams,
        stops: &[GradientStop],
    ) -> bool {
        log::debug!(target: "canvas", "setRadialGradientShader {:?} ({} stops)", params, stops.len());
        self.install_gradient(GradientShader::radial(params, stops))
    }

    fn install_gradient(&mut self, shader: Option<GradientShader>) -> bool {
        match shader {
            Some(shader) => {
                self.state.fill_style = FillStyle::Gradient(shader);
                true
            }
            None => {
                log::debug!(target: "canvas", "gradient not installed");
                false
            }
        }
    }

    /// Set the line width. Non-positive and non-finite values are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        log::debug!(target: "canvas", "setLineWidth {}", width);
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    pub fn get_line_width(&self) -> f32 {
        self.state.line_width
    }

    /// Set the line cap style.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        log::debug!(target: "canvas", "setLineCap {:?}", cap);
        self.state.line_cap = cap;
    }

    pub fn get_line_cap(&self) -> LineCap {
        self.state.line_cap
    }

    /// Set the line join style.
    pub fn set_line_join(&mut self, join: LineJoin) {
        log::debug!(target: "canvas", "setLineJoin {:?}", join);
        self.state.line_join = join;
    }

    pub fn get_line_join(&self) -> LineJoin {
        self.state.line_join
    }

    /// Set the miter limit. Non-positive and non-finite values are ignored.
    pub fn set_miter_limit(&mut self, limit: f32) {
        log::debug!(target: "canvas", "setMiterLimit {}", limit);
        if limit.is_finite() && limit > 0.0 {
            self.state.miter_limit = limit;
        }
    }

    pub fn get_miter_limit(&self) -> f32 {
        self.state.miter_limit
    }

    /// Set the line dash pattern.
    ///
    /// Any negative or non-finite entry rejects the whole call. Odd-length
    /// lists are repeated to make them even.
    pub fn set_line_dash(&mut self, mut segments: Vec<f32>) {
        log::debug!(target: "canvas", "setLineDash {:?}", segments);
        if segments.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return;
        }
        if segments.len() % 2 == 1 {
            segments.extend_from_within(..);
        }
        self.state.line_dash = segments;
    }

    /// Get the current line dash pattern.
    pub fn get_line_dash(&self) -> &[f32] {
        &self.state.line_dash
    }

    /// Set the line dash offset. Non-finite values are ignored.
    pub fn set_line_dash_offset(&mut self, offset: f32) {
        log::debug!(target: "canvas", "setLineDashOffset {}", offset);
        if offset.is_finite() {
            self.state.line_dash_offset = offset;
        }
    }

    pub fn get_line_dash_offset(&self) -> f32 {
        self.state.line_dash_offset
    }

    /// Set whether image smoothing is enabled.
    pub fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        log::debug!(target: "canvas", "setImageSmoothingEnabled {}", enabled);
        self.state.image_smoothing_enabled = enabled;
    }

    /// Get whether image smoothing is enabled.
    pub fn get_image_smoothing_enabled(&self) -> bool {
        self.state.image_smoothing_enabled
    }

    // --- Compositing ---

    /// Set the global alpha, clamped to `0.0..=1.0`. NaN is ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        log::debug!(target: "canvas", "setGlobalAlpha {}", alpha);
        if !alpha.is_nan() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Set the global alpha from its 0-255 integer form.
    pub fn set_global_alpha_u8(&mut self, alpha: u8) {
        self.set_global_alpha(alpha as f32 / 255.0);
    }

    pub fn get_global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    pub fn set_global_composite_operation(&mut self, op: CompositeOperation) {
        log::debug!(target: "canvas", "setGlobalCompositeOperation {}", op);
        self.state.global_composite_operation = op;
    }

    pub fn get_global_composite_operation(&self) -> CompositeOperation {
        self.state.global_composite_operation
    }

    // --- Shadows ---

    /// Set the horizontal shadow offset in device pixels. Non-finite values are ignored.
    pub fn set_shadow_offset_x(&mut self, offset: f32) {
        log::debug!(target: "canvas", "setShadowOffsetX {}", offset);
        if offset.is_finite() {
            self.state.shadow.offset_x = offset;
        }
    }

    /// Set the vertical shadow offset in device pixels. Non-finite values are ignored.
    pub fn set_shadow_offset_y(&mut self, offset: f32) {
        log::debug!(target: "canvas", "setShadowOffsetY {}", offset);
        if offset.is_finite() {
            self.state.shadow.offset_y = offset;
        }
    }

    /// Set the shadow blur. Negative and non-finite values are ignored.
    pub fn set_shadow_blur(&mut self, blur: f32) {
        log::debug!(target: "canvas", "setShadowBlur {}", blur);
        if blur.is_finite() && blur >= 0.0 {
            self.state.shadow.blur = blur;
        }
    }

    pub fn set_shadow_color(&mut self, color: CanvasColor) {
        log::debug!(target: "canvas", "setShadowColor {:?}", color);
        self.state.shadow.color = color;
    }

    pub fn get_shadow_offset_x(&self) -> f32 {
        self.state.shadow.offset_x
    }

    pub fn get_shadow_offset_y(&self) -> f32 {
        self.state.shadow.offset_y
    }

    pub fn get_shadow_blur(&self) -> f32 {
        self.state.shadow.blur
    }

    pub fn get_shadow_color(&self) -> CanvasColor {
        self.state.shadow.color
    }

    /// Current shadow parameters.
    pub fn shadow(&self) -> &ShadowState {
        &self.state.shadow
    }
}
