//! Drawing state that can be saved and restored.

use crate::geometry::CanvasColor;
use crate::style::{CanvasFillRule, CompositeOperation, FillStyle, LineCap, LineJoin};
use tiny_skia::Transform;

/// Shadow parameters. Offsets and blur are in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowState {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub color: CanvasColor,
}

impl Default for ShadowState {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            blur: 0.0,
            color: CanvasColor::TRANSPARENT,
        }
    }
}

impl ShadowState {
    /// A shadow is drawn only when its color is visible and it is displaced
    /// or blurred.
    pub fn is_visible(&self) -> bool {
        !self.color.is_transparent()
            && (self.offset_x != 0.0 || self.offset_y != 0.0 || self.blur != 0.0)
    }

    /// Gaussian standard deviation for the configured blur.
    pub fn sigma(&self) -> f32 {
        self.blur / 2.0
    }

    /// Distance a blurred shadow spreads past its geometry, in pixels.
    pub fn blur_extent(&self) -> f32 {
        (3.0 * self.sigma()).ceil()
    }
}

/// A clip region recorded in device space. A `None` path clips everything.
#[derive(Debug, Clone)]
pub struct ClipRegion {
    pub path: Option<tiny_skia::Path>,
    pub fill_rule: CanvasFillRule,
}

/// Drawing state that can be saved and restored.
#[derive(Debug, Clone)]
pub struct DrawingState {
    /// Current fill style.
    pub fill_style: FillStyle,
    /// Current stroke style.
    pub stroke_style: FillStyle,
    /// Current line width, in user space.
    pub line_width: f32,
    /// Current line cap style.
    pub line_cap: LineCap,
    /// Current line join style.
    pub line_join: LineJoin,
    /// Current miter limit.
    pub miter_limit: f32,
    /// Current line dash pattern (always even length).
    pub line_dash: Vec<f32>,
    /// Current line dash offset.
    pub line_dash_offset: f32,
    /// Current global alpha, 0.0..=1.0.
    pub global_alpha: f32,
    /// Current global composite operation.
    pub global_composite_operation: CompositeOperation,
    /// Current shadow parameters.
    pub shadow: ShadowState,
    /// Current transform matrix.
    pub transform: Transform,
    /// Intersected clip regions, oldest first. Empty means unclipped.
    pub clip: Vec<ClipRegion>,
    /// Whether image smoothing is enabled.
    pub image_smoothing_enabled: bool,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_style: FillStyle::default(),
            stroke_style: FillStyle::default(),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            global_alpha: 1.0,
            global_composite_operation: CompositeOperation::SourceOver,
            shadow: ShadowState::default(),
            transform: Transform::identity(),
            clip: Vec::new(),
            image_smoothing_enabled: true,
        }
    }
}

impl DrawingState {
    /// Average axis scale of the current transform, used to map user-space
    /// stroke widths and dash lengths into device space.
    pub(crate) fn average_scale(&self) -> f32 {
        let t = &self.transform;
        ((t.sx * t.sx + t.ky * t.ky).sqrt() + (t.kx * t.kx + t.sy * t.sy).sqrt()) / 2.0
    }
}
