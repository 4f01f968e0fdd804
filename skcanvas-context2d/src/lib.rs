//! Immediate-mode 2D rendering context over a tiny-skia raster surface.
//!
//! [`Context2d`] keeps a drawing state (transform, clip, paint and line
//! styles, compositing, shadows) with a save/restore stack, builds paths in
//! device space, and rasterizes fills, strokes, rectangles, and image buffers
//! into an RGBA8888 premultiplied surface. It uses:
//! - `tiny-skia` for rasterization, masks, and shaders
//! - `kurbo` for arc to cubic approximation
//! - `svgtypes` for SVG path data
//! - `csscolorparser` for CSS color strings
//!
//! # Example
//!
//! ```rust
//! use skcanvas_context2d::{CanvasColor, Context2d, RectParams};
//!
//! let mut ctx = Context2d::new(100, 100).unwrap();
//! ctx.set_fill_style(CanvasColor::from_rgba8(255, 0, 0, 255));
//! ctx.fill_rect(&RectParams::new(10.0, 10.0, 50.0, 50.0));
//! assert_eq!(ctx.get_pixel(20, 20), Some(CanvasColor::from_rgba8(255, 0, 0, 255)));
//! let png_data = ctx.to_png(None).unwrap();
//! assert!(!png_data.is_empty());
//! ```

mod arc;
mod context;
mod dom_matrix;
mod drawing_state;
mod error;
mod geometry;
mod gradient;
mod path;
mod shadow;
mod style;
mod surface;

// Re-export public API
pub use arc::arc_sweep;
pub use context::{Context2d, Context2dBuilder, ContextConfig, MAX_DIMENSION};
pub use dom_matrix::DOMMatrix;
pub use drawing_state::ShadowState;
pub use error::{Context2dError, Context2dResult};
pub use geometry::{
    ArcParams, ArcToParams, CanvasColor, CanvasImageDataRef, CubicBezierParams, DirtyRect,
    EllipseParams, ImageCropParams, ImageData, LinearGradientParams, QuadraticBezierParams,
    RadialGradientParams, RectParams,
};
pub use gradient::{GradientKind, GradientShader, GradientStop};
pub use path::PathState;
pub use style::{CanvasFillRule, CompositeOperation, FillStyle, LineCap, LineJoin};

pub use tiny_skia;
