//! Path building operations for Context2d.
//!
//! Every point is mapped through the transform active when it is appended.

use super::Context2d;
use crate::arc::{self, ArcSegments, TangentArc};
use crate::error::{Context2dError, Context2dResult};
use crate::geometry::{
    ArcParams, ArcToParams, CubicBezierParams, EllipseParams, QuadraticBezierParams, RectParams,
};
use crate::path::PathState;
use tiny_skia::{Point, Transform};

/// Map a user-space point into device space.
pub(crate) fn map_point(transform: &Transform, x: f32, y: f32) -> Point {
    Point::from_xy(
        transform.sx * x + transform.kx * y + transform.tx,
        transform.ky * x + transform.sy * y + transform.ty,
    )
}

fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl Context2d {
    /// Begin a new path.
    pub fn begin_path(&mut self) {
        log::debug!(target: "canvas", "beginPath");
        self.path.clear();
    }

    /// Transform a point by the current transformation matrix.
    pub(crate) fn transform_point(&self, x: f32, y: f32) -> Point {
        map_point(&self.state.transform, x, y)
    }

    pub fn path_state(&self) -> PathState {
        self.path.state()
    }

    /// Current point of the path in device space.
    pub fn current_point(&self) -> Option<(f32, f32)> {
        self.path.current_point().map(|p| (p.x, p.y))
    }

    /// Device-space bounds of the current path's points, control points
    /// included, as `[left, top, right, bottom]`.
    pub fn path_bounds(&self) -> Option<[f32; 4]> {
        let bounds = self.path.to_path()?.bounds();
        Some([bounds.left(), bounds.top(), bounds.right(), bounds.bottom()])
    }

    /// Move to a point without drawing.
    pub fn move_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "moveTo {} {}", x, y);
        if !all_finite(&[x, y]) {
            return;
        }
        let p = self.transform_point(x, y);
        self.path.move_to(p);
    }

    /// Draw a line to a point. Without a current point this only moves there.
    pub fn line_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "lineTo {} {}", x, y);
        if !all_finite(&[x, y]) {
            return;
        }
        let p = self.transform_point(x, y);
        self.path.line_to(p);
    }

    /// Draw a quadratic bezier curve.
    pub fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) {
        log::debug!(target: "canvas", "quadraticCurveTo {:?}", params);
        if !all_finite(&[params.cpx, params.cpy, params.x, params.y]) {
            return;
        }
        let ctrl = self.transform_point(params.cpx, params.cpy);
        let end = self.transform_point(params.x, params.y);
        self.path.quad_to(ctrl, end);
    }

    /// Draw a cubic bezier curve.
    pub fn bezier_curve_to(&mut self, params: &CubicBezierParams) {
        log::debug!(target: "canvas", "bezierCurveTo {:?}", params);
        let CubicBezierParams {
            cp1x,
            cp1y,
            cp2x,
            cp2y,
            x,
            y,
        } = *params;
        if !all_finite(&[cp1x, cp1y, cp2x, cp2y, x, y]) {
            return;
        }
        let c1 = self.transform_point(cp1x, cp1y);
        let c2 = self.transform_point(cp2x, cp2y);
        let end = self.transform_point(x, y);
        self.path.cubic_to(c1, c2, end);
    }

    /// Add a closed rectangle subpath. The current point ends at `(x, y)`.
    pub fn rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "rect {:?}", params);
        if !params.is_finite() {
            return;
        }
        let corners = params.corners().map(|(x, y)| self.transform_point(x, y));
        self.path.quad(corners);
    }

    /// Add a circular arc. With a current point, a line joins it to the arc start.
    pub fn arc(&mut self, params: &ArcParams) {
        log::debug!(target: "canvas", "arc {:?}", params);
        if params.radius < 0.0 {
            log::debug!(target: "canvas", "ignoring arc with negative radius");
            return;
        }
        if let Some(segments) = arc::ellipse_segments(&EllipseParams::from(params)) {
            self.append_arc(&segments);
        }
    }

    /// Add an elliptical arc. With a current point, a line joins it to the arc start.
    pub fn ellipse(&mut self, params: &EllipseParams) {
        log::debug!(target: "canvas", "ellipse {:?}", params);
        match arc::ellipse_segments(params) {
            Some(segments) => self.append_arc(&segments),
            None => log::debug!(target: "canvas", "ignoring invalid ellipse"),
        }
    }

    /// Add an arc tangent to the lines from the current point to `(x1, y1)`
    /// and from there to `(x2, y2)`.
    pub fn arc_to(&mut self, params: &ArcToParams) {
        log::debug!(target: "canvas", "arcTo {:?}", params);
        let ArcToParams {
            x1,
            y1,
            x2,
            y2,
            radius,
        } = *params;
        if !all_finite(&[x1, y1, x2, y2, radius]) {
            return;
        }
        if radius < 0.0 {
            log::debug!(target: "canvas", "ignoring arcTo with negative radius");
            return;
        }

        let Some(current) = self.path.current_point() else {
            let p = self.transform_point(x1, y1);
            self.path.move_to(p);
            return;
        };

        // The tangent construction happens in user space, so bring the
        // device-space current point back through the inverse transform.
        let Some(inverse) = self.state.transform.invert() else {
            let p = self.transform_point(x1, y1);
            self.path.line_to(p);
            return;
        };
        let p0 = map_point(&inverse, current.x, current.y);

        match arc::tangent_arc((p0.x, p0.y), params) {
            TangentArc::Line((x, y)) => {
                let p = self.transform_point(x, y);
                self.path.line_to(p);
            }
            TangentArc::Arc(ellipse) => {
                if let Some(segments) = arc::ellipse_segments(&ellipse) {
                    self.append_arc(&segments);
                }
            }
        }
    }

    fn append_arc(&mut self, segments: &ArcSegments) {
        let start = self.transform_point(segments.start.0, segments.start.1);
        if self.path.current_point().is_some() {
            self.path.line_to(start);
        } else {
            self.path.move_to(start);
        }
        for [c1, c2, end] in &segments.cubics {
            let c1 = self.transform_point(c1.0, c1.1);
            let c2 = self.transform_point(c2.0, c2.1);
            let end = self.transform_point(end.0, end.1);
            self.path.cubic_to(c1, c2, end);
        }
    }

    /// Append a user-space path, mapped through the current transform.
    pub fn add_path(&mut self, path: &tiny_skia::Path) {
        log::debug!(target: "canvas", "addPath ({} points)", path.len());
        let transform = self.state.transform;
        self.path
            .extend_mapped(path, |p| map_point(&transform, p.x, p.y));
    }

    /// Append SVG path data in user space.
    ///
    /// Supports all SVG path commands; arcs and shorthand curves are
    /// simplified to quadratic and cubic segments. On a parse error the
    /// current path is left unchanged.
    pub fn add_svg_path(&mut self, path_data: &str) -> Context2dResult<()> {
        log::debug!(target: "canvas", "addSvgPath {:?}", path_data);
        let segments = svgtypes::SimplifyingPathParser::from(path_data)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Context2dError::PathParseError(format!("{:?}", e)))?;

        for segment in segments {
            match segment {
                svgtypes::SimplePathSegment::MoveTo { x, y } => {
                    let p = self.transform_point(x as f32, y as f32);
                    self.path.move_to(p);
                }
                svgtypes::SimplePathSegment::LineTo { x, y } => {
                    let p = self.transform_point(x as f32, y as f32);
                    self.path.line_to(p);
                }
                svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    let ctrl = self.transform_point(x1 as f32, y1 as f32);
                    let end = self.transform_point(x as f32, y as f32);
                    self.path.quad_to(ctrl, end);
                }
                svgtypes::SimplePathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    let c1 = self.transform_point(x1 as f32, y1 as f32);
                    let c2 = self.transform_point(x2 as f32, y2 as f32);
                    let end = self.transform_point(x as f32, y as f32);
                    self.path.cubic_to(c1, c2, end);
                }
                svgtypes::SimplePathSegment::ClosePath => self.path.close(),
            }
        }
        Ok(())
    }

    /// Close the current subpath. No-op when there is no open subpath.
    pub fn close_path(&mut self) {
        log::debug!(target: "canvas", "closePath");
        self.path.close();
    }
}
