//! Arc geometry using cubic bezier approximation.
//!
//! tiny-skia does not support arc primitives directly. Arcs are resolved in
//! user space into a start point plus cubic segments (via `kurbo`), and the
//! context bakes each resulting point through its current transform.

use crate::geometry::{ArcToParams, EllipseParams};
use std::f32::consts::TAU;

/// Maximum distance between the true arc and its cubic approximation, in
/// user-space units.
const ARC_TOLERANCE: f64 = 1e-3;

/// A user-space point.
pub(crate) type UserPoint = (f32, f32);

/// An arc resolved into its start point and trailing cubic segments.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ArcSegments {
    /// Point on the ellipse at the start angle.
    pub start: UserPoint,
    /// Cubic segments as `[control1, control2, end]`.
    pub cubics: Vec<[UserPoint; 3]>,
}

/// Signed sweep angle for an arc from `start` to `end`.
///
/// | anticlockwise | start <= end | \|end - start\| >= 2π | sweep                        |
/// |---------------|--------------|-----------------------|------------------------------|
/// | false         | true         | true                  | 2π                           |
/// | false         | true         | false                 | end - start                  |
/// | false         | false        | any                   | (end - start) mod 2π         |
/// | true          | false        | true                  | -2π                          |
/// | true          | false        | false                 | end - start                  |
/// | true          | true         | any                   | -((start - end) mod 2π)      |
pub fn arc_sweep(start: f32, end: f32, anticlockwise: bool) -> f32 {
    let delta = end - start;
    let full_turn = delta.abs() >= TAU;
    match (anticlockwise, start <= end) {
        (false, true) if full_turn => TAU,
        (false, true) => delta,
        (false, false) => delta.rem_euclid(TAU),
        (true, false) if full_turn => -TAU,
        (true, false) => delta,
        (true, true) => -(start - end).rem_euclid(TAU),
    }
}

/// Resolve an elliptical arc into cubic segments.
///
/// Returns `None` when any argument is non-finite or a radius is negative.
/// Zero radii collapse to a single point at the center.
pub(crate) fn ellipse_segments(params: &EllipseParams) -> Option<ArcSegments> {
    let EllipseParams {
        x,
        y,
        radius_x,
        radius_y,
        rotation,
        start_angle,
        end_angle,
        anticlockwise,
    } = *params;

    let finite = [x, y, radius_x, radius_y, rotation, start_angle, end_angle]
        .iter()
        .all(|v| v.is_finite());
    if !finite || radius_x < 0.0 || radius_y < 0.0 {
        return None;
    }

    let sweep = arc_sweep(start_angle, end_angle, anticlockwise);
    let start = point_on_ellipse(params, start_angle);
    let mut segments = ArcSegments {
        start,
        cubics: Vec::new(),
    };
    if (radius_x == 0.0 && radius_y == 0.0) || sweep == 0.0 {
        return Some(segments);
    }

    let arc = kurbo::Arc::new(
        (x as f64, y as f64),
        (radius_x as f64, radius_y as f64),
        start_angle as f64,
        sweep as f64,
        rotation as f64,
    );
    arc.to_cubic_beziers(ARC_TOLERANCE, |p1, p2, p| {
        segments.cubics.push([
            (p1.x as f32, p1.y as f32),
            (p2.x as f32, p2.y as f32),
            (p.x as f32, p.y as f32),
        ]);
    });
    Some(segments)
}

fn point_on_ellipse(params: &EllipseParams, angle: f32) -> UserPoint {
    let (sin_rot, cos_rot) = params.rotation.sin_cos();
    let (sin_a, cos_a) = angle.sin_cos();
    let ex = params.radius_x * cos_a;
    let ey = params.radius_y * sin_a;
    (
        params.x + ex * cos_rot - ey * sin_rot,
        params.y + ex * sin_rot + ey * cos_rot,
    )
}

/// Result of resolving an arcTo against the current point.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TangentArc {
    /// Degenerate input: draw a straight line to the first control point.
    Line(UserPoint),
    /// Line to the first tangent point, then the arc.
    Arc(EllipseParams),
}

/// Compute the arc tangent to the lines `p0 -> p1` and `p1 -> p2`.
///
/// All coordinates are in user space. Negative radii must be rejected by
/// the caller.
pub(crate) fn tangent_arc(p0: UserPoint, params: &ArcToParams) -> TangentArc {
    let ArcToParams {
        x1,
        y1,
        x2,
        y2,
        radius,
    } = *params;
    let corner = (x1, y1);

    if radius == 0.0 {
        return TangentArc::Line(corner);
    }

    // Vectors from corner to adjacent points
    let (v1x, v1y) = (p0.0 - x1, p0.1 - y1);
    let (v2x, v2y) = (x2 - x1, y2 - y1);
    let len1 = v1x.hypot(v1y);
    let len2 = v2x.hypot(v2y);
    if len1 < 1e-6 || len2 < 1e-6 {
        return TangentArc::Line(corner);
    }
    let (v1x, v1y) = (v1x / len1, v1y / len1);
    let (v2x, v2y) = (v2x / len2, v2y / len2);

    let cross = v1x * v2y - v1y * v2x;
    let dot = v1x * v2x + v1y * v2y;
    let angle = cross.atan2(dot);
    // Collinear, either continuing straight or doubling back.
    if angle.abs() < 1e-6 || (std::f32::consts::PI - angle.abs()) < 1e-6 {
        return TangentArc::Line(corner);
    }

    let seg_len = radius / (angle / 2.0).tan().abs();
    let start = (x1 + v1x * seg_len, y1 + v1y * seg_len);
    let end = (x1 + v2x * seg_len, y1 + v2y * seg_len);

    let sign = if cross < 0.0 { -1.0 } else { 1.0 };
    let (nx, ny) = (-v1y * sign, v1x * sign);
    let (cx, cy) = (start.0 + nx * radius, start.1 + ny * radius);

    TangentArc::Arc(EllipseParams {
        x: cx,
        y: cy,
        radius_x: radius,
        radius_y: radius,
        rotation: 0.0,
        start_angle: (start.1 - cy).atan2(start.0 - cx),
        end_angle: (end.1 - cy).atan2(end.0 - cx),
        anticlockwise: cross > 0.0,
    })
}
