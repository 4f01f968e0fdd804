//! Transform operations for Context2d.

use super::Context2d;
use crate::dom_matrix::DOMMatrix;
use tiny_skia::Transform;

impl Context2d {
    /// Translate the current transform.
    pub fn translate(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "translate {} {}", x, y);
        self.concat(Transform::from_translate(x, y));
    }

    /// Rotate the current transform by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        log::debug!(target: "canvas", "rotate {}", angle);
        let (sin, cos) = angle.sin_cos();
        self.concat(Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0));
    }

    /// Scale the current transform.
    pub fn scale(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        self.concat(Transform::from_scale(x, y));
    }

    /// Post-multiply an arbitrary affine matrix.
    pub fn transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "transform {:?}", matrix);
        self.concat(matrix.into());
    }

    /// Replace the current transform. Non-finite matrices are ignored.
    pub fn set_transform(&mut self, matrix: DOMMatrix) {
        log::debug!(target: "canvas", "setTransform {:?}", matrix);
        if !matrix.is_finite() {
            return;
        }
        self.state.transform = matrix.into();
    }

    /// Reset the current transform to identity. The save stack is untouched.
    pub fn reset_matrix(&mut self) {
        log::debug!(target: "canvas", "resetMatrix");
        self.state.transform = Transform::identity();
    }

    /// Get the current transformation matrix.
    pub fn get_transform(&self) -> DOMMatrix {
        self.state.transform.into()
    }

    /// Post-multiply `m` onto the current transform.
    ///
    /// Non-finite input is ignored. A result that cannot be inverted is a
    /// caller bug: it asserts in debug builds and is dropped in release.
    fn concat(&mut self, m: Transform) {
        if !m.is_finite() {
            log::debug!(target: "canvas", "ignoring non-finite transform {:?}", m);
            return;
        }
        let next = self.state.transform.pre_concat(m);
        if !next.is_finite() || next.invert().is_none() {
            debug_assert!(false, "non-invertible transform {:?}", next);
            log::warn!(target: "canvas", "ignoring non-invertible transform {:?}", m);
            return;
        }
        self.state.transform = next;
    }
}
