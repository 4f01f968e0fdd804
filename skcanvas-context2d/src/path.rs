//! The context's current path.
//!
//! All points arriving here are already in device space; the context bakes
//! them through its transform before appending.

use std::fmt;
use tiny_skia::{PathBuilder, PathSegment, Point};

/// Where the path builder stands with respect to its current subpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathState {
    /// No subpaths and no current point.
    #[default]
    Empty,
    /// The last command left a current point on an open subpath.
    Open,
    /// The last command closed a subpath; the current point is its start.
    Closed,
}

/// Accumulated device-space subpaths.
#[derive(Debug, Clone, Default)]
pub struct CanvasPath {
    builder: PathBuilder,
    state: PathState,
    current: Point,
    subpath_start: Point,
    segments: usize,
}

impl CanvasPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PathState {
        self.state
    }

    /// Current point, if any.
    pub fn current_point(&self) -> Option<Point> {
        match self.state {
            PathState::Empty => None,
            PathState::Open | PathState::Closed => Some(self.current),
        }
    }

    /// Number of commands appended since the last clear.
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// Discard all subpaths.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn move_to(&mut self, p: Point) {
        self.builder.move_to(p.x, p.y);
        self.current = p;
        self.subpath_start = p;
        self.state = PathState::Open;
        self.segments += 1;
    }

    /// Line to `p`; with no current point this only starts a subpath there.
    pub fn line_to(&mut self, p: Point) {
        if self.state == PathState::Empty {
            self.move_to(p);
            return;
        }
        self.builder.line_to(p.x, p.y);
        self.advance(p);
    }

    pub fn quad_to(&mut self, ctrl: Point, p: Point) {
        self.ensure_subpath(ctrl);
        self.builder.quad_to(ctrl.x, ctrl.y, p.x, p.y);
        self.advance(p);
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, p: Point) {
        self.ensure_subpath(ctrl1);
        self.builder
            .cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, p.x, p.y);
        self.advance(p);
    }

    /// Seal the current subpath. Idempotent, and a no-op on an empty path.
    pub fn close(&mut self) {
        if self.state != PathState::Open {
            return;
        }
        self.builder.close();
        self.current = self.subpath_start;
        self.state = PathState::Closed;
        self.segments += 1;
    }

    /// Append a closed quadrilateral. The current point becomes its first corner.
    pub fn quad(&mut self, corners: [Point; 4]) {
        self.move_to(corners[0]);
        for corner in &corners[1..] {
            self.builder.line_to(corner.x, corner.y);
        }
        self.segments += 3;
        self.state = PathState::Open;
        self.close();
    }

    /// Append every segment of `path`, mapping each point with `map`.
    pub fn extend_mapped(&mut self, path: &tiny_skia::Path, map: impl Fn(Point) -> Point) {
        for segment in path.segments() {
            match segment {
                PathSegment::MoveTo(p) => self.move_to(map(p)),
                PathSegment::LineTo(p) => self.line_to(map(p)),
                PathSegment::QuadTo(c, p) => self.quad_to(map(c), map(p)),
                PathSegment::CubicTo(c1, c2, p) => self.cubic_to(map(c1), map(c2), map(p)),
                PathSegment::Close => self.close(),
            }
        }
    }

    /// Snapshot as an immutable path. `None` when there is nothing drawable.
    pub fn to_path(&self) -> Option<tiny_skia::Path> {
        self.builder.clone().finish()
    }

    fn ensure_subpath(&mut self, p: Point) {
        if self.state == PathState::Empty {
            self.move_to(p);
        }
    }

    fn advance(&mut self, p: Point) {
        self.current = p;
        self.state = PathState::Open;
        self.segments += 1;
    }
}

impl fmt::Display for CanvasPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}, {} segments", self.state, self.segments)?;
        if let Some(p) = self.current_point() {
            write!(f, ", current point ({}, {})", p.x, p.y)?;
        }
        if let Some(bounds) = self.to_path().map(|p| p.bounds()) {
            write!(
                f,
                ", bounds [{}, {}, {}, {}]",
                bounds.left(),
                bounds.top(),
                bounds.right(),
                bounds.bottom()
            )?;
        }
        Ok(())
    }
}
