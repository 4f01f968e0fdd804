//! Behavior tests for the rendering context, grouped by feature.
//!
//! Each module drives the public API and checks pixels or path geometry
//! against hand-computed expectations.

mod common;

mod arcs;
mod compositing;
mod gradients;
mod image_data;
mod transform_timing;
