//! Geometry utilities for facet stitching.
//!
//! Points and directions are plain `[f64; 3]` arrays; this module provides
//! the small vector toolkit the facet and stitching code needs.

pub mod vec3;

pub use vec3::{BoundingBox, Point3};
