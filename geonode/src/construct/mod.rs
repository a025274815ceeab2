//! Geometries constructed from a single input: envelopes, hulls, buffers and representative points.

mod boundary;
mod buffer;
mod centroid;
mod envelope;
mod hull;
mod interior_point;
mod simplify;

pub use buffer::{BufferParams, DEFAULT_QUADRANT_SEGMENTS};

pub(crate) use boundary::boundary;
pub(crate) use buffer::buffer;
pub(crate) use centroid::centroid;
pub(crate) use envelope::envelope;
pub(crate) use hull::convex_hull;
pub(crate) use interior_point::point_on_surface;
pub(crate) use simplify::simplify;
