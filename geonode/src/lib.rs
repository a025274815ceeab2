//! Planar geometry engine.
//!
//! `geonode` evaluates topological relationships between geometries (the DE-9IM model and the named predicates
//! derived from it), computes boolean overlays and derived constructions, checks validity and reprojects
//! coordinates between reference systems. The geometry model, the WKT codec and the reference system formulas live
//! in the [`geonode_types`] crate, which is re-exported.
//!
//! The entry point is [`Geometry`]:
//!
//! ```
//! use geonode::Geometry;
//!
//! let a = Geometry::from_wkt("POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))").unwrap();
//! let b = Geometry::from_wkt("POLYGON((1 1, 1 3, 3 3, 3 1, 1 1))").unwrap();
//!
//! assert_eq!(a.relate(&b).unwrap().to_string(), "212101212");
//! assert_eq!(a.intersection(&b).unwrap().area().unwrap(), 1.0);
//! ```
//!
//! When one geometry is tested against many others, [`Geometry::prepare`] builds the segment index once and
//! returns a [`PreparedGeometry`] with the same predicates.

mod construct;
pub mod error;
mod geometry;
mod index;
pub mod location;
mod measure;
mod overlay;
pub mod prepared;
pub mod relate;
mod topology;
mod transform;
pub mod validity;

#[cfg(test)]
mod tests;

pub use construct::{BufferParams, DEFAULT_QUADRANT_SEGMENTS};
pub use error::GeonodeError;
pub use geometry::Geometry;
pub use geonode_types;
pub use geonode_types::geo::Crs;
pub use location::Location;
pub use prepared::PreparedGeometry;
pub use relate::{Dimension, IntersectionMatrix};
pub use validity::ValidityError;

/// Version of the engine.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
