//! Planar geometry model, WKT codec and coordinate reference systems used by `geonode`.
//!
//! * [`geometry`] holds the seven simple feature kinds wrapped in [`Geom`].
//! * [`wkt`] reads and writes them as text.
//! * [`geo`] describes reference systems ([`geo::Crs`]) and converts coordinates between them.

pub mod cartesian;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod segment;
pub mod wkt;

#[cfg(feature = "geo-types")]
mod geo_types;

pub use cartesian::{CartesianPoint2d, Coord, NewCartesianPoint2d, Orientation, Rect};
pub use error::GeonodeTypesError;
pub use geometry::{
    Geom, Geometry, GeometryCollection, GeometryType, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Primitive, Winding,
};
pub use segment::{Segment, SegmentIntersection};
