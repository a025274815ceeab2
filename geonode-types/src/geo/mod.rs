//! Geographic coordinates (see [`GeoPoint`]), reference systems (see [`Crs`]) and conversion between them
//! (see [`Projection`]).

mod crs;
mod datum;
pub mod impls;
mod traits;

pub use crs::{Crs, CrsTransform, ProjectionType, Units};
pub use datum::{Datum, Ellipsoid, Helmert};
pub use impls::GeoPoint2d;
pub use traits::point::{GeoPoint, NewGeoPoint};
pub use traits::projection::Projection;
