//! Types and functions on geometries in cartesian coordinates.

mod orient;
mod point;
mod rect;

pub use orient::Orientation;
pub use point::{CartesianPoint2d, Coord, NewCartesianPoint2d};
pub use rect::Rect;
