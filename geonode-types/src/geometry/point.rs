use crate::cartesian::{Coord, Rect};
use crate::geo::Projection;
use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};

/// Single position, possibly empty.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point(Option<Coord>);

impl Point {
    /// Creates a point at the given position.
    pub fn new(coord: Coord) -> Self {
        Self(Some(coord))
    }

    /// Creates `POINT EMPTY`.
    pub fn empty() -> Self {
        Self(None)
    }

    /// Position of the point, if any.
    pub fn coord(&self) -> Option<&Coord> {
        self.0.as_ref()
    }

    /// Point has no position.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Coord> for Point {
    fn from(value: Coord) -> Self {
        Self::new(value)
    }
}

impl Geometry for Point {
    fn project<Proj>(&self, projection: &Proj) -> Option<Self>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        match &self.0 {
            Some(coord) => Some(Self::new(projection.project(coord)?)),
            None => Some(Self::empty()),
        }
    }

    fn rect(&self) -> Option<Rect> {
        self.0.as_ref().map(Rect::from_point)
    }
}
