use crate::cartesian::{Coord, Rect};
use crate::geo::Projection;
use crate::geometry::{Geometry, LineString};
use serde::{Deserialize, Serialize};

/// Area bounded by an exterior ring with optional holes. `POLYGON EMPTY` has an empty exterior.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: LineString,
    interiors: Vec<LineString>,
}

impl Polygon {
    /// Creates a polygon from its rings.
    pub fn new(exterior: LineString, interiors: Vec<LineString>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Creates `POLYGON EMPTY`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Outer ring.
    pub fn exterior(&self) -> &LineString {
        &self.exterior
    }

    /// Holes.
    pub fn interiors(&self) -> &[LineString] {
        &self.interiors
    }

    /// Exterior followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// Polygon has no exterior ring.
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Area enclosed by the exterior minus the area of the holes.
    pub fn area(&self) -> f64 {
        self.exterior.area_signed().abs()
            - self
                .interiors
                .iter()
                .map(|ring| ring.area_signed().abs())
                .sum::<f64>()
    }

    /// Total length of all rings.
    pub fn perimeter(&self) -> f64 {
        self.rings().map(LineString::length).sum()
    }
}

impl Geometry for Polygon {
    fn project<Proj>(&self, projection: &Proj) -> Option<Self>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(Self {
            exterior: self.exterior.project(projection)?,
            interiors: self
                .interiors
                .iter()
                .map(|ring| ring.project(projection))
                .collect::<Option<Vec<_>>>()?,
        })
    }

    fn rect(&self) -> Option<Rect> {
        self.exterior.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_with_hole() {
        let exterior = LineString::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 4.0),
            Coord::new(4.0, 4.0),
            Coord::new(4.0, 0.0),
            Coord::new(0.0, 0.0),
        ]);
        let hole = LineString::new(vec![
            Coord::new(1.0, 1.0),
            Coord::new(2.0, 1.0),
            Coord::new(2.0, 2.0),
            Coord::new(1.0, 2.0),
            Coord::new(1.0, 1.0),
        ]);
        let polygon = Polygon::new(exterior, vec![hole]);
        assert_eq!(polygon.area(), 15.0);
        assert_eq!(polygon.perimeter(), 20.0);
        assert_eq!(polygon.rings().count(), 2);
    }
}
