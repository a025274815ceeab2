use crate::cartesian::{CartesianPoint2d, Coord, Rect};
use crate::geo::Projection;
use crate::geometry::Geometry;
use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// Direction in which a closed ring is traversed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Winding {
    /// Clockwise, negative signed area.
    Clockwise,
    /// Counterclockwise, positive signed area.
    CounterClockwise,
}

/// Ordered sequence of vertices. Also used as polygon ring storage.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString(Vec<Coord>);

impl LineString {
    /// Creates a line string from its vertices.
    pub fn new(coords: Vec<Coord>) -> Self {
        Self(coords)
    }

    /// Vertices of the line.
    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    /// Consumes the line returning its vertices.
    pub fn into_coords(self) -> Vec<Coord> {
        self.0
    }

    /// Line has no vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-empty and the first vertex equals the last one.
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first.equal(last),
            _ => false,
        }
    }

    /// Iterates over the segments between consecutive vertices.
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_, Coord>> {
        self.0.windows(2).map(|w| Segment(&w[0], &w[1]))
    }

    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// Signed area enclosed by the ring (shoelace formula), positive for counterclockwise rings.
    ///
    /// The ring is treated as closed even if the last vertex does not repeat the first one.
    pub fn area_signed(&self) -> f64 {
        let Some(first) = self.0.first() else {
            return 0.0;
        };

        let mut area = 0.0;
        let mut prev = first;
        for p in self.0.iter().skip(1).chain(std::iter::once(first)) {
            area += (prev.x - first.x) * (p.y - first.y) - (p.x - first.x) * (prev.y - first.y);
            prev = p;
        }

        area / 2.0
    }

    /// Winding of the ring.
    pub fn winding(&self) -> Winding {
        if self.area_signed() <= 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// Same vertices in reverse order.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    /// Copy with consecutive duplicate vertices removed.
    pub fn deduped(&self) -> Self {
        let mut coords = self.0.clone();
        coords.dedup_by(|a, b| a.equal(b));
        Self(coords)
    }

    /// Number of distinct vertices.
    pub fn distinct_count(&self) -> usize {
        let mut coords = self.0.clone();
        coords.sort_by(Coord::cmp_xy);
        coords.dedup_by(|a, b| a.equal(b));
        coords.len()
    }
}

impl From<Vec<Coord>> for LineString {
    fn from(value: Vec<Coord>) -> Self {
        Self(value)
    }
}

impl Geometry for LineString {
    fn project<Proj>(&self, projection: &Proj) -> Option<Self>
    where
        Proj: Projection<InPoint = Coord, OutPoint = Coord> + ?Sized,
    {
        Some(Self(
            self.0
                .iter()
                .map(|p| projection.project(p))
                .collect::<Option<Vec<_>>>()?,
        ))
    }

    fn rect(&self) -> Option<Rect> {
        Rect::from_points(self.0.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> LineString {
        LineString::new(points.iter().map(|&p| Coord::from(p)).collect())
    }

    #[test]
    fn area_signed() {
        let square = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(square.area_signed(), -1.0);
        assert_eq!(square.winding(), Winding::Clockwise);
        assert_eq!(square.reversed().area_signed(), 1.0);

        let open_triangle = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(open_triangle.area_signed(), 0.5);
        assert_eq!(open_triangle.winding(), Winding::CounterClockwise);
    }

    #[test]
    fn closed_and_length() {
        let line = ring(&[(0.0, 0.0), (3.0, 4.0), (3.0, 0.0)]);
        assert!(!line.is_closed());
        assert_eq!(line.length(), 9.0);
        assert!(ring(&[(1.0, 1.0), (2.0, 1.0), (1.0, 1.0)]).is_closed());
        assert!(!LineString::default().is_closed());
    }

    #[test]
    fn distinct() {
        let line = ring(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(line.distinct_count(), 2);
        assert_eq!(line.deduped().coords().len(), 3);
    }
}
