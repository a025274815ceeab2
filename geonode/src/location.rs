//! Location of points relative to geometries.

use std::collections::HashMap;

use geonode_types::{CartesianPoint2d, Coord, Geom, LineString, Orientation, Polygon, Primitive, Rect};
use rstar::{RTree, RTreeObject, AABB};

/// Topological location of a point relative to a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Point is in the interior of the geometry.
    Interior,
    /// Point is on the boundary of the geometry.
    Boundary,
    /// Point is outside the geometry.
    Exterior,
}

impl Location {
    /// Row or column of the location in an intersection matrix.
    pub(crate) fn index(self) -> usize {
        match self {
            Location::Interior => 0,
            Location::Boundary => 1,
            Location::Exterior => 2,
        }
    }
}

/// Collects how a point relates to every component of one geometry.
///
/// Areal components take precedence over lines, lines over points. Line boundaries follow the mod-2 rule.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LocationAccumulator {
    pub area_interior: bool,
    pub area_boundary: bool,
    pub line_endpoints: usize,
    pub line_interior: bool,
    pub point: bool,
}

impl LocationAccumulator {
    pub fn location(&self) -> Location {
        if self.area_interior {
            Location::Interior
        } else if self.area_boundary || self.line_endpoints % 2 == 1 {
            Location::Boundary
        } else if self.line_interior || self.line_endpoints > 0 || self.point {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Counts crossings of a ray going from the point in the positive x direction.
pub(crate) struct RayCrossingCounter {
    point: Coord,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    pub fn new(point: Coord) -> Self {
        Self {
            point,
            crossings: 0,
            on_segment: false,
        }
    }

    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    pub fn count_segment(&mut self, p1: &Coord, p2: &Coord) {
        let p = self.point;
        if p1.x < p.x && p2.x < p.x {
            return;
        }

        if p.equal(p2) {
            self.on_segment = true;
            return;
        }

        if p1.y == p.y && p2.y == p.y {
            if p.x >= p1.x.min(p2.x) && p.x <= p1.x.max(p2.x) {
                self.on_segment = true;
            }
            return;
        }

        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let cross = (p2.x - p1.x) * (p.y - p1.y) - (p2.y - p1.y) * (p.x - p1.x);
            if cross == 0.0 {
                self.on_segment = true;
                return;
            }
            let side = if p2.y < p1.y { -cross } else { cross };
            if side > 0.0 {
                self.crossings += 1;
            }
        }
    }

    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Locates a point relative to the area enclosed by a closed ring.
pub(crate) fn locate_in_ring(point: &Coord, ring: &[Coord]) -> Location {
    let mut counter = RayCrossingCounter::new(*point);
    for pair in ring.windows(2) {
        counter.count_segment(&pair[0], &pair[1]);
        if counter.is_on_segment() {
            break;
        }
    }
    counter.location()
}

/// Locates a point relative to a polygon with holes.
pub(crate) fn locate_in_polygon(point: &Coord, polygon: &Polygon) -> Location {
    if polygon.is_empty() {
        return Location::Exterior;
    }

    match locate_in_ring(point, polygon.exterior().coords()) {
        Location::Interior => {}
        other => return other,
    }

    for hole in polygon.interiors() {
        match locate_in_ring(point, hole.coords()) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }

    Location::Interior
}

/// Point lies exactly on one of the line's segments.
pub(crate) fn is_on_line(point: &Coord, line: &LineString) -> bool {
    match line.coords() {
        [single] => single.equal(point),
        coords => coords.windows(2).any(|pair| {
            Rect::new(pair[0].x, pair[0].y, pair[1].x, pair[1].y).contains(point)
                && Orientation::triplet(&pair[0], &pair[1], point) == Orientation::Collinear
        }),
    }
}

/// Locates a point relative to any geometry.
pub fn locate(point: &Coord, geom: &Geom) -> Location {
    let mut acc = LocationAccumulator::default();
    for primitive in geom.primitives() {
        match primitive {
            Primitive::Point(coord) => acc.point |= coord.equal(point),
            Primitive::Line(line) => {
                let coords = line.coords();
                if !line.is_closed()
                    && (coords[0].equal(point) || coords[coords.len() - 1].equal(point))
                {
                    acc.line_endpoints += 1;
                } else if is_on_line(point, line) {
                    acc.line_interior = true;
                }
            }
            Primitive::Polygon(polygon) => match locate_in_polygon(point, polygon) {
                Location::Interior => acc.area_interior = true,
                Location::Boundary => acc.area_boundary = true,
                Location::Exterior => {}
            },
        }
    }
    acc.location()
}

#[derive(Debug, Clone, Copy)]
struct RingSegment {
    start: Coord,
    end: Coord,
    /// Index of the polygon among the areal primitives.
    polygon: usize,
}

impl RTreeObject for RingSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.start.x, self.start.y], [self.end.x, self.end.y])
    }
}

/// Point-in-area locator over an R-tree of all ring segments of a geometry.
///
/// Only the areal components are indexed. Each query counts crossings of the segments met by a horizontal ray
/// separately for every polygon, and the point is inside the area if it is inside any of them.
pub(crate) struct IndexedPointLocator {
    tree: RTree<RingSegment>,
    rect: Option<Rect>,
}

impl IndexedPointLocator {
    pub fn new(geom: &Geom) -> Self {
        let mut segments = vec![];
        let mut rect: Option<Rect> = None;
        let polygons = geom.primitives().into_iter().filter_map(|p| match p {
            Primitive::Polygon(polygon) => Some(polygon),
            _ => None,
        });
        for (index, polygon) in polygons.enumerate() {
            for ring in polygon.rings() {
                for pair in ring.coords().windows(2) {
                    segments.push(RingSegment {
                        start: pair[0],
                        end: pair[1],
                        polygon: index,
                    });
                }
                if let Some(ring_rect) = Rect::from_points(ring.coords().iter()) {
                    rect = Some(rect.map_or(ring_rect, |r| r.merge(ring_rect)));
                }
            }
        }

        Self {
            tree: RTree::bulk_load(segments),
            rect,
        }
    }

    /// Geometry has no areal components.
    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    pub fn locate(&self, point: &Coord) -> Location {
        let Some(rect) = self.rect else {
            return Location::Exterior;
        };
        if !rect.contains(point) {
            return Location::Exterior;
        }

        let ray = AABB::from_corners([point.x, point.y], [rect.x_max, point.y]);
        let mut counters: HashMap<usize, RayCrossingCounter> = HashMap::new();
        for segment in self.tree.locate_in_envelope_intersecting(&ray) {
            let counter = counters
                .entry(segment.polygon)
                .or_insert_with(|| RayCrossingCounter::new(*point));
            if !counter.is_on_segment() {
                counter.count_segment(&segment.start, &segment.end);
            }
        }

        let mut location = Location::Exterior;
        for counter in counters.values() {
            match counter.location() {
                Location::Interior => return Location::Interior,
                Location::Boundary => location = Location::Boundary,
                Location::Exterior => {}
            }
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::geom;

    #[test]
    fn ring_location() {
        let ring = [
            Coord::new(0.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 4.0),
            Coord::new(0.0, 4.0),
            Coord::new(0.0, 0.0),
        ];
        assert_eq!(locate_in_ring(&Coord::new(2.0, 2.0), &ring), Location::Interior);
        assert_eq!(locate_in_ring(&Coord::new(4.0, 2.0), &ring), Location::Boundary);
        assert_eq!(locate_in_ring(&Coord::new(4.0, 4.0), &ring), Location::Boundary);
        assert_eq!(locate_in_ring(&Coord::new(2.0, 0.0), &ring), Location::Boundary);
        assert_eq!(locate_in_ring(&Coord::new(5.0, 2.0), &ring), Location::Exterior);
        assert_eq!(locate_in_ring(&Coord::new(-1.0, 4.0), &ring), Location::Exterior);
    }

    #[test]
    fn ray_through_vertex() {
        let ring = [
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 2.0),
            Coord::new(4.0, 0.0),
            Coord::new(2.0, 4.0),
            Coord::new(0.0, 0.0),
        ];
        assert_eq!(locate_in_ring(&Coord::new(1.5, 2.0), &ring), Location::Interior);
        assert_eq!(locate_in_ring(&Coord::new(0.5, 2.0), &ring), Location::Exterior);
        assert_eq!(locate_in_ring(&Coord::new(2.0, 1.0), &ring), Location::Exterior);
        assert_eq!(locate_in_ring(&Coord::new(2.0, 2.0), &ring), Location::Boundary);
    }

    #[test]
    fn polygon_with_hole() {
        let polygon = geom("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 8, 8 8, 8 2, 2 2))");
        assert_eq!(locate(&Coord::new(1.0, 1.0), &polygon), Location::Interior);
        assert_eq!(locate(&Coord::new(5.0, 5.0), &polygon), Location::Exterior);
        assert_eq!(locate(&Coord::new(2.0, 5.0), &polygon), Location::Boundary);

        let locator = IndexedPointLocator::new(&polygon);
        for (x, y) in [(1.0, 1.0), (5.0, 5.0), (2.0, 5.0), (10.0, 10.0), (11.0, 5.0)] {
            let point = Coord::new(x, y);
            assert_eq!(locator.locate(&point), locate(&point, &polygon), "{x} {y}");
        }
    }

    #[test]
    fn overlapping_collection_parts() {
        let collection = geom(
            "GEOMETRYCOLLECTION (POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0)), POLYGON ((1 1, 1 3, 3 3, 3 1, 1 1)))",
        );
        let locator = IndexedPointLocator::new(&collection);
        assert_eq!(locator.locate(&Coord::new(1.5, 1.5)), Location::Interior);
        assert_eq!(locator.locate(&Coord::new(1.5, 1.0)), Location::Interior);
        assert_eq!(locator.locate(&Coord::new(0.0, 1.0)), Location::Boundary);
        assert_eq!(locator.locate(&Coord::new(2.5, 0.5)), Location::Exterior);

        for (x, y) in [(1.5, 1.5), (1.0, 1.5), (0.5, 0.5), (2.5, 2.5), (3.0, 2.0), (0.5, 2.5)] {
            let point = Coord::new(x, y);
            assert_eq!(locator.locate(&point), locate(&point, &collection), "{x} {y}");
        }
    }

    #[test]
    fn line_boundary_mod_2() {
        let lines = geom("MULTILINESTRING ((0 0, 1 1), (1 1, 2 0), (5 5, 6 6, 5 6, 5 5))");
        assert_eq!(locate(&Coord::new(0.0, 0.0), &lines), Location::Boundary);
        assert_eq!(locate(&Coord::new(1.0, 1.0), &lines), Location::Interior);
        assert_eq!(locate(&Coord::new(0.5, 0.5), &lines), Location::Interior);
        assert_eq!(locate(&Coord::new(5.0, 5.0), &lines), Location::Interior);
        assert_eq!(locate(&Coord::new(3.0, 3.0), &lines), Location::Exterior);
    }

    #[test]
    fn points() {
        let points = geom("MULTIPOINT ((1 1), (2 2))");
        assert_eq!(locate(&Coord::new(2.0, 2.0), &points), Location::Interior);
        assert_eq!(locate(&Coord::new(1.5, 1.5), &points), Location::Exterior);
        assert!(IndexedPointLocator::new(&points).is_empty());
    }
}
